//! # Lab Session Data Structures
//!
//! The `LabSession` struct is the root container for a laboratory work
//! session: a set of test reports keyed by UUID plus metadata and defaults.
//! Sessions serialize to human-readable JSON; actual file storage is the
//! caller's concern.
//!
//! ## Structure
//!
//! ```text
//! LabSession
//! ├── meta: SessionMetadata (version, project, client, timestamps)
//! ├── settings: SessionSettings (lab-wide defaults)
//! └── items: HashMap<Uuid, ReportItem> (all test reports)
//! ```

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::calculations::ReportItem;

/// Current schema version for serialized sessions
pub const SCHEMA_VERSION: &str = "0.1.0";

/// Per-test specimen metadata. Free text, carried through to reports
/// unchanged.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TestInfo {
    pub borehole_no: String,
    pub sample_no: String,
    pub sample_description: String,
    /// Test date in `dd-MMM-yyyy` form (e.g. "25-Aug-2026")
    pub test_date: String,
    pub tested_by: String,
    pub checked_by: String,
}

impl TestInfo {
    /// Empty record with the date defaulted to today.
    pub fn new() -> Self {
        TestInfo {
            borehole_no: String::new(),
            sample_no: String::new(),
            sample_description: String::new(),
            test_date: Utc::now().format("%d-%b-%Y").to_string(),
            tested_by: String::new(),
            checked_by: String::new(),
        }
    }
}

impl Default for TestInfo {
    fn default() -> Self {
        TestInfo::new()
    }
}

/// Root session container.
///
/// Items are stored in a flat UUID-keyed map: O(1) lookup, no duplicate id
/// issues, stable references when reports are reordered for display.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LabSession {
    pub meta: SessionMetadata,
    pub settings: SessionSettings,
    pub items: HashMap<Uuid, ReportItem>,
}

impl LabSession {
    /// Create a new empty session.
    ///
    /// # Example
    ///
    /// ```rust
    /// use soil_core::session::LabSession;
    ///
    /// let session = LabSession::new("Runway Extension", "Acme Airports");
    /// assert_eq!(session.meta.project_name, "Runway Extension");
    /// assert!(session.items.is_empty());
    /// ```
    pub fn new(project_name: impl Into<String>, client: impl Into<String>) -> Self {
        let now = Utc::now();
        LabSession {
            meta: SessionMetadata {
                version: SCHEMA_VERSION.to_string(),
                project_name: project_name.into(),
                client: client.into(),
                created: now,
                modified: now,
            },
            settings: SessionSettings::default(),
            items: HashMap::new(),
        }
    }

    /// Add a report to the session. Returns the UUID assigned to it.
    pub fn add_item(&mut self, item: ReportItem) -> Uuid {
        let id = Uuid::new_v4();
        self.items.insert(id, item);
        self.touch();
        id
    }

    /// Remove a report by UUID. Returns the removed report if it existed.
    pub fn remove_item(&mut self, id: &Uuid) -> Option<ReportItem> {
        let item = self.items.remove(id);
        if item.is_some() {
            self.touch();
        }
        item
    }

    /// Get a report by UUID.
    pub fn get_item(&self, id: &Uuid) -> Option<&ReportItem> {
        self.items.get(id)
    }

    /// Get a mutable reference to a report by UUID. Getting a mutable
    /// reference marks the session as modified.
    pub fn get_item_mut(&mut self, id: &Uuid) -> Option<&mut ReportItem> {
        if self.items.contains_key(id) {
            self.meta.modified = Utc::now();
            self.items.get_mut(id)
        } else {
            None
        }
    }

    /// Update the modified timestamp.
    pub fn touch(&mut self) {
        self.meta.modified = Utc::now();
    }

    pub fn item_count(&self) -> usize {
        self.items.len()
    }
}

impl Default for LabSession {
    fn default() -> Self {
        LabSession::new("", "")
    }
}

/// Session metadata stored in the serialized header.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionMetadata {
    /// Schema version (for migration compatibility)
    pub version: String,

    pub project_name: String,

    pub client: String,

    /// When the session was created
    pub created: DateTime<Utc>,

    /// When the session was last modified
    pub modified: DateTime<Utc>,
}

/// Lab-wide defaults applied to new reports.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionSettings {
    /// Default assumed specific gravity for zero-air-voids curves
    pub default_specific_gravity: String,

    /// Default required field compaction (% of MDD)
    pub default_required_compaction: String,

    /// Preferred gradation envelope id for compliance checks, if any
    pub preferred_spec_id: Option<String>,
}

impl Default for SessionSettings {
    fn default() -> Self {
        SessionSettings {
            default_specific_gravity: "2.70".to_string(),
            default_required_compaction: "95".to_string(),
            preferred_spec_id: None,
        }
    }
}
