//! # Laboratory Test Calculations
//!
//! This module contains all laboratory test types. Each test follows the
//! pattern:
//!
//! - `*TestData` / `*Data` - Raw bench inputs, strings as entered
//!   (JSON-serializable)
//! - `*Result` - Derived quantities (JSON-serializable)
//! - `calculate(data) -> Option<*Result>` - Pure calculation; `None` means
//!   the entries on hand are not yet enough to compute
//!
//! Helpers that reject bad entries outright (proving ring factors, mold
//! dimensions) return [`CalcResult`](crate::errors::CalcResult) instead.
//!
//! ## Available Tests
//!
//! - [`atterberg`] - Liquid limit, plastic limit, plasticity index
//! - [`sieve`] - Grain-size distribution and gradation indices
//! - [`proctor`] - Moisture-density relationship (compaction)
//! - [`cbr`] - California Bearing Ratio
//! - [`gravity`] - Specific gravity of soil solids
//! - [`field_density`] - Sand cone and relative density
//! - [`aggregate`] - LA abrasion and particle shape

pub mod aggregate;
pub mod atterberg;
pub mod cbr;
pub mod field_density;
pub mod gravity;
pub mod proctor;
pub mod sieve;

use serde::{Deserialize, Serialize};

use crate::session::TestInfo;

// Re-export commonly used types
pub use aggregate::{FlakinessData, FlakinessResult, LaAbrasionData, LaAbrasionResult};
pub use atterberg::{AtterbergResult, AtterbergTestData};
pub use cbr::{CbrResult, CbrTestData};
pub use field_density::{
    RelativeDensityData, RelativeDensityResult, SandConeResult, SandConeTestData,
};
pub use gravity::{GsCoarseSoilData, GsFineSoilData, GsResult};
pub use proctor::{ProctorResult, ProctorTestData};
pub use sieve::{SieveAnalysisData, SieveAnalysisResult};

/// Enum wrapper for all report types.
///
/// This allows storing heterogeneous test reports in a single collection
/// while maintaining type safety and clean serialization. Only the input
/// records are stored; results are recomputed on demand, so a report never
/// goes stale when its entries are edited.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum ReportItem {
    /// Atterberg limits report
    Atterberg(AtterbergTestData),
    /// Grain-size distribution report
    Sieve(SieveAnalysisData),
    /// Moisture-density relationship report
    Proctor(ProctorTestData),
    /// California Bearing Ratio report
    Cbr(CbrTestData),
    /// Specific gravity, pycnometer method
    GsFine(GsFineSoilData),
    /// Specific gravity, weigh-in-water method
    GsCoarse(GsCoarseSoilData),
    /// Sand cone field density report
    SandCone(SandConeTestData),
    /// Relative density of cohesionless soil
    RelativeDensity(RelativeDensityData),
    /// Los Angeles abrasion report
    LaAbrasion(LaAbrasionData),
    /// Flakiness and elongation report
    Flakiness(FlakinessData),
}

impl ReportItem {
    /// Specimen metadata for any report kind.
    pub fn test_info(&self) -> &TestInfo {
        match self {
            ReportItem::Atterberg(d) => &d.test_info,
            ReportItem::Sieve(d) => &d.test_info,
            ReportItem::Proctor(d) => &d.test_info,
            ReportItem::Cbr(d) => &d.test_info,
            ReportItem::GsFine(d) => &d.test_info,
            ReportItem::GsCoarse(d) => &d.test_info,
            ReportItem::SandCone(d) => &d.test_info,
            ReportItem::RelativeDensity(d) => &d.test_info,
            ReportItem::LaAbrasion(d) => &d.test_info,
            ReportItem::Flakiness(d) => &d.test_info,
        }
    }

    /// Get the sample number this report belongs to
    pub fn label(&self) -> &str {
        &self.test_info().sample_no
    }

    /// Get the test type as a display string
    pub fn test_type(&self) -> &'static str {
        match self {
            ReportItem::Atterberg(_) => "Atterberg Limits",
            ReportItem::Sieve(_) => "Sieve Analysis",
            ReportItem::Proctor(_) => "Proctor Compaction",
            ReportItem::Cbr(_) => "CBR",
            ReportItem::GsFine(_) => "Specific Gravity (Fine)",
            ReportItem::GsCoarse(_) => "Specific Gravity (Coarse)",
            ReportItem::SandCone(_) => "Field Density (Sand Cone)",
            ReportItem::RelativeDensity(_) => "Relative Density",
            ReportItem::LaAbrasion(_) => "LA Abrasion",
            ReportItem::Flakiness(_) => "Flakiness & Elongation",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_report_item_label_and_type() {
        let mut data = ProctorTestData::default();
        data.test_info.sample_no = "BH-3/S-7".to_string();
        let item = ReportItem::Proctor(data);

        assert_eq!(item.label(), "BH-3/S-7");
        assert_eq!(item.test_type(), "Proctor Compaction");
    }

    #[test]
    fn test_report_item_serde_tag() {
        let item = ReportItem::LaAbrasion(LaAbrasionData::default());
        let json = serde_json::to_string(&item).unwrap();
        assert!(json.contains("\"type\":\"LaAbrasion\""));

        let back: ReportItem = serde_json::from_str(&json).unwrap();
        assert_eq!(back.test_type(), "LA Abrasion");
    }
}
