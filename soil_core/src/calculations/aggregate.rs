//! # Aggregate Quality
//!
//! Los Angeles abrasion loss (ASTM C131) and particle shape indices
//! (flakiness and elongation per BS 812). Both are straight mass-percentage
//! reductions; results expose limit checks against entered or standard spec
//! limits.

use serde::{Deserialize, Serialize};

use crate::parse::{parse_f64, parse_f64_or};
use crate::session::TestInfo;

/// Standard abrasion loss limit (%) for base course aggregate
const DEFAULT_ABRASION_LIMIT_PERCENT: f64 = 40.0;
/// Standard flakiness/elongation limit (%)
const DEFAULT_SHAPE_LIMIT_PERCENT: f64 = 35.0;

// ============================================================================
// LA Abrasion
// ============================================================================

/// ASTM C131 sample grading, set by the coarse fraction of the aggregate.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum LaGrading {
    #[default]
    A,
    B,
    C,
    D,
}

impl LaGrading {
    pub const ALL: [LaGrading; 4] = [LaGrading::A, LaGrading::B, LaGrading::C, LaGrading::D];

    pub fn display_name(&self) -> &'static str {
        match self {
            LaGrading::A => "Grading A",
            LaGrading::B => "Grading B",
            LaGrading::C => "Grading C",
            LaGrading::D => "Grading D",
        }
    }
}

/// LA abrasion test input.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LaAbrasionData {
    #[serde(default)]
    pub test_info: TestInfo,
    pub grading: LaGrading,
    /// Charge weight before the drum run (g)
    pub initial_weight: String,
    /// Weight retained on the No. 12 sieve after the run (g)
    pub final_weight: String,
    /// Acceptance limit (%); blank reads as 40
    pub spec_limit: String,
}

impl Default for LaAbrasionData {
    fn default() -> Self {
        LaAbrasionData {
            test_info: TestInfo::default(),
            grading: LaGrading::default(),
            initial_weight: String::new(),
            final_weight: String::new(),
            spec_limit: DEFAULT_ABRASION_LIMIT_PERCENT.to_string(),
        }
    }
}

/// LA abrasion result.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LaAbrasionResult {
    pub loss_weight_g: f64,
    pub percent_loss: f64,
}

impl LaAbrasionResult {
    /// Check the loss against a spec limit entry (blank reads as the
    /// standard 40%).
    pub fn within_limit(&self, spec_limit: &str) -> bool {
        self.percent_loss <= parse_f64_or(spec_limit, DEFAULT_ABRASION_LIMIT_PERCENT)
    }
}

/// Abrasion loss: `(initial - final) / initial * 100`.
///
/// `None` when a weight is missing, the initial weight is not positive, or
/// the sample gained weight (a weighing error).
pub fn calculate_la_abrasion(data: &LaAbrasionData) -> Option<LaAbrasionResult> {
    let initial = parse_f64(&data.initial_weight)?;
    let final_weight = parse_f64(&data.final_weight)?;
    if initial <= 0.0 || final_weight > initial {
        return None;
    }

    let loss_weight = initial - final_weight;
    Some(LaAbrasionResult {
        loss_weight_g: loss_weight,
        percent_loss: loss_weight / initial * 100.0,
    })
}

// ============================================================================
// Flakiness / Elongation
// ============================================================================

/// Particle shape test input.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FlakinessData {
    #[serde(default)]
    pub test_info: TestInfo,
    /// Sample weight (g)
    pub initial_weight: String,
    /// Weight passing the thickness gauge (g)
    pub flaky_weight: String,
    /// Weight retained on the length gauge (g)
    pub elongated_weight: String,
    /// Flakiness acceptance limit (%); blank reads as 35
    pub flakiness_spec_limit: String,
    /// Elongation acceptance limit (%); blank reads as 35
    pub elongation_spec_limit: String,
}

impl Default for FlakinessData {
    fn default() -> Self {
        FlakinessData {
            test_info: TestInfo::default(),
            initial_weight: String::new(),
            flaky_weight: String::new(),
            elongated_weight: String::new(),
            flakiness_spec_limit: DEFAULT_SHAPE_LIMIT_PERCENT.to_string(),
            elongation_spec_limit: DEFAULT_SHAPE_LIMIT_PERCENT.to_string(),
        }
    }
}

/// Particle shape result.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FlakinessResult {
    pub flakiness_index: f64,
    pub elongation_index: f64,
}

impl FlakinessResult {
    pub fn flakiness_within_limit(&self, spec_limit: &str) -> bool {
        self.flakiness_index <= parse_f64_or(spec_limit, DEFAULT_SHAPE_LIMIT_PERCENT)
    }

    pub fn elongation_within_limit(&self, spec_limit: &str) -> bool {
        self.elongation_index <= parse_f64_or(spec_limit, DEFAULT_SHAPE_LIMIT_PERCENT)
    }
}

/// Shape indices as mass percentages of the sample weight.
///
/// `None` when a weight is missing or the sample weight is not positive.
pub fn calculate_flakiness(data: &FlakinessData) -> Option<FlakinessResult> {
    let initial = parse_f64(&data.initial_weight)?;
    let flaky = parse_f64(&data.flaky_weight)?;
    let elongated = parse_f64(&data.elongated_weight)?;
    if initial <= 0.0 {
        return None;
    }

    Some(FlakinessResult {
        flakiness_index: flaky / initial * 100.0,
        elongation_index: elongated / initial * 100.0,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx_eq(a: f64, b: f64, tol: f64) -> bool {
        (a - b).abs() < tol
    }

    #[test]
    fn test_abrasion_loss() {
        let data = LaAbrasionData {
            initial_weight: "5000".to_string(),
            final_weight: "3750".to_string(),
            ..LaAbrasionData::default()
        };
        let result = calculate_la_abrasion(&data).expect("computes");
        assert!(approx_eq(result.loss_weight_g, 1250.0, 1e-9));
        assert!(approx_eq(result.percent_loss, 25.0, 1e-9));

        assert!(result.within_limit(&data.spec_limit), "25% is under the 40% default");
        assert!(result.within_limit(""), "blank limit reads as 40");
        assert!(!result.within_limit("20"));
    }

    #[test]
    fn test_abrasion_guards() {
        let gained = LaAbrasionData {
            initial_weight: "5000".to_string(),
            final_weight: "5100".to_string(),
            ..LaAbrasionData::default()
        };
        assert!(calculate_la_abrasion(&gained).is_none(), "sample cannot gain weight");

        let zero = LaAbrasionData {
            initial_weight: "0".to_string(),
            final_weight: "0".to_string(),
            ..LaAbrasionData::default()
        };
        assert!(calculate_la_abrasion(&zero).is_none());

        let missing = LaAbrasionData {
            initial_weight: "5000".to_string(),
            ..LaAbrasionData::default()
        };
        assert!(calculate_la_abrasion(&missing).is_none());
    }

    #[test]
    fn test_default_grading_and_limit() {
        let data = LaAbrasionData::default();
        assert_eq!(data.grading, LaGrading::A);
        assert_eq!(data.spec_limit, "40");
        assert_eq!(LaGrading::C.display_name(), "Grading C");
    }

    #[test]
    fn test_shape_indices() {
        let data = FlakinessData {
            initial_weight: "2000".to_string(),
            flaky_weight: "300".to_string(),
            elongated_weight: "440".to_string(),
            ..FlakinessData::default()
        };
        let result = calculate_flakiness(&data).expect("computes");
        assert!(approx_eq(result.flakiness_index, 15.0, 1e-9));
        assert!(approx_eq(result.elongation_index, 22.0, 1e-9));

        assert!(result.flakiness_within_limit(&data.flakiness_spec_limit));
        assert!(result.elongation_within_limit(""));
        assert!(!result.elongation_within_limit("20"));
    }

    #[test]
    fn test_shape_guards() {
        let zero = FlakinessData {
            initial_weight: "0".to_string(),
            flaky_weight: "10".to_string(),
            elongated_weight: "10".to_string(),
            ..FlakinessData::default()
        };
        assert!(calculate_flakiness(&zero).is_none());

        let missing = FlakinessData {
            initial_weight: "2000".to_string(),
            flaky_weight: "300".to_string(),
            ..FlakinessData::default()
        };
        assert!(calculate_flakiness(&missing).is_none());
    }

    #[test]
    fn test_serialization_roundtrip() {
        let data = LaAbrasionData {
            initial_weight: "5000".to_string(),
            final_weight: "3750".to_string(),
            ..LaAbrasionData::default()
        };
        let result = calculate_la_abrasion(&data).unwrap();
        let json = serde_json::to_string(&result).unwrap();
        let back: LaAbrasionResult = serde_json::from_str(&json).unwrap();
        assert_eq!(result, back);
    }
}
