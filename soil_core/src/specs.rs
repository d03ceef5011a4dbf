//! # Gradation Specifications
//!
//! Registry of predefined gradation envelopes and compliance checking of a
//! measured gradation curve against one.
//!
//! An envelope is a list of control points `(sieve opening, min..max percent
//! passing)`. Compliance matches each control point against the measured
//! curve by opening and marks it pass / fail / not-measured; the envelope as
//! a whole passes only when no control point fails and at least one was
//! actually measured.
//!
//! ## References
//!
//! - Saudi MOC General Specifications (base course / subbase gradations)
//! - ASTM C33 (concrete aggregate gradations)
//! - Asphalt Institute SP-2 (Superpave mixture gradation control points)

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

// Openings within this distance (mm) refer to the same sieve
const OPENING_TOLERANCE_MM: f64 = 0.001;

// ============================================================================
// Specification Types
// ============================================================================

/// One control point of a gradation envelope.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SpecLimit {
    /// Sieve opening (mm)
    pub sieve_opening: f64,
    /// Minimum percent passing
    pub min_passing: f64,
    /// Maximum percent passing
    pub max_passing: f64,
}

impl SpecLimit {
    pub const fn new(sieve_opening: f64, min_passing: f64, max_passing: f64) -> Self {
        Self { sieve_opening, min_passing, max_passing }
    }
}

/// A named gradation envelope. Control points are ordered coarse to fine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GradationSpec {
    /// Stable lookup id (e.g. "saudi_base_course_a")
    pub id: String,
    pub name: String,
    /// Issuing standard or agency
    pub standard: String,
    pub limits: Vec<SpecLimit>,
}

impl GradationSpec {
    fn new(id: &str, name: &str, standard: &str, limits: Vec<SpecLimit>) -> Self {
        Self {
            id: id.to_string(),
            name: name.to_string(),
            standard: standard.to_string(),
            limits,
        }
    }
}

// ============================================================================
// Predefined Envelopes
// ============================================================================

/// The built-in gradation envelopes.
pub static PREDEFINED_SPECS: Lazy<Vec<GradationSpec>> = Lazy::new(|| {
    vec![
        GradationSpec::new(
            "saudi_base_course_a",
            "Saudi MOC Base Course Class A",
            "Saudi MOC",
            vec![
                SpecLimit::new(50.0, 100.0, 100.0),
                SpecLimit::new(37.5, 70.0, 95.0),
                SpecLimit::new(25.0, 55.0, 85.0),
                SpecLimit::new(4.75, 30.0, 55.0),
                SpecLimit::new(2.00, 20.0, 40.0),
                SpecLimit::new(0.425, 10.0, 25.0),
                SpecLimit::new(0.075, 5.0, 12.0),
            ],
        ),
        GradationSpec::new(
            "saudi_subbase",
            "Saudi MOC Subbase",
            "Saudi MOC",
            vec![
                SpecLimit::new(50.0, 100.0, 100.0),
                SpecLimit::new(25.0, 60.0, 100.0),
                SpecLimit::new(4.75, 35.0, 70.0),
                SpecLimit::new(0.425, 10.0, 30.0),
                SpecLimit::new(0.075, 5.0, 15.0),
            ],
        ),
        GradationSpec::new(
            "astm_c33_fine",
            "ASTM C33 Fine Aggregate",
            "ASTM C33",
            vec![
                SpecLimit::new(9.5, 100.0, 100.0),
                SpecLimit::new(4.75, 95.0, 100.0),
                SpecLimit::new(2.36, 80.0, 100.0),
                SpecLimit::new(1.18, 50.0, 85.0),
                SpecLimit::new(0.600, 25.0, 60.0),
                SpecLimit::new(0.300, 5.0, 30.0),
                SpecLimit::new(0.150, 0.0, 10.0),
            ],
        ),
        GradationSpec::new(
            "astm_c33_size_57",
            "ASTM C33 Coarse Aggregate, Size No. 57",
            "ASTM C33",
            vec![
                SpecLimit::new(37.5, 100.0, 100.0),
                SpecLimit::new(25.0, 95.0, 100.0),
                SpecLimit::new(12.5, 25.0, 60.0),
                SpecLimit::new(4.75, 0.0, 10.0),
                SpecLimit::new(2.36, 0.0, 5.0),
            ],
        ),
        GradationSpec::new(
            "astm_c33_size_67",
            "ASTM C33 Coarse Aggregate, Size No. 67",
            "ASTM C33",
            vec![
                SpecLimit::new(25.0, 100.0, 100.0),
                SpecLimit::new(19.0, 90.0, 100.0),
                SpecLimit::new(9.5, 20.0, 55.0),
                SpecLimit::new(4.75, 0.0, 10.0),
                SpecLimit::new(2.36, 0.0, 5.0),
            ],
        ),
        GradationSpec::new(
            "superpave_19",
            "Superpave 19 mm Nominal Maximum",
            "Asphalt Institute SP-2",
            vec![
                SpecLimit::new(25.0, 100.0, 100.0),
                SpecLimit::new(19.0, 90.0, 100.0),
                // Primary control sieve, pinned at 90
                SpecLimit::new(12.5, 90.0, 90.0),
                SpecLimit::new(2.36, 23.0, 49.0),
                SpecLimit::new(0.075, 2.0, 8.0),
            ],
        ),
    ]
});

/// Look up a predefined envelope by id.
pub fn find_spec(id: &str) -> Option<&'static GradationSpec> {
    PREDEFINED_SPECS.iter().find(|s| s.id == id)
}

/// All predefined envelopes, for selection lists.
pub fn all_specs() -> &'static [GradationSpec] {
    &PREDEFINED_SPECS
}

// ============================================================================
// Compliance Checking
// ============================================================================

/// Outcome of one control point, or of the whole envelope.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ComplianceStatus {
    Pass,
    Fail,
    /// The measured curve has no sieve at this opening
    NotMeasured,
}

impl ComplianceStatus {
    pub fn code(&self) -> &'static str {
        match self {
            ComplianceStatus::Pass => "SPEC_PASS",
            ComplianceStatus::Fail => "SPEC_FAIL",
            ComplianceStatus::NotMeasured => "SPEC_NOT_MEASURED",
        }
    }

    /// Display color for compliance tables
    pub fn color_hex(&self) -> &'static str {
        match self {
            ComplianceStatus::Pass => "#4CAF50",
            ComplianceStatus::Fail => "#F44336",
            ComplianceStatus::NotMeasured => "#9E9E9E",
        }
    }
}

/// One control point checked against the measured curve.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpecCheck {
    pub sieve_opening: f64,
    pub min_passing: f64,
    pub max_passing: f64,
    /// Measured percent passing at this opening, when the stack includes it
    pub measured: Option<f64>,
    pub status: ComplianceStatus,
}

/// Full compliance report for one envelope.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GradationCompliance {
    pub spec_id: String,
    pub spec_name: String,
    pub checks: Vec<SpecCheck>,
    pub overall: ComplianceStatus,
}

impl GradationCompliance {
    pub fn is_compliant(&self) -> bool {
        self.overall == ComplianceStatus::Pass
    }
}

/// Check a measured gradation curve against an envelope.
///
/// `curve` is `(opening mm, percent passing)` pairs from a sieve analysis.
/// Control points with no matching sieve in the curve are reported as
/// [`ComplianceStatus::NotMeasured`] and do not fail the envelope; the
/// envelope as a whole passes only when nothing fails and at least one
/// control point was measured.
pub fn check_compliance(curve: &[(f64, f64)], spec: &GradationSpec) -> GradationCompliance {
    let checks: Vec<SpecCheck> = spec
        .limits
        .iter()
        .map(|limit| {
            let measured = curve
                .iter()
                .find(|(opening, _)| (opening - limit.sieve_opening).abs() < OPENING_TOLERANCE_MM)
                .map(|&(_, passing)| passing);
            let status = match measured {
                Some(p) if p >= limit.min_passing && p <= limit.max_passing => {
                    ComplianceStatus::Pass
                }
                Some(_) => ComplianceStatus::Fail,
                None => ComplianceStatus::NotMeasured,
            };
            SpecCheck {
                sieve_opening: limit.sieve_opening,
                min_passing: limit.min_passing,
                max_passing: limit.max_passing,
                measured,
                status,
            }
        })
        .collect();

    let any_fail = checks.iter().any(|c| c.status == ComplianceStatus::Fail);
    let any_measured = checks.iter().any(|c| c.measured.is_some());
    let overall = if any_fail {
        ComplianceStatus::Fail
    } else if any_measured {
        ComplianceStatus::Pass
    } else {
        ComplianceStatus::NotMeasured
    };

    GradationCompliance {
        spec_id: spec.id.clone(),
        spec_name: spec.name.clone(),
        checks,
        overall,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_registry_contains_known_specs() {
        assert_eq!(all_specs().len(), 6);
        let base = find_spec("saudi_base_course_a").expect("registered");
        assert_eq!(base.limits.len(), 7);
        assert_eq!(base.limits[0].sieve_opening, 50.0);
        assert!(find_spec("no_such_spec").is_none());
    }

    #[test]
    fn test_compliant_base_course_gradation() {
        let spec = find_spec("saudi_base_course_a").unwrap();
        let curve = [
            (50.0, 100.0),
            (37.5, 85.0),
            (25.0, 70.0),
            (4.75, 40.0),
            (2.00, 30.0),
            (0.425, 18.0),
            (0.075, 8.0),
        ];
        let report = check_compliance(&curve, spec);
        assert!(report.is_compliant());
        assert!(report.checks.iter().all(|c| c.status == ComplianceStatus::Pass));
    }

    #[test]
    fn test_failing_control_point_fails_envelope() {
        let spec = find_spec("saudi_subbase").unwrap();
        let curve = [
            (50.0, 100.0),
            (25.0, 80.0),
            (4.75, 50.0),
            (0.425, 20.0),
            (0.075, 22.0), // envelope allows 5..15
        ];
        let report = check_compliance(&curve, spec);
        assert_eq!(report.overall, ComplianceStatus::Fail);
        let fines_check = report
            .checks
            .iter()
            .find(|c| c.sieve_opening == 0.075)
            .unwrap();
        assert_eq!(fines_check.status, ComplianceStatus::Fail);
        assert_eq!(fines_check.measured, Some(22.0));
    }

    #[test]
    fn test_missing_sieves_do_not_fail() {
        let spec = find_spec("saudi_subbase").unwrap();
        // Stack without the 50 mm and 0.425 mm sieves
        let curve = [(25.0, 80.0), (4.75, 50.0), (0.075, 10.0)];
        let report = check_compliance(&curve, spec);
        assert_eq!(report.overall, ComplianceStatus::Pass);
        let not_measured = report
            .checks
            .iter()
            .filter(|c| c.status == ComplianceStatus::NotMeasured)
            .count();
        assert_eq!(not_measured, 2);
    }

    #[test]
    fn test_empty_curve_reads_not_measured() {
        let spec = find_spec("astm_c33_fine").unwrap();
        let report = check_compliance(&[], spec);
        assert_eq!(report.overall, ComplianceStatus::NotMeasured);
        assert!(!report.is_compliant());
    }

    #[test]
    fn test_boundary_values_pass() {
        let spec = find_spec("astm_c33_fine").unwrap();
        // Exactly on the envelope edges
        let curve = [(4.75, 95.0), (0.150, 10.0)];
        let report = check_compliance(&curve, spec);
        assert_eq!(report.overall, ComplianceStatus::Pass);
    }

    #[test]
    fn test_superpave_pinned_control_point() {
        let spec = find_spec("superpave_19").unwrap();
        let exact = check_compliance(&[(12.5, 90.0)], spec);
        assert_eq!(exact.overall, ComplianceStatus::Pass);
        let off = check_compliance(&[(12.5, 89.0)], spec);
        assert_eq!(off.overall, ComplianceStatus::Fail);
    }

    #[test]
    fn test_compliance_serde_roundtrip() {
        let spec = find_spec("astm_c33_size_57").unwrap();
        let report = check_compliance(&[(37.5, 100.0), (12.5, 40.0)], spec);
        let json = serde_json::to_string(&report).unwrap();
        let back: GradationCompliance = serde_json::from_str(&json).unwrap();
        assert_eq!(report, back);
    }
}
