//! # Atterberg Limits Calculation
//!
//! Liquid limit, plastic limit, and plasticity index per ASTM D4318, with a
//! plasticity-chart classification of the result.
//!
//! ## Methods
//!
//! - **Multi-point** (two or more usable LL samples): water content is
//!   regressed on log10(blows); the liquid limit is the regression value at
//!   25 blows. The flow curve (slope, intercept, R², plotting endpoints at
//!   10 and 40 blows) is reported alongside.
//! - **One-point** (exactly one LL sample): `LL = w * (N/25)^0.121` using the
//!   ASTM D4318 empirical exponent.
//!
//! The plastic limit is the arithmetic mean of the usable PL sample water
//! contents. Entry-time validation is exposed separately so callers can
//! reject bad samples with structured errors before they reach the list.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::classify::{classify_plasticity, PlasticityClassification};
use crate::errors::{CalcError, Severity, ValidationReport, Warning};
use crate::fitting;
use crate::parse::{parse_f64, parse_i64};
use crate::session::TestInfo;

/// ASTM D4318 one-point method exponent
const ONE_POINT_EXPONENT: f64 = 0.121;

// ============================================================================
// Input Records
// ============================================================================

/// One liquid-limit trial: blow count and oven water content. Raw text
/// fields; unparsable entries count as missing inside the computation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LiquidLimitSample {
    pub id: Uuid,
    pub blows: String,
    /// Water content (%)
    pub water_content: String,
}

impl LiquidLimitSample {
    pub fn new(blows: impl Into<String>, water_content: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            blows: blows.into(),
            water_content: water_content.into(),
        }
    }
}

/// One plastic-limit trial: oven water content of a rolled thread.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlasticLimitSample {
    pub id: Uuid,
    /// Water content (%)
    pub water_content: String,
}

impl PlasticLimitSample {
    pub fn new(water_content: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            water_content: water_content.into(),
        }
    }
}

/// Complete Atterberg test input.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AtterbergTestData {
    #[serde(default)]
    pub test_info: TestInfo,
    pub liquid_limit_samples: Vec<LiquidLimitSample>,
    pub plastic_limit_samples: Vec<PlasticLimitSample>,
}

// ============================================================================
// Entry Validation
// ============================================================================

/// Validate a liquid-limit sample before it is accepted into the list.
///
/// Errors reject the sample; warnings are advisory and the sample may still
/// be accepted.
pub fn validate_liquid_limit_sample(blows: &str, water_content: &str) -> ValidationReport {
    let mut report = ValidationReport::new();

    match parse_i64(blows) {
        Some(b) if b > 0 => {
            if b < 10 {
                report.add_warning(Warning::new(
                    "LOW_BLOWS",
                    "Blow count is very low.",
                    Severity::Medium,
                ));
            } else if b > 40 {
                report.add_warning(Warning::new(
                    "HIGH_BLOWS",
                    "Blow count is very high.",
                    Severity::Medium,
                ));
            }
        }
        _ => {
            report.add_error(CalcError::invalid_input(
                "blows",
                blows,
                "Blows must be a positive integer",
            ));
        }
    }

    match parse_f64(water_content) {
        Some(w) if w > 0.0 => {
            if w > 120.0 {
                report.add_warning(Warning::new(
                    "HIGH_WATER_CONTENT",
                    "Water content above 120% is unusual for a liquid limit trial.",
                    Severity::High,
                ));
            }
        }
        _ => {
            report.add_error(CalcError::invalid_input(
                "water_content",
                water_content,
                "Water content must be a positive number",
            ));
        }
    }

    report
}

/// Validate a plastic-limit sample before it is accepted into the list.
pub fn validate_plastic_limit_sample(water_content: &str) -> ValidationReport {
    let mut report = ValidationReport::new();

    match parse_f64(water_content) {
        Some(w) if w > 0.0 => {
            if w > 60.0 {
                report.add_warning(Warning::new(
                    "HIGH_PL_WATER_CONTENT",
                    "Water content above 60% is unusual for a plastic limit trial.",
                    Severity::Low,
                ));
            }
        }
        _ => {
            report.add_error(CalcError::invalid_input(
                "water_content",
                water_content,
                "Water content must be a positive number",
            ));
        }
    }

    report
}

// ============================================================================
// Results
// ============================================================================

/// Which liquid-limit method produced the result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AtterbergMethod {
    OnePoint,
    MultiPoint,
}

impl AtterbergMethod {
    pub fn code(&self) -> &'static str {
        match self {
            AtterbergMethod::OnePoint => "ONE_POINT",
            AtterbergMethod::MultiPoint => "MULTI_POINT",
        }
    }
}

/// A point on the flow-curve plot (natural blow count, water content).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FlowPoint {
    pub blows: f64,
    pub water_content: f64,
}

/// Best-fit flow curve from the multi-point method, in log10(blows) space.
/// The endpoints are evaluated at 10 and 40 blows for plotting.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FlowCurve {
    /// Slope in water content per log10(blows)
    pub slope: f64,
    pub intercept: f64,
    pub r_squared: f64,
    pub line_start: FlowPoint,
    pub line_end: FlowPoint,
}

/// Atterberg limits result.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AtterbergResult {
    /// Liquid limit (%)
    pub liquid_limit: f64,
    /// Plastic limit (%), mean of usable PL trials
    pub plastic_limit: f64,
    /// Plasticity index LL - PL (may be negative for odd data)
    pub plasticity_index: f64,
    /// PI <= 0 reads as non-plastic
    pub is_non_plastic: bool,
    pub method: AtterbergMethod,
    /// Present only for the multi-point method
    pub flow_curve: Option<FlowCurve>,
    /// Plasticity-chart classification with data-quality confidence
    pub classification: PlasticityClassification,
}

// ============================================================================
// Calculation
// ============================================================================

/// Compute the Atterberg limits from raw sample lists.
///
/// Returns `None` when the data cannot support a result: no usable PL
/// sample, fewer than the method's minimum of usable LL samples, or a
/// degenerate flow curve (all trials at the same blow count).
///
/// # Example
///
/// ```rust
/// use soil_core::calculations::atterberg::{
///     compute_limits, AtterbergTestData, LiquidLimitSample, PlasticLimitSample,
/// };
///
/// let data = AtterbergTestData {
///     liquid_limit_samples: vec![
///         LiquidLimitSample::new("15", "42.0"),
///         LiquidLimitSample::new("25", "38.0"),
///         LiquidLimitSample::new("35", "34.0"),
///     ],
///     plastic_limit_samples: vec![
///         PlasticLimitSample::new("36.0"),
///         PlasticLimitSample::new("37.0"),
///     ],
///     ..Default::default()
/// };
///
/// let result = compute_limits(&data).expect("enough usable samples");
/// assert!((result.plastic_limit - 36.5).abs() < 1e-9);
/// ```
pub fn compute_limits(data: &AtterbergTestData) -> Option<AtterbergResult> {
    let pl_values: Vec<f64> = data
        .plastic_limit_samples
        .iter()
        .filter_map(|s| parse_f64(&s.water_content))
        .collect();
    if pl_values.is_empty() {
        return None;
    }
    let plastic_limit = pl_values.iter().sum::<f64>() / pl_values.len() as f64;

    let (liquid_limit, method, flow_curve, blow_counts, r_squared) =
        if data.liquid_limit_samples.len() == 1 {
            let sample = &data.liquid_limit_samples[0];
            let blows = parse_i64(&sample.blows).filter(|b| *b > 0)?;
            let wc = parse_f64(&sample.water_content)?;
            let ll = wc * (blows as f64 / 25.0).powf(ONE_POINT_EXPONENT);
            (ll, AtterbergMethod::OnePoint, None, Vec::new(), None)
        } else {
            let points: Vec<(f64, f64)> = data
                .liquid_limit_samples
                .iter()
                .filter_map(|s| {
                    let blows = parse_i64(&s.blows).filter(|b| *b > 0)?;
                    let wc = parse_f64(&s.water_content)?;
                    Some((blows as f64, wc))
                })
                .collect();
            if points.len() < 2 {
                return None;
            }

            let log_points: Vec<(f64, f64)> =
                points.iter().map(|&(b, w)| (b.log10(), w)).collect();
            let fit = fitting::linear_regression(&log_points)?;
            let ll = fit.value_at(25.0f64.log10());

            let flow = FlowCurve {
                slope: fit.slope,
                intercept: fit.intercept,
                r_squared: fit.r_squared,
                line_start: FlowPoint {
                    blows: 10.0,
                    water_content: fit.value_at(10.0f64.log10()),
                },
                line_end: FlowPoint {
                    blows: 40.0,
                    water_content: fit.value_at(40.0f64.log10()),
                },
            };
            let counts: Vec<f64> = points.iter().map(|&(b, _)| b).collect();
            let r2 = fit.r_squared;
            (ll, AtterbergMethod::MultiPoint, Some(flow), counts, Some(r2))
        };

    let plasticity_index = liquid_limit - plastic_limit;
    let classification =
        classify_plasticity(liquid_limit, plasticity_index, &blow_counts, r_squared);

    Some(AtterbergResult {
        liquid_limit,
        plastic_limit,
        plasticity_index,
        is_non_plastic: plasticity_index <= 0.0,
        method,
        flow_curve,
        classification,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classify::PlasticitySymbol;

    fn approx_eq(a: f64, b: f64, tol: f64) -> bool {
        (a - b).abs() < tol
    }

    fn multi_point_data() -> AtterbergTestData {
        AtterbergTestData {
            liquid_limit_samples: vec![
                LiquidLimitSample::new("15", "42.0"),
                LiquidLimitSample::new("25", "38.0"),
                LiquidLimitSample::new("35", "34.0"),
            ],
            plastic_limit_samples: vec![
                PlasticLimitSample::new("36.0"),
                PlasticLimitSample::new("37.0"),
            ],
            ..Default::default()
        }
    }

    #[test]
    fn test_multi_point_liquid_limit() {
        let result = compute_limits(&multi_point_data()).expect("computes");

        assert_eq!(result.method, AtterbergMethod::MultiPoint);
        assert!(approx_eq(result.plastic_limit, 36.5, 1e-9));
        // Regression of wc on log10(blows) evaluated at 25 blows
        assert!(
            approx_eq(result.liquid_limit, 37.459, 0.01),
            "LL = {}",
            result.liquid_limit
        );
        assert!(approx_eq(result.plasticity_index, 0.959, 0.01));
        assert!(!result.is_non_plastic);
        // Low PI at LL < 50 plots below the A-line
        assert_eq!(result.classification.symbol, PlasticitySymbol::Ml);
    }

    #[test]
    fn test_multi_point_flow_curve() {
        let result = compute_limits(&multi_point_data()).unwrap();
        let flow = result.flow_curve.expect("multi-point reports the fit");

        assert!(flow.slope < 0.0, "water content falls with blow count");
        assert!(flow.r_squared > 0.98, "r2 = {}", flow.r_squared);
        assert_eq!(flow.line_start.blows, 10.0);
        assert_eq!(flow.line_end.blows, 40.0);
        assert!(
            flow.line_start.water_content > flow.line_end.water_content,
            "endpoints follow the fitted slope"
        );

        // All quality bumps apply: 3 points, high r2, 25 blows in window
        assert!(approx_eq(result.classification.confidence, 0.99, 1e-9));
    }

    #[test]
    fn test_one_point_method() {
        let data = AtterbergTestData {
            liquid_limit_samples: vec![LiquidLimitSample::new("23", "41.5")],
            plastic_limit_samples: vec![PlasticLimitSample::new("22.0")],
            ..Default::default()
        };
        let result = compute_limits(&data).expect("computes");

        assert_eq!(result.method, AtterbergMethod::OnePoint);
        // LL = 41.5 * (23/25)^0.121
        assert!(
            approx_eq(result.liquid_limit, 41.083, 0.01),
            "LL = {}",
            result.liquid_limit
        );
        assert!(result.flow_curve.is_none());
        // One-point method carries no fit quality or blow window
        assert!(approx_eq(result.classification.confidence, 0.80, 1e-9));
    }

    #[test]
    fn test_one_point_unparsable_returns_none() {
        let data = AtterbergTestData {
            liquid_limit_samples: vec![LiquidLimitSample::new("abc", "41.5")],
            plastic_limit_samples: vec![PlasticLimitSample::new("22.0")],
            ..Default::default()
        };
        assert!(compute_limits(&data).is_none());
    }

    #[test]
    fn test_requires_usable_plastic_limit() {
        let mut data = multi_point_data();
        data.plastic_limit_samples = vec![PlasticLimitSample::new("")];
        assert!(compute_limits(&data).is_none(), "no usable PL sample");

        data.plastic_limit_samples =
            vec![PlasticLimitSample::new("x"), PlasticLimitSample::new("24.0")];
        let result = compute_limits(&data).expect("one usable PL sample suffices");
        assert!(approx_eq(result.plastic_limit, 24.0, 1e-9));
    }

    #[test]
    fn test_multi_point_needs_two_usable_samples() {
        let data = AtterbergTestData {
            liquid_limit_samples: vec![
                LiquidLimitSample::new("25", "38.0"),
                LiquidLimitSample::new("", ""),
            ],
            plastic_limit_samples: vec![PlasticLimitSample::new("20.0")],
            ..Default::default()
        };
        assert!(compute_limits(&data).is_none());
    }

    #[test]
    fn test_identical_blow_counts_are_degenerate() {
        let data = AtterbergTestData {
            liquid_limit_samples: vec![
                LiquidLimitSample::new("25", "40.0"),
                LiquidLimitSample::new("25", "42.0"),
            ],
            plastic_limit_samples: vec![PlasticLimitSample::new("20.0")],
            ..Default::default()
        };
        assert!(compute_limits(&data).is_none(), "flow curve has no spread");
    }

    #[test]
    fn test_non_plastic_flag() {
        let data = AtterbergTestData {
            liquid_limit_samples: vec![
                LiquidLimitSample::new("18", "21.0"),
                LiquidLimitSample::new("32", "19.0"),
            ],
            plastic_limit_samples: vec![PlasticLimitSample::new("25.0")],
            ..Default::default()
        };
        let result = compute_limits(&data).unwrap();
        assert!(result.plasticity_index <= 0.0);
        assert!(result.is_non_plastic);
    }

    #[test]
    fn test_validate_liquid_limit_sample() {
        assert!(validate_liquid_limit_sample("25", "38.0").is_valid());

        let bad_blows = validate_liquid_limit_sample("0", "38.0");
        assert!(!bad_blows.is_valid());
        assert_eq!(bad_blows.errors[0].error_code(), "INVALID_INPUT");

        let low = validate_liquid_limit_sample("8", "38.0");
        assert!(low.is_valid(), "warnings do not reject");
        assert_eq!(low.warnings[0].code, "LOW_BLOWS");
        assert_eq!(low.warnings[0].severity, Severity::Medium);

        let high = validate_liquid_limit_sample("45", "38.0");
        assert_eq!(high.warnings[0].code, "HIGH_BLOWS");

        let wet = validate_liquid_limit_sample("25", "150.0");
        assert_eq!(wet.warnings[0].code, "HIGH_WATER_CONTENT");
        assert_eq!(wet.warnings[0].severity, Severity::High);

        let garbage = validate_liquid_limit_sample("x", "-1");
        assert_eq!(garbage.errors.len(), 2);
    }

    #[test]
    fn test_validate_plastic_limit_sample() {
        assert!(validate_plastic_limit_sample("22.0").is_valid());
        assert!(!validate_plastic_limit_sample("").is_valid());

        let high = validate_plastic_limit_sample("75.0");
        assert!(high.is_valid());
        assert_eq!(high.warnings[0].code, "HIGH_PL_WATER_CONTENT");
        assert_eq!(high.warnings[0].severity, Severity::Low);
    }

    #[test]
    fn test_result_serialization_roundtrip() {
        let result = compute_limits(&multi_point_data()).unwrap();
        let json = serde_json::to_string_pretty(&result).unwrap();
        assert!(json.contains("liquid_limit"));
        assert!(json.contains("MultiPoint"));

        let back: AtterbergResult = serde_json::from_str(&json).unwrap();
        assert_eq!(result, back);
    }
}
