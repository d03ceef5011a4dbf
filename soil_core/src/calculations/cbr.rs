//! # CBR (California Bearing Ratio) Calculation
//!
//! Penetration-test evaluation per ASTM D1883: zero-correction of the
//! load-penetration curve, load interpolation at the standard 2.5 mm and
//! 5.0 mm penetrations, CBR percentages against reference loads, and an
//! insights block (strength rating, stiffness/strength correlations, curve
//! interpretation).
//!
//! ## Zero correction
//!
//! A specimen that seats badly shows an initial segment steeper than the
//! rest of the curve with a load offset at the origin. Correction projects
//! that initial segment back to load = 0 and shifts every penetration by the
//! resulting offset. When the steepest rise occurs later in the curve the
//! early flat region is genuine material response and no correction is
//! applied. One pass is idempotent: on a corrected curve the projected
//! offset is zero.
//!
//! ## References
//!
//! - ASTM D1883 (CBR of laboratory-compacted soils, correction procedure)
//! - AASHTO correlations for resilient modulus and subgrade modulus

use serde::{Deserialize, Serialize};

use crate::classify::Recommendation;
use crate::errors::{CalcError, CalcResult};
use crate::fitting;
use crate::parse::{parse_f64, parse_f64_or};
use crate::session::TestInfo;

// Standard crushed-stone reference loads (kN)
const STANDARD_LOAD_2_5_KN: f64 = 13.34;
const STANDARD_LOAD_5_0_KN: f64 = 20.01;

// Target penetrations (mm)
const PENETRATION_SHALLOW_MM: f64 = 2.5;
const PENETRATION_DEEP_MM: f64 = 5.0;
/// A test run to less than this penetration (mm) stopped early
const FULL_PENETRATION_MM: f64 = 7.5;

/// Offsets at or below this (mm) are noise, not a seating error
const CORRECTION_OFFSET_THRESHOLD_MM: f64 = 0.001;

// Empirical correlation constants; bands express the scatter of the source
// correlations, not derived physics
const RESILIENT_MODULUS_BAND: (f64, f64) = (0.80, 1.20);
/// Su(kPa) per CBR% for soft cohesive soils
const SHEAR_STRENGTH_FACTOR: f64 = 20.0;
const SHEAR_STRENGTH_BAND: (f64, f64) = (0.75, 1.25);
/// The Su correlation is invalid above this CBR
const SHEAR_STRENGTH_MAX_CBR: f64 = 15.0;
/// k (MN/m3) per CBR%
const SUBGRADE_MODULUS_FACTOR: f64 = 10.0;

// ============================================================================
// Input Records
// ============================================================================

/// Pavement layer the specimen is tested for. Controls the default
/// surcharge mass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CbrDesignType {
    Subgrade,
    Subbase,
    BaseCourse,
}

impl CbrDesignType {
    pub const ALL: [CbrDesignType; 3] = [
        CbrDesignType::Subgrade,
        CbrDesignType::Subbase,
        CbrDesignType::BaseCourse,
    ];

    /// Default surcharge mass (kg) for this layer
    pub fn default_surcharge(&self) -> &'static str {
        match self {
            CbrDesignType::Subgrade => "2.27",
            CbrDesignType::Subbase | CbrDesignType::BaseCourse => "4.54",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            CbrDesignType::Subgrade => "Subgrade",
            CbrDesignType::Subbase => "Subbase",
            CbrDesignType::BaseCourse => "Base Course",
        }
    }
}

/// One reading of the load-penetration curve.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CbrPoint {
    /// Penetration (mm)
    pub penetration_mm: f64,
    /// Piston load (kN)
    pub load_kn: f64,
}

impl CbrPoint {
    pub fn new(penetration_mm: f64, load_kn: f64) -> Self {
        Self { penetration_mm, load_kn }
    }
}

/// Build a curve point from a dial reading and the proving ring factor.
///
/// `load = dial_reading * factor`; the factor must parse to a positive
/// number.
pub fn point_from_dial(
    penetration_mm: f64,
    dial_reading: f64,
    proving_ring_factor: &str,
) -> CalcResult<CbrPoint> {
    let factor = parse_f64(proving_ring_factor)
        .filter(|f| *f > 0.0)
        .ok_or_else(|| {
            CalcError::invalid_input(
                "proving_ring_factor",
                proving_ring_factor,
                "Proving ring factor must be a positive number",
            )
        })?;
    Ok(CbrPoint::new(penetration_mm, dial_reading * factor))
}

/// Complete CBR test input. Reference loads default to the standard
/// crushed-stone values and may be overridden per agency requirements.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CbrTestData {
    #[serde(default)]
    pub test_info: TestInfo,
    pub design_type: CbrDesignType,
    /// Surcharge mass (kg)
    pub surcharge_weight: String,
    /// Soaking period (days)
    pub soaking_days: String,
    /// Proving ring factor (kN per dial division)
    pub proving_ring_factor: String,
    /// Reference load at 2.5 mm (kN)
    pub reference_load_2_5: String,
    /// Reference load at 5.0 mm (kN)
    pub reference_load_5_0: String,
    /// Curve readings ordered by penetration
    pub points: Vec<CbrPoint>,
}

impl CbrTestData {
    pub fn new(design_type: CbrDesignType) -> Self {
        CbrTestData {
            test_info: TestInfo::new(),
            design_type,
            surcharge_weight: design_type.default_surcharge().to_string(),
            soaking_days: "4".to_string(),
            proving_ring_factor: String::new(),
            reference_load_2_5: STANDARD_LOAD_2_5_KN.to_string(),
            reference_load_5_0: STANDARD_LOAD_5_0_KN.to_string(),
            points: Vec::new(),
        }
    }
}

impl Default for CbrTestData {
    fn default() -> Self {
        CbrTestData::new(CbrDesignType::Subgrade)
    }
}

// ============================================================================
// Results
// ============================================================================

/// Outcome message code for the display layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CbrMessage {
    Success,
    /// CBR@5.0 exceeded CBR@2.5; standard practice calls for a retest
    RetestRecommended,
}

impl CbrMessage {
    pub fn code(&self) -> &'static str {
        match self {
            CbrMessage::Success => "CBR_SUCCESS",
            CbrMessage::RetestRecommended => "CBR_RETEST_RECOMMENDED",
        }
    }
}

/// Subgrade quality rating by fixed CBR thresholds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CbrRating {
    Excellent,
    VeryGood,
    Good,
    Fair,
    Poor,
    VeryPoor,
}

impl CbrRating {
    pub fn from_cbr(cbr: f64) -> Self {
        match cbr {
            c if c >= 80.0 => CbrRating::Excellent,
            c if c >= 30.0 => CbrRating::VeryGood,
            c if c >= 20.0 => CbrRating::Good,
            c if c >= 8.0 => CbrRating::Fair,
            c if c >= 4.0 => CbrRating::Poor,
            _ => CbrRating::VeryPoor,
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            CbrRating::Excellent => "CBR_EXCELLENT",
            CbrRating::VeryGood => "CBR_VERY_GOOD",
            CbrRating::Good => "CBR_GOOD",
            CbrRating::Fair => "CBR_FAIR",
            CbrRating::Poor => "CBR_POOR",
            CbrRating::VeryPoor => "CBR_VERY_POOR",
        }
    }

    /// Display color for rating badges
    pub fn color_hex(&self) -> &'static str {
        match self {
            CbrRating::Excellent => "#4CAF50",
            CbrRating::VeryGood => "#8BC34A",
            CbrRating::Good => "#CDDC39",
            CbrRating::Fair => "#FFEB3B",
            CbrRating::Poor => "#FF9800",
            CbrRating::VeryPoor => "#F44336",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            CbrRating::Excellent => "Excellent",
            CbrRating::VeryGood => "Very Good",
            CbrRating::Good => "Good",
            CbrRating::Fair => "Fair",
            CbrRating::Poor => "Poor",
            CbrRating::VeryPoor => "Very Poor",
        }
    }

    /// Usage recommendation code for this rating
    pub fn recommendation(&self) -> Recommendation {
        match self {
            CbrRating::Excellent | CbrRating::VeryGood => Recommendation::Excellent,
            CbrRating::Good => Recommendation::Good,
            CbrRating::Fair => Recommendation::Fair,
            CbrRating::Poor => Recommendation::Poor,
            CbrRating::VeryPoor => Recommendation::VeryPoor,
        }
    }
}

impl std::fmt::Display for CbrRating {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

/// How the tested curve should be read.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CbrInterpretation {
    /// Seating error was corrected out
    Corrected,
    /// Test stopped before 7.5 mm penetration
    StoppedEarly,
    Normal,
}

impl CbrInterpretation {
    pub fn code(&self) -> &'static str {
        match self {
            CbrInterpretation::Corrected => "CBR_CURVE_CORRECTED",
            CbrInterpretation::StoppedEarly => "CBR_CURVE_STOPPED_EARLY",
            CbrInterpretation::Normal => "CBR_CURVE_NORMAL",
        }
    }
}

/// Derived engineering insights for a final CBR value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CbrInsights {
    pub rating: CbrRating,
    /// Resilient modulus estimate (MPa), 80%..120% band
    pub resilient_modulus_mpa: (i32, i32),
    /// Undrained shear strength estimate (kPa), 75%..125% band.
    /// `(0, 0)` when CBR > 15 (correlation invalid for strong materials).
    pub undrained_shear_strength_kpa: (i32, i32),
    /// Modulus of subgrade reaction estimate (MN/m3)
    pub subgrade_modulus_mn_m3: i32,
    pub interpretation: CbrInterpretation,
    pub recommendation: Recommendation,
}

/// CBR calculation result. Complete when produced; [`calculate`] returns
/// `None` instead of a partial record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CbrResult {
    /// CBR (%) at 2.5 mm penetration
    pub cbr_at_2_5: f64,
    /// CBR (%) at 5.0 mm penetration
    pub cbr_at_5_0: f64,
    /// Governing CBR: max of the two
    pub cbr_final: f64,
    pub is_corrected: bool,
    pub message: CbrMessage,
    pub insights: CbrInsights,
}

// ============================================================================
// Zero Correction
// ============================================================================

/// Apply the zero correction to a load-penetration curve.
///
/// Returns the (possibly shifted) points and whether a shift was applied.
/// Requires at least 3 points; correction fires only when the steepest
/// positive segment is the curve's initial segment and its back-projection
/// to load = 0 lands more than 0.001 mm into the curve.
pub fn apply_zero_correction(points: &[CbrPoint]) -> (Vec<CbrPoint>, bool) {
    if points.len() < 3 {
        return (points.to_vec(), false);
    }

    let mut max_slope = 0.0_f64;
    let mut max_index = None;
    for (i, pair) in points.windows(2).enumerate() {
        let run = pair[1].penetration_mm - pair[0].penetration_mm;
        if run <= 0.0 {
            continue;
        }
        let slope = (pair[1].load_kn - pair[0].load_kn) / run;
        if slope > max_slope {
            max_slope = slope;
            max_index = Some(i);
        }
    }

    // A steeper rise later in the curve means the flat start is material
    // response, not a seating error
    if max_index != Some(0) {
        return (points.to_vec(), false);
    }

    let first = &points[0];
    let offset = first.penetration_mm - first.load_kn / max_slope;
    if offset <= CORRECTION_OFFSET_THRESHOLD_MM {
        return (points.to_vec(), false);
    }

    let corrected = points
        .iter()
        .map(|p| CbrPoint::new(p.penetration_mm - offset, p.load_kn))
        .collect();
    (corrected, true)
}

// ============================================================================
// Calculation
// ============================================================================

fn cbr_percent(load_kn: f64, reference_kn: f64) -> f64 {
    if reference_kn == 0.0 {
        0.0
    } else {
        load_kn / reference_kn * 100.0
    }
}

/// Evaluate a CBR test.
///
/// Returns `(result, corrected_points)`. The result is `None` when fewer
/// than 2 points were recorded or when either target penetration falls
/// outside the (corrected) curve; the corrected points are returned whenever
/// at least 2 points exist so the curve can still be plotted.
///
/// # Example
///
/// ```rust
/// use soil_core::calculations::cbr::{calculate, CbrPoint, CbrTestData};
///
/// let mut data = CbrTestData::default();
/// data.points = vec![
///     CbrPoint::new(0.0, 0.0),
///     CbrPoint::new(2.5, 6.0),
///     CbrPoint::new(5.0, 9.5),
///     CbrPoint::new(7.5, 11.0),
/// ];
///
/// let (result, _) = calculate(&data);
/// let result = result.expect("targets inside the curve");
/// assert!(result.cbr_final > 0.0);
/// ```
pub fn calculate(data: &CbrTestData) -> (Option<CbrResult>, Option<Vec<CbrPoint>>) {
    if data.points.len() < 2 {
        return (None, None);
    }

    let (corrected, is_corrected) = apply_zero_correction(&data.points);
    let curve: Vec<(f64, f64)> = corrected
        .iter()
        .map(|p| (p.penetration_mm, p.load_kn))
        .collect();

    let load_25 = fitting::interpolate_at(&curve, PENETRATION_SHALLOW_MM);
    let load_50 = fitting::interpolate_at(&curve, PENETRATION_DEEP_MM);
    let (load_25, load_50) = match (load_25, load_50) {
        (Some(a), Some(b)) => (a, b),
        _ => return (None, Some(corrected)),
    };

    let reference_25 = parse_f64_or(&data.reference_load_2_5, STANDARD_LOAD_2_5_KN);
    let reference_50 = parse_f64_or(&data.reference_load_5_0, STANDARD_LOAD_5_0_KN);
    let cbr_at_2_5 = cbr_percent(load_25, reference_25);
    let cbr_at_5_0 = cbr_percent(load_50, reference_50);
    let cbr_final = cbr_at_2_5.max(cbr_at_5_0);

    let message = if cbr_at_5_0 > cbr_at_2_5 {
        CbrMessage::RetestRecommended
    } else {
        CbrMessage::Success
    };

    let last_penetration = corrected.last().map(|p| p.penetration_mm).unwrap_or(0.0);
    let insights = insights(cbr_final, is_corrected, last_penetration);

    let result = CbrResult {
        cbr_at_2_5,
        cbr_at_5_0,
        cbr_final,
        is_corrected,
        message,
        insights,
    };
    (Some(result), Some(corrected))
}

/// Derive the insights block for a final CBR value.
pub fn insights(cbr: f64, is_corrected: bool, last_penetration_mm: f64) -> CbrInsights {
    let rating = CbrRating::from_cbr(cbr);

    let mr = 1500.0 * cbr / 145.0;
    let resilient_modulus_mpa = (
        (RESILIENT_MODULUS_BAND.0 * mr) as i32,
        (RESILIENT_MODULUS_BAND.1 * mr) as i32,
    );

    let undrained_shear_strength_kpa = if cbr > SHEAR_STRENGTH_MAX_CBR {
        (0, 0)
    } else {
        let su = SHEAR_STRENGTH_FACTOR * cbr;
        (
            (SHEAR_STRENGTH_BAND.0 * su) as i32,
            (SHEAR_STRENGTH_BAND.1 * su) as i32,
        )
    };

    let subgrade_modulus_mn_m3 = (SUBGRADE_MODULUS_FACTOR * cbr).max(0.0) as i32;

    let interpretation = if is_corrected {
        CbrInterpretation::Corrected
    } else if last_penetration_mm < FULL_PENETRATION_MM {
        CbrInterpretation::StoppedEarly
    } else {
        CbrInterpretation::Normal
    };

    CbrInsights {
        rating,
        resilient_modulus_mpa,
        undrained_shear_strength_kpa,
        subgrade_modulus_mn_m3,
        interpretation,
        recommendation: rating.recommendation(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx_eq(a: f64, b: f64, tol: f64) -> bool {
        (a - b).abs() < tol
    }

    fn data_with_points(points: Vec<CbrPoint>) -> CbrTestData {
        CbrTestData {
            points,
            ..CbrTestData::default()
        }
    }

    #[test]
    fn test_well_seated_curve_scenario() {
        // Steepest segment is in the middle of the curve, so the origin
        // stands and no correction applies
        let data = data_with_points(vec![
            CbrPoint::new(0.0, 0.0),
            CbrPoint::new(1.0, 2.0),
            CbrPoint::new(2.0, 4.2),
            CbrPoint::new(2.5, 5.3),
            CbrPoint::new(5.0, 9.8),
            CbrPoint::new(7.5, 12.0),
        ]);

        let (result, corrected) = calculate(&data);
        let result = result.expect("both targets inside the curve");

        assert!(!result.is_corrected);
        assert!(approx_eq(result.cbr_at_2_5, 39.73, 0.05), "cbr25 = {}", result.cbr_at_2_5);
        assert!(approx_eq(result.cbr_at_5_0, 48.98, 0.05), "cbr50 = {}", result.cbr_at_5_0);
        assert_eq!(result.cbr_final, result.cbr_at_5_0, "deeper value governs");
        assert_eq!(result.message, CbrMessage::RetestRecommended);

        assert_eq!(result.insights.rating, CbrRating::VeryGood);
        assert_eq!(result.insights.interpretation, CbrInterpretation::Normal);
        assert_eq!(result.insights.resilient_modulus_mpa, (405, 607));
        assert_eq!(
            result.insights.undrained_shear_strength_kpa,
            (0, 0),
            "Su correlation not applicable above CBR 15"
        );
        assert_eq!(result.insights.subgrade_modulus_mn_m3, 489);

        let corrected = corrected.unwrap();
        assert_eq!(corrected.len(), 6);
        assert_eq!(corrected[0].penetration_mm, 0.0, "points unchanged");
    }

    #[test]
    fn test_seating_error_is_corrected() {
        // First segment is the steepest and back-projects to 0.45 mm
        let data = data_with_points(vec![
            CbrPoint::new(0.5, 0.1),
            CbrPoint::new(1.5, 2.1),
            CbrPoint::new(2.5, 3.5),
            CbrPoint::new(5.0, 6.0),
            CbrPoint::new(7.5, 7.5),
        ]);

        let (result, corrected) = calculate(&data);
        let result = result.expect("computes");
        let corrected = corrected.unwrap();

        assert!(result.is_corrected);
        assert!(approx_eq(corrected[0].penetration_mm, 0.05, 1e-9));
        assert!(approx_eq(corrected[4].penetration_mm, 7.05, 1e-9));
        assert_eq!(corrected[0].load_kn, 0.1, "loads are never shifted");

        assert!(approx_eq(result.cbr_at_2_5, 29.61, 0.05), "cbr25 = {}", result.cbr_at_2_5);
        assert!(approx_eq(result.cbr_at_5_0, 31.33, 0.05), "cbr50 = {}", result.cbr_at_5_0);
        assert_eq!(result.insights.interpretation, CbrInterpretation::Corrected);
    }

    #[test]
    fn test_correction_is_idempotent() {
        let points = vec![
            CbrPoint::new(0.5, 0.1),
            CbrPoint::new(1.5, 2.1),
            CbrPoint::new(2.5, 3.5),
            CbrPoint::new(5.0, 6.0),
        ];
        let (once, first_pass) = apply_zero_correction(&points);
        assert!(first_pass);

        let (twice, second_pass) = apply_zero_correction(&once);
        assert!(!second_pass, "a corrected curve projects to offset 0");
        for (a, b) in once.iter().zip(twice.iter()) {
            assert!(approx_eq(a.penetration_mm, b.penetration_mm, 1e-9));
        }
    }

    #[test]
    fn test_correction_needs_three_points() {
        let points = vec![CbrPoint::new(0.5, 0.1), CbrPoint::new(1.5, 2.1)];
        let (unchanged, corrected) = apply_zero_correction(&points);
        assert!(!corrected);
        assert_eq!(unchanged[0].penetration_mm, 0.5);
    }

    #[test]
    fn test_tiny_offset_is_ignored() {
        // First segment steepest but the projection lands at the origin
        let points = vec![
            CbrPoint::new(0.0, 0.0),
            CbrPoint::new(1.0, 3.0),
            CbrPoint::new(2.0, 5.0),
            CbrPoint::new(3.0, 6.0),
        ];
        let (_, corrected) = apply_zero_correction(&points);
        assert!(!corrected);
    }

    #[test]
    fn test_too_few_points() {
        let data = data_with_points(vec![CbrPoint::new(2.5, 5.0)]);
        let (result, corrected) = calculate(&data);
        assert!(result.is_none());
        assert!(corrected.is_none());
    }

    #[test]
    fn test_target_outside_curve() {
        // Curve stops at 2.0 mm, short of both targets
        let data = data_with_points(vec![
            CbrPoint::new(0.0, 0.0),
            CbrPoint::new(1.0, 2.0),
            CbrPoint::new(2.0, 4.0),
        ]);
        let (result, corrected) = calculate(&data);
        assert!(result.is_none());
        assert!(corrected.is_some(), "curve is still plottable");
    }

    #[test]
    fn test_interpolation_is_exact_on_collinear_points() {
        let data = data_with_points(vec![
            CbrPoint::new(0.0, 0.0),
            CbrPoint::new(2.0, 1.0),
            CbrPoint::new(4.0, 2.0),
            CbrPoint::new(6.0, 3.0),
            CbrPoint::new(8.0, 4.0),
        ]);
        let (result, _) = calculate(&data);
        let result = result.unwrap();
        assert!(!result.is_corrected);
        // Loads on the 0.5 kN/mm line: 1.25 kN and 2.5 kN
        assert!(approx_eq(result.cbr_at_2_5, 1.25 / 13.34 * 100.0, 1e-9));
        assert!(approx_eq(result.cbr_at_5_0, 2.5 / 20.01 * 100.0, 1e-9));
    }

    #[test]
    fn test_surcharge_defaults_follow_design_type() {
        assert_eq!(CbrTestData::new(CbrDesignType::Subgrade).surcharge_weight, "2.27");
        assert_eq!(CbrTestData::new(CbrDesignType::Subbase).surcharge_weight, "4.54");
        assert_eq!(CbrTestData::new(CbrDesignType::BaseCourse).surcharge_weight, "4.54");
        assert_eq!(CbrTestData::default().soaking_days, "4");
    }

    #[test]
    fn test_point_from_dial() {
        let point = point_from_dial(2.5, 230.0, "0.023").expect("valid factor");
        assert!(approx_eq(point.load_kn, 5.29, 1e-9));

        assert!(point_from_dial(2.5, 230.0, "").is_err());
        let err = point_from_dial(2.5, 230.0, "0").unwrap_err();
        assert!(err.is_input_error());
    }

    #[test]
    fn test_rating_thresholds() {
        assert_eq!(CbrRating::from_cbr(85.0), CbrRating::Excellent);
        assert_eq!(CbrRating::from_cbr(80.0), CbrRating::Excellent);
        assert_eq!(CbrRating::from_cbr(30.0), CbrRating::VeryGood);
        assert_eq!(CbrRating::from_cbr(25.0), CbrRating::Good);
        assert_eq!(CbrRating::from_cbr(10.0), CbrRating::Fair);
        assert_eq!(CbrRating::from_cbr(5.0), CbrRating::Poor);
        assert_eq!(CbrRating::from_cbr(3.9), CbrRating::VeryPoor);
        assert_eq!(CbrRating::VeryPoor.color_hex(), "#F44336");
    }

    #[test]
    fn test_recommendation_mapping() {
        assert_eq!(CbrRating::Excellent.recommendation(), Recommendation::Excellent);
        assert_eq!(CbrRating::VeryGood.recommendation(), Recommendation::Excellent);
        assert_eq!(CbrRating::Good.recommendation(), Recommendation::Good);
        assert_eq!(CbrRating::VeryPoor.recommendation(), Recommendation::VeryPoor);
    }

    #[test]
    fn test_insights_for_soft_soil() {
        let result = insights(10.0, false, 7.5);
        assert_eq!(result.rating, CbrRating::Fair);
        assert_eq!(result.resilient_modulus_mpa, (82, 124));
        assert_eq!(result.undrained_shear_strength_kpa, (150, 250));
        assert_eq!(result.subgrade_modulus_mn_m3, 100);
        assert_eq!(result.interpretation, CbrInterpretation::Normal);
    }

    #[test]
    fn test_stopped_early_interpretation() {
        let result = insights(12.0, false, 5.0);
        assert_eq!(result.interpretation, CbrInterpretation::StoppedEarly);
    }

    #[test]
    fn test_zero_reference_load_reads_zero() {
        let mut data = data_with_points(vec![
            CbrPoint::new(0.0, 0.0),
            CbrPoint::new(2.5, 5.0),
            CbrPoint::new(5.0, 8.0),
        ]);
        data.reference_load_2_5 = "0".to_string();
        let (result, _) = calculate(&data);
        let result = result.unwrap();
        assert_eq!(result.cbr_at_2_5, 0.0);
        assert!(result.cbr_at_5_0 > 0.0);
    }

    #[test]
    fn test_result_serialization_roundtrip() {
        let data = data_with_points(vec![
            CbrPoint::new(0.0, 0.0),
            CbrPoint::new(2.5, 6.0),
            CbrPoint::new(5.0, 9.5),
            CbrPoint::new(7.5, 11.0),
        ]);
        let (result, _) = calculate(&data);
        let result = result.unwrap();

        let json = serde_json::to_string_pretty(&result).unwrap();
        assert!(json.contains("cbr_final"));
        assert!(json.contains("insights"));

        let back: CbrResult = serde_json::from_str(&json).unwrap();
        assert_eq!(result, back);
    }
}
