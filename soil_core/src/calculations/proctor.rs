//! # Proctor Compaction
//!
//! Moisture-density relationship per ASTM D698 (standard effort) and D1557
//! (modified effort). Dry density is fit as a quadratic in moisture content;
//! the vertex gives the optimum moisture content (OMC) and maximum dry
//! density (MDD). The result carries a densely sampled fitted curve, the
//! paired zero-air-voids (ZAV) curve, and the 95%-MDD control line used for
//! field compaction checks.
//!
//! ## References
//!
//! - ASTM D698 / D1557 (laboratory compaction characteristics)
//! - ZAV relation `ρd = Gs·ρw / (1 + w·Gs)`

use serde::{Deserialize, Serialize};

use crate::errors::{CalcError, CalcResult};
use crate::fitting;
use crate::parse::{parse_f64_or, parse_positive_f64};
use crate::session::TestInfo;

const DEFAULT_SPECIFIC_GRAVITY: f64 = 2.70;
/// Water density (g/cm³) in the ZAV relation
const WATER_DENSITY_G_CM3: f64 = 1.0;
/// Sample count of the fitted and ZAV curves
const FITTED_CURVE_SAMPLES: usize = 101;
/// Curve margin (% moisture) beyond the measured points
const CURVE_MARGIN_PERCENT: f64 = 2.0;

// ============================================================================
// Input Records
// ============================================================================

/// Compaction effort of the test.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ProctorTestType {
    Standard,
    Modified,
}

impl ProctorTestType {
    pub fn code(&self) -> &'static str {
        match self {
            ProctorTestType::Standard => "PROCTOR_STANDARD",
            ProctorTestType::Modified => "PROCTOR_MODIFIED",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            ProctorTestType::Standard => "Standard (ASTM D698)",
            ProctorTestType::Modified => "Modified (ASTM D1557)",
        }
    }
}

/// One compaction point. Densities are derived from the mold masses at entry
/// time (see [`point_from_masses`]) and stored as numbers.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ProctorPoint {
    /// Moisture content (%)
    pub moisture_content: f64,
    /// Wet density (g/cm³)
    pub wet_density: f64,
    /// Dry density (g/cm³)
    pub dry_density: f64,
}

/// Complete Proctor test input.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProctorTestData {
    #[serde(default)]
    pub test_info: TestInfo,
    pub test_type: ProctorTestType,
    /// Mold weight (g)
    pub mold_weight: String,
    /// Mold volume (cm³)
    pub mold_volume: String,
    /// Specific gravity for the ZAV curve
    pub specific_gravity: String,
    /// Points ordered by moisture content
    pub points: Vec<ProctorPoint>,
}

impl ProctorTestData {
    pub fn new(test_type: ProctorTestType) -> Self {
        ProctorTestData {
            test_info: TestInfo::new(),
            test_type,
            mold_weight: String::new(),
            mold_volume: String::new(),
            specific_gravity: DEFAULT_SPECIFIC_GRAVITY.to_string(),
            points: Vec::new(),
        }
    }

    /// Insert a point, keeping the list ordered by moisture content.
    pub fn add_point(&mut self, point: ProctorPoint) {
        self.points.push(point);
        self.points
            .sort_by(|a, b| a.moisture_content.total_cmp(&b.moisture_content));
    }
}

impl Default for ProctorTestData {
    fn default() -> Self {
        ProctorTestData::new(ProctorTestType::Standard)
    }
}

/// Build a compaction point from the mold weighing.
///
/// `wet = (wet_soil_and_mold - mold) / volume`, `dry = wet / (1 + mc/100)`.
/// The mold weight and a positive mold volume must be entered first.
pub fn point_from_masses(
    data: &ProctorTestData,
    moisture_content: f64,
    wet_soil_and_mold_g: f64,
) -> CalcResult<ProctorPoint> {
    let mold_weight = parse_positive_f64(&data.mold_weight).ok_or_else(|| {
        CalcError::invalid_input(
            "mold_weight",
            &data.mold_weight,
            "Mold weight must be a positive number",
        )
    })?;
    let mold_volume = parse_positive_f64(&data.mold_volume).ok_or_else(|| {
        CalcError::invalid_input(
            "mold_volume",
            &data.mold_volume,
            "Mold volume must be a positive number",
        )
    })?;

    let wet_density = (wet_soil_and_mold_g - mold_weight) / mold_volume;
    let dry_density = wet_density / (1.0 + moisture_content / 100.0);
    Ok(ProctorPoint {
        moisture_content,
        wet_density,
        dry_density,
    })
}

// ============================================================================
// Results
// ============================================================================

/// Proctor calculation result.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProctorResult {
    /// Maximum dry density (g/cm³)
    pub max_dry_density: f64,
    /// Optimum moisture content (%)
    pub optimum_moisture_content: f64,
    /// 95% of MDD, the usual field acceptance line (g/cm³)
    pub ninety_five_percent_mdd: f64,
    /// Fitted curve as `(moisture %, dry density)` samples
    pub fitted_curve: Vec<(f64, f64)>,
    /// Zero-air-voids curve at the same moistures
    pub zav_curve: Vec<(f64, f64)>,
}

// ============================================================================
// Calculation
// ============================================================================

/// Fit the compaction curve.
///
/// Returns `None` for fewer than 3 points, a degenerate fit, or a curve that
/// does not open downward (no physical optimum).
pub fn calculate(data: &ProctorTestData) -> Option<ProctorResult> {
    if data.points.len() < 3 {
        return None;
    }

    let samples: Vec<(f64, f64)> = data
        .points
        .iter()
        .map(|p| (p.moisture_content, p.dry_density))
        .collect();
    let parabola = fitting::parabolic_fit(&samples)?;
    if parabola.a >= 0.0 {
        return None;
    }

    let omc = parabola.vertex_x();
    let mdd = parabola.value_at(omc);

    let min_moisture = samples[0].0 - CURVE_MARGIN_PERCENT;
    let max_moisture = samples[samples.len() - 1].0 + CURVE_MARGIN_PERCENT;
    let gs = parse_f64_or(&data.specific_gravity, DEFAULT_SPECIFIC_GRAVITY);

    let mut fitted_curve = Vec::with_capacity(FITTED_CURVE_SAMPLES);
    let mut zav_curve = Vec::with_capacity(FITTED_CURVE_SAMPLES);
    for i in 0..FITTED_CURVE_SAMPLES {
        let mc = min_moisture
            + (max_moisture - min_moisture) * i as f64 / (FITTED_CURVE_SAMPLES - 1) as f64;
        fitted_curve.push((mc, parabola.value_at(mc)));
        zav_curve.push((mc, zav_density(mc, gs)));
    }

    Some(ProctorResult {
        max_dry_density: mdd,
        optimum_moisture_content: omc,
        ninety_five_percent_mdd: 0.95 * mdd,
        fitted_curve,
        zav_curve,
    })
}

/// Zero-air-voids dry density (g/cm³) at a moisture content.
pub fn zav_density(moisture_content: f64, specific_gravity: f64) -> f64 {
    specific_gravity * WATER_DENSITY_G_CM3
        / (1.0 + moisture_content / 100.0 * specific_gravity)
}

/// Achievable dry density at a field moisture, read off the fitted curve.
/// `None` outside the fitted range or with fewer than 2 curve samples.
pub fn density_at_moisture(curve: &[(f64, f64)], moisture: f64) -> Option<f64> {
    fitting::interpolate_at(curve, moisture)
}

/// Moisture window over which the fitted curve stays at or above
/// `required_compaction_percent` of MDD.
///
/// Scans the curve for crossings of the target density and interpolates each
/// crossing moisture. Returns `(min, max)` only when at least two crossings
/// exist (a window with both a dry and a wet bound).
pub fn moisture_range_for_compaction(
    curve: &[(f64, f64)],
    mdd: f64,
    required_compaction_percent: f64,
) -> Option<(f64, f64)> {
    let target = mdd * (required_compaction_percent / 100.0);

    let mut crossings: Vec<f64> = Vec::new();
    for pair in curve.windows(2) {
        let (x1, y1) = pair[0];
        let (x2, y2) = pair[1];
        let crosses = (y1 >= target && y2 < target) || (y1 < target && y2 >= target);
        if crosses {
            // The crossing branch guarantees y1 != y2
            let fraction = (target - y1) / (y2 - y1);
            crossings.push(x1 + fraction * (x2 - x1));
        }
    }
    if crossings.len() < 2 {
        return None;
    }

    let min = crossings.iter().copied().fold(f64::INFINITY, f64::min);
    let max = crossings.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    Some((min, max))
}
