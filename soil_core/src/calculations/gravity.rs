//! # Specific Gravity
//!
//! Specific gravity of soil solids by the pycnometer method (ASTM D854,
//! fine-grained soils) and bulk specific gravity of coarse aggregate by the
//! saturated-surface-dry weighing method (ASTM C127), which also yields the
//! absorption.
//!
//! Fine-soil results are corrected to 20 °C with a linearized water-density
//! factor.

use serde::{Deserialize, Serialize};

use crate::parse::{parse_f64, parse_f64_or};
use crate::session::TestInfo;

const REFERENCE_TEMPERATURE_C: f64 = 20.0;
/// Linearized water-density correction slope (per °C) around 20 °C
const TEMPERATURE_CORRECTION_PER_C: f64 = 0.00025;

// ============================================================================
// Input Records
// ============================================================================

/// Pycnometer weighings for a fine-grained soil.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GsFineSoilData {
    #[serde(default)]
    pub test_info: TestInfo,
    pub pycnometer_number: String,
    /// Mass of the empty pycnometer (g)
    pub mass_pycnometer: String,
    /// Mass of pycnometer + dry soil (g)
    pub mass_pycnometer_dry_soil: String,
    /// Mass of pycnometer + soil + water (g)
    pub mass_pycnometer_soil_water: String,
    /// Mass of pycnometer + water only (g)
    pub mass_pycnometer_water: String,
    /// Test temperature (°C); blank defaults to 20
    pub temperature_c: String,
}

/// Weighings for a coarse aggregate sample.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GsCoarseSoilData {
    #[serde(default)]
    pub test_info: TestInfo,
    /// Oven-dry mass (g)
    pub mass_dry: String,
    /// Saturated-surface-dry mass (g)
    pub mass_ssd: String,
    /// Submerged mass (g)
    pub mass_submerged: String,
}

// ============================================================================
// Results
// ============================================================================

/// Specific gravity result. The SSD value and absorption only exist for the
/// coarse-aggregate method.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GsResult {
    pub specific_gravity: f64,
    pub specific_gravity_ssd: Option<f64>,
    pub absorption_percent: Option<f64>,
}

// ============================================================================
// Calculation
// ============================================================================

fn temperature_correction(temp_c: f64) -> f64 {
    1.0 - (temp_c - REFERENCE_TEMPERATURE_C) * TEMPERATURE_CORRECTION_PER_C
}

/// Pycnometer reduction: `Gs@20 = Wd / (Wd + Wa - Wb) * k(T)` where `Wd` is
/// the dry soil mass, `Wa` the water-only fill, and `Wb` the water added over
/// the soil.
///
/// `None` when any weighing is missing or the denominator vanishes (the soil
/// displaced no water).
pub fn calculate_fine(data: &GsFineSoilData) -> Option<GsResult> {
    let mass_pycnometer = parse_f64(&data.mass_pycnometer)?;
    let mass_with_dry_soil = parse_f64(&data.mass_pycnometer_dry_soil)?;
    let mass_with_soil_water = parse_f64(&data.mass_pycnometer_soil_water)?;
    let mass_with_water = parse_f64(&data.mass_pycnometer_water)?;
    let temperature = parse_f64_or(&data.temperature_c, REFERENCE_TEMPERATURE_C);

    let dry_soil = mass_with_dry_soil - mass_pycnometer;
    let water_fill = mass_with_water - mass_pycnometer;
    let water_over_soil = mass_with_soil_water - mass_with_dry_soil;

    let denominator = dry_soil + water_fill - water_over_soil;
    if denominator == 0.0 {
        return None;
    }

    let specific_gravity = dry_soil / denominator * temperature_correction(temperature);
    Some(GsResult {
        specific_gravity,
        specific_gravity_ssd: None,
        absorption_percent: None,
    })
}

/// Coarse-aggregate reduction: `Gs = Md / (Mssd - Msub)`,
/// `GsSSD = Mssd / (Mssd - Msub)`, `absorption% = (Mssd - Md) / Md * 100`.
///
/// `None` when a weighing is missing, the displaced volume is zero, or the
/// dry mass is zero.
pub fn calculate_coarse(data: &GsCoarseSoilData) -> Option<GsResult> {
    let mass_dry = parse_f64(&data.mass_dry)?;
    let mass_ssd = parse_f64(&data.mass_ssd)?;
    let mass_submerged = parse_f64(&data.mass_submerged)?;

    let displaced = mass_ssd - mass_submerged;
    if displaced == 0.0 || mass_dry == 0.0 {
        return None;
    }

    Some(GsResult {
        specific_gravity: mass_dry / displaced,
        specific_gravity_ssd: Some(mass_ssd / displaced),
        absorption_percent: Some((mass_ssd - mass_dry) / mass_dry * 100.0),
    })
}
