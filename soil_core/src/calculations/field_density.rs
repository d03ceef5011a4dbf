//! # Field Density
//!
//! In-place density by the sand cone method (ASTM D1556), with percent
//! compaction against a reference Proctor MDD, and relative density of
//! cohesionless fills from the minimum/maximum index densities (ASTM D4254).

use serde::{Deserialize, Serialize};

use crate::errors::{Severity, Warning};
use crate::parse::{parse_f64, parse_f64_or, parse_positive_f64};
use crate::session::TestInfo;

const DEFAULT_REQUIRED_COMPACTION_PERCENT: f64 = 95.0;

// ============================================================================
// Sand Cone
// ============================================================================

/// Sand calibration shared by a series of field determinations.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SandConeCalibration {
    /// Calibrated density of the test sand (g/cm³)
    pub sand_density: String,
    /// Sand filling the cone and plate (g)
    pub cone_weight: String,
}

/// One sand cone field determination.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SandConeTestData {
    #[serde(default)]
    pub test_info: TestInfo,
    pub calibration: SandConeCalibration,
    /// Apparatus weight before pouring (g)
    pub initial_weight: String,
    /// Apparatus weight after pouring (g)
    pub final_weight: String,
    /// Wet soil excavated from the hole (g)
    pub wet_soil_weight: String,
    /// Field moisture content (%)
    pub moisture_content: String,
    /// Required compaction (%); blank defaults to 95
    pub required_compaction: String,
}

/// Sand cone result.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SandConeResult {
    pub sand_in_hole_g: f64,
    pub hole_volume_cm3: f64,
    /// Wet density (g/cm³)
    pub wet_density: f64,
    /// Dry density (g/cm³)
    pub dry_density: f64,
    /// Reference MDD as supplied (g/cm³)
    pub proctor_mdd: Option<f64>,
    /// Percent compaction; absent without a usable reference MDD
    pub compaction_percent: Option<f64>,
    pub required_compaction_percent: f64,
}

impl SandConeResult {
    /// Whether the measured compaction meets the requirement. `None` when no
    /// reference MDD was available.
    pub fn meets_requirement(&self) -> Option<bool> {
        self.compaction_percent
            .map(|c| c >= self.required_compaction_percent)
    }
}

/// Sand cone reduction.
///
/// `sand_in_hole = (initial - final) - cone`, `volume = sand_in_hole /
/// sand_density`, wet and dry densities from the excavated soil. The percent
/// compaction is only reported when a nonzero reference MDD is supplied.
///
/// `None` when a required entry is missing, the sand density is zero, or the
/// hole volume works out to zero.
pub fn calculate_sand_cone(
    data: &SandConeTestData,
    proctor_mdd: Option<f64>,
) -> Option<SandConeResult> {
    let sand_density = parse_f64(&data.calibration.sand_density).filter(|v| *v != 0.0)?;
    let cone_weight = parse_f64(&data.calibration.cone_weight)?;
    let initial_weight = parse_f64(&data.initial_weight)?;
    let final_weight = parse_f64(&data.final_weight)?;
    let wet_soil_weight = parse_f64(&data.wet_soil_weight)?;
    let moisture_content = parse_f64(&data.moisture_content)?;
    let required_compaction =
        parse_f64_or(&data.required_compaction, DEFAULT_REQUIRED_COMPACTION_PERCENT);

    let sand_used = initial_weight - final_weight;
    let sand_in_hole = sand_used - cone_weight;
    let hole_volume = sand_in_hole / sand_density;
    if hole_volume == 0.0 {
        return None;
    }

    let wet_density = wet_soil_weight / hole_volume;
    let dry_density = wet_density / (1.0 + moisture_content / 100.0);

    let compaction_percent = proctor_mdd
        .filter(|mdd| *mdd != 0.0)
        .map(|mdd| dry_density / mdd * 100.0);

    Some(SandConeResult {
        sand_in_hole_g: sand_in_hole,
        hole_volume_cm3: hole_volume,
        wet_density,
        dry_density,
        proctor_mdd,
        compaction_percent,
        required_compaction_percent: required_compaction,
    })
}

// ============================================================================
// Relative Density
// ============================================================================

/// Relative density inputs for a cohesionless fill.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RelativeDensityData {
    #[serde(default)]
    pub test_info: TestInfo,
    /// Wet soil + container (g)
    pub wet_soil_and_container: String,
    /// Container (g)
    pub container_weight: String,
    /// Oven-dry soil (g)
    pub dry_soil_weight: String,
    /// Sample volume (cm³)
    pub volume: String,
    /// Maximum index density (g/cm³)
    pub max_index_density: String,
    /// Minimum index density (g/cm³)
    pub min_index_density: String,
    /// Required relative density (%)
    pub required_compaction: String,
}

/// Relative density result.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RelativeDensityResult {
    pub moisture_content_percent: f64,
    /// Dry unit weight (g/cm³)
    pub dry_unit_weight: f64,
    pub relative_density_percent: f64,
    pub required_compaction_percent: f64,
    pub warnings: Vec<Warning>,
}

/// Relative density reduction.
///
/// `Dr = (γd - γmin) / (γmax - γmin) * 100` with γd from the dry mass and
/// volume. Every entry must be a positive number and the index densities
/// must bracket a nonzero range. A result below the required value carries
/// an advisory warning rather than failing.
pub fn calculate_relative_density(data: &RelativeDensityData) -> Option<RelativeDensityResult> {
    let wet_and_container = parse_positive_f64(&data.wet_soil_and_container)?;
    let container = parse_positive_f64(&data.container_weight)?;
    let dry_soil = parse_positive_f64(&data.dry_soil_weight)?;
    let volume = parse_positive_f64(&data.volume)?;
    let max_density = parse_positive_f64(&data.max_index_density)?;
    let min_density = parse_positive_f64(&data.min_index_density)?;
    let required = parse_positive_f64(&data.required_compaction)?;

    if max_density <= min_density {
        return None;
    }

    let wet_soil = wet_and_container - container;
    let moisture_content = (wet_soil - dry_soil) / dry_soil * 100.0;
    let dry_unit_weight = dry_soil / volume;
    let relative_density = (dry_unit_weight - min_density) / (max_density - min_density) * 100.0;

    let mut warnings = Vec::new();
    if relative_density < required {
        warnings.push(Warning::new(
            "LOW_RELATIVE_DENSITY",
            format!(
                "Relative density {:.1}% falls below the required {:.1}%.",
                relative_density, required
            ),
            Severity::High,
        ));
    }

    Some(RelativeDensityResult {
        moisture_content_percent: moisture_content,
        dry_unit_weight,
        relative_density_percent: relative_density,
        required_compaction_percent: required,
        warnings,
    })
}
