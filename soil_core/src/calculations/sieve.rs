//! # Sieve Analysis (Gradation)
//!
//! Cumulative-retained sieve reduction per ASTM D6913 / C136: entry
//! reconciliation, percent passing, the gravel/sand/fines split,
//! characteristic diameters (D10/D30/D60) by log-linear inversion of the
//! grading curve, the Cu/Cc gradation indices, fineness modulus, a Hazen
//! permeability estimate for clean sands, and the combined AASHTO/USCS
//! classification with frost banding and index-property predictions.
//!
//! ## Reconciliation
//!
//! Operators enter cumulative retained weights coarsest to finest. A blank
//! cell means "not weighed"; a value smaller than the running cumulative
//! weight is physically impossible. Both carry the last valid weight
//! forward, so cumulative retained weight is non-decreasing down the stack
//! no matter what was typed.
//!
//! ## References
//!
//! - ASTM D6913 / C136 (sieve analysis of soils and aggregates)
//! - ASTM D2487 (gradation indices, classification inputs)
//! - Hazen's approximation for clean-sand permeability

use serde::{Deserialize, Serialize};

use crate::classify::{
    self, ClassificationParameters, FrostSusceptibility, GradationSnapshot, PredictedProperties,
    SoilClassificationResult,
};
use crate::errors::{Severity, Warning};
use crate::fitting;
use crate::parse::{parse_f64, parse_positive_f64};
use crate::session::TestInfo;

/// Opening match tolerance (mm) when looking up a sieve in the stack
const OPENING_TOLERANCE_MM: f64 = 0.001;

/// Material loss above this share of the initial weight draws a warning
const MATERIAL_LOSS_WARNING_PERCENT: f64 = 2.0;

// Openings (mm) of the sieves the fraction split and classifiers key on
const NO_4_OPENING_MM: f64 = 4.75;
const NO_10_OPENING_MM: f64 = 2.00;
const NO_40_OPENING_MM: f64 = 0.425;
const NO_200_OPENING_MM: f64 = 0.075;

/// Sieves entering the fineness modulus sum. Stacks that omit one simply
/// contribute nothing for it.
const FINENESS_MODULUS_OPENINGS_MM: [f64; 6] = [4.75, 2.36, 1.18, 0.6, 0.3, 0.15];

/// Hazen coefficient for k = C * (D10/10)^2, D10 in mm, k in cm/s
const HAZEN_C: f64 = 1.0;

// ============================================================================
// Sieve Stacks
// ============================================================================

/// One sieve of the input stack with its raw weight entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SieveRecord {
    /// Designation ("3\"", "No. 4", "Pan")
    pub name: String,
    /// Opening (mm); 0 for the pan
    pub opening_mm: f64,
    /// Cumulative retained weight (g) as entered; blank means not weighed
    pub retained_weight: String,
}

impl SieveRecord {
    pub fn new(name: impl Into<String>, opening_mm: f64) -> Self {
        SieveRecord {
            name: name.into(),
            opening_mm,
            retained_weight: String::new(),
        }
    }
}

/// Standard soil gradation stack, 3" down to No. 200 plus the pan.
pub fn standard_soil_sieves() -> Vec<SieveRecord> {
    vec![
        SieveRecord::new("3\"", 75.0),
        SieveRecord::new("2\"", 50.0),
        SieveRecord::new("1.5\"", 37.5),
        SieveRecord::new("1\"", 25.0),
        SieveRecord::new("3/4\"", 19.0),
        SieveRecord::new("1/2\"", 12.5),
        SieveRecord::new("3/8\"", 9.5),
        SieveRecord::new("No. 4", 4.75),
        SieveRecord::new("No. 10", 2.00),
        SieveRecord::new("No. 20", 0.850),
        SieveRecord::new("No. 40", 0.425),
        SieveRecord::new("No. 60", 0.250),
        SieveRecord::new("No. 100", 0.150),
        SieveRecord::new("No. 200", 0.075),
        SieveRecord::new("Pan", 0.0),
    ]
}

/// Standard aggregate gradation stack. Swaps the soil fractions for the
/// coarse/fine aggregate series (No. 8 through No. 50) and adds the 2.5"
/// sieve.
pub fn standard_aggregate_sieves() -> Vec<SieveRecord> {
    vec![
        SieveRecord::new("3\"", 75.0),
        SieveRecord::new("2.5\"", 63.0),
        SieveRecord::new("2\"", 50.0),
        SieveRecord::new("1.5\"", 37.5),
        SieveRecord::new("1\"", 25.0),
        SieveRecord::new("3/4\"", 19.0),
        SieveRecord::new("1/2\"", 12.5),
        SieveRecord::new("3/8\"", 9.5),
        SieveRecord::new("No. 4", 4.75),
        SieveRecord::new("No. 8", 2.36),
        SieveRecord::new("No. 16", 1.18),
        SieveRecord::new("No. 30", 0.600),
        SieveRecord::new("No. 50", 0.300),
        SieveRecord::new("No. 100", 0.150),
        SieveRecord::new("No. 200", 0.075),
        SieveRecord::new("Pan", 0.0),
    ]
}

/// Complete sieve analysis input.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SieveAnalysisData {
    #[serde(default)]
    pub test_info: TestInfo,
    pub params: ClassificationParameters,
    pub sieves: Vec<SieveRecord>,
}

impl SieveAnalysisData {
    pub fn new() -> Self {
        SieveAnalysisData {
            test_info: TestInfo::new(),
            params: ClassificationParameters::default(),
            sieves: standard_soil_sieves(),
        }
    }
}

impl Default for SieveAnalysisData {
    fn default() -> Self {
        SieveAnalysisData::new()
    }
}

// ============================================================================
// Results
// ============================================================================

/// One sieve after reconciliation, with its derived column values. Always
/// rebuilt as a unit from the raw entries, never mutated in place.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReconciledSieve {
    pub name: String,
    pub opening_mm: f64,
    pub cumulative_retained_g: f64,
    pub percent_passing: f64,
}

/// Sieve analysis result, including the classification bundle derived from
/// the gradation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SieveAnalysisResult {
    pub sieves: Vec<ReconciledSieve>,
    /// Basis of the percent-passing column (g)
    pub total_weight_g: f64,
    /// Loss relative to the entered initial weight (%); absent when the
    /// total was derived from the retained sum
    pub material_loss_percent: Option<f64>,
    pub percent_gravel: f64,
    pub percent_sand: f64,
    pub percent_fines: f64,
    /// Characteristic diameters (mm); absent when the grading curve never
    /// crosses the percentile inside the stack
    pub d10: Option<f64>,
    pub d30: Option<f64>,
    pub d60: Option<f64>,
    pub cu: Option<f64>,
    pub cc: Option<f64>,
    pub fineness_modulus: f64,
    /// Hazen estimate (cm/s), clean sands only
    pub hazen_permeability_cm_s: Option<f64>,
    pub frost: FrostSusceptibility,
    pub classification: SoilClassificationResult,
    pub predicted: Option<PredictedProperties>,
    pub warnings: Vec<Warning>,
}

impl SieveAnalysisResult {
    /// Percent passing at an opening, matched with the stack tolerance.
    pub fn passing_at(&self, opening_mm: f64) -> Option<f64> {
        passing_at(&self.sieves, opening_mm)
    }

    /// Grading curve as `(opening_mm, percent_passing)` pairs, pan excluded.
    /// This is the shape the specification checker and chart layers consume.
    pub fn passing_curve(&self) -> Vec<(f64, f64)> {
        self.sieves
            .iter()
            .filter(|s| s.opening_mm > 0.0)
            .map(|s| (s.opening_mm, s.percent_passing))
            .collect()
    }

    /// Gradation figures in the shape the classifier consumes.
    pub fn gradation_snapshot(&self) -> GradationSnapshot {
        GradationSnapshot {
            percent_gravel: self.percent_gravel,
            percent_sand: self.percent_sand,
            percent_fines: self.percent_fines,
            passing_no10: self.passing_at(NO_10_OPENING_MM),
            passing_no40: self.passing_at(NO_40_OPENING_MM),
            cu: self.cu,
            cc: self.cc,
        }
    }
}

// ============================================================================
// Calculation
// ============================================================================

/// Run the full sieve reduction.
///
/// Returns `None` when there is nothing to compute: no initial weight and no
/// retained weight entered anywhere in the stack.
pub fn calculate(data: &SieveAnalysisData) -> Option<SieveAnalysisResult> {
    // Reconciliation pass: adopt an entry only when it parses and does not
    // decrease the running cumulative weight
    let mut running = 0.0f64;
    let mut reconciled: Vec<ReconciledSieve> = data
        .sieves
        .iter()
        .map(|sieve| {
            if let Some(weight) = parse_f64(&sieve.retained_weight) {
                if weight >= running {
                    running = weight;
                }
            }
            ReconciledSieve {
                name: sieve.name.clone(),
                opening_mm: sieve.opening_mm,
                cumulative_retained_g: running,
                percent_passing: 0.0,
            }
        })
        .collect();

    let sum_retained = reconciled
        .last()
        .map(|s| s.cumulative_retained_g)
        .unwrap_or(0.0);
    let initial_weight = parse_positive_f64(&data.params.initial_weight);
    let total_weight = initial_weight.unwrap_or(sum_retained);
    if total_weight == 0.0 {
        return None;
    }

    let material_loss_percent =
        initial_weight.map(|initial| (initial - sum_retained) / initial * 100.0);

    let mut warnings = Vec::new();
    if let Some(loss) = material_loss_percent {
        if loss > MATERIAL_LOSS_WARNING_PERCENT {
            warnings.push(Warning::new(
                "HIGH_MATERIAL_LOSS",
                format!("Material loss is {:.1}% of the initial sample weight.", loss),
                Severity::High,
            ));
        }
    }

    for sieve in &mut reconciled {
        sieve.percent_passing = ((total_weight - sieve.cumulative_retained_g) / total_weight
            * 100.0)
            .clamp(0.0, 100.0);
    }

    // Fraction split on the No. 4 / No. 200 boundaries
    let p200 = passing_at(&reconciled, NO_200_OPENING_MM).unwrap_or(0.0);
    let p4 = passing_at(&reconciled, NO_4_OPENING_MM).unwrap_or(0.0);
    let percent_gravel = 100.0 - p4;
    let percent_sand = p4 - p200;
    let percent_fines = p200;

    let d10 = diameter_at(&reconciled, 10.0);
    let d30 = diameter_at(&reconciled, 30.0);
    let d60 = diameter_at(&reconciled, 60.0);
    let cu = match (d10, d60) {
        (Some(d10), Some(d60)) if d10 > 0.0 => Some(d60 / d10),
        _ => None,
    };
    let cc = match (d10, d30, d60) {
        (Some(d10), Some(d30), Some(d60)) if d10 > 0.0 && d60 > 0.0 => {
            Some(d30 * d30 / (d10 * d60))
        }
        _ => None,
    };

    let fineness_modulus = reconciled
        .iter()
        .filter(|s| {
            FINENESS_MODULUS_OPENINGS_MM
                .iter()
                .any(|fm| (s.opening_mm - fm).abs() < OPENING_TOLERANCE_MM)
        })
        .map(|s| 100.0 - s.percent_passing)
        .sum::<f64>()
        / 100.0;

    // Hazen only holds for clean, uniform sands
    let clean_sand = percent_sand > 50.0
        && percent_fines < 5.0
        && matches!(cu, Some(v) if v < 6.0);
    let hazen_permeability_cm_s = match d10 {
        Some(d10) if clean_sand && d10 > 0.0 => Some(HAZEN_C * (d10 / 10.0).powi(2)),
        _ => None,
    };

    let snapshot = GradationSnapshot {
        percent_gravel,
        percent_sand,
        percent_fines,
        passing_no10: passing_at(&reconciled, NO_10_OPENING_MM),
        passing_no40: passing_at(&reconciled, NO_40_OPENING_MM),
        cu,
        cc,
    };
    let classification = classify::classify(&snapshot, &data.params);
    let frost = classify::frost_susceptibility(percent_fines);
    let predicted =
        classify::predict_engineering_properties(&snapshot, &data.params, &classification.uscs);

    Some(SieveAnalysisResult {
        sieves: reconciled,
        total_weight_g: total_weight,
        material_loss_percent,
        percent_gravel,
        percent_sand,
        percent_fines,
        d10,
        d30,
        d60,
        cu,
        cc,
        fineness_modulus,
        hazen_permeability_cm_s,
        frost,
        classification,
        predicted,
        warnings,
    })
}

fn passing_at(sieves: &[ReconciledSieve], opening_mm: f64) -> Option<f64> {
    sieves
        .iter()
        .find(|s| (s.opening_mm - opening_mm).abs() < OPENING_TOLERANCE_MM)
        .map(|s| s.percent_passing)
}

/// Diameter (mm) at which the grading curve crosses `target_passing`,
/// interpolated log-linearly inside the bracketing sieve pair.
///
/// Walks the stack fine to coarse. A crossing that lands below the pan has
/// no nameable diameter; a degenerate bracket (equal passings) resolves to
/// the finer opening.
fn diameter_at(sieves: &[ReconciledSieve], target_passing: f64) -> Option<f64> {
    for pair in sieves.windows(2).rev() {
        let coarse = &pair[0];
        let fine = &pair[1];
        if fine.percent_passing <= target_passing && coarse.percent_passing >= target_passing {
            if fine.opening_mm <= 0.0 {
                return None;
            }
            if coarse.percent_passing == fine.percent_passing || coarse.opening_mm <= 0.0 {
                return Some(fine.opening_mm);
            }
            return Some(fitting::log_interpolate_diameter(
                fine.opening_mm,
                fine.percent_passing,
                coarse.opening_mm,
                coarse.percent_passing,
                target_passing,
            ));
        }
    }
    None
}
