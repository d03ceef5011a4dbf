//! # Soil Classification
//!
//! Rule-based classification of a soil from its gradation and Atterberg index
//! properties:
//!
//! - **AASHTO M 145** group name (A-1-a through A-7-6) with group index
//! - **USCS (ASTM D2487)** symbol: fine-grained via the plasticity chart,
//!   coarse-grained via Cu/Cc gradation shape, dual symbols in the 5–12%
//!   fines zone
//! - **Plasticity-chart classification** with a confidence score, used by the
//!   Atterberg engine when only LL/PI are known
//! - **Frost susceptibility** banding by percent fines
//! - **Predictive correlations** for MDD/OMC/CBR from index properties
//!
//! Every branch is an ordered sequence of guarded rules in a pure function
//! with an explicit fallback, so the tables can be unit-tested directly. All
//! outputs are codes (enums plus display color hexes); mapping codes to
//! user-facing text is the display layer's job.
//!
//! ## References
//!
//! - AASHTO M 145 (granular vs silt-clay groups, group index)
//! - ASTM D2487 (USCS group symbols, A-line)
//! - ASTM D4318 (plasticity chart)

use serde::{Deserialize, Serialize};

use crate::parse::parse_f64;

// ============================================================================
// Input Records
// ============================================================================

/// Index-property inputs accompanying a sieve analysis. Raw text fields; the
/// parsing gate treats blank/malformed entries as missing.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ClassificationParameters {
    /// Liquid limit (%), blank when not tested
    pub liquid_limit: String,
    /// Plastic limit (%), blank when not tested
    pub plastic_limit: String,
    /// Initial dry sample weight (g) before sieving, blank to derive from
    /// the retained weights
    pub initial_weight: String,
}

/// Gradation figures the classifier consumes, lifted out of a sieve-analysis
/// result. Plain data so the classifier never depends on the sieve engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GradationSnapshot {
    pub percent_gravel: f64,
    pub percent_sand: f64,
    pub percent_fines: f64,
    /// Percent passing the 2.00 mm (No. 10) sieve, if present in the stack
    pub passing_no10: Option<f64>,
    /// Percent passing the 0.425 mm (No. 40) sieve, if present in the stack
    pub passing_no40: Option<f64>,
    pub cu: Option<f64>,
    pub cc: Option<f64>,
}

// ============================================================================
// Classification Codes
// ============================================================================

/// USCS group description codes for the display layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum UscsDescription {
    LeanClay,
    Silt,
    SiltyClay,
    FatClay,
    ElasticSilt,
    WellGradedGravel,
    PoorlyGradedGravel,
    WellGradedSand,
    PoorlyGradedSand,
    ClayeyGravel,
    SiltyGravel,
    ClayeySand,
    SiltySand,
    DualSymbol,
}

impl UscsDescription {
    /// Stable code for programmatic handling
    pub fn code(&self) -> &'static str {
        match self {
            UscsDescription::LeanClay => "DESC_CL",
            UscsDescription::Silt => "DESC_ML",
            UscsDescription::SiltyClay => "DESC_CL_ML",
            UscsDescription::FatClay => "DESC_CH",
            UscsDescription::ElasticSilt => "DESC_MH",
            UscsDescription::WellGradedGravel => "DESC_GW",
            UscsDescription::PoorlyGradedGravel => "DESC_GP",
            UscsDescription::WellGradedSand => "DESC_SW",
            UscsDescription::PoorlyGradedSand => "DESC_SP",
            UscsDescription::ClayeyGravel => "DESC_GC",
            UscsDescription::SiltyGravel => "DESC_GM",
            UscsDescription::ClayeySand => "DESC_SC",
            UscsDescription::SiltySand => "DESC_SM",
            UscsDescription::DualSymbol => "DESC_DUAL",
        }
    }
}

/// AASHTO M 145 classification outcome. `group_index` is a display string:
/// a plain integer for the A-2 and silt-clay groups, `"0"` by table
/// convention for A-1/A-3, `"N/A"` for the fallback.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AashtoResult {
    pub group_name: String,
    pub group_index: String,
}

/// USCS classification outcome. `group_name` is the symbol ("CL", "GW",
/// "GW-GC" for duals).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UscsResult {
    pub group_name: String,
    pub description: UscsDescription,
}

/// Plasticity-chart symbol for fine-grained soils.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PlasticitySymbol {
    Cl,
    Ml,
    ClMl,
    Ch,
    Mh,
}

impl PlasticitySymbol {
    pub fn symbol(&self) -> &'static str {
        match self {
            PlasticitySymbol::Cl => "CL",
            PlasticitySymbol::Ml => "ML",
            PlasticitySymbol::ClMl => "CL-ML",
            PlasticitySymbol::Ch => "CH",
            PlasticitySymbol::Mh => "MH",
        }
    }

    pub fn description(&self) -> UscsDescription {
        match self {
            PlasticitySymbol::Cl => UscsDescription::LeanClay,
            PlasticitySymbol::Ml => UscsDescription::Silt,
            PlasticitySymbol::ClMl => UscsDescription::SiltyClay,
            PlasticitySymbol::Ch => UscsDescription::FatClay,
            PlasticitySymbol::Mh => UscsDescription::ElasticSilt,
        }
    }
}

impl std::fmt::Display for PlasticitySymbol {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.symbol())
    }
}

/// Plasticity-chart decision plus a data-quality confidence score in
/// [0.10, 0.99].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlasticityClassification {
    pub symbol: PlasticitySymbol,
    pub confidence: f64,
}

/// Frost susceptibility band by percent fines.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FrostSusceptibility {
    Negligible,
    Low,
    Medium,
    High,
    VeryHigh,
}

impl FrostSusceptibility {
    pub const ALL: [FrostSusceptibility; 5] = [
        FrostSusceptibility::Negligible,
        FrostSusceptibility::Low,
        FrostSusceptibility::Medium,
        FrostSusceptibility::High,
        FrostSusceptibility::VeryHigh,
    ];

    pub fn code(&self) -> &'static str {
        match self {
            FrostSusceptibility::Negligible => "FROST_NEGLIGIBLE",
            FrostSusceptibility::Low => "FROST_LOW",
            FrostSusceptibility::Medium => "FROST_MEDIUM",
            FrostSusceptibility::High => "FROST_HIGH",
            FrostSusceptibility::VeryHigh => "FROST_VERY_HIGH",
        }
    }

    /// Display color for gradation dashboards
    pub fn color_hex(&self) -> &'static str {
        match self {
            FrostSusceptibility::Negligible => "#4CAF50",
            FrostSusceptibility::Low => "#8BC34A",
            FrostSusceptibility::Medium => "#FFEB3B",
            FrostSusceptibility::High => "#FF9800",
            FrostSusceptibility::VeryHigh => "#F44336",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            FrostSusceptibility::Negligible => "Negligible",
            FrostSusceptibility::Low => "Low",
            FrostSusceptibility::Medium => "Medium",
            FrostSusceptibility::High => "High",
            FrostSusceptibility::VeryHigh => "Very High",
        }
    }
}

impl std::fmt::Display for FrostSusceptibility {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

/// Engineering commentary code selected from the combined classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Commentary {
    WellGraded,
    PoorlyGraded,
    HighPlasticity,
    SandyWithFines,
    LowPlasticity,
}

impl Commentary {
    pub fn code(&self) -> &'static str {
        match self {
            Commentary::WellGraded => "COMMENTARY_WELL_GRADED",
            Commentary::PoorlyGraded => "COMMENTARY_POORLY_GRADED",
            Commentary::HighPlasticity => "COMMENTARY_HIGH_PLASTICITY",
            Commentary::SandyWithFines => "COMMENTARY_SANDY_FINES",
            Commentary::LowPlasticity => "COMMENTARY_LOW_PLASTICITY",
        }
    }
}

/// Usage recommendation code shared by the CBR insights and the soil
/// classification summary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Recommendation {
    Excellent,
    Good,
    Fair,
    Poor,
    VeryPoor,
}

impl Recommendation {
    pub fn code(&self) -> &'static str {
        match self {
            Recommendation::Excellent => "REC_EXCELLENT",
            Recommendation::Good => "REC_GOOD",
            Recommendation::Fair => "REC_FAIR",
            Recommendation::Poor => "REC_POOR",
            Recommendation::VeryPoor => "REC_VERY_POOR",
        }
    }
}

/// Combined classification produced by [`classify`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SoilClassificationResult {
    pub aashto: AashtoResult,
    pub uscs: UscsResult,
    pub commentary: Commentary,
    pub recommendation: Recommendation,
}

/// Empirical MDD/OMC/CBR predictions from index properties. All values are
/// clamped to plausible ranges by the correlations that produce them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictedProperties {
    /// Predicted maximum dry density (g/cm³)
    pub mdd: Option<f64>,
    /// Predicted optimum moisture content (%)
    pub omc: Option<f64>,
    /// Predicted soaked CBR (%)
    pub cbr: Option<f64>,
}

// ============================================================================
// Plasticity Chart
// ============================================================================

/// Casagrande A-line: `PI = 0.73 * (LL - 20)`.
pub fn a_line(ll: f64) -> f64 {
    0.73 * (ll - 20.0)
}

/// Plasticity index used for classification: `LL - PL` only when both limits
/// are present, positive, and consistent (`LL >= PL`); otherwise 0
/// (non-plastic).
pub fn classification_pi(ll: f64, pl: f64) -> f64 {
    if ll > 0.0 && pl > 0.0 && ll >= pl {
        ll - pl
    } else {
        0.0
    }
}

/// Classify a fine-grained soil on the plasticity chart and score the data
/// quality behind the decision.
///
/// `blow_counts` are the natural blow counts of the flow-curve points (the
/// one-point method passes none). Confidence starts at 0.80: +0.10 for three
/// or more points, +0.05 when |R²| exceeds 0.95, +0.05 when any blow count
/// falls in the 20–30 window around the 25-blow target, clamped to
/// [0.10, 0.99].
pub fn classify_plasticity(
    ll: f64,
    pi: f64,
    blow_counts: &[f64],
    r_squared: Option<f64>,
) -> PlasticityClassification {
    let a_line_pi = a_line(ll);

    let mut confidence: f64 = 0.80;
    if blow_counts.len() >= 3 {
        confidence += 0.10;
    }
    if let Some(r2) = r_squared {
        if r2.abs() > 0.95 {
            confidence += 0.05;
        }
    }
    if blow_counts.iter().any(|&n| (20.0..=30.0).contains(&n)) {
        confidence += 0.05;
    }

    let symbol = if ll < 50.0 {
        if pi > 7.0 && pi >= a_line_pi {
            PlasticitySymbol::Cl
        } else if pi < 4.0 || pi < a_line_pi {
            PlasticitySymbol::Ml
        } else {
            PlasticitySymbol::ClMl
        }
    } else if pi >= a_line_pi {
        PlasticitySymbol::Ch
    } else {
        PlasticitySymbol::Mh
    };

    PlasticityClassification {
        symbol,
        confidence: confidence.clamp(0.10, 0.99),
    }
}

// ============================================================================
// AASHTO M 145
// ============================================================================

/// AASHTO M 145 group classification.
///
/// Guards run top to bottom; P10/P40 default to 100% passing when the stack
/// does not include those sieves. The final fallback is unreachable for any
/// finite inputs but kept explicit.
pub fn classify_aashto(snapshot: &GradationSnapshot, ll: f64, pi: f64) -> AashtoResult {
    let p10 = snapshot.passing_no10.unwrap_or(100.0);
    let p40 = snapshot.passing_no40.unwrap_or(100.0);
    let fines = snapshot.percent_fines;

    if fines <= 35.0 {
        // Granular materials
        if fines <= 25.0 && p40 <= 50.0 && pi <= 6.0 {
            if fines <= 15.0 && p40 <= 30.0 && p10 <= 50.0 {
                return AashtoResult { group_name: "A-1-a".to_string(), group_index: "0".to_string() };
            }
            return AashtoResult { group_name: "A-1-b".to_string(), group_index: "0".to_string() };
        }
        if fines <= 10.0 && p40 > 50.0 && pi <= 0.0 {
            return AashtoResult { group_name: "A-3".to_string(), group_index: "0".to_string() };
        }
        let gi = group_index(fines, ll, pi).to_string();
        if ll <= 40.0 && pi <= 10.0 {
            return AashtoResult { group_name: "A-2-4".to_string(), group_index: gi };
        }
        if ll > 40.0 && pi <= 10.0 {
            return AashtoResult { group_name: "A-2-5".to_string(), group_index: gi };
        }
        if ll <= 40.0 && pi > 10.0 {
            return AashtoResult { group_name: "A-2-6".to_string(), group_index: gi };
        }
        if ll > 40.0 && pi > 10.0 {
            return AashtoResult { group_name: "A-2-7".to_string(), group_index: gi };
        }
    } else {
        // Silt-clay materials
        let gi = group_index(fines, ll, pi).to_string();
        if ll <= 40.0 && pi <= 10.0 {
            return AashtoResult { group_name: "A-4".to_string(), group_index: gi };
        }
        if ll > 40.0 && pi <= 10.0 {
            return AashtoResult { group_name: "A-5".to_string(), group_index: gi };
        }
        if ll <= 40.0 && pi > 10.0 {
            return AashtoResult { group_name: "A-6".to_string(), group_index: gi };
        }
        if ll > 40.0 && pi > 10.0 {
            let group = if pi <= ll - 30.0 { "A-7-5" } else { "A-7-6" };
            return AashtoResult { group_name: group.to_string(), group_index: gi };
        }
    }

    AashtoResult { group_name: "Unknown".to_string(), group_index: "N/A".to_string() }
}

/// AASHTO group index
/// `GI = (F-35)(0.2 + 0.005(LL-40)) + 0.01(F-15)(PI-10)`,
/// floored at 0 and truncated. Soils without Atterberg data (LL or PI zero)
/// report 0.
pub fn group_index(fines: f64, ll: f64, pi: f64) -> i32 {
    if ll == 0.0 || pi == 0.0 {
        return 0;
    }
    let gi = (fines - 35.0) * (0.2 + 0.005 * (ll - 40.0)) + 0.01 * (fines - 15.0) * (pi - 10.0);
    gi.max(0.0) as i32
}

// ============================================================================
// USCS (ASTM D2487)
// ============================================================================

/// USCS group classification.
///
/// Fine-grained soils (fines ≥ 50%) go through the plasticity chart;
/// coarse-grained soils branch on gravel-vs-sand dominance, then on fines
/// content: clean (<5%) by Cu/Cc gradation shape, dirty (>12%) by the A-line,
/// and the 5–12% zone gets a dual symbol. Missing Cu/Cc count as 0 (poorly
/// graded).
pub fn classify_uscs(snapshot: &GradationSnapshot, ll: f64, pi: f64) -> UscsResult {
    let fines = snapshot.percent_fines;

    if fines >= 50.0 {
        let symbol = classify_plasticity(ll, pi, &[], None).symbol;
        return UscsResult {
            group_name: symbol.symbol().to_string(),
            description: symbol.description(),
        };
    }

    let is_gravel = snapshot.percent_gravel >= snapshot.percent_sand;
    let cu = snapshot.cu.unwrap_or(0.0);
    let cc = snapshot.cc.unwrap_or(0.0);
    let well_graded = if is_gravel {
        cu >= 4.0 && (1.0..=3.0).contains(&cc)
    } else {
        cu >= 6.0 && (1.0..=3.0).contains(&cc)
    };
    let above_a_line = pi > a_line(ll);

    if fines < 5.0 {
        // Clean coarse
        let (name, description) = match (is_gravel, well_graded) {
            (true, true) => ("GW", UscsDescription::WellGradedGravel),
            (true, false) => ("GP", UscsDescription::PoorlyGradedGravel),
            (false, true) => ("SW", UscsDescription::WellGradedSand),
            (false, false) => ("SP", UscsDescription::PoorlyGradedSand),
        };
        return UscsResult { group_name: name.to_string(), description };
    }

    if fines > 12.0 {
        // Coarse with fines
        let (name, description) = match (is_gravel, above_a_line) {
            (true, true) => ("GC", UscsDescription::ClayeyGravel),
            (true, false) => ("GM", UscsDescription::SiltyGravel),
            (false, true) => ("SC", UscsDescription::ClayeySand),
            (false, false) => ("SM", UscsDescription::SiltySand),
        };
        return UscsResult { group_name: name.to_string(), description };
    }

    // Dual symbol zone (5% to 12% fines)
    let first = match (is_gravel, well_graded) {
        (true, true) => "GW",
        (true, false) => "GP",
        (false, true) => "SW",
        (false, false) => "SP",
    };
    let second = match (is_gravel, above_a_line) {
        (true, true) => "GC",
        (true, false) => "GM",
        (false, true) => "SC",
        (false, false) => "SM",
    };
    UscsResult {
        group_name: format!("{}-{}", first, second),
        description: UscsDescription::DualSymbol,
    }
}

// ============================================================================
// Frost Susceptibility
// ============================================================================

/// Frost susceptibility band from percent fines.
pub fn frost_susceptibility(percent_fines: f64) -> FrostSusceptibility {
    match percent_fines {
        f if f <= 3.0 => FrostSusceptibility::Negligible,
        f if f <= 10.0 => FrostSusceptibility::Low,
        f if f <= 20.0 => FrostSusceptibility::Medium,
        f if f <= 35.0 => FrostSusceptibility::High,
        _ => FrostSusceptibility::VeryHigh,
    }
}

// ============================================================================
// Combined Classification
// ============================================================================

/// Classify a soil under both AASHTO and USCS from a gradation snapshot and
/// raw LL/PL text. The classification PI is the guarded value from
/// [`classification_pi`].
pub fn classify(
    snapshot: &GradationSnapshot,
    params: &ClassificationParameters,
) -> SoilClassificationResult {
    let ll = parse_f64(&params.liquid_limit).unwrap_or(0.0);
    let pl = parse_f64(&params.plastic_limit).unwrap_or(0.0);
    let pi = classification_pi(ll, pl);

    let aashto = classify_aashto(snapshot, ll, pi);
    let uscs = classify_uscs(snapshot, ll, pi);
    let commentary = select_commentary(&uscs, snapshot.percent_sand, snapshot.percent_fines);

    SoilClassificationResult {
        aashto,
        uscs,
        commentary,
        // One general earthworks recommendation code; the display layer owns
        // the wording per group
        recommendation: Recommendation::Good,
    }
}

/// Commentary selection from the USCS symbol and the sand/fines split.
pub fn select_commentary(uscs: &UscsResult, percent_sand: f64, percent_fines: f64) -> Commentary {
    let name = uscs.group_name.as_str();
    if name.starts_with("GW") || name.starts_with("SW") {
        return Commentary::WellGraded;
    }
    if name.starts_with("GP") || name.starts_with("SP") {
        return Commentary::PoorlyGraded;
    }
    if name.contains('H') {
        return Commentary::HighPlasticity;
    }
    if percent_sand > 50.0 && percent_fines > 12.0 {
        return Commentary::SandyWithFines;
    }
    Commentary::LowPlasticity
}

// ============================================================================
// Predictive Correlations
// ============================================================================

/// Predict MDD/OMC/CBR from index properties.
///
/// Requires both LL and PL (prediction PI is the raw `LL - PL`, unguarded).
/// Soils whose USCS symbol carries fines (any C or M) use the cohesive
/// correlations; clean coarse symbols use the granular ones. The CBR
/// correlation `log10(CBR) = 2.4 - 1.8*log10(PI) + 0.08*MDD` is only valid
/// for plastic soils (PI > 0).
pub fn predict_engineering_properties(
    snapshot: &GradationSnapshot,
    params: &ClassificationParameters,
    uscs: &UscsResult,
) -> Option<PredictedProperties> {
    let ll = parse_f64(&params.liquid_limit)?;
    let pl = parse_f64(&params.plastic_limit)?;
    let pi = ll - pl;
    let fines = snapshot.percent_fines;

    let (omc, mdd) = if uscs.group_name.contains('C') || uscs.group_name.contains('M') {
        // Fine-grained or coarse-grained with fines
        (
            (2.4 + 0.6 * ll + 0.23 * pi).clamp(8.0, 35.0),
            (2.14 - 0.007 * ll - 0.005 * pi).clamp(1.6, 2.1),
        )
    } else {
        // Clean coarse (GW, GP, SW, SP)
        (
            (0.25 * ll + 0.15 * pi + 0.05 * fines).clamp(5.0, 20.0),
            (2.25 - 0.002 * ll - 0.001 * pi - 0.008 * fines).clamp(1.8, 2.3),
        )
    };

    let cbr = if pi > 0.0 {
        let log_cbr = 2.4 - 1.8 * pi.log10() + 0.08 * mdd;
        Some(10.0f64.powf(log_cbr).clamp(1.0, 100.0))
    } else {
        // The correlation is only sound for cohesive soils
        None
    };

    Some(PredictedProperties {
        mdd: Some(mdd).filter(|v| v.is_finite()),
        omc: Some(omc).filter(|v| v.is_finite()),
        cbr: cbr.filter(|v| v.is_finite()),
    })
}
