//! # SoilLab CLI Application
//!
//! Terminal interface for the geotechnical laboratory engine. Runs a seeded
//! demo bench: generates example data for every test type, calculates each
//! report, prints the summaries, and finishes with a session listing plus a
//! JSON dump for LLM/API use.

use std::io::{self, BufRead, Write};

use rand::rngs::StdRng;
use rand::SeedableRng;

use soil_core::calculations::{
    aggregate, atterberg, cbr, field_density, gravity, proctor, sieve,
};
use soil_core::sampledata::{self, GradationCharacter};
use soil_core::{LabSession, ReportItem};

fn prompt_u64(prompt: &str, default: u64) -> u64 {
    print!("{}", prompt);
    if io::stdout().flush().is_err() {
        return default;
    }

    let mut input = String::new();
    if io::stdin().lock().read_line(&mut input).is_err() {
        return default;
    }

    input.trim().parse().unwrap_or(default)
}

fn section(title: &str, subtitle: &str) {
    println!();
    println!("═══════════════════════════════════════");
    println!("  {}", title);
    println!("═══════════════════════════════════════");
    if !subtitle.is_empty() {
        println!("  {}", subtitle);
    }
}

fn status_icon(pass: bool) -> &'static str {
    if pass {
        "[OK]"
    } else {
        "[FAIL]"
    }
}

fn fmt_opt(value: Option<f64>) -> String {
    match value {
        Some(v) => format!("{:.2}", v),
        None => "-".to_string(),
    }
}

fn fmt_opt_mm(value: Option<f64>) -> String {
    match value {
        Some(v) => format!("{:.3} mm", v),
        None => "-".to_string(),
    }
}

fn main() {
    println!("SoilLab CLI - Geotechnical Laboratory Calculator");
    println!("================================================");
    println!();

    let seed = prompt_u64("Enter demo seed [42]: ", 42);
    let mut rng = StdRng::seed_from_u64(seed);
    let mut session = LabSession::new("Demo Bench", "SoilLab");

    // Atterberg limits
    let mut atterberg_data = sampledata::atterberg(&mut rng);
    atterberg_data.test_info.sample_no = "S-1".to_string();
    section("ATTERBERG LIMITS", &atterberg_data.test_info.sample_description);
    match atterberg::compute_limits(&atterberg_data) {
        Some(result) => {
            println!(
                "  LL = {:.1}%   PL = {:.1}%   PI = {:.1}%",
                result.liquid_limit, result.plastic_limit, result.plasticity_index
            );
            println!(
                "  Plasticity chart: {} (confidence {:.0}%)",
                result.classification.symbol,
                result.classification.confidence * 100.0
            );
        }
        None => println!("  Insufficient data"),
    }
    session.add_item(ReportItem::Atterberg(atterberg_data));

    // Sieve analysis; rotate the gradation character with the seed
    let character = GradationCharacter::ALL[(seed % 3) as usize];
    let mut sieve_data = sampledata::sieve(&mut rng, character);
    sieve_data.test_info.sample_no = "S-2".to_string();
    section("SIEVE ANALYSIS", &sieve_data.test_info.sample_description);
    let sieve_result = sieve::calculate(&sieve_data);
    match &sieve_result {
        Some(result) => {
            println!(
                "  Gravel / Sand / Fines: {:.1}% / {:.1}% / {:.1}%",
                result.percent_gravel, result.percent_sand, result.percent_fines
            );
            println!(
                "  D10 = {}   D30 = {}   D60 = {}",
                fmt_opt_mm(result.d10),
                fmt_opt_mm(result.d30),
                fmt_opt_mm(result.d60)
            );
            println!("  Cu = {}   Cc = {}", fmt_opt(result.cu), fmt_opt(result.cc));
            println!(
                "  USCS: {} | AASHTO: {} (GI {})",
                result.classification.uscs.group_name,
                result.classification.aashto.group_name,
                result.classification.aashto.group_index
            );
            println!("  Frost susceptibility: {}", result.frost);
            for warning in &result.warnings {
                println!("  ! {}", warning.message);
            }
        }
        None => println!("  Insufficient data"),
    }
    session.add_item(ReportItem::Sieve(sieve_data));

    // Proctor compaction; the MDD feeds the sand cone check below
    let mut proctor_data = sampledata::proctor(&mut rng);
    proctor_data.test_info.sample_no = "S-3".to_string();
    section("PROCTOR COMPACTION", &proctor_data.test_info.sample_description);
    println!("  Method: {}", proctor_data.test_type.display_name());
    let proctor_mdd = match proctor::calculate(&proctor_data) {
        Some(result) => {
            println!(
                "  MDD = {:.3} g/cm³ at OMC = {:.1}%",
                result.max_dry_density, result.optimum_moisture_content
            );
            println!("  95% MDD = {:.3} g/cm³", result.ninety_five_percent_mdd);
            Some(result.max_dry_density)
        }
        None => {
            println!("  Insufficient data");
            None
        }
    };
    session.add_item(ReportItem::Proctor(proctor_data));

    // CBR
    let mut cbr_data = sampledata::cbr(&mut rng);
    cbr_data.test_info.sample_no = "S-4".to_string();
    section("CALIFORNIA BEARING RATIO", &cbr_data.test_info.sample_description);
    let (cbr_result, _corrected_points) = cbr::calculate(&cbr_data);
    match cbr_result {
        Some(result) => {
            println!(
                "  CBR at 2.5 mm = {:.1}%   CBR at 5.0 mm = {:.1}%",
                result.cbr_at_2_5, result.cbr_at_5_0
            );
            println!(
                "  Final CBR = {:.1}%{}",
                result.cbr_final,
                if result.is_corrected { " (zero-corrected)" } else { "" }
            );
            println!(
                "  Rating: {} | Mr = {}-{} MPa | k = {} MN/m³",
                result.insights.rating.display_name(),
                result.insights.resilient_modulus_mpa.0,
                result.insights.resilient_modulus_mpa.1,
                result.insights.subgrade_modulus_mn_m3
            );
        }
        None => println!("  Insufficient data"),
    }
    session.add_item(ReportItem::Cbr(cbr_data));

    // Specific gravity, both methods
    let mut gs_fine_data = sampledata::gs_fine(&mut rng);
    gs_fine_data.test_info.sample_no = "S-5".to_string();
    section(
        "SPECIFIC GRAVITY (PYCNOMETER)",
        &gs_fine_data.test_info.sample_description,
    );
    match gravity::calculate_fine(&gs_fine_data) {
        Some(result) => println!("  Gs = {:.3}", result.specific_gravity),
        None => println!("  Insufficient data"),
    }
    session.add_item(ReportItem::GsFine(gs_fine_data));

    let mut gs_coarse_data = sampledata::gs_coarse(&mut rng);
    gs_coarse_data.test_info.sample_no = "S-6".to_string();
    section(
        "SPECIFIC GRAVITY (WEIGH-IN-WATER)",
        &gs_coarse_data.test_info.sample_description,
    );
    match gravity::calculate_coarse(&gs_coarse_data) {
        Some(result) => {
            println!(
                "  Gs = {:.3}   Gs (SSD) = {}   Absorption = {}%",
                result.specific_gravity,
                fmt_opt(result.specific_gravity_ssd),
                fmt_opt(result.absorption_percent)
            );
        }
        None => println!("  Insufficient data"),
    }
    session.add_item(ReportItem::GsCoarse(gs_coarse_data));

    // Sand cone field density against the Proctor MDD from above
    let mut cone_data = sampledata::sand_cone(&mut rng);
    cone_data.test_info.sample_no = "S-7".to_string();
    section("FIELD DENSITY (SAND CONE)", &cone_data.test_info.sample_description);
    match field_density::calculate_sand_cone(&cone_data, proctor_mdd) {
        Some(result) => {
            println!(
                "  Hole volume = {:.0} cm³   Dry density = {:.3} g/cm³",
                result.hole_volume_cm3, result.dry_density
            );
            match (result.compaction_percent, result.meets_requirement()) {
                (Some(compaction), Some(meets)) => println!(
                    "  Compaction = {:.1}% vs required {:.0}% {}",
                    compaction,
                    result.required_compaction_percent,
                    status_icon(meets)
                ),
                _ => println!("  No Proctor MDD on file; compaction not checked"),
            }
        }
        None => println!("  Insufficient data"),
    }
    session.add_item(ReportItem::SandCone(cone_data));

    // Relative density spot check, entered by hand like a bench sheet
    let mut density_data = field_density::RelativeDensityData::default();
    density_data.test_info.sample_no = "S-8".to_string();
    density_data.test_info.sample_description = "Poorly graded sand fill".to_string();
    density_data.wet_soil_and_container = "6200".to_string();
    density_data.container_weight = "2200".to_string();
    density_data.dry_soil_weight = "3700".to_string();
    density_data.volume = "2100".to_string();
    density_data.max_index_density = "1.85".to_string();
    density_data.min_index_density = "1.45".to_string();
    density_data.required_compaction = "70".to_string();
    section("RELATIVE DENSITY", &density_data.test_info.sample_description);
    match field_density::calculate_relative_density(&density_data) {
        Some(result) => {
            println!(
                "  Moisture = {:.1}%   Dry unit weight = {:.3} g/cm³",
                result.moisture_content_percent, result.dry_unit_weight
            );
            println!(
                "  Dr = {:.1}% vs required {:.0}% {}",
                result.relative_density_percent,
                result.required_compaction_percent,
                status_icon(result.warnings.is_empty())
            );
        }
        None => println!("  Insufficient data"),
    }
    session.add_item(ReportItem::RelativeDensity(density_data));

    // Aggregate quality
    let mut la_data = sampledata::la_abrasion(&mut rng);
    la_data.test_info.sample_no = "S-9".to_string();
    section("LA ABRASION", &la_data.test_info.sample_description);
    match aggregate::calculate_la_abrasion(&la_data) {
        Some(result) => println!(
            "  Loss = {:.0} g ({:.1}%) vs limit {}% {}",
            result.loss_weight_g,
            result.percent_loss,
            la_data.spec_limit,
            status_icon(result.within_limit(&la_data.spec_limit))
        ),
        None => println!("  Insufficient data"),
    }
    session.add_item(ReportItem::LaAbrasion(la_data));

    let mut shape_data = sampledata::flakiness(&mut rng);
    shape_data.test_info.sample_no = "S-10".to_string();
    section("FLAKINESS & ELONGATION", &shape_data.test_info.sample_description);
    match aggregate::calculate_flakiness(&shape_data) {
        Some(result) => {
            println!(
                "  Flakiness index = {:.1}% {}",
                result.flakiness_index,
                status_icon(result.flakiness_within_limit(&shape_data.flakiness_spec_limit))
            );
            println!(
                "  Elongation index = {:.1}% {}",
                result.elongation_index,
                status_icon(result.elongation_within_limit(&shape_data.elongation_spec_limit))
            );
        }
        None => println!("  Insufficient data"),
    }
    session.add_item(ReportItem::Flakiness(shape_data));

    // Session listing
    section("SESSION", "");
    println!("  {} reports on file for {}:", session.item_count(), session.meta.project_name);
    let mut lines: Vec<String> = session
        .items
        .values()
        .map(|item| format!("  - {:<5} {}", item.label(), item.test_type()))
        .collect();
    lines.sort();
    for line in &lines {
        println!("{}", line);
    }

    println!();
    println!("JSON Output (for LLM/API use):");
    if let Some(result) = &sieve_result {
        if let Ok(json) = serde_json::to_string_pretty(result) {
            println!("{}", json);
        }
    }
}
