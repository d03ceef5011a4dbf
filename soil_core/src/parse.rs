//! # Tolerant Numeric Parsing
//!
//! Laboratory input arrives as free text: operators leave fields blank, type
//! partial numbers, or paste values with stray whitespace. Every calculator
//! funnels raw strings through this module exactly once, at the input
//! boundary; engine-internal math only ever sees numbers that are present and
//! finite.
//!
//! Blank or malformed text maps to `None` ("missing"), never to an error or a
//! panic. Non-finite parses (`NaN`, `inf`) are also treated as missing so they
//! cannot leak into a result record.

/// Parse a field as `f64`. Blank, malformed, or non-finite input is `None`.
pub fn parse_f64(raw: &str) -> Option<f64> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }
    trimmed.parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Parse a field as `f64`, requiring a strictly positive value.
pub fn parse_positive_f64(raw: &str) -> Option<f64> {
    parse_f64(raw).filter(|v| *v > 0.0)
}

/// Parse a field as `f64`, falling back to `default` when missing or
/// malformed. Used for parameters that carry a standard default (reference
/// loads, specific gravity, test temperature).
pub fn parse_f64_or(raw: &str, default: f64) -> f64 {
    parse_f64(raw).unwrap_or(default)
}

/// Parse a field as a whole number. Blank or malformed input is `None`.
pub fn parse_i64(raw: &str) -> Option<i64> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }
    trimmed.parse::<i64>().ok()
}
