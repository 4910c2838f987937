//! G-code metadata extraction
//!
//! Slicers annotate their output with comment metadata (filament usage,
//! estimated print time, material). Each slicer uses its own dialect, so
//! every metric category carries an ordered list of patterns: PrusaSlicer
//! first, then Cura, then generic fallbacks. Within one category a
//! lower-priority pattern never overrides a higher one, and among matches
//! of the same pattern the last occurrence wins, because slicers emit a
//! running total near the end of the file.

use lazy_static::lazy_static;
use regex::Regex;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::{AppResult, ParseError};
use crate::types::normalize_material;

/// Print metrics extracted from sliced G-code text
///
/// Immutable after extraction. Metric categories without a recognizable
/// marker stay at zero and are listed in `warnings`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GCodeMetrics {
    pub filament_length_mm: Decimal,
    pub filament_weight_g: Decimal,
    pub estimated_time_minutes: Decimal,
    /// Material reported by the slicer, normalized (PLA, PETG, ...)
    pub material: Option<String>,
    pub warnings: Vec<MetricWarning>,
}

impl GCodeMetrics {
    pub fn has_warning(&self, warning: MetricWarning) -> bool {
        self.warnings.contains(&warning)
    }
}

/// Metric categories that had no usable marker in the input
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MetricWarning {
    FilamentLengthMissing,
    FilamentWeightMissing,
    PrintTimeMissing,
}

lazy_static! {
    /// Filament weight in grams. The multicolor total comes first: when a
    /// file carries per-tool weights, the summed line is authoritative.
    static ref WEIGHT_PATTERNS: Vec<Regex> = vec![
        // PrusaSlicer multicolor: ; total filament weight [g] : 30.98,1.12
        Regex::new(r"(?i)^;\s*total filament weight\s*\[g\]\s*[:=]\s*([\d.,\s]+)").unwrap(),
        // PrusaSlicer: ; filament used [g] = 32.93 / ; total filament used [g] = 32.93
        Regex::new(r"(?i)^;\s*(?:total\s+)?filament used\s*\[g\]\s*=\s*([\d.]+)").unwrap(),
        // Generic: ;Filament weight: 12.34 g
        Regex::new(r"(?i)^;\s*filament weight:\s*([\d.]+)\s*g").unwrap(),
        // Generic: ;Weight: 12.34g
        Regex::new(r"(?i)^;\s*weight:\s*([\d.]+)\s*g").unwrap(),
    ];

    /// Filament length; PrusaSlicer reports millimeters, Cura meters.
    static ref LENGTH_MM_PATTERNS: Vec<Regex> = vec![
        // PrusaSlicer: ; filament used [mm] = 4123.5
        Regex::new(r"(?i)^;\s*(?:total\s+)?filament used\s*\[mm\]\s*=\s*([\d.]+)").unwrap(),
        // Cura: ;Filament used: 12.34m
        Regex::new(r"(?i)^;\s*filament used:\s*([\d.]+)\s*m\b").unwrap(),
        // Generic: ;Filament length: 12.34 m
        Regex::new(r"(?i)^;\s*filament length:\s*([\d.]+)\s*m\b").unwrap(),
    ];

    /// Print time as plain seconds
    static ref TIME_SECONDS_PATTERNS: Vec<Regex> = vec![
        // Cura: ;TIME:1234
        Regex::new(r"(?i)^;TIME:(\d+)\b").unwrap(),
        // Cura: ;TIME_ELAPSED:3624.5 (running total, last one is the print time)
        Regex::new(r"(?i)^;TIME_ELAPSED:([\d.]+)").unwrap(),
    ];

    /// Print time as "1d 2h 35m 36s" text
    static ref TIME_HMS_PATTERNS: Vec<Regex> = vec![
        // PrusaSlicer: ; estimated printing time (normal mode) = 2h 35m 36s
        Regex::new(
            r"(?i)^;\s*estimated printing time \((?:normal|silent) mode\)\s*=\s*(?:(\d+)d\s*)?(?:(\d+)h\s*)?(?:(\d+)m\s*)?(?:(\d+)s)?",
        )
        .unwrap(),
        // Without the mode suffix
        Regex::new(
            r"(?i)^;\s*estimated printing time\s*=\s*(?:(\d+)d\s*)?(?:(\d+)h\s*)?(?:(\d+)m\s*)?(?:(\d+)s)?",
        )
        .unwrap(),
        // Generic: ;Print time: 1h 30m
        Regex::new(r"(?i)^;\s*print time:\s*(?:(\d+)d\s*)?(?:(\d+)h\s*)?(?:(\d+)m\s*)?(?:(\d+)s)?")
            .unwrap(),
    ];

    static ref MATERIAL_PATTERNS: Vec<Regex> = vec![
        // PrusaSlicer: ; filament_type = PETG (also appears unprefixed in config blocks)
        Regex::new(r#"(?i)^;?\s*filament_type\s*[:=]\s*"?([A-Za-z0-9_-]+)"#).unwrap(),
        // Generic: ; material: PETG
        Regex::new(r#"(?i)^;\s*material\s*[:=]\s*"?([A-Za-z0-9_-]+)"#).unwrap(),
    ];
}

/// A matched metric with the priority of the pattern that produced it
struct Candidate<T> {
    priority: usize,
    value: T,
}

fn consider<T>(slot: &mut Option<Candidate<T>>, priority: usize, value: T) {
    match slot {
        // A later match of the same or a better dialect replaces the
        // current value; a weaker dialect never does.
        Some(current) if current.priority < priority => {}
        _ => *slot = Some(Candidate { priority, value }),
    }
}

/// Parse a non-negative dot-decimal token, skipping malformed input
fn parse_decimal(token: &str) -> Option<Decimal> {
    token
        .trim()
        .parse::<Decimal>()
        .ok()
        .filter(|d| !d.is_sign_negative())
}

/// Sum a multicolor weight list like "30.98,1.12"
fn sum_weight_list(raw: &str) -> Option<Decimal> {
    let mut total = Decimal::ZERO;
    let mut found = false;
    for part in raw.split(',') {
        let part = part.trim();
        if part.is_empty() {
            continue;
        }
        total += parse_decimal(part)?;
        found = true;
    }
    found.then_some(total)
}

/// Convert captured d/h/m/s groups to minutes; None when nothing was captured
fn hms_to_minutes(caps: &regex::Captures<'_>) -> Option<Decimal> {
    let group = |i: usize| -> Option<u64> {
        caps.get(i).and_then(|m| m.as_str().parse::<u64>().ok())
    };
    let (d, h, m, s) = (group(1), group(2), group(3), group(4));
    if d.is_none() && h.is_none() && m.is_none() && s.is_none() {
        return None;
    }
    let minutes = Decimal::from(d.unwrap_or(0)) * Decimal::from(24 * 60)
        + Decimal::from(h.unwrap_or(0)) * Decimal::from(60)
        + Decimal::from(m.unwrap_or(0))
        + Decimal::from(s.unwrap_or(0)) / Decimal::from(60);
    Some(minutes)
}

/// Whether a line is a movement/control command (G1, M104, T0, ...)
fn is_command(line: &str) -> bool {
    let mut chars = line.chars();
    match chars.next() {
        Some(c) if matches!(c.to_ascii_uppercase(), 'G' | 'M' | 'T') => {
            chars.next().is_some_and(|d| d.is_ascii_digit())
        }
        _ => false,
    }
}

/// Extract print metrics from G-code text
///
/// Fails with [`ParseError::NoGcodeContent`] when the input has no G-code
/// structure at all, and with [`ParseError::NoMetadata`] when structure is
/// present but no filament-usage or time marker of any dialect matched.
/// A single missing category degrades to zero with a [`MetricWarning`].
pub fn extract(text: &str) -> AppResult<GCodeMetrics> {
    let mut has_structure = false;
    let mut weight_g: Option<Candidate<Decimal>> = None;
    let mut length_mm: Option<Candidate<Decimal>> = None;
    let mut time_minutes: Option<Candidate<Decimal>> = None;
    let mut material: Option<Candidate<String>> = None;

    for raw in text.lines() {
        let line = raw.trim();
        if line.is_empty() {
            continue;
        }
        if line.starts_with(';') || is_command(line) {
            has_structure = true;
        }

        for (i, re) in WEIGHT_PATTERNS.iter().enumerate() {
            if let Some(caps) = re.captures(line) {
                let token = &caps[1];
                let parsed = if i == 0 {
                    sum_weight_list(token)
                } else {
                    parse_decimal(token)
                };
                if let Some(value) = parsed {
                    consider(&mut weight_g, i, value);
                }
                break;
            }
        }

        for (i, re) in LENGTH_MM_PATTERNS.iter().enumerate() {
            if let Some(caps) = re.captures(line) {
                if let Some(value) = parse_decimal(&caps[1]) {
                    // Cura and the generic dialect report meters
                    let mm = if i == 0 { value } else { value * Decimal::ONE_THOUSAND };
                    consider(&mut length_mm, i, mm);
                }
                break;
            }
        }

        let mut time_matched = false;
        for (i, re) in TIME_SECONDS_PATTERNS.iter().enumerate() {
            if let Some(caps) = re.captures(line) {
                if let Some(seconds) = parse_decimal(&caps[1]) {
                    consider(&mut time_minutes, i, seconds / Decimal::from(60));
                }
                time_matched = true;
                break;
            }
        }
        if !time_matched {
            for (i, re) in TIME_HMS_PATTERNS.iter().enumerate() {
                if let Some(caps) = re.captures(line) {
                    if let Some(minutes) = hms_to_minutes(&caps) {
                        // Seconds dialects take precedence over h/m/s text
                        consider(&mut time_minutes, TIME_SECONDS_PATTERNS.len() + i, minutes);
                    }
                    break;
                }
            }
        }

        for (i, re) in MATERIAL_PATTERNS.iter().enumerate() {
            if let Some(caps) = re.captures(line) {
                consider(&mut material, i, caps[1].to_string());
                break;
            }
        }
    }

    if !has_structure {
        return Err(ParseError::NoGcodeContent.into());
    }
    if weight_g.is_none() && length_mm.is_none() && time_minutes.is_none() {
        return Err(ParseError::NoMetadata.into());
    }

    let mut warnings = Vec::new();
    if length_mm.is_none() {
        warnings.push(MetricWarning::FilamentLengthMissing);
    }
    if weight_g.is_none() {
        warnings.push(MetricWarning::FilamentWeightMissing);
    }
    if time_minutes.is_none() {
        warnings.push(MetricWarning::PrintTimeMissing);
    }

    Ok(GCodeMetrics {
        filament_length_mm: length_mm.map(|c| c.value).unwrap_or(Decimal::ZERO),
        filament_weight_g: weight_g.map(|c| c.value).unwrap_or(Decimal::ZERO),
        estimated_time_minutes: time_minutes.map(|c| c.value).unwrap_or(Decimal::ZERO),
        material: material.map(|c| normalize_material(&c.value)),
        warnings,
    })
}
