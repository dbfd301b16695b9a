use std::sync::LazyLock;

use regex::Regex;

use super::types::DEFAULT_SECTION;

/// Which line grammar produced an observation. Reported so callers can
/// see why duplicate names collide; the normalizer keeps the last write.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineGrammar {
    Colon,
    Spaced,
}

/// One raw (name, value, unit, range) tuple lifted from a data line.
#[derive(Debug, Clone, PartialEq)]
pub struct RawObservation {
    pub name: String,
    pub value: f64,
    pub unit: String,
    pub ref_range: Option<String>,
    pub section: String,
    pub grammar: LineGrammar,
}

/// Section headers: uppercase letters and spaces only, at least three
/// characters, optional trailing colon ("COMPLETE BLOOD COUNT").
static SECTION_HEADER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Z][A-Z ]{2,}:?$").unwrap());

/// Ordered line grammars — first match wins. The colon form runs before
/// the spaced form so "Glucose: 95 mg/dL" never parses with a colon stuck
/// to the name. The range group accepts an optional "Ref:" label.
static LINE_GRAMMARS: LazyLock<Vec<(LineGrammar, Regex)>> = LazyLock::new(|| {
    vec![
        (
            LineGrammar::Colon,
            // <name>: <number> <unit> [(Ref: <range>)]
            Regex::new(r"^([^:]+):\s*(\d+(?:\.\d+)?)\s*([^\s(]+)(?:\s*\((?:Ref:\s*)?([^)]+)\))?")
                .unwrap(),
        ),
        (
            LineGrammar::Spaced,
            // <name words> <number> <unit> [(Ref: <range>)]
            Regex::new(
                r"^([A-Za-z][A-Za-z /%'-]*?)\s+(\d+(?:\.\d+)?)\s*([^\s(]+)(?:\s*\((?:Ref:\s*)?([^)]+)\))?",
            )
            .unwrap(),
        ),
    ]
});

/// True when the whole line is a section header.
pub fn is_section_header(line: &str) -> bool {
    SECTION_HEADER.is_match(line)
}

/// Split raw OCR text into section-tagged observations.
///
/// Lines matching no grammar contribute nothing — lossy parsing is the
/// contract here, not an error.
pub fn tokenize_report(text: &str) -> Vec<RawObservation> {
    let mut observations = Vec::new();
    let mut current_section = DEFAULT_SECTION.to_string();

    for raw_line in text.lines() {
        let line = raw_line.trim_end();
        if line.is_empty() {
            continue;
        }
        if is_section_header(line) {
            current_section = line.trim_end_matches(':').trim().to_string();
            continue;
        }
        if let Some(observation) = match_data_line(line, &current_section) {
            observations.push(observation);
        }
    }

    observations
}

/// Try each grammar in order; first match wins.
fn match_data_line(line: &str, section: &str) -> Option<RawObservation> {
    for (grammar, pattern) in LINE_GRAMMARS.iter() {
        let Some(captures) = pattern.captures(line) else {
            continue;
        };
        // The value group is digits-only by construction; a parse that
        // still fails discards the line rather than storing a sentinel.
        let Ok(value) = captures[2].parse::<f64>() else {
            continue;
        };
        return Some(RawObservation {
            name: captures[1].trim().to_string(),
            value,
            unit: captures[3].to_string(),
            ref_range: captures.get(4).map(|m| m.as_str().trim().to_string()),
            section: section.to_string(),
            grammar: *grammar,
        });
    }
    None
}
