use super::tokenizer::{tokenize_report, RawObservation};
use super::types::{LabResult, ResultSet, RANGE_NOT_PROVIDED};

/// Assemble tokenizer output into the final name-keyed result map.
///
/// Observations are inserted in order; a later observation with the same
/// name replaces the earlier entry entirely. A missing range group becomes
/// the [`RANGE_NOT_PROVIDED`] sentinel. Numeric well-formedness is
/// guaranteed upstream by the tokenizer and not re-validated here.
pub fn normalize_observations(observations: Vec<RawObservation>) -> ResultSet {
    let mut results = ResultSet::new();
    for observation in observations {
        results.insert(LabResult {
            name: observation.name,
            value: observation.value,
            unit: observation.unit,
            ref_range: observation
                .ref_range
                .unwrap_or_else(|| RANGE_NOT_PROVIDED.to_string()),
            section: observation.section,
        });
    }
    results
}

/// Tokenize and normalize raw report text in one call.
pub fn parse_report_text(text: &str) -> ResultSet {
    normalize_observations(tokenize_report(text))
}
