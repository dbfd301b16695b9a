use super::types::RANGE_NOT_PROVIDED;

/// Numeric interval parsed from a reference-range string.
///
/// Either bound may be absent; both absent means the range was missing or
/// unparseable and the caller must classify the result as unknown.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ParsedRange {
    pub min: Option<f64>,
    pub max: Option<f64>,
}

impl ParsedRange {
    pub fn unknown() -> Self {
        Self::default()
    }

    pub fn is_unknown(&self) -> bool {
        self.min.is_none() && self.max.is_none()
    }
}

/// Parse a human-written reference range ("13.5-17.5", "<200", ">40").
///
/// Rules are tried in order: a literal `-` is always a separator (negative
/// bounds are not representable, matching common lab notation), then the
/// `<` and `>` prefix forms. Unparseable numeric tokens resolve that bound
/// to `None`. Never fails.
pub fn parse_reference_range(raw: &str) -> ParsedRange {
    let raw = raw.trim();
    if raw.is_empty() || raw == RANGE_NOT_PROVIDED {
        return ParsedRange::unknown();
    }

    if let Some((low, high)) = raw.split_once('-') {
        return ParsedRange {
            min: parse_bound(low),
            max: parse_bound(high),
        };
    }
    if let Some(rest) = raw.strip_prefix('<') {
        return ParsedRange {
            min: None,
            max: parse_bound(rest),
        };
    }
    if let Some(rest) = raw.strip_prefix('>') {
        return ParsedRange {
            min: parse_bound(rest),
            max: None,
        };
    }

    ParsedRange::unknown()
}

/// Parse one numeric bound; malformed or non-finite tokens become `None`.
fn parse_bound(token: &str) -> Option<f64> {
    token.trim().parse::<f64>().ok().filter(|v| v.is_finite())
}
