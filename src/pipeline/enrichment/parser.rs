use std::collections::HashMap;

use serde::Deserialize;

use super::EnrichmentError;

/// Per-test override returned by the enrichment service. Both fields are
/// optional — absent or empty fields leave the basic value in place.
#[derive(Debug, Clone, Deserialize)]
pub struct TestReview {
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub interpretation: Option<String>,
}

/// Payload of a successful analysis-override call.
#[derive(Debug, Clone, Default)]
pub struct EnrichmentPayload {
    pub analysis: HashMap<String, TestReview>,
    pub summary: Option<String>,
    pub recommendations: Option<Vec<String>>,
}

/// Payload of a supplemental-insights call.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct InsightsPayload {
    #[serde(default)]
    pub insights: Option<Vec<String>>,
    #[serde(default, rename = "followUpQuestions")]
    pub follow_up_questions: Option<Vec<String>>,
}

/// Extract the JSON document embedded in a chat response.
///
/// Tries a fenced ```json block first, then the outermost brace-delimited
/// span, then the whole response.
pub fn extract_json_payload(response: &str) -> &str {
    if let Some(start) = response.find("```json") {
        let content_start = start + 7;
        if let Some(end) = response[content_start..].find("```") {
            return response[content_start..content_start + end].trim();
        }
    }
    if let (Some(open), Some(close)) = (response.find('{'), response.rfind('}')) {
        if open < close {
            return &response[open..=close];
        }
    }
    response
}

/// Raw shape of the analysis-override JSON; per-test values stay untyped
/// so a single malformed review is skipped rather than failing the whole
/// payload.
#[derive(Deserialize)]
struct RawEnrichment {
    #[serde(default)]
    analysis: Option<HashMap<String, serde_json::Value>>,
    #[serde(default)]
    summary: Option<String>,
    #[serde(default)]
    recommendations: Option<Vec<String>>,
}

/// Parse an analysis-override response leniently.
pub fn parse_enrichment_response(response: &str) -> Result<EnrichmentPayload, EnrichmentError> {
    let raw: RawEnrichment = serde_json::from_str(extract_json_payload(response))
        .map_err(|e| EnrichmentError::JsonParsing(e.to_string()))?;

    let analysis = raw
        .analysis
        .unwrap_or_default()
        .into_iter()
        .filter_map(|(name, value)| {
            serde_json::from_value::<TestReview>(value)
                .ok()
                .map(|review| (name, review))
        })
        .collect();

    Ok(EnrichmentPayload {
        analysis,
        summary: raw.summary,
        recommendations: raw.recommendations,
    })
}

/// Parse a supplemental-insights response.
pub fn parse_insights_response(response: &str) -> Result<InsightsPayload, EnrichmentError> {
    serde_json::from_str(extract_json_payload(response))
        .map_err(|e| EnrichmentError::JsonParsing(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extracts_fenced_json_block() {
        let response = "Here is my analysis:\n```json\n{\"summary\": \"ok\"}\n```\nHope it helps.";
        assert_eq!(extract_json_payload(response), "{\"summary\": \"ok\"}");
    }

    #[test]
    fn extracts_bare_brace_span() {
        let response = "The result is {\"summary\": \"ok\"} as requested.";
        assert_eq!(extract_json_payload(response), "{\"summary\": \"ok\"}");
    }

    #[test]
    fn falls_back_to_whole_response() {
        assert_eq!(extract_json_payload("no json here"), "no json here");
    }

    #[test]
    fn parses_full_enrichment_payload() {
        let response = r#"```json
{
  "analysis": {
    "Glucose": {"status": "High", "interpretation": "Elevated fasting glucose."}
  },
  "summary": "One elevated value.",
  "recommendations": ["Reduce sugar intake."]
}
```"#;
        let payload = parse_enrichment_response(response).unwrap();
        assert_eq!(payload.analysis.len(), 1);
        let review = &payload.analysis["Glucose"];
        assert_eq!(review.status.as_deref(), Some("High"));
        assert_eq!(
            review.interpretation.as_deref(),
            Some("Elevated fasting glucose.")
        );
        assert_eq!(payload.summary.as_deref(), Some("One elevated value."));
        assert_eq!(payload.recommendations.as_deref().unwrap().len(), 1);
    }

    #[test]
    fn missing_keys_default_to_none() {
        let payload = parse_enrichment_response("{}").unwrap();
        assert!(payload.analysis.is_empty());
        assert!(payload.summary.is_none());
        assert!(payload.recommendations.is_none());
    }

    #[test]
    fn malformed_review_is_skipped_not_fatal() {
        let response = r#"{
  "analysis": {
    "Glucose": {"status": "High", "interpretation": "Elevated."},
    "WBC": "looks fine"
  }
}"#;
        let payload = parse_enrichment_response(response).unwrap();
        assert_eq!(payload.analysis.len(), 1);
        assert!(payload.analysis.contains_key("Glucose"));
    }

    #[test]
    fn invalid_json_is_an_error() {
        let result = parse_enrichment_response("```json\n{broken\n```");
        assert!(matches!(result, Err(EnrichmentError::JsonParsing(_))));
    }

    #[test]
    fn parses_insights_with_camel_case_key() {
        let response = r#"{
  "insights": ["Insight one.", "Insight two."],
  "followUpQuestions": ["Question one?"]
}"#;
        let payload = parse_insights_response(response).unwrap();
        assert_eq!(payload.insights.as_deref().unwrap().len(), 2);
        assert_eq!(payload.follow_up_questions.as_deref().unwrap().len(), 1);
    }

    #[test]
    fn insights_missing_arrays_default_to_none() {
        let payload = parse_insights_response("{}").unwrap();
        assert!(payload.insights.is_none());
        assert!(payload.follow_up_questions.is_none());
    }
}
