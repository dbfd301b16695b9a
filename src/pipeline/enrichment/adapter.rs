use serde::{Deserialize, Serialize};

use crate::models::{LabStatus, UserProfile};
use crate::pipeline::analysis::{AnalysisOutcome, ClassifiedSet};
use crate::pipeline::parsing::ResultSet;

use super::client::ChatClient;
use super::parser::{parse_enrichment_response, parse_insights_response, EnrichmentPayload};
use super::prompt::{
    build_analysis_prompt, build_insights_prompt, ANALYSIS_TEMPERATURE, INSIGHTS_TEMPERATURE,
    MEDICAL_SYSTEM_PROMPT,
};

/// Insights used whenever the supplemental call degrades.
pub const DEFAULT_INSIGHTS: [&str; 2] = [
    "Consider discussing these results with your healthcare provider for a complete interpretation.",
    "Regular monitoring of your blood values is recommended for tracking your health over time.",
];

/// Follow-up questions used whenever the supplemental call degrades.
pub const DEFAULT_FOLLOW_UP_QUESTIONS: [&str; 2] = [
    "When was your last complete physical examination?",
    "Have you noticed any changes in your health recently?",
];

/// Supplemental narrative produced by the second enrichment call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InsightsOutcome {
    pub insights: Vec<String>,
    pub follow_up_questions: Vec<String>,
}

impl InsightsOutcome {
    /// The fixed fallback lists.
    pub fn fallback() -> Self {
        Self {
            insights: DEFAULT_INSIGHTS.map(String::from).to_vec(),
            follow_up_questions: DEFAULT_FOLLOW_UP_QUESTIONS.map(String::from).to_vec(),
        }
    }
}

/// Best-effort boundary to the external text-generation service.
///
/// Neither call ever raises past this boundary: `enhance_analysis` falls
/// back to the deterministic outcome it was given, `supplemental_insights`
/// falls back to the fixed default lists. Failures are logged only.
pub struct EnrichmentAdapter {
    client: Box<dyn ChatClient + Send + Sync>,
}

impl EnrichmentAdapter {
    pub fn new(client: Box<dyn ChatClient + Send + Sync>) -> Self {
        Self { client }
    }

    /// Ask the service to refine the basic analysis. Enrichment values win
    /// only where present and non-empty; everything else keeps the value
    /// from the deterministic pass.
    pub fn enhance_analysis(
        &self,
        parsed: &ResultSet,
        profile: &UserProfile,
        basic: AnalysisOutcome,
    ) -> AnalysisOutcome {
        let prompt = build_analysis_prompt(parsed, profile);

        let response = match self
            .client
            .complete(MEDICAL_SYSTEM_PROMPT, &prompt, ANALYSIS_TEMPERATURE)
        {
            Ok(response) => response,
            Err(e) => {
                tracing::warn!(
                    provider = "enrichment",
                    error = %e,
                    "Analysis enrichment failed, using basic analysis"
                );
                return basic;
            }
        };

        match parse_enrichment_response(&response) {
            Ok(payload) => merge_enrichment(basic, payload),
            Err(e) => {
                tracing::warn!(
                    provider = "enrichment",
                    error = %e,
                    "Enrichment payload unreadable, using basic analysis"
                );
                basic
            }
        }
    }

    /// Ask for supplemental insights. Additive only — any failure yields
    /// the default lists, reported as a success to the caller.
    pub fn supplemental_insights(
        &self,
        parsed: &ResultSet,
        profile: &UserProfile,
        analysis: &ClassifiedSet,
    ) -> InsightsOutcome {
        let prompt = build_insights_prompt(parsed, profile, analysis);

        let payload = self
            .client
            .complete(MEDICAL_SYSTEM_PROMPT, &prompt, INSIGHTS_TEMPERATURE)
            .and_then(|response| parse_insights_response(&response));

        match payload {
            Ok(payload) => {
                let fallback = InsightsOutcome::fallback();
                InsightsOutcome {
                    insights: payload
                        .insights
                        .filter(|v| !v.is_empty())
                        .unwrap_or(fallback.insights),
                    follow_up_questions: payload
                        .follow_up_questions
                        .filter(|v| !v.is_empty())
                        .unwrap_or(fallback.follow_up_questions),
                }
            }
            Err(e) => {
                tracing::warn!(
                    provider = "enrichment",
                    error = %e,
                    "Insights call failed, using default insights"
                );
                InsightsOutcome::fallback()
            }
        }
    }
}

/// Field-by-field merge: enrichment wins only where present and non-empty.
/// Reviews naming tests absent from the basic analysis are ignored; the
/// abnormal counts stay derived from the deterministic classification.
fn merge_enrichment(mut basic: AnalysisOutcome, payload: EnrichmentPayload) -> AnalysisOutcome {
    for (name, review) in payload.analysis {
        let Some(entry) = basic.analysis.get_mut(&name) else {
            continue;
        };
        if let Some(interpretation) = review.interpretation.filter(|s| !s.trim().is_empty()) {
            entry.interpretation = interpretation;
        }
        if let Some(status) = review.status.as_deref().and_then(LabStatus::parse_lenient) {
            entry.status = status;
        }
    }
    if let Some(summary) = payload.summary.filter(|s| !s.trim().is_empty()) {
        basic.summary.text = summary;
    }
    if let Some(recommendations) = payload.recommendations.filter(|v| !v.is_empty()) {
        basic.recommendations = recommendations;
    }
    basic
}
