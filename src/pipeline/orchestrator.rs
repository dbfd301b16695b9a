//! End-to-end pipeline orchestration:
//! raw text → tokenize → normalize → classify → aggregate → enrich →
//! insights → final report. One invocation per user action; no state is
//! shared between runs.

use std::path::Path;

use thiserror::Error;

use crate::models::UserProfile;
use crate::pipeline::analysis::{
    classify_result, recommend, summarize, AnalysisOutcome, ClassifiedSet, ReportAnalysis,
};
use crate::pipeline::enrichment::EnrichmentAdapter;
use crate::pipeline::extraction::{ExtractionError, OcrEngine};
use crate::pipeline::parsing::{parse_report_text, ResultSet};
use crate::storage::{ExtractedReport, HistoryEntry, StorageSlots};

/// Terminal precondition failures — the only errors surfaced to the
/// caller. Everything downstream degrades to a best-effort result.
#[derive(Error, Debug)]
pub enum SessionError {
    #[error("No extracted report data found — upload a report first")]
    MissingExtractedData,

    #[error("A user profile is required for analysis — create one first")]
    MissingProfile,
}

/// Classify every result in first-seen order, then aggregate the summary
/// and recommendations. Pure and deterministic; no network access.
pub fn basic_analysis(parsed: &ResultSet, profile: Option<&UserProfile>) -> AnalysisOutcome {
    let mut analysis = ClassifiedSet::new();
    for result in parsed.iter() {
        analysis.insert(classify_result(result, profile));
    }
    let summary = summarize(&analysis);
    let recommendations = recommend(&analysis);

    AnalysisOutcome {
        analysis,
        summary,
        recommendations,
    }
}

/// Full report analyzer: deterministic pass plus the two best-effort
/// enrichment calls.
pub struct ReportAnalyzer {
    enrichment: EnrichmentAdapter,
}

impl ReportAnalyzer {
    pub fn new(enrichment: EnrichmentAdapter) -> Self {
        Self { enrichment }
    }

    /// Run the full pipeline over already-parsed results. The basic
    /// analysis completes before enrichment is attempted; the insights
    /// call sees the (possibly enriched) analysis.
    pub fn analyze_parsed(&self, parsed: &ResultSet, profile: &UserProfile) -> ReportAnalysis {
        let _span = tracing::info_span!("analyze_report", results = parsed.len()).entered();

        let basic = basic_analysis(parsed, Some(profile));
        let enhanced = self.enrichment.enhance_analysis(parsed, profile, basic);
        let insights = self
            .enrichment
            .supplemental_insights(parsed, profile, &enhanced.analysis);

        ReportAnalysis {
            analysis: enhanced.analysis,
            summary: enhanced.summary,
            recommendations: enhanced.recommendations,
            insights: insights.insights,
            follow_up_questions: insights.follow_up_questions,
        }
    }

    /// Tokenize and normalize raw OCR text, then run the full pipeline.
    pub fn analyze_text(&self, raw_text: &str, profile: &UserProfile) -> ReportAnalysis {
        self.analyze_parsed(&parse_report_text(raw_text), profile)
    }
}

/// Extract text from an uploaded report and stage it as the current
/// session snapshot. The OCR call completes before parsing begins; a
/// superseding upload simply overwrites the slot.
pub fn extract_and_stage(
    engine: &dyn OcrEngine,
    slots: &StorageSlots,
    file: &Path,
) -> Result<ExtractedReport, ExtractionError> {
    let outcome = engine.extract_text(file)?;
    let report = ExtractedReport {
        parsed_results: parse_report_text(&outcome.text),
        extracted_text: outcome.text,
    };
    if !slots.save_current_extraction(&report) {
        tracing::warn!("Failed to persist current extraction");
    }
    Ok(report)
}

/// Analyze the stored session. Both preconditions are checked before any
/// work happens: the current extraction first, then the profile. The
/// finished analysis is appended to history best-effort — a failed write
/// is logged, never surfaced.
pub fn analyze_current_session(
    slots: &StorageSlots,
    analyzer: &ReportAnalyzer,
) -> Result<ReportAnalysis, SessionError> {
    let extraction = slots
        .current_extraction()
        .ok_or(SessionError::MissingExtractedData)?;
    let profile = slots.user_profile().ok_or(SessionError::MissingProfile)?;

    let report = analyzer.analyze_parsed(&extraction.parsed_results, &profile);

    if !slots.push_history(HistoryEntry::new(None, report.summary.text.clone())) {
        tracing::warn!("Failed to record analysis in history");
    }

    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Gender, LabStatus};
    use crate::pipeline::enrichment::{EnrichmentAdapter, MockChatClient};
    use crate::pipeline::extraction::MOCK_REPORT_TEXT;
    use crate::storage::{ExtractedReport, MemoryStore, StorageSlots};

    /// Analyzer whose enrichment calls always fail — exercises the
    /// deterministic path end to end.
    fn offline_analyzer() -> ReportAnalyzer {
        ReportAnalyzer::new(EnrichmentAdapter::new(Box::new(MockChatClient::failing(
            "offline",
        ))))
    }

    fn male_profile() -> UserProfile {
        UserProfile::new(45, Gender::Male)
    }

    // ── End-to-end scenarios ────────────────────────────────

    #[test]
    fn normal_hemoglobin_for_male_profile() {
        let report = offline_analyzer()
            .analyze_text("Hemoglobin: 14.2 g/dL (Ref: 13.5-17.5)", &male_profile());
        let hemoglobin = report.analysis.get("Hemoglobin").unwrap();
        assert_eq!(hemoglobin.status, LabStatus::Normal);
    }

    #[test]
    fn elevated_glucose_drives_summary_and_recommendations() {
        let report =
            offline_analyzer().analyze_text("Glucose: 130 mg/dL (Ref: 70-99)", &male_profile());

        assert_eq!(report.analysis.get("Glucose").unwrap().status, LabStatus::High);
        assert!(report.summary.text.contains("We found 1 result(s)"));
        assert_eq!(report.summary.abnormal_count, 1);
        assert_eq!(report.recommendations.len(), 3);
        assert!(report.recommendations[0].contains("refined sugars"));
    }

    #[test]
    fn borderline_cholesterol_uses_specialized_rule() {
        let report =
            offline_analyzer().analyze_text("Cholesterol: 210 mg/dL (Ref: <200)", &male_profile());
        assert_eq!(
            report.analysis.get("Cholesterol").unwrap().status,
            LabStatus::Borderline
        );
    }

    #[test]
    fn unknown_analyte_without_range() {
        let report = offline_analyzer().analyze_text("FooMarker: 5 units", &male_profile());
        let marker = report.analysis.get("FooMarker").unwrap();
        assert_eq!(marker.status, LabStatus::Unknown);
        assert!(marker.interpretation.contains("FooMarker"));
    }

    #[test]
    fn mock_report_is_fully_normal_for_male() {
        let report = offline_analyzer().analyze_text(MOCK_REPORT_TEXT, &male_profile());
        assert_eq!(report.analysis.len(), 7);
        assert_eq!(report.summary.abnormal_count, 0);
        assert!(report.summary.text.contains("Your results look good!"));
    }

    // ── Enrichment failure invariants ───────────────────────

    #[test]
    fn failed_enrichment_equals_basic_analysis() {
        let parsed = parse_report_text("Glucose: 130 mg/dL (Ref: 70-99)");
        let profile = male_profile();
        let basic = basic_analysis(&parsed, Some(&profile));

        let report = offline_analyzer().analyze_parsed(&parsed, &profile);
        assert_eq!(report.analysis, basic.analysis);
        assert_eq!(report.summary, basic.summary);
        assert_eq!(report.recommendations, basic.recommendations);
        // Insights degrade to the fixed defaults.
        assert_eq!(report.insights.len(), 2);
        assert_eq!(report.follow_up_questions.len(), 2);
    }

    #[test]
    fn pipeline_is_idempotent_with_enrichment_stubbed() {
        let profile = male_profile();
        let analyzer = offline_analyzer();

        let first = analyzer.analyze_text(MOCK_REPORT_TEXT, &profile);
        let second = analyzer.analyze_text(MOCK_REPORT_TEXT, &profile);
        assert_eq!(
            serde_json::to_string(&first.summary).unwrap(),
            serde_json::to_string(&second.summary).unwrap()
        );
        assert_eq!(first, second);
    }

    #[test]
    fn successful_enrichment_overrides_flow_into_report() {
        let response = r#"```json
{
  "analysis": {"Glucose": {"interpretation": "Fasting glucose is elevated for your age."}},
  "summary": "Glucose needs attention; everything else is fine.",
  "recommendations": ["Repeat the fasting panel in three months."]
}
```"#;
        let analyzer = ReportAnalyzer::new(EnrichmentAdapter::new(Box::new(
            MockChatClient::new(response),
        )));
        let report = analyzer.analyze_text("Glucose: 130 mg/dL (Ref: 70-99)", &male_profile());

        assert_eq!(
            report.analysis.get("Glucose").unwrap().interpretation,
            "Fasting glucose is elevated for your age."
        );
        assert_eq!(report.summary.text, "Glucose needs attention; everything else is fine.");
        assert_eq!(report.recommendations, vec![
            "Repeat the fasting panel in three months.".to_string()
        ]);
        // Status was not overridden — the deterministic value remains.
        assert_eq!(report.analysis.get("Glucose").unwrap().status, LabStatus::High);
    }

    // ── Stored-session flow ─────────────────────────────────

    fn slots_with(profile: Option<&UserProfile>, text: Option<&str>) -> StorageSlots {
        let slots = StorageSlots::new(Box::new(MemoryStore::new()));
        if let Some(profile) = profile {
            slots.save_user_profile(profile);
        }
        if let Some(text) = text {
            slots.save_current_extraction(&ExtractedReport {
                extracted_text: text.to_string(),
                parsed_results: parse_report_text(text),
            });
        }
        slots
    }

    #[test]
    fn session_requires_extracted_data() {
        let slots = slots_with(Some(&male_profile()), None);
        let result = analyze_current_session(&slots, &offline_analyzer());
        assert!(matches!(result, Err(SessionError::MissingExtractedData)));
    }

    #[test]
    fn session_requires_profile() {
        let slots = slots_with(None, Some(MOCK_REPORT_TEXT));
        let result = analyze_current_session(&slots, &offline_analyzer());
        assert!(matches!(result, Err(SessionError::MissingProfile)));
    }

    #[test]
    fn corrupt_extraction_slot_is_a_precondition_failure() {
        use crate::storage::{KeyValueStore, CURRENT_EXTRACTION_KEY};

        let store = MemoryStore::new();
        store.set(CURRENT_EXTRACTION_KEY, "{broken");
        let slots = StorageSlots::new(Box::new(store));
        slots.save_user_profile(&male_profile());

        let result = analyze_current_session(&slots, &offline_analyzer());
        assert!(matches!(result, Err(SessionError::MissingExtractedData)));
    }

    #[test]
    fn session_appends_history_entry() {
        let slots = slots_with(Some(&male_profile()), Some("Glucose: 130 mg/dL (Ref: 70-99)"));
        let report = analyze_current_session(&slots, &offline_analyzer()).unwrap();

        let history = slots.recent_analyses();
        assert_eq!(history.len(), 1);
        assert_eq!(history[0].title, "Blood Test Results");
        assert_eq!(history[0].summary, report.summary.text);
    }

    // ── Upload staging ──────────────────────────────────────

    #[test]
    fn extract_and_stage_fills_current_extraction() {
        use crate::pipeline::extraction::MockOcrEngine;
        use std::path::PathBuf;

        let slots = slots_with(None, None);
        let staged = extract_and_stage(&MockOcrEngine, &slots, &PathBuf::from("report.png"))
            .unwrap();

        assert_eq!(staged.parsed_results.len(), 7);
        assert_eq!(slots.current_extraction().unwrap(), staged);
    }

    #[test]
    fn staged_upload_flows_into_session_analysis() {
        use crate::pipeline::extraction::MockOcrEngine;
        use std::path::PathBuf;

        let slots = slots_with(Some(&male_profile()), None);
        extract_and_stage(&MockOcrEngine, &slots, &PathBuf::from("report.png")).unwrap();

        let report = analyze_current_session(&slots, &offline_analyzer()).unwrap();
        assert_eq!(report.summary.abnormal_count, 0);
        assert_eq!(slots.recent_analyses().len(), 1);
    }

    #[test]
    fn extract_and_stage_surfaces_unsupported_files() {
        use crate::pipeline::extraction::MockOcrEngine;
        use std::path::PathBuf;

        let slots = slots_with(None, None);
        let result = extract_and_stage(&MockOcrEngine, &slots, &PathBuf::from("notes.txt"));
        assert!(matches!(result, Err(ExtractionError::UnsupportedFileType(_))));
        assert!(slots.current_extraction().is_none());
    }
}
