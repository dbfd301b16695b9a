use serde::{Deserialize, Serialize};

use crate::models::LabStatus;
use crate::pipeline::parsing::LabResult;

/// A lab result plus its classification and canned interpretation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassifiedResult {
    #[serde(flatten)]
    pub result: LabResult,
    pub status: LabStatus,
    pub interpretation: String,
}

/// Insertion-order map of classified results keyed by analyte name.
/// Same merge policy as [`crate::pipeline::parsing::ResultSet`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ClassifiedSet {
    entries: Vec<ClassifiedResult>,
}

impl ClassifiedSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, classified: ClassifiedResult) {
        match self
            .entries
            .iter_mut()
            .find(|e| e.result.name == classified.result.name)
        {
            Some(slot) => *slot = classified,
            None => self.entries.push(classified),
        }
    }

    pub fn get(&self, name: &str) -> Option<&ClassifiedResult> {
        self.entries.iter().find(|e| e.result.name == name)
    }

    pub fn get_mut(&mut self, name: &str) -> Option<&mut ClassifiedResult> {
        self.entries.iter_mut().find(|e| e.result.name == name)
    }

    /// Iterate in first-seen order.
    pub fn iter(&self) -> std::slice::Iter<'_, ClassifiedResult> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Deterministic overall summary of one report.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisSummary {
    pub text: String,
    pub abnormal_count: usize,
    /// Names with a non-Normal status, in first-seen order.
    pub abnormal_params: Vec<String>,
}

/// Output of the deterministic analysis stages, before enrichment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisOutcome {
    pub analysis: ClassifiedSet,
    pub summary: AnalysisSummary,
    pub recommendations: Vec<String>,
}

/// Final report handed to presentation: the (possibly enriched) analysis
/// plus the additive insight lists.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportAnalysis {
    pub analysis: ClassifiedSet,
    pub summary: AnalysisSummary,
    pub recommendations: Vec<String>,
    pub insights: Vec<String>,
    pub follow_up_questions: Vec<String>,
}
