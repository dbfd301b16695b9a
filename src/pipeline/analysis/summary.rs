use crate::models::LabStatus;

use super::types::{AnalysisSummary, ClassifiedSet};

/// Glucose above this (mg/dL) earns the stronger summary clause.
const GLUCOSE_DIABETES_CUTOFF: f64 = 125.0;

/// Reduce classified results to the overall narrative summary.
///
/// Abnormal parameters are collected in first-seen order. When any exist,
/// the count sentence is followed by the Glucose elaboration, then the
/// Hemoglobin one — fixed order, then the closing advice sentence.
pub fn summarize(analysis: &ClassifiedSet) -> AnalysisSummary {
    let abnormal_params: Vec<String> = analysis
        .iter()
        .filter(|r| r.status != LabStatus::Normal)
        .map(|r| r.result.name.clone())
        .collect();

    let text = if abnormal_params.is_empty() {
        "All tested parameters are within normal ranges. Your results look good!".to_string()
    } else {
        let mut text = format!(
            "We found {} result(s) outside the normal range. ",
            abnormal_params.len()
        );
        if let Some(glucose) = analysis.get("Glucose") {
            if glucose.status != LabStatus::Normal && glucose.result.value > GLUCOSE_DIABETES_CUTOFF
            {
                text.push_str("Your glucose level is significantly elevated. ");
            }
        }
        if let Some(hemoglobin) = analysis.get("Hemoglobin") {
            if hemoglobin.status == LabStatus::Low {
                text.push_str("Your hemoglobin is low, which may indicate anemia. ");
            }
        }
        text.push_str("Please consult with your healthcare provider about these findings.");
        text
    };

    AnalysisSummary {
        text,
        abnormal_count: abnormal_params.len(),
        abnormal_params,
    }
}

/// Rule-based lifestyle recommendations.
///
/// Blocks accumulate without deduplication; the generic wellness block
/// only appears when no specific rule fired.
pub fn recommend(analysis: &ClassifiedSet) -> Vec<String> {
    let abnormal: Vec<&str> = analysis
        .iter()
        .filter(|r| r.status != LabStatus::Normal)
        .map(|r| r.result.name.as_str())
        .collect();

    let mut recommendations: Vec<String> = Vec::new();

    if abnormal.contains(&"Cholesterol") || abnormal.contains(&"LDL") {
        recommendations.extend(
            [
                "Consider a heart-healthy diet rich in fruits, vegetables, whole grains, and lean proteins.",
                "Aim for regular physical activity of at least 150 minutes per week.",
                "Limit saturated and trans fats in your diet.",
            ]
            .map(String::from),
        );
    }

    if abnormal.contains(&"Glucose") {
        recommendations.extend(
            [
                "Maintain a balanced diet low in refined sugars and carbohydrates.",
                "Regular physical activity helps improve insulin sensitivity.",
                "Monitor your carbohydrate intake and consider eating smaller, more frequent meals.",
            ]
            .map(String::from),
        );
    }

    if recommendations.is_empty() {
        recommendations.extend(
            [
                "Continue with a balanced diet and regular exercise.",
                "Schedule regular check-ups with your healthcare provider.",
                "Stay hydrated and get adequate sleep for overall health.",
            ]
            .map(String::from),
        );
    }

    recommendations
}
