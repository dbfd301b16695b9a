use crate::models::{Gender, LabStatus, UserProfile};
use crate::pipeline::parsing::{parse_reference_range, LabResult};

use super::types::ClassifiedResult;

/// Classify one result against its expected interval.
///
/// Two-tier policy: a small specialized catalog (matched by exact name)
/// carries domain thresholds and narrative text; everything else falls to
/// the generic rule driven by the printed reference range. Pure and
/// deterministic — identical inputs always produce identical output.
pub fn classify_result(result: &LabResult, profile: Option<&UserProfile>) -> ClassifiedResult {
    let (status, interpretation) = match result.name.as_str() {
        "Hemoglobin" => classify_hemoglobin(result.value, profile.map(|p| p.gender)),
        "Glucose" => classify_glucose(result.value),
        "Cholesterol" => classify_cholesterol(result.value),
        _ => classify_generic(result),
    };

    ClassifiedResult {
        result: result.clone(),
        status,
        interpretation,
    }
}

/// Hemoglobin cutoffs differ by gender; a missing profile classifies like
/// a non-male one.
fn classify_hemoglobin(value: f64, gender: Option<Gender>) -> (LabStatus, String) {
    let (low, high) = match gender {
        Some(Gender::Male) => (13.5, 17.5),
        _ => (12.0, 15.5),
    };
    let status = if value < low {
        LabStatus::Low
    } else if value > high {
        LabStatus::High
    } else {
        LabStatus::Normal
    };
    let interpretation = match status {
        LabStatus::Normal => "Your hemoglobin level is within normal range.",
        LabStatus::Low => {
            "Low hemoglobin may indicate anemia. Common causes include iron deficiency, \
             blood loss, or chronic diseases."
        }
        _ => "Elevated hemoglobin may be due to dehydration, lung disease, or polycythemia.",
    };
    (status, interpretation.to_string())
}

fn classify_glucose(value: f64) -> (LabStatus, String) {
    let status = if value < 70.0 {
        LabStatus::Low
    } else if value > 99.0 {
        LabStatus::High
    } else {
        LabStatus::Normal
    };
    let interpretation = match status {
        LabStatus::Normal => "Your glucose level is within normal range.".to_string(),
        LabStatus::Low => {
            "Low blood glucose (hypoglycemia) may cause fatigue, dizziness, and confusion. \
             It can be due to medications, insulin excess, or liver disorders."
                .to_string()
        }
        _ if value > 125.0 => {
            "Glucose above 125 mg/dL may indicate diabetes. Consider follow-up testing \
             and consultation with your doctor."
                .to_string()
        }
        _ => {
            "Slightly elevated glucose levels may indicate prediabetes. Lifestyle \
             modifications are recommended."
                .to_string()
        }
    };
    (status, interpretation)
}

/// Total cholesterol uses the three-band desirable/borderline/high split.
fn classify_cholesterol(value: f64) -> (LabStatus, String) {
    let (status, interpretation) = if value < 200.0 {
        (
            LabStatus::Normal,
            "Your total cholesterol is within the desirable range.",
        )
    } else if value < 240.0 {
        (
            LabStatus::Borderline,
            "Your cholesterol is borderline high. Consider dietary changes and increased \
             physical activity.",
        )
    } else {
        (
            LabStatus::High,
            "High cholesterol increases risk for heart disease. Consult your healthcare \
             provider about management strategies.",
        )
    };
    (status, interpretation.to_string())
}

/// Generic rule: interval containment against the printed range, with
/// inclusive bounds. No bounds at all means the status is unknown.
fn classify_generic(result: &LabResult) -> (LabStatus, String) {
    let range = parse_reference_range(&result.ref_range);
    let status = match (range.min, range.max) {
        (Some(min), Some(max)) => {
            if result.value < min {
                LabStatus::Low
            } else if result.value > max {
                LabStatus::High
            } else {
                LabStatus::Normal
            }
        }
        (Some(min), None) => {
            if result.value < min {
                LabStatus::Low
            } else {
                LabStatus::Normal
            }
        }
        (None, Some(max)) => {
            if result.value > max {
                LabStatus::High
            } else {
                LabStatus::Normal
            }
        }
        (None, None) => LabStatus::Unknown,
    };
    let interpretation = match status {
        LabStatus::Normal => format!("Your {} level is within normal range.", result.name),
        LabStatus::Low => format!("Your {} level is below the reference range.", result.name),
        LabStatus::High => format!("Your {} level is above the reference range.", result.name),
        _ => format!(
            "No reference range is available for {}. Discuss this result with your \
             healthcare provider.",
            result.name
        ),
    };
    (status, interpretation)
}
