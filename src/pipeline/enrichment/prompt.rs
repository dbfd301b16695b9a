use crate::models::{LabStatus, UserProfile};
use crate::pipeline::analysis::ClassifiedSet;
use crate::pipeline::parsing::ResultSet;

/// System prompt shared by both enrichment calls.
pub const MEDICAL_SYSTEM_PROMPT: &str = "You are a medical analysis assistant specialized in \
blood test interpretation. Provide factual medical information based on the provided data. \
Always note that your analysis is not a substitute for professional medical advice.";

/// Factual temperature for the analysis-override call.
pub const ANALYSIS_TEMPERATURE: f32 = 0.3;

/// Slightly looser temperature for the insights call.
pub const INSIGHTS_TEMPERATURE: f32 = 0.4;

/// Build the analysis-override prompt: patient context, the raw results,
/// and the expected JSON shape.
pub fn build_analysis_prompt(parsed: &ResultSet, profile: &UserProfile) -> String {
    let conditions = profile
        .existing_conditions
        .as_deref()
        .map(|c| format!("Existing conditions: {c}"))
        .unwrap_or_else(|| "No known conditions".to_string());
    let medications = profile
        .medications
        .as_deref()
        .map(|m| format!("Current medications: {m}"))
        .unwrap_or_else(|| "No current medications".to_string());

    let results = parsed
        .iter()
        .map(|r| format!("{}: {} {} (Reference Range: {})", r.name, r.value, r.unit, r.ref_range))
        .collect::<Vec<_>>()
        .join("\n");

    format!(
        "Please analyze the following blood test results for a {age}-year-old {gender} patient:\n\
         \n\
         MEDICAL HISTORY:\n\
         {conditions}\n\
         {medications}\n\
         \n\
         BLOOD TEST RESULTS:\n\
         {results}\n\
         \n\
         Please provide the following in JSON format:\n\
         1. An analysis object with detailed interpretations for each test\n\
         2. A summary paragraph of the overall results\n\
         3. An array of personalized recommendations based on the results\n\
         \n\
         Format your response as valid JSON with these keys: \"analysis\", \"summary\", \
         \"recommendations\".",
        age = profile.age,
        gender = profile.gender,
    )
}

/// Build the supplemental-insights prompt. Each result line carries the
/// status assigned by the (possibly enriched) analysis.
pub fn build_insights_prompt(
    parsed: &ResultSet,
    profile: &UserProfile,
    analysis: &ClassifiedSet,
) -> String {
    let results = parsed
        .iter()
        .map(|r| {
            let status = analysis
                .get(&r.name)
                .map(|c| c.status)
                .unwrap_or(LabStatus::Unknown);
            format!(
                "{}: {} {} (Reference: {}) - Status: {}",
                r.name, r.value, r.unit, r.ref_range, status
            )
        })
        .collect::<Vec<_>>()
        .join("\n");

    format!(
        "Based on the following blood test results and patient profile, provide detailed \
         medical insights and follow-up questions.\n\
         \n\
         PATIENT PROFILE:\n\
         Age: {age}\n\
         Gender: {gender}\n\
         Existing Conditions: {conditions}\n\
         Current Medications: {medications}\n\
         \n\
         BLOOD TEST RESULTS:\n\
         {results}\n\
         \n\
         Please provide:\n\
         1. 4-6 detailed medical insights that consider the patient's profile and test results\n\
         2. 3-5 relevant follow-up questions for the patient or their healthcare provider\n\
         \n\
         Format your response as JSON with \"insights\" and \"followUpQuestions\" arrays.",
        age = profile.age,
        gender = profile.gender,
        conditions = profile.existing_conditions.as_deref().unwrap_or("None reported"),
        medications = profile.medications.as_deref().unwrap_or("None reported"),
    )
}
