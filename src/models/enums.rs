use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ModelError {
    #[error("Invalid enum value for {field}: {value}")]
    InvalidEnum { field: String, value: String },
}

/// Patient gender as captured on the profile form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Gender {
    Male,
    Female,
    Other,
}

impl Gender {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Male => "male",
            Self::Female => "female",
            Self::Other => "other",
        }
    }
}

impl std::fmt::Display for Gender {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Gender {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "male" => Ok(Self::Male),
            "female" => Ok(Self::Female),
            "other" => Ok(Self::Other),
            _ => Err(ModelError::InvalidEnum {
                field: "Gender".into(),
                value: s.into(),
            }),
        }
    }
}

/// Classification of a measured value against its expected interval.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LabStatus {
    Low,
    Normal,
    High,
    Borderline,
    Unknown,
}

impl LabStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Low => "Low",
            Self::Normal => "Normal",
            Self::High => "High",
            Self::Borderline => "Borderline",
            Self::Unknown => "Unknown",
        }
    }

    /// Lenient parse for status strings coming back from the enrichment
    /// service — case-insensitive, unknown words rejected rather than
    /// coerced.
    pub fn parse_lenient(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "low" => Some(Self::Low),
            "normal" => Some(Self::Normal),
            "high" => Some(Self::High),
            "borderline" => Some(Self::Borderline),
            "unknown" => Some(Self::Unknown),
            _ => None,
        }
    }
}

impl std::fmt::Display for LabStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn gender_round_trips_through_str() {
        for gender in [Gender::Male, Gender::Female, Gender::Other] {
            assert_eq!(Gender::from_str(gender.as_str()).unwrap(), gender);
        }
    }

    #[test]
    fn gender_rejects_unknown_value() {
        assert!(Gender::from_str("robot").is_err());
    }

    #[test]
    fn gender_serde_uses_lowercase() {
        let json = serde_json::to_string(&Gender::Male).unwrap();
        assert_eq!(json, "\"male\"");
        let parsed: Gender = serde_json::from_str("\"female\"").unwrap();
        assert_eq!(parsed, Gender::Female);
    }

    #[test]
    fn status_parse_lenient_is_case_insensitive() {
        assert_eq!(LabStatus::parse_lenient("HIGH"), Some(LabStatus::High));
        assert_eq!(LabStatus::parse_lenient(" low "), Some(LabStatus::Low));
        assert_eq!(LabStatus::parse_lenient("Borderline"), Some(LabStatus::Borderline));
        assert_eq!(LabStatus::parse_lenient("elevated"), None);
    }

    #[test]
    fn status_displays_capitalized() {
        assert_eq!(LabStatus::Normal.to_string(), "Normal");
        assert_eq!(LabStatus::Unknown.to_string(), "Unknown");
    }
}
