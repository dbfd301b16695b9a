use serde::{Deserialize, Serialize};

use super::enums::Gender;

/// A user's health profile — created and edited by the user, persisted in
/// the profile slot, and a read-only input to the classifier.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserProfile {
    pub age: u32,
    pub gender: Gender,
    #[serde(default)]
    pub weight: Option<f64>,
    #[serde(default)]
    pub height: Option<f64>,
    #[serde(default)]
    pub existing_conditions: Option<String>,
    #[serde(default)]
    pub medications: Option<String>,
}

impl UserProfile {
    /// Minimal profile with only the fields the classifier reads.
    pub fn new(age: u32, gender: Gender) -> Self {
        Self {
            age,
            gender,
            weight: None,
            height: None,
            existing_conditions: None,
            medications: None,
        }
    }
}
