use serde::{Deserialize, Serialize};

/// Sentinel stored when a data line carried no reference range.
pub const RANGE_NOT_PROVIDED: &str = "Not provided";

/// Section assigned to observations seen before any section header.
pub const DEFAULT_SECTION: &str = "General";

/// One measured analyte as printed on the report.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LabResult {
    /// Analyte name — unique key within one report.
    pub name: String,
    /// Parsed numeric measurement. Always finite; lines whose value token
    /// fails to parse are dropped upstream rather than stored.
    pub value: f64,
    /// Free-text unit token, unvalidated.
    pub unit: String,
    /// Raw range text as written, or [`RANGE_NOT_PROVIDED`].
    pub ref_range: String,
    /// Most recent section header above this line.
    pub section: String,
}

/// Insertion-order map of results keyed by analyte name.
///
/// Merge policy: a duplicate name replaces the stored entry but keeps the
/// first-seen position (last write wins). Iteration order is therefore
/// stable across re-parses of the same text, which downstream summary
/// ordering relies on.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ResultSet {
    entries: Vec<LabResult>,
}

impl ResultSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a result, overwriting any earlier entry with the same name.
    pub fn insert(&mut self, result: LabResult) {
        match self.entries.iter_mut().find(|e| e.name == result.name) {
            Some(slot) => *slot = result,
            None => self.entries.push(result),
        }
    }

    pub fn get(&self, name: &str) -> Option<&LabResult> {
        self.entries.iter().find(|e| e.name == name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    /// Iterate in first-seen order.
    pub fn iter(&self) -> std::slice::Iter<'_, LabResult> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn result(name: &str, value: f64) -> LabResult {
        LabResult {
            name: name.to_string(),
            value,
            unit: "mg/dL".to_string(),
            ref_range: RANGE_NOT_PROVIDED.to_string(),
            section: DEFAULT_SECTION.to_string(),
        }
    }

    #[test]
    fn preserves_first_seen_order() {
        let mut set = ResultSet::new();
        set.insert(result("Glucose", 95.0));
        set.insert(result("Cholesterol", 180.0));
        set.insert(result("HDL", 55.0));

        let names: Vec<&str> = set.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["Glucose", "Cholesterol", "HDL"]);
    }

    #[test]
    fn duplicate_name_overwrites_in_place() {
        let mut set = ResultSet::new();
        set.insert(result("Glucose", 95.0));
        set.insert(result("Cholesterol", 180.0));
        set.insert(result("Glucose", 130.0));

        assert_eq!(set.len(), 2);
        // Last write wins for the value...
        assert_eq!(set.get("Glucose").unwrap().value, 130.0);
        // ...but the first-seen position is kept.
        let names: Vec<&str> = set.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["Glucose", "Cholesterol"]);
    }

    #[test]
    fn get_misses_return_none() {
        let set = ResultSet::new();
        assert!(set.get("Ferritin").is_none());
        assert!(!set.contains("Ferritin"));
        assert!(set.is_empty());
    }
}
