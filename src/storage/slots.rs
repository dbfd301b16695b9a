//! Typed accessors over the named storage slots.
//!
//! Three slots exist: the user profile, the current-session extracted
//! report, and the recent-analysis history (bounded, newest first). A
//! corrupt slot is logged and read as absent — the read path never fails.

use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::UserProfile;
use crate::pipeline::parsing::ResultSet;

use super::KeyValueStore;

/// User profile slot key.
pub const USER_PROFILE_KEY: &str = "user_profile";

/// Current-session extracted report slot key.
pub const CURRENT_EXTRACTION_KEY: &str = "current_extraction";

/// Recent-analysis history slot key.
pub const RECENT_ANALYSES_KEY: &str = "recent_analyses";

/// Maximum number of history entries kept.
pub const MAX_RECENT_ANALYSES: usize = 10;

/// Title used when a finished analysis carries none.
const DEFAULT_HISTORY_TITLE: &str = "Blood Test Results";

/// Extracted report for the current session: raw OCR text plus the parsed
/// results derived from it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExtractedReport {
    pub extracted_text: String,
    pub parsed_results: ResultSet,
}

/// One completed analysis in the history buffer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub id: Uuid,
    pub date: DateTime<Utc>,
    pub title: String,
    pub summary: String,
}

impl HistoryEntry {
    pub fn new(title: Option<String>, summary: String) -> Self {
        Self {
            id: Uuid::new_v4(),
            date: Utc::now(),
            title: title.unwrap_or_else(|| DEFAULT_HISTORY_TITLE.to_string()),
            summary,
        }
    }
}

/// Typed slot accessors bound to one injected store.
pub struct StorageSlots {
    store: Box<dyn KeyValueStore + Send + Sync>,
}

impl StorageSlots {
    pub fn new(store: Box<dyn KeyValueStore + Send + Sync>) -> Self {
        Self { store }
    }

    // ── User profile ─────────────────────────────────────

    pub fn save_user_profile(&self, profile: &UserProfile) -> bool {
        self.write_slot(USER_PROFILE_KEY, profile)
    }

    pub fn user_profile(&self) -> Option<UserProfile> {
        self.read_slot(USER_PROFILE_KEY)
    }

    /// Presence check only — does not validate the stored document.
    pub fn has_user_profile(&self) -> bool {
        self.store.get(USER_PROFILE_KEY).is_some()
    }

    // ── Current extraction ───────────────────────────────

    pub fn save_current_extraction(&self, report: &ExtractedReport) -> bool {
        self.write_slot(CURRENT_EXTRACTION_KEY, report)
    }

    pub fn current_extraction(&self) -> Option<ExtractedReport> {
        self.read_slot(CURRENT_EXTRACTION_KEY)
    }

    // ── History ──────────────────────────────────────────

    /// Prepend an entry and trim to capacity (newest first).
    pub fn push_history(&self, entry: HistoryEntry) -> bool {
        let mut history = self.recent_analyses();
        history.insert(0, entry);
        history.truncate(MAX_RECENT_ANALYSES);
        self.write_slot(RECENT_ANALYSES_KEY, &history)
    }

    /// All stored entries, newest first. Empty when the slot is missing
    /// or unreadable.
    pub fn recent_analyses(&self) -> Vec<HistoryEntry> {
        self.read_slot(RECENT_ANALYSES_KEY).unwrap_or_default()
    }

    pub fn analysis_by_id(&self, id: Uuid) -> Option<HistoryEntry> {
        self.recent_analyses().into_iter().find(|e| e.id == id)
    }

    /// Remove every slot (reset flow). True only when all removals took.
    pub fn clear_all(&self) -> bool {
        let profile = self.store.remove(USER_PROFILE_KEY);
        let extraction = self.store.remove(CURRENT_EXTRACTION_KEY);
        let history = self.store.remove(RECENT_ANALYSES_KEY);
        profile && extraction && history
    }

    // ── Slot plumbing ────────────────────────────────────

    fn read_slot<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        let raw = self.store.get(key)?;
        match serde_json::from_str(&raw) {
            Ok(value) => Some(value),
            Err(e) => {
                tracing::warn!(key, error = %e, "Corrupt slot treated as absent");
                None
            }
        }
    }

    fn write_slot<T: Serialize>(&self, key: &str, value: &T) -> bool {
        match serde_json::to_string(value) {
            Ok(raw) => self.store.set(key, &raw),
            Err(e) => {
                tracing::warn!(key, error = %e, "Slot serialization failed");
                false
            }
        }
    }
}
