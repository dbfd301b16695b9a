use std::path::PathBuf;

/// Application-level constants
pub const APP_NAME: &str = "Bloodlens";
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Environment variable holding the Google Cloud Vision API key (OCR).
pub const VISION_API_KEY_ENV: &str = "BLOODLENS_VISION_API_KEY";

/// Environment variable holding the OpenAI API key (enrichment).
pub const OPENAI_API_KEY_ENV: &str = "BLOODLENS_OPENAI_API_KEY";

/// Environment variable that switches the OCR boundary to canned mock data.
pub const USE_MOCK_DATA_ENV: &str = "BLOODLENS_USE_MOCK_DATA";

/// Placeholder value that setup instructions tell users to replace.
const PLACEHOLDER_KEY: &str = "your-api-key-here";

/// Default log filter when RUST_LOG is unset.
pub fn default_log_filter() -> &'static str {
    "info"
}

/// Get the application data directory
/// ~/Bloodlens/ on all platforms (user-visible, per design requirement)
pub fn app_data_dir() -> PathBuf {
    let home = dirs::home_dir().expect("Cannot determine home directory");
    home.join("Bloodlens")
}

/// Get the slot directory for the file-backed key-value store
pub fn store_dir() -> PathBuf {
    app_data_dir().join("store")
}

/// Whether the OCR boundary should return canned mock data.
pub fn use_mock_data() -> bool {
    std::env::var(USE_MOCK_DATA_ENV).map(|v| v == "true").unwrap_or(false)
}

/// Whether both external API keys are configured with real values.
pub fn apis_configured() -> bool {
    [VISION_API_KEY_ENV, OPENAI_API_KEY_ENV].iter().all(|key| {
        std::env::var(key)
            .map(|v| !v.is_empty() && v != PLACEHOLDER_KEY)
            .unwrap_or(false)
    })
}
