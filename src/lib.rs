//! Bloodlens — private, locally-run blood test report analysis.
//!
//! The pipeline turns raw OCR text into a structured, interpreted report:
//! tokenizer → normalizer → classifier → aggregator → optional LLM
//! enrichment. Every external collaborator (OCR, enrichment, persistence)
//! sits behind a trait with a mock implementation, so the whole pipeline
//! runs deterministically without network access.

pub mod config;
pub mod models;
pub mod pipeline;
pub mod storage;

use tracing_subscriber::EnvFilter;

/// Initialize tracing for binaries embedding the pipeline.
pub fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(config::default_log_filter())),
        )
        .init();

    tracing::info!("{} starting v{}", config::APP_NAME, config::APP_VERSION);
}
