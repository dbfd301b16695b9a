pub mod client;
pub mod prompt;
pub mod parser;
pub mod adapter;

pub use client::*;
pub use prompt::*;
pub use parser::*;
pub use adapter::*;

use thiserror::Error;

/// Failures internal to the enrichment boundary. None of these propagate
/// past the adapter — they all degrade to the deterministic fallback.
#[derive(Error, Debug)]
pub enum EnrichmentError {
    #[error("Enrichment service unreachable at {0}")]
    Connection(String),

    #[error("Enrichment service returned error (status {status}): {body}")]
    Api { status: u16, body: String },

    #[error("HTTP client error: {0}")]
    HttpClient(String),

    #[error("Malformed enrichment response: {0}")]
    MalformedResponse(String),

    #[error("JSON parsing error: {0}")]
    JsonParsing(String),

    #[error("Response parsing error: {0}")]
    ResponseParsing(String),
}
