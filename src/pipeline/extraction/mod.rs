pub mod ocr;

pub use ocr::*;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ExtractionError {
    #[error("Unsupported file type: {0} (expected an image or PDF)")]
    UnsupportedFileType(String),

    #[error("OCR API key is not configured")]
    MissingApiKey,

    #[error("OCR service unreachable at {0}")]
    Connection(String),

    #[error("OCR service returned error (status {status}): {body}")]
    Api { status: u16, body: String },

    #[error("HTTP client error: {0}")]
    HttpClient(String),

    #[error("Response parsing error: {0}")]
    ResponseParsing(String),

    #[error("No text detected in document")]
    NoTextDetected,

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
