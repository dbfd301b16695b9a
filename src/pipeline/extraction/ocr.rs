//! OCR boundary — extracts text from uploaded report files.
//!
//! The core consumes only the returned text; transport, base64 encoding,
//! and image-vs-PDF routing live here. Production goes through the Google
//! Cloud Vision REST API; `MockOcrEngine` serves tests and keyless runs.

use std::path::Path;

use base64::Engine as _;
use serde::{Deserialize, Serialize};
use serde_json::json;

use super::ExtractionError;

/// Default Vision API endpoint.
pub const DEFAULT_VISION_BASE: &str = "https://vision.googleapis.com/v1";

/// files:annotate processes at most five pages per request.
const PDF_PAGES: [u32; 5] = [1, 2, 3, 4, 5];

/// Kind of report file accepted by the OCR boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportFileKind {
    Image,
    Pdf,
}

impl ReportFileKind {
    /// Gate uploads by MIME type: images and PDFs only.
    pub fn from_path(path: &Path) -> Result<Self, ExtractionError> {
        let mime = mime_guess::from_path(path).first_or_octet_stream();
        if mime.type_() == mime_guess::mime::IMAGE {
            Ok(Self::Image)
        } else if mime.essence_str() == "application/pdf" {
            Ok(Self::Pdf)
        } else {
            Err(ExtractionError::UnsupportedFileType(
                mime.essence_str().to_string(),
            ))
        }
    }
}

/// Text extracted from one uploaded report.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OcrOutcome {
    pub text: String,
}

/// OCR engine abstraction (allows mocking).
pub trait OcrEngine {
    fn extract_text(&self, file: &Path) -> Result<OcrOutcome, ExtractionError>;
}

/// Google Cloud Vision OCR client.
///
/// Images go through `images:annotate` with DOCUMENT_TEXT_DETECTION; PDFs
/// through the synchronous `files:annotate` endpoint, first five pages.
pub struct VisionOcrClient {
    base_url: String,
    api_key: String,
    client: reqwest::blocking::Client,
    timeout_secs: u64,
}

impl VisionOcrClient {
    pub fn new(base_url: &str, api_key: &str, timeout_secs: u64) -> Self {
        let client = reqwest::blocking::Client::builder()
            .timeout(std::time::Duration::from_secs(timeout_secs))
            .build()
            .expect("Failed to create HTTP client");

        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
            client,
            timeout_secs,
        }
    }

    /// Client against the public endpoint with the key from the environment.
    pub fn from_env() -> Result<Self, ExtractionError> {
        let key = std::env::var(crate::config::VISION_API_KEY_ENV)
            .map_err(|_| ExtractionError::MissingApiKey)?;
        if key.is_empty() {
            return Err(ExtractionError::MissingApiKey);
        }
        Ok(Self::new(DEFAULT_VISION_BASE, &key, 60))
    }

    fn post(
        &self,
        endpoint: &str,
        body: &serde_json::Value,
    ) -> Result<serde_json::Value, ExtractionError> {
        let url = format!("{}/{}?key={}", self.base_url, endpoint, self.api_key);

        let response = self.client.post(&url).json(body).send().map_err(|e| {
            if e.is_connect() {
                ExtractionError::Connection(self.base_url.clone())
            } else if e.is_timeout() {
                ExtractionError::HttpClient(format!(
                    "Request timed out after {}s",
                    self.timeout_secs
                ))
            } else {
                ExtractionError::HttpClient(e.to_string())
            }
        })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().unwrap_or_default();
            tracing::warn!(
                provider = "vision",
                status = status.as_u16(),
                "OCR request rejected"
            );
            return Err(ExtractionError::Api {
                status: status.as_u16(),
                body,
            });
        }

        response
            .json()
            .map_err(|e| ExtractionError::ResponseParsing(e.to_string()))
    }
}

impl OcrEngine for VisionOcrClient {
    fn extract_text(&self, file: &Path) -> Result<OcrOutcome, ExtractionError> {
        let kind = ReportFileKind::from_path(file)?;
        let _span = tracing::info_span!("ocr_extract", file = %file.display(), kind = ?kind).entered();

        let bytes = std::fs::read(file)?;
        let content = base64::engine::general_purpose::STANDARD.encode(&bytes);

        let text = match kind {
            ReportFileKind::Image => {
                let body = json!({
                    "requests": [{
                        "image": { "content": content },
                        "features": [{ "type": "DOCUMENT_TEXT_DETECTION" }]
                    }]
                });
                let response = self.post("images:annotate", &body)?;
                response["responses"][0]["fullTextAnnotation"]["text"]
                    .as_str()
                    .map(str::to_string)
            }
            ReportFileKind::Pdf => {
                let body = json!({
                    "requests": [{
                        "inputConfig": { "content": content, "mimeType": "application/pdf" },
                        "features": [{ "type": "DOCUMENT_TEXT_DETECTION" }],
                        "pages": PDF_PAGES
                    }]
                });
                let response = self.post("files:annotate", &body)?;
                response["responses"][0]["responses"].as_array().map(|pages| {
                    pages
                        .iter()
                        .filter_map(|page| page["fullTextAnnotation"]["text"].as_str())
                        .collect::<Vec<_>>()
                        .join("\n")
                })
            }
        };

        match text {
            Some(text) if !text.trim().is_empty() => Ok(OcrOutcome { text }),
            _ => Err(ExtractionError::NoTextDetected),
        }
    }
}

/// Canned complete-blood-count report for mock mode and tests.
pub const MOCK_REPORT_TEXT: &str = "COMPLETE BLOOD COUNT\n\
Hemoglobin: 14.2 g/dL (Ref: 13.5-17.5)\n\
WBC: 6.8 thousand/μL (Ref: 4.5-11.0)\n\
Platelets: 250 thousand/μL (Ref: 150-450)\n\
METABOLIC PANEL\n\
Glucose: 95 mg/dL (Ref: 70-99)\n\
Cholesterol: 180 mg/dL (Ref: <200)\n\
HDL: 55 mg/dL (Ref: >40)\n\
LDL: 110 mg/dL (Ref: <130)";

/// Mock OCR engine — same file gating, canned text. Used when
/// [`crate::config::use_mock_data`] is set and in tests.
pub struct MockOcrEngine;

impl OcrEngine for MockOcrEngine {
    fn extract_text(&self, file: &Path) -> Result<OcrOutcome, ExtractionError> {
        ReportFileKind::from_path(file)?;
        Ok(OcrOutcome {
            text: MOCK_REPORT_TEXT.to_string(),
        })
    }
}

/// Engine selection honoring the mock-data flag: mock when set, Vision
/// client from the environment otherwise.
pub fn default_engine() -> Result<Box<dyn OcrEngine + Send + Sync>, ExtractionError> {
    if crate::config::use_mock_data() {
        return Ok(Box::new(MockOcrEngine));
    }
    Ok(Box::new(VisionOcrClient::from_env()?))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn gates_images_and_pdfs() {
        assert_eq!(
            ReportFileKind::from_path(&PathBuf::from("report.png")).unwrap(),
            ReportFileKind::Image
        );
        assert_eq!(
            ReportFileKind::from_path(&PathBuf::from("scan.jpeg")).unwrap(),
            ReportFileKind::Image
        );
        assert_eq!(
            ReportFileKind::from_path(&PathBuf::from("results.pdf")).unwrap(),
            ReportFileKind::Pdf
        );
    }

    #[test]
    fn rejects_other_file_types() {
        let result = ReportFileKind::from_path(&PathBuf::from("notes.txt"));
        assert!(matches!(
            result,
            Err(ExtractionError::UnsupportedFileType(_))
        ));
        let result = ReportFileKind::from_path(&PathBuf::from("archive"));
        assert!(matches!(
            result,
            Err(ExtractionError::UnsupportedFileType(_))
        ));
    }

    #[test]
    fn mock_engine_returns_canned_report() {
        let outcome = MockOcrEngine
            .extract_text(&PathBuf::from("report.png"))
            .unwrap();
        assert!(outcome.text.starts_with("COMPLETE BLOOD COUNT"));
        assert!(outcome.text.contains("Hemoglobin: 14.2 g/dL"));
    }

    #[test]
    fn mock_engine_still_gates_file_type() {
        let result = MockOcrEngine.extract_text(&PathBuf::from("notes.txt"));
        assert!(matches!(
            result,
            Err(ExtractionError::UnsupportedFileType(_))
        ));
    }

    #[test]
    fn vision_client_trims_trailing_slash() {
        let client = VisionOcrClient::new("https://vision.googleapis.com/v1/", "key", 30);
        assert_eq!(client.base_url, "https://vision.googleapis.com/v1");
        assert_eq!(client.timeout_secs, 30);
    }
}
