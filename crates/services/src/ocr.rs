//! OCR.space client used to turn workbook photos into text.

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use serde_json::Value;

use crate::error::AnalyzeError;

pub const DEFAULT_OCR_API_URL: &str = "https://api.ocr.space/parse/image";

/// Turns a base64-encoded photo into raw text.
#[async_trait]
pub trait TextRecognizer: Send + Sync {
    /// Recognize the text in `image_base64` (plain base64, no data-URL prefix).
    ///
    /// # Errors
    ///
    /// Returns `AnalyzeError` when the upstream service fails or is unreachable.
    async fn recognize(&self, image_base64: &str) -> Result<String, AnalyzeError>;
}

#[derive(Clone, Debug)]
pub struct OcrConfig {
    pub api_url: String,
    pub api_key: String,
}

#[derive(Clone)]
pub struct OcrSpaceClient {
    client: Client,
    config: Option<OcrConfig>,
}

impl OcrSpaceClient {
    #[must_use]
    pub fn new(config: Option<OcrConfig>) -> Self {
        Self {
            client: Client::new(),
            config,
        }
    }

    #[must_use]
    pub fn enabled(&self) -> bool {
        self.config.is_some()
    }
}

#[async_trait]
impl TextRecognizer for OcrSpaceClient {
    async fn recognize(&self, image_base64: &str) -> Result<String, AnalyzeError> {
        let config = self.config.as_ref().ok_or(AnalyzeError::Disabled)?;

        let image = format!("data:image/jpeg;base64,{image_base64}");
        // Engine 2 handles printed text mixed with handwritten marks best.
        let params = [
            ("apikey", config.api_key.as_str()),
            ("base64Image", image.as_str()),
            ("OCREngine", "2"),
            ("isTable", "true"),
        ];

        let response = self
            .client
            .post(&config.api_url)
            .form(&params)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(AnalyzeError::HttpStatus(response.status()));
        }

        let body: OcrSpaceResponse = response.json().await?;
        body.into_text()
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct OcrSpaceResponse {
    #[serde(default)]
    is_errored_on_processing: bool,
    #[serde(default)]
    error_message: Option<Value>,
    #[serde(default)]
    parsed_results: Option<Vec<ParsedResult>>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct ParsedResult {
    #[serde(default)]
    parsed_text: String,
}

impl OcrSpaceResponse {
    fn into_text(self) -> Result<String, AnalyzeError> {
        if self.is_errored_on_processing {
            return Err(AnalyzeError::Upstream {
                message: upstream_message(self.error_message),
            });
        }

        self.parsed_results
            .and_then(|results| results.into_iter().next())
            .map(|first| first.parsed_text)
            .ok_or(AnalyzeError::EmptyResponse)
    }
}

// OCR.space reports `ErrorMessage` as either a string or an array of strings.
fn upstream_message(raw: Option<Value>) -> String {
    match raw {
        Some(Value::String(message)) => message,
        Some(Value::Array(parts)) => parts
            .iter()
            .filter_map(Value::as_str)
            .collect::<Vec<_>>()
            .join(" "),
        Some(Value::Null) | None => "text recognition failed".to_string(),
        Some(other) => other.to_string(),
    }
}
