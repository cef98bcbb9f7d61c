use std::sync::Arc;

use serde::Serialize;
use tracing::{info, warn};
use tracker_core::extract::{ExtractionResult, extract};

use crate::error::AnalyzeError;
use crate::ocr::TextRecognizer;

/// Raw recognized text plus the level/book candidates found in it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyzeResult {
    pub raw_text: String,
    pub extracted: ExtractionResult,
}

/// Runs a workbook photo through text recognition and field extraction.
#[derive(Clone)]
pub struct AnalyzeService {
    recognizer: Arc<dyn TextRecognizer>,
}

impl AnalyzeService {
    #[must_use]
    pub fn new(recognizer: Arc<dyn TextRecognizer>) -> Self {
        Self { recognizer }
    }

    /// Recognize text in the photo and extract level/book candidates.
    ///
    /// An extraction that finds nothing is still a success; only a missing
    /// image or a recognizer failure is an error. Nothing is retried.
    ///
    /// # Errors
    ///
    /// Returns `AnalyzeError::MissingImage` for an empty image, or the
    /// recognizer's error.
    pub async fn analyze(&self, image_base64: &str) -> Result<AnalyzeResult, AnalyzeError> {
        if image_base64.trim().is_empty() {
            return Err(AnalyzeError::MissingImage);
        }

        let raw_text = self
            .recognizer
            .recognize(image_base64)
            .await
            .inspect_err(|err| warn!(error = %err, "text recognition failed"))?;

        let extracted = extract(&raw_text);
        info!(
            outcome = ?extracted.outcome(),
            chars = raw_text.len(),
            "analyzed workbook photo"
        );

        Ok(AnalyzeResult {
            raw_text,
            extracted,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;

    struct FixedText(&'static str);

    #[async_trait]
    impl TextRecognizer for FixedText {
        async fn recognize(&self, _image_base64: &str) -> Result<String, AnalyzeError> {
            Ok(self.0.to_string())
        }
    }

    struct Failing;

    #[async_trait]
    impl TextRecognizer for Failing {
        async fn recognize(&self, _image_base64: &str) -> Result<String, AnalyzeError> {
            Err(AnalyzeError::Upstream {
                message: "quota exceeded".into(),
            })
        }
    }

    #[tokio::test]
    async fn extracts_fields_from_recognized_text() {
        let service = AnalyzeService::new(Arc::new(FixedText("EYE LEVEL\nLevel B  Book 12")));
        let result = service.analyze("aW1n").await.unwrap();
        assert_eq!(result.raw_text, "EYE LEVEL\nLevel B  Book 12");
        assert_eq!(result.extracted.level, "B");
        assert_eq!(result.extracted.book, "12");
    }

    #[tokio::test]
    async fn no_match_is_not_an_error() {
        let service = AnalyzeService::new(Arc::new(FixedText("random unrelated text")));
        let result = service.analyze("aW1n").await.unwrap();
        assert_eq!(result.extracted, ExtractionResult::default());
    }

    #[tokio::test]
    async fn empty_image_is_rejected_before_recognition() {
        let service = AnalyzeService::new(Arc::new(Failing));
        let err = service.analyze("  ").await.unwrap_err();
        assert!(matches!(err, AnalyzeError::MissingImage));
    }

    #[tokio::test]
    async fn recognizer_failure_is_propagated() {
        let service = AnalyzeService::new(Arc::new(Failing));
        let err = service.analyze("aW1n").await.unwrap_err();
        assert!(matches!(err, AnalyzeError::Upstream { .. }));
    }

    #[test]
    fn result_serializes_with_wire_field_names() {
        let result = AnalyzeResult {
            raw_text: "Level A".into(),
            extracted: ExtractionResult {
                level: "A".into(),
                book: String::new(),
            },
        };
        assert_eq!(
            serde_json::to_value(&result).unwrap(),
            serde_json::json!({"rawText": "Level A", "extracted": {"level": "A", "book": ""}})
        );
    }
}
