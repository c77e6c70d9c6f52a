pub mod engine;
pub mod error;
pub mod parser;
pub mod preprocess;

pub use engine::{OcrEngine, TesseractEngine};
pub use error::OcrError;
pub use parser::{ExtractedTradeFields, extract_trade_fields};
pub use preprocess::{MAX_DIMENSION, preprocess_image};

use std::io::Write;

use image::ImageFormat;
use serde::{Deserialize, Serialize};

/// Upload cap checked before any preprocessing or temp-file work.
pub const MAX_IMAGE_BYTES: usize = 10 * 1024 * 1024;

const ALLOWED_FORMATS: [ImageFormat; 3] = [ImageFormat::Png, ImageFormat::Jpeg, ImageFormat::WebP];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScanMetadata {
    pub ocr_text_length: usize,
    pub fields_extracted: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScanResult {
    pub extracted: ExtractedTradeFields,
    pub metadata: ScanMetadata,
}

/// Screenshot-to-fields pipeline: validate → preprocess → OCR → parse.
/// The stages are strictly sequential (each consumes the previous stage's
/// output) and nothing is retried; any failure surfaces to the caller, who
/// owns the prompt-for-manual-entry fallback. The preprocessed image lives
/// in a temp file only for the duration of the OCR call and is removed on
/// every exit path.
pub async fn scan_image(engine: &dyn OcrEngine, image_bytes: &[u8]) -> Result<ScanResult, OcrError> {
    if image_bytes.len() > MAX_IMAGE_BYTES {
        return Err(OcrError::ImageTooLarge {
            size: image_bytes.len(),
            max: MAX_IMAGE_BYTES,
        });
    }

    let format = image::guess_format(image_bytes)
        .map_err(|_| OcrError::UnsupportedFormat("unrecognized image data".to_string()))?;
    if !ALLOWED_FORMATS.contains(&format) {
        return Err(OcrError::UnsupportedFormat(format!("{format:?}")));
    }

    log::info!("preprocessing screenshot ({} KB)", image_bytes.len() / 1024);
    let processed = preprocess::preprocess_image(image_bytes)?;

    let mut tmp = tempfile::Builder::new().prefix("scan-").suffix(".png").tempfile()?;
    tmp.write_all(&processed)?;
    tmp.flush()?;

    log::info!("running {} on {}", engine.name(), tmp.path().display());
    let text = engine.recognize(tmp.path()).await?;
    log::info!("ocr produced {} characters", text.len());

    let extracted = parser::extract_trade_fields(&text);
    let metadata = ScanMetadata {
        ocr_text_length: text.len(),
        fields_extracted: extracted.fields_extracted(),
    };

    Ok(ScanResult { extracted, metadata })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;
    use std::path::{Path, PathBuf};
    use std::sync::Mutex;

    use async_trait::async_trait;
    use image::{DynamicImage, Rgb, RgbImage};

    use crate::models::Side;

    /// Engine double: records the path it was handed and returns canned text.
    struct FixedTextEngine {
        text: String,
        seen_path: Mutex<Option<PathBuf>>,
    }

    impl FixedTextEngine {
        fn new(text: &str) -> Self {
            Self {
                text: text.to_string(),
                seen_path: Mutex::new(None),
            }
        }
    }

    #[async_trait]
    impl OcrEngine for FixedTextEngine {
        fn name(&self) -> &str {
            "fixed"
        }

        async fn recognize(&self, image: &Path) -> Result<String, OcrError> {
            *self.seen_path.lock().unwrap() = Some(image.to_path_buf());
            Ok(self.text.clone())
        }

        async fn health_check(&self) -> Result<(), OcrError> {
            Ok(())
        }
    }

    struct FailingEngine;

    #[async_trait]
    impl OcrEngine for FailingEngine {
        fn name(&self) -> &str {
            "failing"
        }

        async fn recognize(&self, _image: &Path) -> Result<String, OcrError> {
            Err(OcrError::EngineUnavailable("ocr backend is down".to_string()))
        }

        async fn health_check(&self) -> Result<(), OcrError> {
            Err(OcrError::EngineUnavailable("ocr backend is down".to_string()))
        }
    }

    fn sample_png() -> Vec<u8> {
        let img = RgbImage::from_pixel(80, 40, Rgb([200, 200, 200]));
        let mut out = Vec::new();
        DynamicImage::ImageRgb8(img)
            .write_to(&mut Cursor::new(&mut out), ImageFormat::Png)
            .unwrap();
        out
    }

    #[tokio::test]
    async fn pipeline_runs_through_parse_and_cleans_up() {
        let engine = FixedTextEngine::new("NSE: INFY BUY Qty: 10 Price: ₹ 1,500");
        let result = scan_image(&engine, &sample_png()).await.unwrap();

        assert_eq!(result.extracted.symbol.as_deref(), Some("INFY"));
        assert_eq!(result.extracted.side, Some(Side::Long));
        assert_eq!(result.extracted.quantity, Some(10));
        assert_eq!(result.extracted.entry_price, Some(1500.0));
        assert_eq!(result.metadata.fields_extracted, 4);

        // The temp file handed to the engine is gone after the scan.
        let path = engine.seen_path.lock().unwrap().clone().unwrap();
        assert!(!path.exists());
    }

    #[tokio::test]
    async fn all_null_parse_is_success_not_error() {
        let engine = FixedTextEngine::new("nothing tradeable here");
        let result = scan_image(&engine, &sample_png()).await.unwrap();
        assert_eq!(result.metadata.fields_extracted, 0);
        assert_eq!(result.extracted.raw_text, "nothing tradeable here");
    }

    #[tokio::test]
    async fn oversized_upload_rejected_before_any_work() {
        let engine = FixedTextEngine::new("should never run");
        let oversized = vec![0u8; MAX_IMAGE_BYTES + 1];
        let err = scan_image(&engine, &oversized).await.unwrap_err();
        assert!(matches!(err, OcrError::ImageTooLarge { .. }));
        assert!(engine.seen_path.lock().unwrap().is_none());
    }

    #[tokio::test]
    async fn unsupported_format_rejected() {
        let engine = FixedTextEngine::new("should never run");
        let err = scan_image(&engine, b"plain text payload").await.unwrap_err();
        assert!(matches!(err, OcrError::UnsupportedFormat(_)));
        assert!(engine.seen_path.lock().unwrap().is_none());
    }

    #[tokio::test]
    async fn engine_failure_propagates_and_cleans_up() {
        let err = scan_image(&FailingEngine, &sample_png()).await.unwrap_err();
        assert!(matches!(err, OcrError::EngineUnavailable(_)));
    }
}
