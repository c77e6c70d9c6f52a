use thiserror::Error;

#[derive(Debug, Error)]
pub enum OcrError {
    #[error("unsupported image format: {0}")]
    UnsupportedFormat(String),

    #[error("image too large: {size} bytes (max {max})")]
    ImageTooLarge { size: usize, max: usize },

    #[error("image preprocessing failed: {0}")]
    Preprocess(#[from] image::ImageError),

    #[error("OCR engine unavailable: {0}")]
    EngineUnavailable(String),

    #[error("OCR extraction failed: {0}")]
    ExtractionFailed(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
