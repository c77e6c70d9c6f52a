use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::process::Command;

use super::error::OcrError;

/// Text-recognition boundary: image file in, raw text out. The pipeline
/// never interprets what the engine returns beyond pattern matching.
#[async_trait]
pub trait OcrEngine: Send + Sync {
    /// Engine name for logs and diagnostics (e.g., "tesseract").
    fn name(&self) -> &str;

    /// Run recognition over an image file and return the raw text.
    async fn recognize(&self, image: &Path) -> Result<String, OcrError>;

    /// Cheap liveness probe, used to distinguish "engine missing" from
    /// "nothing recognized" before accepting uploads.
    async fn health_check(&self) -> Result<(), OcrError>;
}

/// Shells out to the `tesseract` binary in stdout mode.
#[derive(Debug, Clone)]
pub struct TesseractEngine {
    binary: PathBuf,
    language: String,
}

impl TesseractEngine {
    pub fn new() -> Self {
        Self {
            binary: PathBuf::from("tesseract"),
            language: "eng".to_string(),
        }
    }

    pub fn with_binary(mut self, binary: impl Into<PathBuf>) -> Self {
        self.binary = binary.into();
        self
    }

    pub fn with_language(mut self, language: impl Into<String>) -> Self {
        self.language = language.into();
        self
    }

    fn spawn_error(&self, err: std::io::Error) -> OcrError {
        if err.kind() == ErrorKind::NotFound {
            OcrError::EngineUnavailable(format!("{} not found on PATH", self.binary.display()))
        } else {
            OcrError::Io(err)
        }
    }
}

impl Default for TesseractEngine {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl OcrEngine for TesseractEngine {
    fn name(&self) -> &str {
        "tesseract"
    }

    async fn recognize(&self, image: &Path) -> Result<String, OcrError> {
        let output = Command::new(&self.binary)
            .arg(image)
            .arg("stdout")
            .args(["-l", &self.language])
            .output()
            .await
            .map_err(|e| self.spawn_error(e))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(OcrError::ExtractionFailed(stderr.trim().to_string()));
        }

        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }

    async fn health_check(&self) -> Result<(), OcrError> {
        let output = Command::new(&self.binary)
            .arg("--version")
            .output()
            .await
            .map_err(|e| self.spawn_error(e))?;

        if output.status.success() {
            Ok(())
        } else {
            Err(OcrError::EngineUnavailable(format!(
                "{} --version exited with {}",
                self.binary.display(),
                output.status
            )))
        }
    }
}
