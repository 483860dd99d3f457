//! Error handling for the skill-fit engine

use thiserror::Error;

#[derive(Error, Debug)]
pub enum SkillFitError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("PDF extraction error: {0}")]
    PdfExtraction(String),

    #[error("Text processing error: {0}")]
    TextProcessing(String),

    #[error("Skill extraction error: {0}")]
    Extraction(String),

    #[error("Model loading error: {0}")]
    ModelLoading(String),

    #[error("Inference error: {0}")]
    Inference(String),

    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("File format not supported: {0}")]
    UnsupportedFormat(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

pub type Result<T> = std::result::Result<T, SkillFitError>;

/// Collaborator failures arrive as anyhow errors
impl From<anyhow::Error> for SkillFitError {
    fn from(err: anyhow::Error) -> Self {
        SkillFitError::Extraction(format!("{:#}", err))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_anyhow_conversion_keeps_context() {
        let err = anyhow::anyhow!("process exited").context("running recognizer");
        let converted: SkillFitError = err.into();
        let message = converted.to_string();
        assert!(message.contains("running recognizer"));
        assert!(message.contains("process exited"));
    }

    #[test]
    fn test_pdf_error_message() {
        let err = SkillFitError::PdfExtraction("no pages".to_string());
        assert_eq!(err.to_string(), "PDF extraction error: no pages");
    }
}
