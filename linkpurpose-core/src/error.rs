use linkpurpose_scanner::ScanError;
use std::time::Duration;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CheckError {
    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),

    #[error("Unusable model response: {0}")]
    ResponseFormat(String),

    #[error("Unexpected response shape: {0}")]
    ResponseShape(String),

    #[error("Completion request failed: {0}")]
    Completion(String),

    #[error("Completion did not finish within {0:?}")]
    CompletionTimeout(Duration),

    #[error("HTTP request failed: {0}")]
    HttpError(#[from] reqwest::Error),

    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error(transparent)]
    Scan(#[from] ScanError),
}

impl CheckError {
    /// Errors that only spoil the batch being judged. Everything else ends
    /// the run.
    pub fn is_batch_scoped(&self) -> bool {
        matches!(
            self,
            CheckError::ResponseFormat(_)
                | CheckError::ResponseShape(_)
                | CheckError::Completion(_)
                | CheckError::CompletionTimeout(_)
                | CheckError::HttpError(_)
        )
    }
}

pub type Result<T> = std::result::Result<T, CheckError>;
