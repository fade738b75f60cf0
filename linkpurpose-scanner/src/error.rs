use std::time::Duration;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ScanError {
    #[error("Malformed document: {0}")]
    MalformedDocument(String),

    #[error("Rendering {url} did not finish within {timeout:?}")]
    RenderTimeout { url: String, timeout: Duration },

    #[error("Render failed: {0}")]
    Render(String),

    #[error("Invalid URL: {0}")]
    InvalidUrl(String),
}

impl From<fantoccini::error::CmdError> for ScanError {
    fn from(err: fantoccini::error::CmdError) -> Self {
        ScanError::Render(err.to_string())
    }
}

impl From<fantoccini::error::NewSessionError> for ScanError {
    fn from(err: fantoccini::error::NewSessionError) -> Self {
        ScanError::Render(format!("could not start WebDriver session: {}", err))
    }
}

pub type Result<T> = std::result::Result<T, ScanError>;
