use crate::error::{CheckError, Result};
use std::str::FromStr;
use std::time::Duration;

pub const DEFAULT_BATCH_SIZE: usize = 10;

/// Language the prompt is written in, and therefore the language the model
/// answers in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Language {
    #[default]
    Japanese,
    English,
}

impl FromStr for Language {
    type Err = CheckError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "ja" | "japanese" => Ok(Language::Japanese),
            "en" | "english" => Ok(Language::English),
            _ => Err(CheckError::InvalidConfiguration(format!(
                "unsupported language '{}'",
                s
            ))),
        }
    }
}

impl Language {
    pub fn code(&self) -> &'static str {
        match self {
            Language::Japanese => "ja",
            Language::English => "en",
        }
    }
}

/// Knobs for the judgment run.
#[derive(Debug, Clone)]
pub struct CheckerConfig {
    pub batch_size: usize,
    /// Pause between consecutive batches
    pub batch_delay: Duration,
    pub completion_timeout: Duration,
    /// Completion attempts per batch; 1 means a bad response drops the batch
    pub max_attempts: usize,
    pub language: Language,
}

impl Default for CheckerConfig {
    fn default() -> Self {
        Self {
            batch_size: DEFAULT_BATCH_SIZE,
            batch_delay: Duration::from_secs(1),
            completion_timeout: Duration::from_secs(120),
            max_attempts: 1,
            language: Language::default(),
        }
    }
}

impl CheckerConfig {
    pub fn validate(&self) -> Result<()> {
        if self.batch_size == 0 {
            return Err(CheckError::InvalidConfiguration(
                "batch size must be a positive integer".to_string(),
            ));
        }
        if self.max_attempts == 0 {
            return Err(CheckError::InvalidConfiguration(
                "at least one completion attempt per batch is required".to_string(),
            ));
        }
        if self.completion_timeout.is_zero() {
            return Err(CheckError::InvalidConfiguration(
                "completion timeout must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }
}
