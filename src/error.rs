//! Error types for the Orakl

use thiserror::Error;

#[derive(Error, Debug)]
pub enum OraklError {
    #[error("Text generation failed: {0}")]
    Generation(String),

    #[error("Text generation returned {status}: {body}")]
    GenerationStatus { status: u16, body: String },

    #[error("API key not set (expected in ${0})")]
    MissingApiKey(String),

    #[error("Store error: {0}")]
    Store(String),

    #[error("Config error: {0}")]
    Config(String),

    #[error("Catalog error: {0}")]
    Catalog(String),

    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl OraklError {
    /// Stable code for logs and API bodies
    pub fn code(&self) -> &'static str {
        match self {
            OraklError::Generation(_) => "E100_GENERATION",
            OraklError::GenerationStatus { .. } => "E101_GENERATION_STATUS",
            OraklError::MissingApiKey(_) => "E102_MISSING_API_KEY",
            OraklError::Store(_) => "E200_STORE",
            OraklError::Config(_) => "E300_CONFIG",
            OraklError::Catalog(_) => "E301_CATALOG",
            OraklError::InvalidRequest(_) => "E400_INVALID_REQUEST",
            OraklError::Io(_) => "E500_IO",
            OraklError::Json(_) => "E501_JSON",
        }
    }

    /// True when the failure came from the text generator
    pub fn is_upstream(&self) -> bool {
        matches!(
            self,
            OraklError::Generation(_)
                | OraklError::GenerationStatus { .. }
                | OraklError::MissingApiKey(_)
        )
    }
}

impl From<reqwest::Error> for OraklError {
    fn from(e: reqwest::Error) -> Self {
        OraklError::Generation(e.to_string())
    }
}

impl From<toml::de::Error> for OraklError {
    fn from(e: toml::de::Error) -> Self {
        OraklError::Config(e.to_string())
    }
}
