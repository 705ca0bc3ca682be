use thiserror::Error;

#[derive(Error, Debug)]
pub enum CliError {
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Generic error: {0}")]
    Generic(#[from] anyhow::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Extractor error: {0}")]
    Extractor(#[from] ytinfo_parser::ExtractorError),

    #[error("Semaphore acquire error: {0}")]
    Semaphore(#[from] tokio::sync::AcquireError),

    #[error("Extraction error: {0}")]
    Extraction(String),

    #[error("No streams available for the provided URL")]
    NoStreamsAvailable,

    #[error("Stream selection cancelled by user")]
    SelectionCancelled,

    #[error("Invalid stream filter: {0}")]
    InvalidFilter(String),

    #[error("Timeout error: Operation timed out after {seconds} seconds")]
    Timeout { seconds: u64 },
}

impl CliError {
    pub fn invalid_filter(msg: impl Into<String>) -> Self {
        Self::InvalidFilter(msg.into())
    }

    pub fn timeout(seconds: u64) -> Self {
        Self::Timeout { seconds }
    }

    pub fn no_streams_found() -> Self {
        Self::NoStreamsAvailable
    }

    pub fn user_cancelled() -> Self {
        Self::SelectionCancelled
    }

    pub fn invalid_input(msg: impl Into<String>) -> Self {
        Self::Extraction(msg.into())
    }

    pub fn no_matching_stream() -> Self {
        Self::InvalidFilter("No streams match the specified filters".into())
    }

    /// Whether another attempt could succeed.
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Network(_) | Self::Timeout { .. } => true,
            Self::Extractor(e) => e.is_retryable(),
            _ => false,
        }
    }
}

pub type Result<T> = std::result::Result<T, CliError>;
