//! Error types for Kort.

use thiserror::Error;

/// Library-level error type for Kort operations.
///
/// Per-video fetch failures are not represented here; they are values
/// (`crate::video::FetchError`) carried inside the batch result. This enum
/// covers batch-level and ambient failures only.
#[derive(Error, Debug)]
pub enum KortError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Please provide at least one YouTube URL")]
    EmptyBatch,

    #[error("Maximum {0} videos allowed per request")]
    BatchTooLarge(usize),

    #[error("Invalid YouTube URL: {0}")]
    InvalidInput(String),

    #[error("Could not fetch transcripts for any of the provided videos")]
    AllFailed,

    #[error("The model returned an empty response")]
    EmptySummary,

    #[error("API quota exceeded - check your plan and billing details")]
    QuotaExceeded,

    #[error("Invalid API key - check your OPENAI_API_KEY")]
    AuthFailure,

    #[error("Request rejected by the API - the transcripts may be too long")]
    RequestRejected,

    #[error("Rate limit exceeded. Try again in {retry_after_secs} seconds.")]
    RateLimited { retry_after_secs: u64 },

    #[error("OpenAI API error: {0}")]
    OpenAI(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
}

/// Result type alias for Kort operations.
pub type Result<T> = std::result::Result<T, KortError>;
