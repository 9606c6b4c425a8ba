//! Video retrieval for Kort.
//!
//! Resolves YouTube references to canonical ids and fetches title plus
//! transcript for each video, isolating per-video failures as values.

mod fetcher;
mod oembed;
mod resolver;
mod transcript;

pub use fetcher::VideoFetcher;
pub use oembed::OembedTitles;
pub use resolver::Resolver;
pub use transcript::TimedTextProvider;

use async_trait::async_trait;
use serde::Serialize;
use thiserror::Error;

/// Canonical 11-character YouTube video id.
///
/// Only the [`Resolver`] constructs these, so holding one means the id
/// already passed surface-form validation.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct VideoId(String);

impl VideoId {
    pub(crate) fn new(id: String) -> Self {
        debug_assert_eq!(id.len(), 11);
        Self(id)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Canonical watch URL for this id.
    pub fn watch_url(&self) -> String {
        format!("https://www.youtube.com/watch?v={}", self.0)
    }
}

impl std::fmt::Display for VideoId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A fully fetched video: id, canonical URL, display title and transcript.
///
/// Immutable once constructed; passed by value into summarization.
#[derive(Debug, Clone, Serialize)]
pub struct VideoRecord {
    pub id: VideoId,
    pub url: String,
    pub title: String,
    pub transcript: String,
}

/// Closed taxonomy of per-video fetch failures.
///
/// `Transient` carries the underlying message verbatim; everything the
/// adapters can recognize is mapped to one of the other variants.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FetchError {
    #[error("Invalid YouTube URL")]
    InvalidReference,

    #[error("No captions available for this video")]
    NoTranscript,

    #[error("Video not found or unavailable")]
    Unavailable,

    #[error("{0}")]
    Transient(String),
}

/// Result of fetching one reference; one per input, order-preserving.
#[derive(Debug, Clone)]
pub enum FetchOutcome {
    Ok(VideoRecord),
    Failed { reference: String, error: FetchError },
}

impl FetchOutcome {
    pub fn is_ok(&self) -> bool {
        matches!(self, FetchOutcome::Ok(_))
    }
}

/// Transcript lookup seam.
///
/// Implementations classify collaborator failures into [`FetchError`] at
/// this boundary; callers never inspect raw transport errors.
#[async_trait]
pub trait Transcripts: Send + Sync {
    async fn transcript(&self, id: &VideoId) -> std::result::Result<String, FetchError>;
}

/// Title lookup seam.
///
/// Infallible by contract: `None` means "no title available" and the caller
/// substitutes a placeholder. Failures never abort a fetch.
#[async_trait]
pub trait Titles: Send + Sync {
    async fn title(&self, id: &VideoId) -> Option<String>;
}
