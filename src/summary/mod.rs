//! Summary generation for Kort.
//!
//! Builds one prompt from the fetched transcripts and calls the generation
//! service exactly once per batch.

mod openai;
mod prompt;

pub use openai::OpenAiSummarizer;
pub use prompt::build_summary_prompt;

use crate::error::Result;
use crate::video::VideoRecord;
use async_trait::async_trait;

/// Trait for summary generation.
#[async_trait]
pub trait Summarizer: Send + Sync {
    /// Generate one combined summary for a non-empty set of videos.
    ///
    /// Implementations must fail with `KortError::EmptyBatch` on an empty
    /// slice without making any external call.
    async fn summarize(&self, videos: &[VideoRecord]) -> Result<String>;
}
