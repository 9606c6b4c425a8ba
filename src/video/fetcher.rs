//! Per-video fetch and concurrent batch fan-out.

use super::{FetchError, FetchOutcome, Resolver, Titles, Transcripts, VideoId, VideoRecord};
use futures::future::join_all;
use std::sync::Arc;
use tracing::{debug, instrument, warn};

/// Fetches title and transcript for resolved videos.
///
/// Providers are trait objects so tests can substitute canned responses.
pub struct VideoFetcher {
    resolver: Resolver,
    transcripts: Arc<dyn Transcripts>,
    titles: Arc<dyn Titles>,
}

impl VideoFetcher {
    pub fn new(transcripts: Arc<dyn Transcripts>, titles: Arc<dyn Titles>) -> Self {
        Self {
            resolver: Resolver::new(),
            transcripts,
            titles,
        }
    }

    pub fn resolver(&self) -> &Resolver {
        &self.resolver
    }

    /// Fetch one reference.
    ///
    /// Title and transcript are requested concurrently. A failed title lookup
    /// degrades to a placeholder; a failed transcript is fatal for this video
    /// only. An empty transcript counts as "no captions".
    #[instrument(skip(self))]
    pub async fn fetch(&self, reference: &str) -> FetchOutcome {
        let id = match self.resolver.resolve(reference) {
            Some(id) => id,
            None => {
                return FetchOutcome::Failed {
                    reference: reference.to_string(),
                    error: FetchError::InvalidReference,
                }
            }
        };

        let (title, transcript) =
            tokio::join!(self.titles.title(&id), self.transcripts.transcript(&id));

        let transcript = match transcript {
            Ok(text) => text,
            Err(error) => {
                warn!("Transcript fetch failed for {}: {}", id, error);
                return FetchOutcome::Failed {
                    reference: reference.to_string(),
                    error,
                };
            }
        };

        let transcript = collapse_whitespace(&transcript);
        if transcript.is_empty() {
            return FetchOutcome::Failed {
                reference: reference.to_string(),
                error: FetchError::NoTranscript,
            };
        }

        let title = title.unwrap_or_else(|| placeholder_title(&id));
        debug!("Fetched {} ({} transcript chars)", id, transcript.len());

        FetchOutcome::Ok(VideoRecord {
            url: id.watch_url(),
            id,
            title,
            transcript,
        })
    }

    /// Fetch every reference concurrently.
    ///
    /// The output has the same length and order as the input regardless of
    /// completion order; one video's failure never cancels its siblings.
    /// Retries are a caller decision.
    #[instrument(skip_all, fields(count = references.len()))]
    pub async fn fetch_all(&self, references: &[String]) -> Vec<FetchOutcome> {
        join_all(references.iter().map(|reference| self.fetch(reference))).await
    }
}

/// Placeholder used when the title lookup fails or returns nothing.
fn placeholder_title(id: &VideoId) -> String {
    format!("Video {}", id)
}

fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}
