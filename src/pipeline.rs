//! Batch pipeline for Kort.
//!
//! Composes validation, concurrent transcript fan-out and summary generation
//! into one request-scoped operation. Per-video failures are collected, never
//! fatal unless every video fails.

use crate::config::Settings;
use crate::error::KortError;
use crate::summary::{OpenAiSummarizer, Summarizer};
use crate::video::{
    FetchOutcome, OembedTitles, TimedTextProvider, VideoFetcher, VideoId, VideoRecord,
};
use serde::Serialize;
use std::sync::Arc;
use tracing::{info, instrument, warn};

/// Maximum number of videos accepted in one batch.
pub const MAX_VIDEOS_PER_REQUEST: usize = 5;

/// A video that was requested but not summarized, with the reason.
#[derive(Debug, Clone, Serialize)]
pub struct SkippedVideo {
    pub url: String,
    pub reason: String,
}

/// Public identity of a summarized video.
#[derive(Debug, Clone, Serialize)]
pub struct VideoInfo {
    pub id: VideoId,
    pub title: String,
    pub url: String,
}

/// Successful batch result.
#[derive(Debug, Clone, Serialize)]
pub struct SummaryOutput {
    pub summary: String,
    pub videos: Vec<VideoInfo>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub skipped: Vec<SkippedVideo>,
}

/// Terminal batch failure.
///
/// Carries the per-video skip reasons gathered before the batch died, so the
/// boundary can report them even on the error path.
#[derive(Debug)]
pub struct BatchFailure {
    pub error: KortError,
    pub skipped: Vec<SkippedVideo>,
}

impl BatchFailure {
    fn before_fetch(error: KortError) -> Self {
        Self {
            error,
            skipped: Vec::new(),
        }
    }
}

/// The batch pipeline: validate, fan out, summarize.
pub struct Pipeline {
    fetcher: VideoFetcher,
    summarizer: Arc<dyn Summarizer>,
}

impl Pipeline {
    /// Create a pipeline with production providers.
    pub fn new(settings: &Settings) -> Self {
        let fetcher = VideoFetcher::new(
            Arc::new(TimedTextProvider::new(&settings.youtube)),
            Arc::new(OembedTitles::new(&settings.youtube)),
        );
        let summarizer = Arc::new(OpenAiSummarizer::new(&settings.summary));

        Self::with_components(fetcher, summarizer)
    }

    /// Create a pipeline with custom components.
    pub fn with_components(fetcher: VideoFetcher, summarizer: Arc<dyn Summarizer>) -> Self {
        Self {
            fetcher,
            summarizer,
        }
    }

    /// Run one batch to completion.
    ///
    /// Structural validation rejects fast, before any fetch: the batch must be
    /// non-empty, at most [`MAX_VIDEOS_PER_REQUEST`] long, and every reference
    /// must resolve. After the fan-out, any successful subset is summarized in
    /// a single generation call; failed videos are reported as skipped.
    #[instrument(skip_all, fields(count = references.len()))]
    pub async fn run(&self, references: &[String]) -> Result<SummaryOutput, BatchFailure> {
        if references.is_empty() {
            return Err(BatchFailure::before_fetch(KortError::EmptyBatch));
        }
        if references.len() > MAX_VIDEOS_PER_REQUEST {
            return Err(BatchFailure::before_fetch(KortError::BatchTooLarge(
                MAX_VIDEOS_PER_REQUEST,
            )));
        }
        if let Some(invalid) = references
            .iter()
            .find(|r| !self.fetcher.resolver().is_valid(r))
        {
            return Err(BatchFailure::before_fetch(KortError::InvalidInput(
                invalid.clone(),
            )));
        }

        let outcomes = self.fetcher.fetch_all(references).await;
        let (videos, skipped) = partition_outcomes(outcomes);

        if videos.is_empty() {
            warn!("All {} video fetches failed", references.len());
            return Err(BatchFailure {
                error: KortError::AllFailed,
                skipped,
            });
        }

        info!(
            "Fetched {} of {} videos, generating summary",
            videos.len(),
            references.len()
        );

        let summary = match self.summarizer.summarize(&videos).await {
            Ok(summary) => summary,
            Err(error) => return Err(BatchFailure { error, skipped }),
        };

        Ok(SummaryOutput {
            summary,
            videos: videos
                .into_iter()
                .map(|v| VideoInfo {
                    id: v.id,
                    title: v.title,
                    url: v.url,
                })
                .collect(),
            skipped,
        })
    }
}

/// Split outcomes into summarizable records and skip reports, both in batch
/// order.
fn partition_outcomes(outcomes: Vec<FetchOutcome>) -> (Vec<VideoRecord>, Vec<SkippedVideo>) {
    let mut videos = Vec::new();
    let mut skipped = Vec::new();

    for outcome in outcomes {
        match outcome {
            FetchOutcome::Ok(record) => videos.push(record),
            FetchOutcome::Failed { reference, error } => skipped.push(SkippedVideo {
                url: reference,
                reason: error.to_string(),
            }),
        }
    }

    (videos, skipped)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Result;
    use crate::video::{FetchError, Titles, Transcripts};
    use async_trait::async_trait;
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct FakeTranscripts {
        responses: HashMap<String, std::result::Result<String, FetchError>>,
        calls: Arc<AtomicUsize>,
    }

    #[async_trait]
    impl Transcripts for FakeTranscripts {
        async fn transcript(&self, id: &VideoId) -> std::result::Result<String, FetchError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.responses
                .get(id.as_str())
                .cloned()
                .unwrap_or(Err(FetchError::Unavailable))
        }
    }

    struct NoTitles;

    #[async_trait]
    impl Titles for NoTitles {
        async fn title(&self, _id: &VideoId) -> Option<String> {
            None
        }
    }

    struct FakeSummarizer {
        calls: Arc<AtomicUsize>,
        result: std::result::Result<String, fn() -> KortError>,
    }

    #[async_trait]
    impl Summarizer for FakeSummarizer {
        async fn summarize(&self, videos: &[VideoRecord]) -> Result<String> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            match &self.result {
                Ok(summary) => {
                    assert!(!videos.is_empty());
                    Ok(summary.clone())
                }
                Err(make) => Err(make()),
            }
        }
    }

    struct Harness {
        pipeline: Pipeline,
        fetch_calls: Arc<AtomicUsize>,
        summarize_calls: Arc<AtomicUsize>,
    }

    fn harness(
        transcripts: Vec<(&str, std::result::Result<String, FetchError>)>,
        summary: std::result::Result<String, fn() -> KortError>,
    ) -> Harness {
        let fetch_calls = Arc::new(AtomicUsize::new(0));
        let summarize_calls = Arc::new(AtomicUsize::new(0));

        let fetcher = VideoFetcher::new(
            Arc::new(FakeTranscripts {
                responses: transcripts
                    .into_iter()
                    .map(|(id, r)| (id.to_string(), r))
                    .collect(),
                calls: fetch_calls.clone(),
            }),
            Arc::new(NoTitles),
        );
        let summarizer = Arc::new(FakeSummarizer {
            calls: summarize_calls.clone(),
            result: summary,
        });

        Harness {
            pipeline: Pipeline::with_components(fetcher, summarizer),
            fetch_calls,
            summarize_calls,
        }
    }

    fn refs(ids: &[&str]) -> Vec<String> {
        ids.iter().map(|s| s.to_string()).collect()
    }

    #[tokio::test]
    async fn test_empty_batch_rejected_before_any_work() {
        let h = harness(vec![], Ok("unused".to_string()));

        let failure = h.pipeline.run(&[]).await.unwrap_err();
        assert!(matches!(failure.error, KortError::EmptyBatch));
        assert!(failure.skipped.is_empty());
        assert_eq!(h.fetch_calls.load(Ordering::SeqCst), 0);
        assert_eq!(h.summarize_calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_oversized_batch_rejected() {
        let h = harness(vec![], Ok("unused".to_string()));

        let ids = refs(&[
            "aaaaaaaaaaa",
            "bbbbbbbbbbb",
            "ccccccccccc",
            "ddddddddddd",
            "eeeeeeeeeee",
            "fffffffffff",
        ]);
        let failure = h.pipeline.run(&ids).await.unwrap_err();
        assert!(matches!(failure.error, KortError::BatchTooLarge(5)));
        assert_eq!(h.fetch_calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_invalid_reference_rejects_whole_batch_before_fetch() {
        let h = harness(
            vec![("aaaaaaaaaaa", Ok("text".to_string()))],
            Ok("unused".to_string()),
        );

        let ids = refs(&["aaaaaaaaaaa", "definitely not a url"]);
        let failure = h.pipeline.run(&ids).await.unwrap_err();
        match failure.error {
            KortError::InvalidInput(reference) => {
                assert_eq!(reference, "definitely not a url")
            }
            other => panic!("expected InvalidInput, got {:?}", other),
        }
        assert_eq!(h.fetch_calls.load(Ordering::SeqCst), 0);
        assert_eq!(h.summarize_calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_two_successes_produce_summary_without_skips() {
        let h = harness(
            vec![
                ("aaaaaaaaaaa", Ok("first transcript".to_string())),
                ("bbbbbbbbbbb", Ok("second transcript".to_string())),
            ],
            Ok("a combined summary".to_string()),
        );

        let output = h
            .pipeline
            .run(&refs(&["aaaaaaaaaaa", "bbbbbbbbbbb"]))
            .await
            .unwrap();

        assert_eq!(output.summary, "a combined summary");
        assert_eq!(output.videos.len(), 2);
        assert_eq!(output.videos[0].id.as_str(), "aaaaaaaaaaa");
        assert_eq!(output.videos[1].id.as_str(), "bbbbbbbbbbb");
        assert!(output.skipped.is_empty());
        assert_eq!(h.summarize_calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_partial_failure_reports_skipped_video() {
        let h = harness(
            vec![
                ("aaaaaaaaaaa", Ok("one".to_string())),
                ("bbbbbbbbbbb", Err(FetchError::NoTranscript)),
                ("ccccccccccc", Ok("three".to_string())),
            ],
            Ok("summary of the rest".to_string()),
        );

        let output = h
            .pipeline
            .run(&refs(&["aaaaaaaaaaa", "bbbbbbbbbbb", "ccccccccccc"]))
            .await
            .unwrap();

        assert_eq!(output.videos.len(), 2);
        assert_eq!(output.skipped.len(), 1);
        assert_eq!(output.skipped[0].url, "bbbbbbbbbbb");
        assert_eq!(output.skipped[0].reason, "No captions available for this video");
    }

    #[tokio::test]
    async fn test_all_fetches_failed_skips_generation() {
        let h = harness(
            vec![
                ("aaaaaaaaaaa", Err(FetchError::Unavailable)),
                ("bbbbbbbbbbb", Err(FetchError::NoTranscript)),
            ],
            Ok("unused".to_string()),
        );

        let failure = h
            .pipeline
            .run(&refs(&["aaaaaaaaaaa", "bbbbbbbbbbb"]))
            .await
            .unwrap_err();

        assert!(matches!(failure.error, KortError::AllFailed));
        assert_eq!(failure.skipped.len(), 2);
        assert_eq!(h.summarize_calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_generation_failure_keeps_skip_reasons() {
        let h = harness(
            vec![
                ("aaaaaaaaaaa", Ok("good".to_string())),
                ("bbbbbbbbbbb", Err(FetchError::Unavailable)),
            ],
            Err(|| KortError::QuotaExceeded),
        );

        let failure = h
            .pipeline
            .run(&refs(&["aaaaaaaaaaa", "bbbbbbbbbbb"]))
            .await
            .unwrap_err();

        assert!(matches!(failure.error, KortError::QuotaExceeded));
        assert_eq!(failure.skipped.len(), 1);
        assert_eq!(failure.skipped[0].url, "bbbbbbbbbbb");
    }

    #[test]
    fn test_run_from_sync_context() {
        // The pipeline has no runtime requirements beyond an executor.
        let h = harness(
            vec![("aaaaaaaaaaa", Ok("text".to_string()))],
            Ok("summary".to_string()),
        );
        let output = tokio_test::block_on(h.pipeline.run(&refs(&["aaaaaaaaaaa"]))).unwrap();
        assert_eq!(output.summary, "summary");
    }
}
