//! Video title lookup via YouTube's oEmbed endpoint.
//!
//! oEmbed needs no API key. Lookup failures are swallowed: the fetcher
//! substitutes a placeholder title, so this adapter never fails a video.

use super::{Titles, VideoId};
use crate::config::YoutubeSettings;
use async_trait::async_trait;
use serde::Deserialize;
use std::time::Duration;
use tracing::{debug, instrument};
use url::Url;

/// Title provider backed by the oEmbed endpoint.
pub struct OembedTitles {
    client: reqwest::Client,
    oembed_url: String,
}

#[derive(Debug, Deserialize)]
struct OembedResponse {
    title: Option<String>,
}

impl OembedTitles {
    pub fn new(settings: &YoutubeSettings) -> Self {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(settings.fetch_timeout_secs))
            .build()
            .expect("Failed to create HTTP client");

        Self {
            client,
            oembed_url: settings.oembed_url.clone(),
        }
    }

    async fn lookup(&self, id: &VideoId) -> Option<String> {
        let url = Url::parse_with_params(
            &self.oembed_url,
            &[("url", id.watch_url().as_str()), ("format", "json")],
        )
        .ok()?;

        let response = self.client.get(url).send().await.ok()?;
        if !response.status().is_success() {
            return None;
        }

        let body: OembedResponse = response.json().await.ok()?;
        body.title.filter(|t| !t.is_empty())
    }
}

#[async_trait]
impl Titles for OembedTitles {
    #[instrument(skip(self), fields(video_id = %id))]
    async fn title(&self, id: &VideoId) -> Option<String> {
        let title = self.lookup(id).await;
        if title.is_none() {
            debug!("Title lookup failed, caller will use a placeholder");
        }
        title
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_oembed_response_parsing() {
        let json = r#"{"title": "Some Video", "author_name": "Someone", "width": 200}"#;
        let parsed: OembedResponse = serde_json::from_str(json).unwrap();
        assert_eq!(parsed.title.as_deref(), Some("Some Video"));

        let json = r#"{"width": 200}"#;
        let parsed: OembedResponse = serde_json::from_str(json).unwrap();
        assert!(parsed.title.is_none());
    }
}
