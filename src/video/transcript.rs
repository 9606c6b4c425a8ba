//! Transcript retrieval from YouTube's timed-text endpoint.
//!
//! YouTube embeds available caption tracks in the watch page's player
//! response. We pull the first track's URL out of that JSON and fetch it in
//! `json3` format, which carries plain-text segments.

use super::{FetchError, Transcripts, VideoId};
use crate::config::YoutubeSettings;
use async_trait::async_trait;
use regex::Regex;
use serde::Deserialize;
use std::time::Duration;
use tracing::{debug, instrument};

/// Transcript provider backed by YouTube's public watch page.
pub struct TimedTextProvider {
    client: reqwest::Client,
    watch_base_url: String,
    playability_regex: Regex,
}

/// One caption track as embedded in the player response.
#[derive(Debug, Deserialize)]
struct CaptionTrack {
    #[serde(rename = "baseUrl")]
    base_url: String,
    #[serde(rename = "languageCode", default)]
    language_code: Option<String>,
}

/// Timed-text response in `json3` format.
#[derive(Debug, Deserialize)]
struct TimedText {
    #[serde(default)]
    events: Vec<TimedTextEvent>,
}

#[derive(Debug, Deserialize)]
struct TimedTextEvent {
    #[serde(default)]
    segs: Option<Vec<TimedTextSeg>>,
}

#[derive(Debug, Deserialize)]
struct TimedTextSeg {
    #[serde(default)]
    utf8: Option<String>,
}

impl TimedTextProvider {
    pub fn new(settings: &YoutubeSettings) -> Self {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(settings.fetch_timeout_secs))
            .user_agent(settings.user_agent.clone())
            .build()
            .expect("Failed to create HTTP client");

        let playability_regex = Regex::new(r#""playabilityStatus":\{"status":"(\w+)""#)
            .expect("Invalid regex");

        Self {
            client,
            watch_base_url: settings.watch_base_url.clone(),
            playability_regex,
        }
    }

    /// Fetch the watch page and extract the caption track list.
    async fn caption_tracks(&self, id: &VideoId) -> Result<Vec<CaptionTrack>, FetchError> {
        let url = format!("{}/watch?v={}", self.watch_base_url, id);
        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(classify_transport_error)?;

        if !response.status().is_success() {
            return Err(FetchError::Unavailable);
        }

        let body = response.text().await.map_err(classify_transport_error)?;

        // The playability status tells unavailable/private apart from a
        // public video that simply has no captions.
        if let Some(caps) = self.playability_regex.captures(&body) {
            match &caps[1] {
                "OK" => {}
                "ERROR" | "UNPLAYABLE" | "LOGIN_REQUIRED" => {
                    return Err(FetchError::Unavailable)
                }
                status => {
                    debug!("Unexpected playability status: {}", status);
                }
            }
        }

        let json = match extract_caption_tracks_json(&body) {
            Some(json) => json,
            None => return Err(FetchError::NoTranscript),
        };

        let tracks: Vec<CaptionTrack> = serde_json::from_str(json)
            .map_err(|e| FetchError::Transient(format!("Failed to parse caption tracks: {}", e)))?;

        if tracks.is_empty() {
            return Err(FetchError::NoTranscript);
        }

        Ok(tracks)
    }

    /// Fetch one caption track as json3 and join its text segments.
    async fn fetch_track(&self, track: &CaptionTrack) -> Result<String, FetchError> {
        let url = format!("{}&fmt=json3", track.base_url);
        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(classify_transport_error)?;

        if !response.status().is_success() {
            return Err(FetchError::Transient(format!(
                "Timed-text request failed with status {}",
                response.status()
            )));
        }

        let timed_text: TimedText = response.json().await.map_err(classify_transport_error)?;

        let text = timed_text
            .events
            .iter()
            .filter_map(|event| event.segs.as_ref())
            .flatten()
            .filter_map(|seg| seg.utf8.as_deref())
            .collect::<Vec<_>>()
            .join(" ");

        Ok(text)
    }
}

#[async_trait]
impl Transcripts for TimedTextProvider {
    #[instrument(skip(self), fields(video_id = %id))]
    async fn transcript(&self, id: &VideoId) -> Result<String, FetchError> {
        let tracks = self.caption_tracks(id).await?;

        // Prefer an English track when one exists, otherwise take the first.
        let track = tracks
            .iter()
            .find(|t| {
                t.language_code
                    .as_deref()
                    .is_some_and(|code| code.starts_with("en"))
            })
            .unwrap_or(&tracks[0]);

        debug!(
            "Fetching transcript track (language: {})",
            track.language_code.as_deref().unwrap_or("unknown")
        );

        self.fetch_track(track).await
    }
}

/// Map reqwest transport failures into the per-video taxonomy.
///
/// This is the only place raw HTTP errors are interpreted; timeouts and
/// connection failures become `Transient` with the message passed through.
fn classify_transport_error(err: reqwest::Error) -> FetchError {
    if err.is_timeout() {
        FetchError::Transient("Transcript request timed out".to_string())
    } else if err.is_status() && err.status() == Some(reqwest::StatusCode::NOT_FOUND) {
        FetchError::Unavailable
    } else {
        FetchError::Transient(err.to_string())
    }
}

/// Extract the `"captionTracks":[...]` JSON array from a watch-page body.
///
/// The array is scanned with bracket balancing rather than a regex because
/// track entries contain nested objects and escaped strings.
fn extract_caption_tracks_json(body: &str) -> Option<&str> {
    let key = "\"captionTracks\":";
    let start = body.find(key)? + key.len();
    let rest = &body[start..];
    if !rest.starts_with('[') {
        return None;
    }

    let mut depth = 0usize;
    let mut in_string = false;
    let mut escaped = false;

    for (i, c) in rest.char_indices() {
        if in_string {
            if escaped {
                escaped = false;
            } else if c == '\\' {
                escaped = true;
            } else if c == '"' {
                in_string = false;
            }
            continue;
        }

        match c {
            '"' => in_string = true,
            '[' | '{' => depth += 1,
            ']' | '}' => {
                depth -= 1;
                if depth == 0 {
                    return Some(&rest[..=i]);
                }
            }
            _ => {}
        }
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_caption_tracks() {
        let body = r#"...,"captions":{"playerCaptionsTracklistRenderer":{"captionTracks":[{"baseUrl":"https://www.youtube.com/api/timedtext?v=abc&lang=en","languageCode":"en","name":{"simpleText":"English"}}],"audioTracks":[]}},..."#;

        let json = extract_caption_tracks_json(body).unwrap();
        let tracks: Vec<CaptionTrack> = serde_json::from_str(json).unwrap();
        assert_eq!(tracks.len(), 1);
        assert!(tracks[0].base_url.contains("timedtext"));
        assert_eq!(tracks[0].language_code.as_deref(), Some("en"));
    }

    #[test]
    fn test_extract_handles_brackets_inside_strings() {
        let body = r#""captionTracks":[{"baseUrl":"u","name":{"simpleText":"English [auto]"}}]"#;
        let json = extract_caption_tracks_json(body).unwrap();
        assert!(json.ends_with(']'));
        let tracks: Vec<CaptionTrack> = serde_json::from_str(json).unwrap();
        assert_eq!(tracks.len(), 1);
    }

    #[test]
    fn test_extract_missing_tracks() {
        assert!(extract_caption_tracks_json("<html>no captions here</html>").is_none());
        assert!(extract_caption_tracks_json(r#""captionTracks":null"#).is_none());
    }

    #[test]
    fn test_timed_text_parsing() {
        let json = r#"{
            "events": [
                {"segs": [{"utf8": "hello"}, {"utf8": "world"}]},
                {"tStartMs": 1000},
                {"segs": [{"utf8": "again"}]}
            ]
        }"#;
        let timed_text: TimedText = serde_json::from_str(json).unwrap();
        let text = timed_text
            .events
            .iter()
            .filter_map(|e| e.segs.as_ref())
            .flatten()
            .filter_map(|s| s.utf8.as_deref())
            .collect::<Vec<_>>()
            .join(" ");
        assert_eq!(text, "hello world again");
    }
}
