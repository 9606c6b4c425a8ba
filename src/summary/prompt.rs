//! Prompt assembly for summary generation.

use crate::video::VideoRecord;

/// Delimiter between per-video sections in the prompt.
const VIDEO_DELIMITER: &str = "\n\n---\n\n";

/// Build the summarization prompt for one batch.
///
/// Each video contributes its title and full transcript, in batch order.
/// The instruction varies by cardinality: a single video gets a standalone
/// summary request, several get one cohesive summary plus a source list.
pub fn build_summary_prompt(videos: &[VideoRecord]) -> String {
    let video_list = videos
        .iter()
        .enumerate()
        .map(|(i, v)| format!("[Video {}: \"{}\"]\n{}", i + 1, v.title, v.transcript))
        .collect::<Vec<_>>()
        .join(VIDEO_DELIMITER);

    let intro = if videos.len() == 1 {
        "Here is the transcript from a YouTube video".to_string()
    } else {
        format!("Here are transcripts from {} YouTube videos", videos.len())
    };

    let source_list_instruction = if videos.len() > 1 {
        " At the end, list the source videos."
    } else {
        ""
    };

    format!(
        "{}:\n\n{}\n\nPlease provide a concise summary. Focus on the key points and main takeaways.{}",
        intro, video_list, source_list_instruction
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::video::{Resolver, VideoId, VideoRecord};

    fn record(id: &str, title: &str, transcript: &str) -> VideoRecord {
        let id: VideoId = Resolver::new().resolve(id).unwrap();
        VideoRecord {
            url: id.watch_url(),
            id,
            title: title.to_string(),
            transcript: transcript.to_string(),
        }
    }

    #[test]
    fn test_single_video_prompt() {
        let prompt = build_summary_prompt(&[record("aaaaaaaaaaa", "Intro to Rust", "hello")]);

        assert!(prompt.starts_with("Here is the transcript from a YouTube video:"));
        assert!(prompt.contains("[Video 1: \"Intro to Rust\"]\nhello"));
        assert!(prompt.contains("Please provide a concise summary."));
        assert!(!prompt.contains("list the source videos"));
    }

    #[test]
    fn test_multi_video_prompt() {
        let prompt = build_summary_prompt(&[
            record("aaaaaaaaaaa", "First", "one"),
            record("bbbbbbbbbbb", "Second", "two"),
            record("ccccccccccc", "Third", "three"),
        ]);

        assert!(prompt.starts_with("Here are transcripts from 3 YouTube videos:"));
        assert!(prompt.contains("[Video 1: \"First\"]\none"));
        assert!(prompt.contains("[Video 2: \"Second\"]\ntwo"));
        assert!(prompt.contains("[Video 3: \"Third\"]\nthree"));
        assert!(prompt.ends_with("At the end, list the source videos."));

        // Sections appear in batch order, delimited.
        let first = prompt.find("[Video 1").unwrap();
        let second = prompt.find("[Video 2").unwrap();
        let third = prompt.find("[Video 3").unwrap();
        assert!(first < second && second < third);
        assert_eq!(prompt.matches("---").count(), 2);
    }
}
