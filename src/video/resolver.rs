//! YouTube reference resolution.

use super::VideoId;
use regex::Regex;

/// Resolves free-form YouTube references into canonical video ids.
///
/// Pure string matching, no network access. The accepted surface forms are
/// tried in order and the first match wins.
pub struct Resolver {
    patterns: Vec<Regex>,
}

impl Resolver {
    pub fn new() -> Self {
        // Each pattern captures exactly 11 id characters.
        let patterns = [
            // Standard watch URL: youtube.com/watch?v=VIDEO_ID
            r"youtube\.com/watch\?v=([A-Za-z0-9_-]{11})",
            // Short URL: youtu.be/VIDEO_ID
            r"youtu\.be/([A-Za-z0-9_-]{11})",
            // Embed URL: youtube.com/embed/VIDEO_ID
            r"youtube\.com/embed/([A-Za-z0-9_-]{11})",
            // Shorts URL: youtube.com/shorts/VIDEO_ID
            r"youtube\.com/shorts/([A-Za-z0-9_-]{11})",
            // Live URL: youtube.com/live/VIDEO_ID
            r"youtube\.com/live/([A-Za-z0-9_-]{11})",
            // Just the video ID
            r"^([A-Za-z0-9_-]{11})$",
        ]
        .iter()
        .map(|p| Regex::new(p).expect("Invalid regex"))
        .collect();

        Self { patterns }
    }

    /// Extract the video id from a URL or bare id, if the input matches any
    /// accepted form.
    pub fn resolve(&self, reference: &str) -> Option<VideoId> {
        let reference = reference.trim();
        self.patterns.iter().find_map(|pattern| {
            pattern
                .captures(reference)
                .and_then(|caps| caps.get(1))
                .map(|m| VideoId::new(m.as_str().to_string()))
        })
    }

    /// Check whether a reference resolves at all.
    pub fn is_valid(&self, reference: &str) -> bool {
        self.resolve(reference).is_some()
    }
}

impl Default for Resolver {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn resolve(input: &str) -> Option<String> {
        Resolver::new().resolve(input).map(|id| id.to_string())
    }

    #[test]
    fn test_resolve_all_url_forms() {
        let expected = Some("dQw4w9WgXcQ".to_string());

        assert_eq!(resolve("https://www.youtube.com/watch?v=dQw4w9WgXcQ"), expected);
        assert_eq!(resolve("https://youtu.be/dQw4w9WgXcQ"), expected);
        assert_eq!(resolve("https://youtube.com/embed/dQw4w9WgXcQ"), expected);
        assert_eq!(resolve("https://www.youtube.com/shorts/dQw4w9WgXcQ"), expected);
        assert_eq!(resolve("https://www.youtube.com/live/dQw4w9WgXcQ"), expected);
        assert_eq!(resolve("dQw4w9WgXcQ"), expected);
    }

    #[test]
    fn test_resolve_ignores_extra_query_params() {
        assert_eq!(
            resolve("https://www.youtube.com/watch?v=dQw4w9WgXcQ&t=42s"),
            Some("dQw4w9WgXcQ".to_string())
        );
    }

    #[test]
    fn test_resolve_trims_whitespace() {
        assert_eq!(
            resolve("  https://youtu.be/dQw4w9WgXcQ  "),
            Some("dQw4w9WgXcQ".to_string())
        );
    }

    #[test]
    fn test_resolve_rejects_invalid_inputs() {
        assert_eq!(resolve(""), None);
        assert_eq!(resolve("not-a-video-id"), None);
        // Bare ids must be exactly 11 characters.
        assert_eq!(resolve("dQw4w9WgXc"), None);
        assert_eq!(resolve("dQw4w9WgXcQQQ"), None);
        // Invalid character in a bare id.
        assert_eq!(resolve("dQw4w9WgXc!"), None);
        // URL without a video id.
        assert_eq!(resolve("https://www.youtube.com/watch"), None);
        assert_eq!(resolve("https://example.com/watch?v=dQw4w9WgXcQ"), None);
    }

    #[test]
    fn test_same_id_from_different_forms() {
        let resolver = Resolver::new();
        let a = resolver.resolve("https://www.youtube.com/watch?v=jNQXAC9IVRw");
        let b = resolver.resolve("https://youtu.be/jNQXAC9IVRw");
        assert_eq!(a, b);
    }

    #[test]
    fn test_is_valid() {
        let resolver = Resolver::new();
        assert!(resolver.is_valid("dQw4w9WgXcQ"));
        assert!(!resolver.is_valid("https://vimeo.com/12345"));
    }
}
