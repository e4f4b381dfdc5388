//! Source classification: decide which backend plays a URL.

use std::sync::OnceLock;

use regex::Regex;

/// Which backend a URL belongs to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SourceKind {
    /// A recognized video-hosting link with its canonical 11-character id.
    Video { id: String },
    /// Everything else, including malformed or unrecognized URLs.
    Audio,
}

fn video_link_regex() -> &'static Regex {
    static REGEX: OnceLock<Regex> = OnceLock::new();
    REGEX.get_or_init(|| {
        Regex::new(
            r"(?x)
            ^(?:https?://)?
            (?:
                (?:www\.|m\.|music\.)?youtube\.com/
                (?:
                    watch\?(?:[^\#]*&)?v=
                  | embed/
                  | v/
                  | shorts/
                )
              | (?:www\.)?youtube-nocookie\.com/embed/
              | youtu\.be/
            )
            ([A-Za-z0-9_-]{11})
            (?:[?&\#/].*)?$",
        )
        .unwrap()
    })
}

/// Extract the video id from a watch, shortened, embed, legacy or shorts link.
pub fn extract_video_id(url: &str) -> Option<String> {
    video_link_regex()
        .captures(url.trim())
        .and_then(|c| c.get(1))
        .map(|m| m.as_str().to_string())
}

/// Classify `url`. Unrecognized input falls through to [`SourceKind::Audio`].
pub fn classify(url: &str) -> SourceKind {
    match extract_video_id(url) {
        Some(id) => SourceKind::Video { id },
        None => SourceKind::Audio,
    }
}

/// Default thumbnail served by the video host for `id`.
pub fn video_thumbnail(id: &str) -> String {
    format!("https://img.youtube.com/vi/{id}/default.jpg")
}

#[cfg(test)]
mod tests {
    use super::*;

    const ID: &str = "dQw4w9WgXcQ";

    #[test]
    fn accepts_canonical_link_forms() {
        for url in [
            "https://www.youtube.com/watch?v=dQw4w9WgXcQ",
            "http://youtube.com/watch?v=dQw4w9WgXcQ&t=42s",
            "https://www.youtube.com/watch?feature=share&v=dQw4w9WgXcQ",
            "https://m.youtube.com/watch?v=dQw4w9WgXcQ",
            "https://music.youtube.com/watch?v=dQw4w9WgXcQ&list=RD",
            "https://youtu.be/dQw4w9WgXcQ",
            "youtu.be/dQw4w9WgXcQ?si=abc",
            "https://www.youtube.com/embed/dQw4w9WgXcQ",
            "https://www.youtube-nocookie.com/embed/dQw4w9WgXcQ?autoplay=1",
            "https://www.youtube.com/v/dQw4w9WgXcQ",
            "https://www.youtube.com/shorts/dQw4w9WgXcQ",
            "  https://youtu.be/dQw4w9WgXcQ#t=3  ",
        ] {
            assert_eq!(
                classify(url),
                SourceKind::Video { id: ID.to_string() },
                "{url}"
            );
        }
    }

    #[test]
    fn rejects_other_urls() {
        for url in [
            "https://example.com/song.mp3",
            "/home/me/Music/track.flac",
            "file:///tmp/a.ogg",
            "https://www.youtube.com/watch?v=short",
            "https://www.youtube.com/watch?v=dQw4w9WgXcQextra",
            "https://www.youtube.com/channel/UC1234567890",
            "https://notyoutube.com/watch?v=dQw4w9WgXcQ",
            "https://youtu.be/",
            "",
            "not a url at all",
        ] {
            assert_eq!(classify(url), SourceKind::Audio, "{url}");
        }
    }

    #[test]
    fn thumbnail_uses_video_id() {
        assert_eq!(
            video_thumbnail(ID),
            "https://img.youtube.com/vi/dQw4w9WgXcQ/default.jpg"
        );
    }
}
