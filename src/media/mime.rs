//! Extension-based media classification.

use std::fmt;

use url::Url;

/// Media families the encoder knows how to present.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MediaKind {
    Image,
    Audio,
    Video,
}

impl MediaKind {
    /// Label used in bracketed fallbacks such as `[Image] <value>`.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Image => "Image",
            Self::Audio => "Audio",
            Self::Video => "Video",
        }
    }
}

impl fmt::Display for MediaKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.label().to_lowercase())
    }
}

/// Look up an extension (without the dot, any case) in the allow-list.
pub fn classify_extension(ext: &str) -> Option<(MediaKind, &'static str)> {
    let entry = match ext.to_ascii_lowercase().as_str() {
        "png" => (MediaKind::Image, "image/png"),
        "jpg" | "jpeg" => (MediaKind::Image, "image/jpeg"),
        "gif" => (MediaKind::Image, "image/gif"),
        "webp" => (MediaKind::Image, "image/webp"),
        "svg" => (MediaKind::Image, "image/svg+xml"),
        "mp4" => (MediaKind::Video, "video/mp4"),
        "webm" => (MediaKind::Video, "video/webm"),
        "mov" => (MediaKind::Video, "video/quicktime"),
        "mp3" => (MediaKind::Audio, "audio/mpeg"),
        "wav" => (MediaKind::Audio, "audio/wav"),
        "ogg" => (MediaKind::Audio, "audio/ogg"),
        "m4a" => (MediaKind::Audio, "audio/mp4"),
        _ => return None,
    };
    Some(entry)
}

/// Final path segment of a URL, if it has one.
pub fn file_name(url: &Url) -> Option<&str> {
    url.path_segments()
        .and_then(|mut segments| segments.next_back())
        .filter(|name| !name.is_empty())
}

fn file_extension(url: &Url) -> Option<&str> {
    file_name(url)
        .and_then(|name| name.rsplit_once('.'))
        .map(|(_, ext)| ext)
}

/// An http(s) URL whose extension is on the media allow-list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MediaUrl {
    pub url: Url,
    pub kind: MediaKind,
    pub mime_type: &'static str,
}

impl MediaUrl {
    /// Classify a raw value. `None` means "not a recognized media URL".
    pub fn parse(raw: &str) -> Option<Self> {
        let url = Url::parse(raw.trim()).ok()?;
        if !matches!(url.scheme(), "http" | "https") {
            return None;
        }
        let (kind, mime_type) = file_extension(&url).and_then(classify_extension)?;
        Some(Self {
            url,
            kind,
            mime_type,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_allow_list() {
        assert_eq!(
            classify_extension("PNG"),
            Some((MediaKind::Image, "image/png"))
        );
        assert_eq!(
            classify_extension("jpeg"),
            Some((MediaKind::Image, "image/jpeg"))
        );
        assert_eq!(
            classify_extension("mov"),
            Some((MediaKind::Video, "video/quicktime"))
        );
        assert_eq!(
            classify_extension("m4a"),
            Some((MediaKind::Audio, "audio/mp4"))
        );
        assert_eq!(classify_extension("exe"), None);
    }

    #[test]
    fn test_media_url_ignores_query_string() {
        let media = MediaUrl::parse("https://cdn.example.com/out/a.webp?sig=abc").unwrap();
        assert_eq!(media.kind, MediaKind::Image);
        assert_eq!(media.mime_type, "image/webp");
    }

    #[test]
    fn test_media_url_rejects_other_schemes_and_plain_text() {
        assert!(MediaUrl::parse("ftp://example.com/a.png").is_none());
        assert!(MediaUrl::parse("data:image/png;base64,AAAA").is_none());
        assert!(MediaUrl::parse("a cat wearing a hat").is_none());
        assert!(MediaUrl::parse("https://example.com/a.txt").is_none());
    }

    #[test]
    fn test_file_name() {
        let url = Url::parse("https://example.com/dir/clip.mp4").unwrap();
        assert_eq!(file_name(&url), Some("clip.mp4"));
    }
}
