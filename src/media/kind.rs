//! File classification by extension

use std::path::Path;

/// Broad media category of a file
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MediaKind {
    Image,
    Video,
    Audio,
    Document,
    Archive,
    Unknown,
}

const IMAGE_EXTENSIONS: &[&str] = &[
    "jpg", "jpeg", "png", "gif", "bmp", "webp", "svg", "ico", "tif", "tiff", "heic", "avif",
];

const VIDEO_EXTENSIONS: &[&str] = &[
    "mp4", "avi", "mov", "wmv", "flv", "webm", "mkv", "m4v", "3gp",
];

const AUDIO_EXTENSIONS: &[&str] = &["mp3", "wav", "flac", "aac", "ogg", "m4a", "wma"];

const DOCUMENT_EXTENSIONS: &[&str] = &[
    "pdf", "doc", "docx", "xls", "xlsx", "ppt", "pptx", "txt", "md", "rtf", "csv", "json",
];

const ARCHIVE_EXTENSIONS: &[&str] = &["zip", "rar", "7z", "tar", "gz", "bz2", "xz"];

/// Classify a file name by its extension (case-insensitive).
/// Names without an extension are `Unknown`.
pub fn classify(file_name: &str) -> MediaKind {
    let ext = match Path::new(file_name).extension() {
        Some(ext) => ext.to_string_lossy().to_lowercase(),
        None => return MediaKind::Unknown,
    };
    let ext = ext.as_str();

    if IMAGE_EXTENSIONS.contains(&ext) {
        MediaKind::Image
    } else if VIDEO_EXTENSIONS.contains(&ext) {
        MediaKind::Video
    } else if AUDIO_EXTENSIONS.contains(&ext) {
        MediaKind::Audio
    } else if DOCUMENT_EXTENSIONS.contains(&ext) {
        MediaKind::Document
    } else if ARCHIVE_EXTENSIONS.contains(&ext) {
        MediaKind::Archive
    } else {
        MediaKind::Unknown
    }
}

impl MediaKind {
    /// Images and videos are the files the managers track
    pub fn is_visual(self) -> bool {
        matches!(self, MediaKind::Image | MediaKind::Video)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            MediaKind::Image => "image",
            MediaKind::Video => "video",
            MediaKind::Audio => "audio",
            MediaKind::Document => "document",
            MediaKind::Archive => "archive",
            MediaKind::Unknown => "unknown",
        }
    }
}

impl std::fmt::Display for MediaKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.pad(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_extensions() {
        assert_eq!(classify("main.jpg"), MediaKind::Image);
        assert_eq!(classify("clip.webm"), MediaKind::Video);
        assert_eq!(classify("voice.flac"), MediaKind::Audio);
        assert_eq!(classify("brochure.pdf"), MediaKind::Document);
        assert_eq!(classify("bundle.7z"), MediaKind::Archive);
    }

    #[test]
    fn test_case_insensitive() {
        assert_eq!(classify("DSC_0001.JPG"), MediaKind::Image);
        assert_eq!(classify("Intro.Mp4"), MediaKind::Video);
    }

    #[test]
    fn test_unknown_and_missing_extension() {
        assert_eq!(classify("README"), MediaKind::Unknown);
        assert_eq!(classify("data.xyz"), MediaKind::Unknown);
        assert_eq!(classify(""), MediaKind::Unknown);
        assert_eq!(classify(".jpg"), MediaKind::Unknown);
    }

    #[test]
    fn test_only_last_extension_counts() {
        assert_eq!(classify("photos.tar.gz"), MediaKind::Archive);
        assert_eq!(classify("cover.png.txt"), MediaKind::Document);
    }

    #[test]
    fn test_is_visual() {
        assert!(MediaKind::Image.is_visual());
        assert!(MediaKind::Video.is_visual());
        assert!(!MediaKind::Audio.is_visual());
        assert!(!MediaKind::Unknown.is_visual());
    }
}
