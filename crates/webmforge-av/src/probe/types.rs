//! Audio information types.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Information about an audio file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AudioInfo {
    /// Path to the probed file.
    pub file_path: PathBuf,
    /// File size in bytes.
    pub file_size: u64,
    /// Container format as reported by the prober (e.g. "flac", "mp3").
    pub container: String,
    /// Duration of the audio, when the container reports one.
    pub duration: Option<Duration>,
    /// Tag metadata.
    pub tags: AudioTags,
    /// Embedded cover picture, if any.
    pub cover: Option<CoverStream>,
}

/// Tag metadata relevant to naming the upload.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct AudioTags {
    pub title: Option<String>,
    pub artist: Option<String>,
}

/// An embedded picture stream (ID3 APIC, FLAC PICTURE, MP4 covr).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CoverStream {
    /// Index of the stream inside the container.
    pub index: u32,
    /// Codec name (e.g. "mjpeg", "png").
    pub codec: String,
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
}

impl CoverStream {
    /// File extension matching the picture's codec.
    ///
    /// Codecs without a well-known still-image container are re-encoded to PNG
    /// on extraction, hence the fallback.
    pub fn extension(&self) -> &'static str {
        match self.codec.as_str() {
            "mjpeg" | "jpeg" => "jpg",
            "bmp" => "bmp",
            "gif" => "gif",
            "webp" => "webp",
            _ => "png",
        }
    }

    /// Whether the picture can be stream-copied into a file of
    /// [`Self::extension`] without re-encoding.
    pub fn copyable(&self) -> bool {
        matches!(self.codec.as_str(), "mjpeg" | "jpeg" | "png" | "bmp" | "gif" | "webp")
    }

    /// Length of the longer side.
    pub fn longer_side(&self) -> u32 {
        self.width.max(self.height)
    }
}

impl AudioInfo {
    /// Duration in seconds.
    pub fn duration_secs(&self) -> Option<f64> {
        self.duration.map(|d| d.as_secs_f64())
    }

    /// Title used for the metadata tag and the output file name.
    ///
    /// `"<artist> - <title>"` when both tags are present, otherwise the file
    /// stem of the probed path.
    pub fn display_title(&self) -> String {
        match (&self.tags.artist, &self.tags.title) {
            (Some(artist), Some(title)) => format!("{} - {}", artist, title),
            _ => file_stem(&self.file_path),
        }
    }

    /// Whether the file carries an embedded cover picture.
    pub fn has_cover(&self) -> bool {
        self.cover.is_some()
    }
}

/// File stem of a path, lossily converted, or an empty string.
pub fn file_stem(path: &Path) -> String {
    path.file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn info(tags: AudioTags) -> AudioInfo {
        AudioInfo {
            file_path: PathBuf::from("/music/01 Track.flac"),
            file_size: 1,
            container: "flac".to_string(),
            duration: Some(Duration::from_secs_f64(123.5)),
            tags,
            cover: None,
        }
    }

    #[test]
    fn test_display_title_from_tags() {
        let info = info(AudioTags {
            title: Some("Song".to_string()),
            artist: Some("Band".to_string()),
        });
        assert_eq!(info.display_title(), "Band - Song");
    }

    #[test]
    fn test_display_title_falls_back_to_stem() {
        let info = info(AudioTags {
            title: Some("Song".to_string()),
            artist: None,
        });
        assert_eq!(info.display_title(), "01 Track");
    }

    #[test]
    fn test_duration_secs() {
        let info = info(AudioTags::default());
        assert_eq!(info.duration_secs(), Some(123.5));
    }

    #[test]
    fn test_cover_extension() {
        let mut cover = CoverStream {
            index: 1,
            codec: "mjpeg".to_string(),
            width: 1000,
            height: 900,
        };
        assert_eq!(cover.extension(), "jpg");
        assert!(cover.copyable());
        assert_eq!(cover.longer_side(), 1000);

        cover.codec = "tiff".to_string();
        assert_eq!(cover.extension(), "png");
        assert!(!cover.copyable());
    }
}
