use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub limits: LimitsConfig,

    #[serde(default)]
    pub encoder: EncoderConfig,

    #[serde(default)]
    pub image: ImageConfig,

    /// Extensions (lowercase, no dot) that mark an input as the audio track
    #[serde(default = "default_audio_extensions")]
    pub audio_extensions: Vec<String>,

    /// Wait for Enter before exiting after a fatal error
    #[serde(default)]
    pub pause_on_error: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            limits: LimitsConfig::default(),
            encoder: EncoderConfig::default(),
            image: ImageConfig::default(),
            audio_extensions: default_audio_extensions(),
            pause_on_error: false,
        }
    }
}

impl Config {
    /// Whether `path` has one of the configured audio extensions.
    pub fn is_audio(&self, path: &std::path::Path) -> bool {
        path.extension()
            .and_then(|e| e.to_str())
            .map(|ext| {
                self.audio_extensions
                    .iter()
                    .any(|a| a.eq_ignore_ascii_case(ext))
            })
            .unwrap_or(false)
    }
}

fn default_audio_extensions() -> Vec<String> {
    ["flac", "mp3", "m4a", "aac", "alac", "ogg", "wav", "opus"]
        .iter()
        .map(|s| s.to_string())
        .collect()
}

#[derive(Debug, Clone, Copy, Deserialize, Serialize)]
pub struct LimitsConfig {
    /// Upload size ceiling in bytes (default: 6 MiB)
    #[serde(default = "default_max_file_size")]
    pub max_file_size: u64,

    /// Longest duration the platform displays; longer outputs get their
    /// duration header capped to this
    #[serde(default = "default_max_duration")]
    pub max_duration_secs: u32,

    /// Audio bitrate in kbit/s when the file fits at this rate
    #[serde(default = "default_bitrate")]
    pub default_bitrate: u32,

    /// Lowest audio bitrate the encoder will be asked for
    #[serde(default = "default_min_bitrate")]
    pub min_bitrate: u32,
}

fn default_max_file_size() -> u64 {
    6 * 1024 * 1024
}
fn default_max_duration() -> u32 {
    300
}
fn default_bitrate() -> u32 {
    256
}
fn default_min_bitrate() -> u32 {
    45
}

impl Default for LimitsConfig {
    fn default() -> Self {
        Self {
            max_file_size: default_max_file_size(),
            max_duration_secs: default_max_duration(),
            default_bitrate: default_bitrate(),
            min_bitrate: default_min_bitrate(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct EncoderConfig {
    #[serde(default)]
    pub ffmpeg_path: Option<PathBuf>,

    #[serde(default)]
    pub ffprobe_path: Option<PathBuf>,

    /// Kill an encoder or probe still running after this many seconds
    /// (0 = wait forever)
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
}

fn default_timeout() -> u64 {
    600
}

impl Default for EncoderConfig {
    fn default() -> Self {
        Self {
            ffmpeg_path: None,
            ffprobe_path: None,
            timeout_secs: default_timeout(),
        }
    }
}

impl EncoderConfig {
    pub fn timeout(&self) -> Option<Duration> {
        (self.timeout_secs > 0).then(|| Duration::from_secs(self.timeout_secs))
    }
}

#[derive(Debug, Clone, Copy, Deserialize, Serialize)]
pub struct ImageConfig {
    /// Resize covers whose longer side is outside the range
    #[serde(default = "default_true")]
    pub resize: bool,

    #[serde(default = "default_min_side")]
    pub min_side: u32,

    #[serde(default = "default_max_side")]
    pub max_side: u32,

    /// Always extract an embedded cover, even when it needs no resizing
    #[serde(default = "default_true")]
    pub extract_embedded: bool,

    /// Enlarge covers whose longer side is below `min_side`
    #[serde(default)]
    pub upscale_small: bool,
}

fn default_true() -> bool {
    true
}
fn default_min_side() -> u32 {
    400
}
fn default_max_side() -> u32 {
    800
}

impl Default for ImageConfig {
    fn default() -> Self {
        Self {
            resize: true,
            min_side: default_min_side(),
            max_side: default_max_side(),
            extract_embedded: true,
            upscale_small: false,
        }
    }
}
