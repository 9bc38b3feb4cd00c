//! Media tool seam used by the pipeline.

use std::path::{Path, PathBuf};
use std::time::Duration;

use webmforge_av::actions::extract_cover;
use webmforge_av::probe::probe_with_ffprobe;
use webmforge_av::{get_tool_path, AudioInfo, CoverStream, FfmpegEncoder};

use crate::config::EncoderConfig;

/// Probing and cover extraction, everything the pipeline needs from the
/// media tools besides encoding.
pub trait MediaTools {
    fn probe(&self, audio: &Path) -> webmforge_av::Result<AudioInfo>;

    fn extract_cover(
        &self,
        audio: &Path,
        cover: &CoverStream,
        dest: &Path,
    ) -> webmforge_av::Result<PathBuf>;
}

/// ffmpeg/ffprobe resolved from config or PATH.
#[derive(Debug, Clone)]
pub struct FfmpegTools {
    ffmpeg: PathBuf,
    ffprobe: PathBuf,
    timeout: Option<Duration>,
}

impl FfmpegTools {
    pub fn from_config(config: &EncoderConfig) -> webmforge_av::Result<Self> {
        Ok(Self {
            ffmpeg: get_tool_path("ffmpeg", config.ffmpeg_path.as_deref())?,
            ffprobe: get_tool_path("ffprobe", config.ffprobe_path.as_deref())?,
            timeout: config.timeout(),
        })
    }

    pub fn encoder(&self) -> FfmpegEncoder {
        FfmpegEncoder::new(self.ffmpeg.clone(), self.timeout)
    }
}

impl MediaTools for FfmpegTools {
    fn probe(&self, audio: &Path) -> webmforge_av::Result<AudioInfo> {
        probe_with_ffprobe(&self.ffprobe, audio, self.timeout)
    }

    fn extract_cover(
        &self,
        audio: &Path,
        cover: &CoverStream,
        dest: &Path,
    ) -> webmforge_av::Result<PathBuf> {
        extract_cover(&self.ffmpeg, audio, cover, dest, self.timeout)
    }
}
