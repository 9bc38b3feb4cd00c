//! WebM encoding through the ffmpeg CLI.

use crate::{Result, ToolCommand};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Video codec of the fixed upload profile.
pub const VIDEO_CODEC: &str = "libvpx";

/// Audio codec of the fixed upload profile.
pub const AUDIO_CODEC: &str = "libvorbis";

/// One encode attempt.
///
/// Requests are immutable; a retry at a different bitrate builds a new one
/// with [`EncodeRequest::with_bitrate`].
#[derive(Debug, Clone, PartialEq)]
pub struct EncodeRequest {
    /// Input files, audio first, then an optional cover image.
    pub inputs: Vec<PathBuf>,
    /// Value written to the container's title tag.
    pub title: String,
    /// Source duration in seconds.
    pub duration_secs: f64,
    /// Target audio bitrate in kbit/s.
    pub bitrate_kbps: u32,
    /// Where the encoder writes the artifact.
    pub output: PathBuf,
}

impl EncodeRequest {
    /// Copy of this request at another bitrate.
    pub fn with_bitrate(&self, bitrate_kbps: u32) -> Self {
        Self {
            bitrate_kbps,
            ..self.clone()
        }
    }

    /// The cover image input, if one was supplied.
    pub fn image(&self) -> Option<&Path> {
        self.inputs.get(1).map(PathBuf::as_path)
    }
}

/// Something that turns an [`EncodeRequest`] into a file at `request.output`.
///
/// Implementations block until the artifact is written. Whether the attempt
/// worked is judged by the caller from the file on disk, not from the return
/// value: `Ok(())` only means the encoder ran.
pub trait Encoder {
    fn encode(&self, request: &EncodeRequest) -> Result<()>;
}

/// [`Encoder`] that shells out to ffmpeg.
#[derive(Debug, Clone)]
pub struct FfmpegEncoder {
    ffmpeg: PathBuf,
    timeout: Option<Duration>,
}

impl FfmpegEncoder {
    /// Create an encoder for the ffmpeg binary at `ffmpeg`.
    ///
    /// A `timeout` bounds each attempt; the process is killed when it expires.
    pub fn new(ffmpeg: PathBuf, timeout: Option<Duration>) -> Self {
        Self { ffmpeg, timeout }
    }

    /// Build the ffmpeg invocation for a request.
    pub fn command(&self, request: &EncodeRequest) -> ToolCommand {
        let mut cmd = ToolCommand::new(self.ffmpeg.clone());
        cmd.timeout(self.timeout);
        cmd.args(["-hide_banner", "-nostdin", "-y"]);

        for input in &request.inputs {
            cmd.arg("-i").arg(input);
        }

        // An explicit cover must win over any picture embedded in the audio.
        if request.image().is_some() {
            cmd.args(["-map", "1:v:0", "-map", "0:a:0"]);
        }

        cmd.args(["-c:v", VIDEO_CODEC, "-c:a", AUDIO_CODEC])
            .arg("-b:a")
            .arg(format!("{}k", request.bitrate_kbps));

        if !request.title.is_empty() {
            cmd.arg("-metadata")
                .arg(format!("title={}", request.title));
        }

        cmd.arg(&request.output);
        cmd
    }
}

impl Encoder for FfmpegEncoder {
    fn encode(&self, request: &EncodeRequest) -> Result<()> {
        #[cfg(feature = "tracing")]
        tracing::info!(
            "Encoding {:?} at {}k -> {:?}",
            request.inputs,
            request.bitrate_kbps,
            request.output
        );

        let output = self.command(request).execute()?;

        if !output.status.success() {
            // Not fatal here: the caller inspects the artifact.
            #[cfg(feature = "tracing")]
            tracing::warn!(
                "ffmpeg exited with {}: {}",
                output.status,
                output.stderr.lines().last().unwrap_or("")
            );
        }

        #[cfg(feature = "tracing")]
        tracing::trace!("ffmpeg stderr:\n{}", output.stderr);

        Ok(())
    }
}
