//! # webmforge-av
//!
//! ffmpeg/ffprobe plumbing for turning tagged audio into a WebM upload.
//!
//! This crate provides functionality for:
//! - Probing audio files for duration, tags and embedded cover pictures
//! - Encoding audio plus an optional still cover with the fixed
//!   libvpx/libvorbis profile
//! - Extracting embedded covers to image files
//! - Running external tools with a bounded wait
//!
//! ## Features
//!
//! - `tracing` - Enable tracing support
//!
//! ## Example
//!
//! ```no_run
//! use webmforge_av::probe;
//!
//! let info = probe("/path/to/song.flac")?;
//! println!("Title: {}", info.display_title());
//! if let Some(secs) = info.duration_secs() {
//!     println!("Duration: {:.1}s", secs);
//! }
//! # Ok::<(), webmforge_av::Error>(())
//! ```

pub mod actions;
mod command;
mod error;
pub mod probe;
pub mod tools;
pub mod workspace;

// Re-exports
pub use actions::{EncodeRequest, Encoder, FfmpegEncoder};
pub use command::{ToolCommand, ToolOutput};
pub use error::{Error, Result};
pub use probe::{AudioInfo, AudioTags, CoverStream};
pub use tools::{check_tool, check_tools, get_tool_path, require_tool, ToolInfo};
pub use workspace::{sanitize_file_name, Workspace};

/// Probe an audio file with the `ffprobe` on PATH.
///
/// # Example
///
/// ```no_run
/// use webmforge_av::probe;
///
/// let info = probe("/path/to/song.mp3")?;
/// println!("Has cover: {}", info.has_cover());
/// # Ok::<(), webmforge_av::Error>(())
/// ```
pub fn probe<P: AsRef<std::path::Path>>(path: P) -> Result<AudioInfo> {
    probe::probe(path.as_ref())
}
