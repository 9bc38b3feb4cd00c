//! Side files written next to a conversion's input.

use crate::{Error, Result};
use std::path::{Path, PathBuf};

/// Characters replaced when a title becomes a file name.
const PATH_HOSTILE: &[char] = &['/', '\\', ':', '*', '?', '"', '<', '>', '|'];

/// Workspace for one conversion.
///
/// Extracted and resized cover images are written alongside the source audio
/// and tracked here; [`Workspace::cleanup`] removes them once the final
/// artifact exists. The WebM itself is never tracked.
///
/// # Example
///
/// ```no_run
/// use webmforge_av::Workspace;
///
/// let mut workspace = Workspace::new("/music/song.flac")?;
/// let cover = workspace.derived_file("image", "jpg");
/// // ... write the cover ...
/// workspace.track(&cover);
/// let output = workspace.output_for_title("Band - Song");
/// // ... encode to `output` ...
/// workspace.cleanup();
/// # Ok::<(), webmforge_av::Error>(())
/// ```
#[derive(Debug)]
pub struct Workspace {
    input_path: PathBuf,
    dir: PathBuf,
    stem: String,
    derived: Vec<PathBuf>,
}

impl Workspace {
    /// Create a workspace anchored at the given input file.
    pub fn new<P: AsRef<Path>>(input: P) -> Result<Self> {
        let input = input.as_ref();

        let stem = input
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .ok_or_else(|| Error::InvalidInput(format!("Invalid input file path: {:?}", input)))?;

        let dir = input
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_default();

        Ok(Self {
            input_path: input.to_path_buf(),
            dir,
            stem,
            derived: Vec::new(),
        })
    }

    /// Path for a file derived from the input: `<dir>/<input stem>-<suffix>.<ext>`.
    pub fn derived_file(&self, suffix: &str, ext: &str) -> PathBuf {
        self.dir.join(format!("{}-{}.{}", self.stem, suffix, ext))
    }

    /// Output path for a title: `<dir>/<sanitized title>.webm`.
    pub fn output_for_title(&self, title: &str) -> PathBuf {
        let mut name = sanitize_file_name(title);
        if name.is_empty() {
            name = self.stem.clone();
        }
        self.dir.join(format!("{}.webm", name))
    }

    /// Register a derived file for removal on cleanup.
    pub fn track<P: AsRef<Path>>(&mut self, path: P) {
        let path = path.as_ref().to_path_buf();
        if path != self.input_path && !self.derived.contains(&path) {
            self.derived.push(path);
        }
    }

    /// Remove every tracked derived file. Missing files are ignored.
    pub fn cleanup(self) -> Vec<PathBuf> {
        let mut removed = Vec::new();
        for path in self.derived {
            match std::fs::remove_file(&path) {
                Ok(()) => removed.push(path),
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
                Err(_e) => {
                    #[cfg(feature = "tracing")]
                    tracing::warn!("Failed to remove derived file {:?}: {}", path, _e);
                }
            }
        }
        removed
    }
}

/// Replace characters that cannot appear in a file name and trim the result.
pub fn sanitize_file_name(title: &str) -> String {
    title
        .chars()
        .map(|c| {
            if PATH_HOSTILE.contains(&c) || c.is_control() {
                '_'
            } else {
                c
            }
        })
        .collect::<String>()
        .trim()
        .trim_end_matches('.')
        .to_string()
}
