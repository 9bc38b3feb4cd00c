//! Encode, measure, retry.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, info, warn};
use webmforge_av::{EncodeRequest, Encoder};

use super::SizeConstraint;
use crate::error::ConvertError;

/// The artifact left on disk by the last attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodeResult {
    pub output: PathBuf,
    pub size: u64,
    pub bitrate: u32,
}

/// Whether the final artifact fits the ceiling.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EncodeOutcome {
    WithinLimit,
    /// The floor bitrate was used and the file is still too large. The file
    /// is kept.
    Oversized,
}

/// Summary of a controller run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodeReport {
    pub result: EncodeResult,
    pub outcome: EncodeOutcome,
    /// Bitrates in the order they were tried.
    pub attempts: Vec<u32>,
}

impl EncodeReport {
    pub fn is_within_limit(&self) -> bool {
        self.outcome == EncodeOutcome::WithinLimit
    }
}

enum Check {
    Done,
    Failed,
    Retry(u32),
}

/// Drives an [`Encoder`] until its output fits a [`SizeConstraint`].
pub struct EncodeController<'a, E: Encoder + ?Sized> {
    encoder: &'a E,
    constraint: SizeConstraint,
}

impl<'a, E: Encoder + ?Sized> EncodeController<'a, E> {
    pub fn new(encoder: &'a E, constraint: SizeConstraint) -> Self {
        Self {
            encoder,
            constraint,
        }
    }

    /// Encode `request`, re-encoding at lower bitrates while the output is
    /// over the ceiling.
    ///
    /// Bitrate strictly decreases between attempts and never goes below the
    /// floor, so the loop runs at most `request.bitrate_kbps - min + 1`
    /// times. Only the last artifact is left on disk.
    ///
    /// # Errors
    ///
    /// [`ConvertError::NoOutput`] if an attempt produces no file or an empty
    /// one, [`ConvertError::Encoder`] if the encoder cannot run.
    pub fn run(&self, request: &EncodeRequest) -> Result<EncodeReport, ConvertError> {
        let min = self.constraint.min_bitrate();
        let mut bitrate = request.bitrate_kbps.max(min);
        if bitrate != request.bitrate_kbps {
            warn!(
                "Requested bitrate {}k is below the minimum, using {}k",
                request.bitrate_kbps, bitrate
            );
        }

        remove_stale(&request.output)?;

        let mut attempts = Vec::new();
        loop {
            attempts.push(bitrate);
            let attempt = request.with_bitrate(bitrate);

            info!("Encoding {} at {}k", attempt.output.display(), bitrate);
            self.encoder.encode(&attempt)?;

            let size = output_size(&attempt.output)?;
            let result = EncodeResult {
                output: attempt.output.clone(),
                size,
                bitrate,
            };

            match self.check(bitrate, size) {
                Check::Done => {
                    debug!("{} bytes at {}k fits", size, bitrate);
                    return Ok(EncodeReport {
                        result,
                        outcome: EncodeOutcome::WithinLimit,
                        attempts,
                    });
                }
                Check::Failed => {
                    warn!(
                        "Output too large ({} > {} bytes), minimum bitrate {}k already used",
                        size,
                        self.constraint.max_bytes(),
                        bitrate
                    );
                    return Ok(EncodeReport {
                        result,
                        outcome: EncodeOutcome::Oversized,
                        attempts,
                    });
                }
                Check::Retry(next) => {
                    info!(
                        "Output is {} bytes (limit {}), retrying: {}k -> {}k",
                        size,
                        self.constraint.max_bytes(),
                        bitrate,
                        next
                    );
                    fs::remove_file(&attempt.output)?;
                    bitrate = next;
                }
            }
        }
    }

    fn check(&self, bitrate: u32, size: u64) -> Check {
        let max = self.constraint.max_bytes();
        let min = self.constraint.min_bitrate();

        if size <= max {
            return Check::Done;
        }
        if bitrate <= min {
            return Check::Failed;
        }

        let scaled = (bitrate as u128 * max as u128 / size as u128) as u32;
        let mut next = scaled.max(min);
        if next >= bitrate {
            next = bitrate - 1;
        }
        Check::Retry(next)
    }
}

fn remove_stale(output: &Path) -> Result<(), ConvertError> {
    match fs::remove_file(output) {
        Ok(()) => {
            debug!("Removed stale output {}", output.display());
            Ok(())
        }
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
        Err(e) => Err(e.into()),
    }
}

fn output_size(output: &Path) -> Result<u64, ConvertError> {
    match fs::metadata(output) {
        Ok(meta) if meta.len() > 0 => Ok(meta.len()),
        _ => Err(ConvertError::NoOutput {
            path: output.to_path_buf(),
        }),
    }
}
