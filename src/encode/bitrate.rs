//! Starting bitrate from the audio duration.

use super::SizeConstraint;

const BITS_PER_BYTE: f64 = 8.0;
const BITS_PER_KILOBIT: f64 = 1000.0;

/// Estimator output.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BitrateEstimate {
    /// Bitrate to start encoding with, in kbit/s.
    pub bitrate: u32,
    /// The estimate hit the floor, so the output may still be too large.
    pub clamped: bool,
}

/// Pick the initial bitrate for `duration_secs` of audio.
///
/// The default bitrate is used when it fits the size ceiling. Otherwise the
/// bitrate that exactly fills the ceiling is computed, then raised by an
/// empirical factor: real WebM output is smaller than `bitrate * duration`
/// predicts, by a margin that grows roughly quadratically with length.
pub fn estimate_bitrate(duration_secs: f64, constraint: &SizeConstraint) -> BitrateEstimate {
    let duration = if duration_secs.is_finite() && duration_secs > 0.0 {
        duration_secs
    } else {
        0.0
    };

    let budget_bits = constraint.max_bytes() as f64 * BITS_PER_BYTE;
    let default = constraint.default_bitrate();

    if duration * default as f64 * BITS_PER_KILOBIT <= budget_bits {
        return BitrateEstimate {
            bitrate: default,
            clamped: false,
        };
    }

    let raw = (budget_bits / (duration * BITS_PER_KILOBIT)).floor();
    let multiplier = 1.0 + (0.001 * duration + 0.2) * duration / 9800.0;

    let mut bitrate = if raw * multiplier < default as f64 {
        (raw * multiplier).floor()
    } else {
        raw
    } as u32;

    let clamped = bitrate < constraint.min_bitrate();
    if clamped {
        bitrate = constraint.min_bitrate();
        tracing::warn!(
            "Bitrate at minimum ({}k) for {:.0}s of audio, file may be too large",
            bitrate,
            duration
        );
    }

    BitrateEstimate { bitrate, clamped }
}
