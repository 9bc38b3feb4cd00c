//! Size-constrained encoding.
//!
//! - [`estimate_bitrate`] picks the starting bitrate from the duration
//! - [`EncodeController`] re-encodes at corrected bitrates until the artifact
//!   fits the size ceiling or the floor bitrate has been tried

mod bitrate;
mod controller;

pub use bitrate::{estimate_bitrate, BitrateEstimate};
pub use controller::{EncodeController, EncodeOutcome, EncodeReport, EncodeResult};

use crate::config::LimitsConfig;
use crate::error::ConvertError;

/// Process-wide size limits, read-only during a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SizeConstraint {
    max_bytes: u64,
    min_bitrate: u32,
    default_bitrate: u32,
}

impl SizeConstraint {
    /// Validate and build a constraint.
    ///
    /// # Errors
    ///
    /// [`ConvertError::InvalidConstraint`] when `max_bytes` or `min_bitrate`
    /// is zero, or the floor is above the default.
    pub fn new(max_bytes: u64, min_bitrate: u32, default_bitrate: u32) -> Result<Self, ConvertError> {
        if max_bytes == 0 {
            return Err(ConvertError::InvalidConstraint(
                "max_file_size must be greater than 0".to_string(),
            ));
        }
        if min_bitrate == 0 {
            return Err(ConvertError::InvalidConstraint(
                "min_bitrate must be at least 1".to_string(),
            ));
        }
        if min_bitrate > default_bitrate {
            return Err(ConvertError::InvalidConstraint(format!(
                "min_bitrate ({}) is above default_bitrate ({})",
                min_bitrate, default_bitrate
            )));
        }
        Ok(Self {
            max_bytes,
            min_bitrate,
            default_bitrate,
        })
    }

    /// Size ceiling in bytes.
    pub fn max_bytes(&self) -> u64 {
        self.max_bytes
    }

    /// Floor bitrate in kbit/s.
    pub fn min_bitrate(&self) -> u32 {
        self.min_bitrate
    }

    /// Bitrate used when the duration leaves room for it, in kbit/s.
    pub fn default_bitrate(&self) -> u32 {
        self.default_bitrate
    }
}

impl TryFrom<&LimitsConfig> for SizeConstraint {
    type Error = ConvertError;

    fn try_from(limits: &LimitsConfig) -> Result<Self, Self::Error> {
        Self::new(limits.max_file_size, limits.min_bitrate, limits.default_bitrate)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_constraint_from_default_limits() {
        let constraint = SizeConstraint::try_from(&LimitsConfig::default()).unwrap();
        assert_eq!(constraint.max_bytes(), 6 * 1024 * 1024);
        assert_eq!(constraint.min_bitrate(), 45);
        assert_eq!(constraint.default_bitrate(), 256);
    }

    #[test]
    fn test_constraint_rejects_floor_above_default() {
        assert!(matches!(
            SizeConstraint::new(1000, 300, 256),
            Err(ConvertError::InvalidConstraint(_))
        ));
    }

    #[test]
    fn test_constraint_rejects_zeroes() {
        assert!(SizeConstraint::new(0, 45, 256).is_err());
        assert!(SizeConstraint::new(1000, 0, 256).is_err());
        assert!(SizeConstraint::new(1000, 256, 256).is_ok());
    }
}
