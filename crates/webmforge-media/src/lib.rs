//! webmforge-media: in-place WebM (Matroska/EBML) header patching
//!
//! # Modules
//!
//! - `ebml` - Element header, integer and float decoding over a byte buffer
//! - `webm` - Locating and capping the Segment/Info/Duration element
//!
//! # Architecture
//!
//! The encoder writes the real duration into the container. When that exceeds
//! what the upload target will display, the Duration float is rewritten at its
//! existing width, so the file size and every other byte stay the same:
//!
//! 1. Walk EBML header → Segment → Info, reading TimecodeScale on the way
//! 2. Rewrite Info/Duration in place
//! 3. For data that is not EBML at all, fall back to the literal marker scan

pub mod ebml;
pub mod error;
pub mod webm;

pub use error::{Error, Result};
pub use webm::{cap_duration, cap_duration_file, DurationPatch, PatchStrategy};
