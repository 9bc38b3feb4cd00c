//! WebM container patches.
//!
//! Uploads longer than the platform's displayed-duration limit are accepted
//! when the container *reports* a duration within the limit. Rewriting the
//! Segment/Info/Duration float does that without touching the media data.

mod duration;

pub use duration::{
    cap_duration, cap_duration_file, locate_duration, marker_payload, patch_marker,
    DurationElement, DurationPatch, PatchStrategy, CAPPED_DURATION_PAYLOAD,
    DEFAULT_TIMECODE_SCALE, DURATION_MARKER,
};
