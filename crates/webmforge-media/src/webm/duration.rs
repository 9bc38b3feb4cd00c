//! Capping the Segment/Info/Duration element of a WebM file in place.

use crate::ebml::{self, Element, ElementId};
use crate::{Error, Result};
use std::path::Path;

/// Byte pattern that starts a Duration element: its 2-byte id.
pub const DURATION_MARKER: [u8; 2] = [0x44, 0x89];

/// Duration element header plus the leading bytes of the f64 `300000.0`
/// (five minutes at the default millisecond timecode scale).
pub const CAPPED_DURATION_PAYLOAD: [u8; 7] = [0x44, 0x89, 0x88, 0x41, 0x12, 0x4F, 0x80];

/// Default TimecodeScale: one tick per millisecond.
pub const DEFAULT_TIMECODE_SCALE: u64 = 1_000_000;

/// How the duration element was found.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PatchStrategy {
    /// Located by walking EBML header → Segment → Info → Duration.
    Structured,
    /// Located by scanning for the first [`DURATION_MARKER`].
    Marker,
}

/// Result of capping a duration.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DurationPatch {
    /// Offset of the Duration element's first byte.
    pub offset: usize,
    /// Which lookup found it.
    pub strategy: PatchStrategy,
    /// Duration before patching, in seconds, when it could be decoded.
    pub previous_secs: Option<f64>,
}

/// A Duration element located by walking the element tree.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DurationElement {
    /// The Duration element header.
    pub element: Element,
    /// Width of the float payload (4 or 8).
    pub width: usize,
    /// Nanoseconds per tick from Info/TimecodeScale.
    pub timecode_scale: u64,
    /// Current value in seconds.
    pub secs: f64,
}

/// Seven-byte literal payload that caps the duration at `max_secs`.
///
/// The payload covers the element id, an 8-byte size, and the top four bytes of
/// the millisecond value as an f64; for whole-second limits the low four bytes
/// of that float are zero, so patching them is unnecessary.
pub fn marker_payload(max_secs: u32) -> [u8; 7] {
    let millis = (max_secs as f64 * 1000.0).to_be_bytes();
    [
        DURATION_MARKER[0],
        DURATION_MARKER[1],
        0x88,
        millis[0],
        millis[1],
        millis[2],
        millis[3],
    ]
}

/// Overwrite the seven bytes starting at the first [`DURATION_MARKER`] with
/// `payload`. Every other byte is left untouched.
///
/// Returns the offset of the marker.
///
/// This trusts that the first marker occurrence is the real element. Prefer
/// [`cap_duration`], which only falls back to this for non-EBML data.
pub fn patch_marker(data: &mut [u8], payload: &[u8; 7]) -> Result<usize> {
    let idx = data
        .windows(DURATION_MARKER.len())
        .position(|w| w == DURATION_MARKER)
        .ok_or(Error::DurationNotFound)?;

    let end = idx + payload.len();
    if end > data.len() {
        return Err(Error::BufferUnderflow {
            need: end,
            have: data.len(),
        });
    }

    data[idx..end].copy_from_slice(payload);
    Ok(idx)
}

/// Locate the Duration element by walking the EBML structure.
///
/// # Errors
///
/// - [`Error::NotEbml`] if the data does not start with an EBML header.
/// - [`Error::DurationNotFound`] if the Segment has no Info/Duration before
///   its first Cluster.
pub fn locate_duration(data: &[u8]) -> Result<DurationElement> {
    let header = ebml::read_element(data, 0).map_err(|_| Error::NotEbml)?;
    if header.id != ElementId::EBML {
        return Err(Error::NotEbml);
    }

    let segment = find_child(data, header.offset, data.len(), ElementId::SEGMENT, None)?
        .ok_or(Error::DurationNotFound)?;
    let segment_end = segment.data_end(data.len())?;

    let info = find_child(
        data,
        segment.data_offset,
        segment_end,
        ElementId::INFO,
        Some(ElementId::CLUSTER),
    )?
    .ok_or(Error::DurationNotFound)?;
    let info_end = info.data_end(segment_end)?;

    let mut timecode_scale = DEFAULT_TIMECODE_SCALE;
    let mut duration = None;
    for child in ebml::children(data, info.data_offset, info_end) {
        let child = child?;
        let end = child.data_end(info_end)?;
        match child.id {
            ElementId::TIMECODE_SCALE => {
                timecode_scale = ebml::read_uint(&data[child.data_offset..end])?;
            }
            ElementId::DURATION => {
                duration = Some((child, end - child.data_offset));
            }
            _ => {}
        }
    }

    let (element, width) = duration.ok_or(Error::DurationNotFound)?;
    if timecode_scale == 0 {
        return Err(Error::invalid_ebml("TimecodeScale is zero"));
    }

    let ticks = ebml::read_float(&data[element.data_offset..element.data_offset + width])?;
    Ok(DurationElement {
        element,
        width,
        timecode_scale,
        secs: ticks * timecode_scale as f64 / 1e9,
    })
}

/// First child of `buf[start..end]` with `id`, stopping early at `stop`.
fn find_child(
    data: &[u8],
    start: usize,
    end: usize,
    id: ElementId,
    stop: Option<ElementId>,
) -> Result<Option<Element>> {
    for child in ebml::children(data, start, end) {
        let child = child?;
        if child.id == id {
            return Ok(Some(child));
        }
        if Some(child.id) == stop {
            break;
        }
    }
    Ok(None)
}

/// Cap the reported duration of a WebM buffer at `max_secs`.
///
/// Walks the EBML tree and rewrites the Duration float at its existing width.
/// Only data that is not an EBML document at all falls back to the literal
/// [`patch_marker`] scan; a parseable file without a Duration element is an
/// error rather than a blind patch.
pub fn cap_duration(data: &mut [u8], max_secs: u32) -> Result<DurationPatch> {
    match locate_duration(data) {
        Ok(found) => {
            let ticks = max_secs as f64 * 1e9 / found.timecode_scale as f64;
            let start = found.element.data_offset;
            ebml::write_float(&mut data[start..start + found.width], ticks)?;
            Ok(DurationPatch {
                offset: found.element.offset,
                strategy: PatchStrategy::Structured,
                previous_secs: Some(found.secs),
            })
        }
        Err(Error::NotEbml) => {
            let offset = patch_marker(data, &marker_payload(max_secs))?;
            Ok(DurationPatch {
                offset,
                strategy: PatchStrategy::Marker,
                previous_secs: None,
            })
        }
        Err(e) => Err(e),
    }
}

/// Read `path`, cap its duration at `max_secs` and write it back.
pub fn cap_duration_file<P: AsRef<Path>>(path: P, max_secs: u32) -> Result<DurationPatch> {
    let path = path.as_ref();
    let mut data = std::fs::read(path)?;
    let patch = cap_duration(&mut data, max_secs)?;
    std::fs::write(path, &data)?;
    Ok(patch)
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Build `id | size | payload` with a 1-byte size (payload < 127 bytes) or
    /// an unknown size.
    fn element(id: &[u8], payload: &[u8], unknown_size: bool) -> Vec<u8> {
        let mut out = id.to_vec();
        if unknown_size {
            out.push(0xFF);
        } else {
            assert!(payload.len() < 0x7F);
            out.push(0x80 | payload.len() as u8);
        }
        out.extend_from_slice(payload);
        out
    }

    /// A tiny WebM: EBML header, Segment { SeekHead, Info { TimecodeScale,
    /// Duration }, Cluster }.
    fn webm(duration_payload: &[u8], segment_unknown: bool) -> Vec<u8> {
        let ebml_header = element(&[0x1A, 0x45, 0xDF, 0xA3], &[0x42, 0x82, 0x84, b'w', b'e', b'b', b'm'], false);

        // The seek head's payload deliberately contains the marker bytes.
        let seek_head = element(&[0x11, 0x4D, 0x9B, 0x74], &[0x44, 0x89, 0x00, 0x00], false);
        let mut info_payload = element(&[0x2A, 0xD7, 0xB1], &[0x0F, 0x42, 0x40], false);
        info_payload.extend(element(&[0x44, 0x89], duration_payload, false));
        let info = element(&[0x15, 0x49, 0xA9, 0x66], &info_payload, false);
        let cluster = element(&[0x1F, 0x43, 0xB6, 0x75], &[0xE7, 0x81, 0x00], false);

        let mut segment_payload = seek_head;
        segment_payload.extend(info);
        segment_payload.extend(cluster);

        let mut out = ebml_header;
        out.extend(element(&[0x18, 0x53, 0x80, 0x67], &segment_payload, segment_unknown));
        out
    }

    #[test]
    fn test_capped_payload_matches_five_minutes() {
        assert_eq!(marker_payload(300), CAPPED_DURATION_PAYLOAD);
    }

    #[test]
    fn test_patch_marker_replaces_exact_range() {
        let mut data: Vec<u8> = (0u8..32).map(|b| b.wrapping_mul(7) | 0x01).collect();
        data[10] = 0x44;
        data[11] = 0x89;
        let original = data.clone();

        let idx = patch_marker(&mut data, &CAPPED_DURATION_PAYLOAD).unwrap();

        assert_eq!(idx, 10);
        assert_eq!(&data[idx..idx + 7], &CAPPED_DURATION_PAYLOAD);
        assert_eq!(&data[..idx], &original[..idx]);
        assert_eq!(&data[idx + 7..], &original[idx + 7..]);
    }

    #[test]
    fn test_patch_marker_absent() {
        let mut data = vec![0u8; 16];
        assert!(matches!(
            patch_marker(&mut data, &CAPPED_DURATION_PAYLOAD),
            Err(Error::DurationNotFound)
        ));
        assert_eq!(data, vec![0u8; 16]);
    }

    #[test]
    fn test_patch_marker_too_close_to_end() {
        let mut data = vec![0u8, 0, 0x44, 0x89, 0];
        assert!(matches!(
            patch_marker(&mut data, &CAPPED_DURATION_PAYLOAD),
            Err(Error::BufferUnderflow { need: 9, have: 5 })
        ));
    }

    #[test]
    fn test_locate_duration_skips_earlier_marker() {
        let data = webm(&412_345.0f64.to_be_bytes(), false);
        let found = locate_duration(&data).unwrap();

        let first_marker = data.windows(2).position(|w| w == DURATION_MARKER).unwrap();
        assert!(found.element.offset > first_marker);
        assert_eq!(found.width, 8);
        assert_eq!(found.timecode_scale, 1_000_000);
        assert!((found.secs - 412.345).abs() < 1e-9);
    }

    #[test]
    fn test_cap_duration_structured_f64() {
        let mut data = webm(&412_345.0f64.to_be_bytes(), false);
        let before = data.clone();

        let patch = cap_duration(&mut data, 300).unwrap();
        assert_eq!(patch.strategy, PatchStrategy::Structured);
        assert!((patch.previous_secs.unwrap() - 412.345).abs() < 1e-9);

        let found = locate_duration(&data).unwrap();
        assert_eq!(found.secs, 300.0);

        // Only the float payload changed.
        let start = found.element.data_offset;
        assert_eq!(&data[..start], &before[..start]);
        assert_eq!(&data[start + 8..], &before[start + 8..]);
    }

    #[test]
    fn test_cap_duration_structured_f32_unknown_segment_size() {
        let mut data = webm(&(412_345.0f32).to_be_bytes(), true);
        let patch = cap_duration(&mut data, 300).unwrap();
        assert_eq!(patch.strategy, PatchStrategy::Structured);

        let found = locate_duration(&data).unwrap();
        assert_eq!(found.width, 4);
        assert_eq!(found.secs, 300.0);
    }

    #[test]
    fn test_cap_duration_falls_back_for_non_ebml() {
        let mut data = vec![0x10u8; 20];
        data[4] = 0x44;
        data[5] = 0x89;

        let patch = cap_duration(&mut data, 300).unwrap();
        assert_eq!(patch.strategy, PatchStrategy::Marker);
        assert_eq!(patch.offset, 4);
        assert_eq!(&data[4..11], &CAPPED_DURATION_PAYLOAD);
    }

    #[test]
    fn test_cap_duration_missing_element_is_error() {
        // Valid EBML header followed by a Segment with only a Cluster.
        let mut data = element(&[0x1A, 0x45, 0xDF, 0xA3], &[], false);
        let cluster = element(&[0x1F, 0x43, 0xB6, 0x75], &[0x44, 0x89, 0, 0, 0, 0, 0, 0], false);
        data.extend(element(&[0x18, 0x53, 0x80, 0x67], &cluster, false));
        let before = data.clone();

        assert!(matches!(cap_duration(&mut data, 300), Err(Error::DurationNotFound)));
        assert_eq!(data, before);
    }

    #[test]
    fn test_cap_duration_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.webm");
        std::fs::write(&path, webm(&999_000.0f64.to_be_bytes(), false)).unwrap();

        let patch = cap_duration_file(&path, 300).unwrap();
        assert_eq!(patch.strategy, PatchStrategy::Structured);

        let data = std::fs::read(&path).unwrap();
        assert_eq!(locate_duration(&data).unwrap().secs, 300.0);
    }
}
