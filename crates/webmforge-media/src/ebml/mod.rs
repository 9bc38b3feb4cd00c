//! Minimal EBML element reader.
//!
//! Only what is needed to find and rewrite fixed-width elements in place:
//! element headers, unsigned integers and floats. Element payloads are never
//! copied; every position is an offset into the caller's buffer.

mod ids;

pub use ids::ElementId;

use crate::{Error, Result};

/// Parsed element header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Element {
    /// Element id.
    pub id: ElementId,
    /// Offset of the first id byte.
    pub offset: usize,
    /// Offset where the payload starts (after id and size).
    pub data_offset: usize,
    /// Payload size, `None` when the writer left it unknown (live streams).
    pub size: Option<u64>,
}

impl Element {
    /// End of the payload. Unknown sizes extend to `limit`, the end of the
    /// enclosing element.
    pub fn data_end(&self, limit: usize) -> Result<usize> {
        match self.size {
            None => Ok(limit),
            Some(size) => {
                let end = usize::try_from(size)
                    .ok()
                    .and_then(|s| self.data_offset.checked_add(s))
                    .ok_or_else(|| Error::invalid_ebml(format!("{} size overflows", self.id)))?;
                if end > limit {
                    return Err(Error::BufferUnderflow {
                        need: end,
                        have: limit,
                    });
                }
                Ok(end)
            }
        }
    }
}

fn byte_at(buf: &[u8], pos: usize) -> Result<u8> {
    buf.get(pos).copied().ok_or(Error::BufferUnderflow {
        need: pos + 1,
        have: buf.len(),
    })
}

fn bytes_at(buf: &[u8], pos: usize, len: usize) -> Result<&[u8]> {
    buf.get(pos..pos + len).ok_or(Error::BufferUnderflow {
        need: pos + len,
        have: buf.len(),
    })
}

/// Read an element id at `pos`. Returns the id and its encoded length.
pub fn read_id(buf: &[u8], pos: usize) -> Result<(ElementId, usize)> {
    let first = byte_at(buf, pos)?;
    let len = first.leading_zeros() as usize + 1;
    if len > 4 {
        return Err(Error::invalid_ebml(format!(
            "invalid id lead byte 0x{:02X} at {}",
            first, pos
        )));
    }

    let id = bytes_at(buf, pos, len)?
        .iter()
        .fold(0u32, |acc, &b| (acc << 8) | b as u32);
    Ok((ElementId(id), len))
}

/// Read a data-size vint at `pos`. Returns the size (`None` if unknown) and
/// its encoded length.
pub fn read_size(buf: &[u8], pos: usize) -> Result<(Option<u64>, usize)> {
    let first = byte_at(buf, pos)?;
    let len = first.leading_zeros() as usize + 1;
    if len > 8 {
        return Err(Error::invalid_ebml(format!("invalid size vint at {}", pos)));
    }

    let bytes = bytes_at(buf, pos, len)?;
    let mut value = (first as u64) & ((1u64 << (8 - len)) - 1);
    for &b in &bytes[1..] {
        value = (value << 8) | b as u64;
    }

    let unknown = (1u64 << (7 * len)) - 1;
    Ok((if value == unknown { None } else { Some(value) }, len))
}

/// Read the element header starting at `pos`.
pub fn read_element(buf: &[u8], pos: usize) -> Result<Element> {
    let (id, id_len) = read_id(buf, pos)?;
    let (size, size_len) = read_size(buf, pos + id_len)?;
    Ok(Element {
        id,
        offset: pos,
        data_offset: pos + id_len + size_len,
        size,
    })
}

/// Decode an unsigned integer payload (0–8 bytes, big endian).
pub fn read_uint(data: &[u8]) -> Result<u64> {
    if data.len() > 8 {
        return Err(Error::invalid_ebml(format!(
            "{}-byte unsigned integer",
            data.len()
        )));
    }
    Ok(data.iter().fold(0u64, |acc, &b| (acc << 8) | b as u64))
}

/// Decode a float payload (0, 4 or 8 bytes, big endian).
pub fn read_float(data: &[u8]) -> Result<f64> {
    match data.len() {
        0 => Ok(0.0),
        4 => Ok(f32::from_be_bytes([data[0], data[1], data[2], data[3]]) as f64),
        8 => {
            let mut raw = [0u8; 8];
            raw.copy_from_slice(data);
            Ok(f64::from_be_bytes(raw))
        }
        n => Err(Error::invalid_ebml(format!("{}-byte float", n))),
    }
}

/// Encode `value` into a float payload of the existing width (4 or 8 bytes).
pub fn write_float(data: &mut [u8], value: f64) -> Result<()> {
    match data.len() {
        4 => data.copy_from_slice(&(value as f32).to_be_bytes()),
        8 => data.copy_from_slice(&value.to_be_bytes()),
        n => {
            return Err(Error::unsupported(format!(
                "cannot rewrite a {}-byte float in place",
                n
            )))
        }
    }
    Ok(())
}

/// Iterator over the direct children in `buf[start..end]`.
pub struct Children<'a> {
    buf: &'a [u8],
    pos: usize,
    end: usize,
}

/// Iterate the elements laid out back to back in `buf[start..end]`.
pub fn children(buf: &[u8], start: usize, end: usize) -> Children<'_> {
    Children {
        buf,
        pos: start,
        end: end.min(buf.len()),
    }
}

impl Iterator for Children<'_> {
    type Item = Result<Element>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.pos >= self.end {
            return None;
        }

        let result = read_element(&self.buf[..self.end], self.pos)
            .and_then(|element| element.data_end(self.end).map(|end| (element, end)));

        match result {
            Ok((element, next)) => {
                self.pos = next;
                Some(Ok(element))
            }
            Err(e) => {
                self.pos = self.end;
                Some(Err(e))
            }
        }
    }
}
