// Column block encoder/decoder (§4.2, §4.3): null bitmap + typed payload,
// little-endian throughout.

use crate::data::{Cell, DataType};
use crate::error::{CcfError, Result};

/// Encode one column's text values into the uncompressed buffer layout:
/// `nb_len: u32` + null bitmap (`⌈R/8⌉` bytes) + typed payload.
///
/// A row's text value equal to the empty string is null; any other text
/// is non-null. For `INT32`/`FLOAT64` a null slot still writes the
/// sentinel zero so the buffer is fixed-width and readers must consult
/// the bitmap rather than the sentinel.
pub fn encode_column(dtype: DataType, values: &[String]) -> Result<Vec<u8>> {
    let row_count = values.len();
    let nb_len = null_bitmap_len(row_count);
    let mut buf = Vec::new();

    buf.extend_from_slice(&(nb_len as u32).to_le_bytes());
    let bitmap_start = buf.len();
    buf.resize(bitmap_start + nb_len, 0u8);
    for (i, v) in values.iter().enumerate() {
        if v.is_empty() {
            set_bit(&mut buf[bitmap_start..], i);
        }
    }

    match dtype {
        DataType::Int32 => {
            for v in values {
                let n: i32 = if v.is_empty() {
                    0
                } else {
                    v.parse().map_err(|_| {
                        CcfError::SchemaMismatch(format!("value '{}' does not fit in INT32", v))
                    })?
                };
                buf.extend_from_slice(&n.to_le_bytes());
            }
        }
        DataType::Float64 => {
            for v in values {
                let f: f64 = if v.is_empty() {
                    0.0
                } else {
                    v.parse().map_err(|_| {
                        CcfError::SchemaMismatch(format!("value '{}' is not a valid FLOAT64", v))
                    })?
                };
                buf.extend_from_slice(&f.to_le_bytes());
            }
        }
        DataType::String => {
            let mut offsets = Vec::with_capacity(row_count + 1);
            let mut payload = Vec::new();
            offsets.push(0u32);
            for v in values {
                if !v.is_empty() {
                    payload.extend_from_slice(v.as_bytes());
                }
                offsets.push(payload.len() as u32);
            }
            for off in &offsets {
                buf.extend_from_slice(&off.to_le_bytes());
            }
            buf.extend_from_slice(&payload);
        }
    }

    Ok(buf)
}

/// Decode a column's decompressed buffer back into `row_count` cells.
pub fn decode_column(buf: &[u8], dtype: DataType, row_count: usize) -> Result<Vec<Cell>> {
    let mut cursor = Cursor::new(buf);
    let nb_len = cursor.read_u32()? as usize;
    let bitmap = cursor.read_bytes(nb_len)?;
    let expected_nb_len = null_bitmap_len(row_count);
    if nb_len != expected_nb_len {
        return Err(CcfError::InvalidEncoding(format!(
            "null bitmap length {} does not match expected {} for {} rows",
            nb_len, expected_nb_len, row_count
        )));
    }
    let is_null = |i: usize| get_bit(bitmap, i);

    match dtype {
        DataType::Int32 => {
            let mut cells = Vec::with_capacity(row_count);
            for i in 0..row_count {
                let n = cursor.read_i32()?;
                cells.push(if is_null(i) { Cell::Null } else { Cell::Int32(n) });
            }
            Ok(cells)
        }
        DataType::Float64 => {
            let mut cells = Vec::with_capacity(row_count);
            for i in 0..row_count {
                let f = cursor.read_f64()?;
                cells.push(if is_null(i) {
                    Cell::Null
                } else {
                    Cell::Float64(f)
                });
            }
            Ok(cells)
        }
        DataType::String => {
            let mut offsets = Vec::with_capacity(row_count + 1);
            for _ in 0..=row_count {
                offsets.push(cursor.read_u32()?);
            }
            for w in offsets.windows(2) {
                if w[1] < w[0] {
                    return Err(CcfError::InvalidEncoding(
                        "string offsets are not non-decreasing".to_string(),
                    ));
                }
            }
            let payload = cursor.remaining();
            let payload_len = *offsets.last().unwrap() as usize;
            if payload_len > payload.len() {
                return Err(CcfError::InvalidEncoding(format!(
                    "offsets[R] ({}) exceeds payload length ({})",
                    payload_len,
                    payload.len()
                )));
            }

            let mut cells = Vec::with_capacity(row_count);
            for i in 0..row_count {
                if is_null(i) {
                    cells.push(Cell::Null);
                    continue;
                }
                let start = offsets[i] as usize;
                let end = offsets[i + 1] as usize;
                let s = std::str::from_utf8(&payload[start..end])
                    .map_err(|e| CcfError::InvalidEncoding(format!("invalid UTF-8: {}", e)))?;
                cells.push(Cell::String(s.to_string()));
            }
            Ok(cells)
        }
    }
}

pub fn null_bitmap_len(row_count: usize) -> usize {
    (row_count + 7) / 8
}

fn set_bit(bitmap: &mut [u8], index: usize) {
    bitmap[index / 8] |= 1 << (index % 8);
}

fn get_bit(bitmap: &[u8], index: usize) -> bool {
    (bitmap[index / 8] >> (index % 8)) & 1 == 1
}

/// A small cursor over an in-memory buffer, used by the decoder; distinct
/// from `crate::binary`'s `Read`/`Write`-based I/O because a column's
/// decompressed buffer is always fully resident in memory already.
struct Cursor<'a> {
    buf: &'a [u8],
    pos: usize,
}

impl<'a> Cursor<'a> {
    fn new(buf: &'a [u8]) -> Self {
        Cursor { buf, pos: 0 }
    }

    fn read_bytes(&mut self, len: usize) -> Result<&'a [u8]> {
        if self.pos + len > self.buf.len() {
            return Err(CcfError::TruncatedFile);
        }
        let slice = &self.buf[self.pos..self.pos + len];
        self.pos += len;
        Ok(slice)
    }

    fn read_u32(&mut self) -> Result<u32> {
        let bytes = self.read_bytes(4)?;
        Ok(u32::from_le_bytes(bytes.try_into().unwrap()))
    }

    fn read_i32(&mut self) -> Result<i32> {
        let bytes = self.read_bytes(4)?;
        Ok(i32::from_le_bytes(bytes.try_into().unwrap()))
    }

    fn read_f64(&mut self) -> Result<f64> {
        let bytes = self.read_bytes(8)?;
        Ok(f64::from_le_bytes(bytes.try_into().unwrap()))
    }

    fn remaining(&self) -> &'a [u8] {
        &self.buf[self.pos..]
    }
}
