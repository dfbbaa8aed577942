//! Little-endian field reads at absolute byte offsets
//!
//! MD2 tables live at offsets named by the header rather than in stream
//! order, so reads are positional instead of going through a `Cursor`.

use glam::Vec3;

use crate::error::{Md2Error, Md2Result};

/// Bounds-checked positional reader over an in-memory MD2 buffer
#[derive(Debug, Clone, Copy)]
pub struct FieldReader<'a> {
    data: &'a [u8],
}

impl<'a> FieldReader<'a> {
    pub fn new(data: &'a [u8]) -> Self {
        Self { data }
    }

    /// Total buffer length in bytes
    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Verify that `count` records of `stride` bytes starting at `offset` fit in the buffer
    pub fn check_table(
        &self,
        table: &'static str,
        offset: usize,
        count: usize,
        stride: usize,
    ) -> Md2Result<()> {
        let out_of_bounds = |len| Md2Error::OutOfBounds {
            table,
            offset,
            len,
            file_len: self.data.len(),
        };
        let len = count
            .checked_mul(stride)
            .ok_or_else(|| out_of_bounds(usize::MAX))?;
        match offset.checked_add(len) {
            Some(end) if end <= self.data.len() => Ok(()),
            _ => Err(out_of_bounds(len)),
        }
    }

    /// Borrow `len` bytes at `offset`
    pub fn bytes(&self, offset: usize, len: usize) -> Md2Result<&'a [u8]> {
        offset
            .checked_add(len)
            .and_then(|end| self.data.get(offset..end))
            .ok_or(Md2Error::OutOfBounds {
                table: "field",
                offset,
                len,
                file_len: self.data.len(),
            })
    }

    fn array<const N: usize>(&self, offset: usize) -> Md2Result<[u8; N]> {
        let mut buf = [0u8; N];
        buf.copy_from_slice(self.bytes(offset, N)?);
        Ok(buf)
    }

    pub fn read_u8(&self, offset: usize) -> Md2Result<u8> {
        Ok(self.array::<1>(offset)?[0])
    }

    pub fn read_i16(&self, offset: usize) -> Md2Result<i16> {
        Ok(i16::from_le_bytes(self.array(offset)?))
    }

    pub fn read_i32(&self, offset: usize) -> Md2Result<i32> {
        Ok(i32::from_le_bytes(self.array(offset)?))
    }

    pub fn read_f32(&self, offset: usize) -> Md2Result<f32> {
        Ok(f32::from_le_bytes(self.array(offset)?))
    }

    /// Three consecutive f32 (12 bytes)
    pub fn read_vec3(&self, offset: usize) -> Md2Result<Vec3> {
        Ok(Vec3::new(
            self.read_f32(offset)?,
            self.read_f32(offset + 4)?,
            self.read_f32(offset + 8)?,
        ))
    }

    /// Fixed-width ASCII field, cut at the first NUL with trailing padding removed
    pub fn read_name(&self, offset: usize, width: usize) -> Md2Result<String> {
        Ok(read_string(self.bytes(offset, width)?))
    }
}

pub(crate) fn read_string(bytes: &[u8]) -> String {
    let len = bytes.iter().position(|&b| b == 0).unwrap_or(bytes.len());
    String::from_utf8_lossy(&bytes[..len])
        .trim_end()
        .to_string()
}
