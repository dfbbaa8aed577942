//! MD2 file header (68 bytes)
//!
//! # Layout
//! ```text
//! 0x00: ident        i32   "IDP2"
//! 0x04: version      i32   8
//! 0x08: skin_width   i32
//! 0x0C: skin_height  i32
//! 0x10: frame_size   i32   bytes per frame record
//! 0x14: skin_count   i32
//! 0x18: vertex_count i32   vertices per frame
//! 0x1C: uv_count     i32
//! 0x20: face_count   i32
//! 0x24: glcmd_count  i32   in 32-bit words
//! 0x28: frame_count  i32
//! 0x2C: skin_ofs     i32
//! 0x30: uv_ofs       i32
//! 0x34: face_ofs     i32
//! 0x38: frame_ofs    i32
//! 0x3C: glcmd_ofs    i32
//! 0x40: end_of_file  i32
//! ```

use crate::error::{Md2Error, Md2Result};
use crate::reader::FieldReader;
use crate::{HEADER_SIZE, MD2_IDENT, MD2_VERSION};

/// Decoded MD2 header, fields in file order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Md2Header {
    pub ident: i32,
    pub version: i32,
    pub skin_width: i32,
    pub skin_height: i32,
    pub frame_size: i32,
    pub skin_count: i32,
    pub vertex_count: i32,
    pub uv_count: i32,
    pub face_count: i32,
    pub glcmd_count: i32,
    pub frame_count: i32,
    pub skin_ofs: i32,
    pub uv_ofs: i32,
    pub face_ofs: i32,
    pub frame_ofs: i32,
    pub glcmd_ofs: i32,
    pub end_of_file: i32,
}

impl Md2Header {
    pub const SIZE: usize = HEADER_SIZE;

    fn fields(&self) -> [i32; 17] {
        [
            self.ident,
            self.version,
            self.skin_width,
            self.skin_height,
            self.frame_size,
            self.skin_count,
            self.vertex_count,
            self.uv_count,
            self.face_count,
            self.glcmd_count,
            self.frame_count,
            self.skin_ofs,
            self.uv_ofs,
            self.face_ofs,
            self.frame_ofs,
            self.glcmd_ofs,
            self.end_of_file,
        ]
    }

    /// Write header to bytes
    pub fn to_bytes(&self) -> [u8; Self::SIZE] {
        let mut bytes = [0u8; Self::SIZE];
        for (chunk, value) in bytes.chunks_exact_mut(4).zip(self.fields()) {
            chunk.copy_from_slice(&value.to_le_bytes());
        }
        bytes
    }

    /// Read header from bytes without validating the magic
    pub fn from_bytes(bytes: &[u8]) -> Option<Self> {
        if bytes.len() < Self::SIZE {
            return None;
        }
        let mut f = bytes[..Self::SIZE]
            .chunks_exact(4)
            .map(|c| i32::from_le_bytes([c[0], c[1], c[2], c[3]]));
        let mut next = || f.next().unwrap_or_default();
        Some(Self {
            ident: next(),
            version: next(),
            skin_width: next(),
            skin_height: next(),
            frame_size: next(),
            skin_count: next(),
            vertex_count: next(),
            uv_count: next(),
            face_count: next(),
            glcmd_count: next(),
            frame_count: next(),
            skin_ofs: next(),
            uv_ofs: next(),
            face_ofs: next(),
            frame_ofs: next(),
            glcmd_ofs: next(),
            end_of_file: next(),
        })
    }

    /// Decode and validate the header at the start of `reader`
    ///
    /// Only the magic is rejected; an unexpected version is logged.
    pub fn parse(reader: &FieldReader<'_>) -> Md2Result<Self> {
        let bytes = reader
            .bytes(0, Self::SIZE)
            .map_err(|_| Md2Error::TooSmall { len: reader.len() })?;
        let header = Self::from_bytes(bytes).ok_or(Md2Error::TooSmall { len: reader.len() })?;

        if header.ident != MD2_IDENT {
            return Err(Md2Error::InvalidMagic(header.ident));
        }
        if header.version != MD2_VERSION {
            tracing::warn!(
                "Unexpected MD2 version {} (expected {}), decoding anyway",
                header.version,
                MD2_VERSION
            );
        }
        Ok(header)
    }

    /// Vertices per frame
    pub fn vertex_count(&self) -> Md2Result<usize> {
        non_negative("vertex_count", self.vertex_count)
    }

    pub fn uv_count(&self) -> Md2Result<usize> {
        non_negative("uv_count", self.uv_count)
    }

    pub fn face_count(&self) -> Md2Result<usize> {
        non_negative("face_count", self.face_count)
    }

    pub fn frame_count(&self) -> Md2Result<usize> {
        non_negative("frame_count", self.frame_count)
    }

    pub fn skin_count(&self) -> Md2Result<usize> {
        non_negative("skin_count", self.skin_count)
    }

    pub fn glcmd_count(&self) -> Md2Result<usize> {
        non_negative("glcmd_count", self.glcmd_count)
    }

    pub fn frame_size(&self) -> Md2Result<usize> {
        non_negative("frame_size", self.frame_size)
    }
}

/// Convert a signed header field to a size, rejecting negatives
pub(crate) fn non_negative(field: &'static str, value: i32) -> Md2Result<usize> {
    usize::try_from(value).map_err(|_| Md2Error::NegativeField { field, value })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_header() -> Md2Header {
        Md2Header {
            ident: MD2_IDENT,
            version: MD2_VERSION,
            skin_width: 256,
            skin_height: 128,
            frame_size: 56,
            skin_count: 1,
            vertex_count: 4,
            uv_count: 4,
            face_count: 2,
            glcmd_count: 0,
            frame_count: 1,
            skin_ofs: 68,
            uv_ofs: 132,
            face_ofs: 148,
            frame_ofs: 172,
            glcmd_ofs: 228,
            end_of_file: 228,
        }
    }

    #[test]
    fn test_header_round_trip() {
        let header = sample_header();
        let bytes = header.to_bytes();
        assert_eq!(bytes.len(), 68);
        assert_eq!(&bytes[0..4], b"IDP2");

        let parsed = Md2Header::from_bytes(&bytes).unwrap();
        assert_eq!(parsed, header);
        assert_eq!(parsed.to_bytes(), bytes);
    }

    #[test]
    fn test_field_order() {
        let bytes = sample_header().to_bytes();
        // vertex_count is the 7th field, end_of_file the last
        assert_eq!(i32::from_le_bytes(bytes[24..28].try_into().unwrap()), 4);
        assert_eq!(i32::from_le_bytes(bytes[64..68].try_into().unwrap()), 228);
    }

    #[test]
    fn test_parse_rejects_magic() {
        let mut header = sample_header();
        header.ident = i32::from_le_bytes(*b"IDP3");
        let bytes = header.to_bytes();
        let result = Md2Header::parse(&FieldReader::new(&bytes));
        assert!(matches!(result, Err(Md2Error::InvalidMagic(id)) if id == header.ident));
    }

    #[test]
    fn test_parse_too_small() {
        let bytes = sample_header().to_bytes();
        let result = Md2Header::parse(&FieldReader::new(&bytes[..67]));
        assert!(matches!(result, Err(Md2Error::TooSmall { len: 67 })));
        assert!(Md2Header::from_bytes(&bytes[..67]).is_none());
    }

    #[test]
    fn test_parse_accepts_other_version() {
        let mut header = sample_header();
        header.version = 7;
        let bytes = header.to_bytes();
        let parsed = Md2Header::parse(&FieldReader::new(&bytes)).unwrap();
        assert_eq!(parsed.version, 7);
    }

    #[test]
    fn test_negative_counts() {
        let mut header = sample_header();
        header.face_count = -1;
        assert!(matches!(
            header.face_count(),
            Err(Md2Error::NegativeField { field: "face_count", value: -1 })
        ));
        assert_eq!(header.vertex_count().unwrap(), 4);
    }
}
