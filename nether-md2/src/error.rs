//! MD2 decoding error types

use std::io;

/// Result alias used throughout the crate
pub type Md2Result<T> = Result<T, Md2Error>;

/// Errors raised while decoding or reconstructing an MD2 model.
///
/// Every variant is fatal: a load either produces a complete model or
/// nothing at all.
#[derive(Debug, thiserror::Error)]
pub enum Md2Error {
    /// Buffer is shorter than the fixed header
    #[error("file too small for MD2 header: {len} bytes (need {need})", need = crate::HEADER_SIZE)]
    TooSmall { len: usize },

    /// Header ident is not "IDP2"
    #[error("invalid MD2 magic 0x{0:08X} (expected 0x{expected:08X})", expected = crate::MD2_IDENT)]
    InvalidMagic(i32),

    /// A count, size or offset field in the header is negative
    #[error("header field {field} is negative ({value})")]
    NegativeField { field: &'static str, value: i32 },

    /// A table would read past the end of the buffer
    #[error("{table} table at offset {offset} ({len} bytes) exceeds file size {file_len}")]
    OutOfBounds {
        table: &'static str,
        offset: usize,
        len: usize,
        file_len: usize,
    },

    /// Declared frame size cannot hold the frame header and its vertices
    #[error("frame size {frame_size} is smaller than required {required} bytes")]
    FrameSizeTooSmall { frame_size: usize, required: usize },

    /// Declared vertex count exceeds what i16 triangle indices can address
    #[error("vertex count {count} exceeds {max}", max = crate::MAX_VERTICES)]
    TooManyVertices { count: usize },

    /// A model is too large for the header's i32 counts and offsets
    #[error("{field} value {value} does not fit an MD2 header field")]
    LayoutOverflow { field: &'static str, value: usize },

    /// Skin dimensions cannot normalize texture coordinates
    #[error("invalid skin size {width}x{height} for texture coordinates")]
    InvalidSkinSize { width: i32, height: i32 },

    /// Triangle references a vertex past the per-frame vertex count
    #[error("triangle {triangle} references vertex {index} (vertex count {vertex_count})")]
    VertexIndexOutOfRange {
        triangle: usize,
        index: i16,
        vertex_count: usize,
    },

    /// Triangle references a texture coordinate past the table
    #[error("triangle {triangle} references texcoord {index} (texcoord count {uv_count})")]
    TexCoordIndexOutOfRange {
        triangle: usize,
        index: i16,
        uv_count: usize,
    },

    /// Vertex carries a normal index outside the normal table
    #[error("frame {frame} vertex {vertex} has normal index {index} (max {max})", max = crate::NUM_NORMALS - 1)]
    NormalIndexOutOfRange {
        frame: usize,
        vertex: usize,
        index: u8,
    },

    /// Island id past the number of discovered islands
    #[error("island {island} out of range ({count} islands)")]
    IslandOutOfRange { island: usize, count: usize },

    /// Frame index past the frame table
    #[error("frame {frame} out of range ({count} frames)")]
    FrameOutOfRange { frame: usize, count: usize },

    /// Frame vertex array does not match the model's vertex count
    #[error("frame {frame} has {len} vertices, expected {expected}")]
    FrameVertexCount {
        frame: usize,
        len: usize,
        expected: usize,
    },

    /// Clip range does not fit the model's frames
    #[error("clip {name} spans frames {first}..={last} but the model has {frame_count} frames")]
    ClipOutOfRange {
        name: String,
        first: usize,
        last: usize,
        frame_count: usize,
    },

    /// IO error while reading the input file
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
}
