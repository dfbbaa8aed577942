//! Nether-MD2: Quake II MD2 model parser for Nethercore
//!
//! This crate decodes MD2 files and splits their single per-frame vertex
//! pool into independent mesh islands, so that weapons, tags and other
//! disconnected parts of a model can be animated as separate meshes.
//!
//! # Pipeline
//!
//! 1. [`parse_md2`] decodes the header and every table, rejecting anything
//!    that reads past the buffer or indexes past a table.
//! 2. [`FrameReconstructor::new`] runs [`Segmentation`] once and derives
//!    each island's faces and face-corner UVs.
//! 3. [`emit_clips`] walks islands × [`AnimationClip`]s × frames and hands
//!    meshes and keyframes to a [`SceneSink`].
//!
//! # Usage
//!
//! ```ignore
//! use nether_md2::{load_md2, resolve_clips, FrameReconstructor, STANDARD_CLIPS};
//!
//! let model = load_md2("tris.md2")?;
//! let recon = FrameReconstructor::new(&model)?;
//! let clips = resolve_clips(&STANDARD_CLIPS, model.frame_count());
//! nether_md2::emit_clips(&recon, &clips, 24.0, &mut my_sink)?;
//! ```
//!
//! # Format Reference
//!
//! - <http://tfc.duke.free.fr/old/models/md2.htm>

mod clips;
mod error;
mod header;
mod model;
mod normals;
mod parser;
mod reader;
mod reconstruct;
mod segment;
mod sink;
mod writer;

#[cfg(test)]
mod test_utils;

pub use clips::{
    resolve_clips, standard_clip, AnimationClip, ClipTimeline, Keyframe, DEFAULT_TARGET_FPS,
    FALLBACK_CLIP_FPS, FALLBACK_CLIP_NAME, STANDARD_CLIPS,
};
pub use error::{Md2Error, Md2Result};
pub use header::Md2Header;
pub use model::{Frame, Md2Model, RawVertex, TexCoord, Triangle};
pub use normals::{normal, NORMALS};
pub use parser::{load_md2, parse_md2};
pub use reader::FieldReader;
pub use reconstruct::{FrameGeometry, FrameReconstructor, IslandMesh};
pub use segment::{MeshIsland, Segmentation, VertexInfo};
pub use sink::{emit_clips, SceneSink};
pub use writer::{layout_header, write_md2};

// =============================================================================
// Constants
// =============================================================================

/// "IDP2" read as a little-endian i32
pub const MD2_IDENT: i32 = 844_121_161;

/// MD2 format version
pub const MD2_VERSION: i32 = 8;

/// Header size in bytes (17 × i32)
pub const HEADER_SIZE: usize = 68;

/// Entries in the precomputed normal table
pub const NUM_NORMALS: usize = 162;

/// Skin name field width
pub const SKIN_NAME_SIZE: usize = 64;

/// Frame name field width
pub const FRAME_NAME_SIZE: usize = 16;

/// Scale + translate + name preceding each frame's vertices
pub const FRAME_HEADER_SIZE: usize = 12 + 12 + FRAME_NAME_SIZE;

/// Triangle record: 3 vertex + 3 texcoord indices (i16)
pub const TRIANGLE_SIZE: usize = 12;

/// Texcoord record: s, t (i16)
pub const TEX_COORD_SIZE: usize = 4;

/// Vertex record: x, y, z, normal index (u8)
pub const VERTEX_SIZE: usize = 4;

/// Largest per-frame vertex count triangles can address (indices are i16)
pub const MAX_VERTICES: usize = i16::MAX as usize + 1;

// =============================================================================
// Tests
// =============================================================================
