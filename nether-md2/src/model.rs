//! Decoded MD2 data structures

use glam::Vec3;

use crate::error::{Md2Error, Md2Result};
use crate::header::Md2Header;

/// One triangle: three vertex indices and three texcoord indices
///
/// The two index spaces are independent; corner `n` pairs `vertices[n]`
/// with `tex_coords[n]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Triangle {
    pub vertices: [i16; 3],
    pub tex_coords: [i16; 3],
}

impl Triangle {
    pub fn new(vertices: [i16; 3], tex_coords: [i16; 3]) -> Self {
        Self {
            vertices,
            tex_coords,
        }
    }

    /// Vertex indices as `usize`, valid once the model passed index validation
    #[inline]
    pub fn vertex_indices(&self) -> [usize; 3] {
        self.vertices.map(|v| v as usize)
    }

    #[inline]
    pub fn tex_coord_indices(&self) -> [usize; 3] {
        self.tex_coords.map(|t| t as usize)
    }
}

/// Texture coordinate, raw skin-pixel values plus normalized UV
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct TexCoord {
    /// Raw horizontal pixel coordinate
    pub s: i16,
    /// Raw vertical pixel coordinate
    pub t: i16,
    /// `s / skin_width`
    pub u: f32,
    /// `t / skin_height`
    pub v: f32,
}

impl TexCoord {
    /// Normalize raw pixel coordinates against the skin size
    pub fn from_raw(s: i16, t: i16, skin_width: i32, skin_height: i32) -> Self {
        Self {
            s,
            t,
            u: s as f32 / skin_width as f32,
            v: t as f32 / skin_height as f32,
        }
    }

    pub fn uv(&self) -> [f32; 2] {
        [self.u, self.v]
    }
}

/// Quantized vertex sample within one frame
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RawVertex {
    pub position: [u8; 3],
    /// Index into [`NORMALS`](crate::NORMALS)
    pub normal: u8,
}

impl RawVertex {
    pub fn new(x: u8, y: u8, z: u8, normal: u8) -> Self {
        Self {
            position: [x, y, z],
            normal,
        }
    }
}

/// One animation frame
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Frame {
    pub scale: Vec3,
    pub translate: Vec3,
    /// Frame name with NUL padding stripped (e.g. "stand01")
    pub name: String,
    pub vertices: Vec<RawVertex>,
}

impl Frame {
    /// Dequantize one vertex position
    #[inline]
    pub fn position(&self, vertex: &RawVertex) -> Vec3 {
        Vec3::from_array(vertex.position.map(f32::from)) * self.scale + self.translate
    }
}

/// A fully decoded MD2 file
#[derive(Debug, Clone, PartialEq)]
pub struct Md2Model {
    pub header: Md2Header,
    /// Skin texture paths
    pub skins: Vec<String>,
    pub tex_coords: Vec<TexCoord>,
    pub triangles: Vec<Triangle>,
    pub frames: Vec<Frame>,
    /// Raw GL command words (triangle strips/fans), kept verbatim
    pub gl_commands: Vec<i32>,
}

impl Md2Model {
    /// Vertices per frame
    pub fn vertex_count(&self) -> usize {
        self.frames
            .first()
            .map(|f| f.vertices.len())
            .unwrap_or_else(|| self.header.vertex_count.max(0) as usize)
    }

    pub fn frame_count(&self) -> usize {
        self.frames.len()
    }

    pub fn frame(&self, index: usize) -> Md2Result<&Frame> {
        self.frames.get(index).ok_or(Md2Error::FrameOutOfRange {
            frame: index,
            count: self.frames.len(),
        })
    }

    /// Find a frame by name
    pub fn frame_by_name(&self, name: &str) -> Option<(usize, &Frame)> {
        self.frames.iter().enumerate().find(|(_, f)| f.name == name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tex_coord_normalization() {
        let tc = TexCoord::from_raw(64, 96, 256, 128);
        assert_eq!(tc.u, 0.25);
        assert_eq!(tc.v, 0.75);
        assert_eq!(tc.uv(), [0.25, 0.75]);
        assert_eq!((tc.s, tc.t), (64, 96));
    }

    #[test]
    fn test_frame_dequantize() {
        let frame = Frame {
            scale: Vec3::new(0.5, 2.0, 1.0),
            translate: Vec3::new(-10.0, 0.0, 3.0),
            name: "run1".into(),
            vertices: vec![RawVertex::new(20, 3, 255, 0)],
        };
        assert_eq!(
            frame.position(&frame.vertices[0]),
            Vec3::new(0.0, 6.0, 258.0)
        );
    }

    #[test]
    fn test_triangle_indices() {
        let tri = Triangle::new([0, 5, 9], [1, 2, 3]);
        assert_eq!(tri.vertex_indices(), [0, 5, 9]);
        assert_eq!(tri.tex_coord_indices(), [1, 2, 3]);
    }
}
