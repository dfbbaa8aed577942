//! Synthetic models shared by unit tests

use glam::Vec3;

use crate::header::Md2Header;
use crate::model::{Frame, Md2Model, RawVertex, TexCoord, Triangle};
use crate::{MD2_IDENT, MD2_VERSION};

pub const SKIN_WIDTH: i32 = 256;
pub const SKIN_HEIGHT: i32 = 128;

/// Build a model with a valid header skeleton; `write_md2` fills in the layout
pub fn build_model(
    triangles: Vec<Triangle>,
    tex_coords: &[(i16, i16)],
    frames: Vec<Frame>,
) -> Md2Model {
    let vertex_count = frames.first().map(|f| f.vertices.len()).unwrap_or(0);
    Md2Model {
        header: Md2Header {
            ident: MD2_IDENT,
            version: MD2_VERSION,
            skin_width: SKIN_WIDTH,
            skin_height: SKIN_HEIGHT,
            vertex_count: vertex_count as i32,
            ..Default::default()
        },
        skins: vec!["models/test/skin.pcx".into()],
        tex_coords: tex_coords
            .iter()
            .map(|&(s, t)| TexCoord::from_raw(s, t, SKIN_WIDTH, SKIN_HEIGHT))
            .collect(),
        triangles,
        frames,
        gl_commands: Vec::new(),
    }
}

pub fn frame(name: &str, scale: Vec3, translate: Vec3, vertices: &[[u8; 4]]) -> Frame {
    Frame {
        scale,
        translate,
        name: name.into(),
        vertices: vertices
            .iter()
            .map(|&[x, y, z, n]| RawVertex::new(x, y, z, n))
            .collect(),
    }
}

/// Unit-scale quad split into two triangles sharing the 0-2 diagonal
pub fn quad_model() -> Md2Model {
    build_model(
        vec![
            Triangle::new([0, 1, 2], [0, 1, 2]),
            Triangle::new([0, 2, 3], [0, 2, 3]),
        ],
        &[(0, 0), (255, 0), (255, 127), (0, 127)],
        vec![frame(
            "base",
            Vec3::ONE,
            Vec3::ZERO,
            &[[0, 0, 0, 0], [255, 0, 0, 0], [255, 255, 0, 0], [0, 255, 0, 0]],
        )],
    )
}

/// Two triangles with no shared vertex, two frames
pub fn two_triangle_model() -> Md2Model {
    let verts = [
        [0, 0, 0, 5],
        [10, 0, 0, 5],
        [0, 10, 0, 5],
        [100, 100, 0, 84],
        [110, 100, 0, 84],
        [100, 110, 0, 84],
    ];
    let mut model = build_model(
        vec![
            Triangle::new([0, 1, 2], [0, 1, 2]),
            Triangle::new([3, 4, 5], [2, 1, 0]),
        ],
        &[(0, 0), (128, 0), (0, 64)],
        vec![
            frame("pose1", Vec3::ONE, Vec3::ZERO, &verts),
            frame("pose2", Vec3::splat(0.5), Vec3::new(1.0, 2.0, 3.0), &verts),
        ],
    );
    model.gl_commands = vec![3, 0, 0, 0];
    model
}
