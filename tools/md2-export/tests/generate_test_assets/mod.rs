//! Synthetic MD2 files for integration tests

use glam::Vec3;
use nether_md2::{
    write_md2, Frame, Md2Header, Md2Model, RawVertex, TexCoord, Triangle, MD2_IDENT, MD2_VERSION,
};
use std::path::Path;

/// Two disconnected triangles animated over `frame_count` frames.
///
/// Frame `i` translates everything by `i` along X.
pub fn two_island_model(frame_count: usize) -> Md2Model {
    let verts = [
        [0, 0, 0, 5],
        [10, 0, 0, 5],
        [0, 10, 0, 5],
        [100, 100, 0, 84],
        [110, 100, 0, 84],
        [100, 110, 0, 84],
    ];
    let frames = (0..frame_count)
        .map(|i| Frame {
            scale: Vec3::ONE,
            translate: Vec3::new(i as f32, 0.0, 0.0),
            name: format!("stand{:02}", i + 1),
            vertices: verts
                .iter()
                .map(|&[x, y, z, n]| RawVertex::new(x, y, z, n))
                .collect(),
        })
        .collect();

    Md2Model {
        header: Md2Header {
            ident: MD2_IDENT,
            version: MD2_VERSION,
            skin_width: 64,
            skin_height: 64,
            ..Default::default()
        },
        skins: vec!["players/test/skin.pcx".into()],
        tex_coords: [(0, 0), (32, 0), (0, 32)]
            .iter()
            .map(|&(s, t)| TexCoord::from_raw(s, t, 64, 64))
            .collect(),
        triangles: vec![
            Triangle::new([0, 1, 2], [0, 1, 2]),
            Triangle::new([3, 4, 5], [0, 1, 2]),
        ],
        frames,
        gl_commands: Vec::new(),
    }
}

pub fn write_two_island_md2(path: &Path, frame_count: usize) -> std::io::Result<()> {
    let data = write_md2(&two_island_model(frame_count)).map_err(std::io::Error::other)?;
    std::fs::write(path, data)
}
