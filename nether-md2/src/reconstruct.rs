//! Per-island geometry reconstruction
//!
//! Topology (faces and face-corner UVs) is frame-invariant and computed once
//! per island. Positions and normals are dequantized per frame and emitted
//! in the island's local vertex order.

use glam::Vec3;

use crate::error::{Md2Error, Md2Result};
use crate::model::{Frame, Md2Model, RawVertex};
use crate::normals::normal;
use crate::parser::validate_triangles;
use crate::segment::Segmentation;

/// Frame-invariant topology of one island
#[derive(Debug, Clone, PartialEq, Default)]
pub struct IslandMesh {
    /// Faces as local vertex indices
    pub faces: Vec<[usize; 3]>,
    /// One UV per face corner, three per face in face order
    pub uvs: Vec<[f32; 2]>,
    /// Number of local vertices
    pub vertex_count: usize,
}

impl IslandMesh {
    /// UVs of one face's three corners
    pub fn face_uvs(&self, face: usize) -> Option<&[[f32; 2]]> {
        self.uvs.get(face * 3..face * 3 + 3)
    }
}

/// One island's vertices in one frame, ordered by local index
#[derive(Debug, Clone, PartialEq, Default)]
pub struct FrameGeometry {
    pub positions: Vec<Vec3>,
    pub normals: Vec<Vec3>,
}

/// Rebuilds island meshes from a decoded model
#[derive(Debug, Clone)]
pub struct FrameReconstructor<'a> {
    model: &'a Md2Model,
    segmentation: Segmentation,
    meshes: Vec<IslandMesh>,
}

impl<'a> FrameReconstructor<'a> {
    /// Segment the model and derive every island's faces
    ///
    /// Triangle indices are re-validated since the model may not come from
    /// [`parse_md2`](crate::parse_md2).
    pub fn new(model: &'a Md2Model) -> Md2Result<Self> {
        let segmentation = Segmentation::of_model(model)?;
        validate_triangles(
            &model.triangles,
            segmentation.vertex_count(),
            model.tex_coords.len(),
        )?;

        let mut meshes: Vec<IslandMesh> = segmentation
            .islands()
            .iter()
            .map(|island| IslandMesh {
                vertex_count: island.len(),
                ..Default::default()
            })
            .collect();

        // All three corners share an island, so the first corner decides
        for tri in &model.triangles {
            let [a, b, c] = tri.vertex_indices();
            let info = segmentation.vertex_infos();
            let mesh = &mut meshes[info[a].island];

            mesh.faces
                .push([info[a].local, info[b].local, info[c].local]);
            mesh.uvs
                .extend(tri.tex_coord_indices().map(|t| model.tex_coords[t].uv()));
        }

        Ok(Self {
            model,
            segmentation,
            meshes,
        })
    }

    pub fn model(&self) -> &'a Md2Model {
        self.model
    }

    pub fn segmentation(&self) -> &Segmentation {
        &self.segmentation
    }

    pub fn island_count(&self) -> usize {
        self.meshes.len()
    }

    /// Faces and UVs of an island
    pub fn island_mesh(&self, island: usize) -> Md2Result<&IslandMesh> {
        self.meshes.get(island).ok_or(Md2Error::IslandOutOfRange {
            island,
            count: self.meshes.len(),
        })
    }

    /// Positions and normals of an island in one frame
    pub fn frame(&self, island: usize, frame: usize) -> Md2Result<FrameGeometry> {
        let mut geometry = FrameGeometry::default();
        self.visit(island, frame, |frame_data, raw, vertex| {
            geometry.positions.push(frame_data.position(raw));
            geometry
                .normals
                .push(normal(raw.normal).ok_or(Md2Error::NormalIndexOutOfRange {
                    frame,
                    vertex,
                    index: raw.normal,
                })?);
            Ok(())
        })?;
        Ok(geometry)
    }

    /// Positions only, for animation keys
    pub fn positions(&self, island: usize, frame: usize) -> Md2Result<Vec<Vec3>> {
        let mut positions = Vec::new();
        self.visit(island, frame, |frame_data, raw, _| {
            positions.push(frame_data.position(raw));
            Ok(())
        })?;
        Ok(positions)
    }

    /// Walk an island's raw vertices of one frame in local order
    fn visit<F>(&self, island: usize, frame: usize, mut f: F) -> Md2Result<()>
    where
        F: FnMut(&Frame, &RawVertex, usize) -> Md2Result<()>,
    {
        let island = self.segmentation.island(island)?;
        let frame_data = self.model.frame(frame)?;

        let expected = self.segmentation.vertex_count();
        if frame_data.vertices.len() != expected {
            return Err(Md2Error::FrameVertexCount {
                frame,
                len: frame_data.vertices.len(),
                expected,
            });
        }

        for &global in island.vertices() {
            f(frame_data, &frame_data.vertices[global], global)?;
        }
        Ok(())
    }
}
