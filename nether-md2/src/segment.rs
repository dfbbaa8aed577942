//! Mesh island segmentation
//!
//! An MD2 frame is one flat vertex pool even when the model is made of
//! several disconnected parts. Islands are recovered as the connected
//! components of the triangle adjacency graph: two vertices are adjacent
//! when some triangle uses both.
//!
//! Island ids follow the lowest global vertex index of each island, and
//! local indices follow depth-first visitation order from that vertex.
//! Neighbors are visited in triangle table order; for a triangle whose
//! corner `a`, `b` or `c` is the current vertex the other two corners are
//! visited as `(b, c)`, `(a, c)` or `(a, b)` respectively. Output vertex
//! order depends on this, so it must not change.

use smallvec::SmallVec;

use crate::error::{Md2Error, Md2Result};
use crate::model::{Md2Model, Triangle};
use crate::parser::check_vertex_count;

/// Island assignment of one global vertex
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct VertexInfo {
    /// Island id
    pub island: usize,
    /// Index within the island's own vertex numbering
    pub local: usize,
}

/// One connected component of the triangle adjacency graph
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MeshIsland {
    id: usize,
    vertices: Vec<usize>,
}

impl MeshIsland {
    pub fn id(&self) -> usize {
        self.id
    }

    /// Global vertex indices, positioned by local index
    pub fn vertices(&self) -> &[usize] {
        &self.vertices
    }

    /// Global index of a local vertex
    pub fn global(&self, local: usize) -> Option<usize> {
        self.vertices.get(local).copied()
    }

    pub fn len(&self) -> usize {
        self.vertices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }
}

type Neighbors = SmallVec<[usize; 12]>;

/// Immutable result of splitting a model into islands
#[derive(Debug, Clone)]
pub struct Segmentation {
    info: Vec<VertexInfo>,
    islands: Vec<MeshIsland>,
}

impl Segmentation {
    /// Segment a decoded model
    pub fn of_model(model: &Md2Model) -> Md2Result<Self> {
        Self::compute(model.vertex_count(), &model.triangles)
    }

    /// Segment `vertex_count` vertices connected by `triangles`
    pub fn compute(vertex_count: usize, triangles: &[Triangle]) -> Md2Result<Self> {
        check_vertex_count(vertex_count)?;
        let adjacency = build_adjacency(vertex_count, triangles)?;

        let mut assigned: Vec<Option<VertexInfo>> = vec![None; vertex_count];
        let mut islands: Vec<MeshIsland> = Vec::new();
        // (vertex, next neighbor position) frames of the depth-first walk
        let mut stack: Vec<(usize, usize)> = Vec::new();

        for seed in 0..vertex_count {
            if assigned[seed].is_some() {
                continue;
            }

            let id = islands.len();
            let mut members = Vec::new();

            assigned[seed] = Some(VertexInfo { island: id, local: 0 });
            members.push(seed);
            stack.push((seed, 0));

            while let Some(top) = stack.last_mut() {
                let Some(&next) = adjacency[top.0].get(top.1) else {
                    stack.pop();
                    continue;
                };
                top.1 += 1;

                if assigned[next].is_none() {
                    assigned[next] = Some(VertexInfo {
                        island: id,
                        local: members.len(),
                    });
                    members.push(next);
                    stack.push((next, 0));
                }
            }

            islands.push(MeshIsland {
                id,
                vertices: members,
            });
        }

        let info = assigned.into_iter().flatten().collect::<Vec<_>>();
        debug_assert_eq!(info.len(), vertex_count);

        tracing::info!("{} mesh islands found", islands.len());

        Ok(Self { info, islands })
    }

    pub fn island_count(&self) -> usize {
        self.islands.len()
    }

    pub fn islands(&self) -> &[MeshIsland] {
        &self.islands
    }

    pub fn island(&self, id: usize) -> Md2Result<&MeshIsland> {
        self.islands.get(id).ok_or(Md2Error::IslandOutOfRange {
            island: id,
            count: self.islands.len(),
        })
    }

    /// Assignment of a global vertex
    pub fn vertex_info(&self, global: usize) -> Option<VertexInfo> {
        self.info.get(global).copied()
    }

    /// Assignments of all global vertices, by global index
    pub fn vertex_infos(&self) -> &[VertexInfo] {
        &self.info
    }

    pub fn vertex_count(&self) -> usize {
        self.info.len()
    }
}

/// Per-vertex neighbor lists in visitation order
fn build_adjacency(vertex_count: usize, triangles: &[Triangle]) -> Md2Result<Vec<Neighbors>> {
    let mut adjacency: Vec<Neighbors> = vec![Neighbors::new(); vertex_count];

    for (triangle, tri) in triangles.iter().enumerate() {
        if let Some(&index) = tri
            .vertices
            .iter()
            .find(|&&v| v < 0 || v as usize >= vertex_count)
        {
            return Err(Md2Error::VertexIndexOutOfRange {
                triangle,
                index,
                vertex_count,
            });
        }

        let [a, b, c] = tri.vertex_indices();
        adjacency[a].extend([b, c]);
        adjacency[b].extend([a, c]);
        adjacency[c].extend([a, b]);
    }

    Ok(adjacency)
}
