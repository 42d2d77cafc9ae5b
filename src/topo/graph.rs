//! The topology adapter: adjacency records derived from a face list.
//!
//! [`Topology`] is a rebuildable cache over a [`PolyMesh`](crate::mesh::PolyMesh)
//! face list. It stores, per vertex, the incident edges; per edge, its two
//! endpoints and incident faces; and per face, its vertex/edge rings. This
//! is enough for the graph traversals the selection and subdivision engines
//! need (flood fill, shortest path, boundary and opposite-vertex queries)
//! without the store having to maintain connectivity incrementally.
//!
//! # Construction modes
//!
//! - **Polygonal**: faces are taken as given.
//! - **Triangulated**: every polygon is fan-split into triangles
//!   `(0, j+1, j+2)`, so a quad becomes `(0,1,2)`, `(0,2,3)` and higher
//!   degrees continue the fan.
//!
//! # Index correspondence
//!
//! Adapter vertices are created in store order: slot `i` corresponds to
//! store vertex `i`, and each [`TopoVert`] also carries the explicit
//! [`store_index`](TopoVert::store_index) back-reference. Adapter edge and
//! face indices are synthetic. Selection results computed against the
//! adapter can therefore be written back into store buffers positionally.

use std::collections::HashMap;

use smallvec::SmallVec;

use super::index::{EdgeId, FaceId, VertId};
use crate::mesh::Face;

/// An adapter vertex: the store back-reference plus incident edges.
#[derive(Debug, Clone)]
pub struct TopoVert {
    /// Index of the corresponding vertex in the originating mesh store.
    pub store_index: usize,
    /// Edges incident to this vertex, in discovery order.
    pub edges: Vec<EdgeId>,
}

/// An adapter edge: two endpoints plus incident faces.
#[derive(Debug, Clone)]
pub struct TopoEdge {
    /// The two endpoint vertices, lower store index first.
    pub verts: [VertId; 2],
    /// Faces incident to this edge. Fewer than two marks a boundary edge.
    pub faces: SmallVec<[FaceId; 2]>,
}

/// An adapter face: vertex and edge rings plus the store back-reference.
#[derive(Debug, Clone)]
pub struct TopoFace {
    /// The vertex ring in winding order.
    pub verts: SmallVec<[VertId; 4]>,
    /// The edge ring; `edges[i]` joins `verts[i]` and `verts[(i+1) % n]`.
    pub edges: SmallVec<[EdgeId; 4]>,
    /// Index of the store face this adapter face came from. Several
    /// adapter faces share one store face in triangulated mode.
    pub store_face: usize,
}

/// Adjacency structure derived from a mesh store's face list.
#[derive(Debug, Clone)]
pub struct Topology {
    verts: Vec<TopoVert>,
    edges: Vec<TopoEdge>,
    faces: Vec<TopoFace>,
    triangulated: bool,
}

impl Topology {
    /// Build the adapter from a face list.
    ///
    /// `vertex_count` is the store's vertex count; every store vertex gets
    /// an adapter slot even if no face references it.
    pub fn build(vertex_count: usize, faces: &[Face], triangulated: bool) -> Self {
        let mut verts: Vec<TopoVert> = (0..vertex_count)
            .map(|i| TopoVert {
                store_index: i,
                edges: Vec::new(),
            })
            .collect();
        let mut edges: Vec<TopoEdge> = Vec::new();
        let mut topo_faces: Vec<TopoFace> = Vec::new();
        let mut edge_map: HashMap<(usize, usize), EdgeId> = HashMap::new();

        let mut ring: SmallVec<[usize; 4]> = SmallVec::new();
        for (fi, face) in faces.iter().enumerate() {
            let n = face.vertex_count();
            if n < 3 {
                continue;
            }
            let polys: SmallVec<[SmallVec<[usize; 4]>; 2]> = if triangulated && n > 3 {
                (0..n - 2)
                    .map(|j| {
                        SmallVec::from_slice(&[face.vertex(0), face.vertex(j + 1), face.vertex(j + 2)])
                    })
                    .collect()
            } else {
                ring.clear();
                ring.extend(face.vertices());
                SmallVec::from_elem(ring.clone(), 1)
            };

            for poly in polys {
                let face_id = FaceId::new(topo_faces.len());
                let mut fverts: SmallVec<[VertId; 4]> = SmallVec::new();
                let mut fedges: SmallVec<[EdgeId; 4]> = SmallVec::new();
                for i in 0..poly.len() {
                    let a = poly[i];
                    let b = poly[(i + 1) % poly.len()];
                    let key = if a < b { (a, b) } else { (b, a) };
                    let edge_id = *edge_map.entry(key).or_insert_with(|| {
                        let id = EdgeId::new(edges.len());
                        edges.push(TopoEdge {
                            verts: [VertId::new(key.0), VertId::new(key.1)],
                            faces: SmallVec::new(),
                        });
                        verts[key.0].edges.push(id);
                        verts[key.1].edges.push(id);
                        id
                    });
                    edges[edge_id.index()].faces.push(face_id);
                    fverts.push(VertId::new(a));
                    fedges.push(edge_id);
                }
                topo_faces.push(TopoFace {
                    verts: fverts,
                    edges: fedges,
                    store_face: fi,
                });
            }
        }

        Self {
            verts,
            edges,
            faces: topo_faces,
            triangulated,
        }
    }

    /// The construction mode this adapter was built in.
    #[inline]
    pub fn is_triangulated(&self) -> bool {
        self.triangulated
    }

    // ==================== Accessors ====================

    /// Number of adapter vertices (equals the store vertex count).
    #[inline]
    pub fn num_verts(&self) -> usize {
        self.verts.len()
    }

    /// Number of unique edges.
    #[inline]
    pub fn num_edges(&self) -> usize {
        self.edges.len()
    }

    /// Number of adapter faces.
    #[inline]
    pub fn num_faces(&self) -> usize {
        self.faces.len()
    }

    /// Get an adapter vertex.
    #[inline]
    pub fn vert(&self, id: VertId) -> &TopoVert {
        &self.verts[id.index()]
    }

    /// Get an adapter edge.
    #[inline]
    pub fn edge(&self, id: EdgeId) -> &TopoEdge {
        &self.edges[id.index()]
    }

    /// Get an adapter face.
    #[inline]
    pub fn face(&self, id: FaceId) -> &TopoFace {
        &self.faces[id.index()]
    }

    /// The store vertex index behind an adapter vertex slot.
    #[inline]
    pub fn store_index(&self, id: VertId) -> usize {
        self.verts[id.index()].store_index
    }

    /// Iterate over all adapter-vertex ids, in store order.
    pub fn vert_ids(&self) -> impl Iterator<Item = VertId> + '_ {
        (0..self.verts.len()).map(VertId::new)
    }

    /// Iterate over all edge ids.
    pub fn edge_ids(&self) -> impl Iterator<Item = EdgeId> + '_ {
        (0..self.edges.len()).map(EdgeId::new)
    }

    /// Iterate over all adapter-face ids.
    pub fn face_ids(&self) -> impl Iterator<Item = FaceId> + '_ {
        (0..self.faces.len()).map(FaceId::new)
    }

    // ==================== Adjacency queries ====================

    /// The endpoint of `e` that is not `v`.
    #[inline]
    pub fn other_end(&self, e: EdgeId, v: VertId) -> VertId {
        let ends = self.edges[e.index()].verts;
        if ends[0] == v {
            ends[1]
        } else {
            ends[0]
        }
    }

    /// Iterate over the vertices sharing an edge with `v`.
    pub fn neighbors(&self, v: VertId) -> impl Iterator<Item = VertId> + '_ {
        self.verts[v.index()]
            .edges
            .iter()
            .map(move |&e| self.other_end(e, v))
    }

    /// The edge joining `a` and `b`, if one exists.
    pub fn edge_between(&self, a: VertId, b: VertId) -> Option<EdgeId> {
        self.verts[a.index()]
            .edges
            .iter()
            .copied()
            .find(|&e| self.other_end(e, a) == b)
    }

    /// Vertex valence (number of incident edges).
    #[inline]
    pub fn valence(&self, v: VertId) -> usize {
        self.verts[v.index()].edges.len()
    }

    /// Whether an edge has fewer than two incident faces.
    #[inline]
    pub fn is_boundary_edge(&self, e: EdgeId) -> bool {
        self.edges[e.index()].faces.len() < 2
    }

    /// Whether a vertex touches a boundary edge (or is isolated).
    pub fn is_boundary_vert(&self, v: VertId) -> bool {
        let edges = &self.verts[v.index()].edges;
        if edges.is_empty() {
            return true;
        }
        edges.iter().any(|&e| self.is_boundary_edge(e))
    }

    /// For each face incident to `e`, the face vertex that is not an
    /// endpoint of `e`. For triangulated adapters this is the classic
    /// opposite-vertex query; two results for an interior edge, one for a
    /// boundary edge.
    pub fn opposite_verts(&self, e: EdgeId) -> SmallVec<[VertId; 2]> {
        let ends = self.edges[e.index()].verts;
        let mut out = SmallVec::new();
        for &f in &self.edges[e.index()].faces {
            if let Some(&v) = self.faces[f.index()]
                .verts
                .iter()
                .find(|&&v| v != ends[0] && v != ends[1])
            {
                out.push(v);
            }
        }
        out
    }
}
