//! Topology adapter over a mesh store's face list.
//!
//! The adapter is a derived, rebuildable cache: it is owned by the
//! [`PolyMesh`](crate::mesh::PolyMesh) that produced it, is dropped
//! wholesale whenever the store's geometry mutates or the other
//! construction mode is requested, and is rebuilt lazily on the next
//! topology-dependent call. Rebuilding from scratch keeps the invalidation
//! contract trivial; topology queries are batched (select, then read back)
//! rather than interleaved with per-vertex mutation, so the rebuild cost is
//! paid rarely.
//!
//! ```
//! use lamina::mesh::{Face, PolyMesh};
//! use nalgebra::Point3;
//!
//! let mut mesh = PolyMesh::new();
//! for p in [[0.0, 0.0], [1.0, 0.0], [1.0, 1.0], [0.0, 1.0]] {
//!     mesh.add_vertex(Point3::new(p[0], p[1], 0.0));
//! }
//! mesh.add_face(Face::new([0, 1, 2, 3])).unwrap();
//!
//! let topo = mesh.topology(true);
//! assert_eq!(topo.num_faces(), 2); // the quad was fan-split
//! assert_eq!(topo.num_edges(), 5);
//! ```

mod graph;
mod index;

pub use graph::{TopoEdge, TopoFace, TopoVert, Topology};
pub use index::{EdgeId, FaceId, VertId};
