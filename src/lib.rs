//! # Lamina
//!
//! A polygon-mesh geometry kernel.
//!
//! Lamina owns a mesh's vertex, face, and material data, keeps its derived
//! geometry (normals, bounding box) consistent, and builds an on-demand
//! topology adapter over the face list for the operations that need
//! connectivity: selection propagation, shortest-path selection, Loop
//! subdivision, and submesh extraction.
//!
//! ## Features
//!
//! - **Polygon-mesh store**: positions, normals, texture coordinates,
//!   colors, selection flags, variable-degree faces, materials
//! - **Topology adapter**: per-vertex adjacency and edge-face incidence,
//!   rebuilt lazily from the face list in polygonal or triangulated mode
//! - **Selection**: single vertex, flood fill, enclosed-region fill,
//!   shortest path, with replace/union/remove combining
//! - **Loop subdivision**: one 1-to-4 refinement step with the classic
//!   boundary/interior masks
//! - **File formats**: Wavefront OBJ with MTL material libraries, OFF
//!
//! ## Quick Start
//!
//! ```no_run
//! use lamina::io::{self, LoadOptions};
//! use lamina::algo::{loop_subdivide, select};
//!
//! // Load a mesh.
//! let mut mesh = io::load("model.obj", &LoadOptions::default()).unwrap();
//! println!("Vertices: {}", mesh.num_vertices());
//! println!("Faces: {}", mesh.num_faces());
//!
//! // Select everything reachable from vertex 0.
//! select::select_linked_vertices(&mut mesh, 0, select::SelectMode::Replace).unwrap();
//!
//! // Refine and save.
//! let fine = loop_subdivide(&mut mesh).unwrap();
//! io::save(&fine, "output.obj").unwrap();
//! ```
//!
//! ## Building Meshes Programmatically
//!
//! ```
//! use lamina::mesh::{Face, PolyMesh};
//! use nalgebra::Point3;
//!
//! let mut mesh = PolyMesh::new();
//! for p in [[0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [0.5, 1.0, 0.0], [0.5, 0.5, 1.0]] {
//!     mesh.add_vertex(Point3::new(p[0], p[1], p[2]));
//! }
//! for f in [[0, 2, 1], [0, 1, 3], [1, 2, 3], [2, 0, 3]] {
//!     mesh.add_face(Face::new(f)).unwrap();
//! }
//! mesh.update_normals();
//! mesh.update_bounding_box();
//!
//! let topo = mesh.topology(true);
//! assert_eq!(topo.num_edges(), 6);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod algo;
pub mod error;
pub mod io;
pub mod mesh;
pub mod topo;

/// Prelude module for convenient imports.
///
/// This module re-exports the most commonly used types and functions:
///
/// ```
/// use lamina::prelude::*;
/// ```
pub mod prelude {
    pub use crate::algo::{extract_submesh, loop_subdivide, SelectMode};
    pub use crate::error::{MeshError, Result};
    pub use crate::io::LoadOptions;
    pub use crate::mesh::{Corner, Face, Material, PolyMesh, TextureImage};
    pub use crate::topo::{EdgeId, FaceId, Topology, VertId};
}

// Re-export nalgebra types for convenience
pub use nalgebra;

#[cfg(test)]
mod tests {
    use super::prelude::*;
    use crate::algo::select;
    use nalgebra::Point3;

    #[test]
    fn test_tetrahedron_pipeline() {
        let mut mesh = PolyMesh::new();
        for p in [
            [0.0, 0.0, 0.0],
            [1.0, 0.0, 0.0],
            [0.5, 1.0, 0.0],
            [0.5, 0.5, 1.0],
        ] {
            mesh.add_vertex(Point3::new(p[0], p[1], p[2]));
        }
        for f in [[0, 2, 1], [0, 1, 3], [1, 2, 3], [2, 0, 3]] {
            mesh.add_face(Face::new(f)).unwrap();
        }
        mesh.update_normals();
        mesh.update_bounding_box();

        // Closed mesh: no boundary edges.
        let topo = mesh.topology(true);
        assert_eq!(topo.num_edges(), 6);
        assert!(topo.edge_ids().all(|e| !topo.is_boundary_edge(e)));

        // Flood from any vertex reaches the whole component.
        select::select_linked_vertices(&mut mesh, 2, SelectMode::Replace).unwrap();
        assert_eq!(mesh.selection().len(), 4);

        // One refinement step: 4 faces -> 16, vertices |V| + |E|.
        let fine = loop_subdivide(&mut mesh).unwrap();
        assert_eq!(fine.num_faces(), 16);
        assert_eq!(fine.num_vertices(), 10);
    }
}
