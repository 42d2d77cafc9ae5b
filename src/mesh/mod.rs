//! Core mesh data structures.
//!
//! This module provides the polygon-mesh store and its record types.
//!
//! # Overview
//!
//! The primary type is [`PolyMesh`], which owns vertex positions, optional
//! per-vertex normals/texture coordinates/colors, per-vertex selection
//! flags, the face list, and the material table. Faces are ordered rings of
//! [`Corner`] records, each carrying independent vertex/texture/normal
//! references, so triangle, quad, and higher-degree polygons coexist in one
//! face list.
//!
//! Derived geometry (normals, bounding box) and the topology adapter are
//! maintained by the store itself; see [`PolyMesh::update_normals`] and
//! [`PolyMesh::topology`].
//!
//! # Construction
//!
//! Stores are usually produced by [`crate::io`] or built programmatically:
//!
//! ```
//! use lamina::mesh::{Face, PolyMesh};
//! use nalgebra::Point3;
//!
//! let mut mesh = PolyMesh::new();
//! mesh.add_vertex(Point3::new(0.0, 0.0, 0.0));
//! mesh.add_vertex(Point3::new(1.0, 0.0, 0.0));
//! mesh.add_vertex(Point3::new(0.5, 1.0, 0.0));
//! mesh.add_face(Face::new([0, 1, 2])).unwrap();
//! mesh.update_normals();
//! mesh.update_bounding_box();
//! assert_eq!(mesh.num_faces(), 1);
//! ```

mod face;
mod material;
mod store;

pub use face::{Corner, Face};
pub use material::{Material, TextureImage};
pub use store::{PolyMesh, DEFAULT_VERTEX_COLOR};
