//! Topology-aware mesh operations.
//!
//! This module contains the operations built on top of the topology
//! adapter:
//!
//! - **Selection**: single-vertex, flood, inner-region, and shortest-path
//!   selection with combine modes
//! - **Subdivision**: Loop subdivision of triangle meshes
//! - **Submesh extraction**: projection of a mesh onto a vertex subset

pub mod select;
pub mod subdivide;
pub mod submesh;

pub use select::SelectMode;
pub use subdivide::loop_subdivide;
pub use submesh::extract_submesh;
