//! Face and face-corner records.

use smallvec::SmallVec;

/// One vertex's appearance within a specific face.
///
/// A corner carries a mandatory vertex reference plus independent, optional
/// texture-coordinate and normal references into the owning mesh's buffers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Corner {
    /// Index into the mesh's vertex list.
    pub vertex: usize,
    /// Index into the mesh's texture-coordinate list, if any.
    pub texture: Option<usize>,
    /// Index into the mesh's vertex-normal list, if any.
    pub normal: Option<usize>,
}

impl Corner {
    /// Create a corner referencing only a vertex.
    pub fn new(vertex: usize) -> Self {
        Self {
            vertex,
            texture: None,
            normal: None,
        }
    }
}

/// A polygonal face: an ordered ring of at least three corners plus an
/// optional material reference.
///
/// `material == None` means the face uses the default material.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Face {
    /// The corner ring, in winding order.
    pub corners: SmallVec<[Corner; 4]>,
    /// Index into the mesh's material table, if any.
    pub material: Option<usize>,
}

impl Face {
    /// Create a face from vertex indices, with no texture/normal references
    /// and no material.
    pub fn new<It: IntoIterator<Item = usize>>(vertices: It) -> Self {
        Self {
            corners: vertices.into_iter().map(Corner::new).collect(),
            material: None,
        }
    }

    /// Create a face from vertex indices with a material reference.
    pub fn with_material<It: IntoIterator<Item = usize>>(
        vertices: It,
        material: Option<usize>,
    ) -> Self {
        Self {
            corners: vertices.into_iter().map(Corner::new).collect(),
            material,
        }
    }

    /// Number of corners (polygon degree).
    #[inline]
    pub fn vertex_count(&self) -> usize {
        self.corners.len()
    }

    /// The vertex index of corner `i`.
    #[inline]
    pub fn vertex(&self, i: usize) -> usize {
        self.corners[i].vertex
    }

    /// Iterate over the face's vertex indices in winding order.
    pub fn vertices(&self) -> impl Iterator<Item = usize> + '_ {
        self.corners.iter().map(|c| c.vertex)
    }

    /// Whether this face is a triangle.
    #[inline]
    pub fn is_triangle(&self) -> bool {
        self.corners.len() == 3
    }

    /// Reverse the winding order of the corner ring in place.
    pub fn reverse_winding(&mut self) {
        self.corners.reverse();
    }
}
