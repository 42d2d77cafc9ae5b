//! The polygon-mesh store.
//!
//! [`PolyMesh`] owns all per-vertex buffers, the face list, and the material
//! table, and maintains the geometry derived from them: face and vertex
//! normals, the axis-aligned bounding box, and the lazily rebuilt topology
//! adapter.
//!
//! # Buffers and indexing
//!
//! Vertex identity is positional: a vertex *is* its index into the parallel
//! buffers. Indices are stable for the lifetime of a store but are remapped
//! whenever ingestion or submesh extraction rebuilds it. The normal and
//! color buffers are either empty or exactly as long as the vertex list;
//! the face-normal buffer is either empty or exactly as long as the face
//! list.
//!
//! # Cache invalidation
//!
//! Every geometry mutator funnels through [`PolyMesh::invalidate`], which
//! drops the cached topology adapter and raises the renderer-facing dirty
//! flag. Selection changes only raise the dirty flag; they do not touch
//! topology.

use nalgebra::{Matrix3, Matrix4, Point2, Point3, Vector3};

use super::face::Face;
use super::material::Material;
use crate::error::{MeshError, Result};
use crate::topo::Topology;

/// The default vertex color written by ingestion (a mid gray).
pub const DEFAULT_VERTEX_COLOR: Vector3<f32> = Vector3::new(0.8, 0.8, 0.8);

/// A polygon mesh: vertex buffers, faces, materials, and derived geometry.
#[derive(Debug)]
pub struct PolyMesh {
    /// Display name, usually the source file name.
    pub(crate) name: String,
    /// Material library file name, as referenced by `mtllib`.
    pub(crate) material_file: Option<String>,

    pub(crate) vertices: Vec<Point3<f32>>,
    pub(crate) vertex_normals: Vec<Vector3<f32>>,
    pub(crate) vertex_texcoords: Vec<Point2<f32>>,
    pub(crate) vertex_colors: Vec<Vector3<f32>>,
    pub(crate) vertex_selected: Vec<bool>,
    pub(crate) faces: Vec<Face>,
    pub(crate) face_normals: Vec<Vector3<f32>>,
    pub(crate) materials: Vec<Material>,

    pub(crate) bounds: [Point3<f32>; 2],

    /// Raised on every mutation so an external renderer knows to re-batch.
    pub(crate) render_dirty: bool,
    /// Cached topology adapter; `None` after any geometry mutation.
    pub(crate) topo: Option<Topology>,
}

impl Clone for PolyMesh {
    /// Deep-copies all buffers. The topology adapter is never copied: the
    /// clone starts without one and rebuilds it lazily, so no adapter
    /// back-references can outlive the store they were built from.
    fn clone(&self) -> Self {
        Self {
            name: self.name.clone(),
            material_file: self.material_file.clone(),
            vertices: self.vertices.clone(),
            vertex_normals: self.vertex_normals.clone(),
            vertex_texcoords: self.vertex_texcoords.clone(),
            vertex_colors: self.vertex_colors.clone(),
            vertex_selected: self.vertex_selected.clone(),
            faces: self.faces.clone(),
            face_normals: self.face_normals.clone(),
            materials: self.materials.clone(),
            bounds: self.bounds,
            render_dirty: true,
            topo: None,
        }
    }
}

impl Default for PolyMesh {
    fn default() -> Self {
        Self::new()
    }
}

impl PolyMesh {
    /// Create a new empty mesh.
    pub fn new() -> Self {
        Self {
            name: String::new(),
            material_file: None,
            vertices: Vec::new(),
            vertex_normals: Vec::new(),
            vertex_texcoords: Vec::new(),
            vertex_colors: Vec::new(),
            vertex_selected: Vec::new(),
            faces: Vec::new(),
            face_normals: Vec::new(),
            materials: Vec::new(),
            bounds: [Point3::origin(); 2],
            render_dirty: true,
            topo: None,
        }
    }

    /// Drop every buffer and reset names, bounds, and caches.
    pub fn clear(&mut self) {
        self.name.clear();
        self.material_file = None;
        self.vertices.clear();
        self.vertex_normals.clear();
        self.vertex_texcoords.clear();
        self.vertex_colors.clear();
        self.vertex_selected.clear();
        self.faces.clear();
        self.face_normals.clear();
        self.materials.clear();
        self.bounds = [Point3::origin(), Point3::origin()];
        self.invalidate();
    }

    // ==================== Accessors ====================

    /// Display name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Set the display name.
    pub fn set_name<S: Into<String>>(&mut self, name: S) {
        self.name = name.into();
    }

    /// Material library file name, if any.
    pub fn material_file(&self) -> Option<&str> {
        self.material_file.as_deref()
    }

    /// Number of vertices.
    #[inline]
    pub fn num_vertices(&self) -> usize {
        self.vertices.len()
    }

    /// Number of faces.
    #[inline]
    pub fn num_faces(&self) -> usize {
        self.faces.len()
    }

    /// Vertex positions.
    pub fn positions(&self) -> &[Point3<f32>] {
        &self.vertices
    }

    /// Vertex normals (empty or one per vertex).
    pub fn vertex_normals(&self) -> &[Vector3<f32>] {
        &self.vertex_normals
    }

    /// Texture coordinates, indexed by face-corner texture references.
    pub fn texcoords(&self) -> &[Point2<f32>] {
        &self.vertex_texcoords
    }

    /// Vertex colors (empty or one per vertex).
    pub fn vertex_colors(&self) -> &[Vector3<f32>] {
        &self.vertex_colors
    }

    /// Face normals (empty or one per face).
    pub fn face_normals(&self) -> &[Vector3<f32>] {
        &self.face_normals
    }

    /// The face list.
    pub fn faces(&self) -> &[Face] {
        &self.faces
    }

    /// The material table.
    pub fn materials(&self) -> &[Material] {
        &self.materials
    }

    /// The material of a face, or `None` for the default material.
    pub fn face_material(&self, face: usize) -> Option<&Material> {
        self.faces[face].material.and_then(|m| self.materials.get(m))
    }

    /// Componentwise (min, max) of all vertex positions, as last computed
    /// by [`update_bounding_box`](Self::update_bounding_box).
    pub fn bounding_box(&self) -> (Point3<f32>, Point3<f32>) {
        (self.bounds[0], self.bounds[1])
    }

    /// Whether a renderer consuming this mesh needs to re-batch its data.
    pub fn is_render_dirty(&self) -> bool {
        self.render_dirty
    }

    /// Acknowledge the dirty flag after re-batching.
    pub fn clear_render_dirty(&mut self) {
        self.render_dirty = false;
    }

    // ==================== Construction ====================

    /// Append a vertex and return its index.
    pub fn add_vertex(&mut self, position: Point3<f32>) -> usize {
        self.vertices.push(position);
        self.invalidate();
        self.vertices.len() - 1
    }

    /// Append a face. Every corner's vertex index must already be in range.
    pub fn add_face(&mut self, face: Face) -> Result<usize> {
        for corner in &face.corners {
            if corner.vertex >= self.vertices.len() {
                return Err(MeshError::VertexOutOfRange {
                    vertex: corner.vertex,
                    count: self.vertices.len(),
                });
            }
        }
        self.faces.push(face);
        self.invalidate();
        Ok(self.faces.len() - 1)
    }

    /// Append a material and return its index in the material table.
    pub fn add_material(&mut self, material: Material) -> usize {
        self.materials.push(material);
        self.render_dirty = true;
        self.materials.len() - 1
    }

    // ==================== Transforms ====================

    /// Translate every vertex by `t`.
    pub fn translate(&mut self, t: Vector3<f32>) {
        for v in &mut self.vertices {
            *v += t;
        }
        self.update_bounding_box();
        self.invalidate();
    }

    /// Scale every vertex componentwise by `s` about the point `c`.
    pub fn scale_about(&mut self, s: Vector3<f32>, c: Point3<f32>) {
        for v in &mut self.vertices {
            *v = c + (*v - c).component_mul(&s);
        }
        self.update_bounding_box();
        self.invalidate();
    }

    /// Scale every vertex componentwise by `s` about the bounding-box center.
    pub fn scale_about_center(&mut self, s: Vector3<f32>) {
        let c = nalgebra::center(&self.bounds[0], &self.bounds[1]);
        self.scale_about(s, c);
    }

    /// Rotate every vertex by `r` about the point `c`, then recompute normals.
    pub fn rotate_about(&mut self, r: &Matrix3<f32>, c: Point3<f32>) {
        for v in &mut self.vertices {
            *v = c + r * (*v - c);
        }
        self.update_normals();
        self.update_bounding_box();
        self.invalidate();
    }

    /// Rotate every vertex by `r` about the bounding-box center.
    pub fn rotate_about_center(&mut self, r: &Matrix3<f32>) {
        let c = nalgebra::center(&self.bounds[0], &self.bounds[1]);
        self.rotate_about(r, c);
    }

    /// Apply an affine transform (rotation/scale block plus translation
    /// column) to every vertex, then recompute normals.
    pub fn apply_transform(&mut self, m: &Matrix4<f32>) {
        let r = m.fixed_view::<3, 3>(0, 0).into_owned();
        let t = m.fixed_view::<3, 1>(0, 3).into_owned();
        for v in &mut self.vertices {
            *v = Point3::from(r * v.coords + t);
        }
        self.update_normals();
        self.update_bounding_box();
        self.invalidate();
    }

    // ==================== Derived geometry ====================

    /// Recompute the componentwise min/max bounds over all vertices.
    ///
    /// An empty mesh gets a degenerate zero box.
    pub fn update_bounding_box(&mut self) {
        if self.vertices.is_empty() {
            self.bounds = [Point3::origin(), Point3::origin()];
            return;
        }
        let mut min = self.vertices[0];
        let mut max = self.vertices[0];
        for v in &self.vertices {
            for i in 0..3 {
                min[i] = min[i].min(v[i]);
                max[i] = max[i].max(v[i]);
            }
        }
        self.bounds = [min, max];
    }

    /// Recompute face and vertex normals from the current geometry.
    ///
    /// Each polygon is fanned into triangles `(0, j+1, j+2)`; the sum of
    /// the unnormalized cross products is the face's normal direction
    /// (left zero for degenerate faces) and is accumulated into each corner
    /// vertex, so vertex normals come out area-weighted. Corner normal
    /// references are reset to per-vertex normals.
    pub fn update_normals(&mut self) {
        self.face_normals.resize(self.faces.len(), Vector3::zeros());
        self.vertex_normals
            .resize(self.vertices.len(), Vector3::zeros());
        for n in &mut self.vertex_normals {
            *n = Vector3::zeros();
        }

        for (fi, face) in self.faces.iter_mut().enumerate() {
            let n = face.corners.len();
            let mut sum = Vector3::zeros();
            if n >= 3 {
                let p0 = self.vertices[face.corners[0].vertex];
                for j in 0..n - 2 {
                    let p1 = self.vertices[face.corners[j + 1].vertex];
                    let p2 = self.vertices[face.corners[j + 2].vertex];
                    sum += (p1 - p0).cross(&(p2 - p0));
                }
            }
            for corner in &mut face.corners {
                self.vertex_normals[corner.vertex] += sum;
                corner.normal = Some(corner.vertex);
            }
            self.face_normals[fi] = if sum.norm() != 0.0 {
                sum.normalize()
            } else {
                Vector3::zeros()
            };
        }

        for n in &mut self.vertex_normals {
            if n.norm() != 0.0 {
                n.normalize_mut();
            }
        }
        self.render_dirty = true;
    }

    /// Reverse every face's winding order and negate all stored normals.
    pub fn flip_normals(&mut self) {
        for f in &mut self.faces {
            f.reverse_winding();
        }
        for n in &mut self.face_normals {
            *n = -*n;
        }
        for n in &mut self.vertex_normals {
            *n = -*n;
        }
        self.invalidate();
    }

    /// Translate the bounding-box center to the origin and uniformly scale
    /// by the largest bounding-box extent. No-op when that extent is zero.
    pub fn normalize_model(&mut self) {
        let extent = self.bounds[1] - self.bounds[0];
        let diag = extent.x.max(extent.y).max(extent.z);
        if diag == 0.0 {
            return;
        }
        let center = nalgebra::center(&self.bounds[0], &self.bounds[1]);
        for v in &mut self.vertices {
            *v = Point3::from((*v - center) / diag);
        }
        self.update_bounding_box();
        self.invalidate();
    }

    // ==================== Selection state ====================

    /// Whether the vertex at `i` is selected.
    pub fn is_vertex_selected(&self, i: usize) -> bool {
        self.vertex_selected.get(i).copied().unwrap_or(false)
    }

    /// Whether any vertex is selected.
    pub fn has_selected_vertex(&self) -> bool {
        self.vertex_selected.iter().any(|&s| s)
    }

    /// The indices of all selected vertices, in ascending order.
    pub fn selection(&self) -> Vec<usize> {
        self.vertex_selected
            .iter()
            .enumerate()
            .filter_map(|(i, &s)| if s { Some(i) } else { None })
            .collect()
    }

    /// Replace the selection with exactly the given vertex ids.
    pub fn set_selection(&mut self, ids: &[usize]) -> Result<()> {
        for &id in ids {
            if id >= self.vertices.len() {
                return Err(MeshError::VertexOutOfRange {
                    vertex: id,
                    count: self.vertices.len(),
                });
            }
        }
        self.vertex_selected = vec![false; self.vertices.len()];
        for &id in ids {
            self.vertex_selected[id] = true;
        }
        self.render_dirty = true;
        Ok(())
    }

    /// Resize the selection buffer to match the vertex count, defaulting
    /// new entries to unselected.
    pub(crate) fn ensure_selection_len(&mut self) {
        if self.vertex_selected.len() != self.vertices.len() {
            self.vertex_selected.resize(self.vertices.len(), false);
        }
    }

    // ==================== Topology cache ====================

    /// Get the topology adapter for the current face list, rebuilding it if
    /// the cached one is missing or was built in the other mode.
    pub fn topology(&mut self, triangulated: bool) -> &Topology {
        self.ensure_topology(triangulated);
        self.topo.as_ref().unwrap()
    }

    pub(crate) fn ensure_topology(&mut self, triangulated: bool) {
        let stale = match &self.topo {
            Some(t) => t.is_triangulated() != triangulated,
            None => true,
        };
        if stale {
            self.topo = Some(Topology::build(
                self.vertices.len(),
                &self.faces,
                triangulated,
            ));
        }
    }

    /// Drop the cached topology adapter and raise the render-dirty flag.
    ///
    /// Single funnel for geometry mutation: every mutator must call this so
    /// topology-dependent consumers never observe a stale adapter.
    pub(crate) fn invalidate(&mut self) {
        self.topo = None;
        self.render_dirty = true;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// A unit cube as six outward-wound quads.
    pub(crate) fn unit_cube() -> PolyMesh {
        let mut mesh = PolyMesh::new();
        let corners = [
            [0.0, 0.0, 0.0],
            [1.0, 0.0, 0.0],
            [1.0, 1.0, 0.0],
            [0.0, 1.0, 0.0],
            [0.0, 0.0, 1.0],
            [1.0, 0.0, 1.0],
            [1.0, 1.0, 1.0],
            [0.0, 1.0, 1.0],
        ];
        for c in corners {
            mesh.add_vertex(Point3::new(c[0], c[1], c[2]));
        }
        let quads = [
            [0, 3, 2, 1], // bottom
            [4, 5, 6, 7], // top
            [0, 1, 5, 4], // front
            [2, 3, 7, 6], // back
            [0, 4, 7, 3], // left
            [1, 2, 6, 5], // right
        ];
        for q in quads {
            mesh.add_face(Face::new(q)).unwrap();
        }
        mesh.ensure_selection_len();
        mesh.update_normals();
        mesh.update_bounding_box();
        mesh
    }

    #[test]
    fn test_bounding_box_cube() {
        let mesh = unit_cube();
        let (min, max) = mesh.bounding_box();
        assert_eq!(min, Point3::new(0.0, 0.0, 0.0));
        assert_eq!(max, Point3::new(1.0, 1.0, 1.0));
    }

    #[test]
    fn test_bounding_box_empty_and_single_point() {
        let mut mesh = PolyMesh::new();
        mesh.update_bounding_box();
        let (min, max) = mesh.bounding_box();
        assert_eq!(min, max);

        mesh.add_vertex(Point3::new(2.0, -1.0, 3.0));
        mesh.update_bounding_box();
        let (min, max) = mesh.bounding_box();
        assert_eq!(min, max);
        assert_eq!(min, Point3::new(2.0, -1.0, 3.0));
    }

    #[test]
    fn test_cube_face_normals_axis_aligned() {
        let mesh = unit_cube();
        let expected = [
            Vector3::new(0.0, 0.0, -1.0),
            Vector3::new(0.0, 0.0, 1.0),
            Vector3::new(0.0, -1.0, 0.0),
            Vector3::new(0.0, 1.0, 0.0),
            Vector3::new(-1.0, 0.0, 0.0),
            Vector3::new(1.0, 0.0, 0.0),
        ];
        for (n, e) in mesh.face_normals().iter().zip(expected.iter()) {
            assert!((n - e).norm() < 1e-6, "normal {n:?} != {e:?}");
            assert!((n.norm() - 1.0).abs() < 1e-6);
        }
    }

    #[test]
    fn test_vertex_normals_unit_length() {
        let mesh = unit_cube();
        assert_eq!(mesh.vertex_normals().len(), mesh.num_vertices());
        for n in mesh.vertex_normals() {
            assert!((n.norm() - 1.0).abs() < 1e-5);
        }
    }

    #[test]
    fn test_corner_normal_refs_reset() {
        let mesh = unit_cube();
        for f in mesh.faces() {
            for c in &f.corners {
                assert_eq!(c.normal, Some(c.vertex));
            }
        }
    }

    #[test]
    fn test_translate() {
        let mut mesh = unit_cube();
        mesh.translate(Vector3::new(1.0, 2.0, 3.0));
        let (min, max) = mesh.bounding_box();
        assert_eq!(min, Point3::new(1.0, 2.0, 3.0));
        assert_eq!(max, Point3::new(2.0, 3.0, 4.0));
    }

    #[test]
    fn test_scale_about_center_keeps_center() {
        let mut mesh = unit_cube();
        mesh.scale_about_center(Vector3::new(2.0, 2.0, 2.0));
        let (min, max) = mesh.bounding_box();
        assert!((min - Point3::new(-0.5, -0.5, -0.5)).norm() < 1e-6);
        assert!((max - Point3::new(1.5, 1.5, 1.5)).norm() < 1e-6);
    }

    #[test]
    fn test_normalize_model_idempotent() {
        let mut mesh = unit_cube();
        mesh.translate(Vector3::new(5.0, 0.0, 0.0));
        mesh.scale_about_center(Vector3::new(4.0, 4.0, 4.0));
        mesh.normalize_model();
        let (min, max) = mesh.bounding_box();
        let extent = max - min;
        let diag = extent.x.max(extent.y).max(extent.z);
        assert!((diag - 1.0).abs() < 1e-5);
        let center = nalgebra::center(&min, &max);
        assert!(center.coords.norm() < 1e-5);

        let before: Vec<_> = mesh.positions().to_vec();
        mesh.normalize_model();
        for (a, b) in before.iter().zip(mesh.positions()) {
            assert!((a - b).norm() < 1e-5);
        }
    }

    #[test]
    fn test_normalize_model_degenerate_noop() {
        let mut mesh = PolyMesh::new();
        mesh.add_vertex(Point3::new(3.0, 3.0, 3.0));
        mesh.update_bounding_box();
        mesh.normalize_model();
        assert_eq!(mesh.positions()[0], Point3::new(3.0, 3.0, 3.0));
    }

    #[test]
    fn test_flip_normals() {
        let mut mesh = unit_cube();
        let before: Vec<_> = mesh.face_normals().to_vec();
        mesh.flip_normals();
        for (a, b) in before.iter().zip(mesh.face_normals()) {
            assert!((a + b).norm() < 1e-6);
        }
        // Winding reversal means recomputed normals match the flipped ones.
        let flipped: Vec<_> = mesh.face_normals().to_vec();
        mesh.update_normals();
        for (a, b) in flipped.iter().zip(mesh.face_normals()) {
            assert!((a - b).norm() < 1e-6);
        }
    }

    #[test]
    fn test_clone_does_not_copy_topology() {
        let mut mesh = unit_cube();
        mesh.topology(false);
        assert!(mesh.topo.is_some());
        let copy = mesh.clone();
        assert!(copy.topo.is_none());
        assert!(copy.is_render_dirty());
        assert_eq!(copy.num_vertices(), mesh.num_vertices());
        assert_eq!(copy.num_faces(), mesh.num_faces());
    }

    #[test]
    fn test_mutation_invalidates_topology() {
        let mut mesh = unit_cube();
        mesh.topology(false);
        assert!(mesh.topo.is_some());
        mesh.translate(Vector3::new(1.0, 0.0, 0.0));
        assert!(mesh.topo.is_none());
    }

    #[test]
    fn test_topology_mode_switch_rebuilds() {
        let mut mesh = unit_cube();
        let n_poly = mesh.topology(false).num_faces();
        let n_tri = mesh.topology(true).num_faces();
        assert_eq!(n_poly, 6);
        assert_eq!(n_tri, 12);
    }

    #[test]
    fn test_add_face_validates_indices() {
        let mut mesh = PolyMesh::new();
        mesh.add_vertex(Point3::origin());
        let err = mesh.add_face(Face::new([0, 1, 2])).unwrap_err();
        assert!(matches!(err, MeshError::VertexOutOfRange { vertex: 1, .. }));
    }

    #[test]
    fn test_selection_roundtrip() {
        let mut mesh = unit_cube();
        assert!(!mesh.has_selected_vertex());
        mesh.set_selection(&[1, 5, 6]).unwrap();
        assert!(mesh.has_selected_vertex());
        assert!(mesh.is_vertex_selected(5));
        assert!(!mesh.is_vertex_selected(0));
        assert_eq!(mesh.selection(), vec![1, 5, 6]);
        assert!(mesh.set_selection(&[42]).is_err());
    }

    #[test]
    fn test_clear() {
        let mut mesh = unit_cube();
        mesh.clear();
        assert_eq!(mesh.num_vertices(), 0);
        assert_eq!(mesh.num_faces(), 0);
        assert!(mesh.materials().is_empty());
        let (min, max) = mesh.bounding_box();
        assert_eq!(min, max);
    }
}
