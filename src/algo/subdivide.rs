//! Loop subdivision for triangle meshes.
//!
//! One step of Loop's approximating scheme (Loop, 1987): every triangle is
//! split into four, new edge-point vertices are placed by a weighted
//! average of adjacent geometry, and original vertices are repositioned by
//! a valence-dependent average of their neighbors. The input mesh is not
//! modified; a new, finer store is returned.
//!
//! # Vertex rules
//!
//! - **Interior edge point**: `3/8 · (e₀ + e₁) + 1/8 · (o₀ + o₁)` where
//!   `o₀`, `o₁` are the opposite vertices of the edge's two triangles.
//! - **Boundary edge point**: the arithmetic midpoint.
//! - **Boundary vertex** (two boundary-edge neighbors): `3/4 · v + 1/8 ·
//!   (p₁ + p₂)`.
//! - **Interior vertex** of valence n: `v + β · Σ(pᵢ − v)` with `β = 3/16`
//!   for n = 3 and `β = 3/(8n)` otherwise.

use nalgebra::Point3;

use crate::error::{MeshError, Result};
use crate::mesh::{Face, PolyMesh};

/// Perform one step of Loop subdivision, producing a new mesh.
///
/// Every face of the input must be a triangle; the first non-triangle is
/// reported as [`MeshError::NotTriangular`]. The result carries the
/// source's materials and file names; its normals and bounding box are
/// recomputed before return.
///
/// For a closed manifold input the result has `4·|F|` faces and
/// `|V| + |E|` vertices.
pub fn loop_subdivide(mesh: &mut PolyMesh) -> Result<PolyMesh> {
    for (i, f) in mesh.faces().iter().enumerate() {
        if !f.is_triangle() {
            return Err(MeshError::NotTriangular { face: i });
        }
    }

    mesh.ensure_topology(true);
    let topo = mesh.topo.as_ref().unwrap();
    let nv = mesh.num_vertices();
    let ne = topo.num_edges();

    let mut out = PolyMesh::new();
    out.name = mesh.name.clone();
    out.material_file = mesh.material_file.clone();
    out.materials = mesh.materials.clone();
    out.vertices = vec![Point3::origin(); nv + ne];

    // 1 -> 4 split. Edge-point indices are the edge's synthetic index
    // offset by the original vertex count; the face rings of the adapter
    // keep vertices and edges aligned, so the two edge points adjacent to
    // corner i are edges[i] and edges[i-1].
    out.faces.reserve(topo.num_faces() * 4);
    for fid in topo.face_ids() {
        let tf = topo.face(fid);
        let (v0, v1, v2) = (
            tf.verts[0].index(),
            tf.verts[1].index(),
            tf.verts[2].index(),
        );
        let (m01, m12, m20) = (
            nv + tf.edges[0].index(),
            nv + tf.edges[1].index(),
            nv + tf.edges[2].index(),
        );
        let mat = mesh.faces[tf.store_face].material;
        out.faces.push(Face::with_material([v0, m01, m20], mat));
        out.faces.push(Face::with_material([v1, m12, m01], mat));
        out.faces.push(Face::with_material([v2, m20, m12], mat));
        out.faces.push(Face::with_material([m01, m12, m20], mat));
    }

    // Edge points.
    for eid in topo.edge_ids() {
        let edge = topo.edge(eid);
        let a = mesh.vertices[topo.store_index(edge.verts[0])];
        let b = mesh.vertices[topo.store_index(edge.verts[1])];
        let opposite = topo.opposite_verts(eid);
        out.vertices[nv + eid.index()] = if opposite.len() == 2 {
            let o0 = mesh.vertices[topo.store_index(opposite[0])];
            let o1 = mesh.vertices[topo.store_index(opposite[1])];
            Point3::from(
                (a.coords + b.coords) * (3.0 / 8.0) + (o0.coords + o1.coords) * (1.0 / 8.0),
            )
        } else {
            nalgebra::center(&a, &b)
        };
    }

    // Repositioned original vertices.
    for vid in topo.vert_ids() {
        let tv = topo.vert(vid);
        let own = mesh.vertices[tv.store_index];
        let mut neighbors: Vec<Point3<f32>> = Vec::with_capacity(tv.edges.len());
        let mut boundary: Vec<usize> = Vec::new();
        for &e in &tv.edges {
            let w = topo.other_end(e, vid);
            if topo.is_boundary_edge(e) {
                boundary.push(neighbors.len());
            }
            neighbors.push(mesh.vertices[topo.store_index(w)]);
        }

        out.vertices[tv.store_index] = if boundary.len() == 2 {
            let p1 = neighbors[boundary[0]];
            let p2 = neighbors[boundary[1]];
            Point3::from(own.coords * 0.75 + (p1.coords + p2.coords) * 0.125)
        } else if neighbors.is_empty() {
            own
        } else {
            let n = neighbors.len();
            let beta = if n == 3 { 3.0 / 16.0 } else { 3.0 / (8.0 * n as f32) };
            let mut p = own;
            for q in &neighbors {
                p += (q - own) * beta;
            }
            p
        };
    }

    out.vertex_selected = vec![false; nv + ne];
    out.update_normals();
    out.update_bounding_box();
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::topo::VertId;
    use nalgebra::Point3;

    fn tetrahedron() -> PolyMesh {
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
        mesh
    }

    fn single_triangle() -> PolyMesh {
        let mut mesh = PolyMesh::new();
        for p in [[0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [0.5, 1.0, 0.0]] {
            mesh.add_vertex(Point3::new(p[0], p[1], p[2]));
        }
        mesh.add_face(Face::new([0, 1, 2])).unwrap();
        mesh
    }

    #[test]
    fn test_closed_mesh_counts() {
        let mut mesh = tetrahedron();
        let out = loop_subdivide(&mut mesh).unwrap();
        // 4·|F| faces and |V| + |E| vertices (tetrahedron has 6 edges).
        assert_eq!(out.num_faces(), 16);
        assert_eq!(out.num_vertices(), 4 + 6);
        assert_eq!(out.face_normals().len(), 16);
        assert_eq!(out.vertex_normals().len(), 10);
    }

    #[test]
    fn test_result_stays_closed() {
        let mut mesh = tetrahedron();
        let mut out = loop_subdivide(&mut mesh).unwrap();
        let topo = out.topology(true);
        for e in topo.edge_ids() {
            assert!(!topo.is_boundary_edge(e));
        }
    }

    #[test]
    fn test_single_triangle_counts_and_midpoints() {
        let mut mesh = single_triangle();
        let out = loop_subdivide(&mut mesh).unwrap();
        assert_eq!(out.num_faces(), 4);
        assert_eq!(out.num_vertices(), 6);

        // Every edge is a boundary edge, so edge points are midpoints.
        let topo = mesh.topology(true);
        let e01 = topo.edge_between(VertId::new(0), VertId::new(1)).unwrap();
        let got = out.positions()[3 + e01.index()];
        assert!((got - Point3::new(0.5, 0.0, 0.0)).norm() < 1e-6);
    }

    #[test]
    fn test_boundary_vertex_rule() {
        let mut mesh = single_triangle();
        let out = loop_subdivide(&mut mesh).unwrap();
        // Vertex 0 has boundary neighbors 1 and 2:
        // 3/4·(0,0,0) + 1/8·((1,0,0) + (0.5,1,0)) = (0.1875, 0.125, 0).
        let got = out.positions()[0];
        assert!((got - Point3::new(0.1875, 0.125, 0.0)).norm() < 1e-6);
    }

    #[test]
    fn test_interior_edge_point_rule() {
        let mut mesh = PolyMesh::new();
        for p in [
            [0.0, 0.0, 0.0],
            [2.0, 0.0, 0.0],
            [1.0, 2.0, 0.0],
            [1.0, -2.0, 0.0],
        ] {
            mesh.add_vertex(Point3::new(p[0], p[1], p[2]));
        }
        mesh.add_face(Face::new([0, 1, 2])).unwrap();
        mesh.add_face(Face::new([1, 0, 3])).unwrap();

        let out = loop_subdivide(&mut mesh).unwrap();
        let topo = mesh.topology(true);
        let shared = topo.edge_between(VertId::new(0), VertId::new(1)).unwrap();
        // 3/8·(p0 + p1) + 1/8·(p2 + p3) = (1, 0, 0).
        let got = out.positions()[4 + shared.index()];
        assert!((got - Point3::new(1.0, 0.0, 0.0)).norm() < 1e-6);
    }

    #[test]
    fn test_interior_vertex_rule_valence_three() {
        let mut mesh = tetrahedron();
        let out = loop_subdivide(&mut mesh).unwrap();
        // Every tetrahedron vertex is interior with valence 3, so
        // v' = v + 3/16 · Σ(p − v).
        let p: Vec<Point3<f32>> = mesh.positions().to_vec();
        let beta = 3.0 / 16.0;
        let mut expected = p[0];
        for q in [p[1], p[2], p[3]] {
            expected += (q - p[0]) * beta;
        }
        assert!((out.positions()[0] - expected).norm() < 1e-6);
    }

    #[test]
    fn test_rejects_non_triangle() {
        let mut mesh = PolyMesh::new();
        for i in 0..4 {
            mesh.add_vertex(Point3::new(i as f32, 0.0, 0.0));
        }
        mesh.add_face(Face::new([0, 1, 2, 3])).unwrap();
        let err = loop_subdivide(&mut mesh).unwrap_err();
        assert!(matches!(err, MeshError::NotTriangular { face: 0 }));
    }

    #[test]
    fn test_materials_carried_over() {
        let mut mesh = tetrahedron();
        mesh.add_material(crate::mesh::Material::named("skin"));
        for f in &mut mesh.faces {
            f.material = Some(0);
        }
        mesh.set_name("tet");
        let out = loop_subdivide(&mut mesh).unwrap();
        assert_eq!(out.materials().len(), 1);
        assert_eq!(out.name(), "tet");
        for f in out.faces() {
            assert_eq!(f.material, Some(0));
        }
    }

    #[test]
    fn test_selection_cleared_on_result() {
        let mut mesh = tetrahedron();
        mesh.set_selection(&[0, 1]).unwrap();
        let out = loop_subdivide(&mut mesh).unwrap();
        assert!(!out.has_selected_vertex());
    }
}
