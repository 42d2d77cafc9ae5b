//! Submesh extraction by vertex subset.

use std::collections::HashMap;

use smallvec::SmallVec;

use crate::error::{MeshError, Result};
use crate::mesh::{Corner, Face, PolyMesh};

/// Extract the submesh spanned by the given vertices.
///
/// The named vertices (and their colors, when present) are copied into a
/// new store **in the given order**; a face survives iff every one of its
/// corner vertices is in the valid set, with its indices remapped. When
/// `face_map` is provided it is resized to the source face count and
/// reports, per source face, `Some(new_face_index)` or `None` for dropped
/// faces.
///
/// Out-of-range ids are a caller-contract violation reported as
/// [`MeshError::VertexOutOfRange`]. The result's materials are copied, its
/// normals and bounding box are recomputed, and its selection is cleared.
pub fn extract_submesh(
    mesh: &PolyMesh,
    valid_vertex_ids: &[usize],
    mut face_map: Option<&mut Vec<Option<usize>>>,
) -> Result<PolyMesh> {
    let mut out = PolyMesh::new();
    out.set_name(mesh.name());

    let mut old_to_new: HashMap<usize, usize> = HashMap::with_capacity(valid_vertex_ids.len());
    for (new_id, &id) in valid_vertex_ids.iter().enumerate() {
        if id >= mesh.num_vertices() {
            return Err(MeshError::VertexOutOfRange {
                vertex: id,
                count: mesh.num_vertices(),
            });
        }
        out.add_vertex(mesh.positions()[id]);
        if !mesh.vertex_colors().is_empty() {
            out.vertex_colors.push(mesh.vertex_colors()[id]);
        }
        old_to_new.insert(id, new_id);
    }

    out.materials = mesh.materials().to_vec();

    if let Some(map) = face_map.as_mut() {
        map.clear();
        map.resize(mesh.num_faces(), None);
    }
    for (fi, face) in mesh.faces().iter().enumerate() {
        let mut corners: SmallVec<[Corner; 4]> = SmallVec::with_capacity(face.vertex_count());
        let mut valid = true;
        for corner in &face.corners {
            match old_to_new.get(&corner.vertex) {
                Some(&new_id) => corners.push(Corner::new(new_id)),
                None => {
                    valid = false;
                    break;
                }
            }
        }
        if valid {
            out.faces.push(Face {
                corners,
                material: face.material,
            });
            if let Some(map) = face_map.as_mut() {
                map[fi] = Some(out.faces.len() - 1);
            }
        }
    }

    out.update_normals();
    out.update_bounding_box();
    out.vertex_selected = vec![false; out.num_vertices()];
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use nalgebra::Point3;

    /// A triangle (0,1,2) and a quad (2,3,4,5) sharing vertex 2.
    fn mixed_mesh() -> PolyMesh {
        let mut mesh = PolyMesh::new();
        let positions = [
            [0.0, 0.0, 0.0],
            [1.0, 0.0, 0.0],
            [0.5, 1.0, 0.0],
            [2.0, 1.0, 0.0],
            [2.0, 0.0, 0.0],
            [1.5, -1.0, 0.0],
        ];
        for p in positions {
            mesh.add_vertex(Point3::new(p[0], p[1], p[2]));
        }
        mesh.add_face(Face::new([0, 1, 2])).unwrap();
        mesh.add_face(Face::new([2, 3, 4, 5])).unwrap();
        mesh
    }

    #[test]
    fn test_retains_face_iff_all_corners_valid() {
        let mesh = mixed_mesh();
        let mut map = Vec::new();
        let out = extract_submesh(&mesh, &[0, 1, 2], Some(&mut map)).unwrap();
        // The triangle survives; the quad loses three corners and drops.
        assert_eq!(out.num_vertices(), 3);
        assert_eq!(out.num_faces(), 1);
        assert_eq!(out.faces()[0].vertices().collect::<Vec<_>>(), vec![0, 1, 2]);
        assert_eq!(map, vec![Some(0), None]);
    }

    #[test]
    fn test_vertex_order_is_caller_order() {
        let mesh = mixed_mesh();
        let out = extract_submesh(&mesh, &[2, 0, 1], None).unwrap();
        assert_eq!(out.positions()[0], mesh.positions()[2]);
        assert_eq!(out.positions()[1], mesh.positions()[0]);
        // Face indices remapped through the new order.
        assert_eq!(out.faces()[0].vertices().collect::<Vec<_>>(), vec![1, 2, 0]);
    }

    #[test]
    fn test_colors_copied() {
        let mut mesh = mixed_mesh();
        mesh.vertex_colors = (0..6)
            .map(|i| nalgebra::Vector3::new(i as f32, 0.0, 0.0))
            .collect();
        let out = extract_submesh(&mesh, &[5, 3], None).unwrap();
        assert_eq!(out.vertex_colors()[0].x, 5.0);
        assert_eq!(out.vertex_colors()[1].x, 3.0);
        assert_eq!(out.num_faces(), 0);
    }

    #[test]
    fn test_out_of_range_is_fatal() {
        let mesh = mixed_mesh();
        let err = extract_submesh(&mesh, &[0, 99], None).unwrap_err();
        assert!(matches!(err, MeshError::VertexOutOfRange { vertex: 99, .. }));
    }

    #[test]
    fn test_result_state_recomputed() {
        let mut mesh = mixed_mesh();
        mesh.set_selection(&[0, 1]).unwrap();
        let out = extract_submesh(&mesh, &[0, 1, 2], None).unwrap();
        assert!(!out.has_selected_vertex());
        assert_eq!(out.face_normals().len(), 1);
        let (min, max) = out.bounding_box();
        assert!(min.x <= max.x && min.y <= max.y && min.z <= max.z);
    }

    #[test]
    fn test_materials_and_refs_survive() {
        let mut mesh = mixed_mesh();
        mesh.add_material(crate::mesh::Material::named("cloth"));
        mesh.faces[0].material = Some(0);
        let out = extract_submesh(&mesh, &[0, 1, 2], None).unwrap();
        assert_eq!(out.materials().len(), 1);
        assert_eq!(out.faces()[0].material, Some(0));
    }
}
