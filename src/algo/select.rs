//! Vertex selection over the topology adapter.
//!
//! All operations here resolve adjacency through the mesh's topology
//! adapter (polygonal mode), compute a complete new flag vector, and write
//! it back into the store wholesale. The full resync keeps the store's
//! per-vertex flags the single source of truth for selection queries.
//!
//! # Example
//!
//! ```
//! use lamina::algo::select::{select_linked_vertices, SelectMode};
//! use lamina::mesh::{Face, PolyMesh};
//! use nalgebra::Point3;
//!
//! let mut mesh = PolyMesh::new();
//! for i in 0..3 {
//!     mesh.add_vertex(Point3::new(i as f32, 0.0, 0.0));
//! }
//! mesh.add_face(Face::new([0, 1, 2])).unwrap();
//!
//! select_linked_vertices(&mut mesh, 0, SelectMode::Replace).unwrap();
//! assert_eq!(mesh.selection(), vec![0, 1, 2]);
//! ```

use std::collections::VecDeque;

use crate::error::{MeshError, Result};
use crate::mesh::PolyMesh;
use crate::topo::{Topology, VertId};

/// How a selection operation combines with the existing selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectMode {
    /// Replace the selection with exactly the operation's result.
    Replace,
    /// Add the operation's result to the selection.
    Union,
    /// Remove the operation's result from the selection.
    Remove,
}

fn check_vertex(mesh: &PolyMesh, id: usize) -> Result<()> {
    if id >= mesh.num_vertices() {
        return Err(MeshError::VertexOutOfRange {
            vertex: id,
            count: mesh.num_vertices(),
        });
    }
    Ok(())
}

/// Apply `mode` to exactly the named vertex.
pub fn select_single_vertex(mesh: &mut PolyMesh, vert_id: usize, mode: SelectMode) -> Result<()> {
    check_vertex(mesh, vert_id)?;
    mesh.ensure_selection_len();
    match mode {
        SelectMode::Replace => {
            mesh.vertex_selected.fill(false);
            mesh.vertex_selected[vert_id] = true;
        }
        SelectMode::Union => mesh.vertex_selected[vert_id] = true,
        SelectMode::Remove => mesh.vertex_selected[vert_id] = false,
    }
    mesh.render_dirty = true;
    Ok(())
}

/// Flood-fill across edge adjacency from the named vertex and apply `mode`
/// to every vertex reachable in its connected component.
pub fn select_linked_vertices(mesh: &mut PolyMesh, vert_id: usize, mode: SelectMode) -> Result<()> {
    check_vertex(mesh, vert_id)?;
    mesh.ensure_selection_len();
    mesh.ensure_topology(false);
    let topo = mesh.topo.as_ref().unwrap();

    let reached = flood(topo, vert_id);
    let mut flags = match mode {
        SelectMode::Replace => vec![false; mesh.vertex_selected.len()],
        _ => mesh.vertex_selected.clone(),
    };
    for (i, &hit) in reached.iter().enumerate() {
        if hit {
            flags[i] = mode != SelectMode::Remove;
        }
    }

    mesh.vertex_selected = flags;
    mesh.render_dirty = true;
    Ok(())
}

/// Flood-fill an enclosed patch from the named vertex.
///
/// Unlike [`select_linked_vertices`], the flood does not traverse boundary
/// edges and does not expand outward from vertices that were selected
/// before the call. A previously selected closed loop (for example one
/// drawn by chained [`select_shortest_path`] calls) therefore fences the
/// flood to the patch it encloses. Union semantics: reached vertices are
/// added to the existing selection.
pub fn select_inner_region(mesh: &mut PolyMesh, vert_id: usize) -> Result<()> {
    check_vertex(mesh, vert_id)?;
    mesh.ensure_selection_len();
    mesh.ensure_topology(false);
    let topo = mesh.topo.as_ref().unwrap();

    let prev = mesh.vertex_selected.clone();
    let mut flags = prev.clone();
    let mut seen = vec![false; topo.num_verts()];
    let mut queue = VecDeque::new();
    seen[vert_id] = true;
    flags[vert_id] = true;
    queue.push_back(VertId::new(vert_id));

    while let Some(v) = queue.pop_front() {
        // Previously selected vertices are absorbed but act as a fence.
        if prev[topo.store_index(v)] && topo.store_index(v) != vert_id {
            continue;
        }
        for &e in &topo.vert(v).edges {
            if topo.is_boundary_edge(e) {
                continue;
            }
            let w = topo.other_end(e, v);
            if !seen[w.index()] {
                seen[w.index()] = true;
                flags[topo.store_index(w)] = true;
                queue.push_back(w);
            }
        }
    }

    mesh.vertex_selected = flags;
    mesh.render_dirty = true;
    Ok(())
}

/// Select the vertices of a shortest (fewest-edges) path between two
/// vertices, added to the existing selection.
///
/// With `disable_path_intersect` set, the path may not pass through
/// vertices that were already selected before the call (the endpoints are
/// exempt), so repeated calls can chain non-crossing paths. Returns whether
/// a path was found; when none exists the selection is left unchanged.
pub fn select_shortest_path(
    mesh: &mut PolyMesh,
    vert_id_1: usize,
    vert_id_2: usize,
    disable_path_intersect: bool,
) -> Result<bool> {
    check_vertex(mesh, vert_id_1)?;
    check_vertex(mesh, vert_id_2)?;
    mesh.ensure_selection_len();

    if vert_id_1 == vert_id_2 {
        mesh.vertex_selected[vert_id_1] = true;
        mesh.render_dirty = true;
        return Ok(true);
    }

    mesh.ensure_topology(false);
    let topo = mesh.topo.as_ref().unwrap();
    let prev = &mesh.vertex_selected;

    // Unweighted BFS with predecessor tracking.
    let mut pred: Vec<Option<VertId>> = vec![None; topo.num_verts()];
    let mut seen = vec![false; topo.num_verts()];
    let mut queue = VecDeque::new();
    seen[vert_id_1] = true;
    queue.push_back(VertId::new(vert_id_1));
    let target = VertId::new(vert_id_2);
    let mut found = false;

    'bfs: while let Some(v) = queue.pop_front() {
        for w in topo.neighbors(v) {
            if seen[w.index()] {
                continue;
            }
            if disable_path_intersect && prev[topo.store_index(w)] && w != target {
                continue;
            }
            seen[w.index()] = true;
            pred[w.index()] = Some(v);
            if w == target {
                found = true;
                break 'bfs;
            }
            queue.push_back(w);
        }
    }

    if !found {
        return Ok(false);
    }

    let mut path = Vec::new();
    let mut cursor = target;
    loop {
        path.push(topo.store_index(cursor));
        match pred[cursor.index()] {
            Some(p) => cursor = p,
            None => break,
        }
    }

    for id in path {
        mesh.vertex_selected[id] = true;
    }
    mesh.render_dirty = true;
    Ok(true)
}

/// Select every vertex.
pub fn select_all(mesh: &mut PolyMesh) {
    mesh.ensure_selection_len();
    mesh.vertex_selected.fill(true);
    mesh.render_dirty = true;
}

/// Deselect every vertex.
pub fn select_none(mesh: &mut PolyMesh) {
    mesh.ensure_selection_len();
    mesh.vertex_selected.fill(false);
    mesh.render_dirty = true;
}

fn flood(topo: &Topology, start: usize) -> Vec<bool> {
    let mut seen = vec![false; topo.num_verts()];
    let mut queue = VecDeque::new();
    seen[start] = true;
    queue.push_back(VertId::new(start));
    while let Some(v) = queue.pop_front() {
        for w in topo.neighbors(v) {
            if !seen[w.index()] {
                seen[w.index()] = true;
                queue.push_back(w);
            }
        }
    }
    seen
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mesh::Face;
    use nalgebra::Point3;

    /// A closed octahedron: pole 0, equator 1..=4, pole 5.
    fn octahedron() -> PolyMesh {
        let mut mesh = PolyMesh::new();
        let positions = [
            [0.0, 0.0, 1.0],
            [1.0, 0.0, 0.0],
            [0.0, 1.0, 0.0],
            [-1.0, 0.0, 0.0],
            [0.0, -1.0, 0.0],
            [0.0, 0.0, -1.0],
        ];
        for p in positions {
            mesh.add_vertex(Point3::new(p[0], p[1], p[2]));
        }
        let faces = [
            [0, 1, 2],
            [0, 2, 3],
            [0, 3, 4],
            [0, 4, 1],
            [5, 2, 1],
            [5, 3, 2],
            [5, 4, 3],
            [5, 1, 4],
        ];
        for f in faces {
            mesh.add_face(Face::new(f)).unwrap();
        }
        mesh
    }

    /// Two disconnected triangles: vertices 0-2 and 3-5.
    fn two_islands() -> PolyMesh {
        let mut mesh = PolyMesh::new();
        for i in 0..6 {
            mesh.add_vertex(Point3::new(i as f32, 0.0, 0.0));
        }
        mesh.add_face(Face::new([0, 1, 2])).unwrap();
        mesh.add_face(Face::new([3, 4, 5])).unwrap();
        mesh
    }

    #[test]
    fn test_single_vertex_modes() {
        let mut mesh = octahedron();
        select_single_vertex(&mut mesh, 2, SelectMode::Replace).unwrap();
        assert_eq!(mesh.selection(), vec![2]);
        select_single_vertex(&mut mesh, 4, SelectMode::Union).unwrap();
        assert_eq!(mesh.selection(), vec![2, 4]);
        select_single_vertex(&mut mesh, 2, SelectMode::Remove).unwrap();
        assert_eq!(mesh.selection(), vec![4]);
    }

    #[test]
    fn test_single_vertex_out_of_range() {
        let mut mesh = octahedron();
        let err = select_single_vertex(&mut mesh, 6, SelectMode::Union).unwrap_err();
        assert!(matches!(err, MeshError::VertexOutOfRange { vertex: 6, count: 6 }));
    }

    #[test]
    fn test_flood_connected_selects_all() {
        let mut mesh = octahedron();
        for start in 0..6 {
            select_linked_vertices(&mut mesh, start, SelectMode::Replace).unwrap();
            assert_eq!(mesh.selection().len(), 6, "flood from {start}");
        }
    }

    #[test]
    fn test_flood_disconnected_stays_in_component() {
        let mut mesh = two_islands();
        select_linked_vertices(&mut mesh, 0, SelectMode::Replace).unwrap();
        assert_eq!(mesh.selection(), vec![0, 1, 2]);
        select_linked_vertices(&mut mesh, 4, SelectMode::Union).unwrap();
        assert_eq!(mesh.selection(), vec![0, 1, 2, 3, 4, 5]);
        select_linked_vertices(&mut mesh, 1, SelectMode::Remove).unwrap();
        assert_eq!(mesh.selection(), vec![3, 4, 5]);
    }

    #[test]
    fn test_inner_region_fenced_by_selected_loop() {
        let mut mesh = octahedron();
        // Pre-select the equator ring.
        mesh.set_selection(&[1, 2, 3, 4]).unwrap();
        select_inner_region(&mut mesh, 0).unwrap();
        // The north cap is selected; the fence keeps the south pole out.
        assert_eq!(mesh.selection(), vec![0, 1, 2, 3, 4]);
        assert!(!mesh.is_vertex_selected(5));
    }

    #[test]
    fn test_inner_region_without_fence_floods_component() {
        let mut mesh = octahedron();
        select_inner_region(&mut mesh, 0).unwrap();
        assert_eq!(mesh.selection().len(), 6);
    }

    #[test]
    fn test_inner_region_stops_at_boundary_edges() {
        // A single triangle: every edge is a boundary edge, so the flood
        // cannot leave the seed.
        let mut mesh = PolyMesh::new();
        for i in 0..3 {
            mesh.add_vertex(Point3::new(i as f32, 0.0, 0.0));
        }
        mesh.add_face(Face::new([0, 1, 2])).unwrap();
        select_inner_region(&mut mesh, 1).unwrap();
        assert_eq!(mesh.selection(), vec![1]);
    }

    #[test]
    fn test_shortest_path_to_self() {
        let mut mesh = octahedron();
        let found = select_shortest_path(&mut mesh, 3, 3, false).unwrap();
        assert!(found);
        assert_eq!(mesh.selection(), vec![3]);
    }

    #[test]
    fn test_shortest_path_pole_to_pole() {
        let mut mesh = octahedron();
        let found = select_shortest_path(&mut mesh, 0, 5, false).unwrap();
        assert!(found);
        let sel = mesh.selection();
        // Two hops: endpoints plus exactly one equator vertex.
        assert_eq!(sel.len(), 3);
        assert!(sel.contains(&0) && sel.contains(&5));
    }

    #[test]
    fn test_shortest_path_chaining_avoids_selection() {
        let mut mesh = octahedron();
        select_shortest_path(&mut mesh, 0, 5, false).unwrap();
        let first = mesh.selection();
        let found = select_shortest_path(&mut mesh, 0, 5, true).unwrap();
        assert!(found);
        let second = mesh.selection();
        // The second path routed through a different equator vertex.
        assert_eq!(first.len(), 3);
        assert_eq!(second.len(), 4);
    }

    #[test]
    fn test_shortest_path_unreachable() {
        let mut mesh = two_islands();
        let found = select_shortest_path(&mut mesh, 0, 5, false).unwrap();
        assert!(!found);
        assert!(!mesh.has_selected_vertex());
    }

    #[test]
    fn test_select_all_none() {
        let mut mesh = octahedron();
        select_all(&mut mesh);
        assert_eq!(mesh.selection().len(), 6);
        select_none(&mut mesh);
        assert!(!mesh.has_selected_vertex());
    }
}
