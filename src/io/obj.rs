//! Wavefront OBJ support.
//!
//! Line-oriented, whitespace-delimited records; the first token of a line
//! is the record tag. Supported tags: `v`, `vn`, `vt`, `f`, `usemtl`,
//! `mtllib`, and `#` comments. Unknown tags are logged and skipped.
//!
//! Face corners accept the four index forms `v`, `v/t`, `v//n`, and
//! `v/t/n`; on-disk indices are 1-based and converted on load. The writer
//! mirrors the reader: count comments, `usemtl` blocks at material-change
//! boundaries, and 1-based corner indices with optional sub-indices.

use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::Path;

use nalgebra::{Point2, Point3, Vector3};

use super::{mtl, LoadOptions};
use crate::error::{MeshError, Result};
use crate::mesh::{Corner, Face, PolyMesh, DEFAULT_VERTEX_COLOR};

/// Load a mesh from an OBJ file.
///
/// Referenced material libraries are resolved relative to the OBJ file's
/// directory; a missing library is logged and skipped rather than failing
/// the load. After parsing, normals are recomputed unless the file
/// supplied one normal per vertex and `options.compute_normals` is off;
/// selection flags and vertex colors are reset; the bounding box is
/// computed; and the model is optionally normalized.
///
/// # Example
///
/// ```no_run
/// use lamina::io::{obj, LoadOptions};
///
/// let mesh = obj::load("model.obj", &LoadOptions::default()).unwrap();
/// println!("{} vertices", mesh.num_vertices());
/// ```
pub fn load<P: AsRef<Path>>(path: P, options: &LoadOptions) -> Result<PolyMesh> {
    let path = path.as_ref();
    let file = File::open(path)?;
    let reader = BufReader::new(file);

    let mut mesh = PolyMesh::new();
    mesh.set_name(
        path.file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default(),
    );

    let mut current_material: Option<usize> = None;

    for (line_idx, line) in reader.lines().enumerate() {
        let line = line?;
        let line_number = line_idx + 1;
        let mut tokens = line.split_whitespace();
        let tag = match tokens.next() {
            Some(t) => t,
            None => continue,
        };

        match tag {
            _ if tag.starts_with('#') => {}
            "v" => {
                let x = parse_f32(&mut tokens, path, line_number)?;
                let y = parse_f32(&mut tokens, path, line_number)?;
                let z = parse_f32(&mut tokens, path, line_number)?;
                mesh.vertices.push(Point3::new(x, y, z));
            }
            "vn" => {
                let x = parse_f32(&mut tokens, path, line_number)?;
                let y = parse_f32(&mut tokens, path, line_number)?;
                let z = parse_f32(&mut tokens, path, line_number)?;
                mesh.vertex_normals.push(Vector3::new(x, y, z));
            }
            "vt" => {
                let u = parse_f32(&mut tokens, path, line_number)?;
                let v = parse_f32(&mut tokens, path, line_number)?;
                mesh.vertex_texcoords.push(Point2::new(u, v));
            }
            "f" => {
                let mut face = Face {
                    corners: Default::default(),
                    material: current_material,
                };
                for token in tokens {
                    let corner = parse_corner(token, path, line_number)?;
                    if corner.vertex >= mesh.vertices.len() {
                        return Err(MeshError::load(
                            path,
                            line_number,
                            format!("vertex index {} out of range", corner.vertex + 1),
                        ));
                    }
                    face.corners.push(corner);
                }
                if face.vertex_count() < 3 {
                    return Err(MeshError::load(
                        path,
                        line_number,
                        format!("face has {} corners, need at least 3", face.vertex_count()),
                    ));
                }
                mesh.faces.push(face);
            }
            "usemtl" => {
                let name = tokens.collect::<Vec<_>>().join(" ");
                let name = name.trim();
                current_material = mesh.materials.iter().position(|m| m.name == name);
                if current_material.is_none() {
                    log::warn!(
                        "{}:{line_number}: unknown material '{name}', using default",
                        path.display()
                    );
                }
            }
            "mtllib" => {
                let name = match tokens.next() {
                    Some(n) => n.to_string(),
                    None => {
                        return Err(MeshError::load(path, line_number, "missing library name"))
                    }
                };
                let lib_path = path.parent().unwrap_or(Path::new("")).join(&name);
                mesh.material_file = Some(name);
                match mtl::load(&lib_path) {
                    Ok(materials) => mesh.materials = materials,
                    Err(e) => log::warn!("failed to read material library: {e}"),
                }
            }
            other => {
                log::warn!(
                    "{}:{line_number}: unknown record '{other}', skipped",
                    path.display()
                );
            }
        }
    }

    if options.compute_normals || mesh.vertex_normals.len() != mesh.vertices.len() {
        mesh.update_normals();
    }
    mesh.vertex_selected = vec![false; mesh.vertices.len()];
    mesh.vertex_colors = vec![DEFAULT_VERTEX_COLOR; mesh.vertices.len()];
    mesh.update_bounding_box();
    if options.normalize {
        mesh.normalize_model();
    }
    Ok(mesh)
}

/// Save a mesh to an OBJ file.
///
/// Emits a `mtllib` line when the mesh carries materials, count comments
/// for each buffer, and a `usemtl` block whenever the material changes
/// between consecutive faces.
pub fn save<P: AsRef<Path>>(mesh: &PolyMesh, path: P) -> Result<()> {
    let path = path.as_ref();
    let file = File::create(path)?;
    let mut w = BufWriter::new(file);

    if !mesh.materials().is_empty() {
        if let Some(lib) = mesh.material_file() {
            writeln!(w, "mtllib {lib}")?;
        }
    }

    writeln!(w, "#number of vertices: {}", mesh.num_vertices())?;
    for v in mesh.positions() {
        writeln!(w, "v {:.6} {:.6} {:.6}", v.x, v.y, v.z)?;
    }
    writeln!(w, "#number of normals: {}", mesh.vertex_normals().len())?;
    for n in mesh.vertex_normals() {
        writeln!(w, "vn {:.6} {:.6} {:.6}", n.x, n.y, n.z)?;
    }
    writeln!(w, "#number of texcoords: {}", mesh.texcoords().len())?;
    for t in mesh.texcoords() {
        writeln!(w, "vt {:.6} {:.6}", t.x, t.y)?;
    }

    let mut last_material: Option<usize> = None;
    for face in mesh.faces() {
        if face.material != last_material {
            if let Some(mat) = face.material.and_then(|m| mesh.materials().get(m)) {
                writeln!(w, "usemtl {}", mat.name)?;
                last_material = face.material;
            }
        }
        write!(w, "f")?;
        for corner in &face.corners {
            write!(w, " {}/", corner.vertex + 1)?;
            if let Some(t) = corner.texture {
                if t < mesh.texcoords().len() {
                    write!(w, "{}", t + 1)?;
                }
            }
            write!(w, "/")?;
            if let Some(n) = corner.normal {
                if n < mesh.vertex_normals().len() {
                    write!(w, "{}", n + 1)?;
                }
            }
        }
        writeln!(w)?;
    }

    w.flush()?;
    Ok(())
}

fn parse_f32<'a, It: Iterator<Item = &'a str>>(
    tokens: &mut It,
    path: &Path,
    line: usize,
) -> Result<f32> {
    let token = tokens
        .next()
        .ok_or_else(|| MeshError::load(path, line, "missing numeric field"))?;
    token
        .parse::<f32>()
        .map_err(|_| MeshError::load(path, line, format!("invalid number '{token}'")))
}

/// Parse one face-corner token: `v`, `v/t`, `v//n`, or `v/t/n` (1-based).
fn parse_corner(token: &str, path: &Path, line: usize) -> Result<Corner> {
    let mut parts = token.split('/');
    let vertex = parse_index(parts.next().unwrap_or(""), path, line)?;
    let texture = match parts.next() {
        None | Some("") => None,
        Some(s) => Some(parse_index(s, path, line)?),
    };
    let normal = match parts.next() {
        None | Some("") => None,
        Some(s) => Some(parse_index(s, path, line)?),
    };
    Ok(Corner {
        vertex,
        texture,
        normal,
    })
}

fn parse_index(token: &str, path: &Path, line: usize) -> Result<usize> {
    let value: usize = token
        .parse()
        .map_err(|_| MeshError::load(path, line, format!("invalid index '{token}'")))?;
    if value == 0 {
        return Err(MeshError::load(path, line, "indices are 1-based"));
    }
    Ok(value - 1)
}
