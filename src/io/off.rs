//! OFF (simple polygon) format support.
//!
//! The format is a header literal `OFF`, a `vertexCount faceCount
//! edgeCount` line, `vertexCount` position lines, and `faceCount` lines of
//! `count i0 .. i(count-1)` with 0-based indices. No materials, normals, or
//! texture coordinates are carried.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use nalgebra::Point3;

use super::LoadOptions;
use crate::error::{MeshError, Result};
use crate::mesh::{Face, PolyMesh, DEFAULT_VERTEX_COLOR};

/// A whitespace token reader that tracks line numbers, so counted records
/// may wrap lines the way `fscanf`-style consumers allow.
struct Tokens<'a> {
    lines: std::str::Lines<'a>,
    current: std::str::SplitWhitespace<'a>,
    line: usize,
}

impl<'a> Tokens<'a> {
    fn new(text: &'a str) -> Self {
        Self {
            lines: text.lines(),
            current: "".split_whitespace(),
            line: 0,
        }
    }

    fn next(&mut self) -> Option<&'a str> {
        loop {
            if let Some(token) = self.current.next() {
                return Some(token);
            }
            let line = self.lines.next()?;
            self.line += 1;
            self.current = line.split_whitespace();
        }
    }

    fn line(&self) -> usize {
        self.line
    }
}

/// Load a mesh from an OFF file.
///
/// The loader applies the same ingestion post-pass as OBJ: normals are
/// computed (the format has none), selection flags and colors are reset,
/// and the bounding box is computed, with optional normalization.
pub fn load<P: AsRef<Path>>(path: P, options: &LoadOptions) -> Result<PolyMesh> {
    let path = path.as_ref();
    let text = std::fs::read_to_string(path)?;
    let mut tokens = Tokens::new(&text);

    match tokens.next() {
        Some("OFF") => {}
        _ => return Err(MeshError::load(path, tokens.line(), "missing OFF header")),
    }

    let num_vertices = parse_usize(&mut tokens, path)?;
    let num_faces = parse_usize(&mut tokens, path)?;
    let _num_edges = parse_usize(&mut tokens, path)?;

    let mut mesh = PolyMesh::new();
    mesh.set_name(
        path.file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default(),
    );

    mesh.vertices.reserve(num_vertices);
    for _ in 0..num_vertices {
        let x = parse_f32(&mut tokens, path)?;
        let y = parse_f32(&mut tokens, path)?;
        let z = parse_f32(&mut tokens, path)?;
        mesh.vertices.push(Point3::new(x, y, z));
    }

    mesh.faces.reserve(num_faces);
    for _ in 0..num_faces {
        let count = parse_usize(&mut tokens, path)?;
        if count < 3 {
            return Err(MeshError::load(
                path,
                tokens.line(),
                format!("face has {count} corners, need at least 3"),
            ));
        }
        let mut face = Face::default();
        for _ in 0..count {
            let index = parse_usize(&mut tokens, path)?;
            if index >= num_vertices {
                return Err(MeshError::load(
                    path,
                    tokens.line(),
                    format!("vertex index {index} out of range"),
                ));
            }
            face.corners.push(crate::mesh::Corner::new(index));
        }
        mesh.faces.push(face);
    }

    mesh.update_normals();
    mesh.vertex_selected = vec![false; mesh.vertices.len()];
    mesh.vertex_colors = vec![DEFAULT_VERTEX_COLOR; mesh.vertices.len()];
    mesh.update_bounding_box();
    if options.normalize {
        mesh.normalize_model();
    }
    Ok(mesh)
}

/// Save a mesh to an OFF file.
///
/// The edge count in the header is the number of unique endpoint pairs in
/// the face list. Materials, normals, and texture coordinates are not
/// representable and are dropped.
pub fn save<P: AsRef<Path>>(mesh: &PolyMesh, path: P) -> Result<()> {
    let path = path.as_ref();
    let file = File::create(path)?;
    let mut w = BufWriter::new(file);

    let mut edges = std::collections::HashSet::new();
    for face in mesh.faces() {
        let n = face.vertex_count();
        for i in 0..n {
            let a = face.vertex(i);
            let b = face.vertex((i + 1) % n);
            edges.insert(if a < b { (a, b) } else { (b, a) });
        }
    }

    writeln!(w, "OFF")?;
    writeln!(w, "{} {} {}", mesh.num_vertices(), mesh.num_faces(), edges.len())?;
    for v in mesh.positions() {
        writeln!(w, "{:.6} {:.6} {:.6}", v.x, v.y, v.z)?;
    }
    for face in mesh.faces() {
        write!(w, "{}", face.vertex_count())?;
        for v in face.vertices() {
            write!(w, " {v}")?;
        }
        writeln!(w)?;
    }

    w.flush()?;
    Ok(())
}

fn parse_f32(tokens: &mut Tokens<'_>, path: &Path) -> Result<f32> {
    let line = tokens.line();
    let token = tokens
        .next()
        .ok_or_else(|| MeshError::load(path, line, "unexpected end of file"))?;
    token
        .parse::<f32>()
        .map_err(|_| MeshError::load(path, tokens.line(), format!("invalid number '{token}'")))
}

fn parse_usize(tokens: &mut Tokens<'_>, path: &Path) -> Result<usize> {
    let line = tokens.line();
    let token = tokens
        .next()
        .ok_or_else(|| MeshError::load(path, line, "unexpected end of file"))?;
    token
        .parse::<usize>()
        .map_err(|_| MeshError::load(path, tokens.line(), format!("invalid integer '{token}'")))
}
