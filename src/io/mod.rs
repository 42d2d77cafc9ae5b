//! Mesh file I/O.
//!
//! This module provides loading and saving of polygon meshes.
//!
//! # Supported Formats
//!
//! | Format | Extension | Load | Save | Notes |
//! |--------|-----------|------|------|-------|
//! | Wavefront OBJ | `.obj` | ✓ | ✓ | With `.mtl` material libraries |
//! | OFF | `.off` | ✓ | ✓ | Plain positions and faces |
//!
//! # Usage
//!
//! The easiest way to load and save meshes is automatic format detection:
//!
//! ```no_run
//! use lamina::io::{load, save, LoadOptions};
//!
//! let mesh = load("model.obj", &LoadOptions::default()).unwrap();
//! save(&mesh, "output.off").unwrap();
//! ```
//!
//! Format-specific entry points live in [`obj`] and [`off`].

pub mod mtl;
pub mod obj;
pub mod off;

use std::path::Path;

use crate::error::{MeshError, Result};
use crate::mesh::PolyMesh;

/// Supported mesh file formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    /// Wavefront OBJ format.
    Obj,
    /// OFF (simple polygon) format.
    Off,
}

impl Format {
    /// Detect format from a file extension.
    pub fn from_extension(ext: &str) -> Option<Format> {
        match ext.to_lowercase().as_str() {
            "obj" => Some(Format::Obj),
            "off" => Some(Format::Off),
            _ => None,
        }
    }

    /// Detect format from a file path.
    pub fn from_path<P: AsRef<Path>>(path: P) -> Option<Format> {
        path.as_ref()
            .extension()
            .and_then(|ext| ext.to_str())
            .and_then(Format::from_extension)
    }
}

/// Options controlling the ingestion post-pass.
#[derive(Debug, Clone)]
pub struct LoadOptions {
    /// Recompute normals even when the file supplies a complete set.
    pub compute_normals: bool,
    /// Normalize the model after loading (center at origin, largest
    /// bounding-box extent scaled to one).
    pub normalize: bool,
}

impl Default for LoadOptions {
    fn default() -> Self {
        Self {
            compute_normals: true,
            normalize: false,
        }
    }
}

impl LoadOptions {
    /// Create default options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set whether normals are recomputed after loading.
    pub fn compute_normals(mut self, compute: bool) -> Self {
        self.compute_normals = compute;
        self
    }

    /// Set whether the model is normalized after loading.
    pub fn normalize(mut self, normalize: bool) -> Self {
        self.normalize = normalize;
        self
    }
}

/// Load a mesh with automatic format detection from the file extension.
pub fn load<P: AsRef<Path>>(path: P, options: &LoadOptions) -> Result<PolyMesh> {
    let path = path.as_ref();
    match detect(path)? {
        Format::Obj => obj::load(path, options),
        Format::Off => off::load(path, options),
    }
}

/// Save a mesh with automatic format detection from the file extension.
pub fn save<P: AsRef<Path>>(mesh: &PolyMesh, path: P) -> Result<()> {
    let path = path.as_ref();
    match detect(path)? {
        Format::Obj => obj::save(mesh, path),
        Format::Off => off::save(mesh, path),
    }
}

fn detect(path: &Path) -> Result<Format> {
    Format::from_path(path).ok_or_else(|| MeshError::UnsupportedFormat {
        extension: path
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or("(none)")
            .to_string(),
    })
}
