//! Wavefront material library (MTL) support.
//!
//! Parses the companion material files referenced by `mtllib` records.
//! Texture maps (`map_Ka`/`map_Kd`) are resolved relative to the material
//! file's directory and decoded through the `image` crate; a missing or
//! undecodable texture is logged and leaves that material textureless.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use crate::error::{MeshError, Result};
use crate::mesh::{Material, TextureImage};

/// Parse a material library file into a material table.
pub fn load<P: AsRef<Path>>(path: P) -> Result<Vec<Material>> {
    let path = path.as_ref();
    let file = File::open(path)?;
    let reader = BufReader::new(file);

    let mut materials: Vec<Material> = Vec::new();
    for (line_idx, line) in reader.lines().enumerate() {
        let line = line?;
        let line_number = line_idx + 1;
        let mut tokens = line.split_whitespace();
        let tag = match tokens.next() {
            Some(t) => t,
            None => continue,
        };
        if tag.starts_with('#') || tag.starts_with("//") {
            continue;
        }

        if tag == "newmtl" {
            let name = tokens.collect::<Vec<_>>().join(" ");
            materials.push(Material::named(name.trim()));
            continue;
        }

        let current = match materials.last_mut() {
            Some(m) => m,
            None => {
                log::warn!(
                    "{}:{line_number}: '{tag}' before any newmtl, skipped",
                    path.display()
                );
                continue;
            }
        };

        match tag {
            "Ka" => current.ambient = parse_color(&mut tokens, path, line_number)?,
            "Kd" => current.diffuse = parse_color(&mut tokens, path, line_number)?,
            "Ks" => current.specular = parse_color(&mut tokens, path, line_number)?,
            "Ns" => current.shininess = parse_f32(&mut tokens, path, line_number)?,
            "Tr" | "d" => current.transparency = parse_f32(&mut tokens, path, line_number)?,
            "r" => current.reflectance = parse_f32(&mut tokens, path, line_number)?,
            "ra" => current.refraction = parse_f32(&mut tokens, path, line_number)?,
            "sharpness" => current.glossiness = parse_f32(&mut tokens, path, line_number)?,
            "Ni" => current.refraction_index = parse_f32(&mut tokens, path, line_number)?,
            "illum" => {} // accepted, ignored
            "map_Ka" | "map_Kd" => {
                let name = match tokens.next() {
                    Some(n) => n.trim().to_string(),
                    None => {
                        return Err(MeshError::load(path, line_number, "missing texture file name"))
                    }
                };
                let tex_path = path.parent().unwrap_or(Path::new("")).join(&name);
                current.texture_file = Some(name);
                match image::open(&tex_path) {
                    Ok(img) => {
                        let rgba = img.to_rgba8();
                        current.texture = Some(TextureImage {
                            width: rgba.width(),
                            height: rgba.height(),
                            channels: 4,
                            pixels: rgba.into_raw(),
                        });
                    }
                    Err(e) => {
                        log::warn!("failed to load texture {}: {e}", tex_path.display());
                    }
                }
            }
            other => {
                log::warn!(
                    "{}:{line_number}: unknown material record '{other}', skipped",
                    path.display()
                );
            }
        }
    }

    Ok(materials)
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

fn parse_color<'a, It: Iterator<Item = &'a str>>(
    tokens: &mut It,
    path: &Path,
    line: usize,
) -> Result<nalgebra::Vector3<f32>> {
    let r = parse_f32(tokens, path, line)?;
    let g = parse_f32(tokens, path, line)?;
    let b = parse_f32(tokens, path, line)?;
    Ok(nalgebra::Vector3::new(r, g, b))
}
