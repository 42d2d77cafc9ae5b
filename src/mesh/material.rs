//! Materials and decoded texture images.

use nalgebra::Vector3;

/// A decoded texture image owned by a material.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextureImage {
    /// Raw pixel data, `width * height * channels` bytes, row-major.
    pub pixels: Vec<u8>,
    /// Image width in pixels.
    pub width: u32,
    /// Image height in pixels.
    pub height: u32,
    /// Number of channels per pixel.
    pub channels: u8,
}

/// A surface material.
///
/// Field defaults follow the common Wavefront conventions: a dim ambient
/// term, a bright diffuse term, and full opacity.
#[derive(Debug, Clone, PartialEq)]
pub struct Material {
    /// Material name, unique within a mesh's material table.
    pub name: String,
    /// Ambient reflectivity (`Ka`).
    pub ambient: Vector3<f32>,
    /// Diffuse reflectivity (`Kd`).
    pub diffuse: Vector3<f32>,
    /// Specular reflectivity (`Ks`).
    pub specular: Vector3<f32>,
    /// Specular exponent (`Ns`).
    pub shininess: f32,
    /// Opacity (`Tr`/`d`); 1.0 is fully opaque.
    pub transparency: f32,
    /// Reflectance (`r`).
    pub reflectance: f32,
    /// Refraction amount (`ra`).
    pub refraction: f32,
    /// Reflection sharpness (`sharpness`).
    pub glossiness: f32,
    /// Index of refraction (`Ni`).
    pub refraction_index: f32,
    /// Texture file name as written in the material file, if any.
    pub texture_file: Option<String>,
    /// Decoded texture image, if the file was found and decodable.
    pub texture: Option<TextureImage>,
}

impl Default for Material {
    fn default() -> Self {
        Self {
            name: String::from("default"),
            ambient: Vector3::new(0.2, 0.2, 0.2),
            diffuse: Vector3::new(0.8, 0.8, 0.8),
            specular: Vector3::new(1.0, 1.0, 1.0),
            shininess: 0.0,
            transparency: 1.0,
            reflectance: 0.0,
            refraction: 0.0,
            glossiness: 98.0,
            refraction_index: 1.0,
            texture_file: None,
            texture: None,
        }
    }
}

impl Material {
    /// Create a default-valued material with the given name.
    pub fn named<S: Into<String>>(name: S) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Whether this material carries a decoded texture.
    pub fn has_texture(&self) -> bool {
        self.texture.is_some()
    }
}
