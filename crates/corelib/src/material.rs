//! Surface description consumed by the renderer.

use crate::Vec3;
use crate::scene::TextureId;

/// Linear RGB colour.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
}

impl Color {
    pub const BLACK: Color = Color::rgb(0.0, 0.0, 0.0);
    pub const WHITE: Color = Color::rgb(1.0, 1.0, 1.0);

    pub const fn rgb(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b }
    }

    /// `0xRRGGBB`, channels mapped to [0, 1].
    pub fn from_hex(hex: u32) -> Self {
        let ch = |shift: u32| ((hex >> shift) & 0xff) as f32 / 255.0;
        Self::rgb(ch(16), ch(8), ch(0))
    }

    pub fn scaled(self, k: f32) -> Self {
        Self::rgb(self.r * k, self.g * k, self.b * k)
    }

    pub fn to_array(self) -> [f32; 3] {
        [self.r, self.g, self.b]
    }
}

impl From<Color> for Vec3 {
    fn from(c: Color) -> Self {
        Vec3::new(c.r, c.g, c.b)
    }
}

/// Lighting model.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Shading {
    /// Flat colour, ignores lights.
    Unlit,
    /// Ambient + diffuse + specular.
    Phong,
}

/// Which faces get rasterized.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Side {
    Front,
    Double,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Material {
    pub color: Color,
    pub opacity: f32,
    pub transparent: bool,
    pub shading: Shading,
    pub side: Side,
    /// Multiplied with `color` per fragment.
    pub base_color_map: Option<TextureId>,
}

impl Material {
    pub fn unlit(color: Color) -> Self {
        Self {
            color,
            opacity: 1.0,
            transparent: false,
            shading: Shading::Unlit,
            side: Side::Front,
            base_color_map: None,
        }
    }

    pub fn phong(color: Color) -> Self {
        Self {
            shading: Shading::Phong,
            ..Self::unlit(color)
        }
    }

    /// Marks the material as blended with the given opacity.
    pub fn with_opacity(mut self, opacity: f32) -> Self {
        self.opacity = opacity.clamp(0.0, 1.0);
        self.transparent = true;
        self
    }

    pub fn is_blended(&self) -> bool {
        self.transparent && self.opacity < 1.0
    }
}

impl Default for Material {
    fn default() -> Self {
        Self::phong(Color::WHITE)
    }
}
