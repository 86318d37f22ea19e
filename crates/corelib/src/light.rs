//! Light sources. Positions come from the owning node's transform.

use crate::material::Color;

/// Shadow map settings of a shadow-casting light.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ShadowConfig {
    pub map_width: u32,
    pub map_height: u32,
}

impl Default for ShadowConfig {
    fn default() -> Self {
        Self {
            map_width: 512,
            map_height: 512,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Light {
    /// Uniform fill, no direction.
    Ambient { color: Color, intensity: f32 },
    /// Parallel rays from the node position towards the origin.
    Directional {
        color: Color,
        intensity: f32,
        shadow: Option<ShadowConfig>,
    },
    /// Omni light at the node position.
    Point { color: Color, intensity: f32 },
}

impl Light {
    pub fn ambient(color: Color, intensity: f32) -> Self {
        Light::Ambient { color, intensity }
    }

    pub fn directional(color: Color, intensity: f32) -> Self {
        Light::Directional {
            color,
            intensity,
            shadow: None,
        }
    }

    pub fn point(color: Color, intensity: f32) -> Self {
        Light::Point { color, intensity }
    }

    /// Enables shadow casting. No-op for lights that cannot cast.
    pub fn with_shadow(mut self, config: ShadowConfig) -> Self {
        if let Light::Directional { shadow, .. } = &mut self {
            *shadow = Some(config);
        }
        self
    }

    pub fn casts_shadow(&self) -> bool {
        matches!(self, Light::Directional { shadow: Some(_), .. })
    }

    /// Colour premultiplied by intensity.
    pub fn radiance(&self) -> Color {
        match *self {
            Light::Ambient { color, intensity }
            | Light::Directional {
                color, intensity, ..
            }
            | Light::Point { color, intensity } => color.scaled(intensity),
        }
    }
}
