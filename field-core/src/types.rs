use serde::{Deserialize, Serialize};

/// Identifier for a particle in a [`crate::particle::ParticleSet`].
///
/// This is an index into `ParticleSet::points`, and is only meaningful
/// until the next reconciliation truncates the set.
pub type ParticleId = usize;

/// An opaque RGB color, as stored in the configuration.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Attaches an opacity, clamped to `[0, 1]`.
    pub fn with_alpha(self, a: f32) -> Rgba {
        Rgba {
            rgb: self,
            a: a.clamp(0.0, 1.0),
        }
    }
}

/// A color with a floating-point opacity, as handed to a canvas.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Rgba {
    pub rgb: Rgb,
    pub a: f32,
}

impl Rgba {
    /// CSS `rgba(...)` notation, used by the browser canvas.
    pub fn to_css(self) -> String {
        format!(
            "rgba({}, {}, {}, {:.3})",
            self.rgb.r, self.rgb.g, self.rgb.b, self.a
        )
    }

    /// Opacity as an 8-bit channel.
    pub fn alpha_u8(self) -> u8 {
        (self.a * 255.0).round() as u8
    }
}
