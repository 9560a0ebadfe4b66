//! Field configuration, the built-in presets and JSON loading.
//!
//! A [`FieldConfig`] is fixed for the lifetime of an animator. The
//! tuning constants that are not part of it live here as `pub const`s.

use std::{fs, path::Path};

use serde::{Deserialize, Serialize};

use crate::{error::FieldError, types::Rgb};

/// Logical width of the reference resolution used for density scaling.
pub const REFERENCE_WIDTH: f32 = 1366.0;
/// Logical height of the reference resolution used for density scaling.
pub const REFERENCE_HEIGHT: f32 = 768.0;
/// Lower and upper clamp of `area / reference_area`.
pub const DENSITY_RATIO_MIN: f64 = 0.5;
pub const DENSITY_RATIO_MAX: f64 = 2.2;
/// The set is only truncated once it exceeds the target by this factor.
pub const SHRINK_HYSTERESIS: f64 = 1.4;
/// Lowest opacity a new particle can get.
pub const PARTICLE_ALPHA_MIN: f32 = 0.4;
/// How far past an edge a particle travels before it wraps.
pub const WRAP_MARGIN: f32 = 10.0;
/// Pointer force at zero distance.
pub const POINTER_FORCE: f32 = 0.6;
/// Attraction is weaker than repulsion by this factor.
pub const ATTRACT_FACTOR: f32 = 0.5;
/// Velocity components are clamped to `± VELOCITY_CAP_FACTOR * speed_range`.
pub const VELOCITY_CAP_FACTOR: f32 = 2.2;
/// Per-frame velocity multiplier.
pub const DAMPING: f32 = 0.995;
/// Halo radius is `HALO_FACTOR * mouse_radius`, capped at [`HALO_MAX_RADIUS`].
pub const HALO_FACTOR: f32 = 1.2;
pub const HALO_MAX_RADIUS: f32 = 240.0;
/// Quiet window for resize debouncing, in seconds.
pub const RESIZE_DEBOUNCE_SECS: f64 = 0.12;

/// Whether the pointer pushes particles away or pulls them in.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PointerMode {
    #[default]
    Repel,
    Attract,
}

/// Parameters of one particle field.
///
/// ### Fields
/// - `base_count` - Particle count at the reference resolution.
/// - `connect_distance` - Pairs closer than this are joined by a line.
/// - `size_min`, `size_max` - Range of particle radii.
/// - `speed_range` - Width of the initial velocity range, centred on zero.
/// - `color` - Color of particles, lines and the pointer halo.
/// - `line_alpha` - Line opacity at zero distance.
/// - `particle_alpha` - Upper bound of particle opacity.
/// - `line_width` - Stroke width of connecting lines.
/// - `mouse_radius` - Radius of pointer influence.
/// - `pointer_mode` - Repel or attract.
/// - `halo_alpha` - Opacity at the centre of the pointer halo.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FieldConfig {
    pub base_count: usize,
    pub connect_distance: f32,
    pub size_min: f32,
    pub size_max: f32,
    pub speed_range: f32,
    pub color: Rgb,
    pub line_alpha: f32,
    pub particle_alpha: f32,
    pub line_width: f32,
    pub mouse_radius: f32,
    pub pointer_mode: PointerMode,
    pub halo_alpha: f32,
}

impl Default for FieldConfig {
    fn default() -> Self {
        Preset::Hero.config()
    }
}

impl FieldConfig {
    /// Area of the reference resolution.
    pub fn reference_area() -> f64 {
        REFERENCE_WIDTH as f64 * REFERENCE_HEIGHT as f64
    }

    /// Maximum absolute value of each velocity component under pointer forces.
    pub fn velocity_cap(&self) -> f32 {
        VELOCITY_CAP_FACTOR * self.speed_range
    }

    /// Radius of the cosmetic halo drawn around the pointer.
    pub fn halo_radius(&self) -> f32 {
        (HALO_FACTOR * self.mouse_radius).min(HALO_MAX_RADIUS)
    }

    /// Checks that every value is finite and in a meaningful range.
    pub fn validate(&self) -> Result<(), FieldError> {
        let non_negative = [
            ("connect_distance", self.connect_distance),
            ("size_min", self.size_min),
            ("size_max", self.size_max),
            ("speed_range", self.speed_range),
            ("line_width", self.line_width),
            ("mouse_radius", self.mouse_radius),
        ];
        for (field, v) in non_negative {
            if !v.is_finite() {
                return Err(FieldError::Invalid {
                    field,
                    reason: "must be finite",
                });
            }
            if v < 0.0 {
                return Err(FieldError::Invalid {
                    field,
                    reason: "must not be negative",
                });
            }
        }

        let unit = [
            ("line_alpha", self.line_alpha),
            ("particle_alpha", self.particle_alpha),
            ("halo_alpha", self.halo_alpha),
        ];
        for (field, v) in unit {
            if !(0.0..=1.0).contains(&v) {
                return Err(FieldError::Invalid {
                    field,
                    reason: "must lie in [0, 1]",
                });
            }
        }

        if self.size_min > self.size_max {
            return Err(FieldError::Invalid {
                field: "size_min",
                reason: "must not exceed size_max",
            });
        }
        Ok(())
    }

    /// Parses and validates a configuration from JSON.
    ///
    /// Missing fields take their values from [`Preset::Hero`].
    pub fn from_json(json: &str) -> Result<Self, FieldError> {
        let cfg: Self = serde_json::from_str(json)?;
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn to_json(&self) -> Result<String, FieldError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Reads, parses and validates a configuration file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, FieldError> {
        let json = fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), FieldError> {
        fs::write(path, self.to_json()?)?;
        Ok(())
    }
}

/// Built-in configurations.
///
/// `Hero` is the dense, repelling field behind a landing section;
/// `Ambient` is the sparse, attracting field used as a page background.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Preset {
    #[default]
    Hero,
    Ambient,
}

impl Preset {
    pub const ALL: [Preset; 2] = [Preset::Hero, Preset::Ambient];

    pub fn name(self) -> &'static str {
        match self {
            Preset::Hero => "hero",
            Preset::Ambient => "ambient",
        }
    }

    pub fn from_name(name: &str) -> Result<Self, FieldError> {
        Self::ALL
            .into_iter()
            .find(|p| p.name().eq_ignore_ascii_case(name.trim()))
            .ok_or_else(|| FieldError::UnknownPreset(name.to_owned()))
    }

    pub fn config(self) -> FieldConfig {
        match self {
            Preset::Hero => FieldConfig {
                base_count: 60,
                connect_distance: 120.0,
                size_min: 1.0,
                size_max: 2.6,
                speed_range: 0.6,
                color: Rgb::new(100, 255, 218),
                line_alpha: 0.18,
                particle_alpha: 0.85,
                line_width: 1.0,
                mouse_radius: 140.0,
                pointer_mode: PointerMode::Repel,
                halo_alpha: 0.12,
            },
            Preset::Ambient => FieldConfig {
                base_count: 45,
                connect_distance: 110.0,
                size_min: 0.8,
                size_max: 2.0,
                speed_range: 0.4,
                color: Rgb::new(136, 146, 176),
                line_alpha: 0.12,
                particle_alpha: 0.6,
                line_width: 0.8,
                mouse_radius: 180.0,
                pointer_mode: PointerMode::Attract,
                halo_alpha: 0.08,
            },
        }
    }
}
