use glam::Vec2;
use rand::Rng;

use crate::{
    config::{FieldConfig, PARTICLE_ALPHA_MIN, SHRINK_HYSTERESIS},
    surface::Surface,
};

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Particle {
    pub pos: Vec2,
    pub vel: Vec2,
    pub size: f32,
    pub alpha: f32,
}

/// Samples `[lo, hi]` uniformly, or returns `lo` if the range is empty
/// or degenerate.
fn uniform(rng: &mut impl Rng, lo: f32, hi: f32) -> f32 {
    if hi > lo { rng.random_range(lo..=hi) } else { lo }
}

impl Particle {
    /// Creates a particle at a random position inside `surface`, with
    /// size, velocity and opacity drawn from the configured ranges.
    pub fn random(surface: &Surface, cfg: &FieldConfig, rng: &mut impl Rng) -> Self {
        let half_speed = cfg.speed_range * 0.5;
        Self {
            pos: Vec2::new(
                uniform(rng, 0.0, surface.width()),
                uniform(rng, 0.0, surface.height()),
            ),
            vel: Vec2::new(
                uniform(rng, -half_speed, half_speed),
                uniform(rng, -half_speed, half_speed),
            ),
            size: uniform(rng, cfg.size_min, cfg.size_max),
            alpha: uniform(rng, PARTICLE_ALPHA_MIN, cfg.particle_alpha),
        }
    }
}

/// Which branch of the resize policy ran.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Reconcile {
    /// The set was empty and got exactly `target` particles.
    Filled,
    /// New particles were appended up to `target`.
    Grown,
    /// The set exceeded `target * 1.4` and was cut down to `target`.
    Truncated,
    /// The size was within `[target, target * 1.4]`.
    Unchanged,
}

/// Decides how a set of `current` particles reacts to a new `target`.
///
/// Returns the branch and the resulting length.
pub fn reconcile_len(current: usize, target: usize) -> (Reconcile, usize) {
    if current == 0 {
        (Reconcile::Filled, target)
    } else if current < target {
        (Reconcile::Grown, target)
    } else if current as f64 > target as f64 * SHRINK_HYSTERESIS {
        (Reconcile::Truncated, target)
    } else {
        (Reconcile::Unchanged, current)
    }
}

#[derive(Clone, Debug, Default)]
pub struct ParticleSet {
    pub points: Vec<Particle>,
}

impl ParticleSet {
    pub fn from_particles(points: Vec<Particle>) -> Self {
        Self { points }
    }

    pub fn random(count: usize, surface: &Surface, cfg: &FieldConfig, rng: &mut impl Rng) -> Self {
        let points = (0..count)
            .map(|_| Particle::random(surface, cfg, rng))
            .collect();
        Self { points }
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Grows, truncates or keeps the set for a new `target` count.
    ///
    /// Existing particles are never touched when growing; truncation
    /// keeps the first `target` particles.
    pub fn reconcile(
        &mut self,
        target: usize,
        surface: &Surface,
        cfg: &FieldConfig,
        rng: &mut impl Rng,
    ) -> Reconcile {
        let (outcome, len) = reconcile_len(self.points.len(), target);
        match outcome {
            Reconcile::Filled | Reconcile::Grown => {
                let missing = len - self.points.len();
                self.points.reserve(missing);
                for _ in 0..missing {
                    self.points.push(Particle::random(surface, cfg, rng));
                }
            }
            Reconcile::Truncated => self.points.truncate(len),
            Reconcile::Unchanged => {}
        }
        outcome
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{SeedableRng, rngs::SmallRng};

    fn surface() -> Surface {
        Surface {
            size: Vec2::new(800.0, 600.0),
            pixel_ratio: 1.0,
        }
    }

    fn reconciled(current: usize, target: usize) -> (Reconcile, usize) {
        let mut rng = SmallRng::seed_from_u64(7);
        let cfg = FieldConfig::default();
        let s = surface();
        let mut set = ParticleSet::random(current, &s, &cfg, &mut rng);
        let outcome = set.reconcile(target, &s, &cfg, &mut rng);
        (outcome, set.len())
    }

    #[test]
    fn empty_set_is_filled_to_target() {
        assert_eq!(reconciled(0, 60), (Reconcile::Filled, 60));
    }

    #[test]
    fn smaller_set_grows_to_target() {
        assert_eq!(reconciled(50, 60), (Reconcile::Grown, 60));
    }

    #[test]
    fn set_beyond_hysteresis_is_truncated() {
        // 90 > 1.4 * 60 = 84
        assert_eq!(reconciled(90, 60), (Reconcile::Truncated, 60));
    }

    #[test]
    fn set_inside_hysteresis_band_is_unchanged() {
        assert_eq!(reconciled(70, 60), (Reconcile::Unchanged, 70));
        assert_eq!(reconciled(84, 60), (Reconcile::Unchanged, 84));
        assert_eq!(reconciled(60, 60), (Reconcile::Unchanged, 60));
    }

    #[test]
    fn growing_keeps_existing_particles() {
        let mut rng = SmallRng::seed_from_u64(1);
        let cfg = FieldConfig::default();
        let s = surface();
        let mut set = ParticleSet::random(10, &s, &cfg, &mut rng);
        let before = set.points.clone();

        set.reconcile(25, &s, &cfg, &mut rng);

        assert_eq!(set.len(), 25);
        assert_eq!(&set.points[..10], &before[..]);
    }

    #[test]
    fn truncation_keeps_the_first_particles() {
        let mut rng = SmallRng::seed_from_u64(2);
        let cfg = FieldConfig::default();
        let s = surface();
        let mut set = ParticleSet::random(100, &s, &cfg, &mut rng);
        let before = set.points.clone();

        set.reconcile(40, &s, &cfg, &mut rng);

        assert_eq!(&set.points[..], &before[..40]);
    }

    #[test]
    fn random_particles_respect_configured_ranges() {
        let mut rng = SmallRng::seed_from_u64(3);
        let cfg = FieldConfig::default();
        let s = surface();
        let half = cfg.speed_range * 0.5;

        for p in ParticleSet::random(500, &s, &cfg, &mut rng).points {
            assert!(p.pos.x >= 0.0 && p.pos.x <= s.width());
            assert!(p.pos.y >= 0.0 && p.pos.y <= s.height());
            assert!(p.vel.x.abs() <= half && p.vel.y.abs() <= half);
            assert!(p.size >= cfg.size_min && p.size <= cfg.size_max);
            assert!(p.alpha >= PARTICLE_ALPHA_MIN && p.alpha <= cfg.particle_alpha);
        }
    }

    #[test]
    fn degenerate_ranges_use_lower_bound() {
        let mut rng = SmallRng::seed_from_u64(4);
        let mut cfg = FieldConfig::default();
        cfg.particle_alpha = 0.2; // below the 0.4 floor
        cfg.speed_range = 0.0;
        let s = Surface {
            size: Vec2::ZERO,
            pixel_ratio: 1.0,
        };

        let p = Particle::random(&s, &cfg, &mut rng);
        assert_eq!(p.pos, Vec2::ZERO);
        assert_eq!(p.vel, Vec2::ZERO);
        assert_eq!(p.alpha, PARTICLE_ALPHA_MIN);
    }
}
