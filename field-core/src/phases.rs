//! Per-frame physics phases for the particle field.
//!
//! One update runs, in order:
//! 1. [`integrate_phase`] - Euler step, `pos += vel` (one unit of time per frame).
//! 2. [`wrap_phase`] - particles that drift past an edge by more than the
//!    margin reappear on the opposite side.
//! 3. [`pointer_phase`] - particles near an active pointer are pushed away
//!    (or pulled in), then their velocity is clamped.
//! 4. [`damping_phase`] - all velocities decay slightly.
//!
//! [`step`] runs all four.

use glam::Vec2;

use crate::{
    config::{ATTRACT_FACTOR, DAMPING, FieldConfig, POINTER_FORCE, PointerMode, WRAP_MARGIN},
    particle::ParticleSet,
    pointer::PointerState,
    surface::Surface,
};

pub fn integrate_phase(particles: &mut ParticleSet) {
    for p in &mut particles.points {
        p.pos += p.vel;
    }
}

/// Wraps coordinates that left `[-margin, size + margin]`.
///
/// Low side: `x < -margin` moves to `w + margin`; high side:
/// `x > w + margin` moves to `-margin`. Same for `y`. After this phase
/// every particle lies inside the margin band, whatever the surface did
/// before (including a shrinking resize).
pub fn wrap_phase(particles: &mut ParticleSet, surface: &Surface) {
    let w = surface.width();
    let h = surface.height();
    for p in &mut particles.points {
        if surface.contains_with_margin(p.pos, WRAP_MARGIN) {
            continue;
        }
        if p.pos.x < -WRAP_MARGIN {
            p.pos.x = w + WRAP_MARGIN;
        } else if p.pos.x > w + WRAP_MARGIN {
            p.pos.x = -WRAP_MARGIN;
        }
        if p.pos.y < -WRAP_MARGIN {
            p.pos.y = h + WRAP_MARGIN;
        } else if p.pos.y > h + WRAP_MARGIN {
            p.pos.y = -WRAP_MARGIN;
        }
    }
}

/// Applies the pointer force to particles within `cfg.mouse_radius`.
///
/// `force = (1 - dist / radius) * 0.6`, along the normalized
/// pointer→particle vector for [`PointerMode::Repel`] and against it (at
/// half strength) for [`PointerMode::Attract`]. Affected particles get
/// each velocity component clamped to `± cfg.velocity_cap()`.
///
/// Does nothing when the pointer is inactive.
///
/// ### Returns
/// The number of particles that were inside the influence radius.
pub fn pointer_phase(
    particles: &mut ParticleSet,
    pointer: &PointerState,
    cfg: &FieldConfig,
) -> usize {
    let Some(at) = pointer.active_pos() else {
        return 0;
    };
    let radius = cfg.mouse_radius;
    if radius <= 0.0 {
        return 0;
    }

    let strength = match cfg.pointer_mode {
        PointerMode::Repel => 1.0,
        PointerMode::Attract => -ATTRACT_FACTOR,
    };
    let cap = Vec2::splat(cfg.velocity_cap().abs());

    let mut touched = 0;
    for p in &mut particles.points {
        let away = p.pos - at;
        let dist = away.length();
        if dist >= radius {
            continue;
        }
        let force = (1.0 - dist / radius) * POINTER_FORCE;
        p.vel += away.normalize_or_zero() * force * strength;
        p.vel = p.vel.max(-cap).min(cap);
        touched += 1;
    }
    touched
}

pub fn damping_phase(particles: &mut ParticleSet) {
    for p in &mut particles.points {
        p.vel *= DAMPING;
    }
}

/// Advances the field by one frame.
pub fn step(
    particles: &mut ParticleSet,
    pointer: &PointerState,
    surface: &Surface,
    cfg: &FieldConfig,
) {
    if particles.is_empty() {
        return;
    }
    integrate_phase(particles);
    wrap_phase(particles, surface);
    pointer_phase(particles, pointer, cfg);
    damping_phase(particles);
}
