//! Browser host for the particle field.
//!
//! Compiled to `wasm32`, this crate looks up a `<canvas>` by id, draws
//! the field into its 2-D context and drives it from
//! `requestAnimationFrame`. Page scripts call [`start_field`] or
//! [`start_field_with_config`] once per canvas.
//!
//! On other targets only the target-independent helpers are built.

#[cfg(target_arch = "wasm32")]
mod canvas;
#[cfg(target_arch = "wasm32")]
mod host;

#[cfg(target_arch = "wasm32")]
pub use host::{FieldHandle, start_field, start_field_with_config};

/// Builds a 64-bit RNG seed from two samples of `[0, 1)`, such as two
/// calls to `Math.random()`.
pub fn seed_from_unit_pair(hi: f64, lo: f64) -> u64 {
    const SCALE: f64 = 4_294_967_296.0; // 2^32
    let hi = (hi.clamp(0.0, 1.0) * SCALE) as u64 & 0xFFFF_FFFF;
    let lo = (lo.clamp(0.0, 1.0) * SCALE) as u64 & 0xFFFF_FFFF;
    (hi << 32) | lo
}
