//! Core 2-D particle network animation library.
//!
//! Main components:
//! - [`animator`] - the [`FieldAnimator`](animator::FieldAnimator) that owns a field and drives it frame by frame.
//! - [`particle`] - particles, the particle set and resize reconciliation.
//! - [`phases`] - per-frame physics phases (integrate, wrap, pointer, damping).
//! - [`render`] - the [`Canvas2d`](render::Canvas2d) drawing seam and the frame renderer.
//! - [`schedule`] - the Running/Paused frame loop and the resize debouncer.
//! - [`surface`] - logical surface size, pixel ratio and target particle count.
//! - [`pointer`] - the pointer state used for repulsion / attraction.
//! - [`config`] - field configuration, presets and JSON loading.
//! - [`error`] - configuration errors.
//! - [`types`] - shared ids and colors.

pub mod animator;
pub mod config;
pub mod error;
pub mod particle;
pub mod phases;
pub mod pointer;
pub mod render;
pub mod schedule;
pub mod surface;
pub mod types;
