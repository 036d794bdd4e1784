//! Ember Core - Foundational types for the Ember particle engine
//!
//! This crate provides the types that the other Ember crates depend on:
//! - `Vec2`, `Rect` - 2D spatial types (screen and surface coordinates)
//! - `Ease` - easing curves for time interpolation
//! - Error types and Result alias

mod ease;
mod error;
mod types;

pub use ease::Ease;
pub use error::{EmberError, Result};
pub use types::{Rect, Vec2};
