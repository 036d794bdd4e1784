//! Emitter geometry: where particles are born

use crate::rand::ParticleRng;
use ember_core::{Rect, Vec2};

/// Horizontal placement of the emitter zone within a host element.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum HAlign {
    Left,
    Center,
    Right,
    /// Span the element's full width.
    Fill,
}

/// Vertical placement of the emitter zone within a host element.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum VAlign {
    Top,
    Center,
    Bottom,
    /// Span the element's full height.
    Fill,
}

/// Where, within a host element's rectangle, particles appear.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Anchor {
    pub h: HAlign,
    pub v: VAlign,
}

impl Anchor {
    pub const CENTER: Self = Self {
        h: HAlign::Center,
        v: VAlign::Center,
    };
    pub const FILL: Self = Self {
        h: HAlign::Fill,
        v: VAlign::Fill,
    };

    pub const fn new(h: HAlign, v: VAlign) -> Self {
        Self { h, v }
    }
}

impl Default for Anchor {
    fn default() -> Self {
        Self::CENTER
    }
}

/// An axis-aligned sampling region in surface-local coordinates.
/// Equal bounds collapse to a fixed point.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct EmitterZone {
    pub x_min: f32,
    pub x_max: f32,
    pub y_min: f32,
    pub y_max: f32,
}

impl EmitterZone {
    pub fn point(x: f32, y: f32) -> Self {
        Self {
            x_min: x,
            x_max: x,
            y_min: y,
            y_max: y,
        }
    }

    /// Emitter zone for a host element, aligned per `anchor` and translated
    /// from screen coordinates into surface-local ones.
    pub fn from_element(element: Rect, anchor: Anchor, surface_origin: Vec2) -> Self {
        let left = element.x - surface_origin.x;
        let right = left + element.width;
        let top = element.y - surface_origin.y;
        let bottom = top + element.height;

        let (x_min, x_max) = match anchor.h {
            HAlign::Left => (left, left),
            HAlign::Right => (right, right),
            HAlign::Center => {
                let center = left + element.width / 2.0;
                (center, center)
            }
            HAlign::Fill => (left, right),
        };
        let (y_min, y_max) = match anchor.v {
            VAlign::Top => (top, top),
            VAlign::Bottom => (bottom, bottom),
            VAlign::Center => {
                let center = top + element.height / 2.0;
                (center, center)
            }
            VAlign::Fill => (top, bottom),
        };
        Self {
            x_min,
            x_max,
            y_min,
            y_max,
        }
    }

    /// Uniform sample; collapsed axes yield their fixed coordinate.
    pub fn sample(&self, rng: &mut ParticleRng) -> (f32, f32) {
        (
            sample_axis(self.x_min, self.x_max, rng),
            sample_axis(self.y_min, self.y_max, rng),
        )
    }
}

fn sample_axis(min: f32, max: f32, rng: &mut ParticleRng) -> f32 {
    if min == max {
        min
    } else {
        rng.range(min, max)
    }
}
