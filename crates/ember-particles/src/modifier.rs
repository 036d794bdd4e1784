//! Continuous per-frame attribute change as a function of particle age

use crate::particle::Particle;
use ember_core::Ease;

/// Custom hook for modifying particles beyond the built-in variants.
pub trait ModifyParticle: Send {
    fn apply(&self, particle: &mut Particle, age_ms: u64);
}

/// Computes the value an attribute should hold at a given age and writes it
/// directly; nothing is accumulated across ticks. Outside its
/// `[start_ms, end_ms]` window a modifier holds the boundary value: the start
/// value before the window opens, the end value after it closes.
pub enum Modifier {
    /// Alpha ramp across the window, e.g. 255 → 0 for a fade-out.
    Alpha {
        from: u8,
        to: u8,
        start_ms: u64,
        end_ms: u64,
        ease: Ease,
    },
    /// Scale ramp across the window.
    Scale {
        from: f32,
        to: f32,
        start_ms: u64,
        end_ms: u64,
        ease: Ease,
    },
    Custom(Box<dyn ModifyParticle>),
}

impl Modifier {
    pub fn apply(&self, particle: &mut Particle, age_ms: u64) {
        match self {
            Modifier::Alpha {
                from,
                to,
                start_ms,
                end_ms,
                ease,
            } => {
                let value = ramp(*from as f32, *to as f32, *start_ms, *end_ms, *ease, age_ms);
                particle.alpha = value.clamp(0.0, 255.0).round() as u8;
            }
            Modifier::Scale {
                from,
                to,
                start_ms,
                end_ms,
                ease,
            } => {
                particle.scale = ramp(*from, *to, *start_ms, *end_ms, *ease, age_ms);
            }
            Modifier::Custom(custom) => custom.apply(particle, age_ms),
        }
    }
}

/// Eased interpolation, clamped to the window's boundary values.
fn ramp(from: f32, to: f32, start_ms: u64, end_ms: u64, ease: Ease, age_ms: u64) -> f32 {
    if age_ms >= end_ms {
        return to;
    }
    if age_ms <= start_ms {
        return from;
    }
    let t = (age_ms - start_ms) as f32 / (end_ms - start_ms) as f32;
    from + (to - from) * ease.apply(t)
}
