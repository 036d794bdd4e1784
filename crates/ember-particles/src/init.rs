//! One-time randomized particle setup at activation

use crate::particle::Particle;
use crate::rand::ParticleRng;

/// Custom hook for initializing particles beyond the built-in variants.
pub trait InitializeParticle: Send {
    fn init(&self, particle: &mut Particle, rng: &mut ParticleRng);
}

/// A single randomized setup rule, applied once when a particle activates.
///
/// The configured sequence runs in registration order; later rules may rely
/// on fields earlier ones have already set. Angles are in degrees, 0° pointing
/// right and increasing clockwise (y grows downward on a surface).
pub enum Initializer {
    /// Polar velocity: uniform speed (units/ms) across a uniform angle arc.
    /// Angle bounds must satisfy `max >= min`; the configuration surface
    /// normalizes wrap-around ranges before constructing this.
    SpeedModuleAndAngle {
        min_speed: f32,
        max_speed: f32,
        min_angle: i32,
        max_angle: i32,
    },
    /// Independent per-axis velocity components, units/ms.
    SpeedByComponents {
        min_x: f32,
        max_x: f32,
        min_y: f32,
        max_y: f32,
    },
    /// Initial tilt in degrees.
    Rotation { min_deg: i32, max_deg: i32 },
    /// Degrees per second; negative spins counter-clockwise.
    RotationSpeed { min: f32, max: f32 },
    Scale { min: f32, max: f32 },
    /// Polar acceleration: magnitude (units/ms²) across an angle arc.
    Acceleration {
        min_value: f32,
        max_value: f32,
        min_angle: i32,
        max_angle: i32,
    },
    Custom(Box<dyn InitializeParticle>),
}

impl Initializer {
    pub fn init(&self, particle: &mut Particle, rng: &mut ParticleRng) {
        match self {
            Initializer::SpeedModuleAndAngle {
                min_speed,
                max_speed,
                min_angle,
                max_angle,
            } => {
                let speed = rng.range(*min_speed, *max_speed);
                let radians = (rng.range_i32(*min_angle, *max_angle) as f32).to_radians();
                particle.speed_x = speed * radians.cos();
                particle.speed_y = speed * radians.sin();
            }
            Initializer::SpeedByComponents {
                min_x,
                max_x,
                min_y,
                max_y,
            } => {
                particle.speed_x = rng.range(*min_x, *max_x);
                particle.speed_y = rng.range(*min_y, *max_y);
            }
            Initializer::Rotation { min_deg, max_deg } => {
                particle.rotation = rng.range_i32(*min_deg, *max_deg) as f32;
            }
            Initializer::RotationSpeed { min, max } => {
                particle.rotation_speed = rng.range(*min, *max);
            }
            Initializer::Scale { min, max } => {
                particle.scale = rng.range(*min, *max);
            }
            Initializer::Acceleration {
                min_value,
                max_value,
                min_angle,
                max_angle,
            } => {
                let value = rng.range(*min_value, *max_value);
                let radians = (rng.range_i32(*min_angle, *max_angle) as f32).to_radians();
                particle.accel_x = value * radians.cos();
                particle.accel_y = value * radians.sin();
            }
            Initializer::Custom(custom) => custom.init(particle, rng),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sprite::{Sprite, Texture};

    fn test_particle() -> Particle {
        Particle::new(Sprite::Static(Texture::new("spark", 8, 8)))
    }

    #[test]
    fn fixed_angle_resolves_to_axis_components() {
        let right = Initializer::SpeedModuleAndAngle {
            min_speed: 0.5,
            max_speed: 0.5,
            min_angle: 0,
            max_angle: 0,
        };
        let mut p = test_particle();
        let mut rng = ParticleRng::new(3);
        right.init(&mut p, &mut rng);
        assert!((p.speed_x - 0.5).abs() < 1e-4);
        assert!(p.speed_y.abs() < 1e-4);

        let down = Initializer::SpeedModuleAndAngle {
            min_speed: 0.5,
            max_speed: 0.5,
            min_angle: 90,
            max_angle: 90,
        };
        down.init(&mut p, &mut rng);
        assert!(p.speed_x.abs() < 1e-4);
        assert!((p.speed_y - 0.5).abs() < 1e-4);
    }

    #[test]
    fn wrapped_arc_stays_off_the_forbidden_side() {
        // 270..450 is the arc through 0°: speeds must never point left
        let upish = Initializer::SpeedModuleAndAngle {
            min_speed: 1.0,
            max_speed: 1.0,
            min_angle: 270,
            max_angle: 450,
        };
        let mut rng = ParticleRng::new(21);
        for _ in 0..500 {
            let mut p = test_particle();
            upish.init(&mut p, &mut rng);
            assert!(p.speed_x >= -1e-4, "angle escaped the wrapped arc");
        }
    }

    #[test]
    fn component_speeds_respect_their_bounds() {
        let drift = Initializer::SpeedByComponents {
            min_x: -0.1,
            max_x: 0.1,
            min_y: 0.2,
            max_y: 0.4,
        };
        let mut rng = ParticleRng::new(8);
        for _ in 0..200 {
            let mut p = test_particle();
            drift.init(&mut p, &mut rng);
            assert!((-0.1..0.1).contains(&p.speed_x));
            assert!((0.2..0.4).contains(&p.speed_y));
        }
    }

    #[test]
    fn scale_and_rotation_initializers_write_their_fields() {
        let mut p = test_particle();
        let mut rng = ParticleRng::new(5);
        Initializer::Scale { min: 2.0, max: 2.0 }.init(&mut p, &mut rng);
        Initializer::Rotation {
            min_deg: 45,
            max_deg: 45,
        }
        .init(&mut p, &mut rng);
        Initializer::RotationSpeed {
            min: -90.0,
            max: -90.0,
        }
        .init(&mut p, &mut rng);
        assert_eq!(p.scale, 2.0);
        assert_eq!(p.rotation, 45.0);
        assert_eq!(p.rotation_speed, -90.0);
    }

    #[test]
    fn acceleration_points_along_its_angle() {
        let gravity = Initializer::Acceleration {
            min_value: 0.0002,
            max_value: 0.0002,
            min_angle: 90,
            max_angle: 90,
        };
        let mut p = test_particle();
        let mut rng = ParticleRng::new(13);
        gravity.init(&mut p, &mut rng);
        assert!(p.accel_x.abs() < 1e-6);
        assert!((p.accel_y - 0.0002).abs() < 1e-6);
    }

    #[test]
    fn custom_initializer_runs_in_sequence() {
        struct Dim;
        impl InitializeParticle for Dim {
            fn init(&self, particle: &mut Particle, _rng: &mut ParticleRng) {
                particle.alpha = 128;
            }
        }
        let mut p = test_particle();
        let mut rng = ParticleRng::new(1);
        let pipeline = vec![
            Initializer::Scale { min: 3.0, max: 3.0 },
            Initializer::Custom(Box::new(Dim)),
        ];
        for initializer in &pipeline {
            initializer.init(&mut p, &mut rng);
        }
        assert_eq!(p.scale, 3.0);
        assert_eq!(p.alpha, 128);
    }
}
