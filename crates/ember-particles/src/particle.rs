//! Particle entity: kinematic state and the reset/place/activate/update contract

use crate::modifier::Modifier;
use crate::sprite::Sprite;

/// One simulated visual element.
///
/// Fields are public: initializers and modifiers write them directly, and the
/// renderer reads them during its paint pass. A particle never references the
/// pool or scheduler that owns it; it is mutated from outside.
#[derive(Clone, Debug)]
pub struct Particle {
    pub sprite: Sprite,
    /// Current frame for animated sprites (always 0 for static ones).
    pub frame: usize,
    /// Current position, surface-local.
    pub x: f32,
    pub y: f32,
    pub scale: f32,
    /// 0 transparent, 255 opaque.
    pub alpha: u8,
    /// Current rotation in degrees.
    pub rotation: f32,
    /// Degrees per second, applied on top of the initial rotation.
    pub rotation_speed: f32,
    /// Velocity in surface units per millisecond.
    pub speed_x: f32,
    pub speed_y: f32,
    /// Acceleration in surface units per square millisecond.
    pub accel_x: f32,
    pub accel_y: f32,
    /// Milliseconds lived since activation.
    pub age_ms: u64,
    /// Fixed at activation; the particle expires once its age reaches it.
    pub ttl_ms: u64,
    initial_x: f32,
    initial_y: f32,
    initial_rotation: f32,
    born_ms: u64,
}

impl Particle {
    pub fn new(sprite: Sprite) -> Self {
        Self {
            sprite,
            frame: 0,
            x: 0.0,
            y: 0.0,
            scale: 1.0,
            alpha: 255,
            rotation: 0.0,
            rotation_speed: 0.0,
            speed_x: 0.0,
            speed_y: 0.0,
            accel_x: 0.0,
            accel_y: 0.0,
            age_ms: 0,
            ttl_ms: 0,
            initial_x: 0.0,
            initial_y: 0.0,
            initial_rotation: 0.0,
            born_ms: 0,
        }
    }

    /// Restores neutral attributes before the initializer pipeline runs.
    pub fn reset(&mut self) {
        self.frame = 0;
        self.scale = 1.0;
        self.alpha = 255;
        self.rotation = 0.0;
        self.rotation_speed = 0.0;
        self.speed_x = 0.0;
        self.speed_y = 0.0;
        self.accel_x = 0.0;
        self.accel_y = 0.0;
        self.age_ms = 0;
    }

    /// Fixes the lifetime and the birth position. The sampled emitter point
    /// becomes the sprite's center, so the image draws centered on it.
    pub fn place(&mut self, ttl_ms: u64, center_x: f32, center_y: f32) {
        let (w, h) = self.sprite.size();
        self.initial_x = center_x - w as f32 / 2.0;
        self.initial_y = center_y - h as f32 / 2.0;
        self.x = self.initial_x;
        self.y = self.initial_y;
        self.ttl_ms = ttl_ms;
    }

    /// Stamps the activation time; ages are measured from it. A particle born
    /// mid-tick carries that offset so later ticks subtract it.
    pub fn activate(&mut self, born_ms: u64) {
        self.born_ms = born_ms;
        self.initial_rotation = self.rotation;
        self.age_ms = 0;
    }

    /// Advances the particle to `now_ms`.
    ///
    /// Returns false once the age has reached the time-to-live; the caller
    /// recycles the particle. Otherwise position and rotation are evaluated
    /// closed-form from the age, the animation frame is advanced, and every
    /// modifier overwrites its target attribute from the age directly.
    pub fn update(&mut self, now_ms: u64, modifiers: &[Modifier]) -> bool {
        let age = now_ms.saturating_sub(self.born_ms);
        self.age_ms = age;
        if age >= self.ttl_ms {
            return false;
        }
        let t = age as f32;
        self.x = self.initial_x + self.speed_x * t + self.accel_x * t * t;
        self.y = self.initial_y + self.speed_y * t + self.accel_y * t * t;
        self.rotation = self.initial_rotation + self.rotation_speed * t / 1000.0;
        if let Sprite::Animated {
            frames,
            frame_duration_ms,
        } = &self.sprite
        {
            if !frames.is_empty() && *frame_duration_ms > 0 {
                self.frame = (age / *frame_duration_ms as u64) as usize % frames.len();
            }
        }
        for modifier in modifiers {
            modifier.apply(self, age);
        }
        true
    }

    /// A particle is alive while its age is under its time-to-live.
    pub fn is_alive(&self) -> bool {
        self.age_ms < self.ttl_ms
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sprite::Texture;

    fn test_particle(ttl_ms: u64) -> Particle {
        let mut p = Particle::new(Sprite::Static(Texture::new("spark", 10, 10)));
        p.place(ttl_ms, 100.0, 100.0);
        p.activate(0);
        p
    }

    #[test]
    fn placement_centers_the_sprite() {
        let p = test_particle(1000);
        assert_eq!(p.x, 95.0);
        assert_eq!(p.y, 95.0);
    }

    #[test]
    fn update_returns_false_exactly_at_ttl() {
        let mut p = test_particle(1000);
        assert!(p.update(999, &[]));
        assert!(!p.update(1000, &[]));
        assert!(!p.update(1001, &[]));
    }

    #[test]
    fn age_tracks_successive_updates() {
        let mut p = test_particle(1000);
        let mut last = 0;
        for now in [10, 50, 400, 999] {
            p.update(now, &[]);
            assert!(p.age_ms > last);
            last = p.age_ms;
        }
    }

    #[test]
    fn position_is_closed_form_in_age() {
        let mut p = test_particle(10_000);
        p.speed_x = 0.1;
        p.speed_y = -0.05;
        p.accel_y = 0.001;
        p.update(100, &[]);
        assert!((p.x - (95.0 + 0.1 * 100.0)).abs() < 1e-3);
        assert!((p.y - (95.0 - 0.05 * 100.0 + 0.001 * 100.0 * 100.0)).abs() < 1e-3);

        // The same age gives the same position no matter the tick cadence
        let mut q = test_particle(10_000);
        q.speed_x = 0.1;
        q.speed_y = -0.05;
        q.accel_y = 0.001;
        for now in [30, 60, 100] {
            q.update(now, &[]);
        }
        assert_eq!(p.x, q.x);
        assert_eq!(p.y, q.y);
    }

    #[test]
    fn rotation_speed_is_degrees_per_second() {
        let mut p = test_particle(10_000);
        p.rotation = 10.0;
        p.activate(0);
        p.rotation_speed = 90.0;
        p.update(2000, &[]);
        assert!((p.rotation - 190.0).abs() < 1e-3);
    }

    #[test]
    fn birth_offset_shifts_age() {
        let mut p = Particle::new(Sprite::Static(Texture::new("spark", 4, 4)));
        p.place(500, 0.0, 0.0);
        p.activate(300);
        assert!(p.update(700, &[]));
        assert_eq!(p.age_ms, 400);
        assert!(!p.update(800, &[]));
    }

    #[test]
    fn animated_frames_advance_and_loop() {
        let frames = vec![
            Texture::new("f0", 8, 8),
            Texture::new("f1", 8, 8),
            Texture::new("f2", 8, 8),
        ];
        let mut p = Particle::new(Sprite::Animated {
            frames,
            frame_duration_ms: 100,
        });
        p.place(10_000, 0.0, 0.0);
        p.activate(0);
        p.update(50, &[]);
        assert_eq!(p.frame, 0);
        p.update(150, &[]);
        assert_eq!(p.frame, 1);
        p.update(250, &[]);
        assert_eq!(p.frame, 2);
        p.update(350, &[]);
        assert_eq!(p.frame, 0);
    }
}
