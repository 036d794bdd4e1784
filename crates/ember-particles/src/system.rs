//! Fluent configuration facade for launching particle effects

use crate::config;
use crate::emitter::{Anchor, EmitterZone};
use crate::init::Initializer;
use crate::modifier::Modifier;
use crate::pool::ParticlePool;
use crate::rand::ParticleRng;
use crate::render::DrawSurface;
use crate::scheduler::EmissionSchedule;
use crate::session::{EmissionHandle, SessionPhase, SessionState};
use crate::sprite::{resolve_pool_sprites, Sprite, SpriteSource};
use ember_core::{Ease, Rect, Result, Vec2};

/// Builds one particle effect: pool size, sprite set, lifetime, the
/// initializer/modifier pipelines, and the driver parameters. Launching an
/// emission consumes the system and returns a running [`EmissionHandle`];
/// a fresh system is built for each session.
///
/// Speeds are in surface units per millisecond, accelerations per square
/// millisecond, angles in degrees (0° right, clockwise).
pub struct ParticleSystem {
    max_particles: usize,
    ttl_ms: u64,
    sprites: Vec<Sprite>,
    initializers: Vec<Initializer>,
    modifiers: Vec<Modifier>,
    tick_interval_ms: u64,
    start_ms: u64,
    surface_origin: Vec2,
    surface: Option<Box<dyn DrawSurface>>,
    rng: ParticleRng,
}

impl ParticleSystem {
    /// Resolves `sprite_ids` through `source` and spreads them across the
    /// pool slots. Fails fast if any identifier cannot be resolved: every
    /// particle needs a valid sprite before emission may start.
    pub fn new(
        source: &dyn SpriteSource,
        sprite_ids: &[&str],
        max_particles: usize,
        ttl_ms: u64,
    ) -> Result<Self> {
        Self::with_seed(source, sprite_ids, max_particles, ttl_ms, config::DEFAULT_SEED)
    }

    /// Like [`ParticleSystem::new`] with an explicit seed, for reproducible
    /// effects.
    pub fn with_seed(
        source: &dyn SpriteSource,
        sprite_ids: &[&str],
        max_particles: usize,
        ttl_ms: u64,
        seed: u32,
    ) -> Result<Self> {
        let mut rng = ParticleRng::new(seed);
        let sprites = resolve_pool_sprites(source, sprite_ids, max_particles, &mut rng)?;
        Ok(Self::build(sprites, ttl_ms, rng))
    }

    /// Builds a system from already-resolved sprites, replicating them
    /// round-robin up to `max_particles`. An empty sprite list yields an
    /// empty pool, which silently emits nothing.
    pub fn from_sprites(sprites: Vec<Sprite>, max_particles: usize, ttl_ms: u64) -> Self {
        let base = sprites;
        let mut sprites = Vec::with_capacity(max_particles);
        if !base.is_empty() {
            for i in 0..max_particles {
                sprites.push(base[i % base.len()].clone());
            }
        }
        Self::build(sprites, ttl_ms, ParticleRng::new(config::DEFAULT_SEED))
    }

    fn build(sprites: Vec<Sprite>, ttl_ms: u64, rng: ParticleRng) -> Self {
        Self {
            max_particles: sprites.len(),
            ttl_ms,
            sprites,
            initializers: Vec::new(),
            modifiers: Vec::new(),
            tick_interval_ms: config::default_tick_interval_ms(),
            start_ms: 0,
            surface_origin: Vec2::ZERO,
            surface: None,
            rng,
        }
    }

    // ── Initializer configuration ──

    /// Uniform speed across the full circle.
    pub fn set_speed_range(self, min_speed: f32, max_speed: f32) -> Self {
        self.push_initializer(Initializer::SpeedModuleAndAngle {
            min_speed,
            max_speed,
            min_angle: 0,
            max_angle: 360,
        })
    }

    /// Uniform speed across an angle arc. A range with `max < min` means the
    /// arc that wraps through 0°: 270→90 sweeps over the top, never the
    /// reversed direct arc.
    pub fn set_speed_module_and_angle_range(
        self,
        min_speed: f32,
        max_speed: f32,
        min_angle: i32,
        mut max_angle: i32,
    ) -> Self {
        while max_angle < min_angle {
            max_angle += 360;
        }
        self.push_initializer(Initializer::SpeedModuleAndAngle {
            min_speed,
            max_speed,
            min_angle,
            max_angle,
        })
    }

    pub fn set_speed_by_components_range(
        self,
        min_x: f32,
        max_x: f32,
        min_y: f32,
        max_y: f32,
    ) -> Self {
        self.push_initializer(Initializer::SpeedByComponents {
            min_x,
            max_x,
            min_y,
            max_y,
        })
    }

    pub fn set_initial_rotation_range(self, min_deg: i32, max_deg: i32) -> Self {
        self.push_initializer(Initializer::Rotation { min_deg, max_deg })
    }

    pub fn set_scale_range(self, min: f32, max: f32) -> Self {
        self.push_initializer(Initializer::Scale { min, max })
    }

    /// Fixed rotation speed in degrees per second.
    pub fn set_rotation_speed(self, speed: f32) -> Self {
        self.push_initializer(Initializer::RotationSpeed {
            min: speed,
            max: speed,
        })
    }

    pub fn set_rotation_speed_range(self, min: f32, max: f32) -> Self {
        self.push_initializer(Initializer::RotationSpeed { min, max })
    }

    /// Fixed acceleration magnitude along a fixed direction angle.
    pub fn set_acceleration(self, value: f32, angle: i32) -> Self {
        self.push_initializer(Initializer::Acceleration {
            min_value: value,
            max_value: value,
            min_angle: angle,
            max_angle: angle,
        })
    }

    pub fn set_acceleration_module_and_angle_range(
        self,
        min_value: f32,
        max_value: f32,
        min_angle: i32,
        max_angle: i32,
    ) -> Self {
        self.push_initializer(Initializer::Acceleration {
            min_value,
            max_value,
            min_angle,
            max_angle,
        })
    }

    pub fn add_initializer(self, initializer: Initializer) -> Self {
        self.push_initializer(initializer)
    }

    fn push_initializer(mut self, initializer: Initializer) -> Self {
        self.initializers.push(initializer);
        self
    }

    // ── Modifier configuration ──

    /// Fades particles out over the last `fade_out_ms` of their lifetime.
    pub fn set_fade_out(self, fade_out_ms: u64) -> Self {
        self.set_fade_out_with_ease(fade_out_ms, Ease::Linear)
    }

    pub fn set_fade_out_with_ease(mut self, fade_out_ms: u64, ease: Ease) -> Self {
        let start_ms = self.ttl_ms.saturating_sub(fade_out_ms);
        self.modifiers.push(Modifier::Alpha {
            from: 255,
            to: 0,
            start_ms,
            end_ms: self.ttl_ms,
            ease,
        });
        self
    }

    /// Modifiers run in registration order every tick; a later modifier
    /// targeting the same attribute wins.
    pub fn add_modifier(mut self, modifier: Modifier) -> Self {
        self.modifiers.push(modifier);
        self
    }

    // ── Session parameters ──

    /// Starts the session's clock at `start_ms` instead of zero. The visible
    /// population is caught up by a bounded replay before the first live tick.
    pub fn set_start_time(mut self, start_ms: u64) -> Self {
        self.start_ms = start_ms;
        self
    }

    /// Overrides the polling interval for this system only; the default comes
    /// from the process-wide frame rate, read once at construction.
    pub fn set_tick_interval(mut self, interval_ms: u64) -> Self {
        self.tick_interval_ms = interval_ms.max(1);
        self
    }

    pub fn set_seed(mut self, seed: u32) -> Self {
        self.rng = ParticleRng::new(seed);
        self
    }

    /// Screen-space offset of the draw surface's origin; emitter coordinates
    /// are translated by it into surface-local space.
    pub fn set_surface_origin(mut self, origin: Vec2) -> Self {
        self.surface_origin = origin;
        self
    }

    pub fn set_draw_surface(mut self, surface: Box<dyn DrawSurface>) -> Self {
        self.surface = Some(surface);
        self
    }

    // ── Emission entry points ──

    /// Open-ended emission from a screen-space point, until cancelled or
    /// stopped.
    pub fn emit_at(self, x: f32, y: f32, particles_per_second: u32) -> EmissionHandle {
        let zone = EmitterZone::point(x - self.surface_origin.x, y - self.surface_origin.y);
        self.launch_unbounded(zone, particles_per_second)
    }

    /// Open-ended emission anchored on a host element.
    pub fn emit_from(
        self,
        element: Rect,
        anchor: Anchor,
        particles_per_second: u32,
    ) -> EmissionHandle {
        let zone = EmitterZone::from_element(element, anchor, self.surface_origin);
        self.launch_unbounded(zone, particles_per_second)
    }

    /// Emission from a point for `emitting_ms`, then a drain until the last
    /// particle expires.
    pub fn emit_at_for(
        self,
        x: f32,
        y: f32,
        particles_per_second: u32,
        emitting_ms: u64,
    ) -> EmissionHandle {
        let zone = EmitterZone::point(x - self.surface_origin.x, y - self.surface_origin.y);
        self.launch_timed(zone, particles_per_second, emitting_ms)
    }

    /// Emission anchored on a host element for `emitting_ms`.
    pub fn emit_from_for(
        self,
        element: Rect,
        anchor: Anchor,
        particles_per_second: u32,
        emitting_ms: u64,
    ) -> EmissionHandle {
        let zone = EmitterZone::from_element(element, anchor, self.surface_origin);
        self.launch_timed(zone, particles_per_second, emitting_ms)
    }

    /// Launches `count` particles at once from the element's center; capped
    /// by the pool size, with no further activation.
    pub fn one_shot(self, element: Rect, count: u32) -> EmissionHandle {
        self.one_shot_with_ease(element, count, Ease::Linear)
    }

    pub fn one_shot_with_ease(self, element: Rect, count: u32, ease: Ease) -> EmissionHandle {
        let zone = EmitterZone::from_element(element, Anchor::CENTER, self.surface_origin);
        let ttl_ms = self.ttl_ms;
        let interval_ms = self.tick_interval_ms;
        let state = self.into_state(zone, EmissionSchedule::burst(ttl_ms));
        EmissionHandle::start_timed(state, ttl_ms, interval_ms, ease, 0, 0, count)
    }

    fn launch_unbounded(self, zone: EmitterZone, particles_per_second: u32) -> EmissionHandle {
        let interval_ms = self.tick_interval_ms;
        let start_ms = self.start_ms;
        let state = self.into_state(zone, EmissionSchedule::unbounded(particles_per_second));
        EmissionHandle::start_periodic(state, interval_ms, start_ms, particles_per_second)
    }

    fn launch_timed(
        self,
        zone: EmitterZone,
        particles_per_second: u32,
        emitting_ms: u64,
    ) -> EmissionHandle {
        let duration_ms = emitting_ms + self.ttl_ms;
        let interval_ms = self.tick_interval_ms;
        let start_ms = self.start_ms;
        let state = self.into_state(zone, EmissionSchedule::timed(particles_per_second, emitting_ms));
        EmissionHandle::start_timed(
            state,
            duration_ms,
            interval_ms,
            Ease::Linear,
            start_ms,
            particles_per_second,
            0,
        )
    }

    fn into_state(self, zone: EmitterZone, schedule: EmissionSchedule) -> SessionState {
        SessionState {
            pool: ParticlePool::new(self.sprites),
            schedule,
            initializers: self.initializers,
            modifiers: self.modifiers,
            zone,
            ttl_ms: self.ttl_ms,
            rng: self.rng,
            surface: self.surface,
            surface_origin: self.surface_origin,
            phase: SessionPhase::Emitting,
            current_ms: 0,
        }
    }

    // ── Introspection (mostly for tests and tooling) ──

    pub fn max_particles(&self) -> usize {
        self.max_particles
    }

    pub fn ttl_ms(&self) -> u64 {
        self.ttl_ms
    }

    pub fn initializer_count(&self) -> usize {
        self.initializers.len()
    }

    pub fn modifier_count(&self) -> usize {
        self.modifiers.len()
    }
}
