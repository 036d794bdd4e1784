//! Effect configuration: TOML parsing and the process-wide frame rate

use crate::sprite::Sprite;
use crate::system::ParticleSystem;
use ember_core::{Ease, Result};
use std::sync::atomic::{AtomicU64, Ordering};

/// Seed used when the caller does not pick one.
pub(crate) const DEFAULT_SEED: u32 = 0xDEAD_BEEF;

/// Default polling interval (~30 fps).
const DEFAULT_TICK_INTERVAL_MS: u64 = 33;

static TICK_INTERVAL_MS: AtomicU64 = AtomicU64::new(DEFAULT_TICK_INTERVAL_MS);

/// Sets the process-wide default frame rate. Systems constructed afterwards
/// pick it up; running sessions keep the interval they started with.
/// Zero is ignored.
pub fn set_default_frame_rate(fps: u32) {
    if fps == 0 {
        return;
    }
    TICK_INTERVAL_MS.store(interval_for_fps(fps), Ordering::Relaxed);
}

/// Read once at system construction, never polled.
pub(crate) fn default_tick_interval_ms() -> u64 {
    TICK_INTERVAL_MS.load(Ordering::Relaxed)
}

fn interval_for_fps(fps: u32) -> u64 {
    ((1000.0 / fps as f64).round() as u64).max(1)
}

/// Declarative effect parameters, typically parsed from a TOML table.
#[derive(Debug, Clone)]
pub struct EffectConfig {
    pub max_particles: usize,
    pub time_to_live_ms: u64,
    pub particles_per_second: u32,
    pub speed_min: f32,
    pub speed_max: f32,
    pub angle_min: i32,
    pub angle_max: i32,
    pub scale_min: f32,
    pub scale_max: f32,
    pub rotation_speed_min: f32,
    pub rotation_speed_max: f32,
    pub fade_out_ms: Option<u64>,
    pub fade_ease: Ease,
    pub seed: u32,
}

impl Default for EffectConfig {
    fn default() -> Self {
        Self {
            max_particles: 64,
            time_to_live_ms: 1500,
            particles_per_second: 20,
            speed_min: 0.05,
            speed_max: 0.15,
            angle_min: 0,
            angle_max: 360,
            scale_min: 1.0,
            scale_max: 1.0,
            rotation_speed_min: 0.0,
            rotation_speed_max: 0.0,
            fade_out_ms: None,
            fade_ease: Ease::Linear,
            seed: DEFAULT_SEED,
        }
    }
}

impl EffectConfig {
    pub fn from_toml_str(input: &str) -> Result<Self> {
        let table: toml::value::Table = toml::from_str(input)?;
        Ok(Self::from_toml(&table))
    }

    /// Parses an EffectConfig from a TOML table. Unknown keys are ignored and
    /// missing ones keep their defaults.
    pub fn from_toml(table: &toml::value::Table) -> Self {
        let mut config = Self::default();

        if let Some(v) = table.get("max_particles") {
            let n = v.as_integer().unwrap_or(config.max_particles as i64);
            config.max_particles = n.clamp(0, 10_000) as usize;
        }
        if let Some(v) = table.get("time_to_live_ms") {
            config.time_to_live_ms = toml_u64(v, config.time_to_live_ms);
        }
        if let Some(v) = table.get("particles_per_second") {
            config.particles_per_second = toml_u64(v, config.particles_per_second as u64) as u32;
        }
        if let Some(v) = table.get("speed_min") {
            config.speed_min = toml_f32(v, config.speed_min);
        }
        if let Some(v) = table.get("speed_max") {
            config.speed_max = toml_f32(v, config.speed_max);
        }
        if let Some(v) = table.get("angle_min") {
            config.angle_min = toml_i32(v, config.angle_min);
        }
        if let Some(v) = table.get("angle_max") {
            config.angle_max = toml_i32(v, config.angle_max);
        }
        if let Some(v) = table.get("scale_min") {
            config.scale_min = toml_f32(v, config.scale_min);
        }
        if let Some(v) = table.get("scale_max") {
            config.scale_max = toml_f32(v, config.scale_max);
        }
        if let Some(v) = table.get("rotation_speed_min") {
            config.rotation_speed_min = toml_f32(v, config.rotation_speed_min);
        }
        if let Some(v) = table.get("rotation_speed_max") {
            config.rotation_speed_max = toml_f32(v, config.rotation_speed_max);
        }
        if let Some(v) = table.get("fade_out_ms") {
            config.fade_out_ms = Some(toml_u64(v, 0));
        }
        if let Some(v) = table.get("fade_ease") {
            config.fade_ease = match v.as_str().unwrap_or("linear") {
                "quad_in" => Ease::QuadIn,
                "quad_out" => Ease::QuadOut,
                "quad_in_out" => Ease::QuadInOut,
                "overshoot" => Ease::Overshoot,
                _ => Ease::Linear,
            };
        }
        if let Some(v) = table.get("seed") {
            config.seed = toml_u64(v, config.seed as u64) as u32;
        }

        config
    }

    /// Builds a ready-to-launch system from these parameters.
    pub fn build(self, sprites: Vec<Sprite>) -> ParticleSystem {
        let mut system =
            ParticleSystem::from_sprites(sprites, self.max_particles, self.time_to_live_ms)
                .set_seed(self.seed)
                .set_speed_module_and_angle_range(
                    self.speed_min,
                    self.speed_max,
                    self.angle_min,
                    self.angle_max,
                )
                .set_scale_range(self.scale_min, self.scale_max)
                .set_rotation_speed_range(self.rotation_speed_min, self.rotation_speed_max);
        if let Some(fade_out_ms) = self.fade_out_ms {
            system = system.set_fade_out_with_ease(fade_out_ms, self.fade_ease);
        }
        system
    }
}

// ── TOML helpers (handle integer/float coercion) ──

fn toml_f32(v: &toml::Value, default: f32) -> f32 {
    v.as_float()
        .map(|f| f as f32)
        .or_else(|| v.as_integer().map(|i| i as f32))
        .unwrap_or(default)
}

fn toml_i32(v: &toml::Value, default: i32) -> i32 {
    v.as_integer().map(|i| i as i32).unwrap_or(default)
}

fn toml_u64(v: &toml::Value, default: u64) -> u64 {
    v.as_integer()
        .filter(|i| *i >= 0)
        .map(|i| i as u64)
        .unwrap_or(default)
}
