//! Ember Particles - pooled 2D sprite particle simulation
//!
//! Simulates short-lived visual effects (sparks, confetti, smoke) emitted
//! from a point or area:
//! - fixed-capacity particle pool, recycled rather than reallocated
//! - composable initializer/modifier pipelines shaping motion and appearance
//! - frame-quantized emission scheduling: unbounded, timed, or one-shot burst
//! - periodic or duration-bounded eased drivers handing the live set to an
//!   external renderer every tick

pub mod config;
pub mod emitter;
pub mod init;
pub mod modifier;
pub mod particle;
pub mod pool;
pub mod rand;
pub mod render;
pub mod scheduler;
pub mod session;
pub mod sprite;
pub mod system;

pub use config::{set_default_frame_rate, EffectConfig};
pub use emitter::{Anchor, EmitterZone, HAlign, VAlign};
pub use init::{InitializeParticle, Initializer};
pub use modifier::{Modifier, ModifyParticle};
pub use particle::Particle;
pub use pool::{ActiveParticles, ParticlePool};
pub use rand::ParticleRng;
pub use render::DrawSurface;
pub use scheduler::EmissionSchedule;
pub use session::{EmissionHandle, SessionPhase};
pub use sprite::{Sprite, SpriteSource, Texture};
pub use system::ParticleSystem;
