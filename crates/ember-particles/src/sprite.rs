//! Drawable sprite handles and their resolution

use crate::rand::ParticleRng;
use ember_core::{EmberError, Result};

/// Opaque drawable handle. The renderer owns the pixel data; the simulation
/// only needs a stable identity and the dimensions used for centering.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Texture {
    pub id: String,
    pub width: u32,
    pub height: u32,
}

impl Texture {
    pub fn new(id: impl Into<String>, width: u32, height: u32) -> Self {
        Self {
            id: id.into(),
            width,
            height,
        }
    }
}

/// A particle's visual: a single texture or a looping frame sequence.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Sprite {
    Static(Texture),
    Animated {
        frames: Vec<Texture>,
        /// How long each frame is shown, in milliseconds.
        frame_duration_ms: u32,
    },
}

impl Sprite {
    /// Pixel size used for centering the particle on its birth point.
    /// Frames of an animated sprite share dimensions, so the first one wins.
    pub fn size(&self) -> (u32, u32) {
        match self {
            Sprite::Static(texture) => (texture.width, texture.height),
            Sprite::Animated { frames, .. } => frames
                .first()
                .map(|t| (t.width, t.height))
                .unwrap_or((0, 0)),
        }
    }

    pub fn frame_count(&self) -> usize {
        match self {
            Sprite::Static(_) => 1,
            Sprite::Animated { frames, .. } => frames.len(),
        }
    }
}

/// Resolves visual asset identifiers into drawable sprites.
///
/// Resolution happens once, when a particle system is constructed; a failed
/// lookup is fatal before any emission starts.
pub trait SpriteSource {
    fn resolve(&self, id: &str) -> Result<Sprite>;
}

/// Resolves `ids` and spreads them across `max_particles` pool slots:
/// the list is replicated round-robin up to the pool size, then shuffled so
/// neighboring slots do not share a texture.
pub fn resolve_pool_sprites(
    source: &dyn SpriteSource,
    ids: &[&str],
    max_particles: usize,
    rng: &mut ParticleRng,
) -> Result<Vec<Sprite>> {
    if ids.is_empty() {
        return Err(EmberError::SpriteError(
            "no sprite identifiers given".into(),
        ));
    }
    let mut base = Vec::with_capacity(ids.len());
    for id in ids {
        base.push(source.resolve(id)?);
    }
    let mut sprites = Vec::with_capacity(max_particles);
    for i in 0..max_particles {
        sprites.push(base[i % base.len()].clone());
    }
    shuffle(&mut sprites, rng);
    Ok(sprites)
}

/// Fisher-Yates, driven by the system's own deterministic rng.
fn shuffle(sprites: &mut [Sprite], rng: &mut ParticleRng) {
    for i in (1..sprites.len()).rev() {
        let j = rng.below(i as u32 + 1) as usize;
        sprites.swap(i, j);
    }
}
