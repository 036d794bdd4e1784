//! Fixed-capacity particle pool: available/active partitioning

use crate::emitter::EmitterZone;
use crate::init::Initializer;
use crate::modifier::Modifier;
use crate::particle::Particle;
use crate::rand::ParticleRng;
use crate::sprite::Sprite;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex, MutexGuard};

/// Shared handle to the live particle list. The renderer locks it during its
/// paint pass; the simulation locks it while activating and advancing, so a
/// paint never observes a partially moved list.
pub type ActiveParticles = Arc<Mutex<Vec<Particle>>>;

/// Locks the live list, recovering the data if a panicking reader poisoned
/// the mutex.
pub(crate) fn lock_particles(particles: &ActiveParticles) -> MutexGuard<'_, Vec<Particle>> {
    match particles.lock() {
        Ok(guard) => guard,
        Err(poisoned) => poisoned.into_inner(),
    }
}

/// Every particle is created once, up front, and is always in exactly one of
/// the two containers: `available` recycles through pop-front/push-back, and
/// removal from `active` is swap-remove. Nothing is allocated after
/// construction; the pool size is a hard ceiling.
pub struct ParticlePool {
    available: VecDeque<Particle>,
    active: ActiveParticles,
    capacity: usize,
}

impl ParticlePool {
    pub fn new(sprites: Vec<Sprite>) -> Self {
        let capacity = sprites.len();
        let available: VecDeque<Particle> = sprites.into_iter().map(Particle::new).collect();
        Self {
            available,
            active: Arc::new(Mutex::new(Vec::with_capacity(capacity))),
            capacity,
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn available_count(&self) -> usize {
        self.available.len()
    }

    pub fn active_count(&self) -> usize {
        lock_particles(&self.active).len()
    }

    /// Clone of the shared live-list handle, for the draw surface.
    pub fn active_handle(&self) -> ActiveParticles {
        Arc::clone(&self.active)
    }

    /// Moves one particle from `available` to `active`.
    ///
    /// Precondition: `available` is non-empty — callers check before calling;
    /// an exhausted pool turns the call into a no-op rather than an error.
    /// The initializer sequence runs in registration order, then the birth
    /// position is sampled uniformly from `zone`.
    pub fn activate_one(
        &mut self,
        now_ms: u64,
        ttl_ms: u64,
        initializers: &[Initializer],
        zone: &EmitterZone,
        rng: &mut ParticleRng,
    ) {
        let Some(mut particle) = self.available.pop_front() else {
            return;
        };
        particle.reset();
        for initializer in initializers {
            initializer.init(&mut particle, rng);
        }
        let (x, y) = zone.sample(rng);
        particle.place(ttl_ms, x, y);
        particle.activate(now_ms);
        let active = Arc::clone(&self.active);
        lock_particles(&active).push(particle);
    }

    /// Advances every active particle to `now_ms`, recycling the expired.
    ///
    /// Swap-remove keeps the walk linear; the index only advances past
    /// survivors, so the swapped-in particle is visited next rather than
    /// skipped.
    pub fn advance(&mut self, now_ms: u64, modifiers: &[Modifier]) {
        let active = Arc::clone(&self.active);
        let mut active = lock_particles(&active);
        let mut i = 0;
        while i < active.len() {
            if active[i].update(now_ms, modifiers) {
                i += 1;
            } else {
                let expired = active.swap_remove(i);
                self.available.push_back(expired);
            }
        }
    }

    /// Force-returns every active particle to the pool (cancellation path).
    pub fn recycle_all(&mut self) {
        let active = Arc::clone(&self.active);
        let mut active = lock_particles(&active);
        self.available.extend(active.drain(..));
    }
}
