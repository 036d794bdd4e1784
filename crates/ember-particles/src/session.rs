//! A running emission session: phase machine, tick handling, lifecycle

use crate::emitter::{Anchor, EmitterZone};
use crate::init::Initializer;
use crate::modifier::Modifier;
use crate::pool::ParticlePool;
use crate::rand::ParticleRng;
use crate::render::DrawSurface;
use crate::scheduler::EmissionSchedule;
use ember_core::{Rect, Vec2};
use ember_runtime::{PeriodicTicker, TickOutcome, TimedAnimator};
use std::sync::{Arc, Mutex, MutexGuard};

/// Lifecycle of an emission session. `Terminal` is absorbing: a finished or
/// cancelled session cannot be restarted, a fresh one must be built.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SessionPhase {
    /// Activating new particles under the schedule's constraints.
    Emitting,
    /// No further activation; live particles keep animating until expiry.
    Draining,
    /// Surface detached, every particle back in the pool.
    Terminal,
}

pub(crate) struct SessionState {
    pub pool: ParticlePool,
    pub schedule: EmissionSchedule,
    pub initializers: Vec<Initializer>,
    pub modifiers: Vec<Modifier>,
    pub zone: EmitterZone,
    pub ttl_ms: u64,
    pub rng: ParticleRng,
    pub surface: Option<Box<dyn DrawSurface>>,
    pub surface_origin: Vec2,
    pub phase: SessionPhase,
    pub current_ms: u64,
}

impl SessionState {
    /// One simulation step at `now_ms`: activate what the schedule and the
    /// pool allow, advance everyone, hand the frame to the surface.
    pub fn on_update(&mut self, now_ms: u64) -> TickOutcome {
        if self.phase == SessionPhase::Terminal {
            return TickOutcome::Stop;
        }
        self.current_ms = now_ms;
        while self.should_activate(now_ms) {
            self.activate_particle(now_ms);
        }
        if self.phase == SessionPhase::Emitting && self.schedule.window_closed(now_ms) {
            self.phase = SessionPhase::Draining;
        }
        self.pool.advance(now_ms, &self.modifiers);
        if let Some(surface) = self.surface.as_mut() {
            surface.request_repaint();
        }
        if self.phase == SessionPhase::Draining && self.pool.active_count() == 0 {
            self.finish();
            return TickOutcome::Stop;
        }
        TickOutcome::Continue
    }

    fn should_activate(&self, now_ms: u64) -> bool {
        self.phase == SessionPhase::Emitting
            && self.pool.available_count() > 0
            && self.schedule.should_emit(now_ms)
    }

    /// Activates one particle born at `now_ms`, counting it against the
    /// schedule. Used by the tick loop and by one-shot bursts.
    pub fn activate_particle(&mut self, now_ms: u64) {
        self.pool.activate_one(
            now_ms,
            self.ttl_ms,
            &self.initializers,
            &self.zone,
            &mut self.rng,
        );
        self.schedule.record_activation();
    }

    /// Stops activating; live particles keep animating until they expire.
    pub fn stop_emitting(&mut self) {
        if self.phase == SessionPhase::Emitting {
            self.schedule.close_window(self.current_ms);
            self.phase = SessionPhase::Draining;
        }
    }

    /// Detaches the surface and reclaims every live particle. Idempotent;
    /// every path into `Terminal` funnels through here.
    pub fn finish(&mut self) {
        if self.phase == SessionPhase::Terminal {
            return;
        }
        self.phase = SessionPhase::Terminal;
        self.pool.recycle_all();
        if let Some(mut surface) = self.surface.take() {
            surface.detach();
        }
    }
}

/// Synthesizes a reduced number of evenly spaced ticks across
/// `[0, start_ms]` so a session starting mid-timeline shows the population an
/// emitter running since zero would have. Coarse on purpose: the synthetic
/// step count is bounded, not one per elapsed millisecond.
fn replay_before_start(state: &mut SessionState, start_ms: u64, particles_per_second: u32) {
    if start_ms == 0 || particles_per_second == 0 {
        return;
    }
    let frames = (start_ms / 1000) / particles_per_second as u64;
    if frames == 0 {
        return;
    }
    let frame_ms = start_ms / frames;
    for i in 1..=frames {
        state.on_update(frame_ms * i + 1);
    }
}

enum Driver {
    Periodic(PeriodicTicker),
    Timed(TimedAnimator),
}

/// Owner of a running emission session.
///
/// The session owns its driver: dropping the handle cancels the session if it
/// has not already completed, so no tick can outlive its owner.
pub struct EmissionHandle {
    state: Arc<Mutex<SessionState>>,
    driver: Option<Driver>,
}

fn lock_state(state: &Arc<Mutex<SessionState>>) -> MutexGuard<'_, SessionState> {
    match state.lock() {
        Ok(guard) => guard,
        Err(poisoned) => poisoned.into_inner(),
    }
}

impl EmissionHandle {
    /// Open-ended emission on a fixed-interval ticker.
    pub(crate) fn start_periodic(
        mut state: SessionState,
        interval_ms: u64,
        start_ms: u64,
        particles_per_second: u32,
    ) -> Self {
        attach_surface(&mut state);
        replay_before_start(&mut state, start_ms, particles_per_second);
        println!(
            "[particles] emitting {particles_per_second}/s ({} slots)",
            state.pool.capacity()
        );
        let state = Arc::new(Mutex::new(state));
        let tick_state = Arc::clone(&state);
        let ticker = PeriodicTicker::spawn(interval_ms, start_ms, move |now| {
            lock_state(&tick_state).on_update(now)
        });
        Self {
            state,
            driver: Some(Driver::Periodic(ticker)),
        }
    }

    /// Emission driven by an eased animator over a fixed total duration;
    /// the session finishes on its own when the animator completes.
    pub(crate) fn start_timed(
        mut state: SessionState,
        duration_ms: u64,
        interval_ms: u64,
        ease: ember_core::Ease,
        start_ms: u64,
        particles_per_second: u32,
        burst: u32,
    ) -> Self {
        attach_surface(&mut state);
        for _ in 0..burst {
            if state.pool.available_count() == 0 {
                break;
            }
            state.activate_particle(0);
        }
        replay_before_start(&mut state, start_ms, particles_per_second);
        println!(
            "[particles] animating {duration_ms}ms ({} slots)",
            state.pool.capacity()
        );
        let state = Arc::new(Mutex::new(state));
        let tick_state = Arc::clone(&state);
        let complete_state = Arc::clone(&state);
        let animator = TimedAnimator::spawn(
            duration_ms,
            interval_ms,
            ease,
            move |now| lock_state(&tick_state).on_update(now),
            move || lock_state(&complete_state).finish(),
        );
        Self {
            state,
            driver: Some(Driver::Timed(animator)),
        }
    }

    /// Stops activating new particles; the live ones keep animating until
    /// their time-to-live expires.
    pub fn stop_emitting(&self) {
        lock_state(&self.state).stop_emitting();
    }

    /// Aborts the session. By the time this returns no further ticks will be
    /// delivered, the surface is detached, and every particle is back in the
    /// pool.
    pub fn cancel(&mut self) {
        if let Some(driver) = self.driver.as_mut() {
            match driver {
                Driver::Periodic(ticker) => ticker.cancel(),
                Driver::Timed(animator) => animator.cancel(),
            }
        }
        lock_state(&self.state).finish();
    }

    /// Moves the point emitter for particles activated from now on.
    pub fn update_emit_point(&self, x: f32, y: f32) {
        let mut state = lock_state(&self.state);
        let origin = state.surface_origin;
        state.zone = EmitterZone::point(x - origin.x, y - origin.y);
    }

    /// Re-anchors the emitter zone on a host element.
    pub fn update_emit_zone(&self, element: Rect, anchor: Anchor) {
        let mut state = lock_state(&self.state);
        let origin = state.surface_origin;
        state.zone = EmitterZone::from_element(element, anchor, origin);
    }

    pub fn phase(&self) -> SessionPhase {
        lock_state(&self.state).phase
    }

    pub fn is_terminal(&self) -> bool {
        self.phase() == SessionPhase::Terminal
    }

    pub fn active_count(&self) -> usize {
        lock_state(&self.state).pool.active_count()
    }

    pub fn available_count(&self) -> usize {
        lock_state(&self.state).pool.available_count()
    }

    pub fn activated_count(&self) -> u32 {
        lock_state(&self.state).schedule.activated()
    }
}

impl Drop for EmissionHandle {
    fn drop(&mut self) {
        self.cancel();
    }
}

fn attach_surface(state: &mut SessionState) {
    let handle = state.pool.active_handle();
    if let Some(surface) = state.surface.as_mut() {
        surface.attach(handle);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::ActiveParticles;
    use crate::sprite::{Sprite, Texture};
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn sprites(n: usize) -> Vec<Sprite> {
        (0..n)
            .map(|i| Sprite::Static(Texture::new(format!("s{i}"), 8, 8)))
            .collect()
    }

    fn state(capacity: usize, ttl_ms: u64, schedule: EmissionSchedule) -> SessionState {
        SessionState {
            pool: ParticlePool::new(sprites(capacity)),
            schedule,
            initializers: Vec::new(),
            modifiers: Vec::new(),
            zone: EmitterZone::point(50.0, 50.0),
            ttl_ms,
            rng: ParticleRng::new(42),
            surface: None,
            surface_origin: Vec2::ZERO,
            phase: SessionPhase::Emitting,
            current_ms: 0,
        }
    }

    /// Records attach/detach/repaint calls for assertions.
    struct RecordingSurface {
        particles: Option<ActiveParticles>,
        repaints: Arc<AtomicUsize>,
        detached: Arc<AtomicUsize>,
    }

    impl DrawSurface for RecordingSurface {
        fn attach(&mut self, particles: ActiveParticles) {
            self.particles = Some(particles);
        }
        fn detach(&mut self) {
            if self.particles.take().is_some() {
                self.detached.fetch_add(1, Ordering::SeqCst);
            }
        }
        fn request_repaint(&mut self) {
            self.repaints.fetch_add(1, Ordering::SeqCst);
        }
    }

    #[test]
    fn pool_of_ten_at_five_per_second_over_two_seconds() {
        let mut s = state(10, 1000, EmissionSchedule::timed(5, 2000));
        let mut now = 0;
        while now < 1000 {
            s.on_update(now);
            now += 33;
        }
        // By t≈1000ms exactly five have been activated and none expired
        assert_eq!(s.schedule.activated(), 5);
        assert_eq!(s.pool.active_count(), 5);

        while now <= 2100 {
            s.on_update(now);
            now += 33;
        }
        // By t=2000ms the pool cap bounds activation and the first five died
        assert!(s.schedule.activated() <= 10);
        assert!(s.pool.available_count() >= 5);
        assert_eq!(
            s.pool.available_count() + s.pool.active_count(),
            s.pool.capacity()
        );
    }

    #[test]
    fn exhausted_pool_drops_activations_until_recycling() {
        let mut s = state(2, 100, EmissionSchedule::unbounded(1000));
        s.on_update(10);
        assert_eq!(s.pool.active_count(), 2);
        // Rate target is far beyond 2, but the pool is the hard ceiling
        s.on_update(50);
        assert_eq!(s.pool.active_count(), 2);
        assert_eq!(s.schedule.activated(), 2);
        // Expiry frees the slots; the next tick activates into them again
        s.on_update(150);
        assert_eq!(s.pool.active_count(), 0);
        s.on_update(160);
        assert_eq!(s.pool.active_count(), 2);
        assert_eq!(s.schedule.activated(), 4);
    }

    #[test]
    fn window_close_transitions_to_draining_then_terminal() {
        let mut s = state(4, 500, EmissionSchedule::timed(100, 200));
        s.on_update(50);
        assert_eq!(s.phase, SessionPhase::Emitting);
        assert!(s.pool.active_count() > 0);

        // The tick exactly at the deadline emits nothing and starts draining
        let before = s.schedule.activated();
        s.on_update(200);
        assert_eq!(s.schedule.activated(), before);
        assert_eq!(s.phase, SessionPhase::Draining);
        assert!(s.pool.active_count() > 0);

        // Once every particle expires the session finishes itself
        assert_eq!(s.on_update(600), TickOutcome::Stop);
        assert_eq!(s.phase, SessionPhase::Terminal);
        assert_eq!(s.pool.available_count(), 4);
    }

    #[test]
    fn stop_emitting_keeps_live_particles_animating() {
        let mut s = state(8, 1000, EmissionSchedule::unbounded(100));
        s.on_update(50);
        let live = s.pool.active_count();
        assert!(live > 0);

        s.stop_emitting();
        assert_eq!(s.phase, SessionPhase::Draining);
        s.on_update(500);
        assert_eq!(s.pool.active_count(), live);
        assert_eq!(s.on_update(1100), TickOutcome::Stop);
        assert_eq!(s.phase, SessionPhase::Terminal);
    }

    #[test]
    fn finish_detaches_surface_and_reclaims_particles() {
        let repaints = Arc::new(AtomicUsize::new(0));
        let detached = Arc::new(AtomicUsize::new(0));
        let mut s = state(4, 1000, EmissionSchedule::unbounded(100));
        s.surface = Some(Box::new(RecordingSurface {
            particles: None,
            repaints: Arc::clone(&repaints),
            detached: Arc::clone(&detached),
        }));
        attach_surface(&mut s);
        s.on_update(50);
        assert_eq!(repaints.load(Ordering::SeqCst), 1);

        s.finish();
        s.finish();
        assert_eq!(detached.load(Ordering::SeqCst), 1);
        assert_eq!(s.pool.available_count(), 4);
        // A tick after finish mutates nothing
        assert_eq!(s.on_update(100), TickOutcome::Stop);
        assert_eq!(repaints.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn terminal_is_absorbing() {
        let mut s = state(2, 100, EmissionSchedule::unbounded(100));
        s.finish();
        s.stop_emitting();
        assert_eq!(s.phase, SessionPhase::Terminal);
        assert_eq!(s.on_update(500), TickOutcome::Stop);
        assert_eq!(s.pool.active_count(), 0);
    }

    #[test]
    fn replay_populates_like_an_emitter_running_since_zero() {
        let mut s = state(64, 60_000, EmissionSchedule::unbounded(2));
        replay_before_start(&mut s, 10_000, 2);
        // 2/s over 10s replayed in (10s / 2) = 5 synthetic steps; the rate
        // target at the last step is ~20 particles
        assert!(s.schedule.activated() >= 18);
        assert!(s.pool.active_count() > 0);
    }

    #[test]
    fn replay_is_skipped_for_short_start_times() {
        let mut s = state(8, 1000, EmissionSchedule::unbounded(100));
        replay_before_start(&mut s, 500, 100);
        assert_eq!(s.schedule.activated(), 0);
    }

    #[test]
    fn cancel_through_the_handle_reclaims_everything() {
        let s = state(6, 10_000, EmissionSchedule::unbounded(200));
        let mut handle = EmissionHandle::start_periodic(s, 5, 0, 200);
        while handle.active_count() == 0 {
            std::thread::sleep(std::time::Duration::from_millis(1));
        }
        handle.cancel();
        assert!(handle.is_terminal());
        assert_eq!(handle.active_count(), 0);
        assert_eq!(handle.available_count(), 6);
        let after = handle.activated_count();
        std::thread::sleep(std::time::Duration::from_millis(20));
        assert_eq!(handle.activated_count(), after);
    }

    #[test]
    fn timed_session_finishes_on_its_own() {
        let s = state(8, 100, EmissionSchedule::timed(200, 200));
        let handle =
            EmissionHandle::start_timed(s, 300, 5, ember_core::Ease::Linear, 0, 200, 0);
        let deadline = std::time::Instant::now() + std::time::Duration::from_millis(2000);
        while !handle.is_terminal() {
            assert!(std::time::Instant::now() < deadline, "session never finished");
            std::thread::sleep(std::time::Duration::from_millis(2));
        }
        assert_eq!(handle.available_count(), 8);
        assert!(handle.activated_count() > 0);
    }

    #[test]
    fn burst_activates_at_most_the_pool_size() {
        let s = state(5, 10_000, EmissionSchedule::burst(10_000));
        let handle = EmissionHandle::start_timed(
            s,
            10_000,
            5,
            ember_core::Ease::Linear,
            0,
            0,
            9,
        );
        assert_eq!(handle.activated_count(), 5);
        assert_eq!(handle.active_count(), 5);
        // No rate-driven activation follows the burst
        std::thread::sleep(std::time::Duration::from_millis(25));
        assert_eq!(handle.activated_count(), 5);
        drop(handle);
    }
}
