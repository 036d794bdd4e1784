//! Frame-quantized emission rate control

/// Bookkeeping for how many particles an emission session may activate.
///
/// Each tick activates particles one at a time while the cumulative count is
/// below the rate target for the elapsed time, stopping early when the pool
/// runs dry or the emitting window closes. The window check is strictly
/// less-than: the tick landing exactly on the deadline emits nothing new.
pub struct EmissionSchedule {
    rate_per_ms: f32,
    emitting_ms: Option<u64>,
    activated: u32,
}

impl EmissionSchedule {
    /// Continuous emission at `particles_per_second` with no deadline.
    pub fn unbounded(particles_per_second: u32) -> Self {
        Self {
            rate_per_ms: particles_per_second as f32 / 1000.0,
            emitting_ms: None,
            activated: 0,
        }
    }

    /// Emission at `particles_per_second` until `emitting_ms`.
    pub fn timed(particles_per_second: u32, emitting_ms: u64) -> Self {
        Self {
            rate_per_ms: particles_per_second as f32 / 1000.0,
            emitting_ms: Some(emitting_ms),
            activated: 0,
        }
    }

    /// No rate-driven emission at all: the burst is activated up front by the
    /// session, and `deadline_ms` only bounds the drain.
    pub fn burst(deadline_ms: u64) -> Self {
        Self {
            rate_per_ms: 0.0,
            emitting_ms: Some(deadline_ms),
            activated: 0,
        }
    }

    /// Whether one more particle may be activated at `now_ms`.
    pub fn should_emit(&self, now_ms: u64) -> bool {
        let window_open = match self.emitting_ms {
            Some(deadline) => now_ms < deadline,
            None => true,
        };
        window_open && (self.activated as f32) < self.rate_per_ms * now_ms as f32
    }

    /// Records one activation, burst or rate-driven.
    pub fn record_activation(&mut self) {
        self.activated += 1;
    }

    /// Closes the emitting window at `now_ms`. The strict less-than rate
    /// check then fails for every later tick.
    pub fn close_window(&mut self, now_ms: u64) {
        self.emitting_ms = Some(now_ms);
    }

    pub fn window_closed(&self, now_ms: u64) -> bool {
        matches!(self.emitting_ms, Some(deadline) if now_ms >= deadline)
    }

    pub fn activated(&self) -> u32 {
        self.activated
    }
}
