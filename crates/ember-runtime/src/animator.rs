//! Duration-bounded eased animation driver

use crate::ticker::TickOutcome;
use ember_core::Ease;
use std::sync::mpsc::{self, RecvTimeoutError};
use std::thread::JoinHandle;
use std::time::{Duration, Instant};

/// Drives a callback over a fixed total duration on a background thread.
///
/// Each tick delivers the eased, interpolated position within
/// `[0, duration_ms]` rather than the wall-clock delta; the final tick lands
/// exactly on `duration_ms`. `on_complete` fires once after the final tick on
/// natural completion only — cancellation suppresses it.
pub struct TimedAnimator {
    stop_tx: mpsc::Sender<()>,
    handle: Option<JoinHandle<()>>,
}

impl TimedAnimator {
    pub fn spawn<F, C>(
        duration_ms: u64,
        interval_ms: u64,
        ease: Ease,
        mut on_tick: F,
        on_complete: C,
    ) -> Self
    where
        F: FnMut(u64) -> TickOutcome + Send + 'static,
        C: FnOnce() + Send + 'static,
    {
        let (stop_tx, stop_rx) = mpsc::channel::<()>();
        let handle = std::thread::spawn(move || {
            let started = Instant::now();
            loop {
                let elapsed = started.elapsed().as_millis() as u64;
                if elapsed >= duration_ms {
                    break;
                }
                let fraction = elapsed as f32 / duration_ms as f32;
                let position = (ease.apply(fraction) * duration_ms as f32) as u64;
                if on_tick(position) == TickOutcome::Stop {
                    return;
                }
                match stop_rx.recv_timeout(Duration::from_millis(interval_ms)) {
                    Err(RecvTimeoutError::Timeout) => {}
                    _ => return,
                }
            }
            if on_tick(duration_ms) == TickOutcome::Continue {
                on_complete();
            }
        });
        Self {
            stop_tx,
            handle: Some(handle),
        }
    }

    /// Stops the animator without running the completion callback. Blocks
    /// until an in-flight tick, if any, has completed.
    pub fn cancel(&mut self) {
        let _ = self.stop_tx.send(());
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
    }

    pub fn is_finished(&self) -> bool {
        self.handle.as_ref().map_or(true, |h| h.is_finished())
    }
}
