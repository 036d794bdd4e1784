//! Fixed-interval tick delivery on a background thread

use std::sync::mpsc::{self, RecvTimeoutError};
use std::thread::JoinHandle;
use std::time::Duration;

/// Whether the driven simulation wants more ticks.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TickOutcome {
    Continue,
    Stop,
}

/// Delivers elapsed-time callbacks at a fixed interval from a background
/// thread.
///
/// Ticks are strictly serialized: the next tick is not scheduled until the
/// callback for the previous one has returned. The callback receives the
/// session-relative elapsed time in milliseconds, starting at `start_ms` and
/// advancing by `interval_ms` per tick.
pub struct PeriodicTicker {
    stop_tx: mpsc::Sender<()>,
    handle: Option<JoinHandle<()>>,
}

impl PeriodicTicker {
    pub fn spawn<F>(interval_ms: u64, start_ms: u64, mut on_tick: F) -> Self
    where
        F: FnMut(u64) -> TickOutcome + Send + 'static,
    {
        let (stop_tx, stop_rx) = mpsc::channel::<()>();
        let handle = std::thread::spawn(move || {
            let mut current = start_ms;
            loop {
                if on_tick(current) == TickOutcome::Stop {
                    break;
                }
                current += interval_ms;
                match stop_rx.recv_timeout(Duration::from_millis(interval_ms)) {
                    Err(RecvTimeoutError::Timeout) => {}
                    // Stop requested, or the owning handle is gone.
                    _ => break,
                }
            }
        });
        Self {
            stop_tx,
            handle: Some(handle),
        }
    }

    /// Stops the ticker. Blocks until an in-flight tick, if any, has
    /// completed; after this returns no further ticks are delivered.
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
