//! Periodic tick driver for shells that want wall-clock updates.
//!
//! The engine never schedules itself. A `TickTimer` owns one background
//! thread that locks the shared engine once per period and calls `tick`.
//! Cancellation is explicit and idempotent, and dropping the timer
//! cancels it; once `cancel` returns no further tick is issued.
//! The thread also exits on its own the first time it finds the engine
//! stopped, so a stopped simulation never re-arms.

use crate::{engine::SimEngine, event::SimEvent, state::DashboardState};
use std::{
    sync::{
        mpsc::{self, RecvTimeoutError, Sender},
        Arc, Mutex,
    },
    thread::JoinHandle,
    time::Duration,
};

/// The engine as shared between the shell and a timer thread.
pub type SharedEngine = Arc<Mutex<SimEngine>>;

pub fn shared(engine: SimEngine) -> SharedEngine {
    Arc::new(Mutex::new(engine))
}

pub struct TickTimer {
    cancel_tx: Option<Sender<()>>,
    handle:    Option<JoinHandle<()>>,
}

impl TickTimer {
    /// Tick `engine` every `period` until cancelled or stopped.
    pub fn spawn(engine: SharedEngine, period: Duration) -> Self {
        Self::spawn_with(engine, period, |_, _| {})
    }

    /// Like `spawn`, calling `on_tick` with each tick's events and the
    /// published snapshot. The callback runs outside the engine lock.
    pub fn spawn_with<F>(engine: SharedEngine, period: Duration, mut on_tick: F) -> Self
    where
        F: FnMut(&[SimEvent], &DashboardState) + Send + 'static,
    {
        let (cancel_tx, cancel_rx) = mpsc::channel::<()>();

        let handle = std::thread::spawn(move || loop {
            match cancel_rx.recv_timeout(period) {
                Err(RecvTimeoutError::Timeout) => {}
                Ok(()) | Err(RecvTimeoutError::Disconnected) => break,
            }

            let (events, snapshot) = {
                let mut guard = match engine.lock() {
                    Ok(guard) => guard,
                    Err(_) => {
                        log::error!("tick timer: engine lock poisoned, exiting");
                        break;
                    }
                };
                if !guard.is_running() {
                    log::debug!("tick timer: engine stopped, exiting");
                    break;
                }
                match guard.tick() {
                    Ok(events) => (events, guard.snapshot()),
                    Err(e) => {
                        log::error!("tick timer: tick failed: {e}");
                        break;
                    }
                }
            };
            on_tick(&events, &snapshot);
        });

        Self {
            cancel_tx: Some(cancel_tx),
            handle:    Some(handle),
        }
    }

    /// Stop the timer and wait for its thread. Safe to call repeatedly.
    pub fn cancel(&mut self) {
        if let Some(tx) = self.cancel_tx.take() {
            // The thread may already have exited on its own.
            let _ = tx.send(());
        }
        if let Some(handle) = self.handle.take() {
            if handle.join().is_err() {
                log::error!("tick timer thread panicked");
            }
        }
    }

    pub fn is_armed(&self) -> bool {
        self.handle.as_ref().is_some_and(|h| !h.is_finished())
    }
}

impl Drop for TickTimer {
    fn drop(&mut self) {
        self.cancel();
    }
}
