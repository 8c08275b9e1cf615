//! Simulation clock — owns tick count, the displayed timestamp, and the
//! running flag.
//!
//! The clock never schedules anything. Whoever owns the timer (see
//! `timer.rs` or the shell) calls `SimEngine::tick` while `running` is set.

use crate::types::Tick;
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

pub const DEFAULT_TICK_PERIOD_MS: u64 = 3_000;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SimClock {
    pub current_tick: Tick,
    pub started_at:   DateTime<Utc>,
    pub now:          DateTime<Utc>,
    pub period_ms:    u64,
    pub running:      bool,
}

impl SimClock {
    pub fn new(started_at: DateTime<Utc>, period_ms: u64) -> Self {
        Self {
            current_tick: 0,
            started_at,
            now: started_at,
            period_ms,
            running: false,
        }
    }

    /// Advance one tick. Returns the new tick number.
    /// Panics if called while stopped — callers must check.
    pub fn advance(&mut self) -> Tick {
        assert!(self.running, "advance() called on stopped clock");
        self.current_tick += 1;
        self.now = self.time_at(self.current_tick);
        self.current_tick
    }

    /// Wall time of `tick`, counted from `started_at` in whole periods.
    /// Past the end of the representable range the clock holds at `now`.
    pub fn time_at(&self, tick: Tick) -> DateTime<Utc> {
        let elapsed_ms = tick.saturating_mul(self.period_ms).min(i64::MAX as u64) as i64;
        Duration::try_milliseconds(elapsed_ms)
            .and_then(|elapsed| self.started_at.checked_add_signed(elapsed))
            .unwrap_or(self.now)
    }

    pub fn start(&mut self) { self.running = true;  }
    pub fn stop(&mut self)  { self.running = false; }

    pub fn period(&self) -> std::time::Duration {
        std::time::Duration::from_millis(self.period_ms)
    }
}
