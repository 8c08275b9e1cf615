//! Subsystem trait.
//!
//! RULE: Every piece of per-tick work implements TickSubsystem.
//! The engine calls update() on each registered subsystem
//! in registration order, every tick, against one shared draft.
//! Execution order is fixed and documented in engine.rs.

use crate::{
    error::SimResult,
    event::SimEvent,
    rng::SubsystemRng,
    state::DashboardState,
    types::Tick,
};

/// The contract every tick subsystem must fulfill.
pub trait TickSubsystem: Send {
    /// Unique stable name for this subsystem.
    fn name(&self) -> &'static str;

    /// Called once per tick by the engine.
    ///
    /// - `tick`:      the tick being built (the draft's clock is already on it)
    /// - `draft`:     the next state; published only after every subsystem ran
    /// - `events_in`: events emitted by earlier subsystems this tick
    /// - `rng`:       this subsystem's deterministic RNG for this tick
    ///
    /// Returns a vec of new events to add to the tick's notifications.
    fn update(
        &mut self,
        tick: Tick,
        draft: &mut DashboardState,
        events_in: &[SimEvent],
        rng: &mut SubsystemRng,
    ) -> SimResult<Vec<SimEvent>>;
}
