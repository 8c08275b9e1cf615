//! Shared primitive types used across the entire simulation.

/// A simulation tick. One tick = one timer period of the dashboard shell.
pub type Tick = u64;

/// A stable, unique identifier for any entity in the simulation.
pub type EntityId = String;

/// Monotonic counter of published state versions.
pub type Version = u64;
