//! Engine notifications.
//!
//! Every transition returns the notifications it produced, in order.
//! The shell can forward them or log them; nothing inside the engine
//! reacts to them except later subsystems in the same tick.

use crate::{
    feed::{FeedEvent, TriggerKey},
    metrics::{MetricField, Metrics},
    scenario::ScenarioKey,
    types::{Tick, Version},
};
use serde::{Deserialize, Serialize};

/// Variants are appended as features land — never removed or reordered.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SimEvent {
    // ── Engine events ──────────────────────────────
    TickStarted {
        tick: Tick,
    },
    TickCompleted {
        tick: Tick,
        version: Version,
    },
    SimulationStarted {
        tick: Tick,
    },
    SimulationStopped {
        tick: Tick,
    },

    // ── Subsystem events ───────────────────────────
    FeedEventPublished {
        tick: Tick,
        trigger: Option<TriggerKey>,
        event: FeedEvent,
    },
    MetricsDrifted {
        tick: Tick,
        metrics: Metrics,
    },

    // ── Operator events ────────────────────────────
    ScenarioApplied {
        tick: Tick,
        scenario: ScenarioKey,
        customers_changed: usize,
    },
    CustomerHealthSet {
        tick: Tick,
        customer_id: String,
        old_health: u8,
        new_health: u8,
    },
    MetricOverridden {
        tick: Tick,
        field: MetricField,
        old_value: f64,
        new_value: f64,
    },
}

impl SimEvent {
    /// Stable string name for the variant, used in log lines.
    pub fn type_name(&self) -> &'static str {
        match self {
            Self::TickStarted { .. }        => "tick_started",
            Self::TickCompleted { .. }      => "tick_completed",
            Self::SimulationStarted { .. }  => "simulation_started",
            Self::SimulationStopped { .. }  => "simulation_stopped",
            Self::FeedEventPublished { .. } => "feed_event_published",
            Self::MetricsDrifted { .. }     => "metrics_drifted",
            Self::ScenarioApplied { .. }    => "scenario_applied",
            Self::CustomerHealthSet { .. }  => "customer_health_set",
            Self::MetricOverridden { .. }   => "metric_overridden",
        }
    }
}
