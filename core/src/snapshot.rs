//! Snapshot serialization — the full dashboard state plus the status-bar
//! summary, as one JSON document for the shell.

use crate::{customer::RiskLevel, state::DashboardState, types::Version};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub const STATUS_RUNNING: &str = "Live Simulation Running";
pub const STATUS_READY: &str = "Demo Ready";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct StatusSummary {
    pub status:              String,
    pub version:             Version,
    pub events_in_feed:      usize,
    pub critical_customers:  usize,
    pub last_update:         DateTime<Utc>,
}

impl StatusSummary {
    pub fn of(state: &DashboardState) -> Self {
        Self {
            status: (if state.is_running() { STATUS_RUNNING } else { STATUS_READY }).to_string(),
            version:            state.version,
            events_in_feed:     state.events.len(),
            critical_customers: state.customers_at(RiskLevel::Critical),
            last_update:        state.clock.now,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimSnapshot {
    pub summary: StatusSummary,
    pub state:   DashboardState,
}

impl SimSnapshot {
    pub fn of(state: &DashboardState) -> Self {
        Self {
            summary: StatusSummary::of(state),
            state:   state.clone(),
        }
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }
}
