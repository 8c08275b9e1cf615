use serde::{Deserialize, Serialize};

/// Operator commands issued from the demo control panel.
/// Keys arrive as strings so an unknown key is a recoverable
/// rejection rather than a parse failure of the whole line.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "cmd", rename_all = "snake_case")]
pub enum OperatorCommand {
    // ── Clock control ─────────────────────────────
    Start,
    Stop,

    // ── Control panel ─────────────────────────────
    ApplyScenario {
        scenario: String,
    },
    SetCustomerHealth {
        customer_id: String,
        health:      u8,
    },
    SetMetric {
        field: String,
        value: f64,
    },
    TriggerEvent {
        event: String,
    },
}

impl OperatorCommand {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Start                  => "start",
            Self::Stop                   => "stop",
            Self::ApplyScenario { .. }   => "apply_scenario",
            Self::SetCustomerHealth { .. } => "set_customer_health",
            Self::SetMetric { .. }       => "set_metric",
            Self::TriggerEvent { .. }    => "trigger_event",
        }
    }
}
