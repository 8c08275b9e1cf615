//! Scenario presets for the demo control panel.
//!
//! A scenario is applied as one unit: metrics and insights are replaced,
//! and every customer is mapped through the preset's health transform.

use crate::{
    customer::HealthTransform,
    error::{SimError, SimResult},
    insight::{Insight, SignalKind},
    metrics::Metrics,
};
use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum ScenarioKey {
    Normal,
    Crisis,
    Growth,
}

impl ScenarioKey {
    pub const ALL: [ScenarioKey; 3] = [Self::Normal, Self::Crisis, Self::Growth];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Normal => "normal",
            Self::Crisis => "crisis",
            Self::Growth => "growth",
        }
    }

    pub fn parse(key: &str) -> SimResult<Self> {
        key.parse()
    }

    pub fn preset(&self) -> Scenario {
        match self {
            Self::Normal => Scenario {
                key:  *self,
                name: "Normal Operations",
                metrics: Metrics {
                    mrr:               129_700.0,
                    daily_users:       2_223,
                    pipeline_value:    618_000.0,
                    api_response_time: 83.0,
                    churn_risk:        2.0,
                },
                insights: vec![Insight::new(
                    1,
                    SignalKind::Opportunity,
                    "Revenue",
                    "Expansion Opportunity",
                    "CloudServ Inc ready for upsell",
                    "Schedule expansion call",
                )],
                health_transform: HealthTransform::Unchanged,
            },
            Self::Crisis => Scenario {
                key:  *self,
                name: "Crisis Mode",
                metrics: Metrics {
                    mrr:               95_000.0,
                    daily_users:       1_645,
                    pipeline_value:    285_000.0,
                    api_response_time: 165.0,
                    churn_risk:        7.0,
                },
                insights: vec![
                    Insight::new(
                        1,
                        SignalKind::Critical,
                        "Customer Success",
                        "Mass Churn Alert",
                        "$127K MRR at risk",
                        "URGENT intervention required",
                    ),
                    Insight::new(
                        2,
                        SignalKind::Critical,
                        "Product",
                        "Performance Crisis",
                        "API degraded 180%",
                        "Emergency scaling needed",
                    ),
                ],
                health_transform: HealthTransform::DropWithFloor { delta: 50, floor: 15 },
            },
            Self::Growth => Scenario {
                key:  *self,
                name: "Growth Surge",
                metrics: Metrics {
                    mrr:               168_500.0,
                    daily_users:       2_856,
                    pipeline_value:    890_000.0,
                    api_response_time: 65.0,
                    churn_risk:        1.0,
                },
                insights: vec![Insight::new(
                    1,
                    SignalKind::Opportunity,
                    "Revenue",
                    "Multiple Expansions",
                    "5 customers ready for upgrade",
                    "Accelerate upsell motions",
                )],
                health_transform: HealthTransform::RaiseWithCeiling { delta: 20, ceiling: 95 },
            },
        }
    }
}

impl fmt::Display for ScenarioKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ScenarioKey {
    type Err = SimError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|k| k.as_str() == s)
            .ok_or_else(|| SimError::UnknownScenario { key: s.to_string() })
    }
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct Scenario {
    pub key:              ScenarioKey,
    pub name:             &'static str,
    pub metrics:          Metrics,
    pub insights:         Vec<Insight>,
    pub health_transform: HealthTransform,
}

/// Every preset in control-panel order.
pub fn catalog() -> Vec<Scenario> {
    ScenarioKey::ALL.iter().map(ScenarioKey::preset).collect()
}
