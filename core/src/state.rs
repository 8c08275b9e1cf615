//! The dashboard state store.
//!
//! RULE: state is replaced whole. The engine clones the current value
//! into a draft, mutates the draft, and publishes it in one assignment,
//! so a reader holding a snapshot never sees a half-applied transition.

use crate::{
    clock::SimClock,
    config::SimConfig,
    customer::{seed_customers, Customer, RiskLevel},
    feed::{EventLog, EventTemplate, FeedEvent},
    insight::{seed_insights, Insight},
    metrics::Metrics,
    pipeline::{seed_deals, Deal, FinancialHealth},
    scenario::ScenarioKey,
    types::Version,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DashboardState {
    pub version:         Version,
    pub clock:           SimClock,
    pub metrics:         Metrics,
    pub insights:        Vec<Insight>,
    pub customers:       Vec<Customer>,
    pub events:          EventLog,
    pub deals:           Vec<Deal>,
    pub financials:      FinancialHealth,
    pub active_scenario: Option<ScenarioKey>,
    /// Sequence number for the next feed event id.
    next_event_seq:      u64,
}

impl DashboardState {
    /// Seed values shown on first load.
    pub fn seed(config: &SimConfig, started_at: DateTime<Utc>) -> Self {
        Self {
            version:         0,
            clock:           SimClock::new(started_at, config.tick_period_ms),
            metrics:         Metrics::seed(),
            insights:        seed_insights(),
            customers:       seed_customers(),
            events:          EventLog::with_capacity(config.feed_capacity),
            deals:           seed_deals(),
            financials:      FinancialHealth::seed(),
            active_scenario: None,
            next_event_seq:  1,
        }
    }

    pub fn is_running(&self) -> bool {
        self.clock.running
    }

    pub fn customer(&self, customer_id: &str) -> Option<&Customer> {
        self.customers.iter().find(|c| c.id == customer_id)
    }

    pub fn customers_at(&self, risk: RiskLevel) -> usize {
        self.customers.iter().filter(|c| c.risk() == risk).count()
    }

    /// Stamp `template` with the next id and the clock's current time,
    /// then push it onto the feed.
    pub(crate) fn publish(&mut self, template: &EventTemplate) -> FeedEvent {
        let event = template.stamp(self.next_event_seq, self.clock.now);
        self.next_event_seq += 1;
        if let Some(dropped) = self.events.publish(event.clone()) {
            log::trace!("feed full, dropped {}", dropped.id);
        }
        event
    }
}
