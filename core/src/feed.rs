//! The live event feed: canned event catalogs and the bounded,
//! most-recent-first log the dashboard renders.

use crate::{
    config::DEFAULT_FEED_CAPACITY,
    error::{SimError, SimResult},
    insight::SignalKind,
    types::EntityId,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};

/// A catalog entry waiting for an id and a timestamp.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EventTemplate {
    pub kind:    SignalKind,
    pub title:   &'static str,
    pub message: &'static str,
}

impl EventTemplate {
    pub fn stamp(&self, seq: u64, timestamp: DateTime<Utc>) -> FeedEvent {
        FeedEvent {
            id:        format!("evt-{seq:06}"),
            seq,
            kind:      self.kind,
            title:     self.title.to_string(),
            message:   self.message.to_string(),
            timestamp,
        }
    }
}

/// Events the tick may emit on its own, picked uniformly.
pub const TICK_EVENTS: [EventTemplate; 4] = [
    EventTemplate {
        kind:    SignalKind::Critical,
        title:   "Customer Health Alert",
        message: "DataFlow Industries usage declined 25%",
    },
    EventTemplate {
        kind:    SignalKind::Opportunity,
        title:   "Expansion Ready",
        message: "CloudServ Inc hitting plan limits",
    },
    EventTemplate {
        kind:    SignalKind::Success,
        title:   "Deal Progression",
        message: "ProTech moved to Negotiation stage",
    },
    EventTemplate {
        kind:    SignalKind::Warning,
        title:   "Performance Alert",
        message: "API response time spike detected",
    },
];

/// Keys of the events an operator can fire by hand.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum TriggerKey {
    ChurnAlert,
    Expansion,
    Performance,
    DealWon,
}

impl TriggerKey {
    pub const ALL: [TriggerKey; 4] = [
        Self::ChurnAlert,
        Self::Expansion,
        Self::Performance,
        Self::DealWon,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ChurnAlert  => "churn_alert",
            Self::Expansion   => "expansion",
            Self::Performance => "performance",
            Self::DealWon     => "deal_won",
        }
    }

    pub fn template(&self) -> EventTemplate {
        match self {
            Self::ChurnAlert => EventTemplate {
                kind:    SignalKind::Critical,
                title:   "Churn Risk Detected",
                message: "Enterprise customer showing 40% usage decline",
            },
            Self::Expansion => EventTemplate {
                kind:    SignalKind::Opportunity,
                title:   "Expansion Signal",
                message: "Customer hit 95% of plan limits",
            },
            Self::Performance => EventTemplate {
                kind:    SignalKind::Warning,
                title:   "Performance Spike",
                message: "API response time increased 25%",
            },
            Self::DealWon => EventTemplate {
                kind:    SignalKind::Success,
                title:   "Deal Closed",
                message: "Major enterprise deal signed - $85K ARR",
            },
        }
    }

    pub fn parse(key: &str) -> SimResult<Self> {
        key.parse()
    }
}

impl fmt::Display for TriggerKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TriggerKey {
    type Err = SimError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|k| k.as_str() == s)
            .ok_or_else(|| SimError::UnknownEventKey { key: s.to_string() })
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FeedEvent {
    pub id:        EntityId,
    /// Publication order within the session; `id` is its display form.
    pub seq:       u64,
    pub kind:      SignalKind,
    pub title:     String,
    pub message:   String,
    pub timestamp: DateTime<Utc>,
}

/// Most-recent-first log that keeps at most `capacity` entries.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(try_from = "EventLogFields")]
pub struct EventLog {
    capacity: usize,
    entries:  Vec<FeedEvent>,
}

#[derive(Deserialize)]
struct EventLogFields {
    capacity: usize,
    entries:  Vec<FeedEvent>,
}

impl TryFrom<EventLogFields> for EventLog {
    type Error = String;

    fn try_from(f: EventLogFields) -> Result<Self, Self::Error> {
        if f.capacity == 0 {
            return Err("event log capacity must be > 0".to_string());
        }
        if f.entries.len() > f.capacity {
            return Err(format!(
                "event log holds {} entries, capacity is {}",
                f.entries.len(),
                f.capacity
            ));
        }
        Ok(Self { capacity: f.capacity, entries: f.entries })
    }
}

impl Default for EventLog {
    fn default() -> Self {
        Self::with_capacity(DEFAULT_FEED_CAPACITY)
    }
}

impl EventLog {
    pub fn with_capacity(capacity: usize) -> Self {
        Self { capacity: capacity.max(1), entries: Vec::new() }
    }

    /// Prepend `event`; returns the entry that fell off the tail, if any.
    pub fn publish(&mut self, event: FeedEvent) -> Option<FeedEvent> {
        self.entries.insert(0, event);
        if self.entries.len() > self.capacity {
            self.entries.pop()
        } else {
            None
        }
    }

    pub fn entries(&self) -> &[FeedEvent] { &self.entries }
    pub fn latest(&self) -> Option<&FeedEvent> { self.entries.first() }
    pub fn len(&self) -> usize { self.entries.len() }
    pub fn is_empty(&self) -> bool { self.entries.is_empty() }
    pub fn capacity(&self) -> usize { self.capacity }
}
