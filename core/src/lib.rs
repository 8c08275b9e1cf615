//! Simulation core for the AI operations dashboard: seeded metric drift,
//! a bounded event feed, scenario presets and manual overrides.

pub mod clock;
pub mod command;
pub mod config;
pub mod customer;
pub mod engine;
pub mod error;
pub mod event;
pub mod feed;
pub mod feed_subsystem;
pub mod insight;
pub mod metrics;
pub mod metrics_subsystem;
pub mod pipeline;
pub mod rng;
pub mod scenario;
pub mod snapshot;
pub mod state;
pub mod subsystem;
pub mod timer;
pub mod types;
