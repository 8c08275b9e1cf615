//! The simulation engine — the heart of the ops desk.
//!
//! EXECUTION ORDER per tick (fixed, documented, never reordered):
//!   0. Clock advance  (engine internal)
//!   1. Feed subsystem     — maybe publish one canned event
//!   2. Metrics subsystem  — drift the headline metrics
//!
//! RULES:
//!   - Subsystems execute in registration order, every tick.
//!   - All subsystems write to one draft; the draft is published only
//!     after the last subsystem returns. An error discards the draft.
//!   - All randomness flows through the RngBank.
//!   - Operator transitions are validated before the draft is built,
//!     so a rejected command never touches state or version.

use crate::{
    command::OperatorCommand,
    config::SimConfig,
    customer::Customer,
    error::{SimError, SimResult},
    event::SimEvent,
    feed::TriggerKey,
    feed_subsystem::FeedSubsystem,
    metrics::MetricField,
    metrics_subsystem::MetricsSubsystem,
    rng::{RngBank, SubsystemSlot},
    scenario::ScenarioKey,
    state::DashboardState,
    subsystem::TickSubsystem,
    types::Version,
};
use chrono::{DateTime, TimeZone, Utc};

pub struct SimEngine {
    pub rng_bank: RngBank,
    config:       SimConfig,
    subsystems:   Vec<(SubsystemSlot, Box<dyn TickSubsystem>)>,
    state:        DashboardState,
}

impl SimEngine {
    pub fn new(seed: u64, config: SimConfig, started_at: DateTime<Utc>) -> Self {
        Self {
            rng_bank:   RngBank::new(seed),
            state:      DashboardState::seed(&config, started_at),
            subsystems: Vec::new(),
            config,
        }
    }

    /// Build a fully wired engine with all subsystems registered.
    /// Call this instead of new() + manual register() calls.
    pub fn build(seed: u64, config: SimConfig, started_at: DateTime<Utc>) -> Self {
        let threshold = config.event_threshold;
        let drift = config.drift.clone();
        let mut engine = SimEngine::new(seed, config, started_at);

        // EXECUTION ORDER — fixed, documented, never reordered.
        engine.register(SubsystemSlot::Feed, Box::new(FeedSubsystem::new(threshold)));
        engine.register(SubsystemSlot::Metrics, Box::new(MetricsSubsystem::new(drift)));
        engine
    }

    /// Fully wired engine with default config and a fixed start time,
    /// so two test engines with the same seed produce equal snapshots.
    pub fn build_test(seed: u64) -> Self {
        let epoch = Utc
            .with_ymd_and_hms(2024, 1, 1, 9, 0, 0)
            .single()
            .unwrap_or_default();
        SimEngine::build(seed, SimConfig::default(), epoch)
    }

    /// Register a subsystem. Call in the documented execution order.
    pub fn register(&mut self, slot: SubsystemSlot, subsystem: Box<dyn TickSubsystem>) {
        self.subsystems.push((slot, subsystem));
    }

    pub fn state(&self) -> &DashboardState {
        &self.state
    }

    /// Owned copy of the current state for readers on other threads.
    pub fn snapshot(&self) -> DashboardState {
        self.state.clone()
    }

    pub fn config(&self) -> &SimConfig {
        &self.config
    }

    pub fn is_running(&self) -> bool {
        self.state.is_running()
    }

    /// Advance one tick. This is the core simulation step.
    /// A stopped engine ignores the call and reports no events.
    pub fn tick(&mut self) -> SimResult<Vec<SimEvent>> {
        if !self.state.is_running() {
            log::debug!("tick ignored: simulation stopped");
            return Ok(vec![]);
        }

        let mut draft = self.state.clone();
        let current_tick = draft.clock.advance();
        let mut tick_events: Vec<SimEvent> = vec![SimEvent::TickStarted { tick: current_tick }];

        // Each subsystem sees all events emitted so far this tick.
        for (slot, subsystem) in &mut self.subsystems {
            let mut rng = self.rng_bank.for_subsystem_at_tick(*slot, current_tick);
            let new_events = subsystem.update(current_tick, &mut draft, &tick_events, &mut rng)?;
            log::debug!(
                "tick={current_tick} subsystem={} stream={} emitted {}",
                subsystem.name(),
                rng.name,
                new_events.len()
            );
            tick_events.extend(new_events);
        }

        let version = self.commit(draft);
        tick_events.push(SimEvent::TickCompleted { tick: current_tick, version });

        log_events("tick", &tick_events);
        Ok(tick_events)
    }

    /// Run n ticks in a loop. Used for testing and fast-forward.
    /// Leaves the running flag as it found it.
    pub fn run_ticks(&mut self, n: u64) -> SimResult<()> {
        let was_running = self.is_running();
        self.start()?;
        for _ in 0..n {
            self.tick()?;
        }
        if !was_running {
            self.stop()?;
        }
        Ok(())
    }

    /// Set the running flag. Starting a running engine is a no-op.
    pub fn start(&mut self) -> SimResult<Vec<SimEvent>> {
        if self.state.is_running() {
            return Ok(vec![]);
        }
        let mut draft = self.state.clone();
        draft.clock.start();
        let tick = draft.clock.current_tick;
        self.commit(draft);

        log::info!("simulation started at tick {tick}");
        Ok(vec![SimEvent::SimulationStarted { tick }])
    }

    /// Clear the running flag. Stopping a stopped engine is a no-op.
    pub fn stop(&mut self) -> SimResult<Vec<SimEvent>> {
        if !self.state.is_running() {
            return Ok(vec![]);
        }
        let mut draft = self.state.clone();
        draft.clock.stop();
        let tick = draft.clock.current_tick;
        self.commit(draft);

        log::info!("simulation stopped at tick {tick}");
        Ok(vec![SimEvent::SimulationStopped { tick }])
    }

    pub fn apply_scenario(&mut self, key: &str) -> SimResult<Vec<SimEvent>> {
        let key = ScenarioKey::parse(key)?;
        self.apply_scenario_key(key)
    }

    /// Replace metrics and insights from the preset and push every
    /// customer through its health transform, all in one publish.
    pub fn apply_scenario_key(&mut self, key: ScenarioKey) -> SimResult<Vec<SimEvent>> {
        let scenario = key.preset();
        let mut draft = self.state.clone();

        let customers: Vec<Customer> = draft
            .customers
            .iter()
            .map(|c| scenario.health_transform.apply_to(c))
            .collect();
        let customers_changed = customers
            .iter()
            .zip(&draft.customers)
            .filter(|(new, old)| new.health() != old.health())
            .count();

        draft.metrics = scenario.metrics;
        draft.insights = scenario.insights;
        draft.customers = customers;
        draft.active_scenario = Some(key);
        let tick = draft.clock.current_tick;
        self.commit(draft);

        log::info!("scenario '{}' applied ({customers_changed} customers changed)", scenario.name);
        Ok(vec![SimEvent::ScenarioApplied { tick, scenario: key, customers_changed }])
    }

    /// Set one customer's health and recompute its risk. Other customers
    /// are untouched. Unknown ids are rejected with `CustomerNotFound`.
    pub fn set_customer_health(&mut self, customer_id: &str, health: u8) -> SimResult<Vec<SimEvent>> {
        let index = self
            .state
            .customers
            .iter()
            .position(|c| c.id == customer_id)
            .ok_or_else(|| SimError::CustomerNotFound { customer_id: customer_id.to_string() })?;

        let mut draft = self.state.clone();
        let old_health = draft.customers[index].health();
        draft.customers[index] = draft.customers[index].with_health(health);
        let new_health = draft.customers[index].health();
        let tick = draft.clock.current_tick;
        self.commit(draft);

        log::info!("customer {customer_id} health {old_health} -> {new_health}");
        Ok(vec![SimEvent::CustomerHealthSet {
            tick,
            customer_id: customer_id.to_string(),
            old_health,
            new_health,
        }])
    }

    pub fn set_metric_override(&mut self, field: &str, value: f64) -> SimResult<Vec<SimEvent>> {
        let field = MetricField::parse(field)?;
        self.set_metric(field, value)
    }

    /// Replace one metric directly. Drift bands do not apply here.
    pub fn set_metric(&mut self, field: MetricField, value: f64) -> SimResult<Vec<SimEvent>> {
        let mut draft = self.state.clone();
        let old_value = draft.metrics.get(field);
        draft.metrics = draft.metrics.with_field(field, value);
        let new_value = draft.metrics.get(field);
        let tick = draft.clock.current_tick;
        self.commit(draft);

        log::info!("metric {field} overridden {old_value} -> {new_value}");
        Ok(vec![SimEvent::MetricOverridden { tick, field, old_value, new_value }])
    }

    pub fn trigger_event(&mut self, key: &str) -> SimResult<Vec<SimEvent>> {
        let key = TriggerKey::parse(key)?;
        self.trigger(key)
    }

    /// Publish a named canned event. Allowed while stopped.
    pub fn trigger(&mut self, key: TriggerKey) -> SimResult<Vec<SimEvent>> {
        let mut draft = self.state.clone();
        let event = draft.publish(&key.template());
        let tick = draft.clock.current_tick;
        self.commit(draft);

        log::info!("event '{key}' triggered as {}", event.id);
        Ok(vec![SimEvent::FeedEventPublished { tick, trigger: Some(key), event }])
    }

    /// Dispatch an operator command. Rejections are logged and returned;
    /// state is unchanged when this returns an error.
    pub fn apply_command(&mut self, command: &OperatorCommand) -> SimResult<Vec<SimEvent>> {
        let result = match command {
            OperatorCommand::Start => self.start(),
            OperatorCommand::Stop => self.stop(),
            OperatorCommand::ApplyScenario { scenario } => self.apply_scenario(scenario),
            OperatorCommand::SetCustomerHealth { customer_id, health } => {
                self.set_customer_health(customer_id, *health)
            }
            OperatorCommand::SetMetric { field, value } => self.set_metric_override(field, *value),
            OperatorCommand::TriggerEvent { event } => self.trigger_event(event),
        };
        match &result {
            Ok(events) => log_events(command.name(), events),
            Err(e) => log::warn!("command '{}' rejected: {e}", command.name()),
        }
        result
    }

    fn commit(&mut self, mut draft: DashboardState) -> Version {
        draft.version = self.state.version + 1;
        let version = draft.version;
        self.state = draft;
        version
    }
}

/// One debug line per notification, keyed by its stable type name.
fn log_events(source: &str, events: &[SimEvent]) {
    for event in events {
        log::debug!("{source}: {}", event.type_name());
    }
}
