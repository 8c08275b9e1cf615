//! Start/stop, metric overrides and command dispatch.

use chrono::{TimeZone, Utc};
use opsdesk_core::{
    command::OperatorCommand,
    config::SimConfig,
    engine::SimEngine,
    error::SimError,
    event::SimEvent,
    metrics::MetricField,
    snapshot::{StatusSummary, STATUS_READY, STATUS_RUNNING},
};

#[test]
fn stop_twice_leaves_engine_stopped_and_ticks_inert() {
    let mut engine = SimEngine::build_test(8);
    engine.start().unwrap();
    engine.tick().unwrap();

    assert_eq!(engine.stop().unwrap().len(), 1);
    let after_first_stop = engine.snapshot();
    assert!(engine.stop().unwrap().is_empty(), "second stop must be a no-op");

    assert!(!engine.is_running());
    assert!(engine.tick().unwrap().is_empty());
    assert_eq!(engine.snapshot(), after_first_stop);
    assert_eq!(engine.state().clock.current_tick, 1);
}

#[test]
fn start_is_idempotent() {
    let mut engine = SimEngine::build_test(8);

    assert!(matches!(
        engine.start().unwrap().as_slice(),
        [SimEvent::SimulationStarted { tick: 0 }]
    ));
    let version = engine.state().version;
    assert!(engine.start().unwrap().is_empty());
    assert_eq!(engine.state().version, version);
}

#[test]
fn run_ticks_restores_running_flag() {
    let mut engine = SimEngine::build_test(8);

    engine.run_ticks(4).unwrap();
    assert!(!engine.is_running());
    assert_eq!(engine.state().clock.current_tick, 4);

    engine.start().unwrap();
    engine.run_ticks(2).unwrap();
    assert!(engine.is_running());
    assert_eq!(engine.state().clock.current_tick, 6);
}

/// Each tick moves the displayed time forward by one period.
#[test]
fn tick_advances_timestamp_by_period() {
    let mut engine = SimEngine::build_test(8);
    let t0 = engine.state().clock.now;

    engine.run_ticks(10).unwrap();

    assert_eq!(engine.state().clock.now - t0, chrono::Duration::seconds(30));
}

#[test]
fn metric_override_bypasses_clamps() {
    let mut engine = SimEngine::build_test(8);

    engine.set_metric_override("apiResponseTime", 300.0).unwrap();
    engine.set_metric_override("mrr", 50_000.0).unwrap();
    engine.set_metric(MetricField::DailyUsers, 1_000.0).unwrap();

    let m = engine.state().metrics;
    assert_eq!(m.api_response_time, 300.0);
    assert_eq!(m.mrr, 50_000.0);
    assert_eq!(m.daily_users, 1_000);
}

#[test]
fn unknown_metric_field_is_rejected() {
    let mut engine = SimEngine::build_test(8);
    let before = engine.snapshot();

    let err = engine.set_metric_override("happiness", 1.0).unwrap_err();

    assert!(matches!(err, SimError::UnknownMetricField { .. }));
    assert_eq!(engine.snapshot(), before);
}

/// Commands round-trip through JSON the way the runner receives them.
#[test]
fn commands_dispatch_from_json() {
    let mut engine = SimEngine::build_test(8);
    let lines = [
        r#"{"cmd":"apply_scenario","scenario":"growth"}"#,
        r#"{"cmd":"set_customer_health","customer_id":"CUST-1002","health":30}"#,
        r#"{"cmd":"set_metric","field":"churn_risk","value":4.5}"#,
        r#"{"cmd":"trigger_event","event":"expansion"}"#,
        r#"{"cmd":"start"}"#,
    ];

    for line in lines {
        let command: OperatorCommand = serde_json::from_str(line).unwrap();
        engine.apply_command(&command).unwrap();
    }

    let state = engine.state();
    assert!(state.is_running());
    assert_eq!(state.metrics.churn_risk, 4.5);
    assert_eq!(state.customer("CUST-1002").unwrap().health(), 30);
    assert_eq!(state.events.latest().unwrap().title, "Expansion Signal");
    assert_eq!(state.version, 5);
}

#[test]
fn rejected_command_keeps_version() {
    let mut engine = SimEngine::build_test(8);
    let command = OperatorCommand::TriggerEvent { event: "nope".into() };

    let err = engine.apply_command(&command).unwrap_err();

    assert!(err.is_rejection());
    assert_eq!(engine.state().version, 0);
}

#[test]
fn status_summary_tracks_running_flag() {
    let mut engine = SimEngine::build_test(8);
    assert_eq!(StatusSummary::of(engine.state()).status, STATUS_READY);

    engine.start().unwrap();
    let summary = StatusSummary::of(engine.state());
    assert_eq!(summary.status, STATUS_RUNNING);
    assert_eq!(summary.critical_customers, 1);
}

#[test]
fn sample_config_file_matches_defaults() {
    let path = concat!(env!("CARGO_MANIFEST_DIR"), "/../data/sim_config.json");
    let config = SimConfig::load(path).expect("load sample config");
    assert_eq!(config, SimConfig::default());
}

/// A period too long for the calendar holds the timestamp; tick still
/// completes instead of panicking.
#[test]
fn oversized_period_does_not_panic_on_tick() {
    let config = SimConfig { tick_period_ms: 100_000_000_000_000_000, ..SimConfig::default() };
    let t0 = Utc.with_ymd_and_hms(2024, 1, 1, 9, 0, 0).unwrap();
    let mut engine = SimEngine::build(8, config, t0);
    assert_eq!(engine.config().tick_period_ms, 100_000_000_000_000_000);

    engine.run_ticks(3).unwrap();

    assert_eq!(engine.state().clock.current_tick, 3);
    assert_eq!(engine.state().clock.now, t0);
}

#[test]
fn tick_notifications_carry_stable_type_names() {
    let mut engine = SimEngine::build_test(8);
    engine.start().unwrap();

    let names: Vec<&str> = engine.tick().unwrap().iter().map(SimEvent::type_name).collect();

    assert_eq!(names.first(), Some(&"tick_started"));
    assert_eq!(names.last(), Some(&"tick_completed"));
    assert!(names.contains(&"metrics_drifted"));
}
