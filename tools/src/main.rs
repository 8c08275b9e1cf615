//! dash-runner: headless runner for the ops desk simulation.
//!
//! Usage:
//!   dash-runner --seed 12345 --ticks 100
//!   dash-runner --seed 12345 --scenario crisis --ticks 20
//!   dash-runner --seed 12345 --ipc-mode [--live] [--config data/sim_config.json]
//!
//! In IPC mode every stdin line is one JSON request and every reply is one
//! JSON line on stdout. With --live a tick timer is armed whenever the
//! simulation is running and each timed tick also emits a snapshot line.

use anyhow::{Context, Result};
use chrono::Utc;
use opsdesk_core::{
    command::OperatorCommand,
    config::SimConfig,
    engine::SimEngine,
    metrics::MetricField,
    snapshot::{SimSnapshot, StatusSummary},
    timer::{self, SharedEngine, TickTimer},
};
use std::env;
use std::io::{self, BufRead, Write};

#[derive(serde::Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum IpcRequest {
    GetState,
    Tick { count: u64 },
    Command { command: OperatorCommand },
    Quit,
}

fn main() -> Result<()> {
    env_logger::init();

    let args: Vec<String> = env::args().collect();
    let seed = parse_arg(&args, "--seed", 42u64);
    let ticks = parse_arg(&args, "--ticks", 20u64);
    let ipc_mode = args.iter().any(|a| a == "--ipc-mode");
    let live = args.iter().any(|a| a == "--live");
    let scenario = string_arg(&args, "--scenario");
    let config = match string_arg(&args, "--config") {
        Some(path) => SimConfig::load(path)?,
        None => SimConfig::default(),
    };

    let session_id = uuid::Uuid::new_v4();
    log::info!("session {session_id} seed={seed}");

    if !ipc_mode {
        println!("Ops Desk — dash-runner");
        println!("  session:   {session_id}");
        println!("  seed:      {seed}");
        println!("  ticks:     {ticks}");
        println!("  period:    {}ms", config.tick_period_ms);
        println!();
    }

    let mut engine = SimEngine::build(seed, config, Utc::now());
    if let Some(key) = scenario {
        engine
            .apply_scenario(key)
            .with_context(|| format!("applying scenario '{key}'"))?;
    }

    if ipc_mode {
        run_ipc_loop(timer::shared(engine), live)?;
    } else {
        engine.run_ticks(ticks)?;
        print_summary(&engine);
    }

    Ok(())
}

fn run_ipc_loop(engine: SharedEngine, live: bool) -> Result<()> {
    let stdin = io::stdin();
    let mut ticker: Option<TickTimer> = None;

    for line in stdin.lock().lines() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }

        let reply = {
            let mut guard = engine
                .lock()
                .map_err(|_| anyhow::anyhow!("engine lock poisoned"))?;
            handle_line(&mut guard, &line)?
        };
        match reply {
            Some(reply) => write_line(&reply)?,
            None => break,
        }

        if live {
            sync_ticker(&engine, &mut ticker)?;
        }
    }

    if let Some(mut t) = ticker.take() {
        t.cancel();
    }
    Ok(())
}

/// Apply one IPC line and build its reply. `None` means quit.
/// Malformed lines and rejected commands answer `{"error": ...}`
/// and leave the engine untouched.
fn handle_line(engine: &mut SimEngine, line: &str) -> Result<Option<String>> {
    let request: IpcRequest = match serde_json::from_str(line) {
        Ok(r) => r,
        Err(e) => return Ok(Some(error_reply(&e.to_string()))),
    };

    let reply = match request {
        IpcRequest::Quit => return Ok(None),
        IpcRequest::GetState => SimSnapshot::of(engine.state()).to_json()?,
        IpcRequest::Tick { count } => {
            engine.run_ticks(count)?;
            SimSnapshot::of(engine.state()).to_json()?
        }
        IpcRequest::Command { command } => match engine.apply_command(&command) {
            Ok(_) => SimSnapshot::of(engine.state()).to_json()?,
            Err(e) if e.is_rejection() => error_reply(&e.to_string()),
            Err(e) => return Err(e.into()),
        },
    };
    Ok(Some(reply))
}

fn error_reply(message: &str) -> String {
    serde_json::json!({ "error": message }).to_string()
}

/// Arm the timer while the simulation runs; cancel it as soon as it stops.
fn sync_ticker(engine: &SharedEngine, ticker: &mut Option<TickTimer>) -> Result<()> {
    let (running, period) = {
        let guard = engine
            .lock()
            .map_err(|_| anyhow::anyhow!("engine lock poisoned"))?;
        (guard.is_running(), guard.state().clock.period())
    };

    let armed = ticker.as_ref().is_some_and(TickTimer::is_armed);
    if running && !armed {
        *ticker = Some(TickTimer::spawn_with(engine.clone(), period, |_, snapshot| {
            match SimSnapshot::of(snapshot).to_json() {
                Ok(json) => {
                    if let Err(e) = write_line(&json) {
                        log::error!("cannot write snapshot: {e}");
                    }
                }
                Err(e) => log::error!("cannot serialize snapshot: {e}"),
            }
        }));
    } else if !running {
        if let Some(mut t) = ticker.take() {
            t.cancel();
        }
    }
    Ok(())
}

fn write_line(line: &str) -> io::Result<()> {
    let mut out = io::stdout().lock();
    writeln!(out, "{line}")?;
    out.flush()
}

fn print_summary(engine: &SimEngine) {
    let state = engine.state();
    let summary = StatusSummary::of(state);
    let m = &state.metrics;

    println!("=== RUN SUMMARY ===");
    println!("  seed:               {}", engine.rng_bank.master_seed());
    println!("  period:             {}ms", engine.config().tick_period_ms);
    println!("  final tick:         {}", state.clock.current_tick);
    println!("  version:            {}", summary.version);
    println!("  status:             {}", summary.status);
    println!("  scenario:           {}", state.active_scenario.map_or("none", |k| k.as_str()));
    println!("  critical customers: {}", summary.critical_customers);
    println!();
    println!("=== METRICS ===");
    for field in MetricField::ALL {
        println!("  {:<18} {:.1}", field.as_str(), m.get(field));
    }
    println!();
    println!(
        "=== EVENT FEED ({}/{}) ===",
        summary.events_in_feed,
        state.events.capacity()
    );
    if state.events.is_empty() {
        println!("  (no events)");
    }
    for e in state.events.entries() {
        println!(
            "  {} [{}] {} — {}",
            e.timestamp.format("%H:%M:%S"),
            e.kind.as_str(),
            e.title,
            e.message
        );
    }
}

fn parse_arg<T: std::str::FromStr + Copy>(args: &[String], flag: &str, default: T) -> T {
    args.windows(2)
        .find(|w| w[0] == flag)
        .and_then(|w| w[1].parse().ok())
        .unwrap_or(default)
}

fn string_arg<'a>(args: &'a [String], flag: &str) -> Option<&'a str> {
    args.windows(2)
        .find(|w| w[0] == flag)
        .map(|w| w[1].as_str())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reply(engine: &mut SimEngine, line: &str) -> serde_json::Value {
        let text = handle_line(engine, line).unwrap().expect("a reply line");
        serde_json::from_str(&text).unwrap()
    }

    #[test]
    fn get_state_returns_a_full_snapshot() {
        let mut engine = SimEngine::build_test(42);

        let text = handle_line(&mut engine, r#"{"type":"get_state"}"#).unwrap().unwrap();
        let snapshot: SimSnapshot = serde_json::from_str(&text).unwrap();

        assert_eq!(snapshot.state, *engine.state());
        assert_eq!(snapshot.summary.version, 0);
    }

    #[test]
    fn unknown_scenario_replies_with_error_and_keeps_version() {
        let mut engine = SimEngine::build_test(42);
        let line = r#"{"type":"command","command":{"cmd":"apply_scenario","scenario":"doom"}}"#;

        let value = reply(&mut engine, line);

        assert!(value["error"].as_str().unwrap().contains("doom"), "{value}");
        assert_eq!(engine.state().version, 0);
    }

    #[test]
    fn malformed_line_replies_with_error() {
        let mut engine = SimEngine::build_test(42);

        let value = reply(&mut engine, "{not json");

        assert!(value["error"].is_string(), "{value}");
        assert_eq!(engine.state().version, 0);
    }

    /// A rejected line does not end the session; later lines still apply.
    #[test]
    fn session_continues_after_a_rejection() {
        let mut engine = SimEngine::build_test(42);
        let lines = [
            r#"{"type":"command","command":{"cmd":"trigger_event","event":"nope"}}"#,
            r#"{"type":"command","command":{"cmd":"trigger_event","event":"deal_won"}}"#,
            r#"{"type":"tick","count":3}"#,
        ];

        let replies: Vec<_> = lines.iter().map(|l| reply(&mut engine, l)).collect();

        assert!(replies[0]["error"].is_string());
        assert_eq!(replies[1]["state"]["events"]["entries"][0]["title"], "Deal Closed");
        assert_eq!(replies[2]["state"]["clock"]["current_tick"], 3);
        assert!(!engine.is_running());
    }

    #[test]
    fn quit_ends_the_session() {
        let mut engine = SimEngine::build_test(42);
        assert!(handle_line(&mut engine, r#"{"type":"quit"}"#).unwrap().is_none());
    }
}
