//! Tick timer tests: ticks while running, never after cancellation.

use opsdesk_core::{
    engine::SimEngine,
    timer::{shared, TickTimer},
};
use std::{
    sync::{
        atomic::{AtomicBool, AtomicU64, Ordering},
        Arc,
    },
    thread::sleep,
    time::Duration,
};

const PERIOD: Duration = Duration::from_millis(5);

fn current_tick(engine: &opsdesk_core::timer::SharedEngine) -> u64 {
    engine.lock().unwrap().state().clock.current_tick
}

#[test]
fn timer_ticks_until_cancelled() {
    let _ = env_logger::builder().is_test(true).try_init();
    let engine = shared(SimEngine::build_test(4));
    engine.lock().unwrap().start().unwrap();

    let mut timer = TickTimer::spawn(engine.clone(), PERIOD);
    sleep(Duration::from_millis(200));
    timer.cancel();

    let after_cancel = current_tick(&engine);
    assert!(after_cancel > 0, "timer never ticked");

    sleep(Duration::from_millis(50));
    assert_eq!(current_tick(&engine), after_cancel, "ticked after cancel");
    assert!(!timer.is_armed());

    // Cancelling again is harmless.
    timer.cancel();
}

#[test]
fn timer_exits_once_engine_stops() {
    let engine = shared(SimEngine::build_test(4));
    engine.lock().unwrap().start().unwrap();

    let timer = TickTimer::spawn(engine.clone(), PERIOD);
    sleep(Duration::from_millis(50));
    engine.lock().unwrap().stop().unwrap();
    let stopped_at = current_tick(&engine);

    sleep(Duration::from_millis(100));
    assert_eq!(current_tick(&engine), stopped_at);
    assert!(!timer.is_armed(), "timer should not re-arm on a stopped engine");
}

#[test]
fn callback_sees_each_published_snapshot() {
    let engine = shared(SimEngine::build_test(4));
    engine.lock().unwrap().start().unwrap();
    let seen = Arc::new(AtomicU64::new(0));
    let empty_tick = Arc::new(AtomicBool::new(false));

    let seen_in_timer = seen.clone();
    let empty_in_timer = empty_tick.clone();
    let timer = TickTimer::spawn_with(engine.clone(), PERIOD, move |events, snapshot| {
        if events.is_empty() {
            empty_in_timer.store(true, Ordering::SeqCst);
        }
        seen_in_timer.store(snapshot.clock.current_tick, Ordering::SeqCst);
    });
    sleep(Duration::from_millis(100));
    drop(timer);

    assert!(!empty_tick.load(Ordering::SeqCst), "callback saw a tick with no events");
    let last_seen = seen.load(Ordering::SeqCst);
    assert!(last_seen > 0);
    assert_eq!(last_seen, current_tick(&engine));
}
