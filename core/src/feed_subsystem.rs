use crate::{
    error::SimResult,
    event::SimEvent,
    feed::TICK_EVENTS,
    rng::SubsystemRng,
    state::DashboardState,
    subsystem::TickSubsystem,
    types::Tick,
};

/// Emits at most one canned event per tick, when a uniform draw lands
/// strictly above `threshold`.
pub struct FeedSubsystem {
    threshold: f64,
}

impl FeedSubsystem {
    pub fn new(threshold: f64) -> Self {
        Self { threshold }
    }
}

impl TickSubsystem for FeedSubsystem {
    fn name(&self) -> &'static str { "feed" }

    fn update(
        &mut self,
        tick: Tick,
        draft: &mut DashboardState,
        _events_in: &[SimEvent],
        rng: &mut SubsystemRng,
    ) -> SimResult<Vec<SimEvent>> {
        let draw = rng.next_f64();
        if draw <= self.threshold {
            return Ok(vec![]);
        }

        let template = &TICK_EVENTS[rng.pick_index(TICK_EVENTS.len())];
        let event = draft.publish(template);

        log::debug!("tick={tick} feed: draw={draw:.3} -> {} '{}'", event.id, event.title);

        Ok(vec![SimEvent::FeedEventPublished { tick, trigger: None, event }])
    }
}
