use crate::{
    config::DriftConfig,
    error::SimResult,
    event::SimEvent,
    rng::SubsystemRng,
    state::DashboardState,
    subsystem::TickSubsystem,
    types::Tick,
};

/// Random-walks the headline metrics inside their drift bands.
pub struct MetricsSubsystem {
    drift: DriftConfig,
}

impl MetricsSubsystem {
    pub fn new(drift: DriftConfig) -> Self {
        Self { drift }
    }
}

impl TickSubsystem for MetricsSubsystem {
    fn name(&self) -> &'static str { "metrics" }

    fn update(
        &mut self,
        tick: Tick,
        draft: &mut DashboardState,
        _events_in: &[SimEvent],
        rng: &mut SubsystemRng,
    ) -> SimResult<Vec<SimEvent>> {
        draft.metrics = draft.metrics.drifted(&self.drift, rng);

        log::debug!(
            "tick={tick} metrics: mrr={:.0} users={} pipeline={:.0} api={:.1}ms",
            draft.metrics.mrr,
            draft.metrics.daily_users,
            draft.metrics.pipeline_value,
            draft.metrics.api_response_time
        );

        Ok(vec![SimEvent::MetricsDrifted { tick, metrics: draft.metrics }])
    }
}
