use crate::clock::DEFAULT_TICK_PERIOD_MS;
use serde::{Deserialize, Serialize};

/// Feed emission fires when a uniform draw is strictly above this value.
pub const DEFAULT_EVENT_THRESHOLD: f64 = 0.7;
pub const DEFAULT_FEED_CAPACITY: usize = 5;
/// One day.
pub const MAX_TICK_PERIOD_MS: u64 = 86_400_000;

/// Per-tick random walk of one metric: a symmetric step of at most
/// `amplitude`, then clamped into `[min, max]`.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct DriftBand {
    pub amplitude: f64,
    pub min: f64,
    #[serde(default)]
    pub max: Option<f64>,
}

impl DriftBand {
    pub const fn floor_only(amplitude: f64, min: f64) -> Self {
        Self { amplitude, min, max: None }
    }

    pub const fn bounded(amplitude: f64, min: f64, max: f64) -> Self {
        Self { amplitude, min, max: Some(max) }
    }

    pub fn clamp(&self, value: f64) -> f64 {
        let floored = value.max(self.min);
        match self.max {
            Some(max) => floored.min(max),
            None => floored,
        }
    }

    pub fn contains(&self, value: f64) -> bool {
        value >= self.min && self.max.map_or(true, |max| value <= max)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DriftConfig {
    pub daily_users:       DriftBand,
    pub api_response_time: DriftBand,
    pub mrr:               DriftBand,
    pub pipeline_value:    DriftBand,
}

impl Default for DriftConfig {
    fn default() -> Self {
        Self {
            daily_users:       DriftBand::floor_only(20.0, 1_800.0),
            api_response_time: DriftBand::bounded(7.5, 50.0, 200.0),
            mrr:               DriftBand::floor_only(1_000.0, 100_000.0),
            pipeline_value:    DriftBand::floor_only(5_000.0, 500_000.0),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SimConfig {
    #[serde(default = "default_tick_period_ms")]
    pub tick_period_ms: u64,
    #[serde(default = "default_event_threshold")]
    pub event_threshold: f64,
    #[serde(default = "default_feed_capacity")]
    pub feed_capacity: usize,
    #[serde(default)]
    pub drift: DriftConfig,
}

fn default_tick_period_ms() -> u64 { DEFAULT_TICK_PERIOD_MS }
fn default_event_threshold() -> f64 { DEFAULT_EVENT_THRESHOLD }
fn default_feed_capacity() -> usize { DEFAULT_FEED_CAPACITY }

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            tick_period_ms:  DEFAULT_TICK_PERIOD_MS,
            event_threshold: DEFAULT_EVENT_THRESHOLD,
            feed_capacity:   DEFAULT_FEED_CAPACITY,
            drift:           DriftConfig::default(),
        }
    }
}

impl SimConfig {
    /// Load from a JSON file. Missing keys fall back to the defaults.
    /// In tests, use SimConfig::default().
    pub fn load(path: &str) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| anyhow::anyhow!("Cannot read {path}: {e}"))?;
        let config: SimConfig = serde_json::from_str(&content)
            .map_err(|e| anyhow::anyhow!("Cannot parse {path}: {e}"))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> anyhow::Result<()> {
        if self.tick_period_ms == 0 || self.tick_period_ms > MAX_TICK_PERIOD_MS {
            anyhow::bail!(
                "tick_period_ms must be in 1..={MAX_TICK_PERIOD_MS}, got {}",
                self.tick_period_ms
            );
        }
        if !(0.0..=1.0).contains(&self.event_threshold) {
            anyhow::bail!("event_threshold must be in [0, 1], got {}", self.event_threshold);
        }
        if self.feed_capacity == 0 {
            anyhow::bail!("feed_capacity must be > 0");
        }
        for (name, band) in [
            ("daily_users", &self.drift.daily_users),
            ("api_response_time", &self.drift.api_response_time),
            ("mrr", &self.drift.mrr),
            ("pipeline_value", &self.drift.pipeline_value),
        ] {
            if band.amplitude < 0.0 {
                anyhow::bail!("drift.{name}.amplitude must be >= 0");
            }
            if band.max.is_some_and(|max| max < band.min) {
                anyhow::bail!("drift.{name}: max below min");
            }
        }
        Ok(())
    }
}
