//! Headline dashboard metrics and their per-tick random walk.

use crate::{
    config::DriftConfig,
    error::{SimError, SimResult},
    rng::SubsystemRng,
};
use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct Metrics {
    pub mrr:               f64,
    pub daily_users:       i64,
    pub pipeline_value:    f64,
    /// Milliseconds.
    pub api_response_time: f64,
    pub churn_risk:        f64,
}

impl Metrics {
    pub fn seed() -> Self {
        Self {
            mrr:               129_700.0,
            daily_users:       2_223,
            pipeline_value:    618_000.0,
            api_response_time: 83.0,
            churn_risk:        3.0,
        }
    }

    /// One tick of drift. Each metric gets an independent draw, in a fixed
    /// order: daily users, API latency, MRR, pipeline. Integer-valued
    /// metrics floor their step before clamping. `churn_risk` never drifts.
    pub fn drifted(&self, drift: &DriftConfig, rng: &mut SubsystemRng) -> Self {
        let users_step = rng.symmetric(drift.daily_users.amplitude).floor();
        let latency_step = rng.symmetric(drift.api_response_time.amplitude);
        let mrr_step = rng.symmetric(drift.mrr.amplitude).floor();
        let pipeline_step = rng.symmetric(drift.pipeline_value.amplitude).floor();

        Self {
            daily_users: drift
                .daily_users
                .clamp(self.daily_users as f64 + users_step) as i64,
            api_response_time: drift
                .api_response_time
                .clamp(self.api_response_time + latency_step),
            mrr: drift.mrr.clamp(self.mrr + mrr_step),
            pipeline_value: drift.pipeline_value.clamp(self.pipeline_value + pipeline_step),
            churn_risk: self.churn_risk,
        }
    }

    /// Direct replacement of one field. No clamping: manual control is
    /// allowed to leave the drift bands.
    pub fn with_field(&self, field: MetricField, value: f64) -> Self {
        let mut next = *self;
        match field {
            MetricField::Mrr             => next.mrr = value,
            MetricField::DailyUsers      => next.daily_users = value.floor() as i64,
            MetricField::PipelineValue   => next.pipeline_value = value,
            MetricField::ApiResponseTime => next.api_response_time = value,
            MetricField::ChurnRisk       => next.churn_risk = value,
        }
        next
    }

    pub fn get(&self, field: MetricField) -> f64 {
        match field {
            MetricField::Mrr             => self.mrr,
            MetricField::DailyUsers      => self.daily_users as f64,
            MetricField::PipelineValue   => self.pipeline_value,
            MetricField::ApiResponseTime => self.api_response_time,
            MetricField::ChurnRisk       => self.churn_risk,
        }
    }

    /// True when every drifting metric sits inside its band.
    pub fn within_bands(&self, drift: &DriftConfig) -> bool {
        drift.daily_users.contains(self.daily_users as f64)
            && drift.api_response_time.contains(self.api_response_time)
            && drift.mrr.contains(self.mrr)
            && drift.pipeline_value.contains(self.pipeline_value)
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum MetricField {
    Mrr,
    DailyUsers,
    PipelineValue,
    ApiResponseTime,
    ChurnRisk,
}

impl MetricField {
    pub const ALL: [MetricField; 5] = [
        Self::Mrr,
        Self::DailyUsers,
        Self::PipelineValue,
        Self::ApiResponseTime,
        Self::ChurnRisk,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Mrr             => "mrr",
            Self::DailyUsers      => "daily_users",
            Self::PipelineValue   => "pipeline_value",
            Self::ApiResponseTime => "api_response_time",
            Self::ChurnRisk       => "churn_risk",
        }
    }

    pub fn parse(field: &str) -> SimResult<Self> {
        field.parse()
    }
}

impl fmt::Display for MetricField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MetricField {
    type Err = SimError;

    /// Accepts snake_case and the dashboard's camelCase names.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "mrr"                                     => Ok(Self::Mrr),
            "daily_users" | "dailyUsers"              => Ok(Self::DailyUsers),
            "pipeline_value" | "pipelineValue"        => Ok(Self::PipelineValue),
            "api_response_time" | "apiResponseTime"   => Ok(Self::ApiResponseTime),
            "churn_risk" | "churnRisk"                => Ok(Self::ChurnRisk),
            other => Err(SimError::UnknownMetricField { field: other.to_string() }),
        }
    }
}
