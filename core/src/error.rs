use thiserror::Error;

/// Every condition here is local and non-fatal: a rejected transition
/// leaves the dashboard state exactly as it was.
#[derive(Error, Debug)]
pub enum SimError {
    #[error("Unknown scenario '{key}'")]
    UnknownScenario { key: String },

    #[error("Unknown event key '{key}'")]
    UnknownEventKey { key: String },

    #[error("Unknown metric field '{field}'")]
    UnknownMetricField { field: String },

    #[error("Customer '{customer_id}' not found")]
    CustomerNotFound { customer_id: String },

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl SimError {
    /// True for the rejected-input conditions an operator can trigger.
    pub fn is_rejection(&self) -> bool {
        matches!(
            self,
            Self::UnknownScenario { .. }
                | Self::UnknownEventKey { .. }
                | Self::UnknownMetricField { .. }
                | Self::CustomerNotFound { .. }
        )
    }
}

pub type SimResult<T> = Result<T, SimError>;
