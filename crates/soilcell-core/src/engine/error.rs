use super::config::ConfigError;
use crate::core::calendar::CalendarError;
use crate::core::models::facility::ParameterError;
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum EngineError {
    /// An input violates its invariant. Raised before the search begins.
    #[error("Invalid parameter '{parameter}': {reason}")]
    InvalidParameter {
        parameter: &'static str,
        reason: String,
    },

    /// An internal arithmetic precondition was violated; signals a defect rather than bad input.
    #[error("Configuration error: {source}")]
    Configuration {
        #[from]
        source: CalendarError,
    },

    /// Every enumerated candidate was filtered out. Recoverable by widening the search ranges.
    #[error(
        "No feasible configuration for {daily_volume_cy} CY/day with cell volumes {volume_min_cy}..={volume_max_cy} CY and cell counts {count_min}..={count_max} ({examined} candidates examined)"
    )]
    NoFeasibleConfiguration {
        daily_volume_cy: f64,
        volume_min_cy: f64,
        volume_max_cy: f64,
        count_min: u32,
        count_max: u32,
        examined: usize,
    },
}

impl EngineError {
    /// Whether the caller can recover by adjusting the search rather than the inputs.
    pub fn is_recoverable(&self) -> bool {
        matches!(self, EngineError::NoFeasibleConfiguration { .. })
    }

    /// The offending parameter, when the error names one.
    pub fn parameter(&self) -> Option<&'static str> {
        match self {
            EngineError::InvalidParameter { parameter, .. } => Some(*parameter),
            _ => None,
        }
    }
}

impl From<ParameterError> for EngineError {
    fn from(err: ParameterError) -> Self {
        EngineError::InvalidParameter {
            parameter: err.parameter,
            reason: err.reason,
        }
    }
}

impl From<ConfigError> for EngineError {
    fn from(err: ConfigError) -> Self {
        match err {
            ConfigError::MissingParameter(parameter) => EngineError::InvalidParameter {
                parameter,
                reason: "a value is required".to_string(),
            },
            ConfigError::Invalid(inner) => inner.into(),
        }
    }
}
