//! Error type shared by the rate laws, the integration driver, the scenario sweep
//! and the configuration loader.
use thiserror::Error;

/// error types for batch reactor simulations
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ReactorError {
    /// time grid has fewer than 2 points, start >= end or non-finite bounds
    #[error("Invalid time grid: {reason}")]
    InvalidGrid { reason: String },
    /// initial state does not have the number of components the rate law expects
    #[error("Shape mismatch: rate law expects {expected} state components, initial state has {found}")]
    ShapeMismatch { expected: usize, found: usize },
    /// integrator could not reach the requested accuracy on the given interval
    #[error("Integration failed on interval [{t_start:.6e}, {t_end:.6e}]: {reason}")]
    NumericalConvergence {
        t_start: f64,
        t_end: f64,
        reason: String,
    },
    /// rate law evaluated outside of its domain
    #[error("Rate law is undefined at t = {t:.6e}: {reason}")]
    DegenerateRateLaw { t: f64, reason: String },
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),
    #[error("Configuration error: {0}")]
    Config(String),
}

impl From<serde_json::Error> for ReactorError {
    fn from(e: serde_json::Error) -> Self {
        ReactorError::Config(format!(
            "JSON error at line {}, column {}: {}",
            e.line(),
            e.column(),
            e
        ))
    }
}

impl From<std::io::Error> for ReactorError {
    fn from(e: std::io::Error) -> Self {
        ReactorError::Config(format!("I/O error: {}", e))
    }
}
