//! Configuration error types.

use thiserror::Error;

/// Errors that can occur during configuration loading and validation.
///
/// All of these are fatal at startup. A malformed value set in the
/// environment is never silently replaced with a default mid-run.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A threshold is outside `(0, 1]`.
    #[error("invalid {name} '{value}': must be greater than 0 and at most 1")]
    InvalidThreshold { name: &'static str, value: f64 },

    /// A ratio is outside `[0, 1)` or not finite.
    #[error("invalid {name} '{value}': must be a finite value in [0, 1)")]
    InvalidRatio { name: &'static str, value: f64 },

    /// A severity or rule weight is negative or not finite.
    #[error("invalid weight for '{name}' ({value}): must be finite and non-negative")]
    InvalidWeight { name: String, value: f64 },

    /// A count or duration setting that must be at least 1.
    #[error("invalid {name} '{value}': must be at least 1")]
    NonPositive { name: &'static str, value: i64 },

    /// Temporal cluster sizes below the meaningful minimum.
    #[error("invalid {name} '{value}': must be at least 2")]
    ClusterSizeTooSmall { name: &'static str, value: usize },

    /// An environment variable held a value that is not a valid float.
    #[error("failed to parse {var}='{value}' as a number: {source}")]
    FloatParseError {
        var: &'static str,
        value: String,
        #[source]
        source: std::num::ParseFloatError,
    },

    /// An environment variable held a value that is not a valid integer.
    #[error("failed to parse {var}='{value}' as an integer: {source}")]
    IntParseError {
        var: &'static str,
        value: String,
        #[source]
        source: std::num::ParseIntError,
    },

    /// A rule-weight override entry was not of the form `rule=weight`.
    #[error("malformed rule-weight entry '{entry}': expected 'rule_name=weight'")]
    InvalidWeightSpec { entry: String },
}
