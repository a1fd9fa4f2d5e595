use thiserror::Error;

/// Rule-engine construction errors.
#[derive(Error, Debug)]
pub enum RuleError {
    #[error("invalid sensitive path pattern '{pattern}': {source}")]
    InvalidPattern {
        pattern: String,
        #[source]
        source: globset::Error,
    },

    #[error("failed to build sensitive path matcher: {0}")]
    MatcherBuild(#[from] globset::Error),
}
