use thiserror::Error;

use crate::config::ConfigError;
use crate::rules::RuleError;

/// Pipeline construction errors. Running a batch never fails as a whole;
/// per-PR problems surface on the affected scorecards instead.
#[derive(Error, Debug)]
pub enum PipelineError {
    #[error("configuration rejected: {0}")]
    Config(#[from] ConfigError),

    #[error("rule setup failed: {0}")]
    Rules(#[from] RuleError),
}
