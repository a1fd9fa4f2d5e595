//! Tier 2: the suspicion rule set.
//!
//! Seven independent heuristics, each side-effect-free and
//! order-independent. A rule is anything implementing [`Rule`];
//! [`default_rules`] returns the built-in registry, and new rules slot in
//! without touching the aggregator or pipeline. A rule that cannot see the
//! data it needs skips and surfaces a [`DegradedSignal`] instead of
//! guessing either way.

pub mod account;
pub mod context;
pub mod deps;
pub mod diff;
pub mod error;
pub mod paths;
pub mod sensitive;
pub mod temporal;
pub mod tests_ratio;
pub mod types;

#[cfg(test)]
mod tests;

pub use account::{FirstContributionRule, NewAccountRule};
pub use context::RuleContext;
pub use deps::UnjustifiedDepsRule;
pub use diff::LargeDiffHidingRule;
pub use error::RuleError;
pub use paths::SensitivePathsRule;
pub use sensitive::SensitiveMatcher;
pub use temporal::TemporalClusteringRule;
pub use tests_ratio::LowTestRatioRule;
pub use types::{DegradedSignal, RuleOutcome, Severity, SuspicionFlag};

use tracing::debug;

use crate::model::PullRequest;

/// Stable rule identifiers. Keys for weight overrides and sub-score
/// projections.
pub const NEW_ACCOUNT: &str = "new_account";
pub const FIRST_CONTRIBUTION: &str = "first_contribution";
pub const SENSITIVE_PATHS: &str = "sensitive_paths";
pub const LOW_TEST_RATIO: &str = "low_test_ratio";
pub const UNJUSTIFIED_DEPS: &str = "unjustified_deps";
pub const LARGE_DIFF_HIDING: &str = "large_diff_hiding";
pub const TEMPORAL_CLUSTERING: &str = "temporal_clustering";

/// One suspicion heuristic.
///
/// Implementations must be pure: no I/O, no mutation, the same inputs
/// always produce the same outcome. That keeps the registry free to
/// evaluate in any order, or in parallel across PRs, without changing
/// results.
pub trait Rule: Send + Sync {
    /// Stable identifier for this rule.
    fn name(&self) -> &'static str;

    /// Evaluates the rule against one PR.
    fn evaluate(&self, pr: &PullRequest, ctx: &RuleContext<'_>) -> RuleOutcome;
}

/// The built-in seven-rule registry.
pub fn default_rules() -> Vec<Box<dyn Rule>> {
    vec![
        Box::new(NewAccountRule),
        Box::new(FirstContributionRule),
        Box::new(SensitivePathsRule),
        Box::new(LowTestRatioRule),
        Box::new(UnjustifiedDepsRule),
        Box::new(LargeDiffHidingRule),
        Box::new(TemporalClusteringRule),
    ]
}

/// Runs every rule in `rules` against `pr`, splitting outcomes into fired
/// flags and degraded signals.
///
/// Flags come back sorted by severity (highest first) then rule id, and
/// degraded signals by stage, so the output is canonical regardless of
/// registry order.
pub fn evaluate_all(
    rules: &[Box<dyn Rule>],
    pr: &PullRequest,
    ctx: &RuleContext<'_>,
) -> (Vec<SuspicionFlag>, Vec<DegradedSignal>) {
    let mut flags = Vec::new();
    let mut degraded = Vec::new();

    for rule in rules {
        match rule.evaluate(pr, ctx) {
            RuleOutcome::Flagged(flag) => {
                debug!(
                    pr_number = pr.number,
                    rule = rule.name(),
                    severity = %flag.severity,
                    "Rule fired"
                );
                flags.push(flag);
            }
            RuleOutcome::Clear => {}
            RuleOutcome::Skipped { reason } => {
                debug!(
                    pr_number = pr.number,
                    rule = rule.name(),
                    reason = %reason,
                    "Rule skipped"
                );
                degraded.push(DegradedSignal::new(rule.name(), reason));
            }
        }
    }

    flags.sort_by(|a, b| {
        b.severity
            .cmp(&a.severity)
            .then_with(|| a.rule_id.cmp(&b.rule_id))
    });
    degraded.sort_by(|a, b| a.stage.cmp(&b.stage));

    (flags, degraded)
}
