use chrono::{DateTime, Utc};

use crate::config::TriageConfig;
use crate::model::PullRequest;

use super::sensitive::SensitiveMatcher;

/// Read-only evaluation context shared by every rule.
///
/// Holds borrows only, so one context is cheaply shared across concurrent
/// per-PR evaluations. `reference_time` is fixed once per run; rules measure
/// ages and windows against it instead of sampling the wall clock, which
/// keeps repeated runs over the same batch bit-identical.
#[derive(Debug, Clone, Copy)]
pub struct RuleContext<'a> {
    pub config: &'a TriageConfig,
    pub sensitive: &'a SensitiveMatcher,
    /// Other PRs in the trailing window. The evaluated PR itself may be
    /// present; rules skip it by number.
    pub recent_prs: &'a [PullRequest],
    pub reference_time: DateTime<Utc>,
}

impl<'a> RuleContext<'a> {
    pub fn new(
        config: &'a TriageConfig,
        sensitive: &'a SensitiveMatcher,
        recent_prs: &'a [PullRequest],
        reference_time: DateTime<Utc>,
    ) -> Self {
        Self {
            config,
            sensitive,
            recent_prs,
            reference_time,
        }
    }

    /// Returns `true` when the author reads as a newcomer: account younger
    /// than the configured floor, or no previously merged PRs on this
    /// repository. Unknown fields never qualify.
    pub fn author_qualifies(&self, pr: &PullRequest) -> bool {
        let new_account = pr
            .author
            .account_age_days(self.reference_time)
            .is_some_and(|age| age < self.config.new_account_days);
        let first_contribution = pr.author.merged_pr_count.is_some_and(|count| count == 0);
        new_account || first_contribution
    }
}
