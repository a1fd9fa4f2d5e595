use super::context::RuleContext;
use super::types::{RuleOutcome, Severity, SuspicionFlag};
use super::{FIRST_CONTRIBUTION, NEW_ACCOUNT, Rule};
use crate::model::PullRequest;

/// Flags authors whose account is younger than the configured floor.
pub struct NewAccountRule;

impl Rule for NewAccountRule {
    fn name(&self) -> &'static str {
        NEW_ACCOUNT
    }

    fn evaluate(&self, pr: &PullRequest, ctx: &RuleContext<'_>) -> RuleOutcome {
        let Some(created) = pr.author.created_at else {
            return RuleOutcome::skipped("account creation date unavailable");
        };

        let age_days = (ctx.reference_time - created).num_days();
        let threshold = ctx.config.new_account_days;
        if age_days >= threshold {
            return RuleOutcome::Clear;
        }

        RuleOutcome::Flagged(SuspicionFlag::new(
            NEW_ACCOUNT,
            Severity::Medium,
            "New account",
            format!("Account created {age_days} days ago (threshold: {threshold} days)"),
            format!("account_created_at={}", created.to_rfc3339()),
        ))
    }
}

/// Flags authors with no previously merged PRs on this repository.
pub struct FirstContributionRule;

impl Rule for FirstContributionRule {
    fn name(&self) -> &'static str {
        FIRST_CONTRIBUTION
    }

    fn evaluate(&self, pr: &PullRequest, _ctx: &RuleContext<'_>) -> RuleOutcome {
        let Some(merged) = pr.author.merged_pr_count else {
            return RuleOutcome::skipped("author merge history unavailable");
        };

        if merged > 0 {
            return RuleOutcome::Clear;
        }

        RuleOutcome::Flagged(SuspicionFlag::new(
            FIRST_CONTRIBUTION,
            Severity::Medium,
            "First contribution",
            format!(
                "'{}' has no previously merged pull requests on this repository",
                pr.author.login
            ),
            "merged_pr_count=0",
        ))
    }
}
