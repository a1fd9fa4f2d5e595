use chrono::Duration;

use super::context::RuleContext;
use super::types::{RuleOutcome, Severity, SuspicionFlag};
use super::{Rule, TEMPORAL_CLUSTERING};
use crate::model::PullRequest;

/// PRs listed in the evidence string before it truncates.
const MAX_EVIDENCE_PRS: usize = 5;

/// Flags bursts of PRs from new or first-time contributors inside the
/// trailing window.
///
/// Only fires when the evaluated PR's own author qualifies as a newcomer;
/// an established maintainer landing in the middle of a burst is not the
/// burst.
pub struct TemporalClusteringRule;

impl Rule for TemporalClusteringRule {
    fn name(&self) -> &'static str {
        TEMPORAL_CLUSTERING
    }

    fn evaluate(&self, pr: &PullRequest, ctx: &RuleContext<'_>) -> RuleOutcome {
        if pr.author.created_at.is_none() && pr.author.merged_pr_count.is_none() {
            return RuleOutcome::skipped("author history unavailable");
        }
        if !ctx.author_qualifies(pr) || ctx.recent_prs.is_empty() {
            return RuleOutcome::Clear;
        }

        let window = Duration::hours(ctx.config.temporal_window_hours);
        let clustered: Vec<&PullRequest> = ctx
            .recent_prs
            .iter()
            .filter(|other| other.number != pr.number)
            .filter(|other| (pr.created_at - other.created_at).abs() < window)
            .filter(|other| ctx.author_qualifies(other))
            .collect();

        let min_cluster = if ctx.recent_prs.len() < ctx.config.temporal_small_batch_limit {
            ctx.config.temporal_min_cluster
        } else {
            ctx.config.temporal_min_cluster_large
        };

        // The evaluated PR counts toward its own burst.
        let windowed = clustered.len() + 1;
        if windowed < min_cluster {
            return RuleOutcome::Clear;
        }

        let mut evidence = clustered
            .iter()
            .take(MAX_EVIDENCE_PRS)
            .map(|p| format!("PR#{} by {}", p.number, p.author.login))
            .collect::<Vec<_>>()
            .join(", ");
        if clustered.len() > MAX_EVIDENCE_PRS {
            evidence.push_str(", ...");
        }

        RuleOutcome::Flagged(SuspicionFlag::new(
            TEMPORAL_CLUSTERING,
            Severity::Low,
            "Burst of new-contributor PRs",
            format!(
                "{windowed} pull requests from new or first-time contributors \
                 within a {}h window",
                ctx.config.temporal_window_hours,
            ),
            evidence,
        ))
    }
}
