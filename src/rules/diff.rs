use super::context::RuleContext;
use super::types::{RuleOutcome, Severity, SuspicionFlag};
use super::{LARGE_DIFF_HIDING, Rule};
use crate::model::PullRequest;

/// Flags large diffs whose sensitive-path edits are a disproportionately
/// small slice of the whole.
///
/// A large diff with zero sensitive lines never fires. The signal is
/// sensitive change buried in bulk, not a big diff by itself.
pub struct LargeDiffHidingRule;

impl Rule for LargeDiffHidingRule {
    fn name(&self) -> &'static str {
        LARGE_DIFF_HIDING
    }

    fn evaluate(&self, pr: &PullRequest, ctx: &RuleContext<'_>) -> RuleOutcome {
        let total_changes = pr.total_changes();
        if total_changes <= ctx.config.large_diff_min_changes {
            return RuleOutcome::Clear;
        }

        let sensitive_changes: u64 = pr
            .files
            .iter()
            .filter(|f| ctx.sensitive.is_match(&f.path))
            .map(|f| f.changes())
            .sum();

        if sensitive_changes == 0 {
            return RuleOutcome::Clear;
        }

        let ratio = sensitive_changes as f64 / total_changes as f64;
        if ratio >= ctx.config.buried_sensitive_ratio {
            return RuleOutcome::Clear;
        }

        RuleOutcome::Flagged(SuspicionFlag::new(
            LARGE_DIFF_HIDING,
            Severity::High,
            "Sensitive changes buried in large diff",
            format!(
                "Large diff ({total_changes} changed lines) with only {:.1}% \
                 touching sensitive paths",
                ratio * 100.0,
            ),
            format!("total_changes={total_changes}, sensitive_changes={sensitive_changes}"),
        ))
    }
}
