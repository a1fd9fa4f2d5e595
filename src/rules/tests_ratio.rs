use super::context::RuleContext;
use super::types::{RuleOutcome, Severity, SuspicionFlag};
use super::{LOW_TEST_RATIO, Rule};
use crate::model::PullRequest;

/// Flags PRs that add substantial code with proportionally few test lines.
///
/// Tiny PRs are exempt: the rule only evaluates once added non-test code
/// exceeds `test_ratio_min_code_lines`.
pub struct LowTestRatioRule;

impl Rule for LowTestRatioRule {
    fn name(&self) -> &'static str {
        LOW_TEST_RATIO
    }

    fn evaluate(&self, pr: &PullRequest, ctx: &RuleContext<'_>) -> RuleOutcome {
        let mut code_additions: u64 = 0;
        let mut test_additions: u64 = 0;

        for file in &pr.files {
            if is_test_path(&file.path) {
                test_additions += u64::from(file.additions);
            } else {
                code_additions += u64::from(file.additions);
            }
        }

        if code_additions <= ctx.config.test_ratio_min_code_lines {
            return RuleOutcome::Clear;
        }

        let ratio = test_additions as f64 / code_additions as f64;
        let floor = ctx.config.min_test_ratio;
        if ratio >= floor {
            return RuleOutcome::Clear;
        }

        RuleOutcome::Flagged(SuspicionFlag::new(
            LOW_TEST_RATIO,
            Severity::Medium,
            "Low test coverage",
            format!(
                "Test-to-code ratio {:.1}% is below the {:.0}% floor \
                 ({test_additions} test lines / {code_additions} code lines added)",
                ratio * 100.0,
                floor * 100.0,
            ),
            format!("code_additions={code_additions}, test_additions={test_additions}"),
        ))
    }
}

/// Returns `true` when the path reads as test code: any segment starting
/// with `test` or `spec`, or carrying a `_test`/`.test`/`_spec`/`.spec`
/// marker.
pub fn is_test_path(path: &str) -> bool {
    path.split('/').any(|segment| {
        let segment = segment.to_lowercase();
        segment.starts_with("test")
            || segment.starts_with("spec")
            || segment.contains("_test")
            || segment.contains(".test")
            || segment.contains("_spec")
            || segment.contains(".spec")
    })
}
