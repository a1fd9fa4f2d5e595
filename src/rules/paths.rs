use super::context::RuleContext;
use super::types::{RuleOutcome, Severity, SuspicionFlag};
use super::{Rule, SENSITIVE_PATHS};
use crate::model::PullRequest;

/// Paths listed in the evidence string before it truncates.
const MAX_EVIDENCE_PATHS: usize = 10;

/// Flags changes under security-sensitive paths.
pub struct SensitivePathsRule;

impl Rule for SensitivePathsRule {
    fn name(&self) -> &'static str {
        SENSITIVE_PATHS
    }

    fn evaluate(&self, pr: &PullRequest, ctx: &RuleContext<'_>) -> RuleOutcome {
        let matched: Vec<&str> = pr
            .changed_paths()
            .filter(|path| ctx.sensitive.is_match(path))
            .collect();

        if matched.is_empty() {
            return RuleOutcome::Clear;
        }

        let mut evidence = matched[..matched.len().min(MAX_EVIDENCE_PATHS)].join(", ");
        if matched.len() > MAX_EVIDENCE_PATHS {
            evidence.push_str(", ...");
        }

        RuleOutcome::Flagged(SuspicionFlag::new(
            SENSITIVE_PATHS,
            Severity::High,
            "Sensitive path changes",
            format!("PR modifies {} security-sensitive file(s)", matched.len()),
            evidence,
        ))
    }
}
