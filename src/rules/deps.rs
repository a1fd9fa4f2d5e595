use super::context::RuleContext;
use super::types::{RuleOutcome, Severity, SuspicionFlag};
use super::{Rule, UNJUSTIFIED_DEPS};
use crate::model::PullRequest;

/// Manifest and lockfile names that declare third-party dependencies.
pub const DEPENDENCY_MANIFESTS: &[&str] = &[
    "requirements.txt",
    "package.json",
    "pyproject.toml",
    "Gemfile",
    "go.mod",
    "Cargo.toml",
    "package-lock.json",
    "yarn.lock",
    "Cargo.lock",
    "poetry.lock",
];

/// Words that count as a textual justification for touching a manifest.
pub const JUSTIFICATION_KEYWORDS: &[&str] = &[
    "depend", "upgrade", "bump", "update", "package", "library", "version",
];

/// Flags dependency-manifest changes with no justification in the PR text.
pub struct UnjustifiedDepsRule;

impl Rule for UnjustifiedDepsRule {
    fn name(&self) -> &'static str {
        UNJUSTIFIED_DEPS
    }

    fn evaluate(&self, pr: &PullRequest, _ctx: &RuleContext<'_>) -> RuleOutcome {
        let changed: Vec<&str> = pr
            .changed_paths()
            .filter(|path| is_dependency_manifest(path))
            .collect();

        if changed.is_empty() {
            return RuleOutcome::Clear;
        }

        let text = format!("{} {}", pr.title, pr.body).to_lowercase();
        if JUSTIFICATION_KEYWORDS.iter().any(|kw| text.contains(*kw)) {
            return RuleOutcome::Clear;
        }

        RuleOutcome::Flagged(SuspicionFlag::new(
            UNJUSTIFIED_DEPS,
            Severity::Medium,
            "Unjustified dependency changes",
            "Dependency manifests modified but neither title nor description \
             mentions dependency changes",
            changed.join(", "),
        ))
    }
}

/// Returns `true` when the final path segment is a known dependency
/// manifest or lockfile.
pub fn is_dependency_manifest(path: &str) -> bool {
    let file_name = path.rsplit('/').next().unwrap_or(path);
    DEPENDENCY_MANIFESTS.contains(&file_name)
}
