use chrono::{DateTime, Duration, TimeZone, Utc};

use crate::config::TriageConfig;
use crate::model::{Author, ChangedFile, PullRequest};

use super::account::{FirstContributionRule, NewAccountRule};
use super::context::RuleContext;
use super::deps::{UnjustifiedDepsRule, is_dependency_manifest};
use super::diff::LargeDiffHidingRule;
use super::paths::SensitivePathsRule;
use super::sensitive::SensitiveMatcher;
use super::temporal::TemporalClusteringRule;
use super::tests_ratio::{LowTestRatioRule, is_test_path};
use super::types::{RuleOutcome, Severity};
use super::{Rule, default_rules, evaluate_all};

fn reference_time() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 6, 1, 12, 0, 0).unwrap()
}

fn author_aged(days: i64, merged: u32) -> Author {
    Author {
        login: "contributor".to_string(),
        created_at: Some(reference_time() - Duration::days(days)),
        merged_pr_count: Some(merged),
    }
}

fn veteran_author() -> Author {
    author_aged(1500, 25)
}

fn unknown_author() -> Author {
    Author {
        login: "ghost".to_string(),
        created_at: None,
        merged_pr_count: None,
    }
}

fn pr_with(number: u64, author: Author, files: Vec<ChangedFile>) -> PullRequest {
    PullRequest {
        number,
        title: "Improve widget handling".to_string(),
        body: String::new(),
        author,
        files,
        diff: None,
        created_at: reference_time() - Duration::hours(1),
        draft: false,
    }
}

fn evaluate(rule: &dyn Rule, pr: &PullRequest, recent: &[PullRequest]) -> RuleOutcome {
    evaluate_with(rule, pr, recent, &TriageConfig::default())
}

fn evaluate_with(
    rule: &dyn Rule,
    pr: &PullRequest,
    recent: &[PullRequest],
    config: &TriageConfig,
) -> RuleOutcome {
    let matcher = SensitiveMatcher::new(&config.sensitive_paths).unwrap();
    let ctx = RuleContext::new(config, &matcher, recent, reference_time());
    rule.evaluate(pr, &ctx)
}

fn flag(outcome: RuleOutcome) -> super::SuspicionFlag {
    match outcome {
        RuleOutcome::Flagged(flag) => flag,
        other => panic!("expected a fired flag, got {}", other.debug_status()),
    }
}

// --- SensitiveMatcher ---

#[test]
fn test_matcher_substring_is_case_insensitive() {
    let matcher = SensitiveMatcher::new(&["auth".to_string()]).unwrap();

    assert!(matcher.is_match("src/Auth/token.rs"));
    assert!(matcher.is_match("lib/OAuthClient.java"));
    assert!(!matcher.is_match("README.md"));
}

#[test]
fn test_matcher_glob_pattern() {
    let matcher = SensitiveMatcher::new(&["*.pem".to_string()]).unwrap();

    assert!(matcher.is_match("certs/server.pem"));
    assert!(matcher.is_match("KEY.PEM"));
    assert!(!matcher.is_match("certs/server.pem.md"));
}

#[test]
fn test_matcher_rejects_invalid_glob() {
    let result = SensitiveMatcher::new(&["[".to_string()]);

    assert!(result.is_err());
}

#[test]
fn test_matcher_skips_blank_patterns() {
    let matcher = SensitiveMatcher::new(&["  ".to_string(), String::new()]).unwrap();

    assert_eq!(matcher.pattern_count(), 0);
    assert!(!matcher.is_match("src/auth.rs"));
}

#[test]
fn test_matcher_default_set_covers_workflows() {
    let config = TriageConfig::default();
    let matcher = SensitiveMatcher::new(&config.sensitive_paths).unwrap();

    assert!(matcher.is_match(".github/workflows/release.yml"));
    assert!(matcher.is_match("deploy/k8s/ingress.yaml"));
}

// --- new_account ---

#[test]
fn test_new_account_fires_under_threshold() {
    let pr = pr_with(1, author_aged(10, 5), vec![]);

    let flag = flag(evaluate(&NewAccountRule, &pr, &[]));

    assert_eq!(flag.rule_id, super::NEW_ACCOUNT);
    assert_eq!(flag.severity, Severity::Medium);
    assert!(flag.explanation.contains("10 days"));
}

#[test]
fn test_new_account_clear_at_threshold() {
    let pr = pr_with(1, author_aged(90, 5), vec![]);

    assert_eq!(evaluate(&NewAccountRule, &pr, &[]), RuleOutcome::Clear);
}

#[test]
fn test_new_account_skips_without_creation_date() {
    let pr = pr_with(1, unknown_author(), vec![]);

    let outcome = evaluate(&NewAccountRule, &pr, &[]);

    assert!(matches!(outcome, RuleOutcome::Skipped { ref reason } if reason.contains("creation")));
}

// --- first_contribution ---

#[test]
fn test_first_contribution_fires_on_zero_merged() {
    let pr = pr_with(1, author_aged(400, 0), vec![]);

    let flag = flag(evaluate(&FirstContributionRule, &pr, &[]));

    assert_eq!(flag.rule_id, super::FIRST_CONTRIBUTION);
    assert_eq!(flag.severity, Severity::Medium);
    assert_eq!(flag.evidence, "merged_pr_count=0");
}

#[test]
fn test_first_contribution_clear_with_history() {
    let pr = pr_with(1, author_aged(400, 3), vec![]);

    assert_eq!(
        evaluate(&FirstContributionRule, &pr, &[]),
        RuleOutcome::Clear
    );
}

#[test]
fn test_first_contribution_skips_without_history() {
    let pr = pr_with(1, unknown_author(), vec![]);

    let outcome = evaluate(&FirstContributionRule, &pr, &[]);

    assert!(matches!(outcome, RuleOutcome::Skipped { .. }));
}

// --- sensitive_paths ---

#[test]
fn test_sensitive_paths_fires_high() {
    let files = vec![
        ChangedFile::new("src/auth/session.rs", 40, 3),
        ChangedFile::new("src/widgets/render.rs", 10, 2),
    ];
    let pr = pr_with(1, veteran_author(), files);

    let flag = flag(evaluate(&SensitivePathsRule, &pr, &[]));

    assert_eq!(flag.severity, Severity::High);
    assert!(flag.explanation.contains("1 security-sensitive"));
    assert_eq!(flag.evidence, "src/auth/session.rs");
}

#[test]
fn test_sensitive_paths_clear_without_matches() {
    let files = vec![ChangedFile::new("docs/guide.md", 100, 0)];
    let pr = pr_with(1, veteran_author(), files);

    assert_eq!(evaluate(&SensitivePathsRule, &pr, &[]), RuleOutcome::Clear);
}

#[test]
fn test_sensitive_paths_evidence_truncates() {
    let files: Vec<ChangedFile> = (0..12)
        .map(|i| ChangedFile::new(format!("src/auth/handler_{i}.rs"), 5, 0))
        .collect();
    let pr = pr_with(1, veteran_author(), files);

    let flag = flag(evaluate(&SensitivePathsRule, &pr, &[]));

    assert!(flag.explanation.contains("12 security-sensitive"));
    assert!(flag.evidence.ends_with(", ..."));
    assert!(flag.evidence.contains("handler_0.rs"));
    assert!(!flag.evidence.contains("handler_11.rs"));
}

#[test]
fn test_sensitive_paths_honors_custom_globs() {
    let mut config = TriageConfig::default();
    config.sensitive_paths = vec!["secrets/*.yaml".to_string()];
    let files = vec![ChangedFile::new("secrets/prod.yaml", 2, 2)];
    let pr = pr_with(1, veteran_author(), files);

    let flag = flag(evaluate_with(&SensitivePathsRule, &pr, &[], &config));

    assert_eq!(flag.evidence, "secrets/prod.yaml");
}

// --- low_test_ratio ---

#[test]
fn test_low_test_ratio_fires_without_tests() {
    let files = vec![ChangedFile::new("src/engine.rs", 200, 10)];
    let pr = pr_with(1, veteran_author(), files);

    let flag = flag(evaluate(&LowTestRatioRule, &pr, &[]));

    assert_eq!(flag.severity, Severity::Medium);
    assert_eq!(flag.evidence, "code_additions=200, test_additions=0");
}

#[test]
fn test_low_test_ratio_exempts_tiny_prs() {
    let files = vec![ChangedFile::new("src/engine.rs", 20, 0)];
    let pr = pr_with(1, veteran_author(), files);

    assert_eq!(evaluate(&LowTestRatioRule, &pr, &[]), RuleOutcome::Clear);
}

#[test]
fn test_low_test_ratio_clear_with_healthy_ratio() {
    let files = vec![
        ChangedFile::new("src/engine.rs", 100, 0),
        ChangedFile::new("tests/engine_test.rs", 30, 0),
    ];
    let pr = pr_with(1, veteran_author(), files);

    assert_eq!(evaluate(&LowTestRatioRule, &pr, &[]), RuleOutcome::Clear);
}

#[test]
fn test_is_test_path_conventions() {
    assert!(is_test_path("tests/integration.rs"));
    assert!(is_test_path("src/parser_test.go"));
    assert!(is_test_path("app/button.test.tsx"));
    assert!(is_test_path("spec/models/user_spec.rb"));
    assert!(is_test_path("testing/harness.py"));

    assert!(!is_test_path("src/contest.py"));
    assert!(!is_test_path("src/protest/march.rs"));
    assert!(!is_test_path("src/lib.rs"));
}

// --- unjustified_deps ---

#[test]
fn test_unjustified_deps_fires_without_justification() {
    let files = vec![
        ChangedFile::new("package.json", 3, 1),
        ChangedFile::new("src/index.js", 50, 2),
    ];
    let pr = pr_with(1, veteran_author(), files);

    let flag = flag(evaluate(&UnjustifiedDepsRule, &pr, &[]));

    assert_eq!(flag.severity, Severity::Medium);
    assert_eq!(flag.evidence, "package.json");
}

#[test]
fn test_unjustified_deps_clear_when_body_mentions() {
    let files = vec![ChangedFile::new("package.json", 3, 1)];
    let mut pr = pr_with(1, veteran_author(), files);
    pr.body = "Bumps lodash to 4.17.21.".to_string();

    assert_eq!(evaluate(&UnjustifiedDepsRule, &pr, &[]), RuleOutcome::Clear);
}

#[test]
fn test_unjustified_deps_clear_when_title_mentions() {
    let files = vec![ChangedFile::new("backend/Cargo.toml", 2, 0)];
    let mut pr = pr_with(1, veteran_author(), files);
    pr.title = "Upgrade tokio".to_string();

    assert_eq!(evaluate(&UnjustifiedDepsRule, &pr, &[]), RuleOutcome::Clear);
}

#[test]
fn test_unjustified_deps_matches_whole_file_name() {
    assert!(is_dependency_manifest("Cargo.toml"));
    assert!(is_dependency_manifest("backend/Cargo.toml"));
    assert!(is_dependency_manifest("yarn.lock"));

    assert!(!is_dependency_manifest("mypackage.json"));
    assert!(!is_dependency_manifest("package.json.bak"));
    assert!(!is_dependency_manifest("docs/Cargo.toml.md"));
}

// --- large_diff_hiding ---

#[test]
fn test_large_diff_hiding_fires_when_buried() {
    let files = vec![
        ChangedFile::new("src/generated/bindings.rs", 950, 30),
        ChangedFile::new("src/auth/session.rs", 10, 10),
    ];
    let pr = pr_with(1, veteran_author(), files);

    let flag = flag(evaluate(&LargeDiffHidingRule, &pr, &[]));

    assert_eq!(flag.severity, Severity::High);
    assert_eq!(flag.evidence, "total_changes=1000, sensitive_changes=20");
}

#[test]
fn test_large_diff_hiding_needs_sensitive_lines() {
    let files = vec![ChangedFile::new("src/generated/bindings.rs", 5000, 100)];
    let pr = pr_with(1, veteran_author(), files);

    assert_eq!(evaluate(&LargeDiffHidingRule, &pr, &[]), RuleOutcome::Clear);
}

#[test]
fn test_large_diff_hiding_clear_when_proportionate() {
    let files = vec![
        ChangedFile::new("src/refactor.rs", 700, 0),
        ChangedFile::new("src/auth/session.rs", 300, 0),
    ];
    let pr = pr_with(1, veteran_author(), files);

    assert_eq!(evaluate(&LargeDiffHidingRule, &pr, &[]), RuleOutcome::Clear);
}

#[test]
fn test_large_diff_hiding_requires_exceeding_minimum() {
    let files = vec![
        ChangedFile::new("src/refactor.rs", 490, 0),
        ChangedFile::new("src/auth/session.rs", 10, 0),
    ];
    let pr = pr_with(1, veteran_author(), files);

    assert_eq!(evaluate(&LargeDiffHidingRule, &pr, &[]), RuleOutcome::Clear);
}

// --- temporal_clustering ---

fn burst_pr(number: u64, offset_hours: i64, author: Author) -> PullRequest {
    let mut pr = pr_with(number, author, vec![]);
    pr.created_at = reference_time() - Duration::hours(offset_hours);
    pr
}

#[test]
fn test_temporal_clustering_fires_on_burst() {
    let pr = burst_pr(1, 1, author_aged(5, 0));
    let recent = vec![
        burst_pr(2, 2, author_aged(3, 0)),
        burst_pr(3, 4, author_aged(8, 0)),
    ];

    let flag = flag(evaluate(&TemporalClusteringRule, &pr, &recent));

    assert_eq!(flag.severity, Severity::Low);
    assert!(flag.explanation.contains("3 pull requests"));
    assert!(flag.evidence.contains("PR#2"));
    assert!(flag.evidence.contains("PR#3"));
}

#[test]
fn test_temporal_clustering_requires_qualifying_author() {
    let pr = burst_pr(1, 1, veteran_author());
    let recent = vec![
        burst_pr(2, 2, author_aged(3, 0)),
        burst_pr(3, 4, author_aged(8, 0)),
    ];

    assert_eq!(
        evaluate(&TemporalClusteringRule, &pr, &recent),
        RuleOutcome::Clear
    );
}

#[test]
fn test_temporal_clustering_needs_minimum_count() {
    let pr = burst_pr(1, 1, author_aged(5, 0));
    let recent = vec![burst_pr(2, 2, author_aged(3, 0))];

    assert_eq!(
        evaluate(&TemporalClusteringRule, &pr, &recent),
        RuleOutcome::Clear
    );
}

#[test]
fn test_temporal_clustering_ignores_prs_outside_window() {
    let pr = burst_pr(1, 1, author_aged(5, 0));
    let recent = vec![
        burst_pr(2, 30, author_aged(3, 0)),
        burst_pr(3, 40, author_aged(8, 0)),
    ];

    assert_eq!(
        evaluate(&TemporalClusteringRule, &pr, &recent),
        RuleOutcome::Clear
    );
}

#[test]
fn test_temporal_clustering_skips_self_in_context() {
    let pr = burst_pr(1, 1, author_aged(5, 0));
    let recent = vec![
        pr.clone(),
        burst_pr(2, 2, author_aged(3, 0)),
        burst_pr(3, 4, author_aged(8, 0)),
    ];

    let flag = flag(evaluate(&TemporalClusteringRule, &pr, &recent));

    assert!(flag.explanation.contains("3 pull requests"));
}

#[test]
fn test_temporal_clustering_raises_bar_for_large_context() {
    let pr = burst_pr(1, 1, author_aged(5, 0));
    let mut recent: Vec<PullRequest> = (0..52)
        .map(|i| burst_pr(100 + i, 3, veteran_author()))
        .collect();
    recent.push(burst_pr(2, 2, author_aged(3, 0)));
    recent.push(burst_pr(3, 4, author_aged(8, 0)));
    recent.push(burst_pr(4, 5, author_aged(2, 0)));

    assert_eq!(
        evaluate(&TemporalClusteringRule, &pr, &recent),
        RuleOutcome::Clear
    );
}

#[test]
fn test_temporal_clustering_skips_without_any_history() {
    let pr = burst_pr(1, 1, unknown_author());
    let recent = vec![
        burst_pr(2, 2, author_aged(3, 0)),
        burst_pr(3, 4, author_aged(8, 0)),
    ];

    let outcome = evaluate(&TemporalClusteringRule, &pr, &recent);

    assert!(matches!(outcome, RuleOutcome::Skipped { .. }));
}

// --- registry ---

#[test]
fn test_default_registry_has_seven_unique_rules() {
    let rules = default_rules();
    let mut names: Vec<&str> = rules.iter().map(|r| r.name()).collect();

    assert_eq!(names.len(), 7);
    names.sort_unstable();
    names.dedup();
    assert_eq!(names.len(), 7);
}

#[test]
fn test_evaluate_all_sorts_by_severity_then_rule_id() {
    let files = vec![ChangedFile::new("src/auth/session.rs", 20, 3)];
    let pr = pr_with(1, author_aged(10, 0), files);
    let config = TriageConfig::default();
    let matcher = SensitiveMatcher::new(&config.sensitive_paths).unwrap();
    let ctx = RuleContext::new(&config, &matcher, &[], reference_time());

    let (flags, degraded) = evaluate_all(&default_rules(), &pr, &ctx);

    let ids: Vec<&str> = flags.iter().map(|f| f.rule_id.as_str()).collect();
    assert_eq!(
        ids,
        vec![
            super::SENSITIVE_PATHS,
            super::FIRST_CONTRIBUTION,
            super::NEW_ACCOUNT
        ]
    );
    assert!(degraded.is_empty());
}

#[test]
fn test_evaluate_all_is_order_independent() {
    let files = vec![
        ChangedFile::new("src/auth/session.rs", 200, 3),
        ChangedFile::new("package.json", 3, 0),
    ];
    let pr = pr_with(1, author_aged(10, 0), files);
    let config = TriageConfig::default();
    let matcher = SensitiveMatcher::new(&config.sensitive_paths).unwrap();
    let ctx = RuleContext::new(&config, &matcher, &[], reference_time());

    let mut reversed = default_rules();
    reversed.reverse();

    let (forward_flags, forward_degraded) = evaluate_all(&default_rules(), &pr, &ctx);
    let (reversed_flags, reversed_degraded) = evaluate_all(&reversed, &pr, &ctx);

    assert_eq!(forward_flags, reversed_flags);
    assert_eq!(forward_degraded, reversed_degraded);
}

#[test]
fn test_evaluate_all_collects_degraded_signals() {
    let pr = pr_with(1, unknown_author(), vec![]);
    let config = TriageConfig::default();
    let matcher = SensitiveMatcher::new(&config.sensitive_paths).unwrap();
    let ctx = RuleContext::new(&config, &matcher, &[], reference_time());

    let (flags, degraded) = evaluate_all(&default_rules(), &pr, &ctx);

    assert!(flags.is_empty());
    let stages: Vec<&str> = degraded.iter().map(|d| d.stage.as_str()).collect();
    assert_eq!(
        stages,
        vec![
            super::FIRST_CONTRIBUTION,
            super::NEW_ACCOUNT,
            super::TEMPORAL_CLUSTERING
        ]
    );
}
