//! Suspicion score aggregation.
//!
//! Each fired flag contributes `severity_weight × rule_weight`; the total
//! is capped at 1.0. Contributions are never negative and a missing flag
//! contributes nothing, so the score is monotonic in the flag set. The
//! dimension sub-scores are capped partial sums over fixed rule subsets,
//! computed for display only.

pub mod types;


pub use types::{DimensionScore, SuspicionScore};

use crate::config::TriageConfig;
use crate::rules::{self, Severity, SuspicionFlag};

/// Dimension label for code-hygiene rules.
pub const DIMENSION_HYGIENE: &str = "hygiene & dedup";

/// Dimension label for contributor-trust rules.
pub const DIMENSION_CONTRIBUTOR: &str = "contributor risk";

const HYGIENE_RULES: &[&str] = &[
    rules::LOW_TEST_RATIO,
    rules::LARGE_DIFF_HIDING,
    rules::UNJUSTIFIED_DEPS,
];

const CONTRIBUTOR_RULES: &[&str] = &[
    rules::NEW_ACCOUNT,
    rules::FIRST_CONTRIBUTION,
    rules::TEMPORAL_CLUSTERING,
    rules::SENSITIVE_PATHS,
];

/// Score contribution of one flag: its severity weight times the rule's
/// configured multiplier.
pub fn flag_contribution(flag: &SuspicionFlag, config: &TriageConfig) -> f64 {
    let severity_weight = match flag.severity {
        Severity::High => config.severity_weights.high,
        Severity::Medium => config.severity_weights.medium,
        Severity::Low => config.severity_weights.low,
    };
    severity_weight * config.rule_weight(&flag.rule_id)
}

/// Aggregates fired flags into the total suspicion score plus dimension
/// sub-scores.
///
/// An empty flag slice yields the zero score with both dimensions present
/// and empty, which is also what terminal duplicate members report.
pub fn aggregate(flags: &[SuspicionFlag], config: &TriageConfig) -> SuspicionScore {
    // Fold from +0.0 explicitly: an empty float `Sum` is -0.0, which would
    // render the documented zero score as "-0.00".
    let total = cap(
        flags
            .iter()
            .map(|f| flag_contribution(f, config))
            .fold(0.0, |acc, c| acc + c),
    );

    let dimensions = vec![
        project_dimension(DIMENSION_HYGIENE, HYGIENE_RULES, flags, config),
        project_dimension(DIMENSION_CONTRIBUTOR, CONTRIBUTOR_RULES, flags, config),
    ];

    SuspicionScore { total, dimensions }
}

fn project_dimension(
    dimension: &str,
    subset: &[&str],
    flags: &[SuspicionFlag],
    config: &TriageConfig,
) -> DimensionScore {
    let fired: Vec<&SuspicionFlag> = flags
        .iter()
        .filter(|f| subset.contains(&f.rule_id.as_str()))
        .collect();

    DimensionScore {
        dimension: dimension.to_string(),
        score: cap(
            fired
                .iter()
                .map(|f| flag_contribution(f, config))
                .fold(0.0, |acc, c| acc + c),
        ),
        fired_rules: fired.iter().map(|f| f.rule_id.clone()).collect(),
    }
}

fn cap(sum: f64) -> f64 {
    sum.min(1.0)
}
