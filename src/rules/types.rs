use serde::{Deserialize, Serialize};

/// Severity attached to a fired flag. Ordered so that `High` sorts above
/// `Medium` above `Low`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Low,
    Medium,
    High,
}

impl Severity {
    /// Returns a short uppercase label.
    pub fn label(&self) -> &'static str {
        match self {
            Severity::High => "HIGH",
            Severity::Medium => "MEDIUM",
            Severity::Low => "LOW",
        }
    }
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// One rule's firing result.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SuspicionFlag {
    /// Stable rule identifier, also the key for weight overrides.
    pub rule_id: String,
    pub severity: Severity,
    /// Short human-readable flag title.
    pub title: String,
    /// What fired and against which threshold.
    pub explanation: String,
    /// Supporting data points, machine-greppable `key=value` or path lists.
    #[serde(default)]
    pub evidence: String,
}

impl SuspicionFlag {
    pub fn new(
        rule_id: &str,
        severity: Severity,
        title: impl Into<String>,
        explanation: impl Into<String>,
        evidence: impl Into<String>,
    ) -> Self {
        Self {
            rule_id: rule_id.to_string(),
            severity,
            title: title.into(),
            explanation: explanation.into(),
            evidence: evidence.into(),
        }
    }
}

/// Outcome of evaluating one rule against one PR.
#[derive(Debug, Clone, PartialEq)]
pub enum RuleOutcome {
    /// The rule fired.
    Flagged(SuspicionFlag),
    /// The rule evaluated and found nothing.
    Clear,
    /// The rule could not be evaluated, typically because the fetch layer
    /// could not resolve a field it needs. Recorded as a degraded signal,
    /// never coerced into a pass or a fail.
    Skipped {
        /// Why the rule was not evaluated.
        reason: String,
    },
}

impl RuleOutcome {
    pub fn skipped(reason: impl Into<String>) -> Self {
        RuleOutcome::Skipped {
            reason: reason.into(),
        }
    }

    /// Returns `true` if the rule fired.
    pub fn is_flagged(&self) -> bool {
        matches!(self, RuleOutcome::Flagged(_))
    }

    /// Consumes the outcome, returning the flag (if fired).
    pub fn into_flag(self) -> Option<SuspicionFlag> {
        match self {
            RuleOutcome::Flagged(flag) => Some(flag),
            RuleOutcome::Clear | RuleOutcome::Skipped { .. } => None,
        }
    }

    /// Returns a short debug string.
    pub fn debug_status(&self) -> &'static str {
        match self {
            RuleOutcome::Flagged(_) => "FLAGGED",
            RuleOutcome::Clear => "CLEAR",
            RuleOutcome::Skipped { .. } => "SKIPPED",
        }
    }
}

/// A stage or rule that could not be evaluated for a PR, and why. Surfaced
/// on the scorecard so a clean verdict is distinguishable from an
/// unverifiable one.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DegradedSignal {
    /// Rule identifier, or a pipeline stage name such as `embedding`.
    pub stage: String,
    pub reason: String,
}

impl DegradedSignal {
    pub fn new(stage: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            stage: stage.into(),
            reason: reason.into(),
        }
    }
}
