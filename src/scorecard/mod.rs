//! Stable output contract for one triage run.
//!
//! Everything here is consumed by downstream comment rendering and CI
//! output, so field names and shapes stay fixed. Optional fields serialize
//! as `null`/empty rather than disappearing.


use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::rules::{DegradedSignal, SuspicionFlag};
use crate::scoring::SuspicionScore;
use crate::similarity::ThresholdPass;

/// Display confidence reported for fast-tracked PRs.
pub const FAST_TRACK_CONFIDENCE: f64 = 0.8;

/// Terminal classification for one PR.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Verdict {
    FastTrack,
    ReviewRequired,
    RecommendClose,
}

impl Verdict {
    /// Returns a short uppercase label.
    pub fn label(&self) -> &'static str {
        match self {
            Verdict::FastTrack => "FAST_TRACK",
            Verdict::ReviewRequired => "REVIEW_REQUIRED",
            Verdict::RecommendClose => "RECOMMEND_CLOSE",
        }
    }
}

impl std::fmt::Display for Verdict {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// This PR's place in a duplicate cluster at the decision threshold.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ClusterMembership {
    /// Threshold the cluster formed at.
    pub threshold: f32,
    /// Anchor PR number.
    pub anchor: u64,
    /// Cosine similarity of this PR to the anchor; `1.0` for the anchor
    /// itself.
    pub similarity_to_anchor: f32,
    /// Whether this PR is the anchor.
    pub is_anchor: bool,
}

/// Final per-PR output: verdict, fired flags, scores, cluster membership
/// and anything the run could not evaluate. Built once, never mutated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Scorecard {
    pub pr_number: u64,
    pub verdict: Verdict,
    /// Display confidence: similarity to the anchor for duplicates, the
    /// suspicion score for gated PRs, [`FAST_TRACK_CONFIDENCE`] otherwise.
    pub confidence: f64,
    /// Fired flags, highest severity first.
    pub flags: Vec<SuspicionFlag>,
    pub score: SuspicionScore,
    #[serde(default)]
    pub cluster: Option<ClusterMembership>,
    /// Rules or stages that could not be evaluated for this PR.
    #[serde(default)]
    pub degraded_signals: Vec<DegradedSignal>,
    /// Machine-stable one-liner naming the verdict driver.
    pub summary: String,
}

impl Scorecard {
    /// Terminal duplicate verdict for a non-anchor cluster member. Tier 2
    /// never ran, so flags and degraded signals are empty by construction.
    pub fn recommend_close(
        pr_number: u64,
        cluster: ClusterMembership,
        score: SuspicionScore,
    ) -> Self {
        let summary = format!(
            "duplicate of PR#{} (similarity {:.2})",
            cluster.anchor, cluster.similarity_to_anchor
        );
        Self {
            pr_number,
            verdict: Verdict::RecommendClose,
            confidence: f64::from(cluster.similarity_to_anchor),
            flags: Vec::new(),
            score,
            cluster: Some(cluster),
            degraded_signals: Vec::new(),
            summary,
        }
    }

    /// Gated by the suspicion score itself.
    pub fn review_required(
        pr_number: u64,
        flags: Vec<SuspicionFlag>,
        score: SuspicionScore,
        cluster: Option<ClusterMembership>,
        degraded_signals: Vec<DegradedSignal>,
    ) -> Self {
        let summary = format!(
            "{} flag(s) fired, suspicion score {:.2}",
            flags.len(),
            score.total
        );
        Self {
            pr_number,
            verdict: Verdict::ReviewRequired,
            confidence: score.total,
            flags,
            score,
            cluster,
            degraded_signals,
            summary,
        }
    }

    /// Gated because too much signal was unavailable to clear the PR, even
    /// though the score alone sits under the threshold.
    pub fn review_required_on_degraded(
        pr_number: u64,
        flags: Vec<SuspicionFlag>,
        score: SuspicionScore,
        cluster: Option<ClusterMembership>,
        degraded_signals: Vec<DegradedSignal>,
    ) -> Self {
        let summary = format!(
            "insufficient data to fast-track ({} degraded signal(s), score {:.2})",
            degraded_signals.len(),
            score.total
        );
        Self {
            pr_number,
            verdict: Verdict::ReviewRequired,
            confidence: score.total,
            flags,
            score,
            cluster,
            degraded_signals,
            summary,
        }
    }

    /// Cleared for whatever fast path the caller runs next.
    pub fn fast_track(
        pr_number: u64,
        flags: Vec<SuspicionFlag>,
        score: SuspicionScore,
        cluster: Option<ClusterMembership>,
        degraded_signals: Vec<DegradedSignal>,
    ) -> Self {
        let summary = format!("no blocking signals, suspicion score {:.2}", score.total);
        Self {
            pr_number,
            verdict: Verdict::FastTrack,
            confidence: FAST_TRACK_CONFIDENCE,
            flags,
            score,
            cluster,
            degraded_signals,
            summary,
        }
    }
}

/// A PR excluded from Tier 1 clustering and why. Excluded PRs still flow
/// through Tier 2 and still receive a scorecard.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExcludedPr {
    pub number: u64,
    pub reason: String,
}

/// Batch-level run output: every scorecard plus run metadata and the
/// informational multi-threshold cluster report.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TriageReport {
    /// Random id for this run, for log correlation only.
    pub run_id: String,
    /// Reference timestamp every age and window was measured against.
    pub reference_time: DateTime<Utc>,
    /// Thresholds the run gated on, echoed for downstream consumers.
    pub duplicate_threshold: f32,
    pub suspicion_threshold: f64,
    /// One scorecard per input PR, sorted by PR number.
    pub scorecards: Vec<Scorecard>,
    /// Independent clustering passes at the reporting thresholds.
    pub cluster_report: Vec<ThresholdPass>,
    /// PRs excluded from clustering, with reasons.
    pub excluded_from_clustering: Vec<ExcludedPr>,
}

impl TriageReport {
    /// Number of scorecards carrying `verdict`.
    pub fn verdict_count(&self, verdict: Verdict) -> usize {
        self.scorecards
            .iter()
            .filter(|card| card.verdict == verdict)
            .count()
    }

    /// Returns the scorecard for one PR, if present.
    pub fn scorecard(&self, pr_number: u64) -> Option<&Scorecard> {
        self.scorecards
            .iter()
            .find(|card| card.pr_number == pr_number)
    }
}
