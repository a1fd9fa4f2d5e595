use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One successfully embedded PR entering Tier 1.
#[derive(Debug, Clone)]
pub struct EmbeddedPr {
    pub number: u64,
    pub created_at: DateTime<Utc>,
    pub vector: Vec<f32>,
}

impl EmbeddedPr {
    pub fn new(number: u64, created_at: DateTime<Utc>, vector: Vec<f32>) -> Self {
        Self {
            number,
            created_at,
            vector,
        }
    }
}

/// A group of PRs connected (directly or transitively) by pairwise
/// similarity at or above a threshold. Always holds at least two PRs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DuplicateCluster {
    /// Threshold the cluster was computed at.
    pub threshold: f32,
    /// Earliest-submitted PR in the cluster (ties broken by lowest number).
    pub anchor: u64,
    /// Every non-anchor member, sorted by PR number.
    pub members: Vec<ClusterMember>,
}

impl DuplicateCluster {
    /// Total PR count including the anchor.
    pub fn size(&self) -> usize {
        self.members.len() + 1
    }

    pub fn contains(&self, number: u64) -> bool {
        self.anchor == number || self.members.iter().any(|m| m.number == number)
    }
}

/// A non-anchor cluster member with its similarity to the anchor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClusterMember {
    pub number: u64,
    pub similarity_to_anchor: f32,
}

/// One independently computed clustering pass for reporting.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ThresholdPass {
    pub threshold: f32,
    pub clusters: Vec<DuplicateCluster>,
}
