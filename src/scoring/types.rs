use serde::{Deserialize, Serialize};

/// Capped partial sum over one named rule subset. A presentation
/// projection; verdict gating reads only the total.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DimensionScore {
    /// Display label, e.g. `contributor risk`.
    pub dimension: String,
    /// Sum of the subset's fired contributions, capped at 1.0.
    pub score: f64,
    /// Ids of the subset's rules that fired, in flag order.
    pub fired_rules: Vec<String>,
}

/// Aggregated suspicion for one PR.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SuspicionScore {
    /// Weighted sum over all fired flags, capped at 1.0.
    pub total: f64,
    /// Fixed-order dimension projections, one per known dimension even
    /// when nothing fired.
    pub dimensions: Vec<DimensionScore>,
}

impl SuspicionScore {
    /// Returns the score of one dimension, if present.
    pub fn dimension(&self, name: &str) -> Option<&DimensionScore> {
        self.dimensions.iter().find(|d| d.dimension == name)
    }
}
