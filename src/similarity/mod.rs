//! Tier 1 similarity engine.
//!
//! Computes cosine similarity over every unordered pair of embedded PRs and
//! groups them into duplicate clusters by single-link transitive closure.
//!
//! # Scale
//!
//! The pairwise pass is O(N²) per threshold and the matrix is held in
//! memory. That is fine at triage batch sizes (a few hundred PRs) and
//! deliberately not fine for a full backlog sweep; sharding or an
//! approximate-nearest-neighbor index in front of this module is the
//! extension point for that.

pub mod cluster;
pub mod types;


pub use cluster::{cluster_batch, threshold_passes};
pub use types::{ClusterMember, DuplicateCluster, EmbeddedPr, ThresholdPass};

use tracing::debug;

/// Cosine similarity between two vectors.
///
/// Mismatched lengths and zero-norm vectors score `0.0` rather than erroring
/// or dividing by zero; a vector with no signal never resembles anything.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    if a.len() != b.len() || a.is_empty() {
        return 0.0;
    }

    let dot_product: f32 = a.iter().zip(b.iter()).map(|(x, y)| x * y).sum();
    let norm_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let norm_b: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();

    if norm_a == 0.0 || norm_b == 0.0 {
        0.0
    } else {
        dot_product / (norm_a * norm_b)
    }
}

/// Dense upper-triangular store of all pairwise similarities in a batch.
///
/// Symmetry holds by construction: one value per unordered pair.
#[derive(Debug, Clone)]
pub struct SimilarityMatrix {
    n: usize,
    values: Vec<f32>,
}

impl SimilarityMatrix {
    /// Computes every pairwise similarity. O(N²) dot products.
    pub fn compute(items: &[EmbeddedPr]) -> Self {
        let n = items.len();
        let mut values = Vec::with_capacity(n.saturating_sub(1) * n / 2);

        for i in 0..n {
            for j in (i + 1)..n {
                values.push(cosine_similarity(&items[i].vector, &items[j].vector));
            }
        }

        debug!(batch = n, pairs = values.len(), "similarity matrix computed");
        Self { n, values }
    }

    /// Number of items the matrix was computed over.
    pub fn len(&self) -> usize {
        self.n
    }

    pub fn is_empty(&self) -> bool {
        self.n == 0
    }

    /// Similarity between items `i` and `j` in either order. `i == j` is
    /// defined as `1.0`.
    pub fn get(&self, i: usize, j: usize) -> f32 {
        if i == j {
            return 1.0;
        }
        let (lo, hi) = if i < j { (i, j) } else { (j, i) };
        self.values[self.index(lo, hi)]
    }

    /// Iterates `(i, j, similarity)` over all unordered pairs with `i < j`.
    pub fn pairs(&self) -> impl Iterator<Item = (usize, usize, f32)> + '_ {
        let n = self.n;
        (0..n)
            .flat_map(move |i| ((i + 1)..n).map(move |j| (i, j)))
            .zip(self.values.iter())
            .map(|((i, j), &sim)| (i, j, sim))
    }

    fn index(&self, i: usize, j: usize) -> usize {
        // Row-major upper triangle without the diagonal.
        i * self.n - i * (i + 1) / 2 + (j - i - 1)
    }
}
