//! Single-link duplicate clustering.

use std::collections::{HashMap, VecDeque};

use tracing::debug;

use super::SimilarityMatrix;
use super::types::{ClusterMember, DuplicateCluster, EmbeddedPr, ThresholdPass};

/// Groups the batch into duplicate clusters at one threshold.
///
/// Single-link: any chain of pairwise links at or above the threshold joins
/// one cluster, so A-B plus B-C merge even when A-C falls below it. This
/// over-merges on purpose (recall over precision). A low threshold can
/// fuse loosely related work into one mega-cluster; that is expected
/// output, inspectable through the multi-threshold report rather than
/// something to correct with complete-link semantics.
pub fn cluster_batch(
    items: &[EmbeddedPr],
    matrix: &SimilarityMatrix,
    threshold: f32,
) -> Vec<DuplicateCluster> {
    let mut adjacency: HashMap<usize, Vec<usize>> = HashMap::new();
    for (i, j, sim) in matrix.pairs() {
        if sim >= threshold {
            adjacency.entry(i).or_default().push(j);
            adjacency.entry(j).or_default().push(i);
        }
    }

    let mut visited = vec![false; items.len()];
    let mut clusters = Vec::new();

    for start in 0..items.len() {
        if visited[start] || !adjacency.contains_key(&start) {
            continue;
        }

        let mut component = Vec::new();
        let mut queue = VecDeque::from([start]);
        visited[start] = true;

        while let Some(node) = queue.pop_front() {
            component.push(node);
            if let Some(neighbors) = adjacency.get(&node) {
                for &next in neighbors {
                    if !visited[next] {
                        visited[next] = true;
                        queue.push_back(next);
                    }
                }
            }
        }

        if component.len() < 2 {
            continue;
        }

        clusters.push(build_cluster(items, matrix, threshold, &component));
    }

    clusters.sort_by_key(|c| c.anchor);
    debug!(threshold, clusters = clusters.len(), "clustering pass complete");
    clusters
}

/// Runs one independent clustering pass per threshold. Passes are not
/// nested approximations of each other; each recomputes from the matrix.
pub fn threshold_passes(
    items: &[EmbeddedPr],
    matrix: &SimilarityMatrix,
    thresholds: &[f32],
) -> Vec<ThresholdPass> {
    thresholds
        .iter()
        .map(|&threshold| ThresholdPass {
            threshold,
            clusters: cluster_batch(items, matrix, threshold),
        })
        .collect()
}

fn build_cluster(
    items: &[EmbeddedPr],
    matrix: &SimilarityMatrix,
    threshold: f32,
    component: &[usize],
) -> DuplicateCluster {
    let anchor_idx = component
        .iter()
        .copied()
        .min_by_key(|&i| (items[i].created_at, items[i].number))
        .expect("cluster component is never empty");

    let mut members: Vec<ClusterMember> = component
        .iter()
        .copied()
        .filter(|&i| i != anchor_idx)
        .map(|i| ClusterMember {
            number: items[i].number,
            similarity_to_anchor: matrix.get(i, anchor_idx),
        })
        .collect();
    members.sort_by_key(|m| m.number);

    DuplicateCluster {
        threshold,
        anchor: items[anchor_idx].number,
        members,
    }
}
