//! Two-tier triage orchestration.
//!
//! Tier 1 embeds the batch concurrently, joins at the clustering barrier,
//! and partitions it into duplicate clusters; non-anchor members are
//! terminal at RECOMMEND_CLOSE and never reach Tier 2. Everything else
//! runs the rule set across worker threads and gates on the suspicion
//! threshold. Per-PR failures (missing diff, provider errors) degrade that
//! PR's scorecard; they never abort the batch.

pub mod error;


pub use error::PipelineError;

use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use futures_util::future::join_all;
use rayon::prelude::*;
use tracing::{debug, info, instrument, warn};
use uuid::Uuid;

use crate::config::TriageConfig;
use crate::embedding::{EmbeddingProvider, canonical_text, has_embeddable_content};
use crate::model::PullRequest;
use crate::rules::{self, DegradedSignal, Rule, RuleContext, SensitiveMatcher};
use crate::scorecard::{ClusterMembership, ExcludedPr, Scorecard, TriageReport, Verdict};
use crate::scoring;
use crate::similarity::{
    DuplicateCluster, EmbeddedPr, SimilarityMatrix, cluster_batch, threshold_passes,
};

/// Degraded-signal stage name for Tier 1 exclusions.
const STAGE_EMBEDDING: &str = "embedding";

/// The two-tier triage pipeline: duplicate clustering, then suspicion
/// scoring, producing one [`Scorecard`] per input PR.
pub struct TriagePipeline {
    config: TriageConfig,
    provider: Arc<dyn EmbeddingProvider>,
    rules: Vec<Box<dyn Rule>>,
    sensitive: SensitiveMatcher,
}

impl TriagePipeline {
    /// Builds a pipeline with the default rule registry. Invalid
    /// configuration (thresholds, weights, sensitive globs) is rejected
    /// here, never silently patched mid-run.
    pub fn new(
        config: TriageConfig,
        provider: Arc<dyn EmbeddingProvider>,
    ) -> Result<Self, PipelineError> {
        Self::with_rules(config, provider, rules::default_rules())
    }

    /// Builds a pipeline with a custom rule registry.
    pub fn with_rules(
        config: TriageConfig,
        provider: Arc<dyn EmbeddingProvider>,
        rules: Vec<Box<dyn Rule>>,
    ) -> Result<Self, PipelineError> {
        config.validate()?;
        let sensitive = SensitiveMatcher::new(&config.sensitive_paths)?;
        Ok(Self {
            config,
            provider,
            rules,
            sensitive,
        })
    }

    pub fn config(&self) -> &TriageConfig {
        &self.config
    }

    /// Triages a batch against the current wall clock.
    pub async fn run(&self, prs: &[PullRequest]) -> TriageReport {
        self.run_at(prs, Utc::now()).await
    }

    /// Triages a batch against an explicit reference time. Every age and
    /// window measures against it, so the same batch, configuration and
    /// reference time produce bit-identical scorecards.
    #[instrument(skip(self, prs), fields(batch = prs.len()))]
    pub async fn run_at(
        &self,
        prs: &[PullRequest],
        reference_time: DateTime<Utc>,
    ) -> TriageReport {
        let (embedded, excluded) = self.embed_batch(prs).await;

        // Full-batch barrier: clustering needs every available vector.
        let matrix = SimilarityMatrix::compute(&embedded);
        let clusters = cluster_batch(&embedded, &matrix, self.config.duplicate_threshold);
        let cluster_report = threshold_passes(&embedded, &matrix, &self.config.report_thresholds);

        info!(
            embedded = embedded.len(),
            excluded = excluded.len(),
            clusters = clusters.len(),
            "Tier 1 complete"
        );

        let memberships = membership_index(&clusters, self.config.duplicate_threshold);
        let exclusion_reasons: HashMap<u64, &str> = excluded
            .iter()
            .map(|e| (e.number, e.reason.as_str()))
            .collect();

        let ctx = RuleContext::new(&self.config, &self.sensitive, prs, reference_time);

        let mut scorecards: Vec<Scorecard> = prs
            .par_iter()
            .map(|pr| self.triage_one(pr, &ctx, &memberships, &exclusion_reasons))
            .collect();
        scorecards.sort_by_key(|card| card.pr_number);

        let report = TriageReport {
            run_id: Uuid::new_v4().to_string(),
            reference_time,
            duplicate_threshold: self.config.duplicate_threshold,
            suspicion_threshold: self.config.suspicion_threshold,
            scorecards,
            cluster_report,
            excluded_from_clustering: excluded,
        };

        info!(
            fast_track = report.verdict_count(Verdict::FastTrack),
            review_required = report.verdict_count(Verdict::ReviewRequired),
            recommend_close = report.verdict_count(Verdict::RecommendClose),
            "Run complete"
        );

        report
    }

    /// Embeds every PR with embeddable content, isolating per-PR failures.
    /// Returns embedded PRs in batch order plus the Tier 1 exclusions.
    async fn embed_batch(&self, prs: &[PullRequest]) -> (Vec<EmbeddedPr>, Vec<ExcludedPr>) {
        let mut excluded = Vec::new();
        let mut candidates = Vec::new();

        for pr in prs {
            if has_embeddable_content(pr) {
                candidates.push((pr, canonical_text(pr)));
            } else {
                debug!(pr_number = pr.number, "Empty canonical text");
                excluded.push(ExcludedPr {
                    number: pr.number,
                    reason: "canonical text is empty".to_string(),
                });
            }
        }

        let outcomes = join_all(
            candidates
                .iter()
                .map(|(_, text)| self.provider.embed(text)),
        )
        .await;

        let mut embedded = Vec::with_capacity(candidates.len());
        let mut batch_dimension: Option<usize> = None;

        for ((pr, _), outcome) in candidates.iter().zip(outcomes) {
            match outcome {
                Ok(vector) => {
                    match batch_dimension {
                        None => batch_dimension = Some(vector.len()),
                        Some(expected) if expected != vector.len() => {
                            warn!(
                                pr_number = pr.number,
                                expected,
                                got = vector.len(),
                                "Vector dimension mismatch"
                            );
                            excluded.push(ExcludedPr {
                                number: pr.number,
                                reason: format!(
                                    "embedding dimension {} does not match batch dimension {expected}",
                                    vector.len()
                                ),
                            });
                            continue;
                        }
                        Some(_) => {}
                    }
                    embedded.push(EmbeddedPr::new(pr.number, pr.created_at, vector));
                }
                Err(err) => {
                    warn!(pr_number = pr.number, error = %err, "Embedding unavailable");
                    excluded.push(ExcludedPr {
                        number: pr.number,
                        reason: err.to_string(),
                    });
                }
            }
        }

        (embedded, excluded)
    }

    /// Tier 2 for one PR, or the terminal duplicate verdict.
    fn triage_one(
        &self,
        pr: &PullRequest,
        ctx: &RuleContext<'_>,
        memberships: &HashMap<u64, ClusterMembership>,
        exclusion_reasons: &HashMap<u64, &str>,
    ) -> Scorecard {
        let membership = memberships.get(&pr.number).copied();

        // Non-anchor duplicates are terminal; Tier 2 never runs for them.
        if let Some(m) = membership
            && !m.is_anchor
        {
            return Scorecard::recommend_close(pr.number, m, scoring::aggregate(&[], &self.config));
        }

        let (flags, mut degraded) = rules::evaluate_all(&self.rules, pr, ctx);
        if let Some(reason) = exclusion_reasons.get(&pr.number) {
            degraded.push(DegradedSignal::new(STAGE_EMBEDDING, *reason));
            degraded.sort_by(|a, b| a.stage.cmp(&b.stage));
        }

        let score = scoring::aggregate(&flags, &self.config);

        if score.total >= self.config.suspicion_threshold {
            Scorecard::review_required(pr.number, flags, score, membership, degraded)
        } else if !degraded.is_empty() {
            // Never silently clear a PR the run could not fully evaluate.
            Scorecard::review_required_on_degraded(pr.number, flags, score, membership, degraded)
        } else {
            Scorecard::fast_track(pr.number, flags, score, membership, degraded)
        }
    }
}

/// Maps every clustered PR to its membership record at the decision
/// threshold. Anchors are included with similarity `1.0`.
fn membership_index(
    clusters: &[DuplicateCluster],
    threshold: f32,
) -> HashMap<u64, ClusterMembership> {
    let mut index = HashMap::new();

    for cluster in clusters {
        index.insert(
            cluster.anchor,
            ClusterMembership {
                threshold,
                anchor: cluster.anchor,
                similarity_to_anchor: 1.0,
                is_anchor: true,
            },
        );
        for member in &cluster.members {
            index.insert(
                member.number,
                ClusterMembership {
                    threshold,
                    anchor: cluster.anchor,
                    similarity_to_anchor: member.similarity_to_anchor,
                    is_anchor: false,
                },
            );
        }
    }

    index
}
