//! Gatewarden library crate (used by the batch binary and integration tests).
//!
//! # Public API Surface
//!
//! This crate exposes the full triage pipeline to support both the batch
//! binary and integration tests. The exports are organized by module:
//!
//! ## Core Types (Stable)
//! - [`TriageConfig`], [`ConfigError`] - Run configuration
//! - [`PullRequest`], [`Author`], [`ChangedFile`] - Input records
//! - [`TriagePipeline`] - Two-tier orchestration
//! - [`Scorecard`], [`TriageReport`], [`Verdict`] - Output contract
//!
//! ## Tier 1: Duplicate Clustering
//! - [`EmbeddingProvider`], [`HashedEmbedder`], [`HttpEmbedder`] - Embedding
//!   generation
//! - [`CachedEmbedder`] - Bounded TTL cache over any provider
//! - [`SimilarityMatrix`], [`cluster_batch`] - Pairwise cosine clustering
//!
//! ## Tier 2: Suspicion Rules
//! - [`Rule`], [`default_rules`] - The rule registry
//! - [`SuspicionFlag`], [`Severity`], [`DegradedSignal`] - Rule outcomes
//! - [`SuspicionScore`], [`aggregate`] - Weighted score aggregation
//!
//! ## Utilities
//! - [`VisionDocument`] - Project focus areas folded into sensitive paths
//! - Hashing functions for embedding cache keys
//!
//! ## Test/Mock Support
//! Mock implementations are available behind `#[cfg(any(test, feature = "mock"))]`.

pub mod config;
pub mod embedding;
pub mod hashing;
pub mod model;
pub mod pipeline;
pub mod rules;
pub mod scorecard;
pub mod scoring;
pub mod similarity;
pub mod vision;

pub use config::{
    ConfigError, DEFAULT_EMBEDDING_BASE_URL, DEFAULT_EMBEDDING_MODEL, SeverityWeights,
    TriageConfig, default_sensitive_paths,
};
pub use embedding::{
    CachedEmbedder, EmbeddingError, EmbeddingProvider, HashedEmbedder, HttpEmbedder,
    MAX_DESCRIPTION_CHARS, MAX_DIFF_LINES, canonical_text, has_embeddable_content,
};
#[cfg(any(test, feature = "mock"))]
pub use embedding::ScriptedEmbedder;
pub use hashing::{hash_embedding_key, hash_text, hash_token_to_u64};
pub use model::{Author, ChangedFile, FileStatus, PullRequest};
pub use pipeline::{PipelineError, TriagePipeline};
pub use rules::{
    DegradedSignal, FIRST_CONTRIBUTION, LARGE_DIFF_HIDING, LOW_TEST_RATIO, NEW_ACCOUNT, Rule,
    RuleContext, RuleError, RuleOutcome, SENSITIVE_PATHS, SensitiveMatcher, Severity,
    SuspicionFlag, TEMPORAL_CLUSTERING, UNJUSTIFIED_DEPS, default_rules, evaluate_all,
};
pub use scorecard::{
    ClusterMembership, ExcludedPr, FAST_TRACK_CONFIDENCE, Scorecard, TriageReport, Verdict,
};
pub use scoring::{
    DIMENSION_CONTRIBUTOR, DIMENSION_HYGIENE, DimensionScore, SuspicionScore, aggregate,
    flag_contribution,
};
pub use similarity::{
    ClusterMember, DuplicateCluster, EmbeddedPr, SimilarityMatrix, ThresholdPass, cluster_batch,
    cosine_similarity, threshold_passes,
};
pub use vision::{VisionDocument, VisionError, VisionPrinciple};
