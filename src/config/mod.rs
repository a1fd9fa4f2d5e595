//! Environment-backed triage configuration.
//!
//! Most settings have defaults. Override with `GATEWARDEN_*` environment
//! variables. Malformed values fail loading; absent values fall back to
//! defaults.

pub mod error;


pub use error::ConfigError;

use std::collections::HashMap;
use std::env;

/// Default OpenAI-compatible embeddings endpoint base URL.
pub const DEFAULT_EMBEDDING_BASE_URL: &str = "https://api.openai.com/v1";

/// Default embedding model identifier for the HTTP provider.
pub const DEFAULT_EMBEDDING_MODEL: &str = "text-embedding-3-small";

/// Weight applied per flag severity when aggregating the suspicion score.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SeverityWeights {
    pub high: f64,
    pub medium: f64,
    pub low: f64,
}

impl Default for SeverityWeights {
    fn default() -> Self {
        Self {
            high: 0.30,
            medium: 0.15,
            low: 0.05,
        }
    }
}

/// Triage pipeline configuration.
///
/// Use [`TriageConfig::from_env`] to read `GATEWARDEN_*` overrides on top of
/// defaults, or build programmatically from [`TriageConfig::default`]. Call
/// [`TriageConfig::validate`] once at startup; pipeline construction rejects
/// unvalidated nonsense values the same way.
#[derive(Debug, Clone)]
pub struct TriageConfig {
    /// Cosine similarity at or above which two PRs are duplicates.
    /// Default: `0.90`.
    pub duplicate_threshold: f32,

    /// Thresholds for the informational multi-threshold cluster report,
    /// each pass computed independently. Default: `[0.90, 0.85, 0.80]`.
    pub report_thresholds: Vec<f32>,

    /// Suspicion score at or above which a PR requires human review.
    /// Default: `0.60`.
    pub suspicion_threshold: f64,

    /// Accounts younger than this many days are flagged. Default: `90`.
    pub new_account_days: i64,

    /// Floor for added-test-lines / added-code-lines. Default: `0.10`.
    pub min_test_ratio: f64,

    /// Added code lines below which the test-ratio rule is skipped.
    /// Default: `20`.
    pub test_ratio_min_code_lines: u64,

    /// Total changed lines above which a diff counts as large. Default: `500`.
    pub large_diff_min_changes: u64,

    /// Sensitive-change fraction below which a large diff counts as burying
    /// its sensitive edits. Default: `0.05`.
    pub buried_sensitive_ratio: f64,

    /// Trailing window for temporal clustering. Default: `24` hours.
    pub temporal_window_hours: i64,

    /// Minimum windowed count of new-contributor PRs to flag, when the recent
    /// context holds fewer than [`Self::temporal_small_batch_limit`] PRs.
    /// Default: `3`.
    pub temporal_min_cluster: usize,

    /// Minimum windowed count when the recent context is larger.
    /// Default: `5`.
    pub temporal_min_cluster_large: usize,

    /// Recent-context size at which the larger minimum applies. Default: `50`.
    pub temporal_small_batch_limit: usize,

    /// Sensitive path patterns: plain substrings or globs. A project vision
    /// document's focus areas are appended to this set before rules run.
    pub sensitive_paths: Vec<String>,

    /// Per-severity score contributions.
    pub severity_weights: SeverityWeights,

    /// Per-rule multiplier overrides, keyed by rule name. Rules missing here
    /// use weight `1.0`.
    pub rule_weights: HashMap<String, f64>,

    /// Base URL of the OpenAI-compatible embeddings endpoint.
    pub embedding_base_url: String,

    /// Embedding model identifier sent to the HTTP provider.
    pub embedding_model: String,

    /// API key for the HTTP provider. `None` disables it; the hashed
    /// provider needs no key.
    pub embedding_api_key: Option<String>,

    /// Vector dimension for the offline hashed provider. Default: `256`.
    pub embedding_dimension: usize,

    /// Max entries in the in-memory embedding cache. Default: `10_000`.
    pub embedding_cache_capacity: u64,

    /// Embedding cache time-to-live in seconds. Default: `86_400`.
    pub embedding_cache_ttl_secs: u64,
}

impl Default for TriageConfig {
    fn default() -> Self {
        Self {
            duplicate_threshold: 0.90,
            report_thresholds: vec![0.90, 0.85, 0.80],
            suspicion_threshold: 0.60,
            new_account_days: 90,
            min_test_ratio: 0.10,
            test_ratio_min_code_lines: 20,
            large_diff_min_changes: 500,
            buried_sensitive_ratio: 0.05,
            temporal_window_hours: 24,
            temporal_min_cluster: 3,
            temporal_min_cluster_large: 5,
            temporal_small_batch_limit: 50,
            sensitive_paths: default_sensitive_paths(),
            severity_weights: SeverityWeights::default(),
            rule_weights: HashMap::new(),
            embedding_base_url: DEFAULT_EMBEDDING_BASE_URL.to_string(),
            embedding_model: DEFAULT_EMBEDDING_MODEL.to_string(),
            embedding_api_key: None,
            embedding_dimension: 256,
            embedding_cache_capacity: 10_000,
            embedding_cache_ttl_secs: 86_400,
        }
    }
}

impl TriageConfig {
    const ENV_DUPLICATE_THRESHOLD: &'static str = "GATEWARDEN_DUPLICATE_THRESHOLD";
    const ENV_REPORT_THRESHOLDS: &'static str = "GATEWARDEN_REPORT_THRESHOLDS";
    const ENV_SUSPICION_THRESHOLD: &'static str = "GATEWARDEN_SUSPICION_THRESHOLD";
    const ENV_NEW_ACCOUNT_DAYS: &'static str = "GATEWARDEN_NEW_ACCOUNT_DAYS";
    const ENV_MIN_TEST_RATIO: &'static str = "GATEWARDEN_MIN_TEST_RATIO";
    const ENV_TEST_RATIO_MIN_CODE: &'static str = "GATEWARDEN_TEST_RATIO_MIN_CODE";
    const ENV_LARGE_DIFF_MIN_CHANGES: &'static str = "GATEWARDEN_LARGE_DIFF_MIN_CHANGES";
    const ENV_BURIED_SENSITIVE_RATIO: &'static str = "GATEWARDEN_BURIED_SENSITIVE_RATIO";
    const ENV_TEMPORAL_WINDOW_HOURS: &'static str = "GATEWARDEN_TEMPORAL_WINDOW_HOURS";
    const ENV_SENSITIVE_PATHS: &'static str = "GATEWARDEN_SENSITIVE_PATHS";
    const ENV_RULE_WEIGHTS: &'static str = "GATEWARDEN_RULE_WEIGHTS";
    const ENV_WEIGHT_HIGH: &'static str = "GATEWARDEN_WEIGHT_HIGH";
    const ENV_WEIGHT_MEDIUM: &'static str = "GATEWARDEN_WEIGHT_MEDIUM";
    const ENV_WEIGHT_LOW: &'static str = "GATEWARDEN_WEIGHT_LOW";
    const ENV_EMBEDDING_BASE_URL: &'static str = "GATEWARDEN_EMBEDDING_BASE_URL";
    const ENV_EMBEDDING_MODEL: &'static str = "GATEWARDEN_EMBEDDING_MODEL";
    const ENV_EMBEDDING_API_KEY: &'static str = "GATEWARDEN_EMBEDDING_API_KEY";
    const ENV_EMBEDDING_DIMENSION: &'static str = "GATEWARDEN_EMBEDDING_DIMENSION";
    const ENV_CACHE_CAPACITY: &'static str = "GATEWARDEN_CACHE_CAPACITY";
    const ENV_CACHE_TTL_SECS: &'static str = "GATEWARDEN_CACHE_TTL_SECS";

    /// Loads configuration from environment variables (falling back to
    /// defaults). `GATEWARDEN_SENSITIVE_PATHS` replaces the default pattern
    /// set; vision-document focus areas are appended separately.
    pub fn from_env() -> Result<Self, ConfigError> {
        let defaults = Self::default();

        let duplicate_threshold = Self::parse_f64_from_env(
            Self::ENV_DUPLICATE_THRESHOLD,
            f64::from(defaults.duplicate_threshold),
        )? as f32;
        let report_thresholds = Self::parse_threshold_list_from_env(
            Self::ENV_REPORT_THRESHOLDS,
            defaults.report_thresholds,
        )?;
        let suspicion_threshold = Self::parse_f64_from_env(
            Self::ENV_SUSPICION_THRESHOLD,
            defaults.suspicion_threshold,
        )?;
        let new_account_days =
            Self::parse_i64_from_env(Self::ENV_NEW_ACCOUNT_DAYS, defaults.new_account_days)?;
        let min_test_ratio =
            Self::parse_f64_from_env(Self::ENV_MIN_TEST_RATIO, defaults.min_test_ratio)?;
        let test_ratio_min_code_lines = Self::parse_u64_from_env(
            Self::ENV_TEST_RATIO_MIN_CODE,
            defaults.test_ratio_min_code_lines,
        )?;
        let large_diff_min_changes = Self::parse_u64_from_env(
            Self::ENV_LARGE_DIFF_MIN_CHANGES,
            defaults.large_diff_min_changes,
        )?;
        let buried_sensitive_ratio = Self::parse_f64_from_env(
            Self::ENV_BURIED_SENSITIVE_RATIO,
            defaults.buried_sensitive_ratio,
        )?;
        let temporal_window_hours = Self::parse_i64_from_env(
            Self::ENV_TEMPORAL_WINDOW_HOURS,
            defaults.temporal_window_hours,
        )?;
        let sensitive_paths =
            Self::parse_list_from_env(Self::ENV_SENSITIVE_PATHS, defaults.sensitive_paths);
        let rule_weights = Self::parse_rule_weights_from_env(Self::ENV_RULE_WEIGHTS)?;
        let severity_weights = SeverityWeights {
            high: Self::parse_f64_from_env(Self::ENV_WEIGHT_HIGH, defaults.severity_weights.high)?,
            medium: Self::parse_f64_from_env(
                Self::ENV_WEIGHT_MEDIUM,
                defaults.severity_weights.medium,
            )?,
            low: Self::parse_f64_from_env(Self::ENV_WEIGHT_LOW, defaults.severity_weights.low)?,
        };
        let embedding_base_url =
            Self::parse_string_from_env(Self::ENV_EMBEDDING_BASE_URL, defaults.embedding_base_url);
        let embedding_model =
            Self::parse_string_from_env(Self::ENV_EMBEDDING_MODEL, defaults.embedding_model);
        let embedding_api_key = Self::parse_optional_string_from_env(Self::ENV_EMBEDDING_API_KEY);
        let embedding_dimension = Self::parse_usize_from_env(
            Self::ENV_EMBEDDING_DIMENSION,
            defaults.embedding_dimension,
        )?;
        let embedding_cache_capacity =
            Self::parse_u64_from_env(Self::ENV_CACHE_CAPACITY, defaults.embedding_cache_capacity)?;
        let embedding_cache_ttl_secs =
            Self::parse_u64_from_env(Self::ENV_CACHE_TTL_SECS, defaults.embedding_cache_ttl_secs)?;

        Ok(Self {
            duplicate_threshold,
            report_thresholds,
            suspicion_threshold,
            new_account_days,
            min_test_ratio,
            test_ratio_min_code_lines,
            large_diff_min_changes,
            buried_sensitive_ratio,
            temporal_window_hours,
            temporal_min_cluster: defaults.temporal_min_cluster,
            temporal_min_cluster_large: defaults.temporal_min_cluster_large,
            temporal_small_batch_limit: defaults.temporal_small_batch_limit,
            sensitive_paths,
            severity_weights,
            rule_weights,
            embedding_base_url,
            embedding_model,
            embedding_api_key,
            embedding_dimension,
            embedding_cache_capacity,
            embedding_cache_ttl_secs,
        })
    }

    /// Validates thresholds, ratios and weights.
    pub fn validate(&self) -> Result<(), ConfigError> {
        Self::check_threshold("duplicate_threshold", f64::from(self.duplicate_threshold))?;
        for threshold in &self.report_thresholds {
            Self::check_threshold("report_thresholds", f64::from(*threshold))?;
        }
        Self::check_threshold("suspicion_threshold", self.suspicion_threshold)?;

        if !self.min_test_ratio.is_finite() || !(0.0..1.0).contains(&self.min_test_ratio) {
            return Err(ConfigError::InvalidRatio {
                name: "min_test_ratio",
                value: self.min_test_ratio,
            });
        }
        if !self.buried_sensitive_ratio.is_finite()
            || !(0.0..1.0).contains(&self.buried_sensitive_ratio)
        {
            return Err(ConfigError::InvalidRatio {
                name: "buried_sensitive_ratio",
                value: self.buried_sensitive_ratio,
            });
        }

        if self.new_account_days < 1 {
            return Err(ConfigError::NonPositive {
                name: "new_account_days",
                value: self.new_account_days,
            });
        }
        if self.temporal_window_hours < 1 {
            return Err(ConfigError::NonPositive {
                name: "temporal_window_hours",
                value: self.temporal_window_hours,
            });
        }
        if self.embedding_dimension == 0 {
            return Err(ConfigError::NonPositive {
                name: "embedding_dimension",
                value: 0,
            });
        }

        if self.temporal_min_cluster < 2 {
            return Err(ConfigError::ClusterSizeTooSmall {
                name: "temporal_min_cluster",
                value: self.temporal_min_cluster,
            });
        }
        if self.temporal_min_cluster_large < self.temporal_min_cluster {
            return Err(ConfigError::ClusterSizeTooSmall {
                name: "temporal_min_cluster_large",
                value: self.temporal_min_cluster_large,
            });
        }

        for (name, value) in [
            ("severity_weights.high", self.severity_weights.high),
            ("severity_weights.medium", self.severity_weights.medium),
            ("severity_weights.low", self.severity_weights.low),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(ConfigError::InvalidWeight {
                    name: name.to_string(),
                    value,
                });
            }
        }
        for (name, value) in &self.rule_weights {
            if !value.is_finite() || *value < 0.0 {
                return Err(ConfigError::InvalidWeight {
                    name: name.clone(),
                    value: *value,
                });
            }
        }

        Ok(())
    }

    /// Multiplier for a rule, `1.0` unless overridden.
    pub fn rule_weight(&self, rule_name: &str) -> f64 {
        self.rule_weights.get(rule_name).copied().unwrap_or(1.0)
    }

    fn check_threshold(name: &'static str, value: f64) -> Result<(), ConfigError> {
        if !value.is_finite() || value <= 0.0 || value > 1.0 {
            return Err(ConfigError::InvalidThreshold { name, value });
        }
        Ok(())
    }

    fn parse_f64_from_env(var_name: &'static str, default: f64) -> Result<f64, ConfigError> {
        match env::var(var_name) {
            Ok(value) => value
                .trim()
                .parse()
                .map_err(|e| ConfigError::FloatParseError {
                    var: var_name,
                    value,
                    source: e,
                }),
            Err(_) => Ok(default),
        }
    }

    fn parse_i64_from_env(var_name: &'static str, default: i64) -> Result<i64, ConfigError> {
        match env::var(var_name) {
            Ok(value) => value
                .trim()
                .parse()
                .map_err(|e| ConfigError::IntParseError {
                    var: var_name,
                    value,
                    source: e,
                }),
            Err(_) => Ok(default),
        }
    }

    fn parse_u64_from_env(var_name: &'static str, default: u64) -> Result<u64, ConfigError> {
        match env::var(var_name) {
            Ok(value) => value
                .trim()
                .parse()
                .map_err(|e| ConfigError::IntParseError {
                    var: var_name,
                    value,
                    source: e,
                }),
            Err(_) => Ok(default),
        }
    }

    fn parse_usize_from_env(var_name: &'static str, default: usize) -> Result<usize, ConfigError> {
        match env::var(var_name) {
            Ok(value) => value
                .trim()
                .parse()
                .map_err(|e| ConfigError::IntParseError {
                    var: var_name,
                    value,
                    source: e,
                }),
            Err(_) => Ok(default),
        }
    }

    fn parse_string_from_env(var_name: &str, default: String) -> String {
        env::var(var_name).unwrap_or(default)
    }

    fn parse_optional_string_from_env(var_name: &str) -> Option<String> {
        env::var(var_name)
            .ok()
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
    }

    fn parse_list_from_env(var_name: &str, default: Vec<String>) -> Vec<String> {
        match env::var(var_name) {
            Ok(value) => value
                .split(',')
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .collect(),
            Err(_) => default,
        }
    }

    fn parse_threshold_list_from_env(
        var_name: &'static str,
        default: Vec<f32>,
    ) -> Result<Vec<f32>, ConfigError> {
        match env::var(var_name) {
            Ok(value) => value
                .split(',')
                .map(|s| s.trim())
                .filter(|s| !s.is_empty())
                .map(|s| {
                    s.parse::<f32>().map_err(|e| ConfigError::FloatParseError {
                        var: var_name,
                        value: s.to_string(),
                        source: e,
                    })
                })
                .collect(),
            Err(_) => Ok(default),
        }
    }

    /// Parses `rule=weight` pairs, e.g. `sensitive_paths=2.0,new_account=0.5`.
    fn parse_rule_weights_from_env(
        var_name: &'static str,
    ) -> Result<HashMap<String, f64>, ConfigError> {
        let Ok(value) = env::var(var_name) else {
            return Ok(HashMap::new());
        };

        let mut weights = HashMap::new();
        for entry in value.split(',').map(|s| s.trim()).filter(|s| !s.is_empty()) {
            let Some((name, weight)) = entry.split_once('=') else {
                return Err(ConfigError::InvalidWeightSpec {
                    entry: entry.to_string(),
                });
            };
            let weight: f64 =
                weight
                    .trim()
                    .parse()
                    .map_err(|e| ConfigError::FloatParseError {
                        var: var_name,
                        value: entry.to_string(),
                        source: e,
                    })?;
            weights.insert(name.trim().to_string(), weight);
        }
        Ok(weights)
    }
}

/// Built-in sensitive path patterns: security-adjacent code, CI/CD
/// surfaces, and dependency manifests. Matched case-insensitively as
/// substrings (or as globs when the pattern contains glob metacharacters).
pub fn default_sensitive_paths() -> Vec<String> {
    [
        "auth",
        "crypto",
        "security",
        "login",
        "password",
        ".github/workflows",
        "ci",
        "cd",
        "deploy",
        "Dockerfile",
        "docker-compose",
        "requirements.txt",
        "package.json",
        "pyproject.toml",
        "Gemfile",
        "go.mod",
        "Cargo.toml",
    ]
    .into_iter()
    .map(String::from)
    .collect()
}
