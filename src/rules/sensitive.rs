use globset::{GlobBuilder, GlobSet, GlobSetBuilder};

use super::error::RuleError;

/// Matches changed file paths against the configured sensitive patterns.
///
/// A pattern containing glob metacharacters (`*`, `?`, `[`) compiles to a
/// case-insensitive glob over the full path. Any other pattern matches as a
/// case-insensitive substring, so `auth` catches `src/auth/mod.rs` and
/// `OAuthToken.java` alike.
#[derive(Debug)]
pub struct SensitiveMatcher {
    substrings: Vec<String>,
    globs: GlobSet,
}

impl SensitiveMatcher {
    /// Builds a matcher from pattern strings. Invalid globs are rejected
    /// here, at startup, never mid-run.
    pub fn new(patterns: &[String]) -> Result<Self, RuleError> {
        let mut substrings = Vec::new();
        let mut builder = GlobSetBuilder::new();

        for pattern in patterns {
            let pattern = pattern.trim();
            if pattern.is_empty() {
                continue;
            }
            if is_glob(pattern) {
                let glob = GlobBuilder::new(pattern)
                    .case_insensitive(true)
                    .build()
                    .map_err(|source| RuleError::InvalidPattern {
                        pattern: pattern.to_string(),
                        source,
                    })?;
                builder.add(glob);
            } else {
                substrings.push(pattern.to_lowercase());
            }
        }

        let globs = builder.build()?;
        Ok(Self { substrings, globs })
    }

    /// Returns `true` if `path` matches any configured pattern.
    pub fn is_match(&self, path: &str) -> bool {
        let lower = path.to_lowercase();
        self.substrings.iter().any(|p| lower.contains(p.as_str())) || self.globs.is_match(path)
    }

    /// Total number of compiled patterns.
    pub fn pattern_count(&self) -> usize {
        self.substrings.len() + self.globs.len()
    }
}

fn is_glob(pattern: &str) -> bool {
    pattern.chars().any(|c| matches!(c, '*' | '?' | '['))
}
