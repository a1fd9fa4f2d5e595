//! Project vision documents.
//!
//! A repository may describe itself in a small YAML document: what the
//! project is, the principles it holds, the anti-patterns it rejects, and
//! the areas reviewers watch most closely. A triage run consumes only
//! `focus_areas`, folding them into the sensitive-path patterns before any
//! rule fires. The remaining fields are parsed and kept for downstream
//! consumers (comment rendering, alignment tooling) outside this crate.

pub mod error;

#[cfg(test)]
mod tests;

pub use error::VisionError;

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::TriageConfig;

/// One named principle from the vision document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VisionPrinciple {
    pub name: String,
    #[serde(default)]
    pub description: String,
}

/// A project vision document. Every field is optional in the YAML source;
/// absent fields parse as empty.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct VisionDocument {
    #[serde(default)]
    pub project: String,
    #[serde(default)]
    pub principles: Vec<VisionPrinciple>,
    #[serde(default)]
    pub anti_patterns: Vec<String>,
    #[serde(default)]
    pub focus_areas: Vec<String>,
}

impl VisionDocument {
    /// Loads and parses a YAML vision document from disk.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, VisionError> {
        let path = path.as_ref();
        let raw = fs::read_to_string(path).map_err(|source| VisionError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        let doc: Self = serde_yaml::from_str(&raw).map_err(|source| VisionError::Parse {
            path: path.to_path_buf(),
            source,
        })?;

        debug!(
            project = %doc.project,
            principles = doc.principles.len(),
            focus_areas = doc.focus_areas.len(),
            "Loaded vision document"
        );

        Ok(doc)
    }

    /// Folds `focus_areas` into the sensitive-path patterns. Entries already
    /// present are not duplicated.
    pub fn extend_sensitive_paths(&self, config: &mut TriageConfig) {
        for area in &self.focus_areas {
            if !config.sensitive_paths.contains(area) {
                config.sensitive_paths.push(area.clone());
            }
        }
    }
}
