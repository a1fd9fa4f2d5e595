//! Pull request input records.
//!
//! These are the fully-resolved records handed over by the fetch layer. The
//! pipeline never performs network calls itself; anything the fetch layer
//! could not resolve (diff too large, account metadata rate-limited) arrives
//! as `None` and is handled downstream as missing data, not as an error.


use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PullRequest {
    pub number: u64,
    pub title: String,
    #[serde(default)]
    pub body: String,
    pub author: Author,
    #[serde(default)]
    pub files: Vec<ChangedFile>,
    /// Unified diff text. `None` when the fetch layer could not resolve it.
    #[serde(default)]
    pub diff: Option<String>,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub draft: bool,
}

impl PullRequest {
    pub fn total_additions(&self) -> u64 {
        self.files.iter().map(|f| u64::from(f.additions)).sum()
    }

    pub fn total_deletions(&self) -> u64 {
        self.files.iter().map(|f| u64::from(f.deletions)).sum()
    }

    pub fn total_changes(&self) -> u64 {
        self.total_additions() + self.total_deletions()
    }

    pub fn changed_paths(&self) -> impl Iterator<Item = &str> {
        self.files.iter().map(|f| f.path.as_str())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Author {
    pub login: String,
    /// Account creation time, when the fetch layer resolved it.
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    /// Prior merged PR count on this repository, when resolved.
    #[serde(default)]
    pub merged_pr_count: Option<u32>,
}

impl Author {
    /// Whole days between account creation and `reference`. `None` when the
    /// creation time is unknown; negative when the account postdates
    /// `reference` (clock skew between hosts).
    pub fn account_age_days(&self, reference: DateTime<Utc>) -> Option<i64> {
        self.created_at
            .map(|created| (reference - created).num_days())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChangedFile {
    pub path: String,
    #[serde(default)]
    pub status: FileStatus,
    #[serde(default)]
    pub additions: u32,
    #[serde(default)]
    pub deletions: u32,
}

impl ChangedFile {
    pub fn new(path: impl Into<String>, additions: u32, deletions: u32) -> Self {
        Self {
            path: path.into(),
            status: FileStatus::Modified,
            additions,
            deletions,
        }
    }

    pub fn changes(&self) -> u64 {
        u64::from(self.additions) + u64::from(self.deletions)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FileStatus {
    Added,
    #[default]
    Modified,
    Removed,
    Renamed,
    /// Anything the source host reports that we do not model.
    #[serde(other)]
    Other,
}
