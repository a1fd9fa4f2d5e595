//! Test fixtures for integration tests.

use chrono::{DateTime, Duration, TimeZone, Utc};

use gatewarden::model::{Author, ChangedFile, PullRequest};

pub const VETERAN_ACCOUNT_AGE_DAYS: i64 = 1500;

pub const VETERAN_MERGED_PRS: u32 = 25;

/// Reference timestamp shared by every fixture-driven run.
pub fn fixed_reference_time() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 6, 1, 12, 0, 0).unwrap()
}

/// Builder for pull request records. Defaults to an unremarkable PR from a
/// long-standing contributor, submitted one hour before the reference time.
pub struct PullRequestBuilder {
    number: u64,
    title: String,
    body: String,
    login: String,
    account_age_days: Option<i64>,
    merged_pr_count: Option<u32>,
    files: Vec<ChangedFile>,
    diff: Option<String>,
    hours_ago: i64,
    draft: bool,
}

impl PullRequestBuilder {
    pub fn new(number: u64) -> Self {
        Self {
            number,
            title: format!("Routine maintenance change {number}"),
            body: String::new(),
            login: format!("contributor-{number}"),
            account_age_days: Some(VETERAN_ACCOUNT_AGE_DAYS),
            merged_pr_count: Some(VETERAN_MERGED_PRS),
            files: Vec::new(),
            diff: None,
            hours_ago: 1,
            draft: false,
        }
    }

    pub fn title(mut self, title: &str) -> Self {
        self.title = title.to_string();
        self
    }

    pub fn body(mut self, body: &str) -> Self {
        self.body = body.to_string();
        self
    }

    pub fn login(mut self, login: &str) -> Self {
        self.login = login.to_string();
        self
    }

    pub fn account_age_days(mut self, days: i64) -> Self {
        self.account_age_days = Some(days);
        self
    }

    pub fn merged_pr_count(mut self, count: u32) -> Self {
        self.merged_pr_count = Some(count);
        self
    }

    /// Account created 10 days before the reference time, zero merged PRs.
    pub fn newcomer(mut self) -> Self {
        self.account_age_days = Some(10);
        self.merged_pr_count = Some(0);
        self
    }

    /// Author metadata the fetch layer could not resolve.
    pub fn unknown_author(mut self) -> Self {
        self.account_age_days = None;
        self.merged_pr_count = None;
        self
    }

    pub fn file(mut self, path: &str, additions: u32, deletions: u32) -> Self {
        self.files.push(ChangedFile::new(path, additions, deletions));
        self
    }

    pub fn diff(mut self, diff: &str) -> Self {
        self.diff = Some(diff.to_string());
        self
    }

    pub fn created_hours_ago(mut self, hours: i64) -> Self {
        self.hours_ago = hours;
        self
    }

    pub fn draft(mut self) -> Self {
        self.draft = true;
        self
    }

    pub fn build(self) -> PullRequest {
        let reference = fixed_reference_time();
        PullRequest {
            number: self.number,
            title: self.title,
            body: self.body,
            author: Author {
                login: self.login,
                created_at: self.account_age_days.map(|days| reference - Duration::days(days)),
                merged_pr_count: self.merged_pr_count,
            },
            files: self.files,
            diff: self.diff,
            created_at: reference - Duration::hours(self.hours_ago),
            draft: self.draft,
        }
    }
}
