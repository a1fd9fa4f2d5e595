//! Canonical embedding text.
//!
//! Every provider embeds exactly this canonicalization, so vectors from the
//! same PR content are comparable regardless of which provider produced them.

use crate::model::PullRequest;

/// Max description characters included in the canonical text.
pub const MAX_DESCRIPTION_CHARS: usize = 1_000;

/// Max leading diff lines included in the canonical text.
pub const MAX_DIFF_LINES: usize = 100;

/// Builds the canonical text for one PR: title, truncated description,
/// changed paths, and the head of the diff, newline-joined. Absent parts
/// are skipped rather than emitted as empty sections.
pub fn canonical_text(pr: &PullRequest) -> String {
    let mut parts = vec![pr.title.clone()];

    if !pr.body.is_empty() {
        parts.push(truncate_chars(&pr.body, MAX_DESCRIPTION_CHARS));
    }

    if !pr.files.is_empty() {
        parts.push(pr.changed_paths().collect::<Vec<_>>().join(" "));
    }

    if let Some(diff) = pr.diff.as_deref()
        && !diff.is_empty()
    {
        let head: Vec<&str> = diff.lines().take(MAX_DIFF_LINES).collect();
        parts.push(head.join("\n"));
    }

    parts.join("\n")
}

/// True when the PR carries any text worth embedding. PRs failing this are
/// excluded from clustering instead of being embedded as near-empty strings.
pub fn has_embeddable_content(pr: &PullRequest) -> bool {
    !pr.title.trim().is_empty()
        || !pr.body.trim().is_empty()
        || pr.diff.as_deref().is_some_and(|d| !d.trim().is_empty())
}

fn truncate_chars(text: &str, max_chars: usize) -> String {
    text.chars().take(max_chars).collect()
}
