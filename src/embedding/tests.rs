use super::*;
use crate::model::{Author, ChangedFile, PullRequest};
use chrono::{TimeZone, Utc};

fn sample_pr(title: &str, body: &str, diff: Option<&str>) -> PullRequest {
    PullRequest {
        number: 1,
        title: title.to_string(),
        body: body.to_string(),
        author: Author {
            login: "tester".to_string(),
            created_at: None,
            merged_pr_count: None,
        },
        files: vec![
            ChangedFile::new("src/integrations/slack.rs", 12, 4),
            ChangedFile::new("src/integrations/mod.rs", 2, 0),
        ],
        diff: diff.map(String::from),
        created_at: Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap(),
        draft: false,
    }
}

#[test]
fn test_canonical_text_contains_all_sections_in_order() {
    let pr = sample_pr(
        "Rename channel ids",
        "Replaces hyphens with underscores.",
        Some("--- a/src/integrations/slack.rs\n+++ b/src/integrations/slack.rs"),
    );

    let text = canonical_text(&pr);
    let title_pos = text.find("Rename channel ids").unwrap();
    let body_pos = text.find("Replaces hyphens").unwrap();
    let files_pos = text.find("src/integrations/slack.rs").unwrap();
    let diff_pos = text.find("--- a/").unwrap();

    assert!(title_pos < body_pos);
    assert!(body_pos < files_pos);
    assert!(files_pos < diff_pos);
}

#[test]
fn test_canonical_text_skips_absent_sections() {
    let mut pr = sample_pr("Only a title", "", None);
    pr.files.clear();

    assert_eq!(canonical_text(&pr), "Only a title");
}

#[test]
fn test_canonical_text_truncates_description() {
    let long_body = "x".repeat(5_000);
    let pr = sample_pr("t", &long_body, None);

    let text = canonical_text(&pr);
    let body_part = text
        .lines()
        .nth(1)
        .expect("body line should be present");
    assert_eq!(body_part.chars().count(), text::MAX_DESCRIPTION_CHARS);
}

#[test]
fn test_canonical_text_truncates_description_on_char_boundary() {
    let long_body = "é".repeat(2_000);
    let pr = sample_pr("t", &long_body, None);

    // Must not panic slicing mid-codepoint.
    let text = canonical_text(&pr);
    assert!(text.contains('é'));
}

#[test]
fn test_canonical_text_caps_diff_lines() {
    let diff: String = (0..500)
        .map(|i| format!("+line {i}\n"))
        .collect();
    let pr = sample_pr("t", "b", Some(&diff));

    let text = canonical_text(&pr);
    assert!(text.contains("+line 99"));
    assert!(!text.contains("+line 100\n"));
}

#[test]
fn test_has_embeddable_content() {
    assert!(has_embeddable_content(&sample_pr("title", "", None)));
    assert!(has_embeddable_content(&sample_pr("", "body", None)));
    assert!(has_embeddable_content(&sample_pr("", "", Some("+x"))));

    let mut empty = sample_pr("", "   ", Some("  \n "));
    assert!(!has_embeddable_content(&empty));
    empty.diff = None;
    assert!(!has_embeddable_content(&empty));
}

#[tokio::test]
async fn test_hashed_embedder_is_deterministic() {
    let embedder = HashedEmbedder::default();

    let a = embedder.embed("fix the token refresh race").await.unwrap();
    let b = embedder.embed("fix the token refresh race").await.unwrap();

    assert_eq!(a, b);
    assert_eq!(a.len(), HashedEmbedder::DEFAULT_DIMENSION);
}

#[tokio::test]
async fn test_hashed_embedder_is_normalized() {
    let embedder = HashedEmbedder::new(64);
    let vector = embedder.embed("some reasonable text input").await.unwrap();

    let norm: f32 = vector.iter().map(|v| v * v).sum::<f32>().sqrt();
    assert!((norm - 1.0).abs() < 1e-5);
}

#[tokio::test]
async fn test_hashed_embedder_empty_text_gives_zero_vector() {
    let embedder = HashedEmbedder::new(32);
    let vector = embedder.embed("").await.unwrap();

    assert_eq!(vector.len(), 32);
    assert!(vector.iter().all(|v| *v == 0.0));
}

#[tokio::test]
async fn test_hashed_embedder_distinguishes_texts() {
    let embedder = HashedEmbedder::default();

    let a = embedder.embed("add retry logic to the uploader").await.unwrap();
    let b = embedder.embed("rewrite the billing reconciliation").await.unwrap();

    assert_ne!(a, b);
}

#[tokio::test]
async fn test_default_embed_batch_preserves_order() {
    let embedder = HashedEmbedder::default();
    let texts = vec!["first text".to_string(), "second text".to_string()];

    let batch = embedder.embed_batch(&texts).await.unwrap();
    let first = embedder.embed("first text").await.unwrap();
    let second = embedder.embed("second text").await.unwrap();

    assert_eq!(batch, vec![first, second]);
}

#[tokio::test]
async fn test_cached_embedder_serves_repeat_from_cache() {
    let scripted = ScriptedEmbedder::new(16);
    let cached = CachedEmbedder::new(scripted);

    let a = cached.embed("same text").await.unwrap();
    let b = cached.embed("same text").await.unwrap();

    assert_eq!(a, b);
    assert_eq!(cached.len(), 1);
}

#[tokio::test]
async fn test_cached_embedder_does_not_cache_failures() {
    let scripted = ScriptedEmbedder::new(16).failing_on("doomed");
    let cached = CachedEmbedder::new(scripted);

    assert!(cached.embed("doomed text").await.is_err());
    assert!(cached.is_empty());
    assert!(cached.embed("doomed text").await.is_err());
}

#[tokio::test]
async fn test_cached_embedder_batch_mixes_hits_and_misses() {
    let scripted = ScriptedEmbedder::new(16)
        .with_vector("alpha", vec![1.0; 16])
        .with_vector("beta", vec![0.5; 16]);
    let cached = CachedEmbedder::new(scripted);

    let first = cached.embed("alpha text").await.unwrap();

    let texts = vec!["alpha text".to_string(), "beta text".to_string()];
    let batch = cached.embed_batch(&texts).await.unwrap();

    assert_eq!(batch.len(), 2);
    assert_eq!(batch[0], first);
    assert_eq!(batch[1], vec![0.5; 16]);
    assert_eq!(cached.len(), 2);
}

#[tokio::test]
async fn test_scripted_embedder_counts_calls() {
    let scripted = ScriptedEmbedder::new(16).with_vector("hello", vec![1.0; 16]);

    scripted.embed("hello there").await.unwrap();
    scripted.embed("unscripted text").await.unwrap();

    assert_eq!(scripted.call_count(), 2);
}

#[tokio::test]
async fn test_scripted_failure_reports_reason() {
    let scripted = ScriptedEmbedder::new(16).failing_on("rate limited");

    let err = scripted.embed("this pr got rate limited").await.unwrap_err();
    assert!(matches!(err, EmbeddingError::Unavailable { .. }));
    assert!(err.to_string().contains("rate limited"));
}
