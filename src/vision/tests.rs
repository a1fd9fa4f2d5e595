use std::io::Write;

use tempfile::NamedTempFile;

use super::{VisionDocument, VisionError};
use crate::config::TriageConfig;
use crate::rules::SensitiveMatcher;

fn write_doc(contents: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(contents.as_bytes()).unwrap();
    file
}

#[test]
fn test_load_full_document() {
    let file = write_doc(
        r#"
project: gatewarden
principles:
  - name: small-diffs
    description: Prefer reviewable changes
anti_patterns:
  - drive-by refactors
focus_areas:
  - src/billing
  - "*.pem"
"#,
    );

    let doc = VisionDocument::load(file.path()).unwrap();

    assert_eq!(doc.project, "gatewarden");
    assert_eq!(doc.principles.len(), 1);
    assert_eq!(doc.principles[0].name, "small-diffs");
    assert_eq!(doc.principles[0].description, "Prefer reviewable changes");
    assert_eq!(doc.anti_patterns, vec!["drive-by refactors"]);
    assert_eq!(doc.focus_areas, vec!["src/billing", "*.pem"]);
}

#[test]
fn test_absent_fields_parse_as_empty() {
    let file = write_doc(
        r#"
project: demo
principles:
  - name: tidy
"#,
    );

    let doc = VisionDocument::load(file.path()).unwrap();

    assert_eq!(doc.project, "demo");
    assert_eq!(doc.principles[0].description, "");
    assert!(doc.anti_patterns.is_empty());
    assert!(doc.focus_areas.is_empty());
}

#[test]
fn test_missing_file_is_io_error() {
    let err = VisionDocument::load("/nonexistent/vision.yaml").unwrap_err();
    assert!(matches!(err, VisionError::Io { .. }));
}

#[test]
fn test_wrong_shape_is_parse_error() {
    let file = write_doc("focus_areas: 7\n");
    let err = VisionDocument::load(file.path()).unwrap_err();
    assert!(matches!(err, VisionError::Parse { .. }));
}

#[test]
fn test_malformed_yaml_is_parse_error() {
    let file = write_doc("focus_areas: [unclosed\n");
    let err = VisionDocument::load(file.path()).unwrap_err();
    assert!(matches!(err, VisionError::Parse { .. }));
}

#[test]
fn test_focus_areas_extend_sensitive_patterns() {
    let doc = VisionDocument {
        focus_areas: vec!["src/billing".to_string(), "auth".to_string()],
        ..VisionDocument::default()
    };
    let mut config = TriageConfig::default();
    let before = config.sensitive_paths.len();

    doc.extend_sensitive_paths(&mut config);

    // "auth" is already a built-in pattern and must not be duplicated.
    assert_eq!(config.sensitive_paths.len(), before + 1);
    assert!(config.sensitive_paths.iter().any(|p| p == "src/billing"));

    let matcher = SensitiveMatcher::new(&config.sensitive_paths).unwrap();
    assert!(matcher.is_match("src/billing/invoice.py"));
}
