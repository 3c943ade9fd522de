use pretty_assertions::assert_eq;
use quill_delta::{
    delta_to_html, extract_plain_text, parse_delta, render_for_display, sanitize,
    validate_delta, validate_length, validate_with_config, DeltaRule, LengthRule, QuillConfig,
    QuillError, TagAllowList, ViewerContent,
};
use serde_json::{json, Value};
use std::fs;
use std::path::PathBuf;

fn fixture_path(filename: &str) -> PathBuf {
    let mut path = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    path.push("tests");
    path.push("fixtures");
    path.push(filename);
    path
}

fn fixture(filename: &str) -> String {
    fs::read_to_string(fixture_path(filename)).unwrap()
}

fn fixture_config() -> QuillConfig {
    QuillConfig::load(fixture_path("quill.yaml")).unwrap()
}

// Rendering scenarios
#[test]
fn test_bold_scenario() {
    let html = delta_to_html(
        r#"{"ops":[{"insert":"Hello "},{"insert":"World","attributes":{"bold":true}},{"insert":"\n"}]}"#,
    );
    assert!(html.contains("Hello <strong>World</strong>"));
}

#[test]
fn test_image_scenario() {
    let html = delta_to_html(r#"{"ops":[{"insert":{"image":"https://x/i.jpg"}},{"insert":"\n"}]}"#);
    assert!(html.contains("<img"));
    assert!(html.contains(r#"src="https://x/i.jpg""#));
}

#[test]
fn test_link_scenario() {
    let html = delta_to_html(&json!({"ops": [
        {"insert": "Click here", "attributes": {"link": "https://example.com"}},
        {"insert": "\n"}
    ]}));
    assert!(html.contains(r#"href="https://example.com""#));
    assert!(html.contains("Click here"));
}

#[test]
fn test_render_article_fixture() {
    let html = delta_to_html(&fixture("article.json"));
    let expected = concat!(
        "Release notes<h1><br></h1>",
        "This release adds ",
        r#"<a href="https://example.com/docs"><strong>image uploads</strong></a>"#,
        " and fixes <em>H</em><sub>2</sub>O rendering.<br>",
        r#"<img src="https://example.com/shot.png" alt="Screenshot" width="640"><br>"#,
        "Faster startup<ul><li><br></li></ul>",
        "Smaller binaries<ul><li><br></li></ul>",
    );
    assert_eq!(html, expected);
}

#[test]
fn test_render_skips_broken_operation() {
    assert_eq!(delta_to_html(&fixture("broken-op.json")), "First line<br>Third line<br>");
}

#[test]
fn test_render_malformed_is_empty() {
    assert_eq!(delta_to_html(&fixture("not-a-delta.json")), "");
    assert_eq!(delta_to_html(&json!({"invalid": "data"})), "");
    assert_eq!(delta_to_html("{"), "");
}

#[test]
fn test_plain_text_roundtrip() {
    let text = "Tom & Jerry <3 \"quotes\"";
    let html = delta_to_html(&json!({"ops": [{"insert": text}]}));
    assert_eq!(html, quill_delta::escape_html(text));
}

#[test]
fn test_order_preserved() {
    let ops: Vec<Value> = (0..20).map(|i| json!({"insert": format!("[{}]", i)})).collect();
    let html = delta_to_html(&json!({ "ops": ops }));
    let expected: String = (0..20).map(|i| format!("[{}]", i)).collect();
    assert_eq!(html, expected);
}

#[test]
fn test_output_bounded_by_input() {
    let delta = fixture("article.json");
    let html = delta_to_html(&delta);
    assert!(html.len() < delta.len() * 4);
}

// Plain text
#[test]
fn test_extract_plain_text_fixture() {
    let delta = parse_delta(&fixture("article.json")).unwrap();
    assert_eq!(
        extract_plain_text(&delta.ops),
        "Release notes This release adds image uploads and fixes H2O rendering. Faster startup Smaller binaries"
    );
}

// Length validation scenarios
#[test]
fn test_length_too_short_scenario() {
    assert_eq!(
        validate_length(r#"{"ops":[{"insert":"Hi\n"}]}"#, &LengthRule::at_least(10)),
        Err(QuillError::TooShort { min: 10 })
    );
}

#[test]
fn test_required_scenario() {
    assert_eq!(
        validate_length(r#"{"ops":[{"insert":"\n"}]}"#, &LengthRule::required()),
        Err(QuillError::EmptyContent)
    );
}

#[test]
fn test_length_error_codes() {
    let err = validate_length("invalid json", &LengthRule::default()).unwrap_err();
    assert_eq!(err.code(), "invalid_format");
    assert!(err.is_malformed());
    assert_eq!(err.index(), None);
}

// Delta validation scenarios
#[test]
fn test_image_not_allowed_scenario() {
    let err = validate_delta(
        r#"{"ops":[{"insert":{"image":"https://x/i.jpg"}}]}"#,
        &DeltaRule::without_images(),
    )
    .unwrap_err();
    assert_eq!(err, QuillError::ImageNotAllowed { index: 0 });
    assert_eq!(err.code(), "image_not_allowed");
}

#[test]
fn test_broken_op_fails_closed() {
    let err = validate_delta(&fixture("broken-op.json"), &DeltaRule::default()).unwrap_err();
    assert_eq!(err, QuillError::MissingInsert { index: 1 });
}

#[test]
fn test_validator_and_renderer_disagree_on_malformed_ops() {
    let raw = fixture("broken-op.json");
    assert!(validate_delta(&raw, &DeltaRule::default()).is_err());
    assert!(!delta_to_html(&raw).is_empty());
}

// Sanitizer scenarios
#[test]
fn test_sanitize_scenario() {
    let out = sanitize(
        "<p>Hello</p><script>alert(1)</script><b>World</b>",
        &TagAllowList::default(),
    );
    assert!(out.contains("<p>Hello</p>"));
    assert!(out.contains("<b>World</b>"));
    assert!(!out.contains("<script>"));
    assert!(out.contains("alert(1)"));
}

#[test]
fn test_sanitize_idempotent_on_rendered_output() {
    let allowed = TagAllowList::default();
    let html = delta_to_html(&fixture("with-video.json"));
    let once = sanitize(&html, &allowed);
    assert_eq!(sanitize(&once, &allowed), once);
    assert!(!once.contains("<iframe"));
}

// Config-driven pipeline
#[test]
fn test_config_fixture_validates_article() {
    let config = fixture_config();
    assert!(validate_with_config(&fixture("article.json"), &config).is_ok());
}

#[test]
fn test_config_fixture_rejects_video() {
    let config = fixture_config();
    assert_eq!(
        validate_with_config(&fixture("with-video.json"), &config),
        Err(QuillError::VideoNotAllowed { index: 1 })
    );
}

#[test]
fn test_config_fixture_requires_content() {
    let config = fixture_config();
    assert_eq!(
        validate_with_config(r#"{"ops":[{"insert":"\n"}]}"#, &config),
        Err(QuillError::EmptyContent)
    );
    assert_eq!(
        validate_with_config(r#"{"ops":[{"insert":"short\n"}]}"#, &config),
        Err(QuillError::TooShort { min: 10 })
    );
}

#[test]
fn test_config_fixture_rejects_unlisted_format() {
    let config = fixture_config();
    let raw = r#"{"ops":[{"insert":"underlined text","attributes":{"underline":true}},{"insert":"\n"}]}"#;
    assert_eq!(
        validate_with_config(raw, &config),
        Err(QuillError::FormatNotAllowed {
            index: 0,
            format: "underline".to_string()
        })
    );
}

#[test]
fn test_display_pipeline_with_fixture_config() {
    let config = fixture_config();
    let html = render_for_display(&ViewerContent::Json(fixture("article.json")), &config);
    assert!(html.contains("<h1><br></h1>"));
    assert!(html.contains(r#"<img src="https://example.com/shot.png""#));

    let legacy = render_for_display(&ViewerContent::Json(fixture("not-a-delta.json")), &config);
    assert_eq!(legacy, fixture("not-a-delta.json"));
}
