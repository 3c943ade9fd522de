//! # Quill Delta toolkit
//!
//! Renders, sanitizes and validates documents produced by the Quill rich-text
//! editor. A document (a "Delta") is an ordered list of insert operations with
//! optional formatting attributes, stored as JSON:
//!
//! ```json
//! {"ops":[{"insert":"Hello "},{"insert":"World","attributes":{"bold":true}},{"insert":"\n"}]}
//! ```
//!
//! ## Features
//! - Lenient Delta parsing from JSON text or `serde_json::Value`
//! - HTML rendering with a fixed attribute precedence (never fails)
//! - Tag allow-list sanitizing for rendered or legacy HTML
//! - Content length and format/embed validation (fail-fast)
//! - YAML configuration and a local filesystem image upload store
//!
//! ## Example
//! ```ignore
//! use quill_delta::{delta_to_html, sanitize, validate_length, LengthRule, TagAllowList};
//!
//! let raw = r#"{"ops":[{"insert":"Hello "},{"insert":"World","attributes":{"bold":true}}]}"#;
//! validate_length(raw, &LengthRule::between(5, 200))?;
//! let html = sanitize(&delta_to_html(raw), &TagAllowList::default());
//! ```

pub mod config;
pub mod delta;
pub mod error;
pub mod length;
pub mod plain_text;
pub mod render;
pub mod sanitize;
pub mod upload;
pub mod validator;
pub mod viewer;

// --- Core types ---
pub use config::QuillConfig;
pub use delta::{parse_delta, Attributes, Delta, DeltaInput, Embed, Insert, Operation};
pub use error::{QuillError, QuillResult};

// --- Transforms ---
pub use length::{validate_length, LengthRule};
pub use plain_text::{extract_plain_text, plain_text_length};
pub use render::{delta_to_html, escape_html};
pub use sanitize::{html_to_plain_delta, sanitize, strip_tags, TagAllowList};
pub use validator::{validate_delta, DeltaRule};
pub use viewer::{render_for_display, render_for_display_with, ViewerContent, ViewerOptions};

// --- Upload collaborator ---
pub use upload::{ImageUpload, LocalUploadStore, StoredImage, UploadStore};

/// Run both validators configured in `config`: format/embed rules first, then length.
pub fn validate_with_config<'a>(raw: impl Into<DeltaInput<'a>>, config: &QuillConfig) -> QuillResult<()> {
    let raw = raw.into();
    validate_delta(raw, &config.validation.delta_rule())?;
    validate_length(raw, &config.validation.length_rule())
}
