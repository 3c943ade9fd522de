//! Display pipeline: stored content → HTML → sanitized HTML.

use serde_json::Value;

use crate::config::QuillConfig;
use crate::render::delta_to_html;
use crate::sanitize::sanitize;

/// Content handed to the viewer.
#[derive(Debug, Clone, PartialEq)]
pub enum ViewerContent {
    /// Structured Delta value
    Delta(Value),
    /// Stored text: a JSON Delta, or legacy HTML when it is not one
    Json(String),
    /// Content explicitly flagged as legacy HTML
    Html(String),
}

impl ViewerContent {
    /// HTML before sanitizing.
    pub fn to_html(&self) -> String {
        match self {
            ViewerContent::Delta(value) => delta_to_html(value),
            ViewerContent::Json(text) => match serde_json::from_str::<Value>(text) {
                Ok(value) if value.get("ops").is_some() => delta_to_html(&value),
                _ => {
                    log::debug!("content is not a delta, treating as legacy html");
                    text.clone()
                }
            },
            ViewerContent::Html(html) => html.clone(),
        }
    }
}

/// Per-call viewer switches, layered on top of [`QuillConfig`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ViewerOptions {
    /// Sanitize this render. Only takes effect when `config.sanitize.enabled` is also set.
    pub sanitize: bool,
}

impl Default for ViewerOptions {
    fn default() -> Self {
        Self { sanitize: true }
    }
}

impl ViewerOptions {
    /// Skip sanitizing for this call, whatever the config says.
    pub fn raw() -> Self {
        Self { sanitize: false }
    }
}

/// Render content for display, sanitizing when the config enables it.
pub fn render_for_display(content: &ViewerContent, config: &QuillConfig) -> String {
    render_for_display_with(content, config, ViewerOptions::default())
}

/// Render content for display; sanitizes only when both the call and the config ask for it.
pub fn render_for_display_with(
    content: &ViewerContent,
    config: &QuillConfig,
    options: ViewerOptions,
) -> String {
    let html = content.to_html();
    if options.sanitize && config.sanitize.enabled {
        sanitize(&html, &config.sanitize.allowed_tags)
    } else {
        html
    }
}
