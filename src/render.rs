//! Converts a Delta to an HTML fragment.
//!
//! Rendering never fails: malformed documents render as an empty string and
//! operations without an insert are skipped.

use serde_json::Value;

use crate::delta::{parse_delta, DeltaInput, Embed, Insert, Operation};

type WrapFn = fn(String, &Value) -> String;

/// One attribute-to-markup rule.
pub struct FormatRule {
    pub format: &'static str,
    wrap: WrapFn,
}

impl FormatRule {
    pub fn apply(&self, html: String, value: &Value) -> String {
        (self.wrap)(html, value)
    }
}

/// Wraps applied to text inserts, innermost first.
pub const FORMAT_PRECEDENCE: &[FormatRule] = &[
    FormatRule { format: "bold", wrap: wrap_bold },
    FormatRule { format: "italic", wrap: wrap_italic },
    FormatRule { format: "underline", wrap: wrap_underline },
    FormatRule { format: "strike", wrap: wrap_strike },
    FormatRule { format: "code", wrap: wrap_code },
    FormatRule { format: "link", wrap: wrap_link },
    FormatRule { format: "script", wrap: wrap_script },
    FormatRule { format: "header", wrap: wrap_header },
    FormatRule { format: "blockquote", wrap: wrap_blockquote },
    FormatRule { format: "code-block", wrap: wrap_code_block },
    FormatRule { format: "list", wrap: wrap_list },
];

/// Render a Delta (JSON text, value, or parsed) to HTML.
pub fn delta_to_html<'a>(raw: impl Into<DeltaInput<'a>>) -> String {
    match parse_delta(raw) {
        Ok(delta) => render_ops(&delta.ops),
        Err(e) => {
            log::debug!("delta not rendered: {}", e);
            String::new()
        }
    }
}

/// Render operations in document order.
pub fn render_ops(ops: &[Operation]) -> String {
    let mut html = String::new();
    for (index, op) in ops.iter().enumerate() {
        match &op.insert {
            Some(Insert::Text(text)) => html.push_str(&render_text(text, op)),
            Some(Insert::Embed(embed)) => html.push_str(&render_embed(embed, op)),
            None => log::debug!("skipping operation {} without insert", index),
        }
    }
    html
}

fn render_text(text: &str, op: &Operation) -> String {
    let mut html = escape_html(text);
    for rule in FORMAT_PRECEDENCE {
        if let Some(value) = op.attribute(rule.format) {
            html = rule.apply(html, value);
        }
    }
    // Also hits newlines that now sit inside block wraps (h1, li, blockquote).
    html.replace('\n', "<br>")
}

fn render_embed(embed: &Embed, op: &Operation) -> String {
    match embed {
        Embed::Image(src) => {
            let alt = op.attribute_text("alt").unwrap_or_default();
            let mut tag = format!(r#"<img src="{}" alt="{}""#, escape_html(src), escape_html(&alt));
            for dim in ["width", "height"] {
                if let Some(v) = op.attribute_text(dim) {
                    tag.push_str(&format!(r#" {}="{}""#, dim, escape_html(&v)));
                }
            }
            tag.push('>');
            tag
        }
        Embed::Video(src) => format!(
            r#"<iframe class="ql-video" src="{}" frameborder="0" allowfullscreen></iframe>"#,
            escape_html(src)
        ),
        Embed::Formula(source) => {
            format!(r#"<span class="ql-formula">{}</span>"#, escape_html(source))
        }
        Embed::Unknown(key) => {
            log::debug!("unknown embed '{}' not rendered", key);
            String::new()
        }
    }
}

/// Escape text for HTML body and attribute positions.
pub fn escape_html(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#039;")
}

fn wrap_bold(html: String, _: &Value) -> String {
    format!("<strong>{}</strong>", html)
}

fn wrap_italic(html: String, _: &Value) -> String {
    format!("<em>{}</em>", html)
}

fn wrap_underline(html: String, _: &Value) -> String {
    format!("<u>{}</u>", html)
}

fn wrap_strike(html: String, _: &Value) -> String {
    format!("<s>{}</s>", html)
}

fn wrap_code(html: String, _: &Value) -> String {
    format!("<code>{}</code>", html)
}

fn wrap_link(html: String, href: &Value) -> String {
    let href = crate::delta::scalar_text(href).unwrap_or_default();
    format!(r#"<a href="{}">{}</a>"#, escape_html(&href), html)
}

fn wrap_script(html: String, kind: &Value) -> String {
    let tag = if kind.as_str() == Some("super") { "sup" } else { "sub" };
    format!("<{0}>{1}</{0}>", tag, html)
}

fn wrap_header(html: String, level: &Value) -> String {
    match header_level(level) {
        Some(n) => format!("<h{0}>{1}</h{0}>", n, html),
        None => html,
    }
}

fn wrap_blockquote(html: String, _: &Value) -> String {
    format!("<blockquote>{}</blockquote>", html)
}

fn wrap_code_block(html: String, _: &Value) -> String {
    format!("<pre><code>{}</code></pre>", html)
}

fn wrap_list(html: String, kind: &Value) -> String {
    let tag = if kind.as_str() == Some("ordered") { "ol" } else { "ul" };
    format!("<{0}><li>{1}</li></{0}>", tag, html)
}

/// Header level 1-6, from an integer or an integer string.
fn header_level(value: &Value) -> Option<u64> {
    let level = match value {
        Value::Number(n) => n.as_u64()?,
        Value::String(s) => s.trim().parse().ok()?,
        _ => return None,
    };
    (1..=6).contains(&level).then_some(level)
}
