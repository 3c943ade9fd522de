//! Tag-level HTML filter.
//!
//! Keeps allow-listed tags verbatim (attributes included) and drops every other
//! tag while leaving its text in place. This is a filter over a flat token
//! stream, not a tree builder: unbalanced markup is left as it is.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use crate::delta::{Delta, Operation};

/// Tags kept when no allow-list is configured.
pub const DEFAULT_ALLOWED_TAGS: &[&str] = &[
    "p", "br", "strong", "b", "em", "i", "u", "s", "a", "img", "h1", "h2", "h3", "h4", "h5", "h6",
    "blockquote", "pre", "code", "ul", "ol", "li", "span", "sub", "sup",
];

/// Case-insensitive set of tag names allowed through [`sanitize`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Vec<String>", into = "Vec<String>")]
pub struct TagAllowList {
    tags: BTreeSet<String>,
}

impl TagAllowList {
    pub fn new<I, S>(tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            tags: tags
                .into_iter()
                .map(|t| t.as_ref().trim().to_ascii_lowercase())
                .filter(|t| !t.is_empty())
                .collect(),
        }
    }

    /// Allow nothing: every tag is stripped.
    pub fn none() -> Self {
        Self {
            tags: BTreeSet::new(),
        }
    }

    pub fn contains(&self, tag: &str) -> bool {
        self.tags.contains(&tag.to_ascii_lowercase())
    }

    pub fn is_empty(&self) -> bool {
        self.tags.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.tags.iter().map(String::as_str)
    }
}

impl Default for TagAllowList {
    fn default() -> Self {
        Self::new(DEFAULT_ALLOWED_TAGS)
    }
}

impl From<Vec<String>> for TagAllowList {
    fn from(tags: Vec<String>) -> Self {
        Self::new(tags)
    }
}

impl From<TagAllowList> for Vec<String> {
    fn from(list: TagAllowList) -> Self {
        list.tags.into_iter().collect()
    }
}

/// Remove every tag not in `allowed`, keeping its text content.
///
/// A `<` that does not start a tag is emitted as `&lt;`, so dropping a tag can
/// never join the surrounding text into a new one. Running the filter twice
/// gives the same output as running it once.
pub fn sanitize(html: &str, allowed: &TagAllowList) -> String {
    filter_tags(html, allowed, true)
}

/// Remove all markup, leaving raw text (stray `<` is kept as-is).
pub fn strip_tags(html: &str) -> String {
    filter_tags(html, &TagAllowList::none(), false)
}

/// Lossy HTML fallback: all tags stripped, one plain text insert.
///
/// No structure or formatting survives. This is a last resort for legacy
/// content, not an HTML parser.
pub fn html_to_plain_delta(html: &str) -> Delta {
    let mut text = strip_tags(html);
    text.push('\n');
    Delta::new(vec![Operation::text(text)])
}

enum Markup<'a> {
    /// Start or end tag spanning `len` bytes
    Tag { name: &'a str, len: usize },
    /// Comment, doctype or processing instruction spanning `len` bytes
    Ignored { len: usize },
    /// Not markup: the `<` is literal text
    Text,
}

fn filter_tags(html: &str, allowed: &TagAllowList, escape_stray: bool) -> String {
    let mut out = String::with_capacity(html.len());
    let mut rest = html;

    while let Some(lt) = rest.find('<') {
        out.push_str(&rest[..lt]);
        let tail = &rest[lt..];
        match classify(tail) {
            Markup::Tag { name, len } => {
                if allowed.contains(name) {
                    out.push_str(&tail[..len]);
                }
                rest = &tail[len..];
            }
            Markup::Ignored { len } => {
                rest = &tail[len..];
            }
            Markup::Text => {
                out.push_str(if escape_stray { "&lt;" } else { "<" });
                rest = &tail[1..];
            }
        }
    }
    out.push_str(rest);
    out
}

/// Classify the markup starting at `tail` (which begins with `<`).
fn classify(tail: &str) -> Markup<'_> {
    let bytes = tail.as_bytes();

    if tail.starts_with("<!--") {
        let len = tail[4..].find("-->").map_or(tail.len(), |i| i + 4 + 3);
        return Markup::Ignored { len };
    }
    if matches!(bytes.get(1), Some(b'!') | Some(b'?')) {
        let len = tail.find('>').map_or(tail.len(), |i| i + 1);
        return Markup::Ignored { len };
    }

    let name_start = if bytes.get(1) == Some(&b'/') { 2 } else { 1 };
    if !bytes.get(name_start).is_some_and(u8::is_ascii_alphabetic) {
        return Markup::Text;
    }
    let name_end = bytes[name_start..]
        .iter()
        .position(|b| !(b.is_ascii_alphanumeric() || *b == b'-'))
        .map_or(bytes.len(), |i| name_start + i);

    match tail[name_end..].find('>') {
        Some(i) => Markup::Tag {
            name: &tail[name_start..name_end],
            len: name_end + i + 1,
        },
        None => Markup::Text,
    }
}
