//! Plain-text view of a Delta, used only to measure content length.

use regex::Regex;
use std::sync::OnceLock;

use crate::delta::{Insert, Operation};

fn whitespace_run() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\s+").unwrap())
}

/// Concatenate the visible text of `ops`, one space per embed, with whitespace
/// runs collapsed to a single space and both ends trimmed.
pub fn extract_plain_text(ops: &[Operation]) -> String {
    let mut text = String::new();
    for op in ops {
        match &op.insert {
            Some(Insert::Text(fragment)) => text.push_str(fragment),
            Some(Insert::Embed(_)) => text.push(' '),
            None => {}
        }
    }
    collapse_whitespace(&text)
}

/// Character count (Unicode scalar values) of [`extract_plain_text`].
pub fn plain_text_length(ops: &[Operation]) -> usize {
    extract_plain_text(ops).chars().count()
}

pub(crate) fn collapse_whitespace(text: &str) -> String {
    whitespace_run().replace_all(text, " ").trim().to_string()
}
