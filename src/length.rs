use serde::{Deserialize, Serialize};

use crate::delta::{parse_delta, DeltaInput};
use crate::error::{QuillError, QuillResult};
use crate::plain_text::plain_text_length;

/// Character-count policy for stored content.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LengthRule {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_length: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_length: Option<usize>,
    #[serde(default)]
    pub required: bool,
}

impl LengthRule {
    pub fn new(min_length: Option<usize>, max_length: Option<usize>, required: bool) -> Self {
        Self {
            min_length,
            max_length,
            required,
        }
    }

    pub fn at_least(min: usize) -> Self {
        Self::new(Some(min), None, false)
    }

    pub fn at_most(max: usize) -> Self {
        Self::new(None, Some(max), false)
    }

    pub fn between(min: usize, max: usize) -> Self {
        Self::new(Some(min), Some(max), false)
    }

    pub fn required() -> Self {
        Self::new(None, None, true)
    }

    pub fn and_required(mut self) -> Self {
        self.required = true;
        self
    }

    pub fn validate<'a>(&self, raw: impl Into<DeltaInput<'a>>) -> QuillResult<()> {
        validate_length(raw, self)
    }

    fn empty_outcome(&self) -> QuillResult<()> {
        if self.required {
            Err(QuillError::EmptyContent)
        } else {
            Ok(())
        }
    }
}

/// Check a Delta against a [`LengthRule`].
///
/// Empty content short-circuits: length bounds are only evaluated when there
/// is something to measure.
pub fn validate_length<'a>(raw: impl Into<DeltaInput<'a>>, rule: &LengthRule) -> QuillResult<()> {
    let raw = raw.into();
    if raw.is_empty() {
        return rule.empty_outcome();
    }

    let delta = parse_delta(raw).map_err(|e| QuillError::InvalidFormat {
        reason: e.to_string(),
    })?;
    if delta.is_blank() {
        return rule.empty_outcome();
    }

    let length = plain_text_length(&delta.ops);
    if let Some(min) = rule.min_length {
        if length < min {
            return Err(QuillError::TooShort { min });
        }
    }
    if let Some(max) = rule.max_length {
        if length > max {
            return Err(QuillError::TooLong { max });
        }
    }
    Ok(())
}
