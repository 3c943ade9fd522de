use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use crate::delta::{parse_delta, DeltaInput, Embed, Insert, Operation};
use crate::error::{QuillError, QuillResult};

/// Allow-list policy for formats and embeds.
///
/// An empty `allowed_formats` set means formatting is unrestricted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeltaRule {
    #[serde(default)]
    pub allowed_formats: BTreeSet<String>,
    #[serde(default = "default_true")]
    pub allow_images: bool,
    #[serde(default = "default_true")]
    pub allow_videos: bool,
}

fn default_true() -> bool {
    true
}

impl Default for DeltaRule {
    fn default() -> Self {
        Self {
            allowed_formats: BTreeSet::new(),
            allow_images: true,
            allow_videos: true,
        }
    }
}

impl DeltaRule {
    pub fn only_formats<I, S>(formats: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            allowed_formats: formats.into_iter().map(Into::into).collect(),
            ..Self::default()
        }
    }

    pub fn without_images() -> Self {
        Self {
            allow_images: false,
            ..Self::default()
        }
    }

    pub fn without_videos() -> Self {
        Self {
            allow_videos: false,
            ..Self::default()
        }
    }

    /// No embeds. Formats stay unrestricted, since an empty format set is "no restriction".
    pub fn plain_text_only() -> Self {
        Self {
            allowed_formats: BTreeSet::new(),
            allow_images: false,
            allow_videos: false,
        }
    }

    pub fn validate<'a>(&self, raw: impl Into<DeltaInput<'a>>) -> QuillResult<()> {
        validate_delta(raw, self)
    }

    fn check_operation(&self, index: usize, op: &Operation) -> QuillResult<()> {
        let insert = op.insert.as_ref().ok_or(QuillError::MissingInsert { index })?;

        match insert {
            Insert::Embed(Embed::Image(_)) if !self.allow_images => {
                return Err(QuillError::ImageNotAllowed { index });
            }
            Insert::Embed(Embed::Video(_)) if !self.allow_videos => {
                return Err(QuillError::VideoNotAllowed { index });
            }
            _ => {}
        }

        if !self.allowed_formats.is_empty() {
            // null-valued keys are checked too
            if let Some(format) = op
                .attribute_keys()
                .find(|format| !self.allowed_formats.contains(*format))
            {
                return Err(QuillError::FormatNotAllowed {
                    index,
                    format: format.to_string(),
                });
            }
        }

        Ok(())
    }
}

/// Check every operation against `rule`, stopping at the first violation.
pub fn validate_delta<'a>(raw: impl Into<DeltaInput<'a>>, rule: &DeltaRule) -> QuillResult<()> {
    let raw = raw.into();
    if raw.is_empty() {
        return Ok(());
    }

    let delta = parse_delta(raw)?;
    for (index, op) in delta.iter().enumerate() {
        rule.check_operation(index, op)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_empty_always_passes() {
        assert!(validate_delta("", &DeltaRule::plain_text_only()).is_ok());
        assert!(validate_delta(&json!(null), &DeltaRule::plain_text_only()).is_ok());
    }

    #[test]
    fn test_malformed_is_reported_as_is() {
        assert!(matches!(
            validate_delta("{not json", &DeltaRule::default()),
            Err(QuillError::InvalidJson(_))
        ));
        assert_eq!(
            validate_delta(r#"{"ops":{}}"#, &DeltaRule::default()),
            Err(QuillError::MissingOps)
        );
    }

    #[test]
    fn test_missing_insert_reports_index() {
        let raw = r#"{"ops":[{"insert":"a"},{"retain":1},{"insert":"\n"}]}"#;
        assert_eq!(
            validate_delta(raw, &DeltaRule::default()),
            Err(QuillError::MissingInsert { index: 1 })
        );
    }

    #[test]
    fn test_image_not_allowed() {
        let raw = r#"{"ops":[{"insert":{"image":"https://x/i.jpg"}}]}"#;
        let err = validate_delta(raw, &DeltaRule::without_images()).unwrap_err();
        assert_eq!(err, QuillError::ImageNotAllowed { index: 0 });
        assert_eq!(err.index(), Some(0));
        assert!(validate_delta(raw, &DeltaRule::without_videos()).is_ok());
    }

    #[test]
    fn test_video_not_allowed() {
        let raw = r#"{"ops":[{"insert":"clip: "},{"insert":{"video":"https://v"}}]}"#;
        assert_eq!(
            validate_delta(raw, &DeltaRule::without_videos()),
            Err(QuillError::VideoNotAllowed { index: 1 })
        );
    }

    #[test]
    fn test_format_not_allowed() {
        let rule = DeltaRule::only_formats(["bold", "italic"]);
        let ok = r#"{"ops":[{"insert":"a","attributes":{"bold":true,"italic":true}}]}"#;
        assert!(rule.validate(ok).is_ok());

        let bad = r#"{"ops":[{"insert":"a","attributes":{"bold":true}},{"insert":"b","attributes":{"italic":true,"link":"x","underline":true}}]}"#;
        assert_eq!(
            rule.validate(bad),
            Err(QuillError::FormatNotAllowed {
                index: 1,
                format: "link".to_string()
            })
        );
    }

    #[test]
    fn test_empty_format_set_is_unrestricted() {
        let raw = r#"{"ops":[{"insert":"a","attributes":{"color":"red","font":"serif"}}]}"#;
        assert!(validate_delta(raw, &DeltaRule::default()).is_ok());
        assert!(validate_delta(raw, &DeltaRule::plain_text_only()).is_ok());
    }

    #[test]
    fn test_first_violation_wins() {
        let raw = r#"{"ops":[{"insert":{"video":"v"}},{"insert":{"image":"i"}}]}"#;
        assert_eq!(
            validate_delta(raw, &DeltaRule::plain_text_only()),
            Err(QuillError::VideoNotAllowed { index: 0 })
        );
    }

    #[test]
    fn test_formula_and_unknown_embeds_pass() {
        let raw = r#"{"ops":[{"insert":{"formula":"x^2"}},{"insert":{"mention":"@bob"}}]}"#;
        assert!(validate_delta(raw, &DeltaRule::plain_text_only()).is_ok());
    }

    #[test]
    fn test_null_valued_format_is_still_checked() {
        let raw = r#"{"ops":[{"insert":"x","attributes":{"bold":true,"script":null}}]}"#;
        assert_eq!(
            validate_delta(raw, &DeltaRule::only_formats(["bold"])),
            Err(QuillError::FormatNotAllowed {
                index: 0,
                format: "script".to_string()
            })
        );
    }

    #[test]
    fn test_null_image_key_is_not_an_image() {
        let raw = r#"{"ops":[{"insert":{"image":null}}]}"#;
        assert!(validate_delta(raw, &DeltaRule::without_images()).is_ok());
    }
}
