use thiserror::Error;

pub type QuillResult<T> = Result<T, QuillError>;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum QuillError {
    // --- malformed input ---

    #[error("Invalid JSON: {0}")]
    InvalidJson(String),

    #[error("Delta is missing an 'ops' sequence")]
    MissingOps,

    #[error("Content is not a valid Quill Delta: {reason}")]
    InvalidFormat { reason: String },

    // --- validation ---

    #[error("Invalid operation at index {index}: missing 'insert' key")]
    MissingInsert { index: usize },

    #[error("Content is required")]
    EmptyContent,

    #[error("Content must be at least {min} characters")]
    TooShort { min: usize },

    #[error("Content must not exceed {max} characters")]
    TooLong { max: usize },

    #[error("Format '{format}' is not allowed (operation {index})")]
    FormatNotAllowed { index: usize, format: String },

    #[error("Images are not allowed (operation {index})")]
    ImageNotAllowed { index: usize },

    #[error("Videos are not allowed (operation {index})")]
    VideoNotAllowed { index: usize },

    // --- upload store ---

    #[error("Image uploads are disabled")]
    UploadDisabled,

    #[error("Invalid image: {reason}")]
    InvalidImage { reason: String },

    #[error("Storage failure: {0}")]
    StorageFailure(String),

    #[error("Path '{path}' is outside the upload root")]
    PathOutsideAllowedRoot { path: String },

    #[error("File not found: {path}")]
    NotFound { path: String },

    #[error("Config error: {0}")]
    ConfigError(String),
}

impl QuillError {
    /// Machine-readable kind, stable across releases.
    pub fn code(&self) -> &'static str {
        match self {
            QuillError::InvalidJson(_) => "invalid_json",
            QuillError::MissingOps => "missing_ops",
            QuillError::InvalidFormat { .. } => "invalid_format",
            QuillError::MissingInsert { .. } => "missing_insert",
            QuillError::EmptyContent => "empty_content",
            QuillError::TooShort { .. } => "too_short",
            QuillError::TooLong { .. } => "too_long",
            QuillError::FormatNotAllowed { .. } => "format_not_allowed",
            QuillError::ImageNotAllowed { .. } => "image_not_allowed",
            QuillError::VideoNotAllowed { .. } => "video_not_allowed",
            QuillError::UploadDisabled => "upload_disabled",
            QuillError::InvalidImage { .. } => "invalid_image",
            QuillError::StorageFailure(_) => "storage_failure",
            QuillError::PathOutsideAllowedRoot { .. } => "path_outside_allowed_root",
            QuillError::NotFound { .. } => "not_found",
            QuillError::ConfigError(_) => "config_error",
        }
    }

    /// Index of the offending operation, for errors raised by the Delta validator.
    pub fn index(&self) -> Option<usize> {
        match self {
            QuillError::MissingInsert { index }
            | QuillError::FormatNotAllowed { index, .. }
            | QuillError::ImageNotAllowed { index }
            | QuillError::VideoNotAllowed { index } => Some(*index),
            _ => None,
        }
    }

    /// True for errors meaning the input is not a Delta at all.
    pub fn is_malformed(&self) -> bool {
        matches!(
            self,
            QuillError::InvalidJson(_) | QuillError::MissingOps | QuillError::InvalidFormat { .. }
        )
    }
}

impl From<serde_json::Error> for QuillError {
    fn from(err: serde_json::Error) -> Self {
        QuillError::InvalidJson(err.to_string())
    }
}

impl From<serde_yaml::Error> for QuillError {
    fn from(err: serde_yaml::Error) -> Self {
        QuillError::ConfigError(err.to_string())
    }
}
