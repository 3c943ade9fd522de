use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fs;
use std::path::Path;

use crate::error::{QuillError, QuillResult};
use crate::length::LengthRule;
use crate::sanitize::TagAllowList;
use crate::validator::DeltaRule;

/// MIME types accepted by the upload store by default.
pub const DEFAULT_UPLOAD_TYPES: &[&str] = &["image/jpeg", "image/png", "image/gif", "image/webp"];

/// Editor integration settings. Every section falls back to its defaults.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct QuillConfig {
    pub sanitize: SanitizeSettings,
    pub validation: ValidationSettings,
    pub uploads: UploadSettings,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SanitizeSettings {
    pub enabled: bool,
    pub allowed_tags: TagAllowList,
}

impl Default for SanitizeSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            allowed_tags: TagAllowList::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ValidationSettings {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_length: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_length: Option<usize>,
    pub required: bool,
    pub allowed_formats: BTreeSet<String>,
    pub allow_images: bool,
    pub allow_videos: bool,
}

impl Default for ValidationSettings {
    fn default() -> Self {
        Self {
            min_length: None,
            max_length: None,
            required: false,
            allowed_formats: BTreeSet::new(),
            allow_images: true,
            allow_videos: true,
        }
    }
}

impl ValidationSettings {
    pub fn length_rule(&self) -> LengthRule {
        LengthRule::new(self.min_length, self.max_length, self.required)
    }

    pub fn delta_rule(&self) -> DeltaRule {
        DeltaRule {
            allowed_formats: self.allowed_formats.clone(),
            allow_images: self.allow_images,
            allow_videos: self.allow_videos,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct UploadSettings {
    pub enabled: bool,
    /// Directory (relative to the store root) uploads are written under
    pub path: String,
    pub max_size_kb: u64,
    pub allowed_types: Vec<String>,
    /// URL prefix the store root is served from
    pub public_url: String,
}

impl Default for UploadSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            path: "quill-uploads".to_string(),
            max_size_kb: 2048,
            allowed_types: DEFAULT_UPLOAD_TYPES.iter().map(|t| t.to_string()).collect(),
            public_url: "/storage".to_string(),
        }
    }
}

impl UploadSettings {
    pub fn max_size_bytes(&self) -> u64 {
        self.max_size_kb.saturating_mul(1024)
    }
}

impl QuillConfig {
    pub fn from_yaml_str(yaml: &str) -> QuillResult<Self> {
        if yaml.trim().is_empty() {
            return Ok(Self::default());
        }
        Ok(serde_yaml::from_str(yaml)?)
    }

    pub fn load(path: impl AsRef<Path>) -> QuillResult<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|e| {
            QuillError::ConfigError(format!("Failed to read {}: {}", path.display(), e))
        })?;
        Self::from_yaml_str(&content)
    }

    pub fn to_yaml(&self) -> QuillResult<String> {
        Ok(serde_yaml::to_string(self)?)
    }
}
