//! Image upload collaborator.
//!
//! The render and validation paths never touch storage; the editor front end
//! uploads images through an [`UploadStore`] and inserts the returned URL as an
//! image embed.

use std::fs;
use std::path::{Component, Path, PathBuf};

use crate::config::UploadSettings;
use crate::error::{QuillError, QuillResult};

/// An image payload as received from the editor.
#[derive(Debug, Clone)]
pub struct ImageUpload {
    pub bytes: Vec<u8>,
    pub original_name: String,
    /// MIME type declared by the client
    pub declared_mime: String,
}

/// Where a stored image can be reached.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredImage {
    /// Public URL to embed in the Delta
    pub url: String,
    /// Storage token, accepted later by [`UploadStore::delete`]
    pub path: String,
    pub filename: String,
}

pub trait UploadStore {
    fn store(&self, upload: &ImageUpload) -> QuillResult<StoredImage>;
    fn delete(&self, path: &str) -> QuillResult<()>;
}

/// Stores uploads on the local filesystem under `root/settings.path`.
#[derive(Debug, Clone)]
pub struct LocalUploadStore {
    root: PathBuf,
    settings: UploadSettings,
}

impl LocalUploadStore {
    pub fn new(root: impl Into<PathBuf>, settings: UploadSettings) -> Self {
        Self {
            root: root.into(),
            settings,
        }
    }

    pub fn settings(&self) -> &UploadSettings {
        &self.settings
    }

    fn base_dir(&self) -> &str {
        self.settings.path.trim_matches('/')
    }

    fn check_upload(&self, upload: &ImageUpload) -> QuillResult<&'static str> {
        if upload.bytes.is_empty() {
            return Err(invalid("empty payload"));
        }
        let max = self.settings.max_size_bytes();
        if upload.bytes.len() as u64 > max {
            return Err(invalid(format!(
                "{} bytes exceeds the {} KB limit",
                upload.bytes.len(),
                self.settings.max_size_kb
            )));
        }
        if !self.accepts(&upload.declared_mime) {
            return Err(invalid(format!("type '{}' is not accepted", upload.declared_mime)));
        }
        let (mime, ext) = sniff_image(&upload.bytes)
            .ok_or_else(|| invalid("content is not a JPEG, PNG, GIF or WEBP image"))?;
        if !self.accepts(mime) {
            return Err(invalid(format!("type '{}' is not accepted", mime)));
        }
        Ok(ext)
    }

    fn accepts(&self, mime: &str) -> bool {
        self.settings
            .allowed_types
            .iter()
            .any(|t| t.eq_ignore_ascii_case(mime.trim()))
    }

    /// Token must name a file below the upload directory, with no `..` or absolute parts.
    fn resolve_token(&self, token: &str) -> QuillResult<PathBuf> {
        let outside = || QuillError::PathOutsideAllowedRoot {
            path: token.to_string(),
        };
        let relative = Path::new(token);
        if !relative.components().all(|c| matches!(c, Component::Normal(_))) {
            return Err(outside());
        }
        let inside = relative
            .strip_prefix(self.base_dir())
            .map(|rest| rest.components().next().is_some())
            .unwrap_or(false);
        if !inside {
            return Err(outside());
        }
        Ok(self.root.join(relative))
    }
}

impl UploadStore for LocalUploadStore {
    fn store(&self, upload: &ImageUpload) -> QuillResult<StoredImage> {
        if !self.settings.enabled {
            return Err(QuillError::UploadDisabled);
        }
        let ext = self.check_upload(upload)?;

        let filename = unique_filename(ext);
        let dir = self.root.join(self.base_dir());
        fs::create_dir_all(&dir)
            .and_then(|_| fs::write(dir.join(&filename), &upload.bytes))
            .map_err(|e| {
                log::warn!("failed to store upload '{}': {}", upload.original_name, e);
                QuillError::StorageFailure(e.to_string())
            })?;

        let path = format!("{}/{}", self.base_dir(), filename);
        let url = format!("{}/{}", self.settings.public_url.trim_end_matches('/'), path);
        log::info!("stored upload '{}' as {}", upload.original_name, path);
        Ok(StoredImage {
            url,
            path,
            filename,
        })
    }

    fn delete(&self, path: &str) -> QuillResult<()> {
        if !self.settings.enabled {
            return Err(QuillError::UploadDisabled);
        }
        let full = self.resolve_token(path)?;
        if !full.is_file() {
            return Err(QuillError::NotFound {
                path: path.to_string(),
            });
        }
        fs::remove_file(&full).map_err(|e| {
            log::warn!("failed to delete upload {}: {}", path, e);
            QuillError::StorageFailure(e.to_string())
        })?;
        log::debug!("deleted upload {}", path);
        Ok(())
    }
}

fn invalid(reason: impl Into<String>) -> QuillError {
    QuillError::InvalidImage {
        reason: reason.into(),
    }
}

/// `YYYY-MM-DD_HH-MM-SS_xxxxxxxxxx.ext`
fn unique_filename(ext: &str) -> String {
    let stamp = chrono::Local::now().format("%Y-%m-%d_%H-%M-%S");
    let token = uuid::Uuid::new_v4().simple().to_string();
    format!("{}_{}.{}", stamp, &token[..10], ext)
}

/// Detect the image type from its magic bytes.
fn sniff_image(bytes: &[u8]) -> Option<(&'static str, &'static str)> {
    if bytes.starts_with(&[0xFF, 0xD8, 0xFF]) {
        Some(("image/jpeg", "jpg"))
    } else if bytes.starts_with(b"\x89PNG\r\n\x1a\n") {
        Some(("image/png", "png"))
    } else if bytes.starts_with(b"GIF87a") || bytes.starts_with(b"GIF89a") {
        Some(("image/gif", "gif"))
    } else if bytes.len() >= 12 && bytes.starts_with(b"RIFF") && &bytes[8..12] == b"WEBP" {
        Some(("image/webp", "webp"))
    } else {
        None
    }
}
