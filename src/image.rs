use std::path::Path;

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ImageError {
    #[error("failed to read '{path}': {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

/// A file handed to the form, either picked or dropped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageFile {
    pub name: String,
    pub media_type: Option<String>,
    pub bytes: Vec<u8>,
}

impl ImageFile {
    pub fn new(name: impl Into<String>, media_type: Option<&str>, bytes: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            media_type: media_type.map(str::to_string),
            bytes,
        }
    }

    pub async fn read(path: &Path) -> Result<Self, ImageError> {
        let bytes = tokio::fs::read(path).await.map_err(|source| ImageError::Read {
            path: path.display().to_string(),
            source,
        })?;
        let name = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        let media_type = guess_media_type(path);

        Ok(Self {
            name,
            media_type,
            bytes,
        })
    }

    pub fn is_image(&self) -> bool {
        self.media_type
            .as_deref()
            .is_some_and(|media_type| media_type.starts_with("image/"))
    }
}

pub fn guess_media_type(path: &Path) -> Option<String> {
    mime_guess::from_path(path)
        .first()
        .map(|media_type| media_type.essence_str().to_string())
}

/// An accepted upload, held in memory as a data URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadedImage {
    pub name: String,
    pub media_type: String,
    pub data_url: String,
    pub size_bytes: usize,
}

impl UploadedImage {
    /// Returns `None` for anything whose media type is not `image/*`.
    pub fn from_file(file: &ImageFile) -> Option<Self> {
        if !file.is_image() {
            return None;
        }
        let media_type = file.media_type.clone()?;
        let data_url = format!("data:{};base64,{}", media_type, BASE64.encode(&file.bytes));

        Some(Self {
            name: file.name.clone(),
            media_type,
            data_url,
            size_bytes: file.bytes.len(),
        })
    }
}
