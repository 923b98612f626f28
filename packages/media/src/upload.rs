// ABOUTME: Image upload payloads and their acceptance rules
// ABOUTME: PNG or JPEG only, non-empty, at most 5,000,000 bytes

use bytes::Bytes;

use crate::error::{MediaError, MediaResult};

/// Largest accepted upload, in bytes
pub const MAX_UPLOAD_BYTES: usize = 5_000_000;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageFormat {
    Png,
    Jpeg,
}

impl ImageFormat {
    pub fn mime(&self) -> &'static str {
        match self {
            Self::Png => "image/png",
            Self::Jpeg => "image/jpeg",
        }
    }

    fn from_mime(mime: &str) -> Option<Self> {
        let essence = mime.split(';').next().unwrap_or_default().trim();
        match essence.to_ascii_lowercase().as_str() {
            "image/png" => Some(Self::Png),
            "image/jpeg" | "image/jpg" => Some(Self::Jpeg),
            _ => None,
        }
    }

    fn from_file_name(name: &str) -> Option<Self> {
        let (_, extension) = name.rsplit_once('.')?;
        match extension.to_ascii_lowercase().as_str() {
            "png" => Some(Self::Png),
            "jpg" | "jpeg" => Some(Self::Jpeg),
            _ => None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct ImageUpload {
    pub file_name: String,
    pub content_type: Option<String>,
    pub data: Bytes,
}

impl ImageUpload {
    pub fn new(
        file_name: impl Into<String>,
        content_type: Option<String>,
        data: impl Into<Bytes>,
    ) -> Self {
        Self {
            file_name: file_name.into(),
            content_type,
            data: data.into(),
        }
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Check size and type; returns the detected format.
    ///
    /// A declared content type wins. Generic types such as
    /// `application/octet-stream` fall back to the file extension.
    pub fn validate(&self) -> MediaResult<ImageFormat> {
        if self.is_empty() {
            return Err(MediaError::EmptyFile);
        }
        if self.len() > MAX_UPLOAD_BYTES {
            return Err(MediaError::FileTooLarge {
                size: self.len(),
                max: MAX_UPLOAD_BYTES,
            });
        }

        let declared = self.content_type.as_deref().filter(|mime| {
            let mime = mime.trim();
            !mime.is_empty() && !mime.starts_with("application/octet-stream")
        });

        let format = match declared {
            Some(mime) => ImageFormat::from_mime(mime),
            None => ImageFormat::from_file_name(&self.file_name),
        };

        format.ok_or_else(|| {
            MediaError::UnsupportedType(
                declared
                    .map(str::to_string)
                    .unwrap_or_else(|| self.file_name.clone()),
            )
        })
    }
}
