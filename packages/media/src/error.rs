use thiserror::Error;

#[derive(Debug, Error)]
pub enum MediaError {
    #[error("Media uploads are not configured")]
    NotConfigured,

    #[error("Uploaded file is empty")]
    EmptyFile,

    #[error("File is {size} bytes, larger than the {max} byte limit")]
    FileTooLarge { size: usize, max: usize },

    #[error("Unsupported image type: {0}")]
    UnsupportedType(String),

    #[error("HTTP request failed: {0}")]
    RequestFailed(#[from] reqwest::Error),

    #[error("CDN rejected upload: {0}")]
    Rejected(String),

    #[error("Failed to parse CDN response: {0}")]
    InvalidResponse(String),
}

impl MediaError {
    /// True when the problem is the uploaded file, not the CDN
    pub fn is_invalid_input(&self) -> bool {
        matches!(
            self,
            MediaError::EmptyFile | MediaError::FileTooLarge { .. } | MediaError::UnsupportedType(_)
        )
    }
}

pub type MediaResult<T> = Result<T, MediaError>;
