// ABOUTME: Media store abstraction and the hosted CDN implementation
// ABOUTME: Uploads are unsigned multipart posts answered with a permanent URL

use std::time::Duration;

use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{error, info};

use crate::error::{MediaError, MediaResult};
use crate::upload::ImageUpload;

const REQUEST_TIMEOUT_SECS: u64 = 60;
const CONNECT_TIMEOUT_SECS: u64 = 10;

/// Where an upload ended up
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadedMedia {
    pub url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub public_id: Option<String>,
}

#[async_trait]
pub trait MediaStore: Send + Sync {
    /// Validate and store an image, returning its permanent URL
    async fn upload(&self, image: ImageUpload) -> MediaResult<UploadedMedia>;

    fn is_configured(&self) -> bool {
        true
    }
}

/// Settings for an unsigned-upload image CDN endpoint
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HostedStoreConfig {
    pub upload_url: String,
    pub upload_preset: String,
    pub folder: Option<String>,
}

#[derive(Debug, Deserialize)]
struct CdnUploadResponse {
    secure_url: String,
    public_id: Option<String>,
}

pub struct HostedImageStore {
    client: Client,
    config: HostedStoreConfig,
}

impl HostedImageStore {
    pub fn new(config: HostedStoreConfig) -> MediaResult<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .connect_timeout(Duration::from_secs(CONNECT_TIMEOUT_SECS))
            .build()?;

        Ok(Self { client, config })
    }

    pub fn config(&self) -> &HostedStoreConfig {
        &self.config
    }
}

#[async_trait]
impl MediaStore for HostedImageStore {
    async fn upload(&self, image: ImageUpload) -> MediaResult<UploadedMedia> {
        let format = image.validate()?;
        let size = image.len();

        let file = Part::bytes(image.data.to_vec())
            .file_name(image.file_name.clone())
            .mime_str(format.mime())?;

        let mut form = Form::new()
            .part("file", file)
            .text("upload_preset", self.config.upload_preset.clone());
        if let Some(folder) = &self.config.folder {
            form = form.text("folder", folder.clone());
        }

        info!(
            "Uploading {} ({} bytes, {}) to media CDN",
            image.file_name,
            size,
            format.mime()
        );

        let response = self
            .client
            .post(&self.config.upload_url)
            .multipart(form)
            .send()
            .await
            .map_err(|e| {
                error!("Media upload request failed: {}", e);
                MediaError::RequestFailed(e)
            })?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            error!("Media CDN error: {} - {}", status, error_text);
            return Err(MediaError::Rejected(format!("CDN returned {}", status)));
        }

        let body: CdnUploadResponse = response
            .json()
            .await
            .map_err(|e| MediaError::InvalidResponse(e.to_string()))?;

        info!("Media uploaded: {}", body.secure_url);

        Ok(UploadedMedia {
            url: body.secure_url,
            public_id: body.public_id,
        })
    }
}

/// Used when no CDN is configured; every upload is refused
#[derive(Debug, Default, Clone, Copy)]
pub struct DisabledMediaStore;

#[async_trait]
impl MediaStore for DisabledMediaStore {
    async fn upload(&self, _image: ImageUpload) -> MediaResult<UploadedMedia> {
        Err(MediaError::NotConfigured)
    }

    fn is_configured(&self) -> bool {
        false
    }
}
