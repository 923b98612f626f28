// ABOUTME: Media uploads for product photos, article covers, and testimonials
// ABOUTME: Validates PNG/JPEG images and forwards them to a hosted image CDN

pub mod error;
pub mod store;
pub mod upload;

pub use error::{MediaError, MediaResult};
pub use store::{DisabledMediaStore, HostedImageStore, HostedStoreConfig, MediaStore, UploadedMedia};
pub use upload::{ImageFormat, ImageUpload, MAX_UPLOAD_BYTES};
