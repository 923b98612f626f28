// ABOUTME: Tests for the hosted CDN client against a mock server
// ABOUTME: Verifies the multipart request shape and response handling

use serde_json::json;
use storefront_media::{
    DisabledMediaStore, HostedImageStore, HostedStoreConfig, ImageUpload, MediaError, MediaStore,
};
use wiremock::matchers::{body_string_contains, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn store_for(server: &MockServer, folder: Option<&str>) -> HostedImageStore {
    HostedImageStore::new(HostedStoreConfig {
        upload_url: format!("{}/v1_1/demo/image/upload", server.uri()),
        upload_preset: "site_unsigned".to_string(),
        folder: folder.map(str::to_string),
    })
    .unwrap()
}

fn png(size: usize) -> ImageUpload {
    ImageUpload::new("produk.png", Some("image/png".to_string()), vec![b'x'; size])
}

#[tokio::test]
async fn test_upload_returns_secure_url() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v1_1/demo/image/upload"))
        .and(body_string_contains("name=\"upload_preset\""))
        .and(body_string_contains("site_unsigned"))
        .and(body_string_contains("name=\"folder\""))
        .and(body_string_contains("filename=\"produk.png\""))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "secure_url": "https://cdn.example.com/demo/produk.png",
            "public_id": "storefront/produk",
            "bytes": 1024
        })))
        .expect(1)
        .mount(&server)
        .await;

    let uploaded = store_for(&server, Some("storefront"))
        .upload(png(1024))
        .await
        .unwrap();

    assert_eq!(uploaded.url, "https://cdn.example.com/demo/produk.png");
    assert_eq!(uploaded.public_id.as_deref(), Some("storefront/produk"));
}

#[tokio::test]
async fn test_cdn_failure_is_reported() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({
            "error": { "message": "Upload preset not found" }
        })))
        .mount(&server)
        .await;

    let err = store_for(&server, None).upload(png(64)).await.unwrap_err();
    assert!(matches!(err, MediaError::Rejected(_)));
    assert!(!err.is_invalid_input());
}

#[tokio::test]
async fn test_response_without_url_is_invalid() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "ok": true })))
        .mount(&server)
        .await;

    let err = store_for(&server, None).upload(png(64)).await.unwrap_err();
    assert!(matches!(err, MediaError::InvalidResponse(_)));
}

#[tokio::test]
async fn test_invalid_file_never_reaches_cdn() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let gif = ImageUpload::new("anim.gif", Some("image/gif".to_string()), vec![1u8; 16]);
    let err = store_for(&server, None).upload(gif).await.unwrap_err();
    assert!(err.is_invalid_input());
}

#[tokio::test]
async fn test_disabled_store() {
    let store = DisabledMediaStore;

    assert!(!store.is_configured());
    let err = store.upload(png(64)).await.unwrap_err();
    assert!(matches!(err, MediaError::NotConfigured));
}
