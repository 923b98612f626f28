use std::sync::Arc;

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{header, HeaderMap, Method, Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use pretty_assertions::assert_eq;
use serde_json::{json, Value};
use tower::ServiceExt;

use storefront_api::{create_router, AppState, StateOptions};
use storefront_media::{ImageUpload, MediaResult, MediaStore, UploadedMedia};
use storefront_storage::Database;

const ADMIN_PASSWORD: &str = "rahasia-sekali";

struct FakeCdn;

#[async_trait]
impl MediaStore for FakeCdn {
    async fn upload(&self, image: ImageUpload) -> MediaResult<UploadedMedia> {
        image.validate()?;
        Ok(UploadedMedia {
            url: format!("https://cdn.example.com/{}", image.file_name),
            public_id: Some("storefront/abc".to_string()),
        })
    }
}

async fn setup_state() -> AppState {
    let db = Database::in_memory().await.unwrap();
    let state = AppState::new(db, StateOptions::default());
    state
        .auth
        .admins()
        .create_admin("admin", ADMIN_PASSWORD)
        .await
        .unwrap();
    state
}

async fn setup() -> Router {
    create_router(setup_state().await)
}

async fn send(app: &Router, request: Request<Body>) -> (StatusCode, HeaderMap, Value) {
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let headers = response.headers().clone();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, headers, body)
}

fn get(uri: &str) -> Request<Body> {
    Request::builder()
        .method(Method::GET)
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

fn json_request(method: Method, uri: &str, body: Value, cookie: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json");
    if let Some(cookie) = cookie {
        builder = builder.header(header::COOKIE, cookie);
    }
    builder
        .body(Body::from(serde_json::to_string(&body).unwrap()))
        .unwrap()
}

fn admin_get(uri: &str, cookie: &str) -> Request<Body> {
    Request::builder()
        .method(Method::GET)
        .uri(uri)
        .header(header::COOKIE, cookie)
        .body(Body::empty())
        .unwrap()
}

fn admin_post(uri: &str, cookie: &str) -> Request<Body> {
    Request::builder()
        .method(Method::POST)
        .uri(uri)
        .header(header::COOKIE, cookie)
        .body(Body::empty())
        .unwrap()
}

/// Log in and return the `admin-token=...` pair for the Cookie header
async fn login(app: &Router) -> String {
    let (status, headers, _) = send(
        app,
        json_request(
            Method::POST,
            "/api/auth/login",
            json!({ "username": "admin", "password": ADMIN_PASSWORD }),
            None,
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let set_cookie = headers[header::SET_COOKIE].to_str().unwrap();
    set_cookie.split(';').next().unwrap().to_string()
}

fn article_body(title: &str) -> Value {
    json!({
        "title": title,
        "content": "Seragam kerja yang nyaman membuat tim lebih produktif setiap hari.",
        "excerpt": "Kenapa seragam penting untuk tim Anda.",
        "coverImage": "https://cdn.example.com/cover.jpg",
        "category": "blog"
    })
}

fn product_body(name: &str) -> Value {
    json!({
        "name": name,
        "description": "Kemeja kerja bahan katun yang adem.",
        "category": "clothing",
        "images": ["https://cdn.example.com/kemeja.jpg"]
    })
}

#[tokio::test]
async fn test_health_endpoint() {
    let app = setup().await;

    let (status, _, body) = send(&app, get("/api/health")).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["database"], "ok");
    assert_eq!(body["mediaUploads"], false);
}

#[tokio::test]
async fn test_admin_routes_require_session() {
    let app = setup().await;

    let (status, _, body) = send(&app, get("/api/admin/products")).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"]["code"], "UNAUTHORIZED");

    let (status, _, _) = send(&app, admin_get("/api/admin/dashboard", "admin-token=forged")).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_wrong_credentials_are_generic() {
    let app = setup().await;

    for (username, password) in [("admin", "salah-sandi"), ("bukan-admin", ADMIN_PASSWORD)] {
        let (status, headers, body) = send(
            &app,
            json_request(
                Method::POST,
                "/api/auth/login",
                json!({ "username": username, "password": password }),
                None,
            ),
        )
        .await;

        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["error"]["code"], "INVALID_CREDENTIALS");
        assert_eq!(body["error"]["message"], "Invalid credentials");
        assert!(headers.get(header::SET_COOKIE).is_none());
    }
}

#[tokio::test]
async fn test_login_session_logout_flow() {
    let app = setup().await;

    let (status, headers, body) = send(
        &app,
        json_request(
            Method::POST,
            "/api/auth/login",
            json!({ "username": "admin", "password": ADMIN_PASSWORD }),
            None,
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["authenticated"], true);
    assert_eq!(body["data"]["username"], "admin");

    let set_cookie = headers[header::SET_COOKIE].to_str().unwrap();
    assert!(set_cookie.starts_with("admin-token="));
    assert!(set_cookie.contains("HttpOnly"));
    assert!(set_cookie.contains("SameSite=Lax"));
    assert!(!set_cookie.contains("Secure"));
    let cookie = set_cookie.split(';').next().unwrap().to_string();

    let (status, _, body) = send(&app, admin_get("/api/admin/dashboard", &cookie)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["products"]["total"], 0);

    let (_, _, body) = send(&app, admin_get("/api/auth/session", &cookie)).await;
    assert_eq!(body["data"]["authenticated"], true);

    // Non-browser clients can use the header instead
    let token = cookie.trim_start_matches("admin-token=");
    let request = Request::builder()
        .uri("/api/admin/leads")
        .header("X-Admin-Token", token)
        .body(Body::empty())
        .unwrap();
    let (status, _, _) = send(&app, request).await;
    assert_eq!(status, StatusCode::OK);

    let (status, headers, _) = send(&app, admin_post("/api/auth/logout", &cookie)).await;
    assert_eq!(status, StatusCode::OK);
    assert!(headers[header::SET_COOKIE]
        .to_str()
        .unwrap()
        .contains("Max-Age=0"));

    let (status, _, _) = send(&app, admin_get("/api/admin/dashboard", &cookie)).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (_, _, body) = send(&app, admin_get("/api/auth/session", &cookie)).await;
    assert_eq!(body["data"]["authenticated"], false);

    // Logging out twice is fine
    let (status, _, _) = send(&app, admin_post("/api/auth/logout", &cookie)).await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn test_article_publish_workflow() {
    let app = setup().await;
    let cookie = login(&app).await;

    let (status, _, body) = send(
        &app,
        json_request(
            Method::POST,
            "/api/admin/articles",
            article_body("Tips Memilih Seragam Kerja!"),
            Some(&cookie),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["data"]["status"], "draft");
    assert_eq!(body["data"]["slug"], "tips-memilih-seragam-kerja");
    assert!(body["data"]["publishedAt"].is_null());
    let id = body["data"]["id"].as_str().unwrap().to_string();

    // Drafts are invisible to the public site
    let (status, _, _) = send(&app, get("/api/public/articles/tips-memilih-seragam-kerja")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _, body) = send(
        &app,
        admin_post(&format!("/api/admin/articles/{}/publish", id), &cookie),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["status"], "published");
    let published_at = body["data"]["publishedAt"].clone();
    assert!(published_at.is_string());

    let (status, _, body) = send(
        &app,
        admin_post(&format!("/api/admin/articles/{}/publish", id), &cookie),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["error"]["code"], "INVALID_TRANSITION");

    let (status, _, body) = send(&app, get("/api/public/articles/tips-memilih-seragam-kerja")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["id"], id.as_str());

    let (status, _, body) = send(
        &app,
        admin_post(&format!("/api/admin/articles/{}/unpublish", id), &cookie),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["status"], "draft");
    assert_eq!(body["data"]["publishedAt"], published_at);

    let (status, _, _) = send(&app, get("/api/public/articles/tips-memilih-seragam-kerja")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_article_validation_details() {
    let app = setup().await;
    let cookie = login(&app).await;

    let mut body = article_body("Ok");
    body["coverImage"] = json!("");

    let (status, _, body) = send(
        &app,
        json_request(Method::POST, "/api/admin/articles", body, Some(&cookie)),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
    assert_eq!(
        body["error"]["details"]["title"],
        "Title must be at least 3 characters"
    );
    assert_eq!(body["error"]["details"]["coverImage"], "Cover image is required");
}

#[tokio::test]
async fn test_public_article_listing_pages_of_nine() {
    let app = setup().await;
    let cookie = login(&app).await;

    for i in 0..10 {
        let mut body = article_body(&format!("Artikel nomor {}", i));
        body["status"] = json!("published");
        let (status, _, _) = send(
            &app,
            json_request(Method::POST, "/api/admin/articles", body, Some(&cookie)),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
    }

    let (status, _, body) = send(&app, get("/api/public/articles?page=2&limit=50")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["pagination"]["pageSize"], 9);
    assert_eq!(body["data"]["pagination"]["totalItems"], 10);
    assert_eq!(body["data"]["data"].as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_public_article_listing_past_the_last_page() {
    let app = setup().await;
    let cookie = login(&app).await;

    let mut body = article_body("Artikel satu-satunya");
    body["status"] = json!("published");
    let (status, _, _) = send(
        &app,
        json_request(Method::POST, "/api/admin/articles", body, Some(&cookie)),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, _, body) =
        send(&app, get("/api/public/articles?page=9223372036854775807")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["pagination"]["totalItems"], 1);
    assert_eq!(body["data"]["pagination"]["hasNextPage"], false);
    assert!(body["data"]["data"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_catalogue_access_form_creates_lead() {
    let app = setup().await;

    let (status, _, body) = send(
        &app,
        json_request(
            Method::POST,
            "/api/public/leads",
            json!({
                "name": "Budi Santoso",
                "email": "budi@example.com",
                "phone": "081234567890",
                "company": "PT Maju Jaya",
                "qtyRange": "50 - 100"
            }),
            None,
        ),
    )
    .await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["data"]["status"], "new");
    assert_eq!(body["data"]["panggilan"], "Kakak");
    assert_eq!(body["data"]["qtyRange"], "50 - 100");
    let id = body["data"]["id"].as_str().unwrap().to_string();

    let cookie = login(&app).await;

    let (status, _, body) = send(
        &app,
        json_request(
            Method::PUT,
            &format!("/api/admin/leads/{}/panggilan", id),
            json!({ "panggilan": "Bapak" }),
            Some(&cookie),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["panggilan"], "Bapak");

    let (status, _, body) = send(
        &app,
        admin_post(&format!("/api/admin/leads/{}/whatsapp", id), &cookie),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let url = body["data"]["whatsappUrl"].as_str().unwrap();
    assert!(url.starts_with("https://wa.me/6281234567890?text=Halo%20Bapak%20Budi%20Santoso."));
    assert_eq!(body["data"]["lead"]["status"], "contacted");

    let (_, _, body) = send(&app, admin_get("/api/admin/leads?status=contacted", &cookie)).await;
    assert_eq!(body["data"].as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_whatsapp_contact_leaves_closed_leads_alone() {
    let app = setup().await;
    let (_, _, body) = send(
        &app,
        json_request(
            Method::POST,
            "/api/public/leads",
            json!({
                "name": "Sari",
                "email": "sari@example.com",
                "phone": "+6281234567890",
                "company": "CV Sejahtera",
                "panggilan": "Ibu",
                "qtyRange": "> 1000"
            }),
            None,
        ),
    )
    .await;
    let id = body["data"]["id"].as_str().unwrap().to_string();
    let cookie = login(&app).await;

    send(
        &app,
        json_request(
            Method::PUT,
            &format!("/api/admin/leads/{}/status", id),
            json!({ "status": "closed" }),
            Some(&cookie),
        ),
    )
    .await;

    let (status, _, body) = send(
        &app,
        admin_post(&format!("/api/admin/leads/{}/whatsapp", id), &cookie),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["lead"]["status"], "closed");
}

#[tokio::test]
async fn test_invalid_lead_reports_fields() {
    let app = setup().await;

    let (status, _, body) = send(
        &app,
        json_request(
            Method::POST,
            "/api/public/leads",
            json!({
                "name": "B",
                "email": "budi@example.com",
                "phone": "0712345678",
                "company": "PT Maju Jaya",
                "qtyRange": "< 50"
            }),
            None,
        ),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["details"]["name"], "Nama harus minimal 2 karakter");
    assert!(body["error"]["details"]["phone"].is_string());
    assert!(body["error"]["details"].get("email").is_none());
}

#[tokio::test]
async fn test_malformed_json_uses_error_envelope() {
    let app = setup().await;

    let request = Request::builder()
        .method(Method::POST)
        .uri("/api/public/leads")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from("{not json"))
        .unwrap();
    let (status, _, body) = send(&app, request).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], false);
    assert_eq!(body["error"]["code"], "BAD_REQUEST");
}

#[tokio::test]
async fn test_deleting_product_keeps_testimonials() {
    let app = setup().await;
    let cookie = login(&app).await;

    let (_, _, body) = send(
        &app,
        json_request(
            Method::POST,
            "/api/admin/products",
            product_body("Kemeja Kerja"),
            Some(&cookie),
        ),
    )
    .await;
    let product_id = body["data"]["id"].as_str().unwrap().to_string();

    let (status, _, _) = send(
        &app,
        json_request(
            Method::POST,
            "/api/admin/testimonials",
            json!({ "clientName": "Rina", "content": "Jahitannya rapi sekali, puas!", "image": "" }),
            Some(&cookie),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    let request = Request::builder()
        .method(Method::DELETE)
        .uri(format!("/api/admin/products/{}", product_id))
        .header(header::COOKIE, &cookie)
        .body(Body::empty())
        .unwrap();
    let (status, _, _) = send(&app, request).await;
    assert_eq!(status, StatusCode::OK);

    let (_, _, body) = send(&app, get("/api/public/products")).await;
    assert!(body["data"].as_array().unwrap().is_empty());

    let (_, _, body) = send(&app, get("/api/public/testimonials")).await;
    let testimonials = body["data"].as_array().unwrap();
    assert_eq!(testimonials.len(), 1);
    assert!(testimonials[0].get("image").is_none());

    let (status, _, _) = send(
        &app,
        admin_get(&format!("/api/admin/products/{}", product_id), &cookie),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_admin_listing_pagination_is_optional() {
    let app = setup().await;
    let cookie = login(&app).await;

    for name in ["Kemeja Satu", "Kemeja Dua", "Kemeja Tiga"] {
        send(
            &app,
            json_request(Method::POST, "/api/admin/products", product_body(name), Some(&cookie)),
        )
        .await;
    }

    let (_, _, body) = send(&app, admin_get("/api/admin/products", &cookie)).await;
    assert_eq!(body["data"].as_array().unwrap().len(), 3);

    let (_, _, body) = send(&app, admin_get("/api/admin/products?page=2&limit=2", &cookie)).await;
    assert_eq!(body["data"]["pagination"]["totalItems"], 3);
    assert_eq!(body["data"]["data"][0]["name"], "Kemeja Satu");
}

fn multipart_upload(cookie: &str, file_name: &str, content_type: &str, data: &[u8]) -> Request<Body> {
    let boundary = "storefront-test-boundary";
    let mut body = Vec::new();
    body.extend_from_slice(
        format!(
            "--{boundary}\r\nContent-Disposition: form-data; name=\"file\"; filename=\"{file_name}\"\r\nContent-Type: {content_type}\r\n\r\n"
        )
        .as_bytes(),
    );
    body.extend_from_slice(data);
    body.extend_from_slice(format!("\r\n--{boundary}--\r\n").as_bytes());

    Request::builder()
        .method(Method::POST)
        .uri("/api/admin/media")
        .header(header::COOKIE, cookie)
        .header(
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={}", boundary),
        )
        .body(Body::from(body))
        .unwrap()
}

#[tokio::test]
async fn test_media_upload_without_cdn_is_unavailable() {
    let app = setup().await;
    let cookie = login(&app).await;

    let (status, _, body) = send(
        &app,
        multipart_upload(&cookie, "logo.png", "image/png", b"png-bytes"),
    )
    .await;

    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(body["error"]["code"], "SERVICE_UNAVAILABLE");
}

#[tokio::test]
async fn test_media_upload_with_store() {
    let state = setup_state().await.with_media_store(Arc::new(FakeCdn));
    let app = create_router(state);
    let cookie = login(&app).await;

    let (status, _, body) = send(
        &app,
        multipart_upload(&cookie, "logo.png", "image/png", b"png-bytes"),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["url"], "https://cdn.example.com/logo.png");
    assert_eq!(body["data"]["publicId"], "storefront/abc");

    let (status, _, body) = send(
        &app,
        multipart_upload(&cookie, "notes.txt", "text/plain", b"hello"),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"]["details"]["file"].is_string());
}
