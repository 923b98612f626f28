// ABOUTME: HTTP API layer for Storefront
// ABOUTME: Public site routes, admin auth, and the session-gated admin CMS

use axum::{
    extract::DefaultBodyLimit,
    middleware,
    routing::{get, post, put},
    Router,
};

pub mod articles;
pub mod auth;
pub mod dashboard;
pub mod error;
pub mod health;
pub mod leads;
pub mod media;
pub mod products;
pub mod response;
pub mod state;
pub mod testimonials;

pub use error::{ApiResult, AppError};
pub use response::ApiResponse;
pub use state::{AppState, StateOptions};

/// Routes the public site reads from, plus the lead form
pub fn create_public_router() -> Router<AppState> {
    Router::new()
        .route("/products", get(products::list_public_products))
        .route("/testimonials", get(testimonials::list_public_testimonials))
        .route("/articles", get(articles::list_public_articles))
        .route("/articles/{slug}", get(articles::get_public_article))
        .route("/leads", post(leads::submit_lead))
}

/// Admin CMS routes. Mount behind [`auth::require_admin`].
pub fn create_admin_router() -> Router<AppState> {
    Router::new()
        .route("/dashboard", get(dashboard::get_dashboard))
        // Products
        .route(
            "/products",
            get(products::list_products).post(products::create_product),
        )
        .route(
            "/products/{id}",
            get(products::get_product)
                .put(products::update_product)
                .delete(products::delete_product),
        )
        // Articles
        .route(
            "/articles",
            get(articles::list_articles).post(articles::create_article),
        )
        .route(
            "/articles/{id}",
            get(articles::get_article)
                .put(articles::update_article)
                .delete(articles::delete_article),
        )
        .route("/articles/{id}/publish", post(articles::publish_article))
        .route("/articles/{id}/unpublish", post(articles::unpublish_article))
        // Testimonials
        .route(
            "/testimonials",
            get(testimonials::list_testimonials).post(testimonials::create_testimonial),
        )
        .route(
            "/testimonials/{id}",
            get(testimonials::get_testimonial)
                .put(testimonials::update_testimonial)
                .delete(testimonials::delete_testimonial),
        )
        // Leads
        .route("/leads", get(leads::list_leads))
        .route("/leads/{id}", get(leads::get_lead))
        .route("/leads/{id}/status", put(leads::update_lead_status))
        .route("/leads/{id}/panggilan", put(leads::update_lead_panggilan))
        .route("/leads/{id}/whatsapp", post(leads::contact_lead))
        // Media
        .route(
            "/media",
            post(media::upload_media).layer(DefaultBodyLimit::max(media::MEDIA_BODY_LIMIT)),
        )
}

/// Full API router with state applied
pub fn create_router(state: AppState) -> Router {
    let admin = create_admin_router().route_layer(middleware::from_fn_with_state(
        state.clone(),
        auth::require_admin,
    ));

    Router::new()
        .route("/api/health", get(health::health_check))
        .nest("/api/public", create_public_router())
        .nest("/api/auth", auth::create_auth_router())
        .nest("/api/admin", admin)
        .with_state(state)
}
