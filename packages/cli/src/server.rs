// ABOUTME: Server assembly: database, state, middleware stack, and the listener
// ABOUTME: Shared by the `serve` command and the integration tests

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Context;
use axum::http::{header, HeaderName, HeaderValue, Method};
use axum::{middleware, Router};
use storefront_api::{create_router, AppState};
use storefront_media::HostedImageStore;
use storefront_storage::Database;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

use crate::config::Config;
use crate::middleware::{
    create_panic_handler, rate_limit_middleware, RateLimitLayer, SecurityHeadersLayer,
};

/// Open the database, seed the bootstrap admin, and wire up the media store
pub async fn build_state(config: &Config) -> anyhow::Result<AppState> {
    let db = Database::connect(&config.database_path)
        .await
        .with_context(|| {
            format!(
                "Failed to open database at {}",
                config.database_path.display()
            )
        })?;
    info!("Using database {}", config.database_path.display());

    prepare_state(db, config).await
}

/// Build state around an already-open database
pub async fn prepare_state(db: Database, config: &Config) -> anyhow::Result<AppState> {
    let mut state = AppState::new(db, config.state_options());

    match config.bootstrap_admin() {
        Some((username, password)) => {
            if let Some(admin) = state
                .auth
                .admins()
                .ensure_bootstrap_admin(username, password)
                .await
                .context("Failed to create bootstrap admin")?
            {
                info!(audit = true, "Bootstrap admin '{}' created", admin.username);
            }
        }
        None => {
            if state.auth.admins().count_admins().await? == 0 {
                warn!(
                    "No admin accounts exist. Set ADMIN_USERNAME/ADMIN_PASSWORD \
                     or run `storefront admin create`"
                );
            }
        }
    }

    match &config.media {
        Some(media) => {
            let store = HostedImageStore::new(media.clone())
                .context("Failed to build media upload client")?;
            state = state.with_media_store(Arc::new(store));
            info!("Media uploads enabled ({})", media.upload_url);
        }
        None => warn!("MEDIA_UPLOAD_URL not set, image uploads are disabled"),
    }

    Ok(state)
}

/// The API router wrapped in the full middleware stack
pub fn build_app(state: AppState, config: &Config) -> anyhow::Result<Router> {
    let origin = config
        .cors_origin
        .parse::<HeaderValue>()
        .with_context(|| format!("Invalid CORS_ORIGIN '{}'", config.cors_origin))?;

    // Credentials rule out wildcard origins and headers
    let cors = CorsLayer::new()
        .allow_origin(origin)
        .allow_credentials(true)
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers([
            header::CONTENT_TYPE,
            HeaderName::from_static(storefront_api::auth::ADMIN_TOKEN_HEADER),
        ]);

    let security_headers = if config.secure_cookies {
        SecurityHeadersLayer::new().with_hsts()
    } else {
        SecurityHeadersLayer::new()
    };

    let rate_limit = RateLimitLayer::new(config.rate_limit.clone());

    Ok(create_router(state)
        .layer(middleware::from_fn_with_state(
            rate_limit,
            rate_limit_middleware,
        ))
        .layer(security_headers)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .layer(create_panic_handler()))
}

pub async fn run_server(config: Config) -> anyhow::Result<()> {
    let state = build_state(&config).await?;
    let db = state.db.clone();
    let app = build_app(state, &config)?;

    let addr = SocketAddr::new(config.bind_address, config.port);
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;

    info!("Storefront API listening on http://{}", addr);

    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await?;

    db.close().await;
    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}
