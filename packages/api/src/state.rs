// ABOUTME: Shared state handed to every handler
// ABOUTME: Storage handles, the authenticator, the media store, and cookie settings

use std::sync::Arc;

use chrono::Duration;
use storefront_articles::{ArticleStorage, UnpublishPolicy};
use storefront_catalog::{ProductStorage, TestimonialStorage};
use storefront_leads::{LeadStorage, WhatsAppTemplate};
use storefront_media::{DisabledMediaStore, MediaStore};
use storefront_security::auth::DEFAULT_SESSION_TTL_HOURS;
use storefront_security::Authenticator;
use storefront_storage::Database;

/// Behavioural switches chosen at startup
#[derive(Debug, Clone)]
pub struct StateOptions {
    pub session_ttl: Duration,
    pub secure_cookies: bool,
    pub unpublish_policy: UnpublishPolicy,
    pub whatsapp: WhatsAppTemplate,
}

impl Default for StateOptions {
    fn default() -> Self {
        Self {
            session_ttl: Duration::hours(DEFAULT_SESSION_TTL_HOURS),
            secure_cookies: false,
            unpublish_policy: UnpublishPolicy::default(),
            whatsapp: WhatsAppTemplate::default(),
        }
    }
}

#[derive(Clone)]
pub struct AppState {
    pub db: Database,
    pub products: Arc<ProductStorage>,
    pub testimonials: Arc<TestimonialStorage>,
    pub articles: Arc<ArticleStorage>,
    pub leads: Arc<LeadStorage>,
    pub auth: Arc<Authenticator>,
    pub media: Arc<dyn MediaStore>,
    pub whatsapp: Arc<WhatsAppTemplate>,
    pub secure_cookies: bool,
}

impl AppState {
    /// State with media uploads disabled; see [`AppState::with_media_store`]
    pub fn new(db: Database, options: StateOptions) -> Self {
        let pool = db.pool().clone();

        Self {
            products: Arc::new(ProductStorage::new(pool.clone())),
            testimonials: Arc::new(TestimonialStorage::new(pool.clone())),
            articles: Arc::new(ArticleStorage::with_policy(
                pool.clone(),
                options.unpublish_policy,
            )),
            leads: Arc::new(LeadStorage::new(pool.clone())),
            auth: Arc::new(Authenticator::new(pool, options.session_ttl)),
            media: Arc::new(DisabledMediaStore),
            whatsapp: Arc::new(options.whatsapp),
            secure_cookies: options.secure_cookies,
            db,
        }
    }

    pub fn with_media_store(mut self, store: Arc<dyn MediaStore>) -> Self {
        self.media = store;
        self
    }
}
