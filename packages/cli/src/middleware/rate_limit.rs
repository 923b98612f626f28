// ABOUTME: Per-category request rate limiting built on governor
// ABOUTME: Answers 429 with Retry-After once a category's budget is spent

use axum::{
    extract::{ConnectInfo, Request, State},
    http::{header::HeaderName, HeaderValue},
    middleware::Next,
    response::Response,
};
use governor::{
    clock::{Clock, DefaultClock},
    DefaultKeyedRateLimiter, Quota, RateLimiter,
};
use std::{
    collections::HashMap,
    net::{IpAddr, SocketAddr},
    num::NonZeroU32,
    sync::{Arc, Mutex},
};
use storefront_api::AppError;
use tracing::{debug, warn};

/// Budgets are tracked per peer address. Requests without a known peer share one budget.
type ClientKey = Option<IpAddr>;

/// Type alias for a rate limiter
type RateLimiterType = DefaultKeyedRateLimiter<ClientKey>;

/// Idle client entries are swept once a limiter tracks this many peers
const MAX_TRACKED_CLIENTS: usize = 10_000;

/// Type alias for a rate limiter instance
type RateLimiterInstance = Arc<RateLimiterType>;

/// Type alias for the rate limiter storage
type RateLimiterStorage = Arc<Mutex<HashMap<EndpointCategory, RateLimiterInstance>>>;

/// Rate limiting configuration for different endpoint categories
#[derive(Debug, Clone, PartialEq)]
pub struct RateLimitConfig {
    pub enabled: bool,
    pub health_rpm: u32, // Health endpoint
    pub login_rpm: u32,  // Admin login attempts
    pub leads_rpm: u32,  // Public lead form
    pub public_rpm: u32, // Public site reads
    pub admin_rpm: u32,  // Admin CMS
    pub global_rpm: u32, // Global fallback
    pub burst_size: u32, // Burst size multiplier (tenths of rpm)
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            health_rpm: 60,
            login_rpm: 10,
            leads_rpm: 10,
            public_rpm: 120,
            admin_rpm: 120,
            global_rpm: 60,
            burst_size: 5,
        }
    }
}

/// Rate limiter with per-endpoint configuration
#[derive(Clone)]
pub struct RateLimitLayer {
    config: RateLimitConfig,
    limiters: RateLimiterStorage,
}

impl RateLimitLayer {
    pub fn new(config: RateLimitConfig) -> Self {
        Self {
            config,
            limiters: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.config.enabled
    }

    fn rpm_for(&self, category: EndpointCategory) -> u32 {
        match category {
            EndpointCategory::Health => self.config.health_rpm,
            EndpointCategory::Login => self.config.login_rpm,
            EndpointCategory::Leads => self.config.leads_rpm,
            EndpointCategory::Public => self.config.public_rpm,
            EndpointCategory::Admin => self.config.admin_rpm,
            EndpointCategory::Other => self.config.global_rpm,
        }
    }

    /// Get or create rate limiter for specific endpoint category
    fn limiter_for(&self, category: EndpointCategory) -> RateLimiterInstance {
        // A poisoned lock only means another request panicked mid-insert
        let mut limiters = self
            .limiters
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());

        limiters
            .entry(category)
            .or_insert_with(|| {
                let rpm = NonZeroU32::new(self.rpm_for(category)).unwrap_or(NonZeroU32::MIN);
                let burst = NonZeroU32::new(rpm.get() * self.config.burst_size / 10)
                    .unwrap_or(NonZeroU32::MIN);

                debug!(
                    endpoint_category = %category.as_str(),
                    rpm = %rpm,
                    burst = %burst,
                    "Created rate limiter for endpoint category"
                );

                Arc::new(RateLimiter::keyed(Quota::per_minute(rpm).allow_burst(burst)))
            })
            .clone()
    }
}

/// Endpoint categories for different rate limiting rules
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
enum EndpointCategory {
    Health,
    Login,
    Leads,
    Public,
    Admin,
    Other,
}

impl EndpointCategory {
    fn as_str(self) -> &'static str {
        match self {
            EndpointCategory::Health => "health",
            EndpointCategory::Login => "login",
            EndpointCategory::Leads => "leads",
            EndpointCategory::Public => "public",
            EndpointCategory::Admin => "admin",
            EndpointCategory::Other => "other",
        }
    }
}

/// Categorize endpoint based on path
fn categorize_endpoint(path: &str) -> EndpointCategory {
    if path == "/api/health" {
        EndpointCategory::Health
    } else if path.starts_with("/api/auth/login") {
        EndpointCategory::Login
    } else if path.starts_with("/api/public/leads") {
        EndpointCategory::Leads
    } else if path.starts_with("/api/public") {
        EndpointCategory::Public
    } else if path.starts_with("/api/admin") || path.starts_with("/api/auth") {
        EndpointCategory::Admin
    } else {
        EndpointCategory::Other
    }
}

fn client_key(request: &Request) -> ClientKey {
    request
        .extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|ConnectInfo(addr)| addr.ip())
}

/// Per-category, per-client rate limiting middleware
pub async fn rate_limit_middleware(
    State(layer): State<RateLimitLayer>,
    request: Request,
    next: Next,
) -> Result<Response, AppError> {
    // Skip rate limiting if disabled
    if !layer.is_enabled() {
        return Ok(next.run(request).await);
    }

    let category = categorize_endpoint(request.uri().path());
    let limiter = layer.limiter_for(category);
    let rate_limit = layer.rpm_for(category);
    let client = client_key(&request);

    let checked = limiter.check_key(&client);
    if limiter.len() > MAX_TRACKED_CLIENTS {
        limiter.retain_recent();
    }

    match checked {
        Ok(_) => {
            let mut response = next.run(request).await;
            response.headers_mut().insert(
                HeaderName::from_static("x-ratelimit-limit"),
                HeaderValue::from(rate_limit),
            );
            Ok(response)
        }
        Err(not_until) => {
            let wait = not_until.wait_time_from(DefaultClock::default().now());
            // Round up so clients never retry early
            let retry_after = wait.as_secs() + u64::from(wait.subsec_nanos() > 0);

            warn!(
                path = %request.uri().path(),
                category = %category.as_str(),
                client = ?client,
                audit = true,
                "Rate limit exceeded"
            );

            Err(AppError::RateLimitExceeded {
                retry_after: retry_after.max(1),
                limit: rate_limit,
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_endpoint_categorization() {
        assert_eq!(categorize_endpoint("/api/health"), EndpointCategory::Health);
        assert_eq!(categorize_endpoint("/api/auth/login"), EndpointCategory::Login);
        assert_eq!(categorize_endpoint("/api/auth/session"), EndpointCategory::Admin);
        assert_eq!(categorize_endpoint("/api/public/leads"), EndpointCategory::Leads);
        assert_eq!(
            categorize_endpoint("/api/public/articles/tips-seragam"),
            EndpointCategory::Public
        );
        assert_eq!(
            categorize_endpoint("/api/admin/leads/lead-1/whatsapp"),
            EndpointCategory::Admin
        );
        assert_eq!(categorize_endpoint("/favicon.ico"), EndpointCategory::Other);
    }

    #[test]
    fn test_limiters_are_shared_per_category() {
        let layer = RateLimitLayer::new(RateLimitConfig::default());

        let first = layer.limiter_for(EndpointCategory::Public);
        let second = layer.limiter_for(EndpointCategory::Public);
        let login = layer.limiter_for(EndpointCategory::Login);

        assert!(Arc::ptr_eq(&first, &second));
        assert!(!Arc::ptr_eq(&first, &login));
    }

    #[test]
    fn test_burst_is_enforced() {
        let layer = RateLimitLayer::new(RateLimitConfig {
            login_rpm: 4,
            burst_size: 5,
            ..RateLimitConfig::default()
        });

        // 4 rpm * 5 / 10 = a burst of 2
        let limiter = layer.limiter_for(EndpointCategory::Login);
        let client = Some(IpAddr::from([203, 0, 113, 7]));
        assert!(limiter.check_key(&client).is_ok());
        assert!(limiter.check_key(&client).is_ok());
        assert!(limiter.check_key(&client).is_err());
    }

    #[test]
    fn test_clients_have_separate_budgets() {
        let layer = RateLimitLayer::new(RateLimitConfig {
            login_rpm: 1,
            ..RateLimitConfig::default()
        });

        let limiter = layer.limiter_for(EndpointCategory::Login);
        let attacker = Some(IpAddr::from([198, 51, 100, 1]));
        let admin = Some(IpAddr::from([192, 0, 2, 10]));

        assert!(limiter.check_key(&attacker).is_ok());
        assert!(limiter.check_key(&attacker).is_err());
        assert!(limiter.check_key(&admin).is_ok());
    }

    #[test]
    fn test_config_defaults() {
        let config = RateLimitConfig::default();
        assert!(config.enabled);
        assert_eq!(config.login_rpm, 10);
        assert_eq!(config.leads_rpm, 10);
        assert_eq!(config.burst_size, 5);
    }
}
