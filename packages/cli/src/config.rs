// ABOUTME: Server configuration loaded from the environment
// ABOUTME: Parses and validates every setting up front

use std::env;
use std::net::IpAddr;
use std::num::ParseIntError;
use std::path::PathBuf;

use chrono::Duration;
use storefront_api::StateOptions;
use storefront_articles::UnpublishPolicy;
use storefront_core::default_database_path;
use storefront_leads::WhatsAppTemplate;
use storefront_media::HostedStoreConfig;
use storefront_security::auth::{DEFAULT_SESSION_TTL_HOURS, MAX_SESSION_TTL_HOURS};
use thiserror::Error;

use crate::middleware::RateLimitConfig;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Invalid port number: {0}")]
    InvalidPort(#[from] ParseIntError),
    #[error("Port {0} is out of valid range (1-65535)")]
    PortOutOfRange(u16),
    #[error("Invalid bind address: {0}")]
    InvalidBindAddress(String),
    #[error("{var} must be a positive number within range, got '{value}'")]
    InvalidNumber { var: &'static str, value: String },
    #[error("{var} must be true or false, got '{value}'")]
    InvalidBool { var: &'static str, value: String },
    #[error("Invalid UNPUBLISH_POLICY: {0}")]
    InvalidUnpublishPolicy(String),
    #[error("{0} is required when MEDIA_UPLOAD_URL is set")]
    MissingMediaSetting(&'static str),
}

#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub bind_address: IpAddr,
    pub database_path: PathBuf,
    pub cors_origin: String,
    pub admin_username: Option<String>,
    pub admin_password: Option<String>,
    pub session_ttl_hours: i64,
    pub secure_cookies: bool,
    pub unpublish_policy: UnpublishPolicy,
    pub whatsapp_sender_name: String,
    pub business_name: String,
    pub media: Option<HostedStoreConfig>,
    pub rate_limit: RateLimitConfig,
}

impl Config {
    /// Load `.env` (if present) and read the process environment
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Build a config from any variable source. Blank values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |name: &str| {
            lookup(name)
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
        };

        let port = var("PORT")
            .unwrap_or_else(|| "4001".to_string())
            .parse::<u16>()?;

        // Validate port is in valid range
        if port == 0 {
            return Err(ConfigError::PortOutOfRange(port));
        }

        let bind_address = var("BIND_ADDRESS")
            .unwrap_or_else(|| "127.0.0.1".to_string());
        let bind_address = bind_address
            .parse::<IpAddr>()
            .map_err(|_| ConfigError::InvalidBindAddress(bind_address))?;

        let database_path = var("DATABASE_PATH")
            .map(PathBuf::from)
            .unwrap_or_else(default_database_path);

        let cors_origin =
            var("CORS_ORIGIN").unwrap_or_else(|| "http://localhost:3000".to_string());

        let session_ttl_hours = parse_number(
            "SESSION_TTL_HOURS",
            var("SESSION_TTL_HOURS"),
            DEFAULT_SESSION_TTL_HOURS,
        )?;
        if session_ttl_hours > MAX_SESSION_TTL_HOURS {
            return Err(ConfigError::InvalidNumber {
                var: "SESSION_TTL_HOURS",
                value: session_ttl_hours.to_string(),
            });
        }

        let secure_cookies = parse_bool("SECURE_COOKIES", var("SECURE_COOKIES"), false)?;

        let unpublish_policy = match var("UNPUBLISH_POLICY") {
            Some(value) => value
                .parse::<UnpublishPolicy>()
                .map_err(ConfigError::InvalidUnpublishPolicy)?,
            None => UnpublishPolicy::default(),
        };

        let template = WhatsAppTemplate::default();
        let whatsapp_sender_name = var("WHATSAPP_SENDER_NAME").unwrap_or(template.sender_name);
        let business_name = var("BUSINESS_NAME").unwrap_or(template.business_name);

        let media = match var("MEDIA_UPLOAD_URL") {
            Some(upload_url) => Some(HostedStoreConfig {
                upload_url,
                upload_preset: var("MEDIA_UPLOAD_PRESET")
                    .ok_or(ConfigError::MissingMediaSetting("MEDIA_UPLOAD_PRESET"))?,
                folder: var("MEDIA_FOLDER"),
            }),
            None => None,
        };

        let defaults = RateLimitConfig::default();
        let rate_limit = RateLimitConfig {
            enabled: parse_bool(
                "RATE_LIMIT_ENABLED",
                var("RATE_LIMIT_ENABLED"),
                defaults.enabled,
            )?,
            login_rpm: parse_number("LOGIN_RPM", var("LOGIN_RPM"), defaults.login_rpm)?,
            leads_rpm: parse_number("LEADS_RPM", var("LEADS_RPM"), defaults.leads_rpm)?,
            ..defaults
        };

        Ok(Config {
            port,
            bind_address,
            database_path,
            cors_origin,
            admin_username: var("ADMIN_USERNAME"),
            admin_password: var("ADMIN_PASSWORD"),
            session_ttl_hours,
            secure_cookies,
            unpublish_policy,
            whatsapp_sender_name,
            business_name,
            media,
            rate_limit,
        })
    }

    /// Handler-facing settings derived from this config
    pub fn state_options(&self) -> StateOptions {
        StateOptions {
            session_ttl: Duration::try_hours(self.session_ttl_hours)
                .unwrap_or_else(|| Duration::hours(DEFAULT_SESSION_TTL_HOURS)),
            secure_cookies: self.secure_cookies,
            unpublish_policy: self.unpublish_policy,
            whatsapp: WhatsAppTemplate::new(&self.whatsapp_sender_name, &self.business_name),
        }
    }

    /// Bootstrap credentials, when both halves are configured
    pub fn bootstrap_admin(&self) -> Option<(&str, &str)> {
        match (&self.admin_username, &self.admin_password) {
            (Some(username), Some(password)) => Some((username.as_str(), password.as_str())),
            _ => None,
        }
    }
}

fn parse_number<T>(var: &'static str, value: Option<String>, default: T) -> Result<T, ConfigError>
where
    T: std::str::FromStr + PartialOrd + Default,
{
    let Some(value) = value else {
        return Ok(default);
    };

    match value.parse::<T>() {
        Ok(number) if number > T::default() => Ok(number),
        _ => Err(ConfigError::InvalidNumber { var, value }),
    }
}

fn parse_bool(var: &'static str, value: Option<String>, default: bool) -> Result<bool, ConfigError> {
    let Some(value) = value else {
        return Ok(default);
    };

    match value.to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" => Ok(true),
        "false" | "0" | "no" => Ok(false),
        _ => Err(ConfigError::InvalidBool { var, value }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_from(vars: &[(&str, &str)]) -> Result<Config, ConfigError> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|name| vars.get(name).cloned())
    }

    #[test]
    fn test_defaults() {
        let config = config_from(&[]).unwrap();

        assert_eq!(config.port, 4001);
        assert_eq!(config.bind_address.to_string(), "127.0.0.1");
        assert!(config.database_path.ends_with(".storefront/storefront.db"));
        assert_eq!(config.session_ttl_hours, 12);
        assert!(!config.secure_cookies);
        assert_eq!(config.unpublish_policy, UnpublishPolicy::Retain);
        assert_eq!(config.whatsapp_sender_name, "Ninda");
        assert_eq!(config.business_name, "Srisandang");
        assert!(config.media.is_none());
        assert!(config.bootstrap_admin().is_none());
        assert!(config.rate_limit.enabled);
    }

    #[test]
    fn test_overrides() {
        let config = config_from(&[
            ("PORT", "8080"),
            ("DATABASE_PATH", "/var/lib/storefront/site.db"),
            ("ADMIN_USERNAME", "admin"),
            ("ADMIN_PASSWORD", "rahasia-sekali"),
            ("SECURE_COOKIES", "true"),
            ("UNPUBLISH_POLICY", "Clear"),
            ("MEDIA_UPLOAD_URL", "https://api.cloudinary.com/v1_1/demo/image/upload"),
            ("MEDIA_UPLOAD_PRESET", "storefront"),
            ("LOGIN_RPM", "3"),
        ])
        .unwrap();

        assert_eq!(config.port, 8080);
        assert_eq!(config.database_path, PathBuf::from("/var/lib/storefront/site.db"));
        assert_eq!(config.bootstrap_admin(), Some(("admin", "rahasia-sekali")));
        assert!(config.secure_cookies);
        assert_eq!(config.unpublish_policy, UnpublishPolicy::Clear);
        assert_eq!(config.media.unwrap().upload_preset, "storefront");
        assert_eq!(config.rate_limit.login_rpm, 3);
    }

    #[test]
    fn test_invalid_values() {
        assert!(matches!(
            config_from(&[("PORT", "0")]),
            Err(ConfigError::PortOutOfRange(0))
        ));
        assert!(matches!(
            config_from(&[("PORT", "http")]),
            Err(ConfigError::InvalidPort(_))
        ));
        assert!(matches!(
            config_from(&[("UNPUBLISH_POLICY", "forget")]),
            Err(ConfigError::InvalidUnpublishPolicy(_))
        ));
        assert!(matches!(
            config_from(&[("SESSION_TTL_HOURS", "-1")]),
            Err(ConfigError::InvalidNumber { var: "SESSION_TTL_HOURS", .. })
        ));
        assert!(matches!(
            config_from(&[("MEDIA_UPLOAD_URL", "https://cdn.example.com/upload")]),
            Err(ConfigError::MissingMediaSetting("MEDIA_UPLOAD_PRESET"))
        ));
    }

    #[test]
    fn test_session_ttl_upper_bound() {
        assert!(matches!(
            config_from(&[("SESSION_TTL_HOURS", "9999999999999")]),
            Err(ConfigError::InvalidNumber { var: "SESSION_TTL_HOURS", .. })
        ));
        assert!(matches!(
            config_from(&[("SESSION_TTL_HOURS", "8785")]),
            Err(ConfigError::InvalidNumber { var: "SESSION_TTL_HOURS", .. })
        ));

        let config = config_from(&[("SESSION_TTL_HOURS", "8784")]).unwrap();
        assert_eq!(
            config.state_options().session_ttl,
            Duration::hours(MAX_SESSION_TTL_HOURS)
        );
    }

    #[test]
    fn test_blank_values_are_unset() {
        let config = config_from(&[("MEDIA_UPLOAD_URL", "  "), ("CORS_ORIGIN", "")]).unwrap();
        assert!(config.media.is_none());
        assert_eq!(config.cors_origin, "http://localhost:3000");
    }
}
