// ABOUTME: Login, logout, and session checks for the admin area
// ABOUTME: Every failure path collapses into a generic error for the caller

use chrono::{DateTime, Duration, Utc};
use serde::Serialize;
use sqlx::SqlitePool;
use tracing::{info, warn};

use crate::admins::AdminStorage;
use crate::error::{SecurityError, SecurityResult};
use crate::password::{dummy_verify, verify_password};
use crate::sessions::SessionStorage;

pub const DEFAULT_SESSION_TTL_HOURS: i64 = 12;

/// Longest session lifetime accepted from configuration (one year)
pub const MAX_SESSION_TTL_HOURS: i64 = 24 * 366;

/// Result of a successful login; `token` goes into the session cookie
#[derive(Debug, Clone)]
pub struct LoginSession {
    pub token: String,
    pub username: String,
    pub expires_at: DateTime<Utc>,
}

/// The admin behind a verified session token
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthenticatedAdmin {
    pub admin_id: String,
    pub username: String,
    pub expires_at: DateTime<Utc>,
}

pub struct Authenticator {
    admins: AdminStorage,
    sessions: SessionStorage,
    session_ttl: Duration,
}

impl Authenticator {
    pub fn new(pool: SqlitePool, session_ttl: Duration) -> Self {
        Self {
            admins: AdminStorage::new(pool.clone()),
            sessions: SessionStorage::new(pool),
            session_ttl,
        }
    }

    pub fn admins(&self) -> &AdminStorage {
        &self.admins
    }

    pub fn sessions(&self) -> &SessionStorage {
        &self.sessions
    }

    pub fn session_ttl(&self) -> Duration {
        self.session_ttl
    }

    pub async fn login(&self, username: &str, password: &str) -> SecurityResult<LoginSession> {
        let credential = self.admins.find_credential(username).await?;

        let Some(credential) = credential else {
            dummy_verify(password);
            warn!(audit = true, "Login failed: unknown username");
            return Err(SecurityError::InvalidCredentials);
        };

        if !verify_password(password, &credential.password_hash) {
            warn!(
                audit = true,
                "Login failed: wrong password for '{}'", credential.admin.username
            );
            return Err(SecurityError::InvalidCredentials);
        }

        let issued = self
            .sessions
            .create_session(&credential.admin.id, self.session_ttl)
            .await?;

        info!(audit = true, "Admin '{}' logged in", credential.admin.username);

        Ok(LoginSession {
            token: issued.token,
            username: credential.admin.username,
            expires_at: issued.expires_at,
        })
    }

    /// End the session behind `token`. Succeeds whether or not it existed.
    pub async fn logout(&self, token: &str) -> SecurityResult<()> {
        if self.sessions.revoke_session(token).await? {
            info!(audit = true, "Admin session revoked on logout");
        }
        Ok(())
    }

    pub async fn authenticate(&self, token: &str) -> SecurityResult<AuthenticatedAdmin> {
        let session = self
            .sessions
            .verify_session(token)
            .await?
            .ok_or(SecurityError::Unauthorized)?;

        Ok(AuthenticatedAdmin {
            admin_id: session.admin_id,
            username: session.username,
            expires_at: session.expires_at,
        })
    }
}
