// ABOUTME: Server-side admin sessions using SQLite
// ABOUTME: Issues, verifies, and revokes hashed session tokens

use chrono::{DateTime, Duration, Utc};
use sqlx::{Row, SqlitePool};
use tracing::debug;

use storefront_core::generate_id;

use crate::error::{SecurityError, SecurityResult};
use crate::tokens::{generate_token, hash_token, verify_token_hash};

/// Freshly issued session. The plaintext token exists only here.
#[derive(Debug, Clone)]
pub struct IssuedSession {
    pub id: String,
    pub token: String,
    pub expires_at: DateTime<Utc>,
}

/// A live session resolved from a presented token
#[derive(Debug, Clone, PartialEq)]
pub struct ActiveSession {
    pub id: String,
    pub admin_id: String,
    pub username: String,
    pub expires_at: DateTime<Utc>,
}

pub struct SessionStorage {
    pool: SqlitePool,
}

impl SessionStorage {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Issue a session for `admin_id`, clearing out expired ones first
    pub async fn create_session(
        &self,
        admin_id: &str,
        ttl: Duration,
    ) -> SecurityResult<IssuedSession> {
        self.purge_expired().await?;

        let now = Utc::now();
        let expires_at = now
            .checked_add_signed(ttl)
            .ok_or_else(|| SecurityError::InvalidInput {
                field: "ttl",
                message: "session lifetime is out of range".to_string(),
            })?;

        let id = generate_id("sess");
        let token = generate_token();

        sqlx::query(
            r#"
            INSERT INTO admin_sessions (id, admin_id, token_hash, created_at, expires_at)
            VALUES (?, ?, ?, ?, ?)
            "#,
        )
        .bind(&id)
        .bind(admin_id)
        .bind(hash_token(&token))
        .bind(now)
        .bind(expires_at)
        .execute(&self.pool)
        .await?;

        debug!("Issued session {} for admin {}", id, admin_id);

        Ok(IssuedSession {
            id,
            token,
            expires_at,
        })
    }

    /// Resolve a token to its live session, refreshing `last_seen_at`
    pub async fn verify_session(&self, token: &str) -> SecurityResult<Option<ActiveSession>> {
        let token_hash = hash_token(token);
        let now = Utc::now();

        let row = sqlx::query(
            r#"
            SELECT s.id, s.admin_id, s.token_hash, s.expires_at, u.username
            FROM admin_sessions s
            JOIN admin_users u ON u.id = s.admin_id
            WHERE s.token_hash = ? AND s.expires_at > ?
            "#,
        )
        .bind(&token_hash)
        .bind(now)
        .fetch_optional(&self.pool)
        .await?;

        let Some(row) = row else {
            return Ok(None);
        };

        let stored_hash: String = row.try_get("token_hash")?;
        if !verify_token_hash(token, &stored_hash) {
            return Ok(None);
        }

        let session = ActiveSession {
            id: row.try_get("id")?,
            admin_id: row.try_get("admin_id")?,
            username: row.try_get("username")?,
            expires_at: row.try_get("expires_at")?,
        };

        sqlx::query("UPDATE admin_sessions SET last_seen_at = ? WHERE id = ?")
            .bind(now)
            .bind(&session.id)
            .execute(&self.pool)
            .await?;

        Ok(Some(session))
    }

    /// Revoke the session behind a token. Unknown tokens are ignored.
    pub async fn revoke_session(&self, token: &str) -> SecurityResult<bool> {
        let result = sqlx::query("DELETE FROM admin_sessions WHERE token_hash = ?")
            .bind(hash_token(token))
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    pub async fn revoke_all_for_admin(&self, admin_id: &str) -> SecurityResult<u64> {
        let result = sqlx::query("DELETE FROM admin_sessions WHERE admin_id = ?")
            .bind(admin_id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected())
    }

    pub async fn purge_expired(&self) -> SecurityResult<u64> {
        let result = sqlx::query("DELETE FROM admin_sessions WHERE expires_at <= ?")
            .bind(Utc::now())
            .execute(&self.pool)
            .await?;

        let purged = result.rows_affected();
        if purged > 0 {
            debug!("Purged {} expired session(s)", purged);
        }
        Ok(purged)
    }

    pub async fn count_sessions(&self) -> SecurityResult<i64> {
        Ok(sqlx::query_scalar("SELECT COUNT(*) FROM admin_sessions")
            .fetch_one(&self.pool)
            .await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::admins::AdminStorage;
    use storefront_storage::Database;

    async fn setup() -> (Database, SessionStorage, String) {
        let db = Database::in_memory().await.unwrap();
        let admin = AdminStorage::new(db.pool().clone())
            .create_admin("admin", "rahasia-sekali")
            .await
            .unwrap();
        let sessions = SessionStorage::new(db.pool().clone());
        (db, sessions, admin.id)
    }

    #[tokio::test]
    async fn test_issued_token_verifies() {
        let (db, sessions, admin_id) = setup().await;

        let issued = sessions
            .create_session(&admin_id, Duration::hours(12))
            .await
            .unwrap();

        let active = sessions.verify_session(&issued.token).await.unwrap().unwrap();
        assert_eq!(active.admin_id, admin_id);
        assert_eq!(active.username, "admin");

        // Plaintext is never persisted
        let stored: String = sqlx::query_scalar("SELECT token_hash FROM admin_sessions")
            .fetch_one(db.pool())
            .await
            .unwrap();
        assert_ne!(stored, issued.token);
    }

    #[tokio::test]
    async fn test_expired_session_is_rejected_and_purged() {
        let (_db, sessions, admin_id) = setup().await;

        let expired = sessions
            .create_session(&admin_id, Duration::seconds(-1))
            .await
            .unwrap();
        assert!(sessions.verify_session(&expired.token).await.unwrap().is_none());

        // Issuing a new session sweeps the stale one
        sessions
            .create_session(&admin_id, Duration::hours(1))
            .await
            .unwrap();
        assert_eq!(sessions.count_sessions().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_out_of_range_ttl_is_rejected() {
        let (_db, sessions, admin_id) = setup().await;

        let result = sessions.create_session(&admin_id, Duration::MAX).await;
        assert!(matches!(
            result,
            Err(SecurityError::InvalidInput { field: "ttl", .. })
        ));
        assert_eq!(sessions.count_sessions().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_revoke() {
        let (_db, sessions, admin_id) = setup().await;

        let first = sessions
            .create_session(&admin_id, Duration::hours(1))
            .await
            .unwrap();
        let second = sessions
            .create_session(&admin_id, Duration::hours(1))
            .await
            .unwrap();

        assert!(sessions.revoke_session(&first.token).await.unwrap());
        assert!(!sessions.revoke_session(&first.token).await.unwrap());
        assert!(sessions.verify_session(&first.token).await.unwrap().is_none());
        assert!(sessions.verify_session(&second.token).await.unwrap().is_some());

        assert_eq!(sessions.revoke_all_for_admin(&admin_id).await.unwrap(), 1);
        assert!(sessions.verify_session(&second.token).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_unknown_token() {
        let (_db, sessions, _) = setup().await;
        assert!(sessions.verify_session("not-a-token").await.unwrap().is_none());
    }
}
