// ABOUTME: Admin account storage using SQLite
// ABOUTME: Creates admins, rotates passwords, and seeds the bootstrap account

use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::{sqlite::SqliteRow, Row, SqlitePool};
use tracing::{debug, info, warn};

use storefront_core::generate_id;
use storefront_storage::is_unique_violation;

use crate::error::{SecurityError, SecurityResult};
use crate::password::{hash_password, validate_password};

pub const MIN_USERNAME_LENGTH: usize = 3;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AdminUser {
    pub id: String,
    pub username: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Admin row including the credential, never serialized
#[derive(Debug, Clone)]
pub(crate) struct AdminCredential {
    pub admin: AdminUser,
    pub password_hash: String,
}

pub struct AdminStorage {
    pool: SqlitePool,
}

impl AdminStorage {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn create_admin(&self, username: &str, password: &str) -> SecurityResult<AdminUser> {
        let username = username.trim();
        if username.chars().count() < MIN_USERNAME_LENGTH {
            return Err(SecurityError::InvalidInput {
                field: "username",
                message: format!("must be at least {} characters", MIN_USERNAME_LENGTH),
            });
        }
        validate_password(password)?;

        let id = generate_id("adm");
        let password_hash = hash_password(password)?;
        let now = Utc::now();

        let result = sqlx::query(
            r#"
            INSERT INTO admin_users (id, username, password_hash, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?)
            "#,
        )
        .bind(&id)
        .bind(username)
        .bind(&password_hash)
        .bind(now)
        .bind(now)
        .execute(&self.pool)
        .await;

        match result {
            Ok(_) => {}
            Err(e) if is_unique_violation(&e) => {
                return Err(SecurityError::AdminExists(username.to_string()))
            }
            Err(e) => return Err(e.into()),
        }

        info!(audit = true, "Created admin account '{}'", username);
        self.get_admin(&id).await
    }

    pub async fn get_admin(&self, id: &str) -> SecurityResult<AdminUser> {
        let row = sqlx::query("SELECT * FROM admin_users WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| SecurityError::AdminNotFound(id.to_string()))?;

        Ok(row_to_admin(&row)?)
    }

    pub async fn find_by_username(&self, username: &str) -> SecurityResult<Option<AdminUser>> {
        Ok(self
            .find_credential(username)
            .await?
            .map(|credential| credential.admin))
    }

    pub(crate) async fn find_credential(
        &self,
        username: &str,
    ) -> SecurityResult<Option<AdminCredential>> {
        debug!("Looking up admin: {}", username);

        let row = sqlx::query("SELECT * FROM admin_users WHERE username = ?")
            .bind(username.trim())
            .fetch_optional(&self.pool)
            .await?;

        match row {
            Some(row) => Ok(Some(AdminCredential {
                admin: row_to_admin(&row)?,
                password_hash: row.try_get("password_hash")?,
            })),
            None => Ok(None),
        }
    }

    /// Replace an admin's password and end every session they hold
    pub async fn set_password(&self, username: &str, password: &str) -> SecurityResult<AdminUser> {
        validate_password(password)?;
        let password_hash = hash_password(password)?;
        let username = username.trim();

        let mut tx = self.pool.begin().await?;

        let row = sqlx::query("SELECT * FROM admin_users WHERE username = ?")
            .bind(username)
            .fetch_optional(&mut *tx)
            .await?
            .ok_or_else(|| SecurityError::AdminNotFound(username.to_string()))?;
        let admin = row_to_admin(&row)?;

        sqlx::query("UPDATE admin_users SET password_hash = ?, updated_at = ? WHERE id = ?")
            .bind(&password_hash)
            .bind(Utc::now())
            .bind(&admin.id)
            .execute(&mut *tx)
            .await?;

        let revoked = sqlx::query("DELETE FROM admin_sessions WHERE admin_id = ?")
            .bind(&admin.id)
            .execute(&mut *tx)
            .await?
            .rows_affected();

        tx.commit().await?;

        info!(
            audit = true,
            "Password changed for admin '{}', {} session(s) revoked", username, revoked
        );
        self.get_admin(&admin.id).await
    }

    pub async fn count_admins(&self) -> SecurityResult<i64> {
        Ok(sqlx::query_scalar("SELECT COUNT(*) FROM admin_users")
            .fetch_one(&self.pool)
            .await?)
    }

    /// Create the configured admin when the store has no admins yet.
    /// Returns the new account, or `None` when admins already exist.
    pub async fn ensure_bootstrap_admin(
        &self,
        username: &str,
        password: &str,
    ) -> SecurityResult<Option<AdminUser>> {
        if self.count_admins().await? > 0 {
            debug!("Admin accounts already exist, skipping bootstrap");
            return Ok(None);
        }

        warn!(
            "No admin accounts found, creating bootstrap admin '{}'",
            username.trim()
        );
        self.create_admin(username, password).await.map(Some)
    }
}

fn row_to_admin(row: &SqliteRow) -> Result<AdminUser, sqlx::Error> {
    Ok(AdminUser {
        id: row.try_get("id")?,
        username: row.try_get("username")?,
        created_at: row.try_get("created_at")?,
        updated_at: row.try_get("updated_at")?,
    })
}
