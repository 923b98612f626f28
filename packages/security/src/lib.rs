// ABOUTME: Admin authentication for Storefront
// ABOUTME: Argon2 credential store, hashed session tokens, and the login/logout flow

pub mod admins;
pub mod auth;
pub mod error;
pub mod password;
pub mod sessions;
pub mod tokens;

// Re-export main types for convenience
pub use admins::{AdminStorage, AdminUser};
pub use auth::{AuthenticatedAdmin, Authenticator, LoginSession};
pub use error::{SecurityError, SecurityResult};
pub use sessions::{ActiveSession, IssuedSession, SessionStorage};
