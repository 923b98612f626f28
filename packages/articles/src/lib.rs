// ABOUTME: Articles with a draft/published lifecycle
// ABOUTME: Slug derivation, boundary validation, and SQLite storage

pub mod slug;
pub mod storage;
pub mod types;
pub mod validation;

pub use slug::slugify;
pub use storage::ArticleStorage;
pub use types::{
    Article, ArticleCategory, ArticleFilter, ArticleInput, ArticleStatus, UnpublishPolicy,
};
