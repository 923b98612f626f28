// ABOUTME: Core types, validation helpers, and utilities for Storefront
// ABOUTME: Foundational package shared by every storage and API package

pub mod constants;
pub mod pagination;
pub mod search;
pub mod utils;
pub mod validation;

// Re-export constants
pub use constants::{default_database_path, storefront_dir, ARTICLES_PER_PAGE};

// Re-export pagination types
pub use pagination::{PaginatedResponse, PaginationMeta, PaginationParams};

// Re-export search helpers
pub use search::like_pattern;

// Re-export utilities
pub use utils::{generate_id, normalize_optional};

// Re-export validation
pub use validation::{is_valid_email, ValidationError, ValidationErrors, Validator};
