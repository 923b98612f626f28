use std::env;
use std::path::PathBuf;

/// Number of articles shown per page on the public article listing
pub const ARTICLES_PER_PAGE: i64 = 9;

/// Get the path to the Storefront data directory (~/.storefront)
pub fn storefront_dir() -> PathBuf {
    // First try HOME environment variable (useful for tests)
    if let Ok(home) = env::var("HOME") {
        PathBuf::from(home).join(".storefront")
    } else {
        dirs::home_dir()
            .unwrap_or_else(env::temp_dir)
            .join(".storefront")
    }
}

/// Default location of the SQLite database (~/.storefront/storefront.db)
pub fn default_database_path() -> PathBuf {
    storefront_dir().join("storefront.db")
}
