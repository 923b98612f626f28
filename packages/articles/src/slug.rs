// ABOUTME: URL slug derivation for article titles
// ABOUTME: Produces lowercase [a-z0-9-] slugs with a stable fallback

/// Slug used when a title has no ASCII letters or digits at all
pub const FALLBACK_SLUG: &str = "article";

/// Lowercase the title and collapse every run of characters outside
/// `[a-z0-9]` into a single hyphen, trimming hyphens at both ends.
pub fn slugify(title: &str) -> String {
    let mut slug = String::with_capacity(title.len());
    let mut pending_hyphen = false;

    for c in title.chars().flat_map(char::to_lowercase) {
        if c.is_ascii_lowercase() || c.is_ascii_digit() {
            if pending_hyphen && !slug.is_empty() {
                slug.push('-');
            }
            pending_hyphen = false;
            slug.push(c);
        } else {
            pending_hyphen = true;
        }
    }

    if slug.is_empty() {
        FALLBACK_SLUG.to_string()
    } else {
        slug
    }
}

/// Slug made unique by a millisecond timestamp suffix
pub fn with_suffix(slug: &str, millis: i64) -> String {
    format!("{}-{}", slug, millis)
}
