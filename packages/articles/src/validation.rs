// ABOUTME: Article form validation
// ABOUTME: Length and required-field rules applied on every write

use storefront_core::{ValidationErrors, Validator};

use crate::types::ArticleInput;

pub const TITLE_MIN: usize = 3;
pub const EXCERPT_MIN: usize = 10;
pub const EXCERPT_MAX: usize = 200;
pub const CONTENT_MIN: usize = 50;

/// Trim and validate an article before it is written
pub fn validate_article(input: ArticleInput) -> Result<ArticleInput, ValidationErrors> {
    let input = ArticleInput {
        title: input.title.trim().to_string(),
        content: input.content.trim().to_string(),
        excerpt: input.excerpt.trim().to_string(),
        cover_image: input.cover_image.trim().to_string(),
        ..input
    };

    Validator::new()
        .min_chars(
            "title",
            &input.title,
            TITLE_MIN,
            "Title must be at least 3 characters",
        )
        .min_chars(
            "excerpt",
            &input.excerpt,
            EXCERPT_MIN,
            "Excerpt must be at least 10 characters",
        )
        .max_chars(
            "excerpt",
            &input.excerpt,
            EXCERPT_MAX,
            "Excerpt must not exceed 200 characters",
        )
        .min_chars(
            "content",
            &input.content,
            CONTENT_MIN,
            "Content must be at least 50 characters",
        )
        .required("coverImage", &input.cover_image, "Cover image is required")
        .finish()?;

    Ok(input)
}
