// ABOUTME: Input validation for products and testimonials
// ABOUTME: Collects per-field messages before anything is written

use storefront_core::{normalize_optional, ValidationErrors, Validator};

use crate::types::{ProductInput, TestimonialInput};

pub const PRODUCT_NAME_MIN: usize = 3;
pub const PRODUCT_DESCRIPTION_MIN: usize = 10;
pub const CLIENT_NAME_MIN: usize = 2;
pub const TESTIMONIAL_CONTENT_MIN: usize = 10;
pub const TESTIMONIAL_CONTENT_MAX: usize = 500;

/// Trim and validate a product before it is written
pub fn validate_product(input: ProductInput) -> Result<ProductInput, ValidationErrors> {
    let input = ProductInput {
        name: input.name.trim().to_string(),
        description: input.description.trim().to_string(),
        category: input.category,
        images: input
            .images
            .into_iter()
            .map(|url| url.trim().to_string())
            .filter(|url| !url.is_empty())
            .collect(),
    };

    Validator::new()
        .min_chars(
            "name",
            &input.name,
            PRODUCT_NAME_MIN,
            "Name must be at least 3 characters",
        )
        .min_chars(
            "description",
            &input.description,
            PRODUCT_DESCRIPTION_MIN,
            "Description must be at least 10 characters",
        )
        .check(
            !input.images.is_empty(),
            "images",
            "At least one image is required",
        )
        .finish()?;

    Ok(input)
}

/// Trim and validate a testimonial before it is written
pub fn validate_testimonial(input: TestimonialInput) -> Result<TestimonialInput, ValidationErrors> {
    let input = TestimonialInput {
        client_name: input.client_name.trim().to_string(),
        content: input.content.trim().to_string(),
        image: normalize_optional(input.image),
    };

    Validator::new()
        .min_chars(
            "clientName",
            &input.client_name,
            CLIENT_NAME_MIN,
            "Name must be at least 2 characters",
        )
        .min_chars(
            "content",
            &input.content,
            TESTIMONIAL_CONTENT_MIN,
            "Testimonial must be at least 10 characters",
        )
        .max_chars(
            "content",
            &input.content,
            TESTIMONIAL_CONTENT_MAX,
            "Testimonial must not exceed 500 characters",
        )
        .finish()?;

    Ok(input)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::ProductCategory;

    fn product(name: &str, description: &str, images: &[&str]) -> ProductInput {
        ProductInput {
            name: name.to_string(),
            description: description.to_string(),
            category: ProductCategory::Safety,
            images: images.iter().map(|s| s.to_string()).collect(),
        }
    }

    #[test]
    fn test_valid_product_is_trimmed() {
        let input = product("  Rompi  ", "Rompi safety reflektif", &[" https://cdn/r.jpg ", " "]);
        let validated = validate_product(input).unwrap();

        assert_eq!(validated.name, "Rompi");
        assert_eq!(validated.images, vec!["https://cdn/r.jpg".to_string()]);
    }

    #[test]
    fn test_product_reports_every_bad_field() {
        let errors = validate_product(product("ab", "short", &["   "])).unwrap_err();

        assert!(errors.has_field("name"));
        assert!(errors.has_field("description"));
        assert_eq!(
            errors.message_for("images"),
            Some("At least one image is required")
        );
    }

    #[test]
    fn test_testimonial_bounds() {
        let ok = TestimonialInput {
            client_name: "Pak Budi".to_string(),
            content: "Bahan bagus, pengiriman tepat waktu.".to_string(),
            image: Some("".to_string()),
        };
        let validated = validate_testimonial(ok).unwrap();
        assert!(validated.image.is_none());

        let too_long = TestimonialInput {
            client_name: "Pak Budi".to_string(),
            content: "x".repeat(TESTIMONIAL_CONTENT_MAX + 1),
            image: None,
        };
        let errors = validate_testimonial(too_long).unwrap_err();
        assert_eq!(
            errors.message_for("content"),
            Some("Testimonial must not exceed 500 characters")
        );
    }
}
