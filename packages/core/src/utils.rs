// ABOUTME: Shared utility functions for Storefront
// ABOUTME: Record ID generation and optional-field normalization

/// Generate a record ID such as `prod-V1StGXR8_Z5jdHi6B-myT`
pub fn generate_id(prefix: &str) -> String {
    format!("{}-{}", prefix, nanoid::nanoid!())
}

/// Trim an optional string, treating blank values as absent
pub fn normalize_optional(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_id_is_prefixed_and_unique() {
        let id1 = generate_id("lead");
        let id2 = generate_id("lead");

        assert!(id1.starts_with("lead-"));
        assert_ne!(id1, id2);
        assert_eq!(id1.len(), "lead-".len() + 21);
    }

    #[test]
    fn test_normalize_optional() {
        assert_eq!(normalize_optional(None), None);
        assert_eq!(normalize_optional(Some("".to_string())), None);
        assert_eq!(normalize_optional(Some("  ".to_string())), None);
        assert_eq!(
            normalize_optional(Some(" https://cdn/x.png ".to_string())),
            Some("https://cdn/x.png".to_string())
        );
    }
}
