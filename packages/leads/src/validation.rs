// ABOUTME: Validation for the catalogue-access lead form
// ABOUTME: Trims input and checks Indonesian mobile numbers

use lazy_static::lazy_static;
use regex::Regex;
use storefront_core::{ValidationErrors, Validator};

use crate::types::{LeadSubmission, Panggilan, QtyRange};

pub const NAME_MIN: usize = 2;
pub const PHONE_MIN: usize = 10;
pub const PHONE_MAX: usize = 15;

lazy_static! {
    /// Indonesian mobile number: 0 / 62 / +62, then 8, a non-zero operator digit, 6-9 more digits
    static ref PHONE_RE: Regex =
        Regex::new(r"^(\+62|62|0)8[1-9][0-9]{6,9}$").expect("phone pattern is valid");
}

/// Submission that passed validation, with defaults applied
#[derive(Debug, Clone, PartialEq)]
pub struct ValidatedLead {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub company: String,
    pub panggilan: Panggilan,
    pub qty_range: QtyRange,
}

pub fn is_valid_phone(phone: &str) -> bool {
    PHONE_RE.is_match(phone)
}

/// Trim and validate a public form submission
pub fn validate_submission(input: LeadSubmission) -> Result<ValidatedLead, ValidationErrors> {
    let name = input.name.trim().to_string();
    let email = input.email.trim().to_string();
    let phone = input.phone.trim().to_string();
    let company = input.company.trim().to_string();
    let phone_len = phone.chars().count();

    Validator::new()
        .min_chars("name", &name, NAME_MIN, "Nama harus minimal 2 karakter")
        .email("email", &email, "Masukkan email yang valid")
        .check(
            phone_len >= PHONE_MIN,
            "phone",
            "Nomor WhatsApp harus minimal 10 digit",
        )
        .check(
            phone_len <= PHONE_MAX,
            "phone",
            "Nomor WhatsApp maksimal 15 digit",
        )
        .check(
            is_valid_phone(&phone),
            "phone",
            "Masukkan nomor WhatsApp yang valid (contoh: 081234567890)",
        )
        .required("company", &company, "Nama perusahaan harus diisi")
        .check(
            input.qty_range.is_some(),
            "qtyRange",
            "Pilih perkiraan jumlah pesanan",
        )
        .finish()?;

    let qty_range = input
        .qty_range
        .ok_or_else(|| ValidationErrors::single("qtyRange", "Pilih perkiraan jumlah pesanan"))?;

    Ok(ValidatedLead {
        name,
        email,
        phone,
        company,
        panggilan: input.panggilan.unwrap_or_default(),
        qty_range,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn submission(phone: &str) -> LeadSubmission {
        LeadSubmission {
            name: "Budi Santoso".to_string(),
            email: "budi@example.com".to_string(),
            phone: phone.to_string(),
            company: "PT Maju Jaya".to_string(),
            panggilan: None,
            qty_range: Some(QtyRange::From50To100),
        }
    }

    #[test]
    fn test_phone_prefixes() {
        assert!(is_valid_phone("081234567890"));
        assert!(is_valid_phone("6281234567890"));
        assert!(is_valid_phone("+6281234567890"));
        assert!(is_valid_phone("081234567"));

        assert!(!is_valid_phone("0812345"));
        assert!(!is_valid_phone("080234567890"));
        assert!(!is_valid_phone("071234567890"));
        assert!(!is_valid_phone("0812345678901"));
        assert!(!is_valid_phone("0812-3456-7890"));
        assert!(!is_valid_phone("+6581234567890"));
    }

    #[test]
    fn test_valid_submission_defaults_panggilan() {
        let lead = validate_submission(submission(" 081234567890 ")).unwrap();

        assert_eq!(lead.phone, "081234567890");
        assert_eq!(lead.panggilan, Panggilan::Kakak);
        assert_eq!(lead.qty_range, QtyRange::From50To100);
    }

    #[test]
    fn test_short_phone_reports_length_first() {
        let errors = validate_submission(submission("08123")).unwrap_err();
        assert_eq!(
            errors.message_for("phone"),
            Some("Nomor WhatsApp harus minimal 10 digit")
        );
    }

    #[test]
    fn test_malformed_phone_reports_example() {
        let errors = validate_submission(submission("021234567890")).unwrap_err();
        assert_eq!(
            errors.message_for("phone"),
            Some("Masukkan nomor WhatsApp yang valid (contoh: 081234567890)")
        );
    }

    #[test]
    fn test_every_field_reported() {
        let errors = validate_submission(LeadSubmission::default()).unwrap_err();

        assert_eq!(errors.message_for("name"), Some("Nama harus minimal 2 karakter"));
        assert_eq!(errors.message_for("email"), Some("Masukkan email yang valid"));
        assert!(errors.has_field("phone"));
        assert_eq!(errors.message_for("company"), Some("Nama perusahaan harus diisi"));
        assert_eq!(
            errors.message_for("qtyRange"),
            Some("Pilih perkiraan jumlah pesanan")
        );
        assert!(!errors.has_field("panggilan"));
    }
}
