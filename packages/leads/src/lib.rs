// ABOUTME: Lead capture from the public catalogue form and admin triage
// ABOUTME: Typed submissions, Indonesian-language validation, storage, and WhatsApp links

pub mod storage;
pub mod types;
pub mod validation;
pub mod whatsapp;

pub use storage::LeadStorage;
pub use types::{Lead, LeadFilter, LeadStatus, LeadSubmission, Panggilan, QtyRange};
pub use validation::{is_valid_phone, validate_submission};
pub use whatsapp::{normalize_phone, ContactLink, WhatsAppTemplate};
