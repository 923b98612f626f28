// ABOUTME: WhatsApp click-to-chat links for following up on leads
// ABOUTME: Normalizes Indonesian numbers and fills the greeting template

use serde::Serialize;

use crate::types::{Lead, Panggilan};

const WA_BASE_URL: &str = "https://wa.me";
const COUNTRY_CODE: &str = "62";

/// Sender details used to sign the greeting
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WhatsAppTemplate {
    pub sender_name: String,
    pub business_name: String,
}

impl Default for WhatsAppTemplate {
    fn default() -> Self {
        Self {
            sender_name: "Ninda".to_string(),
            business_name: "Srisandang".to_string(),
        }
    }
}

impl WhatsAppTemplate {
    pub fn new(sender_name: impl Into<String>, business_name: impl Into<String>) -> Self {
        Self {
            sender_name: sender_name.into(),
            business_name: business_name.into(),
        }
    }

    pub fn message(&self, panggilan: Panggilan, name: &str) -> String {
        let p = panggilan.as_str();
        format!(
            "Halo {p} {name}. Saya {sender} dari {business}.\n\n\
             Saya dapat nomor {p} dari website kami.\n\n\
             Jika boleh, mohon di info ke saya kebutuhan baju/merchandise {p} seperti apa? \
             biar saya bantu hitungkan estimasi pembuatan dan harganya",
            p = p,
            name = name,
            sender = self.sender_name,
            business = self.business_name,
        )
    }

    /// `https://wa.me/<number>?text=<message>` addressed to the lead
    pub fn link_for(&self, lead: &Lead) -> String {
        let message = self.message(lead.panggilan, &lead.name);
        format!(
            "{}/{}?text={}",
            WA_BASE_URL,
            normalize_phone(&lead.phone),
            urlencoding::encode(&message)
        )
    }
}

/// Digits only, in international form without the plus sign
pub fn normalize_phone(phone: &str) -> String {
    let digits: String = phone.chars().filter(|c| c.is_ascii_digit()).collect();

    if let Some(rest) = digits.strip_prefix('0') {
        format!("{}{}", COUNTRY_CODE, rest)
    } else if digits.starts_with(COUNTRY_CODE) {
        digits
    } else {
        format!("{}{}", COUNTRY_CODE, digits)
    }
}

/// Result of the contact action: where to send the admin, and the lead afterwards
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ContactLink {
    pub whatsapp_url: String,
    pub lead: Lead,
}
