// ABOUTME: Lead type definitions
// ABOUTME: Salutations, order-size ranges, triage status, and the public form shape

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// How the business addresses the contact in follow-up messages
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Panggilan {
    #[default]
    Kakak,
    Bapak,
    Ibu,
}

impl Panggilan {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Kakak => "Kakak",
            Self::Bapak => "Bapak",
            Self::Ibu => "Ibu",
        }
    }
}

impl fmt::Display for Panggilan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Panggilan {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Kakak" => Ok(Self::Kakak),
            "Bapak" => Ok(Self::Bapak),
            "Ibu" => Ok(Self::Ibu),
            other => Err(format!("unknown panggilan '{}'", other)),
        }
    }
}

/// Estimated order quantity picked on the form
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum QtyRange {
    #[serde(rename = "< 50")]
    Under50,
    #[serde(rename = "50 - 100")]
    From50To100,
    #[serde(rename = "100 - 200")]
    From100To200,
    #[serde(rename = "200 - 300")]
    From200To300,
    #[serde(rename = "300 - 500")]
    From300To500,
    #[serde(rename = "500 - 1000")]
    From500To1000,
    #[serde(rename = "> 1000")]
    Over1000,
}

impl QtyRange {
    pub const ALL: [QtyRange; 7] = [
        QtyRange::Under50,
        QtyRange::From50To100,
        QtyRange::From100To200,
        QtyRange::From200To300,
        QtyRange::From300To500,
        QtyRange::From500To1000,
        QtyRange::Over1000,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Under50 => "< 50",
            Self::From50To100 => "50 - 100",
            Self::From100To200 => "100 - 200",
            Self::From200To300 => "200 - 300",
            Self::From300To500 => "300 - 500",
            Self::From500To1000 => "500 - 1000",
            Self::Over1000 => "> 1000",
        }
    }

    /// Human-readable label shown in the admin lead list
    pub fn label(&self) -> String {
        match self {
            Self::Under50 => "Kurang dari 50 pcs".to_string(),
            Self::Over1000 => "Lebih dari 1000 pcs".to_string(),
            other => format!("{} pcs", other.as_str()),
        }
    }
}

impl fmt::Display for QtyRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for QtyRange {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|range| range.as_str() == s)
            .ok_or_else(|| format!("unknown quantity range '{}'", s))
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LeadStatus {
    #[default]
    New,
    Contacted,
    Closed,
}

impl LeadStatus {
    pub const ALL: [LeadStatus; 3] = [LeadStatus::New, LeadStatus::Contacted, LeadStatus::Closed];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::New => "new",
            Self::Contacted => "contacted",
            Self::Closed => "closed",
        }
    }
}

impl fmt::Display for LeadStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LeadStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "new" => Ok(Self::New),
            "contacted" => Ok(Self::Contacted),
            "closed" => Ok(Self::Closed),
            other => Err(format!("unknown lead status '{}'", other)),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Lead {
    pub id: String,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub company: String,
    pub panggilan: Panggilan,
    pub qty_range: QtyRange,
    pub status: LeadStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Catalogue-access form as submitted by a visitor
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LeadSubmission {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub company: String,
    /// Absent means `Kakak`
    #[serde(default)]
    pub panggilan: Option<Panggilan>,
    #[serde(default)]
    pub qty_range: Option<QtyRange>,
}

/// Admin list filter. `from` and `to` are inclusive calendar days (UTC).
#[derive(Debug, Clone, Default, Deserialize)]
pub struct LeadFilter {
    pub status: Option<LeadStatus>,
    /// Substring matched against name, email and company
    #[serde(rename = "q")]
    pub search: Option<String>,
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
}
