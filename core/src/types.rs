//! Domain types for the white-label API.
//!
//! # Design
//! `Provider` turns the provider whitelist into a closed enum; string input
//! is validated through `FromStr`. `Verification` is the optional set of
//! probes sent with `CommitPartnerJob`. Anything implementing `Export` can
//! stand in for it, since the request only needs a plain JSON object.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::warn;

use crate::error::LenddoError;

/// Social networks accepted by `PartnerToken`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Provider {
    Facebook,
    LinkedIn,
    Yahoo,
    WindowsLive,
    Google,
}

impl Provider {
    pub const ALL: [Provider; 5] = [
        Provider::Facebook,
        Provider::LinkedIn,
        Provider::Yahoo,
        Provider::WindowsLive,
        Provider::Google,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Provider::Facebook => "Facebook",
            Provider::LinkedIn => "LinkedIn",
            Provider::Yahoo => "Yahoo",
            Provider::WindowsLive => "WindowsLive",
            Provider::Google => "Google",
        }
    }
}

impl fmt::Display for Provider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Provider {
    type Err = LenddoError;

    /// Exact, case-sensitive match against the whitelist.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Provider::ALL
            .into_iter()
            .find(|p| p.as_str() == s)
            .ok_or_else(|| {
                let valid = Provider::ALL.map(|p| p.as_str()).join(", ");
                LenddoError::InvalidArgument(format!("provider must be one of the following: {valid}"))
            })
    }
}

/// Export to the plain JSON object embedded in a request payload.
pub trait Export {
    fn export(&self) -> Map<String, Value>;
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Name {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub first: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub middle: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmploymentPeriod {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_date: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Address {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub line_1: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub line_2: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub administrative_division: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub country_code: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub postal_code: Option<String>,
}

/// Probes to verify the applicant against. Unset probes are omitted from
/// the exported object.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Verification {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<Name>,
    /// `YYYY-MM-DD`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date_of_birth: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub employer: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mobile_phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub university: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub employment_period: Option<EmploymentPeriod>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<Address>,
}

impl Verification {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn name(mut self, first: &str, middle: Option<&str>, last: &str) -> Self {
        self.name = Some(Name {
            first: Some(first.to_string()),
            middle: middle.map(str::to_string),
            last: Some(last.to_string()),
        });
        self
    }

    pub fn date_of_birth(mut self, date: &str) -> Self {
        self.date_of_birth = Some(date.to_string());
        self
    }

    pub fn employer(mut self, employer: &str) -> Self {
        self.employer = Some(employer.to_string());
        self
    }

    pub fn mobile_phone(mut self, phone: &str) -> Self {
        self.mobile_phone = Some(phone.to_string());
        self
    }

    pub fn university(mut self, university: &str) -> Self {
        self.university = Some(university.to_string());
        self
    }

    pub fn email(mut self, email: &str) -> Self {
        self.email = Some(email.to_string());
        self
    }

    pub fn employment_period(mut self, start_date: &str, end_date: Option<&str>) -> Self {
        self.employment_period = Some(EmploymentPeriod {
            start_date: Some(start_date.to_string()),
            end_date: end_date.map(str::to_string),
        });
        self
    }

    pub fn address(mut self, address: Address) -> Self {
        self.address = Some(address);
        self
    }
}

impl Export for Verification {
    fn export(&self) -> Map<String, Value> {
        match serde_json::to_value(self) {
            Ok(Value::Object(map)) => map,
            other => {
                debug_assert!(false, "verification did not serialize to an object: {other:?}");
                warn!(?other, "verification did not serialize to an object; sending none");
                Map::new()
            }
        }
    }
}
