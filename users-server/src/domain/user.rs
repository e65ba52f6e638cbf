use chrono::{DateTime, Utc};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::domain::error::ValidationError;

static EMAIL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("valid email regex"));

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct User {
    pub id: i32,
    #[serde(rename = "nombre")]
    #[sqlx(rename = "nombre")]
    pub name: String,
    pub email: String,
    #[serde(rename = "telefono")]
    #[sqlx(rename = "telefono")]
    pub phone: String,
    #[serde(rename = "fecha_creacion")]
    #[sqlx(rename = "fecha_creacion")]
    pub created_at: DateTime<Utc>,
}

/// Fields accepted for a new record, already trimmed and validated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewUser {
    pub name: String,
    pub email: String,
    pub phone: String,
}

impl NewUser {
    /// Trims the raw fields and applies the create-time checks in order:
    /// every field present and non-empty, then the email shape.
    pub fn parse(
        name: Option<&str>,
        email: Option<&str>,
        phone: Option<&str>,
    ) -> Result<Self, ValidationError> {
        let (name, email, phone) = match (trimmed(name), trimmed(email), trimmed(phone)) {
            (Some(name), Some(email), Some(phone)) => (name, email, phone),
            _ => return Err(ValidationError::MissingFields),
        };

        if !is_valid_email(email) {
            return Err(ValidationError::InvalidEmail);
        }

        Ok(Self {
            name: name.to_owned(),
            email: email.to_owned(),
            phone: phone.to_owned(),
        })
    }
}

/// Summary returned after a record has been removed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct DeletedUser {
    pub id: i32,
    #[serde(rename = "nombre")]
    #[sqlx(rename = "nombre")]
    pub name: String,
}

impl From<&User> for DeletedUser {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            name: user.name.clone(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UserStats {
    pub total: i64,
    pub recent: i64,
}

pub fn is_valid_email(email: &str) -> bool {
    EMAIL_RE.is_match(email)
}

fn trimmed(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}
