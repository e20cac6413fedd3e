//! Data models for wallet accounts

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use utoipa::ToSchema;
use uuid::Uuid;

/// Account role
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    #[default]
    User,
    Admin,
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Role::User => write!(f, "user"),
            Role::Admin => write!(f, "admin"),
        }
    }
}

impl FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "user" => Ok(Role::User),
            "admin" => Ok(Role::Admin),
            _ => Err(format!("Invalid role: {}", s)),
        }
    }
}

/// Self-declared gender
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub enum Gender {
    Male,
    Female,
    Other,
}

impl fmt::Display for Gender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Gender::Male => write!(f, "Male"),
            Gender::Female => write!(f, "Female"),
            Gender::Other => write!(f, "Other"),
        }
    }
}

impl FromStr for Gender {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Male" => Ok(Gender::Male),
            "Female" => Ok(Gender::Female),
            "Other" => Ok(Gender::Other),
            _ => Err(format!("Invalid gender: {}", s)),
        }
    }
}

/// Pending password reset: the issued code and when it stops being valid.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResetCode {
    pub code: String,
    pub expires_at: DateTime<Utc>,
}

/// Wallet account as held by the store
#[derive(Debug, Clone)]
pub struct Account {
    pub id: Uuid,
    pub firstname: String,
    pub lastname: String,
    pub email: String,
    pub phone: String,
    pub password_hash: String,
    pub dob: Option<String>,
    pub gender: Option<Gender>,
    pub account_number: String,
    pub balance: Decimal,
    pub reset: Option<ResetCode>,
    pub role: Role,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Account {
    pub fn profile(&self) -> AccountProfile {
        AccountProfile {
            id: self.id,
            firstname: self.firstname.clone(),
            lastname: self.lastname.clone(),
            email: self.email.clone(),
            phone: self.phone.clone(),
            dob: self.dob.clone(),
            gender: self.gender,
            account_number: self.account_number.clone(),
            balance: self.balance,
        }
    }

    pub fn summary(&self) -> PartySummary {
        PartySummary {
            id: self.id,
            firstname: self.firstname.clone(),
            lastname: self.lastname.clone(),
            account_number: self.account_number.clone(),
        }
    }
}

/// Fields required to create an account. The store assigns id, balance and
/// timestamps.
#[derive(Debug, Clone)]
pub struct NewAccount {
    pub firstname: String,
    pub lastname: String,
    pub email: String,
    pub phone: String,
    pub password_hash: String,
    pub dob: Option<String>,
    pub gender: Option<Gender>,
    pub account_number: String,
}

/// Client-facing account view (never carries the password hash or reset code)
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AccountProfile {
    pub id: Uuid,
    pub firstname: String,
    pub lastname: String,
    pub email: String,
    pub phone: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dob: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gender: Option<Gender>,
    pub account_number: String,
    #[schema(value_type = String, example = "1000.00")]
    pub balance: Decimal,
}

/// Display attributes of a ledger party
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PartySummary {
    pub id: Uuid,
    pub firstname: String,
    pub lastname: String,
    pub account_number: String,
}
