use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Primary key of an account. Distinct from row ids so owner-scoped calls can't mix them up.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AccountId(pub i64);

impl fmt::Display for AccountId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A registered account. `password_hash` is an Argon2 PHC string, never plaintext.
#[derive(Debug, Clone)]
pub struct Account {
    pub id: AccountId,
    pub username: String,
    pub password_hash: String,
    pub is_active: bool,
    pub date_joined: DateTime<Utc>,
}

/// DTO for inserting a new account.
#[derive(Debug, Clone)]
pub struct NewAccount {
    pub username: String,
    pub password_hash: String,
}

/// A physical structure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Building {
    pub id: i64,
    pub name: String,
    pub location: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewBuilding {
    pub name: String,
    pub location: Option<String>,
}

/// Physical Location Descriptor: an entrance or access point of one building.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Pld {
    pub id: i64,
    pub label: String,
    pub building: i64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewPld {
    pub label: String,
    pub building: i64,
}

/// Accessibility metadata owned by one account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UserProfile {
    pub id: i64,
    pub user: AccountId,
    pub disability_type: String,
}

/// Writable part of a profile. The owner is never part of the payload;
/// store calls take it as a separate argument.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewUserProfile {
    pub disability_type: String,
}
