//! Authenticated identity and role tags.
//!
//! Identity fields come from credential claims whose names are a backend contract, so
//! every field is optional on the wire and gets a documented fallback here:
//!
//! - subject id: [`PLACEHOLDER_SUBJECT`] when the claim is absent
//! - username: empty string when absent
//! - role: `None` when absent or unrecognized, which grants no capabilities

use serde::{Deserialize, Deserializer, Serialize};
use std::{fmt, str::FromStr};

/// Subject id used when a credential carries no subject claim.
pub const PLACEHOLDER_SUBJECT: &str = "temp-id";

#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum Role {
    #[serde(rename = "admin")]
    Admin,
    #[serde(rename = "superadmin")]
    SuperAdmin,
}

impl Role {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Role::Admin => "admin",
            Role::SuperAdmin => "superadmin",
        }
    }

    /// Super-admin is a superset of admin.
    #[must_use]
    pub fn grants_admin(self) -> bool {
        matches!(self, Role::Admin | Role::SuperAdmin)
    }

    #[must_use]
    pub fn grants_super_admin(self) -> bool {
        self == Role::SuperAdmin
    }
}

impl fmt::Display for Role {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownRole(pub String);

impl fmt::Display for UnknownRole {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(formatter, "unknown role: {}", self.0)
    }
}

impl std::error::Error for UnknownRole {}

impl FromStr for Role {
    type Err = UnknownRole;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_lowercase().as_str() {
            "admin" => Ok(Role::Admin),
            "superadmin" => Ok(Role::SuperAdmin),
            other => Err(UnknownRole(other.to_string())),
        }
    }
}

/// Deserializes an optional role, mapping unknown tags to `None` instead of failing.
pub(crate) fn lenient_role<'de, D>(deserializer: D) -> Result<Option<Role>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<String> = Option::deserialize(deserializer)?;
    Ok(raw.and_then(|value| value.parse().ok()))
}

/// The authenticated user as persisted in the durable identity record.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct Identity {
    #[serde(rename = "_id")]
    pub id: String,
    #[serde(default)]
    pub username: String,
    #[serde(default, deserialize_with = "lenient_role")]
    pub role: Option<Role>,
}

impl Identity {
    #[must_use]
    pub fn new(id: Option<String>, username: Option<String>, role: Option<Role>) -> Self {
        Self {
            id: id
                .filter(|id| !id.trim().is_empty())
                .unwrap_or_else(|| PLACEHOLDER_SUBJECT.to_string()),
            username: username.unwrap_or_default(),
            role,
        }
    }

    #[must_use]
    pub fn is_admin(&self) -> bool {
        self.role.is_some_and(Role::grants_admin)
    }

    #[must_use]
    pub fn is_super_admin(&self) -> bool {
        self.role.is_some_and(Role::grants_super_admin)
    }
}
