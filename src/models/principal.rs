use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter, Result as FmtResult};
use utoipa::ToSchema;

/// The two kinds of accounts which can authenticate. Each kind has its own
/// collection and its own OTP namespace.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum PrincipalKind {
    User,
    Admin,
}

impl Display for PrincipalKind {
    fn fmt(&self, f: &mut Formatter) -> FmtResult {
        match self {
            Self::User => write!(f, "user"),
            Self::Admin => write!(f, "admin"),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, ToSchema)]
pub struct ActivityEntry {
    pub action: String,
    pub details: String,
    #[schema(value_type = String)]
    pub timestamp: DateTime<Utc>,
}

impl ActivityEntry {
    pub fn new(action: &str, details: impl Into<String>) -> Self {
        Self {
            action: action.to_owned(),
            details: details.into(),
            timestamp: Utc::now(),
        }
    }
}

/// Stored account document, shared by users and admins
#[derive(Debug, Default, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Principal {
    pub id: u32,
    pub name: String,
    pub email: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub password_hash: Option<String>,

    pub is_active: bool,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub dob: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_login_time: Option<u64>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_ts: Option<u64>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub approved_by: Option<u32>,

    #[serde(default)]
    pub activity_log: Vec<ActivityEntry>,
}

/// Fields needed to create a principal, the store assigns the id
#[derive(Debug, Clone, PartialEq)]
pub struct NewPrincipal {
    pub name: String,
    pub email: String,
    pub password_hash: Option<String>,
    pub role: Option<String>,
    pub dob: Option<String>,
    pub approved_by: Option<u32>,
}

/// Account fields a principal may change about itself
#[derive(Debug, Default, Clone, PartialEq)]
pub struct ProfilePatch {
    pub name: Option<String>,
    pub email: Option<String>,
    pub dob: Option<String>,
}

impl ProfilePatch {
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.email.is_none() && self.dob.is_none()
    }
}

/// Public view of a principal, never carries secrets
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PrincipalProfile {
    pub id: u32,
    pub name: String,
    pub email: String,
    pub is_active: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dob: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_login_time: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_ts: Option<u64>,
}

impl From<&Principal> for PrincipalProfile {
    fn from(value: &Principal) -> Self {
        Self {
            id: value.id,
            name: value.name.clone(),
            email: value.email.clone(),
            is_active: value.is_active,
            role: value.role.clone(),
            dob: value.dob.clone(),
            last_login_time: value.last_login_time,
            created_ts: value.created_ts,
        }
    }
}
