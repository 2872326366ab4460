use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Default, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum RequestStatus {
    #[default]
    Pending,
    Rejected,
}

/// Someone asking to become an admin. Lives in the pending collection
/// until approved, or in the rejected collection until reinstated.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct AdminRequest {
    pub id: u32,
    pub name: String,
    pub email: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub password_hash: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub dob: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,

    pub status: RequestStatus,
    pub created_at: DateTime<Utc>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub rejected_by: Option<u32>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub rejected_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewAdminRequest {
    pub name: String,
    pub email: String,
    pub password_hash: Option<String>,
    pub dob: Option<String>,
    pub reason: Option<String>,
}

/// Request as shown to reviewing admins
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AdminRequestView {
    pub id: u32,
    pub name: String,
    pub email: String,
    pub dob: Option<String>,
    pub reason: Option<String>,
    pub status: RequestStatus,
    #[schema(value_type = String)]
    pub created_at: DateTime<Utc>,
    pub rejected_by: Option<u32>,
    #[schema(value_type = Option<String>)]
    pub rejected_at: Option<DateTime<Utc>>,
}

impl From<AdminRequest> for AdminRequestView {
    fn from(value: AdminRequest) -> Self {
        Self {
            id: value.id,
            name: value.name,
            email: value.email,
            dob: value.dob,
            reason: value.reason,
            status: value.status,
            created_at: value.created_at,
            rejected_by: value.rejected_by,
            rejected_at: value.rejected_at,
        }
    }
}
