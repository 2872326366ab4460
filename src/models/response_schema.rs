use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::import::{ImportReport, MatchReport};

use super::{ActivityEntry, AdminRequestView, Apple, PrincipalProfile};

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct GenericResponse {
    pub success: bool,
    pub message: String,
}

/// Error body used by login code verification
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ErrorResponse {
    pub success: bool,
    pub error: String,
}

/// response schema for every successful login
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct AuthResponse {
    pub success: bool,
    pub token: String,
    pub user: PrincipalProfile,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ProfileResponse {
    pub success: bool,
    pub user: PrincipalProfile,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct AppleResponse {
    pub success: bool,
    pub data: Apple,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct AppleListResponse {
    pub success: bool,
    pub data: Vec<Apple>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct AdminRequestsResponse {
    pub success: bool,
    pub data: Vec<AdminRequestView>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct AdminListResponse {
    pub success: bool,
    pub data: Vec<PrincipalProfile>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ActivityResponse {
    pub success: bool,
    pub data: Vec<ActivityEntry>,
}

/// response schema for the import preview
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ImportPreviewResponse {
    pub success: bool,
    pub data: MatchReport,
}

/// response schema for a committed import
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ImportCommitResponse {
    pub success: bool,
    pub data: ImportReport,
}
