use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::constants::*;

use super::{AppleDetails, ApplePatch};

/// request body schema for requesting a login code.
/// A missing email is treated like a malformed one.
#[derive(Debug, Default, Deserialize, Validate, ToSchema)]
pub struct RequestOtpReq {
    #[serde(default)]
    pub email: String,
}

/// request body schema for verifying a login code
#[derive(Debug, Default, Deserialize, Validate, ToSchema)]
pub struct VerifyOtpReq {
    #[serde(default)]
    pub email: String,
    #[serde(default, alias = "otp")]
    pub code: String,
}

/// request body schema for user signup
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct SignupReq {
    #[validate(length(min = 1, max = 50))]
    pub name: String,

    #[validate(email)]
    pub email: String,

    #[validate(length(min = "PASSWORD_MIN_LEN"))]
    pub password: String,
}

/// request body schema for password login
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct LoginReq {
    #[validate(email)]
    pub email: String,

    #[validate(length(min = 1))]
    pub password: String,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ChangePasswordReq {
    #[validate(length(min = 1))]
    pub current_password: String,

    #[validate(length(min = "PASSWORD_MIN_LEN"))]
    pub new_password: String,
}

/// request body schema for a partial profile update, absent fields are kept
#[derive(Debug, Default, Deserialize, Validate, ToSchema)]
pub struct UpdateProfileReq {
    #[validate(length(max = 50))]
    pub name: Option<String>,

    pub email: Option<String>,

    pub dob: Option<String>,
}

/// request body schema for asking to become an admin
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct AdminSignupReq {
    #[validate(length(min = 1, max = 50))]
    pub name: String,

    #[validate(email)]
    pub email: String,

    #[validate(length(min = "PASSWORD_MIN_LEN"))]
    pub password: String,

    pub dob: Option<String>,

    #[validate(length(max = 500))]
    pub reason: Option<String>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ToggleStatusReq {
    pub is_active: bool,
}

/// JSON part of a single apple upload
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AppleInput {
    #[validate(length(min = 1, max = 200))]
    pub cultivar_name: String,

    #[serde(flatten)]
    pub details: AppleDetails,
}

/// Body of an apple update, sent as JSON or as the `appleData` part of a
/// multipart form next to new `images`
#[derive(Debug, Default, Clone, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AppleUpdateInput {
    #[serde(flatten)]
    #[validate]
    pub patch: ApplePatch,

    /// append uploaded images instead of replacing the current ones
    #[serde(default)]
    pub keep_existing_images: bool,

    /// images to keep when appending, defaults to the stored list
    pub existing_images: Option<Vec<String>>,
}

/// One manual pairing chosen while resolving an import
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct OverrideEntry {
    pub row_index: usize,
    pub image_key: String,
}
