use utoipa::{
    openapi::security::{Http, HttpAuthScheme, SecurityScheme},
    Modify, OpenApi,
};

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::handlers::root::default_route_handler,
        crate::handlers::root::ping_handler,
        crate::handlers::auth::otp::user_request_otp_handler,
        crate::handlers::auth::otp::user_verify_otp_handler,
        crate::handlers::auth::otp::admin_request_otp_handler,
        crate::handlers::auth::otp::admin_verify_otp_handler,
        crate::handlers::auth::signup::signup_handler,
        crate::handlers::auth::login::login_handler,
        crate::handlers::auth::login::admin_login_handler,
        crate::handlers::auth::profile::profile_handler,
        crate::handlers::auth::profile::update_profile_handler,
        crate::handlers::auth::profile::change_password_handler,
        crate::handlers::admin::signup_request::admin_signup_request_handler,
        crate::handlers::admin::requests::pending_requests_handler,
        crate::handlers::admin::requests::rejected_requests_handler,
        crate::handlers::admin::requests::approve_request_handler,
        crate::handlers::admin::requests::reject_request_handler,
        crate::handlers::admin::requests::reinstate_request_handler,
        crate::handlers::admin::manage::list_admins_handler,
        crate::handlers::admin::manage::toggle_status_handler,
        crate::handlers::admin::manage::activity_handler,
        crate::handlers::admin::manage::delete_admin_handler,
        crate::handlers::apple::get::get_all_apples_handler,
        crate::handlers::apple::get::get_apple_handler,
        crate::handlers::apple::get::search_apples_handler,
        crate::handlers::apple::create::single_upload_handler,
        crate::handlers::apple::update::update_apple_handler,
        crate::handlers::apple::delete::delete_apple_handler,
        crate::handlers::apple::bulk_import::bulk_import_preview_handler,
        crate::handlers::apple::bulk_import::bulk_import_handler,
    ),
    components(
        schemas(
            crate::models::RequestOtpReq,
            crate::models::VerifyOtpReq,
            crate::models::SignupReq,
            crate::models::LoginReq,
            crate::models::ChangePasswordReq,
            crate::models::UpdateProfileReq,
            crate::models::AdminSignupReq,
            crate::models::ToggleStatusReq,
            crate::models::AppleInput,
            crate::models::ApplePatch,
            crate::models::AppleUpdateInput,
            crate::models::OverrideEntry,

            crate::models::GenericResponse,
            crate::models::ErrorResponse,
            crate::models::AuthResponse,
            crate::models::ProfileResponse,
            crate::models::AppleResponse,
            crate::models::AppleListResponse,
            crate::models::AdminRequestsResponse,
            crate::models::AdminListResponse,
            crate::models::ActivityResponse,
            crate::models::ImportPreviewResponse,
            crate::models::ImportCommitResponse,

            crate::models::PrincipalKind,
            crate::models::PrincipalProfile,
            crate::models::ActivityEntry,
            crate::models::AdminRequestView,
            crate::models::RequestStatus,
            crate::models::Apple,
            crate::models::AppleDetails,
            crate::models::AppleStatus,
            crate::import::MatchReport,
            crate::import::MatchedRow,
            crate::import::RowSummary,
            crate::import::ImportReport,
            crate::import::ImportStats,
            crate::import::ImportFailure,
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Debugging API", description = "API for debugging purposes"),
        (name = "Auth API", description = "User signup and login"),
        (name = "Admin API", description = "Admin login, approval workflow and management"),
        (name = "Settings API", description = "Profile of the logged in account"),
        (name = "Apple API", description = "Apple catalog and bulk import")
    )
)]
pub struct ApiDoc;

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "authorization",
                SecurityScheme::Http(Http::new(HttpAuthScheme::Bearer)),
            )
        }
    }
}
