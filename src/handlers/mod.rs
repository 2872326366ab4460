pub mod admin;
pub mod apple;
pub mod auth;
pub mod helper;
pub mod root;

pub use admin::manage::{
    activity_handler, delete_admin_handler, list_admins_handler, toggle_status_handler,
};
pub use admin::requests::{
    approve_request_handler, pending_requests_handler, reinstate_request_handler,
    reject_request_handler, rejected_requests_handler,
};
pub use admin::signup_request::admin_signup_request_handler;

pub use apple::bulk_import::{bulk_import_handler, bulk_import_preview_handler};
pub use apple::create::single_upload_handler;
pub use apple::delete::delete_apple_handler;
pub use apple::get::{get_all_apples_handler, get_apple_handler, search_apples_handler};
pub use apple::update::update_apple_handler;

pub use auth::login::{admin_login_handler, login_handler};
pub use auth::otp::{
    admin_request_otp_handler, admin_verify_otp_handler, user_request_otp_handler,
    user_verify_otp_handler,
};
pub use auth::profile::{change_password_handler, profile_handler, update_profile_handler};
pub use auth::signup::signup_handler;

pub use root::{default_route_handler, global_404_handler, ping_handler};
