pub mod manage;
pub mod requests;
pub mod signup_request;
