pub mod admin_request;
pub mod apple;
pub mod principal;
pub mod request_schema;
pub mod response_schema;

pub use admin_request::*;
pub use apple::*;
pub use principal::*;
pub use request_schema::*;
pub use response_schema::*;
