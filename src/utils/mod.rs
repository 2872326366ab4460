pub(crate) mod error_handler;
pub(crate) mod misc;
pub(crate) mod password;
pub(crate) mod sequence_generator;
pub(crate) mod validation;

pub use error_handler::AppError;
pub use misc::*;
pub use password::{hash_password, verify_password};
pub(crate) use sequence_generator::next_id;
pub use validation::ValidatedBody;
