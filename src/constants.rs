pub const REQUEST_TIMEOUT_SECS: u64 = 30;
pub const MONGO_MIN_POOL_SIZE: u32 = 5;
pub const MONGO_MAX_POOL_SIZE: u32 = 10;
pub const MONGO_CONN_TIMEOUT: u64 = 10;
pub const JWT_DEFAULT_EXPIRY_SECS: usize = 3600;

pub const OTP_LENGTH: u32 = 6;
pub const OTP_MIN_VALUE: u32 = 100_000;
pub const OTP_MAX_VALUE: u32 = 999_999;
pub const OTP_VALIDITY_SECS: u64 = 10 * 60;
pub const OTP_RESEND_COOLDOWN_SECS: u64 = 60;
pub const OTP_MAX_ATTEMPTS: u32 = 5;
pub const OTP_SWEEP_INTERVAL_SECS: u64 = 60;
pub const OTP_NOTIFY_TIMEOUT_SECS: u64 = 5;
pub const OTP_REQUEST_ACK: &str = "If this email exists, a login code has been sent.";
pub const OTP_INVALID_MSG: &str = "Invalid or expired code. Please try again.";
pub const OTP_TOO_MANY_ATTEMPTS_MSG: &str = "Too many failed attempts. Please request a new code.";
pub const OTP_MAIL_SUBJECT: &str = "Your Appleverse login code";

pub const PASSWORD_MIN_LEN: u64 = 6;
pub const SEARCH_RESULT_LIMIT: i64 = 50;
pub const ACTIVITY_LOG_LIMIT: i32 = 200;
pub const SINGLE_UPLOAD_MAX_IMAGES: usize = 10;
pub const MULTIPART_BODY_LIMIT: usize = 100 * 1024 * 1024;
pub const MAX_IMPORT_IMAGE_BYTES: u64 = 20 * 1024 * 1024;
pub const MAX_IMPORT_ARCHIVE_BYTES: u64 = 512 * 1024 * 1024;
pub const IMAGE_EXTENSIONS: [&str; 5] = ["jpg", "jpeg", "png", "gif", "bmp"];
pub const DEFAULT_IMAGE_DIR: &str = "images";
pub const IMAGE_URL_PREFIX: &str = "/images";
pub const AWS_REGION: &str = "ap-south-1";
pub const AWS_BUCKET: &str = "appleverse-images";

pub const DEFAULT_GENUS: &str = "Malus";
pub const DEFAULT_SPECIES: &str = "domestica";

pub const DB_NAME: &str = "appleverse";

pub const COLL_SEQUENCES: &str = "sequences";
pub const COLL_USERS: &str = "users";
pub const COLL_ADMINS: &str = "admins";
pub const COLL_PENDING_REQUESTS: &str = "pendingRequests";
pub const COLL_REJECTED_REQUESTS: &str = "rejectedRequests";
pub const COLL_APPLES: &str = "apples";

pub const USER_ID_SEQ: &str = "USER_ID_SEQ";
pub const ADMIN_ID_SEQ: &str = "ADMIN_ID_SEQ";
pub const REQUEST_ID_SEQ: &str = "REQUEST_ID_SEQ";
pub const APPLE_ID_SEQ: &str = "APPLE_ID_SEQ";
