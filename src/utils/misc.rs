use lazy_static::lazy_static;
use rand::{rngs::OsRng, thread_rng, Rng};
use regex::Regex;
use sha2::{Digest, Sha256};
use std::time::{SystemTime, UNIX_EPOCH};

use crate::constants::*;

lazy_static! {
    static ref EMAIL_REGEX: Regex =
        Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email regex must compile");
}

/// Get EPOCH timestamp in seconds
pub fn get_epoch_ts() -> u64 {
    match SystemTime::now().duration_since(UNIX_EPOCH) {
        Ok(n) => n.as_secs(),
        Err(_) => panic!("SystemTime before UNIX EPOCH!"),
    }
}

/// Generate a numeric OTP, uniform over the configured range
pub fn generate_otp() -> String {
    OsRng.gen_range(OTP_MIN_VALUE..=OTP_MAX_VALUE).to_string()
}

/// One-way digest of an OTP, hex encoded
pub fn hash_code(code: &str) -> String {
    format!("{:x}", Sha256::digest(code.as_bytes()))
}

/// Lower-case and trim an email so it can be used as a lookup key
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

pub fn is_valid_email(email: &str) -> bool {
    EMAIL_REGEX.is_match(email)
}

/// Strip any directory prefix from an archive entry name
pub fn base_file_name(path: &str) -> &str {
    path.rsplit(|ch| ch == '/' || ch == '\\')
        .next()
        .unwrap_or(path)
}

/// Returns true when the name ends with one of the accepted image extensions
pub fn has_image_extension(file_name: &str) -> bool {
    let Some((_, ext)) = file_name.rsplit_once('.') else {
        return false;
    };
    let ext = ext.to_lowercase();
    IMAGE_EXTENSIONS.contains(&ext.as_str())
}

/// Build a unique, filesystem friendly name for an uploaded file
pub fn uniq_file_name(file_name: &str) -> String {
    let ts = get_epoch_ts();
    let random = thread_rng().gen_range(101..999);
    let (name, ext) = file_name.rsplit_once('.').unwrap_or((file_name, "unknown"));
    let name = name
        .chars()
        .map(|ch| if ch.is_ascii_alphanumeric() { ch } else { '_' })
        .collect::<String>();
    format!("{name}-{ts}_{random}.{ext}")
}
