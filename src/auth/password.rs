//! Password digests
//!
//! Front ends hash passwords with a 32-bit rolling hash (`31 * h + c` over
//! UTF-16 code units, wrapped to a signed 32-bit integer and stringified).
//! Stored digests in that format stay verifiable; digests in bcrypt's `$2*$`
//! format are verified with bcrypt instead.

use bcrypt::{hash, verify, DEFAULT_COST};

/// Compute the legacy rolling-hash digest of a string
pub fn legacy_hash(input: &str) -> String {
    let mut hash: i32 = 0;
    for unit in input.encode_utf16() {
        hash = hash.wrapping_mul(31).wrapping_add(i32::from(unit));
    }
    hash.to_string()
}

/// Hash a password with bcrypt
pub fn hash_password_bcrypt(password: &str) -> Result<String, bcrypt::BcryptError> {
    hash(password, DEFAULT_COST)
}

fn is_bcrypt_digest(digest: &str) -> bool {
    digest.starts_with("$2")
}

/// Check a plaintext password against a stored digest of either format
pub fn verify_password(password: &str, stored: &str) -> bool {
    if is_bcrypt_digest(stored) {
        match verify(password, stored) {
            Ok(valid) => valid,
            Err(e) => {
                tracing::warn!(error = %e, "Malformed bcrypt digest");
                false
            }
        }
    } else {
        legacy_hash(password) == stored
    }
}
