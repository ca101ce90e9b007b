//! Password hashing utilities

use std::sync::OnceLock;

use bcrypt::{hash, verify, DEFAULT_COST};

/// Hash a password using bcrypt
pub fn hash_password(password: &str) -> Result<String, bcrypt::BcryptError> {
    hash(password, DEFAULT_COST)
}

/// Verify a password against a hash
pub fn verify_password(password: &str, hash: &str) -> Result<bool, bcrypt::BcryptError> {
    verify(password, hash)
}

/// Verify against a throwaway hash and discard the result.
///
/// Login runs this when no account matches the username, so the miss
/// path costs a bcrypt verification just like the hit path and the two
/// cannot be told apart by timing.
pub fn verify_against_dummy(password: &str) {
    static DUMMY_HASH: OnceLock<String> = OnceLock::new();
    let dummy = DUMMY_HASH.get_or_init(|| hash("no-such-account", DEFAULT_COST).unwrap_or_default());
    let _ = verify(password, dummy);
}
