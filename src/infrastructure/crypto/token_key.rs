//! Bearer token key generation

use rand::Rng;

/// Random bytes per key; hex-encodes to 40 chars.
const TOKEN_KEY_BYTES: usize = 20;

/// Generate a fresh opaque token key.
///
/// The key carries no structure: 40 lowercase hex chars from the
/// thread-local CSPRNG. Uniqueness is enforced by the store's primary
/// key, not by this function.
pub fn generate_key() -> String {
    let mut rng = rand::thread_rng();
    let random_bytes: [u8; TOKEN_KEY_BYTES] = rng.gen();
    hex::encode(random_bytes)
}
