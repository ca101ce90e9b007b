//! Credential primitives - password hashing and token key generation

pub mod password;
pub mod token_key;

pub use password::{hash_password, verify_against_dummy, verify_password};
pub use token_key::generate_key;
