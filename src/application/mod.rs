//! Application layer - use-case orchestration

pub mod accounts;

pub use accounts::{AccountService, UpdateAccountDto};
