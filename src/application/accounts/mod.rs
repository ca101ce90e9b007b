//! Accounts module: registration, login, profile management
//!
//! Contains the `AccountService` which orchestrates all account
//! use-cases: signup, login, listing, updates and deletion.

pub mod service;

pub use service::{AccountService, UpdateAccountDto};
