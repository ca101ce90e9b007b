//! # Account Service
//!
//! Minimal user-account service: signup, login with opaque bearer
//! tokens, a public account listing, and owner-only profile updates.
//!
//! ## Architecture
//!
//! The project follows Clean Architecture principles:
//!
//! - **domain**: Core business entities, errors and repository traits
//! - **application**: Account business logic (registration, login, ownership rules)
//! - **infrastructure**: External concerns (SQLite via SeaORM, password hashing, in-memory store)
//! - **interfaces**: HTTP REST API with Swagger documentation

pub mod application;
pub mod config;
pub mod domain;
pub mod infrastructure;
pub mod interfaces;

pub use config::{default_config_path, AppConfig};

// Re-export database types for easy access
pub use infrastructure::{init_database, DatabaseConfig, InMemoryStore};

// Re-export the application service and HTTP router
pub use application::AccountService;
pub use interfaces::http::{create_router, AppState};
