//! Token aggregate
//!
//! One opaque bearer token per user, issued lazily on first login.

pub mod model;
pub mod repository;

pub use model::AuthToken;
pub use repository::TokenRepositoryInterface;
