//! HTTP REST API interfaces
//!
//! - `common`: Shared extractors (validated JSON)
//! - `error`: Domain error to HTTP response mapping
//! - `middleware`: Bearer token authentication middleware
//! - `modules`: Handlers and DTOs grouped by resource
//! - `router`: API router with Swagger documentation

pub mod common;
pub mod error;
pub mod middleware;
pub mod modules;
pub mod router;

pub use router::{create_router, AppState};
