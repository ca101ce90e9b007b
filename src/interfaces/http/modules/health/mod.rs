//! Health module: liveness reporting

pub mod handlers;

pub use handlers::*;
