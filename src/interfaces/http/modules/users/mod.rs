//! Users module: public listing, owner-only update and delete

pub mod dto;
pub mod handlers;

pub use dto::*;
pub use handlers::*;
