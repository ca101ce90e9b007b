//! User aggregate
//!
//! Contains the User entity, DTOs, and repository interface.

pub mod model;
pub mod repository;

/// Canonical uniqueness-violation messages. The service pre-checks and
/// the stores' constraint backstops must emit the same text, so both
/// pull from here. The two differ: the username message names the
/// clash, the email one is the generic unique-field wording.
pub const MSG_USERNAME_TAKEN: &str = "A user with that username already exists.";
pub const MSG_EMAIL_TAKEN: &str = "This field must be unique.";

mod dto_create;
mod dto_update;

// Re-export model types
pub use model::User;

// Re-export DTOs
pub use dto_create::CreateUserDto;
pub use dto_update::UpdateUserDto;

// Re-export repository trait
pub use repository::UserRepositoryInterface;
