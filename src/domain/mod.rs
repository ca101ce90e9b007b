//! Domain layer - entities, DTOs, repository interfaces and errors

pub mod error;
pub mod token;
pub mod user;

// Re-export commonly used types
pub use error::{DomainError, DomainResult, FieldError};
pub use token::{AuthToken, TokenRepositoryInterface};
pub use user::{CreateUserDto, UpdateUserDto, User, UserRepositoryInterface};
