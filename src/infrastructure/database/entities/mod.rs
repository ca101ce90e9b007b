//! Database entities module

pub mod token;
pub mod user;

pub use token::Entity as Token;
pub use user::Entity as User;
