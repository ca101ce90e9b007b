use async_trait::async_trait;

use super::{CreateUserDto, UpdateUserDto, User};
use crate::domain::DomainResult;

#[async_trait]
pub trait UserRepositoryInterface: Send + Sync {
    /// Persists a new account and returns it with its assigned id.
    /// A username or email collision surfaces as a field-level
    /// validation error.
    async fn create_user(&self, dto: CreateUserDto) -> DomainResult<User>;

    /// All accounts, ordered by ascending id.
    async fn list_users(&self) -> DomainResult<Vec<User>>;
    async fn get_user_by_id(&self, id: i64) -> DomainResult<Option<User>>;
    async fn get_user_by_username(&self, username: &str) -> DomainResult<Option<User>>;
    async fn get_user_by_email(&self, email: &str) -> DomainResult<Option<User>>;

    /// Applies the non-`None` fields of `dto`. Returns `None` when the
    /// user does not exist.
    async fn update_user(&self, id: i64, dto: UpdateUserDto) -> DomainResult<Option<User>>;

    /// Removes the account and everything attached to it, tokens
    /// included. Deleting a missing user is a `NotFound` error.
    async fn delete_user(&self, id: i64) -> DomainResult<()>;
}
