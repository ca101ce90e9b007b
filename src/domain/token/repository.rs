use async_trait::async_trait;

use super::AuthToken;
use crate::domain::DomainResult;

#[async_trait]
pub trait TokenRepositoryInterface: Send + Sync {
    /// Returns the user's token, minting one the first time. Safe
    /// under concurrent calls for the same user: every caller observes
    /// the same key, never two.
    async fn issue_or_get(&self, user_id: i64) -> DomainResult<AuthToken>;

    /// Looks a token up by its key. `None` for unknown keys, including
    /// keys orphaned by a cascade delete.
    async fn resolve(&self, key: &str) -> DomainResult<Option<AuthToken>>;
}
