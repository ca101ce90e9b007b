use chrono::{DateTime, Utc};

/// A registered account.
///
/// Carries no `Serialize` impl: the only shape that leaves the HTTP
/// layer is the public projection DTO, which never carries
/// `password_hash`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    /// Numeric identity, assigned by the store at creation and never
    /// reused or changed afterwards.
    pub id: i64,
    pub username: String,
    pub email: String,
    /// Salted one-way bcrypt hash. The plaintext password is never
    /// stored.
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
