use chrono::{DateTime, Utc};

/// An opaque bearer token tied to exactly one account.
///
/// The key is the credential itself: 40 lowercase hex chars, returned
/// verbatim on every login after the first. It carries no embedded
/// claims and expires only when its owner is deleted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthToken {
    pub key: String,
    pub user_id: i64,
    pub created_at: DateTime<Utc>,
}
