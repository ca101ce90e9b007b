//! Account service, the application-layer orchestration
//!
//! All account business logic lives here. HTTP handlers are thin
//! wrappers that delegate to this service.

use std::sync::Arc;

use tracing::{debug, info};

use crate::domain::user::{MSG_EMAIL_TAKEN, MSG_USERNAME_TAKEN};
use crate::domain::{
    AuthToken, CreateUserDto, DomainError, DomainResult, FieldError, TokenRepositoryInterface,
    UpdateUserDto, User, UserRepositoryInterface,
};
use crate::infrastructure::crypto::{hash_password, verify_against_dummy, verify_password};

const MSG_BLANK: &str = "This field may not be blank.";
const MSG_BAD_EMAIL: &str = "Enter a valid email address.";
const MSG_NO_PERMISSION: &str = "You do not have permission to view this user";

/// Partial profile update with the password still in plaintext; the
/// service hashes it before anything is stored.
#[derive(Debug, Clone, Default)]
pub struct UpdateAccountDto {
    pub username: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
}

/// Registration, login and owner-gated profile management over
/// injected stores.
///
/// Holds both repositories as trait objects so the same service type
/// runs against SeaORM in production and the in-memory store in tests.
pub struct AccountService {
    users: Arc<dyn UserRepositoryInterface>,
    tokens: Arc<dyn TokenRepositoryInterface>,
}

impl AccountService {
    pub fn new(
        users: Arc<dyn UserRepositoryInterface>,
        tokens: Arc<dyn TokenRepositoryInterface>,
    ) -> Self {
        Self { users, tokens }
    }

    // ── Registration ────────────────────────────────────────────

    /// Create a new account. Collects every field problem before
    /// failing, so one response can report username and email issues
    /// together.
    pub async fn register(
        &self,
        username: &str,
        email: &str,
        password: &str,
    ) -> DomainResult<User> {
        let mut errors = Vec::new();

        if username.is_empty() {
            errors.push(FieldError::new("username", MSG_BLANK));
        } else if self.users.get_user_by_username(username).await?.is_some() {
            errors.push(FieldError::new("username", MSG_USERNAME_TAKEN));
        }

        if !email.contains('@') {
            errors.push(FieldError::new("email", MSG_BAD_EMAIL));
        } else if self.users.get_user_by_email(email).await?.is_some() {
            errors.push(FieldError::new("email", MSG_EMAIL_TAKEN));
        }

        if password.is_empty() {
            errors.push(FieldError::new("password", MSG_BLANK));
        }

        if !errors.is_empty() {
            return Err(DomainError::Validation(errors));
        }

        let password_hash = hash_password(password)
            .map_err(|e| DomainError::Storage(format!("Failed to hash password: {}", e)))?;

        let user = self
            .users
            .create_user(CreateUserDto {
                username: username.to_string(),
                email: email.to_string(),
                password_hash,
            })
            .await?;

        info!(user_id = user.id, username = %user.username, "New account registered");
        Ok(user)
    }

    // ── Authentication ──────────────────────────────────────────

    /// Verify credentials and return the account's token, minting it
    /// on first login and reusing it afterwards.
    ///
    /// Unknown username and wrong password return the same NotFound
    /// value, and the unknown-username path still pays one bcrypt
    /// verification, so the two failures can't be told apart by body
    /// or by timing.
    pub async fn authenticate(&self, username: &str, password: &str) -> DomainResult<AuthToken> {
        let user = self.users.get_user_by_username(username).await?;

        let Some(user) = user else {
            verify_against_dummy(password);
            return Err(DomainError::not_found("user"));
        };

        let valid = verify_password(password, &user.password_hash).unwrap_or(false);
        if !valid {
            return Err(DomainError::not_found("user"));
        }

        let token = self.tokens.issue_or_get(user.id).await?;
        debug!(user_id = user.id, "Login token issued");
        Ok(token)
    }

    // ── Queries ─────────────────────────────────────────────────

    /// All accounts in id order. Callers project away the hash before
    /// anything leaves the process.
    pub async fn list_users(&self) -> DomainResult<Vec<User>> {
        self.users.list_users().await
    }

    /// Resolve a bearer key to its owner. `None` when the key is
    /// unknown, including keys whose account has been deleted.
    pub async fn resolve_token(&self, key: &str) -> DomainResult<Option<User>> {
        let Some(token) = self.tokens.resolve(key).await? else {
            return Ok(None);
        };
        self.users.get_user_by_id(token.user_id).await
    }

    // ── Commands (mutations) ────────────────────────────────────

    /// Apply a partial update to the caller's own account.
    pub async fn update_user(
        &self,
        id: i64,
        caller_id: i64,
        changes: UpdateAccountDto,
    ) -> DomainResult<User> {
        let target = self
            .users
            .get_user_by_id(id)
            .await?
            .ok_or_else(|| DomainError::not_found("user"))?;

        // Existence is answered before ownership: a stranger probing a
        // missing id gets the same 404 the owner would.
        if !owns(caller_id, &target) {
            return Err(DomainError::Forbidden(MSG_NO_PERMISSION.to_string()));
        }

        let mut errors = Vec::new();

        if let Some(ref username) = changes.username {
            if username.is_empty() {
                errors.push(FieldError::new("username", MSG_BLANK));
            } else if *username != target.username
                && self.users.get_user_by_username(username).await?.is_some()
            {
                errors.push(FieldError::new("username", MSG_USERNAME_TAKEN));
            }
        }

        if let Some(ref email) = changes.email {
            if !email.contains('@') {
                errors.push(FieldError::new("email", MSG_BAD_EMAIL));
            } else if *email != target.email
                && self.users.get_user_by_email(email).await?.is_some()
            {
                errors.push(FieldError::new("email", MSG_EMAIL_TAKEN));
            }
        }

        if let Some(ref password) = changes.password {
            if password.is_empty() {
                errors.push(FieldError::new("password", MSG_BLANK));
            }
        }

        if !errors.is_empty() {
            return Err(DomainError::Validation(errors));
        }

        let password_hash = match changes.password {
            Some(ref password) => Some(
                hash_password(password).map_err(|e| {
                    DomainError::Storage(format!("Failed to hash password: {}", e))
                })?,
            ),
            None => None,
        };

        let dto = UpdateUserDto {
            username: changes.username,
            email: changes.email,
            password_hash,
        };

        let updated = self
            .users
            .update_user(id, dto)
            .await?
            .ok_or_else(|| DomainError::not_found("user"))?;

        info!(user_id = updated.id, "Account updated");
        Ok(updated)
    }

    /// Delete the caller's own account; its token goes with it.
    pub async fn delete_user(&self, id: i64, caller_id: i64) -> DomainResult<()> {
        let target = self
            .users
            .get_user_by_id(id)
            .await?
            .ok_or_else(|| DomainError::not_found("user"))?;

        if !owns(caller_id, &target) {
            return Err(DomainError::Forbidden(MSG_NO_PERMISSION.to_string()));
        }

        self.users.delete_user(id).await?;

        info!(user_id = id, "Account deleted");
        Ok(())
    }
}

/// The one ownership rule: an account may only be modified by itself.
fn owns(caller_id: i64, target: &User) -> bool {
    caller_id == target.id
}
