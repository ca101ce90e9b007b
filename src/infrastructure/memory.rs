//! In-memory store for development and testing

use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::Utc;
use dashmap::DashMap;

use crate::domain::user::{MSG_EMAIL_TAKEN, MSG_USERNAME_TAKEN};
use crate::domain::{
    AuthToken, CreateUserDto, DomainError, DomainResult, TokenRepositoryInterface, UpdateUserDto,
    User, UserRepositoryInterface,
};
use crate::infrastructure::crypto::generate_key;

/// DashMap-backed store implementing both repository interfaces, so a
/// single instance can be handed to the service as users and tokens at
/// once. Mirrors the persistent store's behavior: unique usernames and
/// emails, one token per user, token removal on user delete.
pub struct InMemoryStore {
    users: DashMap<i64, User>,
    tokens_by_user: DashMap<i64, AuthToken>,
    tokens_by_key: DashMap<String, AuthToken>,
    user_counter: AtomicI64,
    /// Serializes the uniqueness scan with the write that follows it;
    /// DashMap cannot make that pair atomic on its own.
    write_lock: Mutex<()>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self {
            users: DashMap::new(),
            tokens_by_user: DashMap::new(),
            tokens_by_key: DashMap::new(),
            user_counter: AtomicI64::new(1),
            write_lock: Mutex::new(()),
        }
    }

    fn username_taken(&self, username: &str, exclude_id: Option<i64>) -> bool {
        self.users
            .iter()
            .any(|u| Some(u.id) != exclude_id && u.username == username)
    }

    fn email_taken(&self, email: &str, exclude_id: Option<i64>) -> bool {
        self.users
            .iter()
            .any(|u| Some(u.id) != exclude_id && u.email == email)
    }
}

impl Default for InMemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl UserRepositoryInterface for InMemoryStore {
    async fn create_user(&self, dto: CreateUserDto) -> DomainResult<User> {
        let _guard = self.write_lock.lock().unwrap_or_else(|e| e.into_inner());

        if self.username_taken(&dto.username, None) {
            return Err(DomainError::validation("username", MSG_USERNAME_TAKEN));
        }
        if self.email_taken(&dto.email, None) {
            return Err(DomainError::validation("email", MSG_EMAIL_TAKEN));
        }

        let now = Utc::now();
        let id = self.user_counter.fetch_add(1, Ordering::SeqCst);
        let user = User {
            id,
            username: dto.username,
            email: dto.email,
            password_hash: dto.password_hash,
            created_at: now,
            updated_at: now,
        };
        self.users.insert(id, user.clone());

        Ok(user)
    }

    async fn list_users(&self) -> DomainResult<Vec<User>> {
        let mut users: Vec<User> = self.users.iter().map(|u| u.clone()).collect();
        users.sort_by_key(|u| u.id);
        Ok(users)
    }

    async fn get_user_by_id(&self, id: i64) -> DomainResult<Option<User>> {
        Ok(self.users.get(&id).map(|u| u.clone()))
    }

    async fn get_user_by_username(&self, username: &str) -> DomainResult<Option<User>> {
        Ok(self
            .users
            .iter()
            .find(|u| u.username == username)
            .map(|u| u.clone()))
    }

    async fn get_user_by_email(&self, email: &str) -> DomainResult<Option<User>> {
        Ok(self
            .users
            .iter()
            .find(|u| u.email == email)
            .map(|u| u.clone()))
    }

    async fn update_user(&self, id: i64, dto: UpdateUserDto) -> DomainResult<Option<User>> {
        let _guard = self.write_lock.lock().unwrap_or_else(|e| e.into_inner());

        if !self.users.contains_key(&id) {
            return Ok(None);
        }

        // Check against other rows before taking the entry guard;
        // iterating while holding it could deadlock on a shard.
        if let Some(ref username) = dto.username {
            if self.username_taken(username, Some(id)) {
                return Err(DomainError::validation("username", MSG_USERNAME_TAKEN));
            }
        }
        if let Some(ref email) = dto.email {
            if self.email_taken(email, Some(id)) {
                return Err(DomainError::validation("email", MSG_EMAIL_TAKEN));
            }
        }

        let Some(mut user) = self.users.get_mut(&id) else {
            return Ok(None);
        };
        if let Some(username) = dto.username {
            user.username = username;
        }
        if let Some(email) = dto.email {
            user.email = email;
        }
        if let Some(password_hash) = dto.password_hash {
            user.password_hash = password_hash;
        }
        user.updated_at = Utc::now();

        Ok(Some(user.clone()))
    }

    async fn delete_user(&self, id: i64) -> DomainResult<()> {
        if self.users.remove(&id).is_none() {
            return Err(DomainError::not_found("user"));
        }

        // Cascade: the user's token dies with the account.
        if let Some((_, token)) = self.tokens_by_user.remove(&id) {
            self.tokens_by_key.remove(&token.key);
        }

        Ok(())
    }
}

#[async_trait]
impl TokenRepositoryInterface for InMemoryStore {
    async fn issue_or_get(&self, user_id: i64) -> DomainResult<AuthToken> {
        // entry() makes mint-or-reuse atomic per user id.
        let token = self
            .tokens_by_user
            .entry(user_id)
            .or_insert_with(|| AuthToken {
                key: generate_key(),
                user_id,
                created_at: Utc::now(),
            })
            .clone();

        // Same value on every call, so re-inserting the mirror is harmless.
        self.tokens_by_key.insert(token.key.clone(), token.clone());

        Ok(token)
    }

    async fn resolve(&self, key: &str) -> DomainResult<Option<AuthToken>> {
        Ok(self.tokens_by_key.get(key).map(|t| t.clone()))
    }
}
