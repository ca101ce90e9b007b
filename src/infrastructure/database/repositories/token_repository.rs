use async_trait::async_trait;
use chrono::Utc;
use sea_orm::{ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, Set};

use crate::domain::{AuthToken, DomainError, DomainResult, TokenRepositoryInterface};
use crate::infrastructure::crypto::generate_key;
use crate::infrastructure::database::entities::token;

pub struct TokenRepository {
    db: DatabaseConnection,
}

impl TokenRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

// ── Conversion helpers ──────────────────────────────────────────

fn token_model_to_domain(model: token::Model) -> AuthToken {
    AuthToken {
        key: model.key,
        user_id: model.user_id,
        created_at: model.created_at,
    }
}

fn db_err(e: sea_orm::DbErr) -> DomainError {
    DomainError::Storage(e.to_string())
}

fn is_unique_violation(e: &sea_orm::DbErr) -> bool {
    let msg = e.to_string();
    msg.contains("UNIQUE") || msg.contains("duplicate")
}

// ── Repository implementation ───────────────────────────────────

#[async_trait]
impl TokenRepositoryInterface for TokenRepository {
    async fn issue_or_get(&self, user_id: i64) -> DomainResult<AuthToken> {
        if let Some(existing) = token::Entity::find()
            .filter(token::Column::UserId.eq(user_id))
            .one(&self.db)
            .await
            .map_err(db_err)?
        {
            return Ok(token_model_to_domain(existing));
        }

        let candidate = token::ActiveModel {
            key: Set(generate_key()),
            user_id: Set(user_id),
            created_at: Set(Utc::now()),
        };

        match candidate.insert(&self.db).await {
            Ok(inserted) => Ok(token_model_to_domain(inserted)),
            // Lost the first-login race on the unique user_id; the
            // winner's row is authoritative for everyone.
            Err(e) if is_unique_violation(&e) => token::Entity::find()
                .filter(token::Column::UserId.eq(user_id))
                .one(&self.db)
                .await
                .map_err(db_err)?
                .map(token_model_to_domain)
                .ok_or_else(|| {
                    DomainError::Storage("token row missing after unique violation".to_string())
                }),
            Err(e) => Err(db_err(e)),
        }
    }

    async fn resolve(&self, key: &str) -> DomainResult<Option<AuthToken>> {
        let model = token::Entity::find_by_id(key)
            .one(&self.db)
            .await
            .map_err(db_err)?;

        Ok(model.map(token_model_to_domain))
    }
}
