//! PostgreSQL implementation of ResetTokenRepository.
//!
//! `consume_and_apply` runs the used-flag flip and the credential update
//! in one transaction. Two concurrent consumers of the same token race
//! on `used = false`; the loser's update touches zero rows and the
//! whole attempt rolls back.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use crate::domain::account::PasswordResetToken;
use crate::domain::foundation::{AccountId, DomainError, ErrorCode, Timestamp, TokenId};
use crate::ports::ResetTokenRepository;

/// PostgreSQL implementation of the ResetTokenRepository port.
pub struct PostgresResetTokenRepository {
    pool: PgPool,
}

impl PostgresResetTokenRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, sqlx::FromRow)]
struct ResetTokenRow {
    id: Uuid,
    account_id: Uuid,
    token: String,
    expires_at: DateTime<Utc>,
    used: bool,
    created_at: DateTime<Utc>,
}

impl From<ResetTokenRow> for PasswordResetToken {
    fn from(row: ResetTokenRow) -> Self {
        PasswordResetToken {
            id: TokenId::from_uuid(row.id),
            account_id: AccountId::from_uuid(row.account_id),
            token: row.token,
            expires_at: Timestamp::from_datetime(row.expires_at),
            used: row.used,
            created_at: Timestamp::from_datetime(row.created_at),
        }
    }
}

#[async_trait]
impl ResetTokenRepository for PostgresResetTokenRepository {
    async fn save(&self, token: &PasswordResetToken) -> Result<(), DomainError> {
        sqlx::query(
            r#"
            INSERT INTO password_reset_tokens (id, account_id, token, expires_at, used, created_at)
            VALUES ($1, $2, $3, $4, $5, $6)
            "#,
        )
        .bind(token.id.as_uuid())
        .bind(token.account_id.as_uuid())
        .bind(&token.token)
        .bind(token.expires_at.as_datetime())
        .bind(token.used)
        .bind(token.created_at.as_datetime())
        .execute(&self.pool)
        .await
        .map_err(|e| {
            DomainError::new(ErrorCode::DatabaseError, format!("Failed to save reset token: {}", e))
        })?;

        Ok(())
    }

    async fn find_by_token(&self, token: &str) -> Result<Option<PasswordResetToken>, DomainError> {
        let row: Option<ResetTokenRow> = sqlx::query_as(
            r#"
            SELECT id, account_id, token, expires_at, used, created_at
            FROM password_reset_tokens
            WHERE token = $1
            "#,
        )
        .bind(token)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            DomainError::new(ErrorCode::DatabaseError, format!("Failed to find reset token: {}", e))
        })?;

        Ok(row.map(PasswordResetToken::from))
    }

    async fn consume_and_apply(
        &self,
        token_id: &TokenId,
        account_id: &AccountId,
        new_password_hash: &str,
    ) -> Result<(), DomainError> {
        let mut tx = self.pool.begin().await.map_err(|e| {
            DomainError::new(ErrorCode::DatabaseError, format!("Failed to begin transaction: {}", e))
        })?;

        let consumed = sqlx::query(
            r#"
            UPDATE password_reset_tokens SET used = true
            WHERE id = $1 AND used = false
            "#,
        )
        .bind(token_id.as_uuid())
        .execute(&mut *tx)
        .await
        .map_err(|e| {
            DomainError::new(ErrorCode::DatabaseError, format!("Failed to consume token: {}", e))
        })?;

        if consumed.rows_affected() == 0 {
            return Err(DomainError::new(
                ErrorCode::TokenInvalid,
                "Token already used or unknown",
            ));
        }

        let applied = sqlx::query(
            r#"
            UPDATE identities SET password_hash = $2, updated_at = now()
            WHERE id = $1
            "#,
        )
        .bind(account_id.as_uuid())
        .bind(new_password_hash)
        .execute(&mut *tx)
        .await
        .map_err(|e| {
            DomainError::new(ErrorCode::DatabaseError, format!("Failed to apply new credential: {}", e))
        })?;

        if applied.rows_affected() == 0 {
            return Err(DomainError::new(
                ErrorCode::AccountNotFound,
                "Account for token no longer exists",
            ));
        }

        tx.commit().await.map_err(|e| {
            DomainError::new(ErrorCode::DatabaseError, format!("Failed to commit reset: {}", e))
        })?;

        Ok(())
    }
}
