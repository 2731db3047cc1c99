//! PostgreSQL implementation of IdentityStore.

use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use crate::domain::foundation::{AccountId, DomainError, EmailAddress, ErrorCode};
use crate::ports::{IdentityStore, NewIdentity};

/// PostgreSQL implementation of the IdentityStore port.
pub struct PostgresIdentityStore {
    pool: PgPool,
}

impl PostgresIdentityStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl IdentityStore for PostgresIdentityStore {
    async fn create_identity(&self, identity: &NewIdentity) -> Result<AccountId, DomainError> {
        let id = Uuid::new_v4();

        sqlx::query(
            r#"
            INSERT INTO identities (id, email, password_hash, created_at, updated_at)
            VALUES ($1, $2, $3, now(), now())
            "#,
        )
        .bind(id)
        .bind(identity.email.as_str())
        .bind(&identity.password_hash)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            if let sqlx::Error::Database(db_err) = &e {
                if db_err.constraint() == Some("identities_email_unique") {
                    return DomainError::new(
                        ErrorCode::DuplicateAccount,
                        "Email already registered",
                    );
                }
            }
            DomainError::new(ErrorCode::DatabaseError, format!("Failed to create identity: {}", e))
        })?;

        Ok(AccountId::from_uuid(id))
    }

    async fn delete_identity(&self, id: &AccountId) -> Result<(), DomainError> {
        // Compensation path: deleting an already-missing identity is Ok.
        sqlx::query("DELETE FROM identities WHERE id = $1")
            .bind(id.as_uuid())
            .execute(&self.pool)
            .await
            .map_err(|e| {
                DomainError::new(ErrorCode::DatabaseError, format!("Failed to delete identity: {}", e))
            })?;

        Ok(())
    }

    async fn update_identity(
        &self,
        id: &AccountId,
        email: Option<&EmailAddress>,
        password_hash: Option<&str>,
    ) -> Result<(), DomainError> {
        let result = sqlx::query(
            r#"
            UPDATE identities SET
                email = COALESCE($2, email),
                password_hash = COALESCE($3, password_hash),
                updated_at = now()
            WHERE id = $1
            "#,
        )
        .bind(id.as_uuid())
        .bind(email.map(EmailAddress::as_str))
        .bind(password_hash)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            DomainError::new(ErrorCode::DatabaseError, format!("Failed to update identity: {}", e))
        })?;

        if result.rows_affected() == 0 {
            return Err(DomainError::new(
                ErrorCode::AccountNotFound,
                "Identity not found",
            ));
        }

        Ok(())
    }
}
