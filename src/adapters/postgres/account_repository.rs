//! PostgreSQL implementation of AccountRepository.
//!
//! An account spans two tables: `identities` (email, credential hash)
//! and `accounts` (profile, premium entitlement), sharing one id. The
//! webhook path inserts both in a single transaction so a duplicate
//! email leaves nothing behind.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use crate::domain::account::Account;
use crate::domain::foundation::{
    AccountId, DomainError, EmailAddress, ErrorCode, Timestamp,
};
use crate::ports::{AccountRepository, CreateOutcome};

/// PostgreSQL implementation of the AccountRepository port.
pub struct PostgresAccountRepository {
    pool: PgPool,
}

impl PostgresAccountRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

/// Joined row across `identities` and `accounts`.
#[derive(Debug, sqlx::FromRow)]
struct AccountRow {
    id: Uuid,
    email: String,
    password_hash: String,
    display_name: String,
    phone: Option<String>,
    premium: bool,
    premium_since: Option<DateTime<Utc>>,
    transaction_ref: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<AccountRow> for Account {
    type Error = DomainError;

    fn try_from(row: AccountRow) -> Result<Self, Self::Error> {
        let email = EmailAddress::new(&row.email).map_err(|e| {
            DomainError::new(ErrorCode::DatabaseError, format!("Invalid stored email: {}", e))
        })?;

        Ok(Account {
            id: AccountId::from_uuid(row.id),
            email,
            display_name: row.display_name,
            phone: row.phone,
            premium: row.premium,
            premium_since: row.premium_since.map(Timestamp::from_datetime),
            transaction_ref: row.transaction_ref,
            password_hash: row.password_hash,
            created_at: Timestamp::from_datetime(row.created_at),
            updated_at: Timestamp::from_datetime(row.updated_at),
        })
    }
}

const SELECT_ACCOUNT: &str = r#"
    SELECT i.id, i.email, i.password_hash,
           a.display_name, a.phone, a.premium, a.premium_since,
           a.transaction_ref, a.created_at, a.updated_at
    FROM identities i
    JOIN accounts a ON a.id = i.id
"#;

fn is_duplicate_email(err: &sqlx::Error) -> bool {
    matches!(
        err,
        sqlx::Error::Database(db_err) if db_err.constraint() == Some("identities_email_unique")
    )
}

#[async_trait]
impl AccountRepository for PostgresAccountRepository {
    async fn create(&self, account: &Account) -> Result<CreateOutcome, DomainError> {
        let mut tx = self.pool.begin().await.map_err(|e| {
            DomainError::new(ErrorCode::DatabaseError, format!("Failed to begin transaction: {}", e))
        })?;

        let identity_insert = sqlx::query(
            r#"
            INSERT INTO identities (id, email, password_hash, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5)
            "#,
        )
        .bind(account.id.as_uuid())
        .bind(account.email.as_str())
        .bind(&account.password_hash)
        .bind(account.created_at.as_datetime())
        .bind(account.updated_at.as_datetime())
        .execute(&mut *tx)
        .await;

        if let Err(e) = identity_insert {
            if is_duplicate_email(&e) {
                // Dropping the transaction rolls it back: nothing committed.
                return Ok(CreateOutcome::DuplicateEmail);
            }
            return Err(DomainError::new(
                ErrorCode::DatabaseError,
                format!("Failed to insert identity: {}", e),
            ));
        }

        insert_profile(&mut *tx, account).await?;

        tx.commit().await.map_err(|e| {
            DomainError::new(ErrorCode::DatabaseError, format!("Failed to commit account: {}", e))
        })?;

        Ok(CreateOutcome::Created)
    }

    async fn create_profile(&self, account: &Account) -> Result<(), DomainError> {
        insert_profile(&self.pool, account).await
    }

    async fn update(&self, account: &Account) -> Result<(), DomainError> {
        let mut tx = self.pool.begin().await.map_err(|e| {
            DomainError::new(ErrorCode::DatabaseError, format!("Failed to begin transaction: {}", e))
        })?;

        sqlx::query(
            r#"
            UPDATE identities SET email = $2, password_hash = $3, updated_at = $4
            WHERE id = $1
            "#,
        )
        .bind(account.id.as_uuid())
        .bind(account.email.as_str())
        .bind(&account.password_hash)
        .bind(account.updated_at.as_datetime())
        .execute(&mut *tx)
        .await
        .map_err(|e| {
            DomainError::new(ErrorCode::DatabaseError, format!("Failed to update identity: {}", e))
        })?;

        let result = sqlx::query(
            r#"
            UPDATE accounts SET
                display_name = $2,
                phone = $3,
                premium = $4,
                premium_since = $5,
                transaction_ref = $6,
                updated_at = $7
            WHERE id = $1
            "#,
        )
        .bind(account.id.as_uuid())
        .bind(&account.display_name)
        .bind(&account.phone)
        .bind(account.premium)
        .bind(account.premium_since.as_ref().map(|t| *t.as_datetime()))
        .bind(&account.transaction_ref)
        .bind(account.updated_at.as_datetime())
        .execute(&mut *tx)
        .await
        .map_err(|e| {
            DomainError::new(ErrorCode::DatabaseError, format!("Failed to update account: {}", e))
        })?;

        if result.rows_affected() == 0 {
            return Err(DomainError::new(
                ErrorCode::AccountNotFound,
                "Account not found",
            ));
        }

        tx.commit().await.map_err(|e| {
            DomainError::new(ErrorCode::DatabaseError, format!("Failed to commit update: {}", e))
        })?;

        Ok(())
    }

    async fn find_by_email(&self, email: &EmailAddress) -> Result<Option<Account>, DomainError> {
        let row: Option<AccountRow> =
            sqlx::query_as(&format!("{} WHERE lower(i.email) = $1", SELECT_ACCOUNT))
                .bind(email.as_str())
                .fetch_optional(&self.pool)
                .await
                .map_err(|e| {
                    DomainError::new(ErrorCode::DatabaseError, format!("Failed to find account: {}", e))
                })?;

        row.map(Account::try_from).transpose()
    }

    async fn find_by_id(&self, id: &AccountId) -> Result<Option<Account>, DomainError> {
        let row: Option<AccountRow> =
            sqlx::query_as(&format!("{} WHERE i.id = $1", SELECT_ACCOUNT))
                .bind(id.as_uuid())
                .fetch_optional(&self.pool)
                .await
                .map_err(|e| {
                    DomainError::new(ErrorCode::DatabaseError, format!("Failed to find account: {}", e))
                })?;

        row.map(Account::try_from).transpose()
    }
}

async fn insert_profile<'e, E>(executor: E, account: &Account) -> Result<(), DomainError>
where
    E: sqlx::PgExecutor<'e>,
{
    sqlx::query(
        r#"
        INSERT INTO accounts (
            id, display_name, phone, premium, premium_since,
            transaction_ref, created_at, updated_at
        ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
        "#,
    )
    .bind(account.id.as_uuid())
    .bind(&account.display_name)
    .bind(&account.phone)
    .bind(account.premium)
    .bind(account.premium_since.as_ref().map(|t| *t.as_datetime()))
    .bind(&account.transaction_ref)
    .bind(account.created_at.as_datetime())
    .bind(account.updated_at.as_datetime())
    .execute(executor)
    .await
    .map_err(|e| {
        DomainError::new(ErrorCode::DatabaseError, format!("Failed to insert profile: {}", e))
    })?;

    Ok(())
}
