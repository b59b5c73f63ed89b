use chrono::{DateTime, Utc};
use sqlx::{PgPool, Pool, Postgres};

use naviplus_core::error::AppError;
use naviplus_core::models::{Account, AccountId, NewAccount};
use naviplus_core::traits::AccountStore;

/// Accounts and tokens in PostgreSQL.
#[derive(Clone)]
pub struct AccountRepository {
    pool: Pool<Postgres>,
}

impl AccountRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

// -- Internal row type for sqlx deserialization --

#[derive(sqlx::FromRow)]
struct AccountRow {
    id: i64,
    username: String,
    password_hash: String,
    is_active: bool,
    date_joined: DateTime<Utc>,
}

impl From<AccountRow> for Account {
    fn from(row: AccountRow) -> Self {
        Account {
            id: AccountId(row.id),
            username: row.username,
            password_hash: row.password_hash,
            is_active: row.is_active,
            date_joined: row.date_joined,
        }
    }
}

impl AccountStore for AccountRepository {
    async fn create_account(
        &self,
        account: &NewAccount,
        token_key: &str,
    ) -> Result<Option<Account>, AppError> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| AppError::DatabaseError(e.to_string()))?;

        // ON CONFLICT covers the race between the signup existence check and this insert.
        let row = sqlx::query_as::<_, AccountRow>(
            r#"
            INSERT INTO accounts (username, password_hash)
            VALUES ($1, $2)
            ON CONFLICT (username) DO NOTHING
            RETURNING id, username, password_hash, is_active, date_joined
            "#,
        )
        .bind(&account.username)
        .bind(&account.password_hash)
        .fetch_optional(&mut *tx)
        .await
        .map_err(|e| AppError::DatabaseError(e.to_string()))?;

        let Some(row) = row else {
            return Ok(None);
        };

        // Dropping `tx` on error rolls the account insert back.
        sqlx::query(r#"INSERT INTO auth_tokens (key, account_id) VALUES ($1, $2)"#)
            .bind(token_key)
            .bind(row.id)
            .execute(&mut *tx)
            .await
            .map_err(|e| AppError::DatabaseError(e.to_string()))?;

        tx.commit()
            .await
            .map_err(|e| AppError::DatabaseError(e.to_string()))?;

        Ok(Some(row.into()))
    }

    async fn find_account_by_username(&self, username: &str) -> Result<Option<Account>, AppError> {
        let row = sqlx::query_as::<_, AccountRow>(
            r#"
            SELECT id, username, password_hash, is_active, date_joined
            FROM accounts
            WHERE username = $1
            "#,
        )
        .bind(username)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::DatabaseError(e.to_string()))?;

        Ok(row.map(Into::into))
    }

    async fn account_exists(&self, id: AccountId) -> Result<bool, AppError> {
        let (exists,): (bool,) =
            sqlx::query_as(r#"SELECT EXISTS (SELECT 1 FROM accounts WHERE id = $1)"#)
                .bind(id.0)
                .fetch_one(&self.pool)
                .await
                .map_err(|e| AppError::DatabaseError(e.to_string()))?;

        Ok(exists)
    }

    async fn get_or_create_token(
        &self,
        id: AccountId,
        candidate_key: &str,
    ) -> Result<String, AppError> {
        // The no-op update makes RETURNING yield the existing key on conflict.
        let (key,): (String,) = sqlx::query_as(
            r#"
            INSERT INTO auth_tokens (key, account_id)
            VALUES ($1, $2)
            ON CONFLICT (account_id) DO UPDATE SET account_id = EXCLUDED.account_id
            RETURNING key
            "#,
        )
        .bind(candidate_key)
        .bind(id.0)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| AppError::DatabaseError(e.to_string()))?;

        Ok(key)
    }

    async fn find_account_by_token(&self, key: &str) -> Result<Option<Account>, AppError> {
        let row = sqlx::query_as::<_, AccountRow>(
            r#"
            SELECT a.id, a.username, a.password_hash, a.is_active, a.date_joined
            FROM auth_tokens t
            JOIN accounts a ON a.id = t.account_id
            WHERE t.key = $1
            "#,
        )
        .bind(key)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::DatabaseError(e.to_string()))?;

        Ok(row.map(Into::into))
    }
}
