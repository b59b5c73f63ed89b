use sqlx::{PgPool, Pool, Postgres};

use naviplus_core::error::AppError;
use naviplus_core::models::{AccountId, NewUserProfile, UserProfile};
use naviplus_core::traits::ProfileStore;

/// Repository for user profiles. Every statement filters on `user_id`, so
/// rows of other accounts never match.
#[derive(Clone)]
pub struct ProfileRepository {
    pool: Pool<Postgres>,
}

impl ProfileRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(sqlx::FromRow)]
struct ProfileRow {
    id: i64,
    user_id: i64,
    disability_type: String,
}

impl From<ProfileRow> for UserProfile {
    fn from(row: ProfileRow) -> Self {
        UserProfile {
            id: row.id,
            user: AccountId(row.user_id),
            disability_type: row.disability_type,
        }
    }
}

impl ProfileStore for ProfileRepository {
    async fn list_profiles(&self, owner: AccountId) -> Result<Vec<UserProfile>, AppError> {
        let rows = sqlx::query_as::<_, ProfileRow>(
            r#"
            SELECT id, user_id, disability_type FROM user_profiles
            WHERE user_id = $1
            ORDER BY id
            "#,
        )
        .bind(owner.0)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::DatabaseError(e.to_string()))?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn get_profile(&self, owner: AccountId, id: i64) -> Result<Option<UserProfile>, AppError> {
        let row = sqlx::query_as::<_, ProfileRow>(
            r#"
            SELECT id, user_id, disability_type FROM user_profiles
            WHERE id = $1 AND user_id = $2
            "#,
        )
        .bind(id)
        .bind(owner.0)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::DatabaseError(e.to_string()))?;

        Ok(row.map(Into::into))
    }

    async fn create_profile(
        &self,
        owner: AccountId,
        profile: &NewUserProfile,
    ) -> Result<UserProfile, AppError> {
        let row = sqlx::query_as::<_, ProfileRow>(
            r#"
            INSERT INTO user_profiles (user_id, disability_type)
            VALUES ($1, $2)
            RETURNING id, user_id, disability_type
            "#,
        )
        .bind(owner.0)
        .bind(&profile.disability_type)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| AppError::DatabaseError(e.to_string()))?;

        Ok(row.into())
    }

    async fn update_profile(
        &self,
        owner: AccountId,
        id: i64,
        profile: &NewUserProfile,
    ) -> Result<Option<UserProfile>, AppError> {
        let row = sqlx::query_as::<_, ProfileRow>(
            r#"
            UPDATE user_profiles
            SET disability_type = $3
            WHERE id = $1 AND user_id = $2
            RETURNING id, user_id, disability_type
            "#,
        )
        .bind(id)
        .bind(owner.0)
        .bind(&profile.disability_type)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::DatabaseError(e.to_string()))?;

        Ok(row.map(Into::into))
    }

    async fn delete_profile(&self, owner: AccountId, id: i64) -> Result<bool, AppError> {
        let result = sqlx::query(r#"DELETE FROM user_profiles WHERE id = $1 AND user_id = $2"#)
            .bind(id)
            .bind(owner.0)
            .execute(&self.pool)
            .await
            .map_err(|e| AppError::DatabaseError(e.to_string()))?;

        Ok(result.rows_affected() > 0)
    }
}
