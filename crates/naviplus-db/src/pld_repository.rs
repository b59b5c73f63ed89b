use sqlx::{PgPool, Pool, Postgres};

use naviplus_core::error::AppError;
use naviplus_core::models::{NewPld, Pld};
use naviplus_core::traits::PldStore;
use naviplus_core::validation::{FieldErrors, invalid_pk};

/// Repository for Physical Location Descriptors.
#[derive(Clone)]
pub struct PldRepository {
    pool: Pool<Postgres>,
}

impl PldRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(sqlx::FromRow)]
struct PldRow {
    id: i64,
    label: String,
    building_id: i64,
}

impl From<PldRow> for Pld {
    fn from(row: PldRow) -> Self {
        Pld {
            id: row.id,
            label: row.label,
            building: row.building_id,
        }
    }
}

/// A foreign-key violation means the referenced building is gone; report it
/// the same way as a failed existence check.
fn map_write_error(err: sqlx::Error, building: i64) -> AppError {
    let is_fk_violation = err
        .as_database_error()
        .is_some_and(|db| db.is_foreign_key_violation());
    if is_fk_violation {
        AppError::Validation(FieldErrors::single("building", invalid_pk(building)))
    } else {
        AppError::DatabaseError(err.to_string())
    }
}

impl PldStore for PldRepository {
    async fn list_plds(&self, building: Option<i64>) -> Result<Vec<Pld>, AppError> {
        let rows = if let Some(building) = building {
            tracing::debug!(building, "Listing PLDs for building");
            sqlx::query_as::<_, PldRow>(
                r#"
                SELECT id, label, building_id FROM plds
                WHERE building_id = $1
                ORDER BY id
                "#,
            )
            .bind(building)
            .fetch_all(&self.pool)
            .await
        } else {
            sqlx::query_as::<_, PldRow>(r#"SELECT id, label, building_id FROM plds ORDER BY id"#)
                .fetch_all(&self.pool)
                .await
        }
        .map_err(|e| AppError::DatabaseError(e.to_string()))?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn get_pld(&self, id: i64) -> Result<Option<Pld>, AppError> {
        let row = sqlx::query_as::<_, PldRow>(
            r#"SELECT id, label, building_id FROM plds WHERE id = $1"#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::DatabaseError(e.to_string()))?;

        Ok(row.map(Into::into))
    }

    async fn create_pld(&self, pld: &NewPld) -> Result<Pld, AppError> {
        let row = sqlx::query_as::<_, PldRow>(
            r#"
            INSERT INTO plds (label, building_id)
            VALUES ($1, $2)
            RETURNING id, label, building_id
            "#,
        )
        .bind(&pld.label)
        .bind(pld.building)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| map_write_error(e, pld.building))?;

        Ok(row.into())
    }

    async fn update_pld(&self, id: i64, pld: &NewPld) -> Result<Option<Pld>, AppError> {
        let row = sqlx::query_as::<_, PldRow>(
            r#"
            UPDATE plds
            SET label = $2, building_id = $3
            WHERE id = $1
            RETURNING id, label, building_id
            "#,
        )
        .bind(id)
        .bind(&pld.label)
        .bind(pld.building)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| map_write_error(e, pld.building))?;

        Ok(row.map(Into::into))
    }

    async fn delete_pld(&self, id: i64) -> Result<bool, AppError> {
        let result = sqlx::query(r#"DELETE FROM plds WHERE id = $1"#)
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| AppError::DatabaseError(e.to_string()))?;

        Ok(result.rows_affected() > 0)
    }
}
