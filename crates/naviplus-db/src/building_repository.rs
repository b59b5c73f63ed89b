use sqlx::{PgPool, Pool, Postgres};

use naviplus_core::error::AppError;
use naviplus_core::models::{Building, NewBuilding};
use naviplus_core::traits::BuildingStore;

/// Repository for the shared building collection.
#[derive(Clone)]
pub struct BuildingRepository {
    pool: Pool<Postgres>,
}

impl BuildingRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(sqlx::FromRow)]
struct BuildingRow {
    id: i64,
    name: String,
    location: Option<String>,
}

impl From<BuildingRow> for Building {
    fn from(row: BuildingRow) -> Self {
        Building {
            id: row.id,
            name: row.name,
            location: row.location,
        }
    }
}

impl BuildingStore for BuildingRepository {
    async fn list_buildings(&self) -> Result<Vec<Building>, AppError> {
        let rows = sqlx::query_as::<_, BuildingRow>(
            r#"SELECT id, name, location FROM buildings ORDER BY id"#,
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::DatabaseError(e.to_string()))?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn get_building(&self, id: i64) -> Result<Option<Building>, AppError> {
        let row = sqlx::query_as::<_, BuildingRow>(
            r#"SELECT id, name, location FROM buildings WHERE id = $1"#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::DatabaseError(e.to_string()))?;

        Ok(row.map(Into::into))
    }

    async fn create_building(&self, building: &NewBuilding) -> Result<Building, AppError> {
        let row = sqlx::query_as::<_, BuildingRow>(
            r#"
            INSERT INTO buildings (name, location)
            VALUES ($1, $2)
            RETURNING id, name, location
            "#,
        )
        .bind(&building.name)
        .bind(&building.location)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| AppError::DatabaseError(e.to_string()))?;

        Ok(row.into())
    }

    async fn update_building(
        &self,
        id: i64,
        building: &NewBuilding,
    ) -> Result<Option<Building>, AppError> {
        let row = sqlx::query_as::<_, BuildingRow>(
            r#"
            UPDATE buildings
            SET name = $2, location = $3
            WHERE id = $1
            RETURNING id, name, location
            "#,
        )
        .bind(id)
        .bind(&building.name)
        .bind(&building.location)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::DatabaseError(e.to_string()))?;

        Ok(row.map(Into::into))
    }

    async fn delete_building(&self, id: i64) -> Result<bool, AppError> {
        // PLDs go with it via ON DELETE CASCADE.
        let result = sqlx::query(r#"DELETE FROM buildings WHERE id = $1"#)
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| AppError::DatabaseError(e.to_string()))?;

        Ok(result.rows_affected() > 0)
    }
}
