use naviplus_core::{AppError, Store};
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;

use crate::account_repository::AccountRepository;
use crate::building_repository::BuildingRepository;
use crate::config::DatabaseConfig;
use crate::pld_repository::PldRepository;
use crate::profile_repository::ProfileRepository;

/// Central database facade: owns the connection pool, runs migrations,
/// and vends repository instances.
#[derive(Clone)]
pub struct Database {
    pool: PgPool,
}

impl Database {
    /// Connect to PostgreSQL with the given configuration.
    pub async fn connect(config: &DatabaseConfig) -> Result<Self, AppError> {
        let pool = PgPoolOptions::new()
            .max_connections(config.max_connections)
            .connect(&config.url)
            .await
            .map_err(|e| AppError::DatabaseError(format!("Failed to connect: {e}")))?;

        Ok(Self { pool })
    }

    /// Create a `Database` from an existing pool (useful for testing).
    pub fn from_pool(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Run all pending migrations.
    pub async fn migrate(&self) -> Result<(), AppError> {
        sqlx::migrate!("../../migrations")
            .run(&self.pool)
            .await
            .map_err(|e| AppError::DatabaseError(format!("Migration failed: {e}")))?;
        Ok(())
    }
}

impl Store for Database {
    type Accounts = AccountRepository;
    type Buildings = BuildingRepository;
    type Plds = PldRepository;
    type Profiles = ProfileRepository;

    fn accounts(&self) -> AccountRepository {
        AccountRepository::new(self.pool.clone())
    }

    fn buildings(&self) -> BuildingRepository {
        BuildingRepository::new(self.pool.clone())
    }

    fn plds(&self) -> PldRepository {
        PldRepository::new(self.pool.clone())
    }

    fn profiles(&self) -> ProfileRepository {
        ProfileRepository::new(self.pool.clone())
    }

    async fn health_check(&self) -> Result<(), AppError> {
        sqlx::query("SELECT 1")
            .execute(&self.pool)
            .await
            .map_err(|e| AppError::DatabaseError(e.to_string()))?;
        Ok(())
    }
}
