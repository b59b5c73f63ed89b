pub mod account_repository;
pub mod building_repository;
pub mod config;
pub mod database;
pub mod pld_repository;
pub mod profile_repository;

pub use account_repository::AccountRepository;
pub use building_repository::BuildingRepository;
pub use config::DatabaseConfig;
pub use database::Database;
pub use pld_repository::PldRepository;
pub use profile_repository::ProfileRepository;
