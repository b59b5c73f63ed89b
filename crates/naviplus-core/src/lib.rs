pub mod auth;
pub mod error;
pub mod models;
pub mod password;
pub mod traits;
pub mod validation;

#[cfg(any(test, feature = "testutil"))]
pub mod testutil;

pub use auth::AuthService;
pub use error::AppError;
pub use models::{Account, AccountId, Building, NewBuilding, NewPld, NewUserProfile, Pld, UserProfile};
pub use traits::{AccountStore, BuildingStore, PldStore, ProfileStore, Store};
pub use validation::FieldErrors;
