use std::future::Future;

use crate::error::AppError;
use crate::models::{
    Account, AccountId, Building, NewAccount, NewBuilding, NewPld, NewUserProfile, Pld,
    UserProfile,
};

/// Accounts and their bearer tokens.
pub trait AccountStore: Send + Sync + Clone {
    /// Insert a new account and its first token in one atomic write.
    ///
    /// Returns `None` if the username is already registered. Either both rows
    /// are stored or neither is.
    fn create_account(
        &self,
        account: &NewAccount,
        token_key: &str,
    ) -> impl Future<Output = Result<Option<Account>, AppError>> + Send;

    fn find_account_by_username(
        &self,
        username: &str,
    ) -> impl Future<Output = Result<Option<Account>, AppError>> + Send;

    fn account_exists(&self, id: AccountId) -> impl Future<Output = Result<bool, AppError>> + Send;

    /// Return the account's token, storing `candidate_key` only if it has none yet.
    fn get_or_create_token(
        &self,
        id: AccountId,
        candidate_key: &str,
    ) -> impl Future<Output = Result<String, AppError>> + Send;

    fn find_account_by_token(
        &self,
        key: &str,
    ) -> impl Future<Output = Result<Option<Account>, AppError>> + Send;
}

/// The shared building collection. No ownership.
pub trait BuildingStore: Send + Sync + Clone {
    /// All buildings, ascending by id.
    fn list_buildings(&self) -> impl Future<Output = Result<Vec<Building>, AppError>> + Send;

    fn get_building(
        &self,
        id: i64,
    ) -> impl Future<Output = Result<Option<Building>, AppError>> + Send;

    fn create_building(
        &self,
        building: &NewBuilding,
    ) -> impl Future<Output = Result<Building, AppError>> + Send;

    /// Replace every writable field. `None` if the row does not exist.
    fn update_building(
        &self,
        id: i64,
        building: &NewBuilding,
    ) -> impl Future<Output = Result<Option<Building>, AppError>> + Send;

    /// Delete a building and its PLDs. Returns false if nothing was deleted.
    fn delete_building(&self, id: i64) -> impl Future<Output = Result<bool, AppError>> + Send;
}

/// The shared PLD collection. No ownership.
pub trait PldStore: Send + Sync + Clone {
    /// PLDs ascending by id, restricted to one building when `building` is set.
    fn list_plds(
        &self,
        building: Option<i64>,
    ) -> impl Future<Output = Result<Vec<Pld>, AppError>> + Send;

    fn get_pld(&self, id: i64) -> impl Future<Output = Result<Option<Pld>, AppError>> + Send;

    /// Fails with a validation error on `building` if the building does not exist.
    fn create_pld(&self, pld: &NewPld) -> impl Future<Output = Result<Pld, AppError>> + Send;

    fn update_pld(
        &self,
        id: i64,
        pld: &NewPld,
    ) -> impl Future<Output = Result<Option<Pld>, AppError>> + Send;

    fn delete_pld(&self, id: i64) -> impl Future<Output = Result<bool, AppError>> + Send;
}

/// Owner-scoped profile access.
///
/// Every method takes the caller's identity. Rows owned by anyone else are
/// invisible: lookups return `None`, updates and deletes affect nothing.
pub trait ProfileStore: Send + Sync + Clone {
    fn list_profiles(
        &self,
        owner: AccountId,
    ) -> impl Future<Output = Result<Vec<UserProfile>, AppError>> + Send;

    fn get_profile(
        &self,
        owner: AccountId,
        id: i64,
    ) -> impl Future<Output = Result<Option<UserProfile>, AppError>> + Send;

    fn create_profile(
        &self,
        owner: AccountId,
        profile: &NewUserProfile,
    ) -> impl Future<Output = Result<UserProfile, AppError>> + Send;

    fn update_profile(
        &self,
        owner: AccountId,
        id: i64,
        profile: &NewUserProfile,
    ) -> impl Future<Output = Result<Option<UserProfile>, AppError>> + Send;

    fn delete_profile(
        &self,
        owner: AccountId,
        id: i64,
    ) -> impl Future<Output = Result<bool, AppError>> + Send;
}

/// Persistence facade handed to the HTTP layer. Vends one repository per entity.
pub trait Store: Send + Sync + Clone + 'static {
    type Accounts: AccountStore;
    type Buildings: BuildingStore;
    type Plds: PldStore;
    type Profiles: ProfileStore;

    fn accounts(&self) -> Self::Accounts;
    fn buildings(&self) -> Self::Buildings;
    fn plds(&self) -> Self::Plds;
    fn profiles(&self) -> Self::Profiles;

    /// Check that the backing store is reachable.
    fn health_check(&self) -> impl Future<Output = Result<(), AppError>> + Send;
}
