//! Test utilities: an in-memory implementation of every store trait.
//!
//! State lives behind `Arc<Mutex<_>>` so clones share it, letting tests
//! drive the service or router through one handle and inspect through another.

use std::collections::BTreeMap;
use std::sync::{Arc, Mutex, MutexGuard};

use chrono::Utc;

use crate::error::AppError;
use crate::models::{
    Account, AccountId, Building, NewAccount, NewBuilding, NewPld, NewUserProfile, Pld,
    UserProfile,
};
use crate::traits::{AccountStore, BuildingStore, PldStore, ProfileStore, Store};
use crate::validation::{FieldErrors, invalid_pk};

#[derive(Default)]
struct Tables {
    next_id: i64,
    accounts: BTreeMap<i64, Account>,
    /// token key -> account id
    tokens: BTreeMap<String, i64>,
    buildings: BTreeMap<i64, Building>,
    plds: BTreeMap<i64, Pld>,
    profiles: BTreeMap<i64, UserProfile>,
    offline: bool,
}

impl Tables {
    fn next_id(&mut self) -> i64 {
        self.next_id += 1;
        self.next_id
    }
}

/// In-memory store shared by all clones.
#[derive(Clone, Default)]
pub struct MemoryStore {
    tables: Arc<Mutex<Tables>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every call fail with a database error, as if the server went away.
    pub fn set_offline(&self, offline: bool) {
        self.tables.lock().unwrap().offline = offline;
    }

    pub fn deactivate(&self, id: AccountId) {
        if let Some(account) = self.tables.lock().unwrap().accounts.get_mut(&id.0) {
            account.is_active = false;
        }
    }

    pub fn account_count(&self) -> usize {
        self.tables.lock().unwrap().accounts.len()
    }

    pub fn building_count(&self) -> usize {
        self.tables.lock().unwrap().buildings.len()
    }

    pub fn pld_count(&self) -> usize {
        self.tables.lock().unwrap().plds.len()
    }

    /// Every profile regardless of owner.
    pub fn all_profiles(&self) -> Vec<UserProfile> {
        self.tables.lock().unwrap().profiles.values().cloned().collect()
    }

    fn lock(&self) -> Result<MutexGuard<'_, Tables>, AppError> {
        let tables = self.tables.lock().unwrap();
        if tables.offline {
            return Err(AppError::DatabaseError(
                "connection refused: memory store offline".into(),
            ));
        }
        Ok(tables)
    }
}

impl AccountStore for MemoryStore {
    async fn create_account(
        &self,
        account: &NewAccount,
        token_key: &str,
    ) -> Result<Option<Account>, AppError> {
        let mut tables = self.lock()?;
        if tables
            .accounts
            .values()
            .any(|a| a.username == account.username)
        {
            return Ok(None);
        }
        if tables.tokens.contains_key(token_key) {
            return Err(AppError::DatabaseError(
                "duplicate key value violates unique constraint \"auth_tokens_pkey\"".into(),
            ));
        }
        let id = tables.next_id();
        let created = Account {
            id: AccountId(id),
            username: account.username.clone(),
            password_hash: account.password_hash.clone(),
            is_active: true,
            date_joined: Utc::now(),
        };
        tables.accounts.insert(id, created.clone());
        tables.tokens.insert(token_key.to_string(), id);
        Ok(Some(created))
    }

    async fn find_account_by_username(&self, username: &str) -> Result<Option<Account>, AppError> {
        let tables = self.lock()?;
        Ok(tables
            .accounts
            .values()
            .find(|a| a.username == username)
            .cloned())
    }

    async fn account_exists(&self, id: AccountId) -> Result<bool, AppError> {
        Ok(self.lock()?.accounts.contains_key(&id.0))
    }

    async fn get_or_create_token(
        &self,
        id: AccountId,
        candidate_key: &str,
    ) -> Result<String, AppError> {
        let mut tables = self.lock()?;
        if let Some((key, _)) = tables.tokens.iter().find(|(_, owner)| **owner == id.0) {
            return Ok(key.clone());
        }
        tables.tokens.insert(candidate_key.to_string(), id.0);
        Ok(candidate_key.to_string())
    }

    async fn find_account_by_token(&self, key: &str) -> Result<Option<Account>, AppError> {
        let tables = self.lock()?;
        Ok(tables
            .tokens
            .get(key)
            .and_then(|id| tables.accounts.get(id))
            .cloned())
    }
}

impl BuildingStore for MemoryStore {
    async fn list_buildings(&self) -> Result<Vec<Building>, AppError> {
        Ok(self.lock()?.buildings.values().cloned().collect())
    }

    async fn get_building(&self, id: i64) -> Result<Option<Building>, AppError> {
        Ok(self.lock()?.buildings.get(&id).cloned())
    }

    async fn create_building(&self, building: &NewBuilding) -> Result<Building, AppError> {
        let mut tables = self.lock()?;
        let id = tables.next_id();
        let created = Building {
            id,
            name: building.name.clone(),
            location: building.location.clone(),
        };
        tables.buildings.insert(id, created.clone());
        Ok(created)
    }

    async fn update_building(
        &self,
        id: i64,
        building: &NewBuilding,
    ) -> Result<Option<Building>, AppError> {
        let mut tables = self.lock()?;
        Ok(tables.buildings.get_mut(&id).map(|row| {
            row.name = building.name.clone();
            row.location = building.location.clone();
            row.clone()
        }))
    }

    async fn delete_building(&self, id: i64) -> Result<bool, AppError> {
        let mut tables = self.lock()?;
        let removed = tables.buildings.remove(&id).is_some();
        if removed {
            tables.plds.retain(|_, pld| pld.building != id);
        }
        Ok(removed)
    }
}

impl PldStore for MemoryStore {
    async fn list_plds(&self, building: Option<i64>) -> Result<Vec<Pld>, AppError> {
        let tables = self.lock()?;
        Ok(tables
            .plds
            .values()
            .filter(|pld| building.is_none_or(|b| pld.building == b))
            .cloned()
            .collect())
    }

    async fn get_pld(&self, id: i64) -> Result<Option<Pld>, AppError> {
        Ok(self.lock()?.plds.get(&id).cloned())
    }

    async fn create_pld(&self, pld: &NewPld) -> Result<Pld, AppError> {
        let mut tables = self.lock()?;
        if !tables.buildings.contains_key(&pld.building) {
            return Err(AppError::Validation(FieldErrors::single(
                "building",
                invalid_pk(pld.building),
            )));
        }
        let id = tables.next_id();
        let created = Pld {
            id,
            label: pld.label.clone(),
            building: pld.building,
        };
        tables.plds.insert(id, created.clone());
        Ok(created)
    }

    async fn update_pld(&self, id: i64, pld: &NewPld) -> Result<Option<Pld>, AppError> {
        let mut tables = self.lock()?;
        if !tables.buildings.contains_key(&pld.building) {
            return Err(AppError::Validation(FieldErrors::single(
                "building",
                invalid_pk(pld.building),
            )));
        }
        Ok(tables.plds.get_mut(&id).map(|row| {
            row.label = pld.label.clone();
            row.building = pld.building;
            row.clone()
        }))
    }

    async fn delete_pld(&self, id: i64) -> Result<bool, AppError> {
        Ok(self.lock()?.plds.remove(&id).is_some())
    }
}

impl ProfileStore for MemoryStore {
    async fn list_profiles(&self, owner: AccountId) -> Result<Vec<UserProfile>, AppError> {
        let tables = self.lock()?;
        Ok(tables
            .profiles
            .values()
            .filter(|p| p.user == owner)
            .cloned()
            .collect())
    }

    async fn get_profile(&self, owner: AccountId, id: i64) -> Result<Option<UserProfile>, AppError> {
        let tables = self.lock()?;
        Ok(tables
            .profiles
            .get(&id)
            .filter(|p| p.user == owner)
            .cloned())
    }

    async fn create_profile(
        &self,
        owner: AccountId,
        profile: &NewUserProfile,
    ) -> Result<UserProfile, AppError> {
        let mut tables = self.lock()?;
        let id = tables.next_id();
        let created = UserProfile {
            id,
            user: owner,
            disability_type: profile.disability_type.clone(),
        };
        tables.profiles.insert(id, created.clone());
        Ok(created)
    }

    async fn update_profile(
        &self,
        owner: AccountId,
        id: i64,
        profile: &NewUserProfile,
    ) -> Result<Option<UserProfile>, AppError> {
        let mut tables = self.lock()?;
        Ok(tables
            .profiles
            .get_mut(&id)
            .filter(|p| p.user == owner)
            .map(|row| {
                row.disability_type = profile.disability_type.clone();
                row.clone()
            }))
    }

    async fn delete_profile(&self, owner: AccountId, id: i64) -> Result<bool, AppError> {
        let mut tables = self.lock()?;
        let owned = tables.profiles.get(&id).is_some_and(|p| p.user == owner);
        if owned {
            tables.profiles.remove(&id);
        }
        Ok(owned)
    }
}

impl Store for MemoryStore {
    type Accounts = Self;
    type Buildings = Self;
    type Plds = Self;
    type Profiles = Self;

    fn accounts(&self) -> Self {
        self.clone()
    }

    fn buildings(&self) -> Self {
        self.clone()
    }

    fn plds(&self) -> Self {
        self.clone()
    }

    fn profiles(&self) -> Self {
        self.clone()
    }

    async fn health_check(&self) -> Result<(), AppError> {
        self.lock().map(|_| ())
    }
}
