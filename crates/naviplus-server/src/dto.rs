use serde::{Deserialize, Deserializer, Serialize};

use naviplus_core::error::AppError;
use naviplus_core::models::{Building, NewBuilding, NewPld, NewUserProfile, Pld, UserProfile};
use naviplus_core::validation::{
    BLANK, FieldErrors, MAX_DISABILITY_TYPE_LEN, MAX_TEXT_LEN, NULL, REQUIRED, optional_text,
    required_ref, required_text,
};

/// Distinguishes an absent field (`None`) from an explicit `null` (`Some(None)`).
fn deserialize_some<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    T::deserialize(deserializer).map(Some)
}

/// Resolve a field that cannot be null. An explicit `null` always fails; an
/// absent field takes `stored` when there is one, otherwise `check` decides.
fn resolve<T>(
    errors: &mut FieldErrors,
    field: &str,
    value: Option<Option<T>>,
    stored: Option<T>,
    check: impl FnOnce(&mut FieldErrors, Option<T>) -> Option<T>,
) -> Option<T> {
    match (value, stored) {
        (Some(None), _) => {
            errors.add(field, NULL);
            None
        }
        (None, Some(stored)) => Some(stored),
        (value, _) => check(errors, value.flatten()),
    }
}

// ---------------------------------------------------------------------------
// Buildings
// ---------------------------------------------------------------------------

/// Incoming building payload. `id` is read-only and ignored if sent.
#[derive(Debug, Default, Deserialize, utoipa::ToSchema)]
pub struct BuildingRequest {
    #[serde(default, deserialize_with = "deserialize_some")]
    #[schema(value_type = Option<String>)]
    pub name: Option<Option<String>>,
    #[serde(default, deserialize_with = "deserialize_some")]
    #[schema(value_type = Option<String>)]
    pub location: Option<Option<String>>,
}

impl BuildingRequest {
    /// Validate into a full row against the `stored` one, if any.
    ///
    /// An absent `location` always keeps its stored value. An absent `name`
    /// does so only when `partial`; a full update must send it.
    pub fn validate(
        self,
        stored: Option<&Building>,
        partial: bool,
        errors: &mut FieldErrors,
    ) -> Option<NewBuilding> {
        let base = stored.filter(|_| partial);
        let name = resolve(errors, "name", self.name, base.map(|b| b.name.clone()), |e, v| {
            required_text(e, "name", v, MAX_TEXT_LEN)
        });
        let location = match (self.location, stored) {
            (None, Some(stored)) => stored.location.clone(),
            (None, None) => None,
            (Some(location), _) => optional_text(errors, "location", location, MAX_TEXT_LEN),
        };
        Some(NewBuilding {
            name: name?,
            location,
        })
    }
}

#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct BuildingResponse {
    pub id: i64,
    pub name: String,
    pub location: Option<String>,
}

impl From<Building> for BuildingResponse {
    fn from(b: Building) -> Self {
        Self {
            id: b.id,
            name: b.name,
            location: b.location,
        }
    }
}

// ---------------------------------------------------------------------------
// PLDs
// ---------------------------------------------------------------------------

#[derive(Debug, Default, Deserialize, utoipa::ToSchema)]
pub struct PldRequest {
    #[serde(default, deserialize_with = "deserialize_some")]
    #[schema(value_type = Option<String>)]
    pub label: Option<Option<String>>,
    /// Id of the building this entrance belongs to.
    #[serde(default, deserialize_with = "deserialize_some")]
    #[schema(value_type = Option<i64>)]
    pub building: Option<Option<i64>>,
}

impl PldRequest {
    /// Shape-check the payload. Whether `building` exists is the caller's job.
    pub fn validate(self, stored: Option<&Pld>, partial: bool, errors: &mut FieldErrors) -> Option<NewPld> {
        let base = stored.filter(|_| partial);
        let label = resolve(errors, "label", self.label, base.map(|p| p.label.clone()), |e, v| {
            required_text(e, "label", v, MAX_TEXT_LEN)
        });
        let building = resolve(errors, "building", self.building, base.map(|p| p.building), |e, v| {
            required_ref(e, "building", v)
        });
        Some(NewPld {
            label: label?,
            building: building?,
        })
    }
}

#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct PldResponse {
    pub id: i64,
    pub label: String,
    pub building: i64,
}

impl From<Pld> for PldResponse {
    fn from(p: Pld) -> Self {
        Self {
            id: p.id,
            label: p.label,
            building: p.building,
        }
    }
}

#[derive(Debug, Deserialize, utoipa::IntoParams)]
#[into_params(parameter_in = Query)]
pub struct PldListQuery {
    /// Only return PLDs of this building.
    pub building: Option<String>,
}

impl PldListQuery {
    /// The building filter. `None` means unfiltered; `Some(None)` means a
    /// value was given that cannot match any building.
    pub fn building_filter(&self) -> Option<Option<i64>> {
        match self.building.as_deref() {
            None | Some("") => None,
            Some(raw) => Some(raw.trim().parse().ok()),
        }
    }

    /// Whether a PLD of `building` is visible under the filter. Detail routes
    /// honour it too, so a filtered-out PLD is not found there either.
    pub fn admits(&self, building: i64) -> bool {
        match self.building_filter() {
            None => true,
            Some(filter) => filter == Some(building),
        }
    }
}

// ---------------------------------------------------------------------------
// User profiles
// ---------------------------------------------------------------------------

/// Incoming profile payload. `user` is checked to exist, then replaced by the caller.
#[derive(Debug, Default, Deserialize, utoipa::ToSchema)]
pub struct ProfileRequest {
    #[serde(default, deserialize_with = "deserialize_some")]
    #[schema(value_type = Option<i64>)]
    pub user: Option<Option<i64>>,
    #[serde(default, deserialize_with = "deserialize_some")]
    #[schema(value_type = Option<String>)]
    pub disability_type: Option<Option<String>>,
}

impl ProfileRequest {
    pub fn validate(
        self,
        stored: Option<&UserProfile>,
        partial: bool,
        errors: &mut FieldErrors,
    ) -> Option<NewUserProfile> {
        if self.user == Some(None) {
            errors.add("user", NULL);
        }
        let base = stored.filter(|_| partial);
        let disability_type = resolve(
            errors,
            "disability_type",
            self.disability_type,
            base.map(|p| p.disability_type.clone()),
            |e, v| required_text(e, "disability_type", v, MAX_DISABILITY_TYPE_LEN),
        );
        Some(NewUserProfile {
            disability_type: disability_type?,
        })
    }
}

/// Exactly the two exposed profile fields.
#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct ProfileResponse {
    pub user: i64,
    pub disability_type: String,
}

impl From<UserProfile> for ProfileResponse {
    fn from(p: UserProfile) -> Self {
        Self {
            user: p.user.0,
            disability_type: p.disability_type,
        }
    }
}

// ---------------------------------------------------------------------------
// Auth
// ---------------------------------------------------------------------------

#[derive(Debug, Default, Deserialize, utoipa::ToSchema)]
pub struct CredentialsRequest {
    #[serde(default, deserialize_with = "deserialize_some")]
    #[schema(value_type = Option<String>)]
    pub username: Option<Option<String>>,
    #[serde(default, deserialize_with = "deserialize_some")]
    #[schema(value_type = Option<String>)]
    pub password: Option<Option<String>>,
}

impl CredentialsRequest {
    /// Signup treats `null` like an absent field.
    pub fn signup_parts(&self) -> (Option<&str>, Option<&str>) {
        (
            self.username.as_ref().and_then(|v| v.as_deref()),
            self.password.as_ref().and_then(|v| v.as_deref()),
        )
    }

    /// Both fields for login, or field errors naming what is missing.
    pub fn into_login_parts(self) -> Result<(String, String), AppError> {
        let mut errors = FieldErrors::new();
        let username = present(&mut errors, "username", self.username);
        let password = present(&mut errors, "password", self.password);
        let parts = username.zip(password);
        errors.finish(parts)
    }
}

fn present(errors: &mut FieldErrors, field: &str, value: Option<Option<String>>) -> Option<String> {
    match value {
        None => {
            errors.add(field, REQUIRED);
            None
        }
        Some(None) => {
            errors.add(field, NULL);
            None
        }
        Some(Some(v)) if v.is_empty() => {
            errors.add(field, BLANK);
            None
        }
        Some(Some(v)) => Some(v),
    }
}

#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct TokenResponse {
    pub token: String,
}

// ---------------------------------------------------------------------------
// System
// ---------------------------------------------------------------------------

#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct HealthResponse {
    pub status: &'static str,
    pub database: &'static str,
}

/// Router index: collection name to absolute URL.
#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct ApiRootResponse {
    pub buildings: String,
    pub plds: String,
    #[serde(rename = "user-profiles")]
    pub user_profiles: String,
}

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
    /// Per-field messages, present on validation errors only.
    #[serde(skip_serializing_if = "Option::is_none")]
    #[schema(value_type = Option<Object>)]
    pub fields: Option<FieldErrors>,
}
