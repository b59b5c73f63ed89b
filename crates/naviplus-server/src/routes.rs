use std::sync::Arc;

use axum::extract::{Extension, Path, Query, State};
use axum::http::header::HOST;
use axum::http::{HeaderMap, StatusCode};
use axum::middleware;
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Json, Router};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use naviplus_core::validation::invalid_pk;
use naviplus_core::{
    AccountId, AccountStore, AppError, AuthService, BuildingStore, FieldErrors, Pld, PldStore,
    ProfileStore, Store,
};

use crate::auth::{Caller, require_token};
use crate::dto::{
    ApiRootResponse, BuildingRequest, BuildingResponse, CredentialsRequest, HealthResponse,
    PldListQuery, PldRequest, PldResponse, ProfileRequest, ProfileResponse, TokenResponse,
};
use crate::error::ApiError;
use crate::extract::ApiJson;
use crate::openapi::ApiDoc;
use crate::state::AppState;

/// Build the full router with all routes and middleware.
pub fn router<S: Store>(state: Arc<AppState<S>>) -> Router {
    let api = Router::new()
        .route("/api/", get(api_root))
        .route(
            "/api/buildings/",
            get(list_buildings::<S>).post(create_building::<S>),
        )
        .route(
            "/api/buildings/{id}/",
            get(get_building::<S>)
                .put(update_building::<S>)
                .patch(partial_update_building::<S>)
                .delete(delete_building::<S>),
        )
        .route("/api/plds/", get(list_plds::<S>).post(create_pld::<S>))
        .route(
            "/api/plds/{id}/",
            get(get_pld::<S>)
                .put(update_pld::<S>)
                .patch(partial_update_pld::<S>)
                .delete(delete_pld::<S>),
        )
        .route(
            "/api/user-profiles/",
            get(list_profiles::<S>).post(create_profile::<S>),
        )
        .route(
            "/api/user-profiles/{id}/",
            get(get_profile::<S>)
                .put(update_profile::<S>)
                .patch(partial_update_profile::<S>)
                .delete(delete_profile::<S>),
        )
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            require_token::<S>,
        ));

    let public = Router::new()
        .route("/api/signup/", post(signup::<S>))
        .route("/api/login/", post(login::<S>))
        .route("/api/token-auth/", post(login::<S>))
        .route("/health", get(health::<S>))
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()));

    public.merge(api).with_state(state)
}

/// Path ids that are not integers cannot name a row.
fn parse_id(raw: &str) -> Result<i64, AppError> {
    raw.parse().map_err(|_| AppError::not_found())
}

// ---------------------------------------------------------------------------
// Buildings
// ---------------------------------------------------------------------------

#[utoipa::path(
    get,
    path = "/api/buildings/",
    responses(
        (status = 200, description = "All buildings", body = [BuildingResponse]),
        (status = 401, description = "Unauthorized", body = crate::dto::ErrorResponse),
    ),
    security(("bearer" = [])),
    tag = "buildings"
)]
pub async fn list_buildings<S: Store>(
    State(state): State<Arc<AppState<S>>>,
) -> Result<impl IntoResponse, ApiError> {
    let buildings = state.store.buildings().list_buildings().await?;
    let response: Vec<BuildingResponse> = buildings.into_iter().map(Into::into).collect();
    Ok(Json(response))
}

#[utoipa::path(
    post,
    path = "/api/buildings/",
    request_body = BuildingRequest,
    responses(
        (status = 201, description = "Building created", body = BuildingResponse),
        (status = 400, description = "Validation failed", body = crate::dto::ErrorResponse),
        (status = 401, description = "Unauthorized", body = crate::dto::ErrorResponse),
    ),
    security(("bearer" = [])),
    tag = "buildings"
)]
pub async fn create_building<S: Store>(
    State(state): State<Arc<AppState<S>>>,
    ApiJson(body): ApiJson<BuildingRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let mut errors = FieldErrors::new();
    let building = body.validate(None, false, &mut errors);
    let building = errors.finish(building)?;

    let created = state.store.buildings().create_building(&building).await?;
    Ok((StatusCode::CREATED, Json(BuildingResponse::from(created))))
}

#[utoipa::path(
    get,
    path = "/api/buildings/{id}/",
    params(("id" = i64, Path, description = "Building ID")),
    responses(
        (status = 200, description = "Building", body = BuildingResponse),
        (status = 404, description = "Not found", body = crate::dto::ErrorResponse),
        (status = 401, description = "Unauthorized", body = crate::dto::ErrorResponse),
    ),
    security(("bearer" = [])),
    tag = "buildings"
)]
pub async fn get_building<S: Store>(
    State(state): State<Arc<AppState<S>>>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let id = parse_id(&id)?;
    let building = state
        .store
        .buildings()
        .get_building(id)
        .await?
        .ok_or_else(AppError::not_found)?;
    Ok(Json(BuildingResponse::from(building)))
}

#[utoipa::path(
    put,
    path = "/api/buildings/{id}/",
    params(("id" = i64, Path, description = "Building ID")),
    request_body = BuildingRequest,
    responses(
        (status = 200, description = "Building replaced", body = BuildingResponse),
        (status = 400, description = "Validation failed", body = crate::dto::ErrorResponse),
        (status = 404, description = "Not found", body = crate::dto::ErrorResponse),
        (status = 401, description = "Unauthorized", body = crate::dto::ErrorResponse),
    ),
    security(("bearer" = [])),
    tag = "buildings"
)]
pub async fn update_building<S: Store>(
    State(state): State<Arc<AppState<S>>>,
    Path(id): Path<String>,
    ApiJson(body): ApiJson<BuildingRequest>,
) -> Result<impl IntoResponse, ApiError> {
    write_building(&state.store, &id, body, false).await
}

#[utoipa::path(
    patch,
    path = "/api/buildings/{id}/",
    params(("id" = i64, Path, description = "Building ID")),
    request_body = BuildingRequest,
    responses(
        (status = 200, description = "Building updated", body = BuildingResponse),
        (status = 400, description = "Validation failed", body = crate::dto::ErrorResponse),
        (status = 404, description = "Not found", body = crate::dto::ErrorResponse),
        (status = 401, description = "Unauthorized", body = crate::dto::ErrorResponse),
    ),
    security(("bearer" = [])),
    tag = "buildings"
)]
pub async fn partial_update_building<S: Store>(
    State(state): State<Arc<AppState<S>>>,
    Path(id): Path<String>,
    ApiJson(body): ApiJson<BuildingRequest>,
) -> Result<impl IntoResponse, ApiError> {
    write_building(&state.store, &id, body, true).await
}

async fn write_building<S: Store>(
    store: &S,
    id: &str,
    body: BuildingRequest,
    partial: bool,
) -> Result<Json<BuildingResponse>, ApiError> {
    let id = parse_id(id)?;
    let buildings = store.buildings();
    let current = buildings
        .get_building(id)
        .await?
        .ok_or_else(AppError::not_found)?;

    let mut errors = FieldErrors::new();
    let building = body.validate(Some(&current), partial, &mut errors);
    let building = errors.finish(building)?;

    let updated = buildings
        .update_building(id, &building)
        .await?
        .ok_or_else(AppError::not_found)?;
    Ok(Json(updated.into()))
}

#[utoipa::path(
    delete,
    path = "/api/buildings/{id}/",
    params(("id" = i64, Path, description = "Building ID")),
    responses(
        (status = 204, description = "Building and its PLDs deleted"),
        (status = 404, description = "Not found", body = crate::dto::ErrorResponse),
        (status = 401, description = "Unauthorized", body = crate::dto::ErrorResponse),
    ),
    security(("bearer" = [])),
    tag = "buildings"
)]
pub async fn delete_building<S: Store>(
    State(state): State<Arc<AppState<S>>>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let id = parse_id(&id)?;
    if !state.store.buildings().delete_building(id).await? {
        return Err(AppError::not_found().into());
    }
    Ok(StatusCode::NO_CONTENT)
}

// ---------------------------------------------------------------------------
// PLDs
// ---------------------------------------------------------------------------

#[utoipa::path(
    get,
    path = "/api/plds/",
    params(PldListQuery),
    responses(
        (status = 200, description = "PLDs, optionally of one building", body = [PldResponse]),
        (status = 401, description = "Unauthorized", body = crate::dto::ErrorResponse),
    ),
    security(("bearer" = [])),
    tag = "plds"
)]
pub async fn list_plds<S: Store>(
    State(state): State<Arc<AppState<S>>>,
    Query(query): Query<PldListQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let plds = match query.building_filter() {
        None => state.store.plds().list_plds(None).await?,
        Some(Some(building)) => state.store.plds().list_plds(Some(building)).await?,
        // Not an id, so nothing can match.
        Some(None) => Vec::new(),
    };
    let response: Vec<PldResponse> = plds.into_iter().map(Into::into).collect();
    Ok(Json(response))
}

#[utoipa::path(
    post,
    path = "/api/plds/",
    request_body = PldRequest,
    responses(
        (status = 201, description = "PLD created", body = PldResponse),
        (status = 400, description = "Validation failed", body = crate::dto::ErrorResponse),
        (status = 401, description = "Unauthorized", body = crate::dto::ErrorResponse),
    ),
    security(("bearer" = [])),
    tag = "plds"
)]
pub async fn create_pld<S: Store>(
    State(state): State<Arc<AppState<S>>>,
    ApiJson(body): ApiJson<PldRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let mut errors = FieldErrors::new();
    check_building(&state.store, body.building.flatten(), &mut errors).await?;
    let pld = body.validate(None, false, &mut errors);
    let pld = errors.finish(pld)?;

    let created = state.store.plds().create_pld(&pld).await?;
    Ok((StatusCode::CREATED, Json(PldResponse::from(created))))
}

#[utoipa::path(
    get,
    path = "/api/plds/{id}/",
    params(("id" = i64, Path, description = "PLD ID"), PldListQuery),
    responses(
        (status = 200, description = "PLD", body = PldResponse),
        (status = 404, description = "Not found", body = crate::dto::ErrorResponse),
        (status = 401, description = "Unauthorized", body = crate::dto::ErrorResponse),
    ),
    security(("bearer" = [])),
    tag = "plds"
)]
pub async fn get_pld<S: Store>(
    State(state): State<Arc<AppState<S>>>,
    Path(id): Path<String>,
    Query(query): Query<PldListQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let pld = find_pld(&state.store, parse_id(&id)?, &query).await?;
    Ok(Json(PldResponse::from(pld)))
}

/// Fetch a PLD, hidden when it falls outside the `?building=` filter.
async fn find_pld<S: Store>(store: &S, id: i64, query: &PldListQuery) -> Result<Pld, AppError> {
    store
        .plds()
        .get_pld(id)
        .await?
        .filter(|pld| query.admits(pld.building))
        .ok_or_else(AppError::not_found)
}

#[utoipa::path(
    put,
    path = "/api/plds/{id}/",
    params(("id" = i64, Path, description = "PLD ID"), PldListQuery),
    request_body = PldRequest,
    responses(
        (status = 200, description = "PLD replaced", body = PldResponse),
        (status = 400, description = "Validation failed", body = crate::dto::ErrorResponse),
        (status = 404, description = "Not found", body = crate::dto::ErrorResponse),
        (status = 401, description = "Unauthorized", body = crate::dto::ErrorResponse),
    ),
    security(("bearer" = [])),
    tag = "plds"
)]
pub async fn update_pld<S: Store>(
    State(state): State<Arc<AppState<S>>>,
    Path(id): Path<String>,
    Query(query): Query<PldListQuery>,
    ApiJson(body): ApiJson<PldRequest>,
) -> Result<impl IntoResponse, ApiError> {
    write_pld(&state.store, &id, &query, body, false).await
}

#[utoipa::path(
    patch,
    path = "/api/plds/{id}/",
    params(("id" = i64, Path, description = "PLD ID"), PldListQuery),
    request_body = PldRequest,
    responses(
        (status = 200, description = "PLD updated", body = PldResponse),
        (status = 400, description = "Validation failed", body = crate::dto::ErrorResponse),
        (status = 404, description = "Not found", body = crate::dto::ErrorResponse),
        (status = 401, description = "Unauthorized", body = crate::dto::ErrorResponse),
    ),
    security(("bearer" = [])),
    tag = "plds"
)]
pub async fn partial_update_pld<S: Store>(
    State(state): State<Arc<AppState<S>>>,
    Path(id): Path<String>,
    Query(query): Query<PldListQuery>,
    ApiJson(body): ApiJson<PldRequest>,
) -> Result<impl IntoResponse, ApiError> {
    write_pld(&state.store, &id, &query, body, true).await
}

async fn write_pld<S: Store>(
    store: &S,
    id: &str,
    query: &PldListQuery,
    body: PldRequest,
    partial: bool,
) -> Result<Json<PldResponse>, ApiError> {
    let id = parse_id(id)?;
    let current = find_pld(store, id, query).await?;

    let mut errors = FieldErrors::new();
    check_building(store, body.building.flatten(), &mut errors).await?;
    let pld = body.validate(Some(&current), partial, &mut errors);
    let pld = errors.finish(pld)?;

    let updated = store
        .plds()
        .update_pld(id, &pld)
        .await?
        .ok_or_else(AppError::not_found)?;
    Ok(Json(updated.into()))
}

/// Record a field error if a supplied building id names no building.
async fn check_building<S: Store>(
    store: &S,
    building: Option<i64>,
    errors: &mut FieldErrors,
) -> Result<(), AppError> {
    if let Some(id) = building
        && store.buildings().get_building(id).await?.is_none()
    {
        errors.add("building", invalid_pk(id));
    }
    Ok(())
}

#[utoipa::path(
    delete,
    path = "/api/plds/{id}/",
    params(("id" = i64, Path, description = "PLD ID"), PldListQuery),
    responses(
        (status = 204, description = "PLD deleted"),
        (status = 404, description = "Not found", body = crate::dto::ErrorResponse),
        (status = 401, description = "Unauthorized", body = crate::dto::ErrorResponse),
    ),
    security(("bearer" = [])),
    tag = "plds"
)]
pub async fn delete_pld<S: Store>(
    State(state): State<Arc<AppState<S>>>,
    Path(id): Path<String>,
    Query(query): Query<PldListQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let id = parse_id(&id)?;
    if query.building_filter().is_some() {
        find_pld(&state.store, id, &query).await?;
    }
    if !state.store.plds().delete_pld(id).await? {
        return Err(AppError::not_found().into());
    }
    Ok(StatusCode::NO_CONTENT)
}

// ---------------------------------------------------------------------------
// User profiles
// ---------------------------------------------------------------------------

#[utoipa::path(
    get,
    path = "/api/user-profiles/",
    responses(
        (status = 200, description = "The caller's profiles", body = [ProfileResponse]),
        (status = 401, description = "Unauthorized", body = crate::dto::ErrorResponse),
    ),
    security(("bearer" = [])),
    tag = "user-profiles"
)]
pub async fn list_profiles<S: Store>(
    State(state): State<Arc<AppState<S>>>,
    Extension(caller): Extension<Caller>,
) -> Result<impl IntoResponse, ApiError> {
    let profiles = state.store.profiles().list_profiles(caller.id).await?;
    let response: Vec<ProfileResponse> = profiles.into_iter().map(Into::into).collect();
    Ok(Json(response))
}

#[utoipa::path(
    post,
    path = "/api/user-profiles/",
    request_body = ProfileRequest,
    responses(
        (status = 201, description = "Profile created for the caller", body = ProfileResponse),
        (status = 400, description = "Validation failed", body = crate::dto::ErrorResponse),
        (status = 401, description = "Unauthorized", body = crate::dto::ErrorResponse),
    ),
    security(("bearer" = [])),
    tag = "user-profiles"
)]
pub async fn create_profile<S: Store>(
    State(state): State<Arc<AppState<S>>>,
    Extension(caller): Extension<Caller>,
    ApiJson(body): ApiJson<ProfileRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let mut errors = FieldErrors::new();
    check_user(&state.store, body.user.flatten(), &mut errors).await?;
    let profile = body.validate(None, false, &mut errors);
    let profile = errors.finish(profile)?;

    let created = state
        .store
        .profiles()
        .create_profile(caller.id, &profile)
        .await?;
    tracing::debug!(
        account_id = %caller.id,
        username = %caller.username,
        profile_id = created.id,
        "Profile created"
    );
    Ok((StatusCode::CREATED, Json(ProfileResponse::from(created))))
}

#[utoipa::path(
    get,
    path = "/api/user-profiles/{id}/",
    params(("id" = i64, Path, description = "Profile ID")),
    responses(
        (status = 200, description = "Profile", body = ProfileResponse),
        (status = 404, description = "Not found or not owned by the caller", body = crate::dto::ErrorResponse),
        (status = 401, description = "Unauthorized", body = crate::dto::ErrorResponse),
    ),
    security(("bearer" = [])),
    tag = "user-profiles"
)]
pub async fn get_profile<S: Store>(
    State(state): State<Arc<AppState<S>>>,
    Extension(caller): Extension<Caller>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let id = parse_id(&id)?;
    let profile = state
        .store
        .profiles()
        .get_profile(caller.id, id)
        .await?
        .ok_or_else(AppError::not_found)?;
    Ok(Json(ProfileResponse::from(profile)))
}

#[utoipa::path(
    put,
    path = "/api/user-profiles/{id}/",
    params(("id" = i64, Path, description = "Profile ID")),
    request_body = ProfileRequest,
    responses(
        (status = 200, description = "Profile replaced", body = ProfileResponse),
        (status = 400, description = "Validation failed", body = crate::dto::ErrorResponse),
        (status = 404, description = "Not found or not owned by the caller", body = crate::dto::ErrorResponse),
        (status = 401, description = "Unauthorized", body = crate::dto::ErrorResponse),
    ),
    security(("bearer" = [])),
    tag = "user-profiles"
)]
pub async fn update_profile<S: Store>(
    State(state): State<Arc<AppState<S>>>,
    Extension(caller): Extension<Caller>,
    Path(id): Path<String>,
    ApiJson(body): ApiJson<ProfileRequest>,
) -> Result<impl IntoResponse, ApiError> {
    write_profile(&state.store, &caller, &id, body, false).await
}

#[utoipa::path(
    patch,
    path = "/api/user-profiles/{id}/",
    params(("id" = i64, Path, description = "Profile ID")),
    request_body = ProfileRequest,
    responses(
        (status = 200, description = "Profile updated", body = ProfileResponse),
        (status = 400, description = "Validation failed", body = crate::dto::ErrorResponse),
        (status = 404, description = "Not found or not owned by the caller", body = crate::dto::ErrorResponse),
        (status = 401, description = "Unauthorized", body = crate::dto::ErrorResponse),
    ),
    security(("bearer" = [])),
    tag = "user-profiles"
)]
pub async fn partial_update_profile<S: Store>(
    State(state): State<Arc<AppState<S>>>,
    Extension(caller): Extension<Caller>,
    Path(id): Path<String>,
    ApiJson(body): ApiJson<ProfileRequest>,
) -> Result<impl IntoResponse, ApiError> {
    write_profile(&state.store, &caller, &id, body, true).await
}

async fn write_profile<S: Store>(
    store: &S,
    caller: &Caller,
    id: &str,
    body: ProfileRequest,
    partial: bool,
) -> Result<Json<ProfileResponse>, ApiError> {
    let id = parse_id(id)?;
    let profiles = store.profiles();
    let current = profiles
        .get_profile(caller.id, id)
        .await?
        .ok_or_else(AppError::not_found)?;

    let mut errors = FieldErrors::new();
    check_user(store, body.user.flatten(), &mut errors).await?;
    let profile = body.validate(Some(&current), partial, &mut errors);
    let profile = errors.finish(profile)?;

    let updated = profiles
        .update_profile(caller.id, id, &profile)
        .await?
        .ok_or_else(AppError::not_found)?;
    Ok(Json(updated.into()))
}

/// Record a field error if a supplied `user` names no account. The value is
/// otherwise discarded: profiles always belong to the caller.
async fn check_user<S: Store>(
    store: &S,
    user: Option<i64>,
    errors: &mut FieldErrors,
) -> Result<(), AppError> {
    if let Some(id) = user
        && !store.accounts().account_exists(AccountId(id)).await?
    {
        errors.add("user", invalid_pk(id));
    }
    Ok(())
}

#[utoipa::path(
    delete,
    path = "/api/user-profiles/{id}/",
    params(("id" = i64, Path, description = "Profile ID")),
    responses(
        (status = 204, description = "Profile deleted"),
        (status = 404, description = "Not found or not owned by the caller", body = crate::dto::ErrorResponse),
        (status = 401, description = "Unauthorized", body = crate::dto::ErrorResponse),
    ),
    security(("bearer" = [])),
    tag = "user-profiles"
)]
pub async fn delete_profile<S: Store>(
    State(state): State<Arc<AppState<S>>>,
    Extension(caller): Extension<Caller>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let id = parse_id(&id)?;
    if !state.store.profiles().delete_profile(caller.id, id).await? {
        return Err(AppError::not_found().into());
    }
    Ok(StatusCode::NO_CONTENT)
}

// ---------------------------------------------------------------------------
// Accounts
// ---------------------------------------------------------------------------

#[utoipa::path(
    post,
    path = "/api/signup/",
    request_body = CredentialsRequest,
    responses(
        (status = 201, description = "Account created", body = TokenResponse),
        (status = 400, description = "Missing fields or username taken", body = crate::dto::ErrorResponse),
    ),
    tag = "accounts"
)]
pub async fn signup<S: Store>(
    State(state): State<Arc<AppState<S>>>,
    ApiJson(body): ApiJson<CredentialsRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let (username, password) = body.signup_parts();
    let token = AuthService::new(state.store.accounts())
        .signup(username, password)
        .await?;
    Ok((StatusCode::CREATED, Json(TokenResponse { token })))
}

/// Also mounted at `/api/token-auth/`.
#[utoipa::path(
    post,
    path = "/api/login/",
    request_body = CredentialsRequest,
    responses(
        (status = 200, description = "Token for the account", body = TokenResponse),
        (status = 400, description = "Missing fields or bad credentials", body = crate::dto::ErrorResponse),
    ),
    tag = "accounts"
)]
pub async fn login<S: Store>(
    State(state): State<Arc<AppState<S>>>,
    ApiJson(body): ApiJson<CredentialsRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let (username, password) = body.into_login_parts()?;
    let token = AuthService::new(state.store.accounts())
        .login(&username, &password)
        .await?;
    Ok(Json(TokenResponse { token }))
}

// ---------------------------------------------------------------------------
// System
// ---------------------------------------------------------------------------

#[utoipa::path(
    get,
    path = "/api/",
    responses(
        (status = 200, description = "Collection URLs", body = ApiRootResponse),
        (status = 401, description = "Unauthorized", body = crate::dto::ErrorResponse),
    ),
    security(("bearer" = [])),
    tag = "system"
)]
pub async fn api_root(headers: HeaderMap) -> impl IntoResponse {
    let host = headers
        .get(HOST)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("localhost");
    let base = format!("http://{host}/api");

    Json(ApiRootResponse {
        buildings: format!("{base}/buildings/"),
        plds: format!("{base}/plds/"),
        user_profiles: format!("{base}/user-profiles/"),
    })
}

#[utoipa::path(
    get,
    path = "/health",
    responses(
        (status = 200, description = "Service is healthy", body = HealthResponse),
        (status = 503, description = "Store unreachable", body = HealthResponse),
    ),
    tag = "system"
)]
pub async fn health<S: Store>(State(state): State<Arc<AppState<S>>>) -> impl IntoResponse {
    let db_status = match state.store.health_check().await {
        Ok(()) => "ok",
        Err(err) => {
            tracing::error!(error = %err, "Health check failed");
            "error"
        }
    };

    let status = if db_status == "ok" {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    let response = HealthResponse {
        status: if db_status == "ok" {
            "healthy"
        } else {
            "unhealthy"
        },
        database: db_status,
    };

    (status, Json(response))
}
