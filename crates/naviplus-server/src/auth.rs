use std::sync::Arc;

use axum::extract::{Request, State};
use axum::http::header::AUTHORIZATION;
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};

use naviplus_core::auth::{NOT_PROVIDED, parse_authorization};
use naviplus_core::error::AppError;
use naviplus_core::models::{Account, AccountId};
use naviplus_core::{AuthService, Store};

use crate::error::ApiError;
use crate::state::AppState;

/// The authenticated account, inserted into request extensions by [`require_token`].
#[derive(Clone, Debug)]
pub struct Caller {
    pub id: AccountId,
    pub username: String,
}

impl From<Account> for Caller {
    fn from(account: Account) -> Self {
        Self {
            id: account.id,
            username: account.username,
        }
    }
}

/// Middleware that resolves `Authorization: Token <key>` to an active account.
pub async fn require_token<S: Store>(
    State(state): State<Arc<AppState<S>>>,
    mut request: Request,
    next: Next,
) -> Response {
    let header = request
        .headers()
        .get(AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .map(str::to_owned);

    match authenticate(&state.store, header.as_deref()).await {
        Ok(caller) => {
            request.extensions_mut().insert(caller);
            next.run(request).await
        }
        Err(err) => {
            tracing::warn!(path = %request.uri().path(), error = %err, "Rejected request");
            ApiError(err).into_response()
        }
    }
}

async fn authenticate<S: Store>(store: &S, header: Option<&str>) -> Result<Caller, AppError> {
    let header = header.ok_or_else(|| AppError::Unauthorized(NOT_PROVIDED.to_string()))?;
    let key = parse_authorization(header)?;
    let account = AuthService::new(store.accounts()).authenticate(key).await?;
    Ok(account.into())
}
