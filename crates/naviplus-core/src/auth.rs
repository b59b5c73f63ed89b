//! Account signup, login, and token authentication.

use argon2::password_hash::rand_core::{OsRng, RngCore};

use crate::error::AppError;
use crate::models::{Account, NewAccount};
use crate::password::{
    hash_password_blocking, verify_dummy_password_blocking, verify_password_blocking,
};
use crate::traits::AccountStore;

pub const MISSING_FIELDS: &str = "Username and password are required.";
pub const USERNAME_TAKEN: &str = "Username already exists.";
pub const NOT_PROVIDED: &str = "Authentication credentials were not provided.";
pub const INVALID_TOKEN: &str = "Invalid token.";
pub const INACTIVE_ACCOUNT: &str = "User inactive or deleted.";

/// Length of a token key in hex characters.
pub const TOKEN_KEY_LEN: usize = 40;

/// Generate a fresh opaque token key: 20 random bytes as lowercase hex.
pub fn generate_token_key() -> String {
    let mut bytes = [0u8; TOKEN_KEY_LEN / 2];
    OsRng.fill_bytes(&mut bytes);
    bytes.iter().map(|b| format!("{b:02x}")).collect()
}

/// Extract the token key from an `Authorization` header value.
///
/// Accepts `Token <key>` and `Bearer <key>`, keyword case-insensitive.
/// Any other scheme is treated as if no credentials were sent.
pub fn parse_authorization(header: &str) -> Result<&str, AppError> {
    let mut parts = header.split_whitespace();
    let keyword = parts.next().unwrap_or_default();
    if !keyword.eq_ignore_ascii_case("token") && !keyword.eq_ignore_ascii_case("bearer") {
        return Err(AppError::Unauthorized(NOT_PROVIDED.to_string()));
    }

    match (parts.next(), parts.next()) {
        (Some(key), None) => Ok(key),
        (None, _) => Err(AppError::Unauthorized(
            "Invalid token header. No credentials provided.".to_string(),
        )),
        (Some(_), Some(_)) => Err(AppError::Unauthorized(
            "Invalid token header. Token string should not contain spaces.".to_string(),
        )),
    }
}

/// Signup, login, and token lookup over an [`AccountStore`].
pub struct AuthService<A: AccountStore> {
    accounts: A,
}

impl<A: AccountStore> AuthService<A> {
    pub fn new(accounts: A) -> Self {
        Self { accounts }
    }

    /// Register an account and return its token key.
    ///
    /// Presence is checked before uniqueness; an empty string counts as missing.
    pub async fn signup(
        &self,
        username: Option<&str>,
        password: Option<&str>,
    ) -> Result<String, AppError> {
        let (username, password) = match (username, password) {
            (Some(u), Some(p)) if !u.is_empty() && !p.is_empty() => (u, p),
            _ => return Err(AppError::BadRequest(MISSING_FIELDS.to_string())),
        };

        if self
            .accounts
            .find_account_by_username(username)
            .await?
            .is_some()
        {
            return Err(AppError::BadRequest(USERNAME_TAKEN.to_string()));
        }

        let password_hash = hash_password_blocking(password.to_string()).await?;
        let new_account = NewAccount {
            username: username.to_string(),
            password_hash,
        };

        // A concurrent signup may have claimed the name since the check above.
        let token = generate_token_key();
        let account = self
            .accounts
            .create_account(&new_account, &token)
            .await?
            .ok_or_else(|| AppError::BadRequest(USERNAME_TAKEN.to_string()))?;
        tracing::info!(account_id = %account.id, "Account created");

        Ok(token)
    }

    /// Exchange credentials for the account's token.
    ///
    /// Unknown username, wrong password, and inactive account all fail the same way.
    pub async fn login(&self, username: &str, password: &str) -> Result<String, AppError> {
        let Some(account) = self.accounts.find_account_by_username(username).await? else {
            // Pay for one hash anyway so timing does not reveal which usernames exist.
            verify_dummy_password_blocking(password.to_string()).await?;
            tracing::warn!("Login rejected");
            return Err(AppError::InvalidCredentials);
        };

        let matches =
            verify_password_blocking(password.to_string(), account.password_hash.clone()).await?;
        if !matches || !account.is_active {
            tracing::warn!(account_id = %account.id, "Login rejected");
            return Err(AppError::InvalidCredentials);
        }

        self.accounts
            .get_or_create_token(account.id, &generate_token_key())
            .await
    }

    /// Resolve a token key to its active account.
    pub async fn authenticate(&self, key: &str) -> Result<Account, AppError> {
        match self.accounts.find_account_by_token(key).await? {
            Some(account) if account.is_active => Ok(account),
            Some(account) => {
                tracing::warn!(account_id = %account.id, "Token of inactive account rejected");
                Err(AppError::Unauthorized(INACTIVE_ACCOUNT.to_string()))
            }
            None => Err(AppError::Unauthorized(INVALID_TOKEN.to_string())),
        }
    }
}
