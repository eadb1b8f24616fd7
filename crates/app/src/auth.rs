//! Admin authentication: login and bearer-token storage.
//!
//! Authentication *design* is out of scope. The client simply exchanges
//! credentials for a token, persists it, and attaches it to admin calls.
//! No refresh, no expiry handling.

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use zeroize::Zeroize;

use crate::api::{ApiError, OrderingApi};
use crate::storage::{ClientStorage, StorageError, TOKEN_FILE};

/// Bearer token for admin calls. Redacts itself from `Debug` output and
/// zeroizes its memory on drop.
#[derive(Clone, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AccessToken(String);

impl AccessToken {
    /// Wraps a raw token string.
    #[must_use]
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    /// The raw token, for the `Authorization` header.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for AccessToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("AccessToken(**redacted**)")
    }
}

impl Drop for AccessToken {
    fn drop(&mut self) {
        self.0.zeroize();
    }
}

/// Persisted shape of the token document.
#[derive(Debug, Serialize, Deserialize)]
struct StoredToken {
    access_token: AccessToken,
}

/// Login workflow over the ordering API plus the token mirror in durable
/// storage.
pub struct AuthService<'a> {
    api: &'a dyn OrderingApi,
    storage: &'a ClientStorage,
}

impl<'a> AuthService<'a> {
    /// Builds the service on an API handle and the storage directory.
    #[must_use]
    pub fn new(api: &'a dyn OrderingApi, storage: &'a ClientStorage) -> Self {
        Self { api, storage }
    }

    /// Exchanges credentials for a bearer token and persists it.
    ///
    /// # Errors
    ///
    /// Returns an error when the API rejects the credentials or the token
    /// cannot be persisted.
    pub async fn login(&self, username: &str, password: &str) -> Result<AccessToken, AuthError> {
        let token = self.api.login(username, password).await?;
        let token = AccessToken::new(token);

        self.storage.write(
            TOKEN_FILE,
            &StoredToken {
                access_token: token.clone(),
            },
        )?;

        Ok(token)
    }

    /// The persisted token, if an admin has logged in on this client.
    #[must_use]
    pub fn token(&self) -> Option<AccessToken> {
        stored_token(self.storage)
    }

    /// Forgets the persisted token.
    ///
    /// # Errors
    ///
    /// Returns an error when the token document cannot be removed.
    pub fn logout(&self) -> Result<(), StorageError> {
        self.storage.remove(TOKEN_FILE)
    }
}

/// The token persisted on this client, if an admin has logged in.
#[must_use]
pub fn stored_token(storage: &ClientStorage) -> Option<AccessToken> {
    storage
        .read::<StoredToken>(TOKEN_FILE)
        .map(|stored| stored.access_token)
}

/// Errors from the login workflow.
#[derive(Debug, Error)]
pub enum AuthError {
    /// The API rejected the request.
    #[error(transparent)]
    Api(#[from] ApiError),

    /// The token could not be persisted.
    #[error(transparent)]
    Storage(#[from] StorageError),
}
