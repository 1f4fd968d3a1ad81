//! `api` guard: authenticates with the `users.api_token` column.
//!
//! Token lookup order on the request:
//! 1. `?api_token=...` query parameter
//! 2. `Authorization: Bearer ...`
//!
//! Empty values are skipped. With hashing enabled the column holds
//! `sha256(token)` as lowercase hex and the presented token is hashed before
//! lookup.
use std::sync::Arc;

use async_trait::async_trait;
use sha2::{Digest, Sha256};
use tokio::sync::OnceCell;

use crate::services::auth::guard::{AuthUser, CredentialMap, Credentials, Guard, GuardResult};
use crate::services::auth::provider::GuardDriver;
use crate::services::auth::user_provider::UserProvider;

/// Credential field (and column) the token guard validates against.
pub const API_TOKEN_FIELD: &str = "api_token";

#[derive(Clone)]
pub struct TokenGuardDriver {
    users: Arc<dyn UserProvider>,
    hash: bool,
}

impl TokenGuardDriver {
    pub fn new(users: Arc<dyn UserProvider>, hash: bool) -> Self {
        Self { users, hash }
    }
}

impl GuardDriver for TokenGuardDriver {
    fn bind(&self, credentials: &Credentials) -> Arc<dyn Guard> {
        let token = non_empty(credentials.query_api_token.as_deref())
            .or_else(|| non_empty(credentials.bearer_token.as_deref()))
            .map(str::to_string);

        Arc::new(TokenGuard {
            users: Arc::clone(&self.users),
            hash: self.hash,
            token,
            user: OnceCell::new(),
        })
    }
}

pub struct TokenGuard {
    users: Arc<dyn UserProvider>,
    hash: bool,
    token: Option<String>,
    user: OnceCell<Option<AuthUser>>,
}

impl TokenGuard {
    async fn lookup(&self, token: &str) -> GuardResult<Option<AuthUser>> {
        let stored = if self.hash {
            hash_token(token)
        } else {
            token.to_string()
        };

        Ok(self.users.retrieve_by_token(&stored).await?)
    }
}

#[async_trait]
impl Guard for TokenGuard {
    async fn user(&self) -> GuardResult<Option<AuthUser>> {
        let user = self
            .user
            .get_or_try_init(|| async {
                match self.token.as_deref() {
                    Some(token) => self.lookup(token).await,
                    None => Ok(None),
                }
            })
            .await?;

        Ok(user.clone())
    }

    async fn token(&self) -> GuardResult<Option<String>> {
        Ok(self.token.clone())
    }

    async fn validate(&self, credentials: &CredentialMap) -> GuardResult<bool> {
        let Some(token) = non_empty(credentials.get(API_TOKEN_FIELD).map(String::as_str)) else {
            return Ok(false);
        };

        Ok(self.lookup(token).await?.is_some())
    }
}

/// sha256(token) as lowercase hex, the stored form when hashing is on.
pub fn hash_token(token: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(token.as_bytes());
    format!("{:x}", hasher.finalize())
}

fn non_empty(s: Option<&str>) -> Option<&str> {
    s.filter(|s| !s.is_empty())
}
