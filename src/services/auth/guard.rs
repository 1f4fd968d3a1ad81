//! The guard capability: what a request-bound authentication backend can answer.
use std::collections::HashMap;

use async_trait::async_trait;
use serde::Serialize;
use thiserror::Error;
use uuid::Uuid;

use crate::repos::error::RepoError;
use crate::services::cache::CacheError;

/// Errors surfaced by guards and guard resolution.
///
/// The resolver never wraps or translates these; whatever a guard returns
/// reaches the caller as-is.
#[derive(Debug, Error)]
pub enum GuardError {
    #[error("guard specification is missing")]
    MissingGuards,

    #[error("auth guard [{0}] is not defined")]
    UnknownGuard(String),

    #[error("user store error: {0}")]
    UserStore(#[from] RepoError),

    #[error(transparent)]
    Session(#[from] CacheError),
}

pub type GuardResult<T> = Result<T, GuardError>;

/// The authenticated principal as seen by handlers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AuthUser {
    pub id: Uuid,
    pub name: String,
    pub email: String,
}

/// Credentials handed to `Guard::validate`, keyed by field name (ex: `api_token`).
pub type CredentialMap = HashMap<String, String>;

/// Raw credentials found on the incoming request.
///
/// Extraction only; nothing here has been verified yet.
#[derive(Debug, Clone, Default)]
pub struct Credentials {
    pub bearer_token: Option<String>,
    pub query_api_token: Option<String>,
    pub session_id: Option<String>,
}

/// A guard bound to one request.
///
/// Implementations may cache the looked-up user for the rest of the request,
/// so calling `check()` and then `user()` costs a single lookup.
#[async_trait]
pub trait Guard: Send + Sync {
    async fn check(&self) -> GuardResult<bool> {
        Ok(self.user().await?.is_some())
    }

    async fn guest(&self) -> GuardResult<bool> {
        Ok(!self.check().await?)
    }

    async fn user(&self) -> GuardResult<Option<AuthUser>>;

    async fn id(&self) -> GuardResult<Option<Uuid>> {
        Ok(self.user().await?.map(|u| u.id))
    }

    // Only token-based guards carry one.
    async fn token(&self) -> GuardResult<Option<String>> {
        Ok(None)
    }

    /// Validate credentials without attaching a user to the request.
    async fn validate(&self, credentials: &CredentialMap) -> GuardResult<bool>;
}
