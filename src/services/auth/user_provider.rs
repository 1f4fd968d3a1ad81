use async_trait::async_trait;
use uuid::Uuid;

use crate::repos::error::RepoError;
use crate::services::auth::guard::AuthUser;

/// Where guards load users from.
///
/// `PgUserRepo` is the real one; tests plug in an in-memory map.
#[async_trait]
pub trait UserProvider: Send + Sync {
    async fn retrieve_by_id(&self, id: Uuid) -> Result<Option<AuthUser>, RepoError>;

    /// `token` is compared against `users.api_token` as stored (hashed or not).
    async fn retrieve_by_token(&self, token: &str) -> Result<Option<AuthUser>, RepoError>;
}
