//! `web` guard: authenticates with a session cookie.
//!
//! The cookie holds an opaque session id; `{prefix}:{session_id}` in the
//! session cache maps it to the user's UUID. Sessions are created elsewhere
//! (login lives outside this service), so this guard only reads.
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::OnceCell;
use uuid::Uuid;

use crate::services::auth::guard::{AuthUser, CredentialMap, Credentials, Guard, GuardResult};
use crate::services::auth::provider::GuardDriver;
use crate::services::auth::user_provider::UserProvider;
use crate::services::cache::CacheClient;

#[derive(Clone)]
pub struct SessionGuardDriver<C: CacheClient> {
    sessions: C,
    users: Arc<dyn UserProvider>,
    prefix: String,
}

impl<C: CacheClient> SessionGuardDriver<C> {
    pub fn new(sessions: C, users: Arc<dyn UserProvider>, prefix: impl Into<String>) -> Self {
        Self {
            sessions,
            users,
            prefix: prefix.into(),
        }
    }
}

impl<C: CacheClient> GuardDriver for SessionGuardDriver<C> {
    fn bind(&self, credentials: &Credentials) -> Arc<dyn Guard> {
        let key = credentials
            .session_id
            .as_deref()
            .filter(|id| !id.is_empty())
            .map(|id| format!("{}:{}", self.prefix, id));

        Arc::new(SessionGuard {
            sessions: self.sessions.clone(),
            users: Arc::clone(&self.users),
            key,
            user: OnceCell::new(),
        })
    }
}

pub struct SessionGuard<C: CacheClient> {
    sessions: C,
    users: Arc<dyn UserProvider>,
    key: Option<String>,
    user: OnceCell<Option<AuthUser>>,
}

impl<C: CacheClient> SessionGuard<C> {
    async fn load(&self, key: &str) -> GuardResult<Option<AuthUser>> {
        let Some(raw) = self.sessions.get_string(key).await? else {
            tracing::debug!(backend = self.sessions.backend_name(), "session not found");
            return Ok(None);
        };

        let Ok(user_id) = Uuid::parse_str(raw.trim()) else {
            tracing::warn!(
                backend = self.sessions.backend_name(),
                "session entry does not hold a user id"
            );
            return Ok(None);
        };

        Ok(self.users.retrieve_by_id(user_id).await?)
    }
}

#[async_trait]
impl<C: CacheClient> Guard for SessionGuard<C> {
    async fn user(&self) -> GuardResult<Option<AuthUser>> {
        let user = self
            .user
            .get_or_try_init(|| async {
                match self.key.as_deref() {
                    Some(key) => self.load(key).await,
                    None => Ok(None),
                }
            })
            .await?;

        Ok(user.clone())
    }

    // Session guards cannot check credentials on their own.
    async fn validate(&self, _credentials: &CredentialMap) -> GuardResult<bool> {
        Ok(false)
    }
}
