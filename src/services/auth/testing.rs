//! Test doubles shared by guard and router tests.
use std::collections::HashMap;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use uuid::Uuid;

use crate::repos::error::RepoError;
use crate::services::auth::{AuthUser, UserProvider};

pub fn user(name: &str) -> AuthUser {
    AuthUser {
        id: Uuid::new_v4(),
        name: name.to_string(),
        email: format!("{name}@example.com"),
    }
}

/// In-memory users table: `id -> (user, api_token)`.
#[derive(Default)]
pub struct MemoryUsers {
    users: Mutex<HashMap<Uuid, (AuthUser, Option<String>)>>,
    lookups: AtomicUsize,
    broken: bool,
}

impl MemoryUsers {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every lookup fails with a db error.
    pub fn broken() -> Self {
        Self {
            broken: true,
            ..Self::default()
        }
    }

    pub fn insert(&self, user: AuthUser, api_token: Option<&str>) {
        self.users
            .lock()
            .unwrap()
            .insert(user.id, (user, api_token.map(str::to_string)));
    }

    pub fn lookups(&self) -> usize {
        self.lookups.load(Ordering::SeqCst)
    }

    fn begin_lookup(&self) -> Result<(), RepoError> {
        self.lookups.fetch_add(1, Ordering::SeqCst);
        if self.broken {
            return Err(RepoError::Db(sqlx::Error::PoolTimedOut));
        }
        Ok(())
    }
}

#[async_trait]
impl UserProvider for MemoryUsers {
    async fn retrieve_by_id(&self, id: Uuid) -> Result<Option<AuthUser>, RepoError> {
        self.begin_lookup()?;
        Ok(self.users.lock().unwrap().get(&id).map(|(u, _)| u.clone()))
    }

    async fn retrieve_by_token(&self, token: &str) -> Result<Option<AuthUser>, RepoError> {
        self.begin_lookup()?;
        Ok(self
            .users
            .lock()
            .unwrap()
            .values()
            .find(|(_, t)| t.as_deref() == Some(token))
            .map(|(u, _)| u.clone()))
    }
}
