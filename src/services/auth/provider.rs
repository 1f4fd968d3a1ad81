//! Named guard registry and the per-request `guard(name)` accessor.
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use crate::services::auth::guard::{Credentials, Guard, GuardError, GuardResult};

/// Builds a request-bound guard from the credentials found on a request.
pub trait GuardDriver: Send + Sync {
    fn bind(&self, credentials: &Credentials) -> Arc<dyn Guard>;
}

/// Lookup of request-bound guards by name.
pub trait GuardProvider: Send + Sync {
    fn guard(&self, name: &str) -> GuardResult<Arc<dyn Guard>>;
}

/// Process-level registry of guard drivers, shared through `AppState`.
#[derive(Clone, Default)]
pub struct AuthManager {
    drivers: HashMap<String, Arc<dyn GuardDriver>>,
}

impl std::fmt::Debug for AuthManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut names: Vec<&str> = self.guard_names().collect();
        names.sort_unstable();
        f.debug_struct("AuthManager").field("guards", &names).finish()
    }
}

impl AuthManager {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_guard(mut self, name: impl Into<String>, driver: Arc<dyn GuardDriver>) -> Self {
        self.drivers.insert(name.into(), driver);
        self
    }

    pub fn has_guard(&self, name: &str) -> bool {
        self.drivers.contains_key(name)
    }

    pub fn guard_names(&self) -> impl Iterator<Item = &str> {
        self.drivers.keys().map(String::as_str)
    }

    pub fn for_request(self: &Arc<Self>, credentials: Credentials) -> RequestGuards {
        RequestGuards {
            manager: Arc::clone(self),
            credentials,
            bound: Mutex::new(HashMap::new()),
        }
    }
}

/// Guards bound to one request.
///
/// Each guard is bound at most once per request, so whatever it caches
/// (the looked-up user) survives across `check()` / `user()` calls.
pub struct RequestGuards {
    manager: Arc<AuthManager>,
    credentials: Credentials,
    bound: Mutex<HashMap<String, Arc<dyn Guard>>>,
}

impl std::fmt::Debug for RequestGuards {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RequestGuards")
            .field("manager", &self.manager)
            .finish_non_exhaustive()
    }
}

impl RequestGuards {
    pub fn credentials(&self) -> &Credentials {
        &self.credentials
    }
}

impl GuardProvider for RequestGuards {
    fn guard(&self, name: &str) -> GuardResult<Arc<dyn Guard>> {
        let mut bound = self.bound.lock().unwrap_or_else(|e| e.into_inner());

        if let Some(guard) = bound.get(name) {
            return Ok(Arc::clone(guard));
        }

        let driver = self
            .manager
            .drivers
            .get(name)
            .ok_or_else(|| GuardError::UnknownGuard(name.to_string()))?;

        let guard = driver.bind(&self.credentials);
        bound.insert(name.to_string(), Arc::clone(&guard));
        Ok(guard)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use async_trait::async_trait;

    use super::*;
    use crate::services::auth::guard::{AuthUser, CredentialMap};

    struct NullGuard;

    #[async_trait]
    impl Guard for NullGuard {
        async fn user(&self) -> GuardResult<Option<AuthUser>> {
            Ok(None)
        }

        async fn validate(&self, _credentials: &CredentialMap) -> GuardResult<bool> {
            Ok(false)
        }
    }

    #[derive(Default)]
    struct CountingDriver {
        binds: AtomicUsize,
    }

    impl GuardDriver for CountingDriver {
        fn bind(&self, _credentials: &Credentials) -> Arc<dyn Guard> {
            self.binds.fetch_add(1, Ordering::SeqCst);
            Arc::new(NullGuard)
        }
    }

    #[test]
    fn guard_is_bound_once_per_request() {
        let driver = Arc::new(CountingDriver::default());
        let manager = Arc::new(AuthManager::new().with_guard("web", driver.clone()));

        let guards = manager.for_request(Credentials::default());
        guards.guard("web").unwrap();
        guards.guard("web").unwrap();
        assert_eq!(driver.binds.load(Ordering::SeqCst), 1);

        // a new request binds again
        manager.for_request(Credentials::default()).guard("web").unwrap();
        assert_eq!(driver.binds.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn request_keeps_its_credentials() {
        let manager = Arc::new(AuthManager::new());
        let guards = manager.for_request(Credentials {
            session_id: Some("abc".into()),
            ..Credentials::default()
        });

        assert_eq!(guards.credentials().session_id.as_deref(), Some("abc"));
        assert!(guards.credentials().bearer_token.is_none());
    }

    #[test]
    fn unknown_guard_is_an_error() {
        let manager = Arc::new(AuthManager::new());
        let err = manager
            .for_request(Credentials::default())
            .guard("admin")
            .err()
            .unwrap();

        assert!(matches!(err, GuardError::UnknownGuard(ref name) if name == "admin"));
        assert_eq!(err.to_string(), "auth guard [admin] is not defined");
    }
}
