//! Multi-guard resolution.
//!
//! `auth_guards("web,api").user(&guards)` answers with the user of the first
//! guard in the list that is authenticated. Order is priority: with both a
//! session and a token present, `"web,api"` prefers the session.
//!
//! When no guard is authenticated every call returns `Ok(None)`. That is not
//! an error; handlers decide whether "nobody" means 401.
use std::sync::Arc;

use uuid::Uuid;

use crate::services::auth::guard::{AuthUser, CredentialMap, Guard, GuardError, GuardResult};
use crate::services::auth::guard_list::{GuardList, GuardName, GuardSpec};
use crate::services::auth::provider::GuardProvider;

/// Operations that can be forwarded to the resolved guard.
#[derive(Debug, Clone)]
pub enum GuardCall {
    Check,
    Guest,
    User,
    Id,
    Token,
    Validate(CredentialMap),
}

/// Result of a forwarded `GuardCall`, passed through untouched.
#[derive(Debug, Clone, PartialEq)]
pub enum GuardValue {
    Bool(bool),
    User(Option<AuthUser>),
    Id(Option<Uuid>),
    Token(Option<String>),
}

/// The first authenticated guard of a list.
#[derive(Clone)]
pub struct ResolvedGuard {
    pub name: GuardName,
    pub guard: Arc<dyn Guard>,
}

impl std::fmt::Debug for ResolvedGuard {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ResolvedGuard")
            .field("name", &self.name)
            .finish_non_exhaustive()
    }
}

/// Build a resolver from a guard specification.
///
/// `None` is the only input rejected here. An empty list is accepted and
/// simply never resolves.
pub fn auth_guards<S: Into<GuardSpec>>(spec: Option<S>) -> GuardResult<GuardResolver> {
    let spec = spec.ok_or(GuardError::MissingGuards)?;
    Ok(GuardResolver::new(GuardList::from(spec.into())))
}

/// Stateless resolver over an ordered guard list.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GuardResolver {
    guards: GuardList,
}

impl GuardResolver {
    pub fn new(guards: GuardList) -> Self {
        Self { guards }
    }

    pub fn guards(&self) -> &GuardList {
        &self.guards
    }

    /// Find the first authenticated guard.
    ///
    /// Guards are checked one at a time; the scan stops at the first `true`
    /// or at the first error.
    pub async fn resolve<P>(&self, provider: &P) -> GuardResult<Option<ResolvedGuard>>
    where
        P: GuardProvider + ?Sized,
    {
        for name in &self.guards {
            let guard = provider.guard(name.as_str())?;
            if guard.check().await? {
                tracing::debug!(guard = %name, "guard resolved");
                return Ok(Some(ResolvedGuard {
                    name: name.clone(),
                    guard,
                }));
            }
        }

        tracing::debug!(guards = %self.guards, "no authenticated guard");
        Ok(None)
    }

    /// Forward `call` to the first authenticated guard.
    pub async fn invoke<P>(&self, provider: &P, call: GuardCall) -> GuardResult<Option<GuardValue>>
    where
        P: GuardProvider + ?Sized,
    {
        let Some(resolved) = self.resolve(provider).await? else {
            return Ok(None);
        };

        let guard = resolved.guard.as_ref();
        let value = match call {
            GuardCall::Check => GuardValue::Bool(guard.check().await?),
            GuardCall::Guest => GuardValue::Bool(guard.guest().await?),
            GuardCall::User => GuardValue::User(guard.user().await?),
            GuardCall::Id => GuardValue::Id(guard.id().await?),
            GuardCall::Token => GuardValue::Token(guard.token().await?),
            GuardCall::Validate(credentials) => GuardValue::Bool(guard.validate(&credentials).await?),
        };

        Ok(Some(value))
    }

    pub async fn check<P>(&self, provider: &P) -> GuardResult<Option<bool>>
    where
        P: GuardProvider + ?Sized,
    {
        let value = self.invoke(provider, GuardCall::Check).await?;
        Ok(expect_bool("check", value))
    }

    pub async fn user<P>(&self, provider: &P) -> GuardResult<Option<AuthUser>>
    where
        P: GuardProvider + ?Sized,
    {
        let value = self.invoke(provider, GuardCall::User).await?;
        Ok(expect_user(value))
    }

    pub async fn id<P>(&self, provider: &P) -> GuardResult<Option<Uuid>>
    where
        P: GuardProvider + ?Sized,
    {
        match self.invoke(provider, GuardCall::Id).await? {
            None => Ok(None),
            Some(GuardValue::Id(id)) => Ok(id),
            Some(other) => Ok(mismatched("id", &other)),
        }
    }

    pub async fn token<P>(&self, provider: &P) -> GuardResult<Option<String>>
    where
        P: GuardProvider + ?Sized,
    {
        match self.invoke(provider, GuardCall::Token).await? {
            None => Ok(None),
            Some(GuardValue::Token(token)) => Ok(token),
            Some(other) => Ok(mismatched("token", &other)),
        }
    }

    pub async fn validate<P>(
        &self,
        provider: &P,
        credentials: CredentialMap,
    ) -> GuardResult<Option<bool>>
    where
        P: GuardProvider + ?Sized,
    {
        let value = self.invoke(provider, GuardCall::Validate(credentials)).await?;
        Ok(expect_bool("validate", value))
    }
}

impl GuardValue {
    fn kind(&self) -> &'static str {
        match self {
            GuardValue::Bool(_) => "bool",
            GuardValue::User(_) => "user",
            GuardValue::Id(_) => "id",
            GuardValue::Token(_) => "token",
        }
    }
}

fn expect_bool(call: &'static str, value: Option<GuardValue>) -> Option<bool> {
    match value {
        None => None,
        Some(GuardValue::Bool(b)) => Some(b),
        Some(other) => mismatched(call, &other),
    }
}

fn expect_user(value: Option<GuardValue>) -> Option<AuthUser> {
    match value {
        None => None,
        Some(GuardValue::User(user)) => user,
        Some(other) => mismatched("user", &other),
    }
}

// `invoke` maps each call to one variant; anything else is a bug there.
fn mismatched<T>(call: &'static str, value: &GuardValue) -> Option<T> {
    tracing::error!(call, got = value.kind(), "guard call produced a mismatched value");
    None
}
