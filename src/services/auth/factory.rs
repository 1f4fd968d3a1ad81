/// Factory: build the guard registry (`AuthManager`) from application `Config`.
use std::sync::Arc;

use crate::config::Config;
use crate::services::auth::session_guard::SessionGuardDriver;
use crate::services::auth::token_guard::TokenGuardDriver;
use crate::services::auth::{AuthManager, UserProvider};
use crate::services::cache::CacheClient;

pub const WEB_GUARD: &str = "web";
pub const API_GUARD: &str = "api";

pub fn build_auth_manager<C: CacheClient>(
    config: &Config,
    sessions: C,
    users: Arc<dyn UserProvider>,
) -> Arc<AuthManager> {
    let web = SessionGuardDriver::new(sessions, Arc::clone(&users), config.session_key_prefix.clone());
    let api = TokenGuardDriver::new(users, config.api_token_hash);

    Arc::new(
        AuthManager::new()
            .with_guard(WEB_GUARD, Arc::new(web))
            .with_guard(API_GUARD, Arc::new(api)),
    )
}
