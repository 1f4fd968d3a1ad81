/*
 * Responsibility
 * - Router に紐づける共有コンテキスト (AppState)
 *   - auth: guard レジストリ, guards: /me で使う guard の優先順
 * - Clone 前提で持つ (内部は Arc/Clone cheap)
 */
use std::sync::Arc;

use crate::services::auth::{AuthManager, GuardResolver};

#[derive(Clone, Debug)]
pub struct AppState {
    pub auth: Arc<AuthManager>,
    pub guards: GuardResolver,
    pub session_cookie: Arc<str>,
}

impl AppState {
    pub fn new(auth: Arc<AuthManager>, guards: GuardResolver, session_cookie: &str) -> Self {
        Self {
            auth,
            guards,
            session_cookie: Arc::from(session_cookie),
        }
    }
}
