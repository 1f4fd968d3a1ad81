/*
 * Responsibility
 * - v1 の URL 構造を定義
 * - /health は guard を参照しない、/me と /auth/status は GuardResolver で解決する
 */
use axum::{Router, routing::get};

use crate::state::AppState;

use crate::api::v1::handlers::{
    health::health,
    me::{auth_status, me},
};

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(health))
        .route("/me", get(me))
        .route("/auth/status", get(auth_status))
}
