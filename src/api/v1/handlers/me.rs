/*
 * Responsibility
 * - GET /me: 設定された guard 順で最初に認証済みの guard のユーザーを返す
 * - GET /auth/status: 同じ解決を行うが、未認証でも 200 で返す
 * - guard が一つも解決しない場合の扱い (401 か否か) はここで決める
 */
use axum::{Json, extract::State};

use crate::{
    api::v1::{
        dto::users::{AuthStatusResponse, MeResponse},
        extractors::AuthCtxExtractor,
    },
    error::AppError,
    state::AppState,
};

pub async fn me(
    State(state): State<AppState>,
    AuthCtxExtractor(auth): AuthCtxExtractor,
) -> Result<Json<MeResponse>, AppError> {
    let resolved = state
        .guards
        .resolve(auth.guards())
        .await?
        .ok_or(AppError::Unauthorized)?;

    // check() passed, so the guard has a user cached for this request
    let user = resolved.guard.user().await?.ok_or(AppError::Unauthorized)?;

    Ok(Json(MeResponse {
        guard: resolved.name.to_string(),
        user: user.into(),
    }))
}

pub async fn auth_status(
    State(state): State<AppState>,
    AuthCtxExtractor(auth): AuthCtxExtractor,
) -> Result<Json<AuthStatusResponse>, AppError> {
    let res = match state.guards.resolve(auth.guards()).await? {
        Some(resolved) => AuthStatusResponse {
            authenticated: true,
            user_id: resolved.guard.id().await?,
            guard: Some(resolved.name.to_string()),
        },
        None => AuthStatusResponse {
            authenticated: false,
            guard: None,
            user_id: None,
        },
    };

    Ok(Json(res))
}
