/*
 * Responsibility
 * - GET /health (疎通用)
 * - guard は resolve しないので session store / DB が落ちていても 200
 */
use axum::{Json, http::StatusCode, response::IntoResponse};
use serde_json::json;

pub async fn health() -> impl IntoResponse {
    (
        StatusCode::OK,
        Json(json!({"status": "ok", "service": env!("CARGO_PKG_NAME")})),
    )
}
