//! リクエストの credentials を抽出 → AuthCtx (RequestGuards) を extensions に入れる
//!
//! - ここでは検証しない。guard は遅延で bind され、handler が resolve した時に初めて
//!   session store / users テーブルを参照する。
//! - 認証が必須かどうかは handler 側で決める (guard 未解決 = 401 とするか等)

use axum::{
    Router,
    body::Body,
    extract::State,
    http::Request,
    middleware::{self, Next},
    response::Response,
};

use crate::api::v1::extractors::AuthCtx;
use crate::middleware::auth::credentials;
use crate::state::AppState;

/// `/api/v1/*` に guard を掛けるための middleware を適用する。
///
/// 例：
/// ```ignore
/// let v1 = api::v1::routes();
/// let v1 = middleware::auth::access::apply(v1, state.clone());
/// app = app.nest("/api/v1", v1);
/// ```
pub fn apply(router: Router<AppState>, state: AppState) -> Router<AppState> {
    // axum 0.8 の from_fn は State extractor を受け取れないため、`from_fn_with_state` で明示的に state を渡す
    router.layer(middleware::from_fn_with_state(state, access_middleware))
}

async fn access_middleware(
    State(state): State<AppState>,
    mut req: Request<Body>,
    next: Next,
) -> Response {
    let credentials = credentials::extract(req.headers(), req.uri(), &state.session_cookie);
    let guards = state.auth.for_request(credentials);

    let found = guards.credentials();
    tracing::trace!(
        bearer = found.bearer_token.is_some(),
        query_token = found.query_api_token.is_some(),
        session = found.session_id.is_some(),
        "request credentials"
    );

    let auth_ctx = AuthCtx::new(guards);

    // middleware → extractor への受け渡し
    req.extensions_mut().insert(auth_ctx);

    next.run(req).await
}
