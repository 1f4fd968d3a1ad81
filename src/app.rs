/*
 * Responsibility
 * - Config読み込み → 依存生成 (PgPool / Valkey / AuthManager) → Router 組み立て
 * - migrations の適用 (起動時)
 * - Middleware の適用 (guard bind / request-id / trace など)
 * - axum::serve() で起動
 */
use std::{panic, process, sync::Arc};

use anyhow::{Context, Result};
use axum::Router;
use sqlx::postgres::PgPoolOptions;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::{
    api,
    config::Config,
    middleware::{self, http::HttpPolicy},
    repos::user_repo::PgUserRepo,
    services::{auth::build_auth_manager, cache::ValkeyClient, migrations},
    state::AppState,
};

fn init_tracing() {
    // Prefer RUST_LOG if set; otherwise use a sensible default.
    // Ex:
    // RUST_LOG=info,simple_auth_tokens=debug,tower_http=debug cargo run
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info,tower_http=info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .init();
}

fn init_panic_hook(abort_on_panic: bool) {
    // Keep the default hook as a fallback (prints to stderr with location/payload).
    let default_hook = panic::take_hook();

    panic::set_hook(Box::new(move |info| {
        // Always surface panics via tracing so they don't get "lost".
        tracing::error!(?info, "panic");

        // In development, fail fast: crash the whole process so we notice immediately.
        if abort_on_panic {
            process::abort();
        } else {
            default_hook(info);
        }
    }))
}

pub async fn run() -> Result<()> {
    init_tracing();
    let config = Config::from_env()?;
    init_panic_hook(!config.app_env.is_production());

    tracing::info!(
        guards = %config.guards.guards(),
        "starting in {:?} mode on {}",
        config.app_env,
        config.addr
    );

    let db = PgPoolOptions::new()
        .max_connections(10)
        .connect(&config.database_url)
        .await
        .context("connect to DATABASE_URL")?;

    if config.run_migrations {
        migrations::run(&db).await.context("apply migrations")?;
    }

    let sessions = ValkeyClient::new(&config.redis_url)
        .await
        .context("connect to REDIS_URL")?;

    let state = build_state(&config, db, sessions);
    warn_on_unknown_guards(&state);

    let app = build_router(state, HttpPolicy::from_config(&config));

    let listener = tokio::net::TcpListener::bind(config.addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}

fn build_state(config: &Config, db: sqlx::PgPool, sessions: ValkeyClient) -> AppState {
    let users = Arc::new(PgUserRepo::new(db));
    let auth = build_auth_manager(config, sessions, users);

    AppState::new(auth, config.guards.clone(), &config.session_cookie)
}

// An unknown name only fails once a request reaches it, so flag it at boot.
fn warn_on_unknown_guards(state: &AppState) {
    for name in state.guards.guards() {
        if !state.auth.has_guard(name.as_str()) {
            tracing::warn!(guard = %name, "AUTH_GUARDS names a guard that is not registered");
        }
    }
}

pub fn build_router(state: AppState, policy: HttpPolicy) -> Router {
    let v1 = middleware::auth::access::apply(api::v1::routes(), state.clone());

    let router = Router::new().nest("/api/v1", v1).with_state(state);

    middleware::http::apply(router, policy)
}
