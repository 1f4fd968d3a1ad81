/*
 * Responsibility
 * - 環境変数や設定の読み込み (DATABASE_URL, REDIS_URL, AUTH_GUARDS など)
 * - 設定値のバリデーション (不足なら起動失敗)
 */
use std::fmt;
use std::net::SocketAddr;
use std::str::FromStr;

use crate::services::auth::{GuardResolver, GuardSpec, auth_guards};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppEnv {
    Development,
    Production,
}

impl AppEnv {
    fn parse(raw: &str) -> Self {
        match raw.to_ascii_lowercase().as_str() {
            "production" | "prod" => Self::Production,
            _ => Self::Development,
        }
    }

    pub fn is_production(&self) -> bool {
        matches!(self, Self::Production)
    }
}

#[derive(Debug, PartialEq, Eq)]
pub enum ConfigError {
    Missing(&'static str),
    Invalid(&'static str),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Missing(key) => write!(f, "missing configuration: {}", key),
            ConfigError::Invalid(key) => write!(f, "invalid configuration: {}", key),
        }
    }
}

impl std::error::Error for ConfigError {}

#[derive(Debug, Clone)]
pub struct Config {
    pub addr: SocketAddr,
    pub database_url: String,
    pub redis_url: String,

    pub app_env: AppEnv,
    pub run_migrations: bool,
    pub request_timeout_seconds: u64,
    pub body_limit_bytes: usize,

    // Guard order used by /me and /auth/status (first match wins)
    pub guards: GuardResolver,
    pub session_cookie: String,
    pub session_key_prefix: String,
    pub api_token_hash: bool,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from any key lookup. `from_env` passes the process environment.
    pub fn from_lookup<F>(get: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let port: u16 = match get("PORT") {
            Some(s) => s.parse().map_err(|_| ConfigError::Invalid("PORT"))?,
            None => 3000,
        };

        let addr: SocketAddr = SocketAddr::from_str(&format!("0.0.0.0:{}", port))
            .map_err(|_| ConfigError::Invalid("PORT"))?;

        let database_url = get("DATABASE_URL").ok_or(ConfigError::Missing("DATABASE_URL"))?;
        let redis_url = get("REDIS_URL").ok_or(ConfigError::Missing("REDIS_URL"))?;

        let app_env = get("APP_ENV")
            .map(|s| AppEnv::parse(&s))
            .unwrap_or(AppEnv::Development);

        let run_migrations = parse_bool(get("RUN_MIGRATIONS"), "RUN_MIGRATIONS", true)?;

        let request_timeout_seconds = match get("REQUEST_TIMEOUT_SECONDS") {
            Some(s) => s
                .parse::<u64>()
                .ok()
                .filter(|v| *v > 0)
                .ok_or(ConfigError::Invalid("REQUEST_TIMEOUT_SECONDS"))?,
            None => 30,
        };

        let body_limit_bytes = match get("BODY_LIMIT_BYTES") {
            Some(s) => s
                .parse::<usize>()
                .map_err(|_| ConfigError::Invalid("BODY_LIMIT_BYTES"))?,
            None => 64 * 1024,
        };

        let guards = auth_guards(get("AUTH_GUARDS").map(GuardSpec::Delimited))
            .map_err(|_| ConfigError::Missing("AUTH_GUARDS"))?;

        let session_cookie = get("SESSION_COOKIE")
            .map(|s| s.trim().to_string())
            .unwrap_or_else(|| "session_id".to_string());
        if session_cookie.is_empty() {
            return Err(ConfigError::Invalid("SESSION_COOKIE"));
        }

        let session_key_prefix = get("SESSION_KEY_PREFIX").unwrap_or_else(|| "session".to_string());

        let api_token_hash = parse_bool(get("AUTH_API_TOKEN_HASH"), "AUTH_API_TOKEN_HASH", false)?;

        Ok(Self {
            addr,
            database_url,
            redis_url,
            app_env,
            run_migrations,
            request_timeout_seconds,
            body_limit_bytes,
            guards,
            session_cookie,
            session_key_prefix,
            api_token_hash,
        })
    }
}

fn parse_bool(raw: Option<String>, key: &'static str, default: bool) -> Result<bool, ConfigError> {
    let Some(raw) = raw else {
        return Ok(default);
    };

    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(ConfigError::Invalid(key)),
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;
    use crate::services::auth::GuardName;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    const REQUIRED: [(&str, &str); 3] = [
        ("DATABASE_URL", "postgres://localhost/app"),
        ("REDIS_URL", "redis://localhost:6379"),
        ("AUTH_GUARDS", "web, api"),
    ];

    #[test]
    fn defaults_apply() {
        let config = Config::from_lookup(lookup(&REQUIRED)).unwrap();

        assert_eq!(config.addr.port(), 3000);
        assert_eq!(config.app_env, AppEnv::Development);
        assert!(config.run_migrations);
        assert_eq!(config.request_timeout_seconds, 30);
        assert_eq!(config.body_limit_bytes, 64 * 1024);
        assert_eq!(config.session_cookie, "session_id");
        assert_eq!(config.session_key_prefix, "session");
        assert!(!config.api_token_hash);

        let guards: Vec<&str> = config.guards.guards().iter().map(GuardName::as_str).collect();
        assert_eq!(guards, vec!["web", "api"]);
    }

    #[test]
    fn missing_guard_list_fails() {
        let err = Config::from_lookup(lookup(&REQUIRED[..2])).unwrap_err();
        assert_eq!(err, ConfigError::Missing("AUTH_GUARDS"));
    }

    #[test]
    fn empty_guard_list_is_allowed() {
        let config = Config::from_lookup(lookup(&[
            REQUIRED[0],
            REQUIRED[1],
            ("AUTH_GUARDS", ""),
        ]))
        .unwrap();

        assert!(config.guards.guards().is_empty());
    }

    #[test]
    fn missing_database_url_fails() {
        let err = Config::from_lookup(lookup(&REQUIRED[1..])).unwrap_err();
        assert_eq!(err, ConfigError::Missing("DATABASE_URL"));
    }

    #[test]
    fn invalid_values_fail() {
        let mut pairs = REQUIRED.to_vec();
        pairs.push(("PORT", "http"));
        assert_eq!(
            Config::from_lookup(lookup(&pairs)).unwrap_err(),
            ConfigError::Invalid("PORT")
        );

        let mut pairs = REQUIRED.to_vec();
        pairs.push(("REQUEST_TIMEOUT_SECONDS", "0"));
        assert_eq!(
            Config::from_lookup(lookup(&pairs)).unwrap_err(),
            ConfigError::Invalid("REQUEST_TIMEOUT_SECONDS")
        );

        let mut pairs = REQUIRED.to_vec();
        pairs.push(("AUTH_API_TOKEN_HASH", "maybe"));
        assert_eq!(
            Config::from_lookup(lookup(&pairs)).unwrap_err(),
            ConfigError::Invalid("AUTH_API_TOKEN_HASH")
        );
    }

    #[test]
    fn overrides_are_read() {
        let mut pairs = REQUIRED.to_vec();
        pairs.extend([
            ("PORT", "8080"),
            ("APP_ENV", "PROD"),
            ("RUN_MIGRATIONS", "false"),
            ("SESSION_COOKIE", "sid"),
            ("AUTH_API_TOKEN_HASH", "true"),
        ]);
        let config = Config::from_lookup(lookup(&pairs)).unwrap();

        assert_eq!(config.addr.port(), 8080);
        assert!(config.app_env.is_production());
        assert!(!config.run_migrations);
        assert_eq!(config.session_cookie, "sid");
        assert!(config.api_token_hash);
    }
}
