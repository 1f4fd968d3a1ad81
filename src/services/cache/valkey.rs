use async_trait::async_trait;
use redis::AsyncCommands;
use redis::aio::ConnectionManager;

use crate::services::cache::client::{CacheClient, CacheError, CacheResult};

/// Valkey/Redis-backed session store.
///
/// Read-only: sessions are written by whatever performs login, the web guard
/// only resolves `{prefix}:{session_id}` keys through it.
#[derive(Clone, Debug)]
pub struct ValkeyClient {
    conn: ConnectionManager,
}

impl ValkeyClient {
    /// Connect with a URL like `redis://localhost:6379`.
    pub async fn new(url: &str) -> Result<Self, CacheError> {
        let client = redis::Client::open(url).map_err(connection_error)?;
        let conn = ConnectionManager::new(client)
            .await
            .map_err(connection_error)?;

        Ok(Self { conn })
    }
}

fn connection_error(e: redis::RedisError) -> CacheError {
    CacheError::BackendConnection(e.to_string())
}

#[async_trait]
impl CacheClient for ValkeyClient {
    fn backend_name(&self) -> &'static str {
        "valkey"
    }

    async fn get_string(&self, key: &str) -> CacheResult<Option<String>> {
        // ConnectionManager is a cheap handle; each call works on its own clone
        let mut conn = self.conn.clone();

        conn.get::<_, Option<String>>(key)
            .await
            .map_err(|e| CacheError::BackendCommand(e.to_string()))
    }
}
