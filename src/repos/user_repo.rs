/*
 * Responsibility
 * - users テーブル向け SQLx 操作 (guard からの参照のみ)
 * - PgPool を受け取り UserProvider を実装する
 * - api_token カラムは migrations/ で追加される
 */
use async_trait::async_trait;
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use crate::repos::error::RepoError;
use crate::services::auth::{AuthUser, UserProvider};

#[derive(Debug, FromRow)]
pub struct UserRow {
    pub id: Uuid,
    pub name: String,
    pub email: String,
}

impl From<UserRow> for AuthUser {
    fn from(row: UserRow) -> Self {
        Self {
            id: row.id,
            name: row.name,
            email: row.email,
        }
    }
}

#[derive(Clone, Debug)]
pub struct PgUserRepo {
    pool: PgPool,
}

impl PgUserRepo {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn get(&self, user_id: Uuid) -> Result<Option<UserRow>, RepoError> {
        let row = sqlx::query_as::<_, UserRow>(
            r#"
            SELECT id, name, email
            FROM users
            WHERE id = $1
            "#,
        )
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row)
    }

    pub async fn find_by_api_token(&self, api_token: &str) -> Result<Option<UserRow>, RepoError> {
        // api_token is UNIQUE, so at most one row
        let row = sqlx::query_as::<_, UserRow>(
            r#"
            SELECT id, name, email
            FROM users
            WHERE api_token = $1
            "#,
        )
        .bind(api_token)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row)
    }
}

#[async_trait]
impl UserProvider for PgUserRepo {
    async fn retrieve_by_id(&self, id: Uuid) -> Result<Option<AuthUser>, RepoError> {
        Ok(self.get(id).await?.map(AuthUser::from))
    }

    async fn retrieve_by_token(&self, token: &str) -> Result<Option<AuthUser>, RepoError> {
        Ok(self.find_by_api_token(token).await?.map(AuthUser::from))
    }
}
