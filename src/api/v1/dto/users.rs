/*
 * Responsibility
 * - /me, /auth/status の response DTO
 */
use serde::Serialize;
use uuid::Uuid;

use crate::services::auth::AuthUser;

#[derive(Debug, Serialize)]
pub struct UserResponse {
    pub id: Uuid,
    pub name: String,
    pub email: String,
}

impl From<AuthUser> for UserResponse {
    fn from(user: AuthUser) -> Self {
        Self {
            id: user.id,
            name: user.name,
            email: user.email,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct MeResponse {
    // name of the guard that authenticated the request
    pub guard: String,
    pub user: UserResponse,
}

#[derive(Debug, Serialize)]
pub struct AuthStatusResponse {
    pub authenticated: bool,
    pub guard: Option<String>,
    pub user_id: Option<Uuid>,
}
