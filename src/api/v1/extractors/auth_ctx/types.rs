/*
 * Responsibility
 * - Handler から見える「リクエストに bind された guard 群」の型
 * - middleware が credentials を抽出して request extensions に格納し、handler はこの型だけを受け取る
 *
 * Notes
 * - 認証済みかどうかはまだ分からない。GuardResolver で resolve して初めて決まる
 */
use std::sync::Arc;

use crate::services::auth::RequestGuards;

#[derive(Debug, Clone)]
pub struct AuthCtx {
    guards: Arc<RequestGuards>,
}

impl AuthCtx {
    pub fn new(guards: RequestGuards) -> Self {
        Self {
            guards: Arc::new(guards),
        }
    }

    pub fn guards(&self) -> &RequestGuards {
        &self.guards
    }
}
