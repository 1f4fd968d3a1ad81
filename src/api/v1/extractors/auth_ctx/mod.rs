/*!
 * Authentication context extractor
 *
 * Responsibility:
 * - リクエストに bind された guard 群（AuthCtx）を handler に提供する
 * - HTTP / axum 依存は core に閉じ込め、型定義は types に分離する
 */

mod core;
mod types;

pub use core::AuthCtxExtractor;
pub use types::AuthCtx;
