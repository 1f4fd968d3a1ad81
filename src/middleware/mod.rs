/*
 * Responsibility
 * - middleware の公開インターフェース
 * - auth: credentials 抽出 → RequestGuards, http: request-id/trace/limit/timeout
 */
pub mod auth;
pub mod http;
