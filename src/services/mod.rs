/*
 * Responsibility
 * - auth: guard 解決と guard 実装 (web/api)
 * - cache: session 参照用の Valkey クライアント
 * - migrations: 起動時のスキーマ適用
 */
pub mod auth;
pub mod cache;
pub mod migrations;
