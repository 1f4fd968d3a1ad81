/*
 * Responsibility
 * - モジュール宣言のみ (binary からも tests からも同じ木を使う)
 * - multi-guard 解決の入り口は services::auth::auth_guards
 */
pub mod api;
pub mod app;
pub mod config;
pub mod error;
pub mod middleware;
pub mod repos;
pub mod services;
pub mod state;
