//! # Todo 服务
//!
//! 一个最小的待办事项应用：
//! - `app` / `core` / `infrastructure`：REST API 服务（axum + 可选 PostgreSQL）
//! - `client`：调用该 API 的表单状态与 HTTP 客户端

pub mod app;
pub mod client;
pub mod config;
pub mod core;
pub mod infrastructure;
pub mod server;

pub use app::{build_app, todo::model::Todo, AppState};
pub use config::{Config, Environment};
pub use crate::core::error::AppError;
pub use infrastructure::database::TodoStore;
