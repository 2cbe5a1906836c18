//! 表单客户端：HTTP 调用与界面状态

pub mod api;
pub mod form;

pub use api::{ApiClient, ClientError, TodoApi};
pub use form::{EditDraft, TodoForm};
