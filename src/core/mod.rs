//! 核心层：错误处理、请求提取与中间件

pub mod error;
pub mod extract;
pub mod middleware;
