//! 基础设施层：数据存储与日志

pub mod database;
pub mod logger;
pub mod memory;
#[cfg(feature = "database")]
pub mod postgres;
