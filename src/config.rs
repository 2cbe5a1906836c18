//! 服务配置
//!
//! 配置来源按优先级从低到高：内置默认值 → TOML 配置文件 → 环境变量。

use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::str::FromStr;

/// 默认配置文件路径
pub const DEFAULT_CONFIG_PATH: &str = "config/todo.toml";

/// 运行环境
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    Development,
    #[default]
    Production,
    Test,
}

impl Environment {
    /// 只有显式的开发模式才会在错误响应中附带内部细节
    pub fn exposes_error_detail(self) -> bool {
        self == Environment::Development
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Environment::Development => "development",
            Environment::Production => "production",
            Environment::Test => "test",
        }
    }
}

impl fmt::Display for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Environment {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "development" | "dev" => Ok(Environment::Development),
            "production" | "prod" => Ok(Environment::Production),
            "test" => Ok(Environment::Test),
            other => Err(ConfigError::Validation(format!("未知的运行环境: {}", other))),
        }
    }
}

/// 服务配置结构
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// 运行环境
    pub environment: Environment,
    /// HTTP 服务配置
    pub server: ServerConfig,
    /// 数据存储配置
    pub database: DatabaseConfig,
    /// 跨域配置
    pub cors: CorsConfig,
    /// 日志配置
    pub logging: LoggingConfig,
}

/// HTTP 服务配置
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// 绑定地址
    pub bind_address: String,
    /// HTTP 服务端口
    pub port: u16,
    /// 请求超时时间（秒）
    pub timeout_seconds: u64,
}

/// 数据存储配置
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DatabaseConfig {
    /// 连接字符串，为空时使用内存存储
    pub url: Option<String>,
    /// 连接池最大连接数
    pub max_connections: u32,
    /// 单次连接超时（秒）
    pub connect_timeout_seconds: u64,
    /// 启动时最多尝试连接的次数
    pub connect_attempts: u32,
    /// 两次连接尝试之间的等待时间（毫秒）
    pub retry_delay_ms: u64,
}

/// 跨域配置
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CorsConfig {
    /// 允许的来源列表，"*" 表示任意来源
    pub allowed_origins: Vec<String>,
}

/// 日志配置
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// 日志级别 (trace, debug, info, warn, error)
    pub level: String,
    /// 日志目录，为空时只输出到控制台
    pub log_dir: Option<PathBuf>,
    /// 日志文件名前缀
    pub file_prefix: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0".to_string(),
            port: 3001,
            timeout_seconds: 30,
        }
    }
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: None,
            max_connections: 10,
            connect_timeout_seconds: 8,
            connect_attempts: 5,
            retry_delay_ms: 2000,
        }
    }
}

impl Default for CorsConfig {
    fn default() -> Self {
        Self {
            allowed_origins: vec![
                "http://localhost:3000".to_string(),
                "http://localhost:3001".to_string(),
            ],
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            log_dir: None,
            file_prefix: "todo-server".to_string(),
        }
    }
}

impl ServerConfig {
    pub fn socket_addr(&self) -> Result<SocketAddr, ConfigError> {
        format!("{}:{}", self.bind_address, self.port)
            .parse()
            .map_err(|e| ConfigError::Validation(format!("无效的监听地址: {}", e)))
    }
}

impl Config {
    /// 加载配置：配置文件（若存在）+ 进程环境变量
    pub fn load() -> Result<Self, ConfigError> {
        let path = std::env::var("TODO_CONFIG").unwrap_or_else(|_| DEFAULT_CONFIG_PATH.to_string());

        let mut config = if Path::new(&path).exists() {
            Self::load_from_file(&path)?
        } else {
            Self::default()
        };

        config.apply_overrides(|key| std::env::var(key).ok())?;
        config.validate()?;
        Ok(config)
    }

    /// 从配置文件加载配置
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let content =
            fs::read_to_string(path.as_ref()).map_err(|e| ConfigError::FileRead(e.to_string()))?;

        toml::from_str(&content).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    /// 用环境变量覆盖配置项
    ///
    /// `lookup` 通常是 `std::env::var`，测试中可以换成固定的映射。
    pub fn apply_overrides<F>(&mut self, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(env) = lookup("APP_ENV") {
            self.environment = env.parse()?;
        }
        if let Some(addr) = lookup("BIND_ADDRESS") {
            self.server.bind_address = addr;
        }
        if let Some(port) = lookup("PORT") {
            self.server.port = port
                .trim()
                .parse()
                .map_err(|_| ConfigError::Validation(format!("无效的端口: {}", port)))?;
        }
        if let Some(timeout) = lookup("REQUEST_TIMEOUT_SECS") {
            self.server.timeout_seconds = timeout
                .trim()
                .parse()
                .map_err(|_| ConfigError::Validation(format!("无效的超时时间: {}", timeout)))?;
        }
        if let Some(url) = lookup("DATABASE_URL") {
            let url = url.trim().to_string();
            self.database.url = (!url.is_empty()).then_some(url);
        }
        if let Some(origins) = lookup("ALLOWED_ORIGINS") {
            self.cors.allowed_origins = split_list(&origins);
        }
        if let Some(frontend) = lookup("FRONTEND_URL") {
            let frontend = frontend.trim().to_string();
            if !frontend.is_empty() && !self.cors.allowed_origins.contains(&frontend) {
                self.cors.allowed_origins.push(frontend);
            }
        }
        if let Some(level) = lookup("LOG_LEVEL") {
            self.logging.level = level.trim().to_ascii_lowercase();
        }
        if let Some(dir) = lookup("LOG_DIR") {
            self.logging.log_dir = (!dir.trim().is_empty()).then(|| PathBuf::from(dir.trim()));
        }
        Ok(())
    }

    /// 验证配置的有效性
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.server.port == 0 {
            return Err(ConfigError::Validation("HTTP端口必须大于0".to_string()));
        }
        if self.server.bind_address.is_empty() {
            return Err(ConfigError::Validation("绑定地址不能为空".to_string()));
        }
        if self.server.timeout_seconds == 0 {
            return Err(ConfigError::Validation("请求超时时间必须大于0".to_string()));
        }
        if self.database.connect_attempts == 0 {
            return Err(ConfigError::Validation("连接尝试次数必须大于0".to_string()));
        }
        if self.database.max_connections == 0 {
            return Err(ConfigError::Validation("连接池大小必须大于0".to_string()));
        }

        let valid_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_levels.contains(&self.logging.level.as_str()) {
            return Err(ConfigError::Validation(format!(
                "无效的日志级别: {}，有效值: {:?}",
                self.logging.level, valid_levels
            )));
        }

        Ok(())
    }
}

fn split_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

/// 配置错误类型
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("文件读取错误: {0}")]
    FileRead(String),
    #[error("配置解析错误: {0}")]
    Parse(String),
    #[error("配置验证错误: {0}")]
    Validation(String),
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults_are_valid() {
        let config = Config::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.environment, Environment::Production);
        assert_eq!(config.server.port, 3001);
        assert!(config.database.url.is_none());
    }

    #[test]
    fn test_env_overrides() {
        let mut config = Config::default();
        config
            .apply_overrides(lookup_from(&[
                ("APP_ENV", "development"),
                ("PORT", "8080"),
                ("DATABASE_URL", "postgres://u:p@localhost/todos"),
                ("ALLOWED_ORIGINS", "https://a.example, https://b.example,"),
                ("FRONTEND_URL", "https://app.example"),
                ("LOG_LEVEL", "DEBUG"),
            ]))
            .unwrap();

        assert_eq!(config.environment, Environment::Development);
        assert_eq!(config.server.port, 8080);
        assert_eq!(
            config.database.url.as_deref(),
            Some("postgres://u:p@localhost/todos")
        );
        assert_eq!(
            config.cors.allowed_origins,
            vec!["https://a.example", "https://b.example", "https://app.example"]
        );
        assert_eq!(config.logging.level, "debug");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_empty_database_url_means_memory() {
        let mut config = Config::default();
        config
            .apply_overrides(lookup_from(&[("DATABASE_URL", "  ")]))
            .unwrap();
        assert!(config.database.url.is_none());
    }

    #[test]
    fn test_invalid_overrides_are_rejected() {
        let mut config = Config::default();
        assert!(config
            .apply_overrides(lookup_from(&[("PORT", "not-a-port")]))
            .is_err());
        assert!(config
            .apply_overrides(lookup_from(&[("APP_ENV", "staging")]))
            .is_err());

        let mut config = Config::default();
        config.logging.level = "verbose".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_parse_toml() {
        let config: Config = toml::from_str(
            r#"
            environment = "test"

            [server]
            port = 4000

            [cors]
            allowed_origins = ["*"]
            "#,
        )
        .unwrap();

        assert_eq!(config.environment, Environment::Test);
        assert_eq!(config.server.port, 4000);
        assert_eq!(config.server.bind_address, "0.0.0.0");
        assert_eq!(config.cors.allowed_origins, vec!["*"]);
        assert_eq!(config.database.connect_attempts, 5);
    }

    #[test]
    fn test_error_detail_only_in_development() {
        assert!(Environment::Development.exposes_error_detail());
        assert!(!Environment::Production.exposes_error_detail());
        assert!(!Environment::Test.exposes_error_detail());
    }
}
