//! Todo API 客户端

use async_trait::async_trait;
use serde::Serialize;
use std::time::Duration;
use uuid::Uuid;

use crate::app::todo::model::Todo;
use crate::core::error::ErrorResponse;

/// 未设置 `TODO_API_URL` 时使用的地址
pub const DEFAULT_API_URL: &str = "http://localhost:3001";

const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// 客户端错误
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    /// 服务器返回了非 2xx 状态
    #[error("HTTP error! status: {status}")]
    Api { status: u16, message: Option<String> },
    #[error("network error: {0}")]
    Transport(#[from] reqwest::Error),
}

impl ClientError {
    /// 服务器在错误响应中给出的 `message`
    pub fn server_message(&self) -> Option<&str> {
        match self {
            ClientError::Api { message, .. } => message.as_deref(),
            ClientError::Transport(_) => None,
        }
    }
}

/// 表单依赖的远程操作
#[async_trait]
pub trait TodoApi: Send + Sync {
    async fn list(&self) -> Result<Vec<Todo>, ClientError>;
    async fn create(&self, title: &str, description: &str) -> Result<Todo, ClientError>;
    async fn update(&self, id: Uuid, title: &str, description: &str) -> Result<Todo, ClientError>;
    async fn delete(&self, id: Uuid) -> Result<(), ClientError>;
}

#[derive(Serialize)]
struct TodoRequest<'a> {
    title: &'a str,
    description: &'a str,
}

/// 基于 reqwest 的实现
#[derive(Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
}

impl ApiClient {
    pub fn new(base_url: impl Into<String>) -> Result<Self, ClientError> {
        let http = reqwest::Client::builder().timeout(REQUEST_TIMEOUT).build()?;
        Ok(Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    /// 从 `TODO_API_URL` 读取服务地址
    pub fn from_env() -> Result<Self, ClientError> {
        let base_url = std::env::var("TODO_API_URL").unwrap_or_else(|_| DEFAULT_API_URL.to_string());
        Self::new(base_url)
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}

/// 非 2xx 响应转换成 [`ClientError::Api`]，尽量保留服务器给出的 message
async fn check(response: reqwest::Response) -> Result<reqwest::Response, ClientError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let message = response
        .json::<ErrorResponse>()
        .await
        .ok()
        .map(|body| body.message)
        .filter(|message| !message.is_empty());

    Err(ClientError::Api {
        status: status.as_u16(),
        message,
    })
}

#[async_trait]
impl TodoApi for ApiClient {
    async fn list(&self) -> Result<Vec<Todo>, ClientError> {
        let response = self.http.get(self.url("/todos")).send().await?;
        Ok(check(response).await?.json().await?)
    }

    async fn create(&self, title: &str, description: &str) -> Result<Todo, ClientError> {
        let response = self
            .http
            .post(self.url("/todos"))
            .json(&TodoRequest { title, description })
            .send()
            .await?;
        Ok(check(response).await?.json().await?)
    }

    async fn update(&self, id: Uuid, title: &str, description: &str) -> Result<Todo, ClientError> {
        let response = self
            .http
            .put(self.url(&format!("/todos/{}", id)))
            .json(&TodoRequest { title, description })
            .send()
            .await?;
        Ok(check(response).await?.json().await?)
    }

    async fn delete(&self, id: Uuid) -> Result<(), ClientError> {
        let response = self
            .http
            .delete(self.url(&format!("/todos/{}", id)))
            .send()
            .await?;
        check(response).await?;
        Ok(())
    }
}
