//! 核心错误处理模块

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};

use crate::infrastructure::database::StoreError;

/// 核心错误类型
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// 调用方输入不满足约束
    #[error("{0}")]
    Validation(String),
    /// 引用的资源不存在
    #[error("{0}")]
    NotFound(String),
    /// 请求体无法解析
    #[error("Invalid JSON: {0}")]
    MalformedRequest(String),
    /// 存储或其他意外错误
    #[error("Internal server error: {0}")]
    Internal(String),
}

/// 错误响应结构
///
/// `error` 只在开发模式下由中间件补上，见 [`crate::core::middleware::attach_error_detail`]。
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::Validation(_) | AppError::MalformedRequest(_) => StatusCode::BAD_REQUEST,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn into_body(self) -> ErrorResponse {
        match self {
            AppError::Validation(msg) | AppError::NotFound(msg) => ErrorResponse {
                message: msg,
                error: None,
            },
            AppError::MalformedRequest(detail) => ErrorResponse {
                message: "Invalid JSON".to_string(),
                error: Some(detail),
            },
            AppError::Internal(detail) => ErrorResponse {
                message: "Internal server error".to_string(),
                error: Some(detail),
            },
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let full = self.into_body();
        let public = ErrorResponse {
            message: full.message.clone(),
            error: None,
        };

        let mut response = (status, Json(public)).into_response();
        if full.error.is_some() {
            response.extensions_mut().insert(full);
        }
        response
    }
}

impl From<StoreError> for AppError {
    fn from(err: StoreError) -> Self {
        AppError::Internal(err.to_string())
    }
}

impl From<validator::ValidationErrors> for AppError {
    fn from(err: validator::ValidationErrors) -> Self {
        let mut messages: Vec<String> = err
            .field_errors()
            .into_iter()
            .flat_map(|(_, errors)| {
                errors.iter().map(|error| {
                    error
                        .message
                        .as_ref()
                        .map(|msg| msg.to_string())
                        .unwrap_or_else(|| "Validation error".to_string())
                })
            })
            .collect();
        messages.sort();
        messages.dedup();

        AppError::Validation(messages.join(", "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn body_json(response: Response) -> serde_json::Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[test]
    fn test_status_mapping() {
        assert_eq!(
            AppError::Validation("x".into()).status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            AppError::MalformedRequest("x".into()).status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(AppError::NotFound("x".into()).status(), StatusCode::NOT_FOUND);
        assert_eq!(
            AppError::Internal("x".into()).status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[tokio::test]
    async fn test_internal_error_hides_detail() {
        let response = AppError::Internal("connection reset".into()).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let detail = response.extensions().get::<ErrorResponse>().cloned();
        assert_eq!(
            detail.and_then(|d| d.error).as_deref(),
            Some("connection reset")
        );

        let body = body_json(response).await;
        assert_eq!(body["message"], "Internal server error");
        assert!(body.get("error").is_none());
    }

    #[tokio::test]
    async fn test_validation_error_body() {
        let response = AppError::Validation("Title is required".into()).into_response();
        assert!(response.extensions().get::<ErrorResponse>().is_none());

        let body = body_json(response).await;
        assert_eq!(body, serde_json::json!({ "message": "Title is required" }));
    }
}
