//! Todo 处理器

use axum::{
    extract::State,
    http::StatusCode,
    response::Json,
};

use super::model::{Todo, TodoPayload};
use crate::app::AppState;
use crate::core::{
    error::AppError,
    extract::{ApiJson, ApiPath},
};

pub async fn create_todo(
    State(state): State<AppState>,
    ApiJson(payload): ApiJson<TodoPayload>,
) -> Result<(StatusCode, Json<Todo>), AppError> {
    let todo = state.todos.create(payload).await?;
    Ok((StatusCode::CREATED, Json(todo)))
}

pub async fn list_todos(State(state): State<AppState>) -> Result<Json<Vec<Todo>>, AppError> {
    Ok(Json(state.todos.list().await?))
}

pub async fn update_todo(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<String>,
    ApiJson(payload): ApiJson<TodoPayload>,
) -> Result<Json<Todo>, AppError> {
    Ok(Json(state.todos.update(&id, payload).await?))
}

pub async fn delete_todo(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<String>,
) -> Result<StatusCode, AppError> {
    state.todos.delete(&id).await?;
    Ok(StatusCode::NO_CONTENT)
}
