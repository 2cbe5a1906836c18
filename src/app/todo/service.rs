//! Todo 业务服务

use tracing::{error, info};
use uuid::Uuid;

use super::model::{NewTodo, Todo, TodoChanges, TodoPayload};
use crate::core::error::AppError;
use crate::infrastructure::database::{StoreError, TodoStore};

const TODO_NOT_FOUND: &str = "Todo not found";

#[derive(Clone)]
pub struct TodoService {
    store: TodoStore,
}

impl TodoService {
    pub fn new(store: TodoStore) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &TodoStore {
        &self.store
    }

    pub async fn create(&self, payload: TodoPayload) -> Result<Todo, AppError> {
        let input = payload.into_input()?;
        let todo = self
            .store
            .insert(NewTodo::from(input))
            .await
            .map_err(store_failure("创建待办事项"))?;

        info!("Created todo: {} ({})", todo.title, todo.id);
        Ok(todo)
    }

    pub async fn list(&self) -> Result<Vec<Todo>, AppError> {
        self.store
            .list()
            .await
            .map_err(store_failure("查询待办事项列表"))
    }

    pub async fn update(&self, id: &str, payload: TodoPayload) -> Result<Todo, AppError> {
        // 先校验请求体，保证缺少标题时一律返回 400
        let changes = TodoChanges::from(payload.into_input()?);
        let id = parse_id(id)?;

        let todo = self
            .store
            .update(id, changes)
            .await
            .map_err(store_failure("更新待办事项"))?
            .ok_or_else(|| AppError::NotFound(TODO_NOT_FOUND.to_string()))?;

        info!("Updated todo: {} ({})", todo.title, todo.id);
        Ok(todo)
    }

    pub async fn delete(&self, id: &str) -> Result<(), AppError> {
        let id = parse_id(id)?;
        let deleted = self
            .store
            .delete(id)
            .await
            .map_err(store_failure("删除待办事项"))?;
        if !deleted {
            return Err(AppError::NotFound(TODO_NOT_FOUND.to_string()));
        }

        info!("Deleted todo: {}", id);
        Ok(())
    }
}

/// 记录存储失败的操作上下文，再转换为 500
fn store_failure(action: &'static str) -> impl FnOnce(StoreError) -> AppError {
    move |e| {
        error!("{}失败: {}", action, e);
        AppError::from(e)
    }
}

/// 格式不正确的 id 不可能对应任何记录
fn parse_id(raw: &str) -> Result<Uuid, AppError> {
    Uuid::parse_str(raw.trim()).map_err(|_| AppError::NotFound(TODO_NOT_FOUND.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_store_failure_is_internal() {
        let err = store_failure("删除待办事项")(StoreError::Unavailable("pool closed".into()));
        match err {
            AppError::Internal(detail) => assert!(detail.contains("pool closed")),
            other => panic!("expected internal error, got {:?}", other),
        }
    }

    #[test]
    fn test_parse_id() {
        let id = Uuid::new_v4();
        assert_eq!(parse_id(&format!(" {} ", id)).unwrap(), id);
        assert!(matches!(parse_id("not-a-uuid"), Err(AppError::NotFound(_))));
    }
}
