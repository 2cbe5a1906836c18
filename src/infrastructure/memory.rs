//! 内存存储
//!
//! 没有配置数据库时使用，测试也依赖它。进程退出后数据丢失。

use chrono::Utc;
use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::app::todo::model::{NewTodo, Todo, TodoChanges};

#[derive(Clone, Default)]
pub struct MemoryStore {
    // 按插入顺序保存
    todos: Arc<RwLock<Vec<Todo>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn insert(&self, todo: NewTodo) -> Todo {
        let now = Utc::now();
        let todo = Todo {
            id: Uuid::new_v4(),
            title: todo.title,
            description: todo.description,
            created_at: now,
            updated_at: now,
        };

        self.todos.write().await.push(todo.clone());
        todo
    }

    /// 创建时间相同的记录，后插入的排在前面
    pub async fn list(&self) -> Vec<Todo> {
        let todos = self.todos.read().await;
        let mut newest_first: Vec<Todo> = todos.iter().rev().cloned().collect();
        newest_first.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        newest_first
    }

    pub async fn update(&self, id: Uuid, changes: TodoChanges) -> Option<Todo> {
        let mut todos = self.todos.write().await;
        let todo = todos.iter_mut().find(|todo| todo.id == id)?;

        todo.title = changes.title;
        if let Some(description) = changes.description {
            todo.description = description;
        }
        todo.updated_at = Utc::now();

        Some(todo.clone())
    }

    pub async fn delete(&self, id: Uuid) -> bool {
        let mut todos = self.todos.write().await;
        let before = todos.len();
        todos.retain(|todo| todo.id != id);
        todos.len() != before
    }

    #[cfg(test)]
    pub async fn len(&self) -> usize {
        self.todos.read().await.len()
    }

    #[cfg(test)]
    pub async fn is_empty(&self) -> bool {
        self.todos.read().await.is_empty()
    }
}
