//! 待办事项表单
//!
//! 只保存当前显示列表的本地副本，所有修改都经由 [`TodoApi`] 落到服务端。

use std::fmt::Write as _;
use std::time::{Duration, Instant};
use tracing::{debug, error};
use uuid::Uuid;

use super::api::{ClientError, TodoApi};
use crate::app::todo::model::Todo;

/// 成功提示的显示时长
pub const NOTICE_TTL: Duration = Duration::from_secs(3);

/// 正在编辑的条目及其草稿
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditDraft {
    pub id: Uuid,
    pub title: String,
    pub description: String,
}

#[derive(Debug, Clone)]
struct Notice {
    text: String,
    shown_at: Instant,
}

pub struct TodoForm<A> {
    api: A,
    title: String,
    description: String,
    todos: Vec<Todo>,
    editing: Option<EditDraft>,
    busy: bool,
    initial_loading: bool,
    error: Option<String>,
    notice: Option<Notice>,
}

impl<A: TodoApi> TodoForm<A> {
    pub fn new(api: A) -> Self {
        Self {
            api,
            title: String::new(),
            description: String::new(),
            todos: Vec::new(),
            editing: None,
            busy: false,
            initial_loading: true,
            error: None,
            notice: None,
        }
    }

    pub fn items(&self) -> &[Todo] {
        &self.todos
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn set_title(&mut self, title: impl Into<String>) {
        self.title = title.into();
    }

    pub fn set_description(&mut self, description: impl Into<String>) {
        self.description = description.into();
    }

    pub fn editing(&self) -> Option<&EditDraft> {
        self.editing.as_ref()
    }

    pub fn set_edit_title(&mut self, title: impl Into<String>) {
        if let Some(draft) = self.editing.as_mut() {
            draft.title = title.into();
        }
    }

    pub fn set_edit_description(&mut self, description: impl Into<String>) {
        if let Some(draft) = self.editing.as_mut() {
            draft.description = description.into();
        }
    }

    pub fn is_busy(&self) -> bool {
        self.busy
    }

    pub fn is_initial_loading(&self) -> bool {
        self.initial_loading
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// 当前仍在显示期内的成功提示
    pub fn message(&self) -> Option<&str> {
        self.message_at(Instant::now())
    }

    pub fn message_at(&self, now: Instant) -> Option<&str> {
        self.notice
            .as_ref()
            .filter(|notice| now.saturating_duration_since(notice.shown_at) < NOTICE_TTL)
            .map(|notice| notice.text.as_str())
    }

    /// 首次挂载时拉取列表
    pub async fn load(&mut self) {
        match self.api.list().await {
            Ok(todos) => {
                debug!("加载了 {} 条待办事项", todos.len());
                self.todos = todos;
            }
            Err(e) => {
                error!("加载待办事项失败: {}", e);
                self.todos.clear();
                self.error = Some("Failed to load todos".to_string());
            }
        }
        self.initial_loading = false;
    }

    pub async fn submit(&mut self) {
        if self.busy {
            return;
        }
        if self.title.trim().is_empty() {
            self.error = Some("Title is required".to_string());
            return;
        }

        self.error = None;
        self.busy = true;
        let result = self
            .api
            .create(self.title.trim(), self.description.trim())
            .await;
        self.busy = false;

        match result {
            Ok(todo) => {
                self.todos.insert(0, todo);
                self.title.clear();
                self.description.clear();
                self.show_notice("Item added successfully");
            }
            Err(e) => self.fail("Error creating todo", &e, "Unable to create Todo item"),
        }
    }

    /// 进入编辑模式；同一时间只有一个条目可编辑
    pub fn begin_edit(&mut self, id: Uuid) -> bool {
        if self.busy {
            return false;
        }
        let Some(todo) = self.todos.iter().find(|todo| todo.id == id) else {
            return false;
        };

        self.editing = Some(EditDraft {
            id,
            title: todo.title.clone(),
            description: todo.description.clone(),
        });
        self.error = None;
        true
    }

    pub fn cancel_edit(&mut self) {
        self.editing = None;
        self.error = None;
    }

    pub async fn save_edit(&mut self) {
        if self.busy {
            return;
        }
        let Some(draft) = self.editing.clone() else {
            return;
        };
        if draft.title.trim().is_empty() {
            self.error = Some("Title is required".to_string());
            return;
        }

        self.error = None;
        self.busy = true;
        let result = self
            .api
            .update(draft.id, draft.title.trim(), draft.description.trim())
            .await;
        self.busy = false;

        match result {
            Ok(updated) => {
                if let Some(slot) = self.todos.iter_mut().find(|todo| todo.id == draft.id) {
                    *slot = updated;
                }
                self.editing = None;
                self.show_notice("Item updated successfully");
            }
            Err(e) => self.fail("Error updating todo", &e, "Unable to update Todo item"),
        }
    }

    /// 删除前调用 `confirm`，返回 `false` 时什么也不做
    pub async fn delete<F>(&mut self, id: Uuid, confirm: F)
    where
        F: FnOnce(&Todo) -> bool,
    {
        if self.busy {
            return;
        }
        let Some(todo) = self.todos.iter().find(|todo| todo.id == id) else {
            return;
        };
        if !confirm(todo) {
            return;
        }

        self.busy = true;
        let result = self.api.delete(id).await;
        self.busy = false;

        match result {
            Ok(()) => {
                self.todos.retain(|todo| todo.id != id);
                if self.editing.as_ref().is_some_and(|draft| draft.id == id) {
                    self.editing = None;
                }
                self.show_notice("Item deleted successfully");
            }
            Err(e) => self.fail("Error deleting todo", &e, "Failed to delete todo"),
        }
    }

    /// 纯文本视图
    pub fn render(&self) -> String {
        if self.initial_loading {
            return "Loading...\n".to_string();
        }

        let mut out = String::new();
        let _ = writeln!(out, "== Add Item ==");
        if let Some(message) = self.message() {
            let _ = writeln!(out, "[ok] {}", message);
        }
        if let Some(error) = &self.error {
            let _ = writeln!(out, "[error] {}", error);
        }
        if self.busy {
            let _ = writeln!(out, "(working...)");
        }

        let _ = writeln!(out, "== Tasks ==");
        if self.todos.is_empty() {
            let _ = writeln!(out, "No todos yet. Add one above!");
            return out;
        }

        for (index, todo) in self.todos.iter().enumerate() {
            match self.editing.as_ref().filter(|draft| draft.id == todo.id) {
                Some(draft) => {
                    let _ = writeln!(out, "{:>3}. * {} | {}", index + 1, draft.title, draft.description);
                }
                None if todo.description.is_empty() => {
                    let _ = writeln!(out, "{:>3}. {}", index + 1, todo.title);
                }
                None => {
                    let _ = writeln!(out, "{:>3}. {} - {}", index + 1, todo.title, todo.description);
                }
            }
        }
        out
    }

    fn show_notice(&mut self, text: &str) {
        self.notice = Some(Notice {
            text: text.to_string(),
            shown_at: Instant::now(),
        });
    }

    fn fail(&mut self, context: &str, err: &ClientError, fallback: &str) {
        error!("{}: {}", context, err);
        self.error = Some(
            err.server_message()
                .map(str::to_string)
                .unwrap_or_else(|| fallback.to_string()),
        );
    }
}
