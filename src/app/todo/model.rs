//! Todo 数据模型

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use uuid::Uuid;
use validator::Validate;

use crate::core::error::AppError;

/// 持久化的待办事项
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "database", derive(sqlx::FromRow))]
#[serde(rename_all = "camelCase")]
pub struct Todo {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// 创建/更新请求体
///
/// 字段先按任意 JSON 值接收，类型错误属于校验错误而不是请求体格式错误。
/// 请求体本身只接受 JSON 对象，数组等其他形状在反序列化时即被拒绝。
#[derive(Debug, Default, Deserialize)]
#[serde(from = "Map<String, Value>")]
pub struct TodoPayload {
    pub title: Option<Value>,
    pub description: Option<Value>,
}

impl From<Map<String, Value>> for TodoPayload {
    fn from(mut fields: Map<String, Value>) -> Self {
        // null 与缺省同义
        let mut take = |key: &str| fields.remove(key).filter(|value| !value.is_null());
        Self {
            title: take("title"),
            description: take("description"),
        }
    }
}

/// 校验并清理后的输入
#[derive(Debug, Clone, PartialEq, Validate)]
pub struct TodoInput {
    #[validate(length(min = 1, message = "Title is required"))]
    pub title: String,
    pub description: Option<String>,
}

/// 插入存储的新记录
#[derive(Debug, Clone, PartialEq)]
pub struct NewTodo {
    pub title: String,
    pub description: String,
}

/// 对已有记录的修改；`description` 为 `None` 时保留原值
#[derive(Debug, Clone, PartialEq)]
pub struct TodoChanges {
    pub title: String,
    pub description: Option<String>,
}

impl TodoPayload {
    pub fn into_input(self) -> Result<TodoInput, AppError> {
        let title = match self.title {
            None => return Err(AppError::Validation("Title is required".to_string())),
            Some(Value::String(s)) => s.trim().to_string(),
            Some(_) => {
                return Err(AppError::Validation(
                    "Title is required and must be a string".to_string(),
                ))
            }
        };

        let description = match self.description {
            None => None,
            Some(Value::String(s)) => Some(s.trim().to_string()),
            Some(_) => {
                return Err(AppError::Validation(
                    "Description must be a string".to_string(),
                ))
            }
        };

        let input = TodoInput { title, description };
        input.validate()?;
        Ok(input)
    }
}

impl From<TodoInput> for NewTodo {
    fn from(input: TodoInput) -> Self {
        Self {
            title: input.title,
            description: input.description.unwrap_or_default(),
        }
    }
}

impl From<TodoInput> for TodoChanges {
    fn from(input: TodoInput) -> Self {
        Self {
            title: input.title,
            description: input.description,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn payload(value: Value) -> TodoPayload {
        serde_json::from_value(value).unwrap()
    }

    fn validation_message(result: Result<TodoInput, AppError>) -> String {
        match result {
            Err(AppError::Validation(msg)) => msg,
            other => panic!("expected validation error, got {:?}", other),
        }
    }

    #[test]
    fn test_trims_fields() {
        let input = payload(json!({ "title": "  Buy milk ", "description": " 2L " }))
            .into_input()
            .unwrap();
        assert_eq!(input.title, "Buy milk");
        assert_eq!(input.description.as_deref(), Some("2L"));
    }

    #[test]
    fn test_missing_description_defaults_to_empty_on_create() {
        let input = payload(json!({ "title": "Buy milk" })).into_input().unwrap();
        assert_eq!(input.description, None);

        let new_todo = NewTodo::from(input);
        assert_eq!(new_todo.description, "");
    }

    #[test]
    fn test_rejects_bad_titles() {
        assert_eq!(
            validation_message(payload(json!({})).into_input()),
            "Title is required"
        );
        assert_eq!(
            validation_message(payload(json!({ "title": null })).into_input()),
            "Title is required"
        );
        assert_eq!(
            validation_message(payload(json!({ "title": "   " })).into_input()),
            "Title is required"
        );
        assert_eq!(
            validation_message(payload(json!({ "title": 42 })).into_input()),
            "Title is required and must be a string"
        );
    }

    #[test]
    fn test_rejects_non_string_description() {
        assert_eq!(
            validation_message(payload(json!({ "title": "a", "description": ["x"] })).into_input()),
            "Description must be a string"
        );
    }

    #[test]
    fn test_only_objects_are_payloads() {
        assert!(serde_json::from_value::<TodoPayload>(json!(["Buy milk", "2L"])).is_err());
        assert!(serde_json::from_value::<TodoPayload>(json!("Buy milk")).is_err());
        assert!(serde_json::from_str::<TodoPayload>("null").is_err());

        let parsed = payload(json!({ "title": "Buy milk", "extra": true }));
        assert_eq!(parsed.title, Some(json!("Buy milk")));
        assert_eq!(parsed.description, None);
    }

    #[test]
    fn test_serializes_camel_case() {
        let now = Utc::now();
        let todo = Todo {
            id: Uuid::new_v4(),
            title: "t".into(),
            description: String::new(),
            created_at: now,
            updated_at: now,
        };
        let value = serde_json::to_value(&todo).unwrap();
        assert!(value.get("createdAt").is_some());
        assert!(value.get("updatedAt").is_some());
        assert!(value.get("created_at").is_none());
    }
}
