//! 应用层：路由与共享状态

pub mod todo;

use axum::{
    extract::State,
    http::{header, HeaderValue, Method},
    middleware,
    response::Json,
    routing::{get, put},
    Router,
};
use std::time::Duration;
use tower::ServiceBuilder;
use tower_http::{
    cors::{AllowOrigin, CorsLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};
use tracing::warn;

use crate::config::{Config, CorsConfig, Environment};
use crate::core::{
    error::AppError,
    middleware::{attach_error_detail, request_logging_middleware},
};
use crate::infrastructure::database::TodoStore;
use todo::{handler, service::TodoService};

#[derive(Clone)]
pub struct AppState {
    pub todos: TodoService,
    pub environment: Environment,
}

impl AppState {
    pub fn new(store: TodoStore, environment: Environment) -> Self {
        Self {
            todos: TodoService::new(store),
            environment,
        }
    }
}

/// 组装完整的应用路由
///
/// 托管平台可以直接挂载返回的 `Router`，二进制入口则负责监听端口。
pub fn build_app(config: &Config, store: TodoStore) -> Router {
    let state = AppState::new(store, config.environment);

    Router::new()
        .route("/", get(health_check).fallback(route_not_found))
        .route(
            "/todos",
            get(handler::list_todos)
                .post(handler::create_todo)
                .fallback(route_not_found),
        )
        .route(
            "/todos/:id",
            put(handler::update_todo)
                .delete(handler::delete_todo)
                .fallback(route_not_found),
        )
        .fallback(route_not_found)
        .layer(middleware::from_fn_with_state(
            state.clone(),
            attach_error_detail,
        ))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(middleware::from_fn(request_logging_middleware))
                .layer(cors_layer(&config.cors))
                .layer(TimeoutLayer::new(Duration::from_secs(
                    config.server.timeout_seconds,
                ))),
        )
        .with_state(state)
}

/// 由静态白名单构建跨域策略
pub fn cors_layer(config: &CorsConfig) -> CorsLayer {
    let allow_origin = if config.allowed_origins.iter().any(|o| o == "*") {
        AllowOrigin::any()
    } else {
        let origins: Vec<HeaderValue> = config
            .allowed_origins
            .iter()
            .filter_map(|origin| match HeaderValue::from_str(origin) {
                Ok(value) => Some(value),
                Err(_) => {
                    warn!("忽略无效的跨域来源: {}", origin);
                    None
                }
            })
            .collect();
        AllowOrigin::list(origins)
    };

    CorsLayer::new()
        .allow_origin(allow_origin)
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers([header::CONTENT_TYPE])
}

/// 健康检查，顺带报告存储是否可达
async fn health_check(State(state): State<AppState>) -> Json<serde_json::Value> {
    let store = state.todos.store();
    let store_status = match store.ping().await {
        Ok(()) => "connected",
        Err(e) => {
            warn!("健康检查时存储不可达: {}", e);
            "unavailable"
        }
    };

    Json(serde_json::json!({
        "message": "Server is running",
        "store": store.kind(),
        "storeStatus": store_status,
        "environment": state.environment,
    }))
}

async fn route_not_found() -> AppError {
    AppError::NotFound("Route not found".to_string())
}
