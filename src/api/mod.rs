pub mod handlers;

pub use handlers::*;

use crate::config::AppConfig;
use crate::service::SessionRegistry;
use axum::{
    routing::{delete, get, patch, post, put},
    Router,
};
use std::sync::Arc;

/// 共享状态: 会话注册表 + 配置
#[derive(Clone)]
pub struct AppState {
    pub registry: Arc<SessionRegistry>,
    pub config: Arc<AppConfig>,
}

impl AppState {
    pub fn new(config: AppConfig) -> Self {
        Self {
            registry: Arc::new(SessionRegistry::new()),
            config: Arc::new(config),
        }
    }
}

/// 构建路由
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .route("/api/prepare", post(prepare))
        .route("/api/sessions", post(create_session))
        .route("/api/sessions/:id", get(get_session).delete(discard_session))
        .route("/api/sessions/:id/items/:index", patch(update_item))
        .route("/api/sessions/:id/items/:index/role", put(set_role))
        .route("/api/sessions/:id/items/:index/pair", delete(unpair))
        .route("/api/sessions/:id/pairs", post(manual_pair))
        .route("/api/sessions/:id/commit", post(commit))
        .with_state(state)
}
