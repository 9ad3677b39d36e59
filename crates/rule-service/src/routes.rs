//! 路由配置模块
//!
//! 定义所有 REST API 端点的路由映射

use axum::{
    Json, Router, middleware,
    routing::{delete, get, post, put},
};
use rule_shared::observability::middleware as obs_middleware;

use crate::{handlers, state::AppState};

/// 构建规则管理路由
pub fn rule_routes() -> Router<AppState> {
    Router::new()
        .route("/rules/create", post(handlers::rule::create_rule))
        .route("/rules/combine", post(handlers::rule::combine_rules))
        .route("/rules/evaluate", post(handlers::rule::evaluate_rule))
        .route("/rules/{id}/modify", put(handlers::rule::modify_rule))
        .route("/rules/list", get(handlers::rule::list_rules))
        .route("/rules/{id}/delete", delete(handlers::rule::delete_rule))
        .route("/rules/delete_all", delete(handlers::rule::delete_all_rules))
}

/// 构建完整应用：API 路由、健康检查与请求追踪中间件
pub fn app(state: AppState) -> Router {
    Router::new()
        .nest("/api", rule_routes())
        .route("/health", get(health_check))
        .layer(middleware::from_fn(obs_middleware::http_tracing))
        .with_state(state)
}

/// 存活探针：服务进程正常即返回 ok
async fn health_check() -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "status": "ok",
        "service": "rule-service"
    }))
}
