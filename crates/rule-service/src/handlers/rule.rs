//! 规则 API 处理器
//!
//! 实现规则的创建、合并、评估、修改、列表和删除操作。
//! 每个处理器只负责参数提取与响应包装，语义全部委托给规则存储。

use std::time::Instant;

use axum::{
    Json,
    extract::{Path, State},
};
use rule_shared::observability::metrics;
use tracing::info;

use crate::{
    dto::{
        ApiResponse, CreateRuleRequest, EvaluateResponse, EvaluateRuleRequest, MessageResponse,
        RuleDto, RuleListItemDto, UpdateRuleRequest,
    },
    error::Result,
    state::AppState,
};

/// 创建规则
///
/// POST /api/rules/create
pub async fn create_rule(
    State(state): State<AppState>,
    Json(req): Json<CreateRuleRequest>,
) -> Result<Json<ApiResponse<RuleDto>>> {
    let rule = state.store.create(&req.rule_string).inspect_err(|_| {
        metrics::record_rule_compilation("failure");
    })?;
    metrics::record_rule_compilation("success");

    info!(rule_id = rule.id, "Rule created");
    Ok(Json(ApiResponse::success(rule.into())))
}

/// 以 AND 合并多条规则
///
/// POST /api/rules/combine，请求体为规则 ID 数组
pub async fn combine_rules(
    State(state): State<AppState>,
    Json(rule_ids): Json<Vec<i64>>,
) -> Result<Json<ApiResponse<RuleDto>>> {
    let rule = state.store.combine(&rule_ids)?;

    info!(rule_id = rule.id, sources = ?rule_ids, "Rules combined");
    Ok(Json(ApiResponse::success(rule.into())))
}

/// 针对数据评估规则
///
/// POST /api/rules/evaluate
pub async fn evaluate_rule(
    State(state): State<AppState>,
    Json(req): Json<EvaluateRuleRequest>,
) -> Result<Json<ApiResponse<EvaluateResponse>>> {
    let start = Instant::now();
    let outcome = state.store.evaluate(req.rule_id, &req.data);
    let elapsed = start.elapsed().as_secs_f64();

    let status = match &outcome {
        Ok(true) => "matched",
        Ok(false) => "not_matched",
        Err(_) => "error",
    };
    metrics::record_rule_evaluation(status, elapsed);

    let result = outcome?;
    Ok(Json(ApiResponse::success(EvaluateResponse { result })))
}

/// 修改规则
///
/// PUT /api/rules/{id}/modify
pub async fn modify_rule(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(req): Json<UpdateRuleRequest>,
) -> Result<Json<ApiResponse<RuleDto>>> {
    let rule = state.store.modify(id, &req.rule_string).inspect_err(|_| {
        metrics::record_rule_compilation("failure");
    })?;
    metrics::record_rule_compilation("success");

    info!(rule_id = id, "Rule modified");
    Ok(Json(ApiResponse::success(rule.into())))
}

/// 列出所有规则
///
/// GET /api/rules/list
pub async fn list_rules(
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<Vec<RuleListItemDto>>>> {
    let items: Vec<RuleListItemDto> = state.store.list().into_iter().map(Into::into).collect();
    Ok(Json(ApiResponse::success(items)))
}

/// 删除规则
///
/// DELETE /api/rules/{id}/delete
pub async fn delete_rule(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<ApiResponse<MessageResponse>>> {
    state.store.delete(id)?;

    let message = format!("规则 {} 已删除", id);
    Ok(Json(ApiResponse::success_with_message(
        MessageResponse::new(message.clone()),
        message,
    )))
}

/// 清空所有规则
///
/// DELETE /api/rules/delete_all
pub async fn delete_all_rules(
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<MessageResponse>>> {
    let count = state.store.delete_all();

    let message = format!("已删除 {} 条规则", count);
    Ok(Json(ApiResponse::success_with_message(
        MessageResponse::new(message.clone()),
        message,
    )))
}
