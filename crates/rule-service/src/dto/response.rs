//! 响应 DTO

use chrono::{DateTime, Utc};
use rule_engine::{RuleSummary, SerializedTree, StoredRule};
use serde::{Deserialize, Serialize};

/// 统一 API 响应结构
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub code: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
}

impl<T> ApiResponse<T> {
    /// 创建成功响应
    pub fn success(data: T) -> Self {
        Self {
            success: true,
            code: "SUCCESS".to_string(),
            message: "操作成功".to_string(),
            data: Some(data),
        }
    }

    /// 创建成功响应（自定义消息）
    pub fn success_with_message(data: T, message: impl Into<String>) -> Self {
        Self {
            success: true,
            code: "SUCCESS".to_string(),
            message: message.into(),
            data: Some(data),
        }
    }
}

/// 规则详情 DTO
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RuleDto {
    pub id: i64,
    pub rule_string: String,
    pub ast: SerializedTree,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<StoredRule> for RuleDto {
    fn from(rule: StoredRule) -> Self {
        Self {
            id: rule.id,
            rule_string: rule.rule_string,
            ast: rule.ast,
            created_at: rule.created_at,
            updated_at: rule.updated_at,
        }
    }
}

/// 规则列表项 DTO
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuleListItemDto {
    pub id: i64,
    pub rule_string: String,
}

impl From<RuleSummary> for RuleListItemDto {
    fn from(summary: RuleSummary) -> Self {
        Self {
            id: summary.id,
            rule_string: summary.rule_string,
        }
    }
}

/// 评估结果
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EvaluateResponse {
    pub result: bool,
}

/// 仅含提示信息的响应
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}
