//! 规则服务错误类型定义
//!
//! 将规则引擎错误映射为 HTTP 状态码与稳定的错误码

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use rule_engine::RuleError;
use serde_json::json;

/// 规则服务错误类型
#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    #[error("规则不存在: {0}")]
    RuleNotFound(i64),

    // 规则字符串无法构建为语法树
    #[error("规则语法错误: {0}")]
    InvalidRule(String),

    #[error("规则合并失败: {0}")]
    InvalidCombination(String),

    #[error("规则评估失败: {0}")]
    EvaluationFailed(String),

    // 已存储的语法树无法还原，属于服务端数据问题
    #[error("语法树结构无效: {0}")]
    MalformedTree(String),
}

impl ServiceError {
    /// 返回对应的 HTTP 状态码
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::RuleNotFound(_) => StatusCode::NOT_FOUND,
            Self::InvalidRule(_) | Self::InvalidCombination(_) | Self::EvaluationFailed(_) => {
                StatusCode::BAD_REQUEST
            }
            Self::MalformedTree(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// 返回错误码（用于 API 响应）
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::RuleNotFound(_) => "RULE_NOT_FOUND",
            Self::InvalidRule(_) => "INVALID_RULE",
            Self::InvalidCombination(_) => "INVALID_COMBINATION",
            Self::EvaluationFailed(_) => "EVALUATION_FAILED",
            Self::MalformedTree(_) => "MALFORMED_TREE",
        }
    }
}

impl IntoResponse for ServiceError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        // 服务端数据损坏只返回通用提示，详情记录日志
        let message = match &self {
            Self::MalformedTree(e) => {
                tracing::error!(error = %e, "已存储的语法树无法还原");
                "服务内部错误，请稍后重试".to_string()
            }
            other => other.to_string(),
        };

        let body = json!({
            "success": false,
            "code": self.error_code(),
            "message": message,
            "data": serde_json::Value::Null
        });

        (status, axum::Json(body)).into_response()
    }
}

/// 从规则引擎错误转换
impl From<RuleError> for ServiceError {
    fn from(err: RuleError) -> Self {
        match err {
            RuleError::RuleNotFound(id) => Self::RuleNotFound(id),
            RuleError::UnbalancedParentheses
            | RuleError::EmptyExpression
            | RuleError::InvalidOperand(_)
            | RuleError::NestingTooDeep(_) => Self::InvalidRule(err.to_string()),
            RuleError::EmptyCombination => Self::InvalidCombination(err.to_string()),
            RuleError::MissingField(_) | RuleError::TypeMismatch { .. } => {
                Self::EvaluationFailed(err.to_string())
            }
            RuleError::MalformedTree(msg) => Self::MalformedTree(msg),
        }
    }
}

/// 服务层 Result 类型别名
pub type Result<T> = std::result::Result<T, ServiceError>;
