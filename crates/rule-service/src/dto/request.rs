//! 请求 DTO

use rule_engine::Record;
use serde::{Deserialize, Serialize};

/// 创建规则请求
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateRuleRequest {
    pub rule_string: String,
}

/// 修改规则请求
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateRuleRequest {
    pub rule_string: String,
}

/// 评估规则请求
///
/// `data` 为字段名到整数、浮点数或字符串的映射
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EvaluateRuleRequest {
    pub rule_id: i64,
    pub data: Record,
}
