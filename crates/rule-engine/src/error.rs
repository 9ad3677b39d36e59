//! 规则引擎错误类型

use thiserror::Error;

#[derive(Debug, Error)]
pub enum RuleError {
    #[error("括号不匹配")]
    UnbalancedParentheses,

    #[error("表达式为空")]
    EmptyExpression,

    #[error("合并规则列表不能为空")]
    EmptyCombination,

    #[error("语法树结构无效: {0}")]
    MalformedTree(String),

    #[error("字段不存在: {0}")]
    MissingField(String),

    #[error("类型不匹配: 操作符 {operator} 期望 {expected}, 实际 {actual}")]
    TypeMismatch {
        operator: String,
        expected: String,
        actual: String,
    },

    #[error("无效的操作数: {0}")]
    InvalidOperand(String),

    #[error("嵌套深度超过上限 {0}")]
    NestingTooDeep(usize),

    #[error("规则未找到: {0}")]
    RuleNotFound(i64),
}

impl From<serde_json::Error> for RuleError {
    fn from(err: serde_json::Error) -> Self {
        Self::MalformedTree(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, RuleError>;
