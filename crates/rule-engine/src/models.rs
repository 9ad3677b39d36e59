//! 规则引擎领域模型

use crate::error::{Result, RuleError};
use crate::operators::{ComparisonOperator, LogicalOperator};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

/// 语法树允许的最大深度
///
/// 同时约束规则字符串的括号嵌套层数。树的构建、评估、序列化和释放都是递归的，
/// 超过该深度的输入在构建前即被拒绝。
pub const MAX_TREE_DEPTH: usize = 256;

/// 语法树节点
///
/// 操作符节点恰好持有两个子树，操作数节点没有子节点。
/// 节点一经构建即不可变，合并与修改总是产生新的树。
#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    Operator {
        operator: LogicalOperator,
        left: Box<Node>,
        right: Box<Node>,
    },
    Operand(Operand),
}

impl Node {
    pub fn operand(value: impl Into<String>) -> Self {
        Self::Operand(Operand::new(value))
    }

    pub fn operator(operator: LogicalOperator, left: Node, right: Node) -> Self {
        Self::Operator {
            operator,
            left: Box::new(left),
            right: Box::new(right),
        }
    }

    pub fn and(left: Node, right: Node) -> Self {
        Self::operator(LogicalOperator::And, left, right)
    }

    pub fn or(left: Node, right: Node) -> Self {
        Self::operator(LogicalOperator::Or, left, right)
    }

    /// 树的深度（单个操作数为 1）
    pub fn depth(&self) -> usize {
        match self {
            Self::Operand(_) => 1,
            Self::Operator { left, right, .. } => 1 + left.depth().max(right.depth()),
        }
    }

    /// 按从左到右的顺序返回所有操作数
    pub fn operands(&self) -> Vec<&Operand> {
        let mut out = Vec::new();
        self.collect_operands(&mut out);
        out
    }

    fn collect_operands<'a>(&'a self, out: &mut Vec<&'a Operand>) {
        match self {
            Self::Operand(operand) => out.push(operand),
            Self::Operator { left, right, .. } => {
                left.collect_operands(out);
                right.collect_operands(out);
            }
        }
    }
}

impl fmt::Display for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Operand(operand) => write!(f, "{}", operand.value()),
            Self::Operator {
                operator,
                left,
                right,
            } => write!(f, "({} {} {})", left, operator, right),
        }
    }
}

/// 操作数节点
///
/// 保留原始片段文本（持久化时使用），同时在构建时预解析为 [`Condition`]。
/// 无法解析的片段仍可构建和序列化，只在评估时报错。
#[derive(Debug, Clone, PartialEq)]
pub struct Operand {
    value: String,
    parsed: std::result::Result<Condition, String>,
}

impl Operand {
    pub fn new(value: impl Into<String>) -> Self {
        let value = value.into();
        let parsed = Condition::parse_fragment(&value);
        Self { value, parsed }
    }

    /// 原始片段文本
    pub fn value(&self) -> &str {
        &self.value
    }

    /// 预解析的比较条件
    pub fn condition(&self) -> Result<&Condition> {
        self.parsed
            .as_ref()
            .map_err(|msg| RuleError::InvalidOperand(msg.clone()))
    }
}

/// 比较条件：`<字段> <操作符> <字面量>`
#[derive(Debug, Clone, PartialEq)]
pub struct Condition {
    pub field: String,
    pub operator: ComparisonOperator,
    pub literal: Literal,
}

impl Condition {
    pub fn new(field: impl Into<String>, operator: ComparisonOperator, literal: Literal) -> Self {
        Self {
            field: field.into(),
            operator,
            literal,
        }
    }

    /// 解析操作数片段
    pub fn parse(fragment: &str) -> Result<Self> {
        Self::parse_fragment(fragment).map_err(RuleError::InvalidOperand)
    }

    fn parse_fragment(fragment: &str) -> std::result::Result<Self, String> {
        let parts: Vec<&str> = fragment.split_whitespace().collect();
        let [field, operator, literal] = parts.as_slice() else {
            return Err(format!(
                "'{}' 应由字段、操作符、字面量三部分组成，实际 {} 部分",
                fragment,
                parts.len()
            ));
        };

        let operator = operator
            .parse::<ComparisonOperator>()
            .map_err(|e| format!("'{}': {}", fragment, e))?;
        let literal = Literal::parse_text(literal).map_err(|e| format!("'{}': {}", fragment, e))?;

        Ok(Self::new(*field, operator, literal))
    }
}

impl fmt::Display for Condition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {}", self.field, self.operator, self.literal)
    }
}

/// 字面量
///
/// 纯数字文本解析为整数，其余作为字符串并去除首尾引号。
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Literal {
    Integer(i64),
    String(String),
}

impl Literal {
    pub fn parse(text: &str) -> Result<Self> {
        Self::parse_text(text).map_err(RuleError::InvalidOperand)
    }

    fn parse_text(text: &str) -> std::result::Result<Self, String> {
        if !text.is_empty() && text.bytes().all(|b| b.is_ascii_digit()) {
            return text
                .parse::<i64>()
                .map(Self::Integer)
                .map_err(|_| format!("整数字面量超出范围: {}", text));
        }

        Ok(Self::String(
            text.trim_matches(|c| c == '\'' || c == '"').to_string(),
        ))
    }

    pub fn type_name(&self) -> &'static str {
        match self {
            Self::Integer(_) => "integer",
            Self::String(_) => "string",
        }
    }
}

impl fmt::Display for Literal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Integer(n) => write!(f, "{}", n),
            Self::String(s) => write!(f, "'{}'", s),
        }
    }
}

/// 记录中的字段值
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    Integer(i64),
    Float(f64),
    String(String),
}

impl FieldValue {
    pub fn type_name(&self) -> &'static str {
        match self {
            Self::Integer(_) => "integer",
            Self::Float(_) => "float",
            Self::String(_) => "string",
        }
    }
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Integer(n) => write!(f, "{}", n),
            Self::Float(x) => write!(f, "{}", x),
            Self::String(s) => write!(f, "'{}'", s),
        }
    }
}

impl From<i64> for FieldValue {
    fn from(n: i64) -> Self {
        Self::Integer(n)
    }
}

impl From<i32> for FieldValue {
    fn from(n: i32) -> Self {
        Self::Integer(n.into())
    }
}

impl From<f64> for FieldValue {
    fn from(x: f64) -> Self {
        Self::Float(x)
    }
}

impl From<&str> for FieldValue {
    fn from(s: &str) -> Self {
        Self::String(s.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(s: String) -> Self {
        Self::String(s)
    }
}

/// 评估记录 - 字段名到字段值的映射
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Record {
    fields: HashMap<String, FieldValue>,
}

impl Record {
    pub fn new() -> Self {
        Self::default()
    }

    /// 从 JSON 对象创建
    pub fn from_json(json: &str) -> std::result::Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// 链式添加字段
    pub fn with(mut self, field: impl Into<String>, value: impl Into<FieldValue>) -> Self {
        self.insert(field, value);
        self
    }

    pub fn insert(&mut self, field: impl Into<String>, value: impl Into<FieldValue>) {
        self.fields.insert(field.into(), value.into());
    }

    pub fn get(&self, field: &str) -> Option<&FieldValue> {
        self.fields.get(field)
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

impl<K: Into<String>, V: Into<FieldValue>> FromIterator<(K, V)> for Record {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut record = Self::new();
        for (field, value) in iter {
            record.insert(field, value);
        }
        record
    }
}

/// 评估结果
#[derive(Debug, Clone, Default, Serialize)]
pub struct EvaluationResult {
    pub matched: bool,
    pub matched_conditions: Vec<String>,
    pub evaluation_trace: Vec<String>,
    pub evaluation_time_ms: i64,
}
