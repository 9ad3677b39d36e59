//! 规则编译入口
//!
//! 面向持久化层的进程内接口：规则字符串编译为序列化语法树，
//! 多棵序列化语法树合并，以及针对记录的评估。
//! 所有函数都是无状态的纯函数，不修改任何输入。

use crate::combiner;
use crate::error::{Result, RuleError};
use crate::executor;
use crate::models::{Node, Record};
use crate::parser;
use crate::serialization::{self, SerializedTree};
use std::collections::BTreeSet;
use tracing::debug;

/// 编译规则字符串
pub fn compile(rule_string: &str) -> Result<SerializedTree> {
    let root = parser::parse(rule_string)?;
    debug!(rule = %rule_string, depth = root.depth(), "规则已编译");
    Ok(serialization::serialize(&root))
}

/// 以 AND 合并多棵序列化语法树
pub fn combine(trees: &[SerializedTree]) -> Result<SerializedTree> {
    if trees.is_empty() {
        return Err(RuleError::EmptyCombination);
    }

    let nodes = trees
        .iter()
        .map(serialization::deserialize)
        .collect::<Result<Vec<Node>>>()?;

    let combined = combiner::combine(nodes)?;
    debug!(count = trees.len(), depth = combined.depth(), "语法树已合并");
    Ok(serialization::serialize(&combined))
}

/// 针对记录评估序列化语法树
pub fn evaluate(tree: &SerializedTree, record: &Record) -> Result<bool> {
    let root = serialization::deserialize(tree)?;
    executor::evaluate(&root, record)
}

/// 提取语法树中引用的全部字段（无法解析的操作数不计入）
pub fn required_fields(node: &Node) -> BTreeSet<String> {
    node.operands()
        .into_iter()
        .filter_map(|operand| operand.condition().ok())
        .map(|condition| condition.field.clone())
        .collect()
}
