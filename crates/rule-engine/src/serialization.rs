//! 语法树序列化
//!
//! 与持久化层交换的结构化形式：
//!
//! ```json
//! {"type": "operator", "value": "AND",
//!  "left":  {"type": "operand", "value": "age > 30", "left": null, "right": null},
//!  "right": {"type": "operand", "value": "department = 'Sales'", "left": null, "right": null}}
//! ```
//!
//! 输入时 `kind` 可作为 `type` 的别名，缺省的 `left`/`right` 视为 `null`。
//! 深度不超过 [`MAX_TREE_DEPTH`] 的树都能从 JSON 文本还原。

use crate::error::{Result, RuleError};
use crate::models::{MAX_TREE_DEPTH, Node};
use crate::operators::LogicalOperator;
use serde::{Deserialize, Serialize};

/// 节点类型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeKind {
    Operator,
    Operand,
}

/// 序列化后的语法树
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SerializedTree {
    #[serde(rename = "type", alias = "kind")]
    pub kind: NodeKind,
    pub value: String,
    #[serde(default)]
    pub left: Option<Box<SerializedTree>>,
    #[serde(default)]
    pub right: Option<Box<SerializedTree>>,
}

impl SerializedTree {
    /// 从 JSON 文本解析
    ///
    /// serde_json 默认的 128 层递归限制低于树的深度上限，这里先按文本扫描嵌套层数，
    /// 再关闭该限制解析。
    pub fn from_json(json: &str) -> Result<Self> {
        let nesting = json_nesting(json);
        if nesting > MAX_TREE_DEPTH {
            return Err(RuleError::MalformedTree(format!(
                "JSON 嵌套 {} 层，超过上限 {}",
                nesting, MAX_TREE_DEPTH
            )));
        }

        let mut de = serde_json::Deserializer::from_str(json);
        de.disable_recursion_limit();
        let tree = Self::deserialize(&mut de)?;
        de.end()?;
        Ok(tree)
    }

    /// 转换为 JSON 文本
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    /// 转换为 JSON 值
    pub fn to_value(&self) -> Result<serde_json::Value> {
        Ok(serde_json::to_value(self)?)
    }
}

/// JSON 文本中对象与数组的最大嵌套层数（忽略字符串内的括号）
fn json_nesting(json: &str) -> usize {
    let mut depth = 0usize;
    let mut max = 0usize;
    let mut in_string = false;
    let mut escaped = false;

    for byte in json.bytes() {
        if in_string {
            match byte {
                _ if escaped => escaped = false,
                b'\\' => escaped = true,
                b'"' => in_string = false,
                _ => {}
            }
            continue;
        }

        match byte {
            b'"' => in_string = true,
            b'{' | b'[' => {
                depth += 1;
                max = max.max(depth);
            }
            b'}' | b']' => depth = depth.saturating_sub(1),
            _ => {}
        }
    }

    max
}

/// 语法树 -> 结构化形式
pub fn serialize(node: &Node) -> SerializedTree {
    match node {
        Node::Operand(operand) => SerializedTree {
            kind: NodeKind::Operand,
            value: operand.value().to_string(),
            left: None,
            right: None,
        },
        Node::Operator {
            operator,
            left,
            right,
        } => SerializedTree {
            kind: NodeKind::Operator,
            value: operator.to_string(),
            left: Some(Box::new(serialize(left))),
            right: Some(Box::new(serialize(right))),
        },
    }
}

/// 结构化形式 -> 语法树
pub fn deserialize(tree: &SerializedTree) -> Result<Node> {
    deserialize_at(tree, "root", 1)
}

fn deserialize_at(tree: &SerializedTree, path: &str, depth: usize) -> Result<Node> {
    if depth > MAX_TREE_DEPTH {
        return Err(RuleError::MalformedTree(format!(
            "{}: 深度超过上限 {}",
            path, MAX_TREE_DEPTH
        )));
    }

    match tree.kind {
        NodeKind::Operand => {
            if tree.left.is_some() || tree.right.is_some() {
                return Err(RuleError::MalformedTree(format!(
                    "{}: 操作数节点不能有子节点",
                    path
                )));
            }
            if tree.value.trim().is_empty() {
                return Err(RuleError::MalformedTree(format!(
                    "{}: 操作数节点的 value 不能为空",
                    path
                )));
            }
            Ok(Node::operand(tree.value.clone()))
        }
        NodeKind::Operator => {
            let operator = tree
                .value
                .parse::<LogicalOperator>()
                .map_err(|e| RuleError::MalformedTree(format!("{}: {}", path, e)))?;

            let (Some(left), Some(right)) = (&tree.left, &tree.right) else {
                return Err(RuleError::MalformedTree(format!(
                    "{}: 操作符节点必须同时有 left 和 right",
                    path
                )));
            };

            let left = deserialize_at(left, &format!("{}.left", path), depth + 1)?;
            let right = deserialize_at(right, &format!("{}.right", path), depth + 1)?;
            Ok(Node::operator(operator, left, right))
        }
    }
}

impl From<&Node> for SerializedTree {
    fn from(node: &Node) -> Self {
        serialize(node)
    }
}

impl TryFrom<&SerializedTree> for Node {
    type Error = RuleError;

    fn try_from(tree: &SerializedTree) -> Result<Self> {
        deserialize(tree)
    }
}
