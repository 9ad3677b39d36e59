//! 语法树合并
//!
//! 从左到右以 AND 折叠多棵树：`[A, B, C]` 合并为 `AND(AND(A, B), C)`。
//! 每合并一棵树深度至少加一，结果超过 [`MAX_TREE_DEPTH`] 时拒绝合并。

use crate::error::{Result, RuleError};
use crate::models::{MAX_TREE_DEPTH, Node};

/// 以 AND 合并多棵语法树
pub fn combine<I>(trees: I) -> Result<Node>
where
    I: IntoIterator<Item = Node>,
{
    let mut iter = trees.into_iter();
    let first = iter.next().ok_or(RuleError::EmptyCombination)?;

    let mut depth = first.depth();
    iter.try_fold(first, |acc, next| {
        depth = depth.max(next.depth()) + 1;
        if depth > MAX_TREE_DEPTH {
            return Err(RuleError::NestingTooDeep(MAX_TREE_DEPTH));
        }
        Ok(Node::and(acc, next))
    })
}
