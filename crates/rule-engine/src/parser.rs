//! 语法树构建器
//!
//! 先按括号把词法单元收拢为嵌套分组，再递归拆分为二叉树：
//! 先在顶层找第一个 `OR`，找不到再找第一个 `AND`，都没有则拼接为操作数。
//! 因此 `AND` 比 `OR` 结合更紧，同级操作符链为右结合
//! （`A OR B OR C` 构建为 `OR(A, OR(B, C))`）。
//! 括号嵌套层数与树深度都不得超过 [`MAX_TREE_DEPTH`]。

use crate::error::{Result, RuleError};
use crate::models::{MAX_TREE_DEPTH, Node};
use crate::operators::LogicalOperator;
use crate::tokenizer::{Token, tokenize};

/// 分组元素：词法单元或已闭合的括号分组
#[derive(Debug, Clone, PartialEq)]
enum Element {
    Token(Token),
    Group(Vec<Element>),
}

/// 解析规则字符串为语法树
pub fn parse(input: &str) -> Result<Node> {
    build(tokenize(input))
}

/// 从词法单元序列构建语法树
pub fn build(tokens: Vec<Token>) -> Result<Node> {
    if tokens.is_empty() {
        return Err(RuleError::EmptyExpression);
    }

    let root = group_tokens(tokens)?;
    build_group(&root, 1)
}

/// 按括号嵌套收拢词法单元
fn group_tokens(tokens: Vec<Token>) -> Result<Vec<Element>> {
    let mut stack: Vec<Vec<Element>> = vec![Vec::new()];

    for token in tokens {
        match token {
            Token::LParen => {
                // 栈中包含根分组
                if stack.len() > MAX_TREE_DEPTH {
                    return Err(RuleError::NestingTooDeep(MAX_TREE_DEPTH));
                }
                stack.push(Vec::new());
            }
            Token::RParen => {
                // 只剩根分组时遇到右括号
                let group = stack
                    .pop()
                    .filter(|_| !stack.is_empty())
                    .ok_or(RuleError::UnbalancedParentheses)?;
                let parent = stack
                    .last_mut()
                    .ok_or(RuleError::UnbalancedParentheses)?;
                parent.push(Element::Group(group));
            }
            other => {
                let current = stack
                    .last_mut()
                    .ok_or(RuleError::UnbalancedParentheses)?;
                current.push(Element::Token(other));
            }
        }
    }

    let root = stack.pop().ok_or(RuleError::UnbalancedParentheses)?;
    if !stack.is_empty() {
        return Err(RuleError::UnbalancedParentheses);
    }

    Ok(root)
}

fn build_group(mut elements: &[Element], depth: usize) -> Result<Node> {
    if depth > MAX_TREE_DEPTH {
        return Err(RuleError::NestingTooDeep(MAX_TREE_DEPTH));
    }

    // 冗余括号不增加树深度
    while let [Element::Group(inner)] = elements {
        elements = inner.as_slice();
    }

    for (keyword, operator) in [
        (Token::Or, LogicalOperator::Or),
        (Token::And, LogicalOperator::And),
    ] {
        if let Some(idx) = elements
            .iter()
            .position(|e| matches!(e, Element::Token(t) if *t == keyword))
        {
            let left = build_group(&elements[..idx], depth + 1)?;
            let right = build_group(&elements[idx + 1..], depth + 1)?;
            return Ok(Node::operator(operator, left, right));
        }
    }

    build_operand(elements)
}

/// 将剩余的片段拼接为一个操作数
fn build_operand(elements: &[Element]) -> Result<Node> {
    if elements.is_empty() {
        return Err(RuleError::EmptyExpression);
    }

    let mut words = Vec::with_capacity(elements.len());
    for element in elements {
        match element {
            Element::Token(token) => words.push(token.to_string()),
            Element::Group(_) => {
                return Err(RuleError::InvalidOperand(format!(
                    "括号分组与操作数片段之间缺少 AND/OR: {}",
                    render(elements)
                )));
            }
        }
    }

    Ok(Node::operand(words.join(" ")))
}

fn render(elements: &[Element]) -> String {
    elements
        .iter()
        .map(|e| match e {
            Element::Token(t) => t.to_string(),
            Element::Group(g) => format!("({})", render(g)),
        })
        .collect::<Vec<_>>()
        .join(" ")
}
