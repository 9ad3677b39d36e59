//! 规则字符串分词器
//!
//! 在每个括号两侧补空格后按空白切分。此阶段不做任何校验，
//! 括号不匹配等错误由语法树构建阶段报告。

use std::fmt;

/// 词法单元
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Token {
    LParen,
    RParen,
    And,
    Or,
    /// 操作数片段（字段、比较符或字面量）
    Fragment(String),
}

impl Token {
    fn from_word(word: &str) -> Self {
        match word {
            "(" => Self::LParen,
            ")" => Self::RParen,
            "AND" => Self::And,
            "OR" => Self::Or,
            other => Self::Fragment(other.to_string()),
        }
    }

    pub fn is_keyword(&self) -> bool {
        matches!(self, Self::And | Self::Or)
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::LParen => f.write_str("("),
            Self::RParen => f.write_str(")"),
            Self::And => f.write_str("AND"),
            Self::Or => f.write_str("OR"),
            Self::Fragment(s) => f.write_str(s),
        }
    }
}

/// 将规则字符串切分为词法单元序列
pub fn tokenize(input: &str) -> Vec<Token> {
    let padded = input.replace('(', " ( ").replace(')', " ) ");
    padded.split_whitespace().map(Token::from_word).collect()
}
