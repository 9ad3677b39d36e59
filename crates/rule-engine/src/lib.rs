//! AST 规则引擎
//!
//! 将带括号的 AND/OR 中缀规则表达式编译为二叉语法树，支持：
//! - 规则字符串分词与语法树构建
//! - 多棵语法树以 AND 合并
//! - 针对记录的短路求值
//! - 语法树与持久化结构之间的序列化
//! - 线程安全的内存规则存储

pub mod combiner;
pub mod compiler;
pub mod error;
pub mod evaluator;
pub mod executor;
pub mod models;
pub mod operators;
pub mod parser;
pub mod serialization;
pub mod store;
pub mod tokenizer;

pub use compiler::{combine, compile, evaluate, required_fields};
pub use error::{Result, RuleError};
pub use evaluator::ConditionEvaluator;
pub use executor::RuleExecutor;
pub use models::{
    Condition, EvaluationResult, FieldValue, Literal, MAX_TREE_DEPTH, Node, Operand, Record,
};
pub use operators::{ComparisonOperator, LogicalOperator};
pub use serialization::{NodeKind, SerializedTree};
pub use store::{RuleStore, RuleSummary, StoredRule};
pub use tokenizer::{Token, tokenize};
