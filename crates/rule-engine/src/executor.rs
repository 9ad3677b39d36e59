//! 规则执行器
//!
//! 对语法树做深度优先的短路求值，可选记录评估追踪信息。

use crate::error::Result;
use crate::evaluator::ConditionEvaluator;
use crate::models::{EvaluationResult, Node, Operand, Record};
use crate::operators::LogicalOperator;
use std::time::Instant;

/// 评估语法树（不记录追踪）
pub fn evaluate(node: &Node, record: &Record) -> Result<bool> {
    match node {
        Node::Operand(operand) => {
            let condition = operand.condition()?;
            ConditionEvaluator::evaluate(record.get(&condition.field), condition)
        }
        Node::Operator {
            operator: LogicalOperator::And,
            left,
            right,
        } => Ok(evaluate(left, record)? && evaluate(right, record)?),
        Node::Operator {
            operator: LogicalOperator::Or,
            left,
            right,
        } => Ok(evaluate(left, record)? || evaluate(right, record)?),
    }
}

/// 规则执行器
pub struct RuleExecutor {
    /// 是否记录详细评估追踪
    trace_enabled: bool,
}

impl RuleExecutor {
    pub fn new() -> Self {
        Self {
            trace_enabled: false,
        }
    }

    /// 启用评估追踪
    pub fn with_trace(mut self) -> Self {
        self.trace_enabled = true;
        self
    }

    /// 执行规则评估
    pub fn execute(&self, root: &Node, record: &Record) -> Result<EvaluationResult> {
        let start = Instant::now();

        let mut result = EvaluationResult::default();
        let matched = self.evaluate_node(root, record, &mut result, "root")?;

        result.matched = matched;
        result.evaluation_time_ms = start.elapsed().as_millis() as i64;

        Ok(result)
    }

    fn evaluate_node(
        &self,
        node: &Node,
        record: &Record,
        result: &mut EvaluationResult,
        path: &str,
    ) -> Result<bool> {
        match node {
            Node::Operand(operand) => self.evaluate_operand(operand, record, result, path),
            Node::Operator {
                operator,
                left,
                right,
            } => self.evaluate_operator(*operator, left, right, record, result, path),
        }
    }

    fn evaluate_operand(
        &self,
        operand: &Operand,
        record: &Record,
        result: &mut EvaluationResult,
        path: &str,
    ) -> Result<bool> {
        let condition = operand.condition()?;
        let field_value = record.get(&condition.field);
        let matched = ConditionEvaluator::evaluate(field_value, condition)?;

        if self.trace_enabled {
            result.evaluation_trace.push(format!(
                "{}: {} (实际值 {}) => {}",
                path,
                condition,
                field_value.map(ToString::to_string).unwrap_or_default(),
                if matched { "MATCHED" } else { "NOT_MATCHED" }
            ));
        }

        if matched {
            result
                .matched_conditions
                .push(format!("{}: {}", path, operand.value()));
        }

        Ok(matched)
    }

    /// 评估操作符节点（短路求值）
    fn evaluate_operator(
        &self,
        operator: LogicalOperator,
        left: &Node,
        right: &Node,
        record: &Record,
        result: &mut EvaluationResult,
        path: &str,
    ) -> Result<bool> {
        let left_path = format!("{}.left", path);
        let left_matched = self.evaluate_node(left, record, result, &left_path)?;

        // AND 遇到 false、OR 遇到 true 时右子树不再评估
        let short_circuit = match operator {
            LogicalOperator::And => !left_matched,
            LogicalOperator::Or => left_matched,
        };

        if short_circuit {
            if self.trace_enabled {
                result
                    .evaluation_trace
                    .push(format!("{}: {} 短路 - 跳过右子树", path, operator));
            }
            return Ok(left_matched);
        }

        let right_path = format!("{}.right", path);
        let matched = self.evaluate_node(right, record, result, &right_path)?;

        if self.trace_enabled {
            result.evaluation_trace.push(format!(
                "{}: {} => {}",
                path,
                operator,
                if matched { "MATCHED" } else { "NOT_MATCHED" }
            ));
        }

        Ok(matched)
    }
}

impl Default for RuleExecutor {
    fn default() -> Self {
        Self::new()
    }
}
