//! 条件评估器
//!
//! 实现叶子节点的比较逻辑。整数与浮点数之间可以比较，
//! 字符串与数值之间不做隐式转换。

use crate::error::{Result, RuleError};
use crate::models::{Condition, FieldValue, Literal};
use crate::operators::ComparisonOperator;
use std::cmp::Ordering;

/// 条件评估器
pub struct ConditionEvaluator;

impl ConditionEvaluator {
    /// 评估条件
    ///
    /// # Arguments
    /// * `field_value` - 从记录中获取的字段值
    /// * `condition` - 预解析的比较条件
    pub fn evaluate(field_value: Option<&FieldValue>, condition: &Condition) -> Result<bool> {
        let field_value =
            field_value.ok_or_else(|| RuleError::MissingField(condition.field.clone()))?;

        match condition.operator {
            ComparisonOperator::Eq => Ok(Self::eq(field_value, &condition.literal)),
            ComparisonOperator::Gt => {
                Self::compare(field_value, &condition.literal, condition.operator)
                    .map(|ord| ord == Some(Ordering::Greater))
            }
            ComparisonOperator::Lt => {
                Self::compare(field_value, &condition.literal, condition.operator)
                    .map(|ord| ord == Some(Ordering::Less))
            }
        }
    }

    /// 相等比较，字符串和数值之间恒不相等
    fn eq(field: &FieldValue, expected: &Literal) -> bool {
        match (field, expected) {
            (FieldValue::Integer(a), Literal::Integer(b)) => a == b,
            (FieldValue::Float(a), Literal::Integer(b)) => *a == *b as f64,
            (FieldValue::String(a), Literal::String(b)) => a == b,
            _ => false,
        }
    }

    /// 有序比较
    fn compare(
        field: &FieldValue,
        expected: &Literal,
        operator: ComparisonOperator,
    ) -> Result<Option<Ordering>> {
        match (field, expected) {
            (FieldValue::Integer(a), Literal::Integer(b)) => Ok(Some(a.cmp(b))),
            (FieldValue::Float(a), Literal::Integer(b)) => Ok(a.partial_cmp(&(*b as f64))),
            (FieldValue::String(a), Literal::String(b)) => Ok(Some(a.as_str().cmp(b.as_str()))),
            _ => Err(RuleError::TypeMismatch {
                operator: operator.to_string(),
                expected: expected.type_name().to_string(),
                actual: field.type_name().to_string(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cond(fragment: &str) -> Condition {
        Condition::parse(fragment).unwrap()
    }

    #[test]
    fn test_integer_comparison() {
        let v = FieldValue::Integer(35);
        assert!(ConditionEvaluator::evaluate(Some(&v), &cond("age > 30")).unwrap());
        assert!(!ConditionEvaluator::evaluate(Some(&v), &cond("age < 30")).unwrap());
        assert!(ConditionEvaluator::evaluate(Some(&v), &cond("age = 35")).unwrap());
        assert!(!ConditionEvaluator::evaluate(Some(&v), &cond("age > 35")).unwrap());
    }

    #[test]
    fn test_float_against_integer_literal() {
        let v = FieldValue::Float(30.5);
        assert!(ConditionEvaluator::evaluate(Some(&v), &cond("score > 30")).unwrap());
        assert!(ConditionEvaluator::evaluate(Some(&v), &cond("score < 31")).unwrap());
        assert!(!ConditionEvaluator::evaluate(Some(&v), &cond("score = 30")).unwrap());

        let whole = FieldValue::Float(5.0);
        assert!(ConditionEvaluator::evaluate(Some(&whole), &cond("score = 5")).unwrap());
    }

    #[test]
    fn test_string_comparison() {
        let v = FieldValue::String("Sales".to_string());
        assert!(ConditionEvaluator::evaluate(Some(&v), &cond("department = 'Sales'")).unwrap());
        assert!(!ConditionEvaluator::evaluate(Some(&v), &cond("department = 'HR'")).unwrap());
        // 字典序比较
        assert!(ConditionEvaluator::evaluate(Some(&v), &cond("department > 'Marketing'")).unwrap());
        assert!(ConditionEvaluator::evaluate(Some(&v), &cond("department < 'Support'")).unwrap());
    }

    #[test]
    fn test_no_cross_type_equality() {
        let s = FieldValue::String("5".to_string());
        assert!(!ConditionEvaluator::evaluate(Some(&s), &cond("level = 5")).unwrap());

        let n = FieldValue::Integer(5);
        assert!(!ConditionEvaluator::evaluate(Some(&n), &cond("level = 'five'")).unwrap());
    }

    #[test]
    fn test_ordered_type_mismatch() {
        let s = FieldValue::String("abc".to_string());
        let result = ConditionEvaluator::evaluate(Some(&s), &cond("age > 30"));
        assert!(matches!(result, Err(RuleError::TypeMismatch { .. })));

        let n = FieldValue::Integer(40);
        let result = ConditionEvaluator::evaluate(Some(&n), &cond("age < 'old'"));
        assert!(matches!(result, Err(RuleError::TypeMismatch { .. })));

        // 小数字面量按字符串处理
        let f = FieldValue::Float(6.0);
        let result = ConditionEvaluator::evaluate(Some(&f), &cond("rating > 5.5"));
        assert!(matches!(result, Err(RuleError::TypeMismatch { .. })));
    }

    #[test]
    fn test_missing_field() {
        let result = ConditionEvaluator::evaluate(None, &cond("age > 30"));
        match result {
            Err(RuleError::MissingField(field)) => assert_eq!(field, "age"),
            other => panic!("expected MissingField, got {:?}", other),
        }
    }
}
