//! 规则引擎集成测试
//!
//! 测试完整的编译、合并、序列化、评估工作流。

use rule_engine::serialization::{deserialize, serialize};
use rule_engine::{
    Node, Record, RuleError, RuleExecutor, RuleStore, SerializedTree, combine, compile, evaluate,
    parser,
};

/// 创建测试记录：一名销售部员工
fn sales_employee() -> Record {
    Record::new()
        .with("age", 35)
        .with("department", "Sales")
        .with("salary", 60000)
        .with("experience", 6)
}

/// 一组覆盖各分支的记录
fn sample_records() -> Vec<Record> {
    let mut records = Vec::new();
    for age in [20, 30, 35, 50] {
        for department in ["Sales", "Marketing", "HR"] {
            for salary in [10000, 50000, 60000] {
                for experience in [1, 5, 6] {
                    records.push(
                        Record::new()
                            .with("age", age)
                            .with("department", department)
                            .with("salary", salary)
                            .with("experience", experience),
                    );
                }
            }
        }
    }
    records
}

// ==================== 示例规则 ====================

#[test]
fn test_and_rule_group() {
    let tree = compile("(age > 30 AND department = 'Sales')").unwrap();

    let record = Record::new().with("age", 35).with("department", "Sales");
    assert!(evaluate(&tree, &record).unwrap());

    let record = Record::new().with("age", 20).with("department", "Sales");
    assert!(!evaluate(&tree, &record).unwrap());
}

#[test]
fn test_or_rule_group() {
    let tree = compile("(salary > 50000 OR experience > 5)").unwrap();
    let record = Record::new().with("salary", 40000).with("experience", 6);
    assert!(evaluate(&tree, &record).unwrap());
}

#[test]
fn test_combined_rules_all_must_match() {
    let combined = combine(&[
        compile("age > 30").unwrap(),
        compile("salary > 50000").unwrap(),
    ])
    .unwrap();

    let record = Record::new().with("age", 40).with("salary", 10000);
    assert!(!evaluate(&combined, &record).unwrap());
}

#[test]
fn test_missing_field_error() {
    let tree = compile("age > 30").unwrap();
    match evaluate(&tree, &Record::new()) {
        Err(RuleError::MissingField(field)) => assert_eq!(field, "age"),
        other => panic!("expected MissingField(\"age\"), got {:?}", other),
    }
}

#[test]
fn test_or_chain_shape() {
    let tree = deserialize(&compile("A OR B OR C").unwrap()).unwrap();
    assert_eq!(
        tree,
        Node::or(
            Node::operand("A"),
            Node::or(Node::operand("B"), Node::operand("C"))
        )
    );
}

// ==================== 性质测试 ====================

#[test]
fn test_round_trip_for_compiled_and_combined_trees() {
    let rules = [
        "age > 30",
        "(age > 30 AND department = 'Sales')",
        "(salary > 50000 OR experience > 5)",
        "a = 1 AND b = 2 OR c = 3 AND (d = 4 OR e = 5)",
    ];

    let mut trees = Vec::new();
    for rule in rules {
        let tree = parser::parse(rule).unwrap();
        assert_eq!(deserialize(&serialize(&tree)).unwrap(), tree);
        trees.push(tree);
    }

    let combined = rule_engine::combiner::combine(trees).unwrap();
    assert_eq!(deserialize(&serialize(&combined)).unwrap(), combined);
}

#[test]
fn test_round_trip_through_json_text() {
    let tree = compile("((age > 30 AND department = 'Sales') OR (age < 25 AND department = 'Marketing'))").unwrap();
    let text = tree.to_json().unwrap();
    let restored = SerializedTree::from_json(&text).unwrap();
    assert_eq!(restored, tree);
}

#[test]
fn test_combined_many_rules_round_trip_through_json_text() {
    let trees: Vec<SerializedTree> = (0..150)
        .map(|i| compile(&format!("f{i} = {i}")).unwrap())
        .collect();

    let combined = combine(&trees).unwrap();
    let restored = SerializedTree::from_json(&combined.to_json().unwrap()).unwrap();
    assert_eq!(restored, combined);

    let record: Record = (0..150).map(|i| (format!("f{i}"), i as i64)).collect();
    assert!(evaluate(&restored, &record).unwrap());
}

#[test]
fn test_deeply_nested_rule_is_rejected() {
    let rule = format!("{}a = 1{}", "(".repeat(200_000), ")".repeat(200_000));
    assert!(matches!(compile(&rule), Err(RuleError::NestingTooDeep(_))));

    let trees: Vec<SerializedTree> = (0..300).map(|_| compile("a = 1").unwrap()).collect();
    assert!(matches!(combine(&trees), Err(RuleError::NestingTooDeep(_))));
}

#[test]
fn test_combine_matches_conjunction_of_parts() {
    let parts = [
        compile("age > 30").unwrap(),
        compile("(salary > 50000 OR experience > 5)").unwrap(),
        compile("department = 'Sales'").unwrap(),
    ];
    let combined = combine(&parts).unwrap();

    for record in sample_records() {
        let expected = parts
            .iter()
            .map(|p| evaluate(p, &record).unwrap())
            .all(|matched| matched);
        assert_eq!(evaluate(&combined, &record).unwrap(), expected, "{:?}", record);
    }
}

#[test]
fn test_combine_is_left_associative() {
    let a = compile("a = 1").unwrap();
    let b = compile("b = 2").unwrap();
    let c = compile("c = 3").unwrap();

    let combined = deserialize(&combine(&[a, b, c]).unwrap()).unwrap();
    assert_eq!(
        combined,
        Node::and(
            Node::and(Node::operand("a = 1"), Node::operand("b = 2")),
            Node::operand("c = 3")
        )
    );
}

#[test]
fn test_short_circuit_never_touches_right_side() {
    let record = Record::new().with("age", 20);

    // AND 左侧为 false，右侧字段缺失也不会报错
    let and_tree = compile("age > 30 AND bonus > 1").unwrap();
    assert!(!evaluate(&and_tree, &record).unwrap());

    // OR 左侧为 true，右侧字段缺失也不会报错
    let or_tree = compile("age < 30 OR bonus > 1").unwrap();
    assert!(evaluate(&or_tree, &record).unwrap());

    // 右侧操作数无效同样不会被评估
    let invalid_right = compile("age < 30 OR bonus >= 1").unwrap();
    assert!(evaluate(&invalid_right, &record).unwrap());
}

#[test]
fn test_compile_never_fails_for_balanced_rules() {
    let rules = [
        "x",
        "A OR B OR C",
        "(a > 1)",
        "((a > 1) AND (b < 2)) OR c = 'z'",
        "name = 'Ann' AND (age > 1 OR (age < 0 AND flag = 1))",
    ];
    for rule in rules {
        assert!(compile(rule).is_ok(), "rule: {}", rule);
    }
}

#[test]
fn test_compile_does_not_mutate_inputs_on_combine() {
    let a = compile("a = 1").unwrap();
    let b = compile("b = 2").unwrap();
    let a_before = a.clone();
    let b_before = b.clone();

    let _ = combine(&[a.clone(), b.clone()]).unwrap();

    assert_eq!(a, a_before);
    assert_eq!(b, b_before);
}

// ==================== 错误分类 ====================

#[test]
fn test_error_taxonomy() {
    assert!(matches!(compile("(a = 1"), Err(RuleError::UnbalancedParentheses)));
    assert!(matches!(compile("a = 1)"), Err(RuleError::UnbalancedParentheses)));
    assert!(matches!(compile(""), Err(RuleError::EmptyExpression)));
    assert!(matches!(combine(&[]), Err(RuleError::EmptyCombination)));
    assert!(matches!(
        SerializedTree::from_json(r#"{"type": "operator"}"#),
        Err(RuleError::MalformedTree(_))
    ));

    let record = Record::new().with("name", "Ann");
    let tree = compile("name > 3").unwrap();
    assert!(matches!(
        evaluate(&tree, &record),
        Err(RuleError::TypeMismatch { .. })
    ));

    let tree = compile("name ~ 'Ann'").unwrap();
    assert!(matches!(
        evaluate(&tree, &record),
        Err(RuleError::InvalidOperand(_))
    ));
}

// ==================== 完整工作流 ====================

#[test]
fn test_full_workflow_with_store() {
    let store = RuleStore::new();

    let r1 = store.create("(age > 30 AND department = 'Sales')").unwrap();
    let r2 = store.create("(salary > 50000 OR experience > 5)").unwrap();
    let combined = store.combine(&[r1.id, r2.id]).unwrap();

    assert!(store.evaluate(combined.id, &sales_employee()).unwrap());

    store.modify(r1.id, "age > 40 AND department = 'HR'").unwrap();
    assert!(!store.evaluate(r1.id, &sales_employee()).unwrap());
    // 已合并的规则持有独立的语法树，不受修改影响
    assert!(store.evaluate(combined.id, &sales_employee()).unwrap());

    assert_eq!(store.list().len(), 3);
    store.delete(r1.id).unwrap();
    assert_eq!(store.list().len(), 2);
    assert_eq!(store.delete_all(), 2);
}

#[test]
fn test_traced_execution_of_compiled_rule() {
    let tree = deserialize(&compile("(age > 30 AND department = 'Sales')").unwrap()).unwrap();
    let result = RuleExecutor::new()
        .with_trace()
        .execute(&tree, &sales_employee())
        .unwrap();

    assert!(result.matched);
    assert_eq!(result.matched_conditions.len(), 2);
    assert!(!result.evaluation_trace.is_empty());
}

#[test]
fn test_record_from_json_payload() {
    let record = Record::from_json(
        r#"{"age": 35, "department": "Sales", "salary": 60000.5, "experience": 6}"#,
    )
    .unwrap();
    let tree = compile("salary > 60000 AND department = 'Sales'").unwrap();
    assert!(evaluate(&tree, &record).unwrap());
}
