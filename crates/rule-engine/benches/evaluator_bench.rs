//! 规则引擎性能基准测试
//!
//! 测试覆盖：
//! - 规则字符串编译
//! - 简单与嵌套规则评估
//! - 多规则合并
//! - 序列化往返

use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use rule_engine::serialization::{deserialize, serialize};
use rule_engine::{Record, RuleExecutor, SerializedTree, combine, compile, evaluate, parser};
use std::hint::black_box;

const SIMPLE_RULE: &str = "age > 30";
const NESTED_RULE: &str = "((age > 30 AND department = 'Sales') OR (age < 25 AND department = 'Marketing')) AND (salary > 50000 OR experience > 5)";

fn create_record() -> Record {
    Record::new()
        .with("age", 35)
        .with("department", "Sales")
        .with("salary", 60000)
        .with("experience", 6)
}

/// 生成 n 个条件的 AND 链
fn create_chain_rule(conditions: usize) -> String {
    (0..conditions)
        .map(|i| format!("field_{} > {}", i, i))
        .collect::<Vec<_>>()
        .join(" AND ")
}

fn bench_compile(c: &mut Criterion) {
    let mut group = c.benchmark_group("compile");

    group.bench_function("simple", |b| b.iter(|| compile(black_box(SIMPLE_RULE))));
    group.bench_function("nested", |b| b.iter(|| compile(black_box(NESTED_RULE))));

    for size in [4, 16, 64] {
        let rule = create_chain_rule(size);
        group.bench_with_input(BenchmarkId::new("and_chain", size), &rule, |b, rule| {
            b.iter(|| compile(black_box(rule)))
        });
    }

    group.finish();
}

fn bench_evaluate(c: &mut Criterion) {
    let mut group = c.benchmark_group("evaluate");
    let record = create_record();

    let simple = parser::parse(SIMPLE_RULE).unwrap();
    let nested = parser::parse(NESTED_RULE).unwrap();
    let executor = RuleExecutor::new();
    let traced = RuleExecutor::new().with_trace();

    group.bench_function("simple_tree", |b| {
        b.iter(|| rule_engine::executor::evaluate(black_box(&simple), black_box(&record)))
    });
    group.bench_function("nested_tree", |b| {
        b.iter(|| rule_engine::executor::evaluate(black_box(&nested), black_box(&record)))
    });
    group.bench_function("nested_executor", |b| {
        b.iter(|| executor.execute(black_box(&nested), black_box(&record)))
    });
    group.bench_function("nested_executor_traced", |b| {
        b.iter(|| traced.execute(black_box(&nested), black_box(&record)))
    });

    // 包含反序列化开销的完整评估入口
    let serialized = compile(NESTED_RULE).unwrap();
    group.bench_function("nested_serialized", |b| {
        b.iter(|| evaluate(black_box(&serialized), black_box(&record)))
    });

    group.finish();
}

fn bench_combine(c: &mut Criterion) {
    let mut group = c.benchmark_group("combine");

    for count in [2, 8, 32] {
        let trees: Vec<SerializedTree> = (0..count)
            .map(|i| compile(&format!("field_{} > {}", i, i)).unwrap())
            .collect();
        group.bench_with_input(BenchmarkId::new("trees", count), &trees, |b, trees| {
            b.iter(|| combine(black_box(trees)))
        });
    }

    group.finish();
}

fn bench_serialization(c: &mut Criterion) {
    let mut group = c.benchmark_group("serialization");
    let tree = parser::parse(NESTED_RULE).unwrap();
    let serialized = serialize(&tree);
    let text = serialized.to_json().unwrap();

    group.bench_function("serialize", |b| b.iter(|| serialize(black_box(&tree))));
    group.bench_function("deserialize", |b| {
        b.iter(|| deserialize(black_box(&serialized)))
    });
    group.bench_function("from_json", |b| {
        b.iter(|| SerializedTree::from_json(black_box(&text)))
    });

    group.finish();
}

criterion_group!(
    benches,
    bench_compile,
    bench_evaluate,
    bench_combine,
    bench_serialization
);
criterion_main!(benches);
