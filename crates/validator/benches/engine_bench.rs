//! 규칙 평가 벤치마크
//!
//! 단일/다중 규칙 평가 성능과 규칙 수 스케일링을 측정합니다.

use criterion::{BenchmarkId, Criterion, Throughput, black_box, criterion_group, criterion_main};
use serde_json::json;

use vigil_core::types::LogEntry;
use vigil_validator::rule::{RuleEngine, RuleLoader};

fn sample_entry() -> LogEntry {
    let value = json!({
        "robot_id": "agv-7",
        "timestamp": "2026-01-01T08:30:00Z",
        "zone": "dock",
        "speed": 1.8,
        "status": "moving",
        "battery": 64,
        "error_code": "E1042",
        "location": {"x": 12.5, "y": 3.2},
    });
    LogEntry::from_json(&value, 0).unwrap()
}

fn numeric_rules(count: usize) -> RuleEngine {
    let rules: Vec<serde_json::Value> = (0..count)
        .map(|i| {
            json!({
                "id": format!("speed_{i}"),
                "field": "speed",
                "operator": "<=",
                "threshold": 2.0 + i as f64,
            })
        })
        .collect();
    let doc = json!({"rules": rules});
    RuleEngine::new(RuleLoader::parse_json(&doc.to_string()).unwrap())
}

fn mixed_rules() -> RuleEngine {
    let doc = json!({"rules": [
        {"id": "speed_max", "field": "speed", "operator": "<=", "threshold": 2.0},
        {"id": "status_known", "field": "status", "operator": "in",
         "threshold": ["idle", "moving", "charging"]},
        {"id": "error_format", "field": "error_code", "operator": "regex",
         "threshold": "^E[0-9]{4}$"},
        {"id": "battery_present", "field": "battery", "operator": "exists", "threshold": true},
        {"id": "dock_crawl", "field": "speed", "operator": "<=", "threshold": 0.5,
         "condition": {"field": "zone", "operator": "==", "value": "dock"}},
        {"id": "x_bound", "field": "location.x", "operator": "<", "threshold": 100.0},
    ]});
    RuleEngine::new(RuleLoader::parse_json(&doc.to_string()).unwrap())
}

fn bench_single_rule(c: &mut Criterion) {
    let engine = numeric_rules(1);
    let entry = sample_entry();

    c.bench_function("evaluate_single_numeric_rule", |b| {
        b.iter(|| black_box(engine.evaluate(black_box(&entry))));
    });
}

fn bench_mixed_operators(c: &mut Criterion) {
    let engine = mixed_rules();
    let entry = sample_entry();

    c.bench_function("evaluate_mixed_operator_set", |b| {
        b.iter(|| black_box(engine.evaluate(black_box(&entry))));
    });
}

fn bench_rule_count_scaling(c: &mut Criterion) {
    let entry = sample_entry();
    let mut group = c.benchmark_group("rule_count_scaling");

    for count in [10, 100, 500] {
        let engine = numeric_rules(count);
        group.throughput(Throughput::Elements(count as u64));
        group.bench_with_input(BenchmarkId::from_parameter(count), &engine, |b, engine| {
            b.iter(|| black_box(engine.evaluate(black_box(&entry))));
        });
    }
    group.finish();
}

criterion_group!(
    benches,
    bench_single_rule,
    bench_mixed_operators,
    bench_rule_count_scaling
);
criterion_main!(benches);
