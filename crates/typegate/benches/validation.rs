#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![forbid(unsafe_code)]

//! Benchmark validation overhead.
//!
//! A guarded call should cost one registry lookup plus a tree walk over the
//! signature. Message composition only runs on failure and is measured apart.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use typegate::{builtins, canonicalize_behavior, Decl, Signatures, TypeBehavior, Value};

// ============================================================================
// FIXTURES
// ============================================================================

/// `[Integer, String, {opts: {limit: 1..100}}]`
fn nested_declaration() -> Decl {
    Decl::list([
        Decl::from(builtins::integer()),
        Decl::from(builtins::string()),
        Decl::map([(
            Decl::sym("opts"),
            Decl::map([(Decl::sym("limit"), Decl::from(1..=100))]),
        )]),
    ])
}

fn nested_value(limit: i64) -> Value {
    Value::array([
        Value::from(1),
        Value::from("name"),
        Value::hash([(
            Value::sym("opts"),
            Value::hash([(Value::sym("limit"), Value::from(limit))]),
        )]),
    ])
}

fn behavior(declaration: &Decl) -> Option<TypeBehavior> {
    canonicalize_behavior(declaration).ok()
}

// ============================================================================
// BENCHMARKS: evaluation
// ============================================================================

fn bench_evaluate(c: &mut Criterion) {
    let Some(nested) = behavior(&nested_declaration()) else {
        return;
    };
    let passing = nested_value(50);
    let failing = nested_value(500);

    let mut group = c.benchmark_group("evaluate");
    group.bench_function("nested_pass", |b| {
        b.iter(|| black_box(&nested).is_valid(black_box(&passing)));
    });
    group.bench_function("nested_fail", |b| {
        b.iter(|| black_box(&nested).is_valid(black_box(&failing)));
    });

    for length in [10_i64, 100, 1000] {
        let Some(ints) = behavior(&Decl::array_of(builtins::integer())) else {
            return;
        };
        let value = Value::array(0..length);
        group.bench_with_input(BenchmarkId::new("typed_sequence", length), &value, |b, value| {
            b.iter(|| ints.is_valid(black_box(value)));
        });
    }
    group.finish();
}

// ============================================================================
// BENCHMARKS: explanation
// ============================================================================

fn bench_explain(c: &mut Criterion) {
    let Some(nested) = behavior(&nested_declaration()) else {
        return;
    };
    let failing = nested_value(500);
    c.bench_function("explain/nested_fail", |b| {
        b.iter(|| black_box(&nested).explain(black_box(&failing)));
    });
}

// ============================================================================
// BENCHMARKS: guarded calls
// ============================================================================

fn bench_guarded_call(c: &mut Criterion) {
    let signatures = Signatures::new();
    let declaration = Decl::signature(
        vec![
            Decl::from(builtins::integer()),
            Decl::map([(Decl::sym("scale"), Decl::from(builtins::float()).or_nil())]),
        ],
        builtins::integer(),
    );
    if signatures.define("Bench", "scaled", &declaration).is_err() {
        return;
    }
    let args = [Value::from(21)];
    let kwargs = [("scale".to_string(), Value::from(2.0))];

    c.bench_function("call/guarded", |b| {
        b.iter(|| {
            signatures.call("Bench", "scaled", black_box(&args), black_box(&kwargs), |args, _| {
                args.first().cloned().unwrap_or(Value::Nil)
            })
        });
    });
    c.bench_function("call/unregistered", |b| {
        b.iter(|| {
            signatures.call("Bench", "plain", black_box(&args), black_box(&kwargs), |args, _| {
                args.first().cloned().unwrap_or(Value::Nil)
            })
        });
    });
}

criterion_group!(benches, bench_evaluate, bench_explain, bench_guarded_call);
criterion_main!(benches);
