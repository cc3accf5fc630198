use calc_rs::{Evaluator, Identifiers};
use criterion::{black_box, criterion_group, criterion_main, Criterion};
use evalexpr::*;

/// Benchmark simple arithmetic expressions
fn benchmark_simple_arithmetic(c: &mut Criterion) {
    let mut group = c.benchmark_group("Simple arithmetic Expression Evaluation");

    let evaluator = Evaluator::with_defaults().unwrap();
    let identifiers = Identifiers::new();

    let expr = "2 + 3 * 4";
    let parsed = evaluator.parse_expression(expr).unwrap();
    let precompiled_evalexpr = build_operator_tree::<DefaultNumericTypes>(expr).unwrap();

    group.bench_function("calc_arithmetic", |b| {
        b.iter(|| evaluator.evaluate(black_box(expr), &identifiers).unwrap())
    });

    group.bench_function("pre_parsed_arithmetic", |b| {
        b.iter(|| evaluator.evaluate_ast(black_box(&parsed), &identifiers).unwrap())
    });

    group.bench_function("native_rust_arithmetic", |b| {
        b.iter(|| black_box(2.0 + 3.0 * 4.0))
    });

    group.bench_function("meval_arithmetic", |b| {
        b.iter(|| meval::eval_str(black_box(expr)).unwrap())
    });

    group.bench_function("evalexpr_arithmetic", |b| {
        b.iter(|| evalexpr::eval(black_box(expr)).unwrap())
    });

    group.bench_function("precompiled_evalexpr_arithmetic", |b| {
        b.iter(|| precompiled_evalexpr.eval().unwrap())
    });
}

/// Benchmark complex arithmetic expressions
fn benchmark_complex_arithmetic(c: &mut Criterion) {
    let mut group = c.benchmark_group("Complex arithmetic Expression Evaluation");

    let evaluator = Evaluator::with_defaults().unwrap();
    let identifiers = Identifiers::new();

    let expr = "(10 + 20) * 3 / (4 - 1) + 5 ^ 2 ^ 0.5";
    let parsed = evaluator.parse_expression(expr).unwrap();

    group.bench_function("calc_complex_arithmetic", |b| {
        b.iter(|| evaluator.evaluate(black_box(expr), &identifiers).unwrap())
    });

    group.bench_function("pre_parsed_complex_arithmetic", |b| {
        b.iter(|| evaluator.evaluate_ast(black_box(&parsed), &identifiers).unwrap())
    });

    group.bench_function("meval_complex_arithmetic", |b| {
        b.iter(|| meval::eval_str(black_box(expr)).unwrap())
    });
}

/// Benchmark variable and function lookups
fn benchmark_identifiers(c: &mut Criterion) {
    let mut group = c.benchmark_group("Identifier Evaluation");

    let evaluator = Evaluator::with_defaults().unwrap();
    let identifiers = Identifiers::with_defaults()
        .with_value("x", 0.5)
        .with_value("y", 2.0);

    let expr = "sin(x) * max(x, y) + floor(y / x)";
    let parsed = evaluator.parse_expression(expr).unwrap();

    group.bench_function("calc_identifiers", |b| {
        b.iter(|| evaluator.evaluate(black_box(expr), &identifiers).unwrap())
    });

    group.bench_function("pre_parsed_identifiers", |b| {
        b.iter(|| evaluator.evaluate_ast(black_box(&parsed), &identifiers).unwrap())
    });

    group.bench_function("meval_identifiers", |b| {
        let mut ctx = meval::Context::new();
        ctx.var("x", 0.5).var("y", 2.0);
        b.iter(|| meval::eval_str_with_context(black_box(expr), &ctx).unwrap())
    });
}

/// Benchmark batch evaluation across many contexts
fn benchmark_batch(c: &mut Criterion) {
    let mut group = c.benchmark_group("Batch Evaluation");

    let evaluator = Evaluator::with_defaults().unwrap();
    let contexts: Vec<Identifiers> = (0..10_000)
        .map(|i| Identifiers::new().with_value("price", i as f64))
        .collect();

    let expr = "price * 1.2 - price / 3";

    group.bench_function("parallel_batch", |b| {
        b.iter(|| evaluator.evaluate_batch(black_box(expr), &contexts).unwrap())
    });

    group.bench_function("sequential_loop", |b| {
        b.iter(|| {
            contexts
                .iter()
                .map(|identifiers| evaluator.evaluate(black_box(expr), identifiers))
                .collect::<Vec<_>>()
        })
    });
}

criterion_group!(
    benches,
    benchmark_simple_arithmetic,
    benchmark_complex_arithmetic,
    benchmark_identifiers,
    benchmark_batch
);
criterion_main!(benches);
