use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use tree_calc::interpreter::calculate;

fn criterion_benchmark(c: &mut Criterion) {
    let mut group = c.benchmark_group("calculate");
    let expressions = [
        "2 + 3 * 4".to_string(),
        "1 + 2 * sqrt(1 + 8) / (4 + (2 - 3))".to_string(),
        "(((100))) - 2 * ((3 + 1) + (2 + 16 / 4)) * (11 - 6 - 1000 * 0)".to_string(),
        format!("{}1{}", "(1 + ".repeat(200), ")".repeat(200)),
        vec!["2"; 500].join(" * 3 - "),
    ];
    for expression in expressions {
        group.throughput(Throughput::Bytes(expression.len() as u64));

        group.bench_with_input(
            BenchmarkId::from_parameter(expression.len()),
            &expression,
            |bencher, expression| {
                bencher.iter(|| calculate(expression));
            },
        );
    }
}

criterion_group!(benches, criterion_benchmark);
criterion_main!(benches);
