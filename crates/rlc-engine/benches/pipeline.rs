use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use rlc_engine::{analyze_program, generate, parse_source, Lexer, Optimizer};

/// A program with `blocks` sequential loops, each with straight-line work
/// the optimizer can fold, hoist and clean up.
fn generated_program(blocks: usize) -> String {
    let mut source = String::from("scan(n);\n");
    for b in 0..blocks {
        source.push_str(&format!(
            "i{b} = 0;\nwhile (i{b} < n) {{\n  k{b} = 4;\n  x{b} = 2 * 3 + k{b};\n  print(x{b} + i{b});\n  i{b} += 1;\n}}\nunused{b} = {b};\n"
        ));
    }
    source
}

fn bench_front_end(c: &mut Criterion) {
    let mut group = c.benchmark_group("front_end");

    for blocks in [10, 100] {
        let source = generated_program(blocks);
        group.throughput(Throughput::Bytes(source.len() as u64));
        group.bench_with_input(BenchmarkId::new("lex", blocks), &source, |b, source| {
            b.iter(|| Lexer::new(black_box(source)).tokenize().unwrap());
        });
        group.bench_with_input(BenchmarkId::new("parse_and_check", blocks), &source, |b, source| {
            b.iter(|| {
                let program = parse_source(black_box(source)).unwrap();
                analyze_program(&program)
            });
        });
    }

    group.finish();
}

fn bench_optimize(c: &mut Criterion) {
    let mut group = c.benchmark_group("optimize");
    let optimizer = Optimizer::default();

    for blocks in [10, 50] {
        let program = parse_source(&generated_program(blocks)).unwrap();
        let code = generate(&program);
        group.throughput(Throughput::Elements(code.len() as u64));
        group.bench_with_input(BenchmarkId::new("driver", blocks), &code, |b, code| {
            b.iter(|| optimizer.optimize(black_box(code)));
        });
    }

    group.finish();
}

criterion_group!(benches, bench_front_end, bench_optimize);
criterion_main!(benches);
