use std::sync::Arc;

use criterion::{BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};
use serde_json::json;

use logwrap::{Args, DecorateOptions, DecoratedLogger, FixedClock, Level, Logger, decorate};

/// An underlying logger whose level methods only consume their arguments.
fn sink() -> Logger {
    Level::ALL
        .into_iter()
        .fold(Logger::object(), |logger, level| {
            logger.with_level(level, |_, args| {
                criterion::black_box(args);
            })
        })
}

fn decorated(options: DecorateOptions) -> DecoratedLogger {
    decorate(sink(), options).expect("sink logger decorates")
}

fn messages(count: usize) -> Vec<String> {
    (0..count)
        .map(|i| format!("request {i} completed in {}ms", i % 97))
        .collect()
}

fn bench_emitted(c: &mut Criterion) {
    let lines = messages(1000);
    let clock = Arc::new(FixedClock::from_millisecond(1_768_473_000_123).expect("valid instant"));

    let variants = [
        ("plain", DecorateOptions::new()),
        ("tags", DecorateOptions::new().tags(["api", "v2", "eu-west"])),
        (
            "timestamp_tags",
            DecorateOptions::new().tags(["api"]).timestamp(true).clock(clock),
        ),
    ];

    let mut group = c.benchmark_group("emitted");
    group.throughput(Throughput::Elements(lines.len() as u64));

    for (label, options) in variants {
        let log = decorated(options);
        group.bench_with_input(BenchmarkId::from_parameter(label), &lines, |b, lines| {
            b.iter(|| {
                for line in lines {
                    criterion::black_box(log.info(line));
                }
            });
        });
    }

    group.finish();
}

fn bench_suppressed(c: &mut Criterion) {
    let lines = messages(1000);
    let log = decorated(DecorateOptions::new().tags(["api"]));

    let mut group = c.benchmark_group("suppressed");
    group.throughput(Throughput::Elements(lines.len() as u64));

    group.bench_function("eager_1k_calls", |b| {
        b.iter(|| {
            for line in &lines {
                criterion::black_box(log.debug(line));
            }
        });
    });

    group.bench_function("lazy_1k_calls", |b| {
        b.iter(|| {
            for line in &lines {
                criterion::black_box(log.debug(Args::lazy(|| json!([line, {"expensive": true}]))));
            }
        });
    });

    group.finish();
}

fn bench_console_line(c: &mut Criterion) {
    let args = vec![json!("[api]request completed"), json!(200), json!({"ms": 42})];

    let mut group = c.benchmark_group("console");
    group.bench_function("format_line", |b| {
        let mut out = String::with_capacity(128);
        b.iter(|| {
            out.clear();
            logwrap::formatter::format_console_line(
                Level::Info,
                criterion::black_box(&args),
                false,
                &mut out,
            );
            criterion::black_box(&out);
        });
    });
    group.finish();
}

criterion_group!(benches, bench_emitted, bench_suppressed, bench_console_line);
criterion_main!(benches);
