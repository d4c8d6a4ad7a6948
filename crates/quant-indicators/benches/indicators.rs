//! Benchmarks for streaming indicator updates.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use quant_core::traits::Indicator;
use quant_core::types::DataPoint;
use quant_indicators::{IndicatorGraph, Kernel, RollingWindow, Rsi, Sma, StdDev};

fn generate_test_data(size: usize) -> Vec<DataPoint> {
    (0..size)
        .filter_map(|i| {
            DataPoint::from_millis(i as i64 * 60_000, 100.0 + (i as f64 * 0.1).sin() * 10.0)
        })
        .collect()
}

fn benchmark_window_push(c: &mut Criterion) {
    let mut group = c.benchmark_group("RollingWindow");

    for capacity in [20, 200].iter() {
        let data = generate_test_data(10_000);

        group.bench_with_input(BenchmarkId::new("push", capacity), &data, |b, data| {
            b.iter(|| {
                let mut window = RollingWindow::new(*capacity);
                for point in data {
                    black_box(window.push(*point));
                }
            })
        });
    }

    group.finish();
}

fn benchmark_updates(c: &mut Criterion) {
    let mut group = c.benchmark_group("Update");

    for size in [1000, 10000, 100000].iter() {
        let data = generate_test_data(*size);

        group.bench_with_input(BenchmarkId::new("sma_20", size), &data, |b, data| {
            b.iter(|| {
                let mut sma = Sma::new(20).into_indicator();
                for point in data {
                    let _ = black_box(sma.update(*point));
                }
            })
        });

        group.bench_with_input(BenchmarkId::new("rsi_14", size), &data, |b, data| {
            b.iter(|| {
                let mut rsi = Rsi::new(14).into_indicator();
                for point in data {
                    let _ = black_box(rsi.update(*point));
                }
            })
        });

        group.bench_with_input(BenchmarkId::new("std_dev_20", size), &data, |b, data| {
            b.iter(|| {
                let mut std_dev = StdDev::new(20).into_indicator();
                for point in data {
                    let _ = black_box(std_dev.update(*point));
                }
            })
        });
    }

    group.finish();
}

fn benchmark_graph_dispatch(c: &mut Criterion) {
    let mut group = c.benchmark_group("IndicatorGraph");
    let data = generate_test_data(10_000);

    group.bench_function("chain_of_three", |b| {
        b.iter(|| {
            let mut graph = IndicatorGraph::new();
            let source = graph.add_source("close");
            let fast = graph.add(Sma::new(10).into_indicator());
            let rsi = graph.add(Rsi::new(14).into_indicator());
            let smooth = graph.add(Sma::new(5).into_indicator());
            let _ = graph.connect(source, fast);
            let _ = graph.connect(fast, rsi);
            let _ = graph.connect(rsi, smooth);

            for point in &data {
                let _ = black_box(graph.dispatch(source, *point));
            }
        })
    });

    group.finish();
}

criterion_group!(
    benches,
    benchmark_window_push,
    benchmark_updates,
    benchmark_graph_dispatch
);
criterion_main!(benches);
