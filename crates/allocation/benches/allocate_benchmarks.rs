use criterion::{black_box, criterion_group, criterion_main, BatchSize, BenchmarkId, Criterion};

use chrono::{Days, NaiveDate};
use stockroom_allocation::{allocate, Batch, OrderLine, Product};

fn candidate_batches(count: u64) -> Vec<Batch> {
    let base = NaiveDate::from_ymd_opt(2026, 1, 1).unwrap();
    (0..count)
        .map(|i| {
            // Latest arrivals first so the winner sits at the end of the slice.
            let eta = base.checked_add_days(Days::new(count - i));
            Batch::new(format!("batch-{i}"), "BENCH-SKU", 100, eta)
        })
        .collect()
}

fn bench_kernel_allocate(c: &mut Criterion) {
    let mut group = c.benchmark_group("kernel_allocate");
    let line = OrderLine::new("order-1", "BENCH-SKU", 1).unwrap();

    for count in [1u64, 10, 100, 1_000] {
        group.bench_with_input(BenchmarkId::from_parameter(count), &count, |b, &count| {
            b.iter_batched(
                || candidate_batches(count),
                |mut batches| black_box(allocate(&line, &mut batches)),
                BatchSize::SmallInput,
            );
        });
    }

    group.finish();
}

fn bench_product_allocate(c: &mut Criterion) {
    let line = OrderLine::new("order-1", "BENCH-SKU", 1).unwrap();

    c.bench_function("product_allocate_100_batches", |b| {
        b.iter_batched(
            || Product::new("BENCH-SKU", candidate_batches(100)).unwrap(),
            |mut product| black_box(product.allocate(&line)),
            BatchSize::SmallInput,
        );
    });
}

fn bench_out_of_stock_scan(c: &mut Criterion) {
    let line = OrderLine::new("order-1", "BENCH-SKU", 1_000).unwrap();
    let mut batches = candidate_batches(1_000);

    c.bench_function("kernel_out_of_stock_1000_batches", |b| {
        b.iter(|| black_box(allocate(&line, &mut batches)));
    });
}

criterion_group!(
    benches,
    bench_kernel_allocate,
    bench_product_allocate,
    bench_out_of_stock_scan
);
criterion_main!(benches);
