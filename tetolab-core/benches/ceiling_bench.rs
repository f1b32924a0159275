//! Criterion benchmarks for the screener hot paths.
//!
//! Benchmarks:
//! 1. Ceiling valuation (window filter + annualization, both strategies)
//! 2. Ranking (row construction + stable sort over a synthetic universe)

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};

use tetolab_core::domain::{DividendEvent, DivisorStrategy, PortfolioRow, ValuationParams};
use tetolab_core::engine::price_ceiling;

// ── Helpers ──────────────────────────────────────────────────────────

/// Quarterly payer history: four payments a year, slightly drifting
/// amounts, oldest first.
fn make_events(years: usize) -> Vec<DividendEvent> {
    let base = chrono::NaiveDate::from_ymd_opt(2000, 1, 15).unwrap();
    (0..years * 4)
        .map(|i| {
            let date = base + chrono::Duration::days((i as i64) * 91);
            let amount = 0.25 + (i as f64 * 0.7).sin().abs() * 0.1;
            DividendEvent::new(date, amount)
        })
        .collect()
}

fn params(divisor: DivisorStrategy) -> ValuationParams {
    ValuationParams::new(0.07)
        .with_as_of(chrono::NaiveDate::from_ymd_opt(2025, 7, 1).unwrap())
        .with_divisor(divisor)
}

// ── 1. Ceiling Valuation ─────────────────────────────────────────────

fn bench_ceiling(c: &mut Criterion) {
    let mut group = c.benchmark_group("price_ceiling");

    for &years in &[5usize, 25, 50] {
        let events = make_events(years);

        group.bench_with_input(
            BenchmarkId::new("fixed_window", years),
            &years,
            |b, _| {
                let p = params(DivisorStrategy::FixedWindow);
                b.iter(|| price_ceiling(black_box(&events), black_box(&p)));
            },
        );

        group.bench_with_input(
            BenchmarkId::new("observed_years", years),
            &years,
            |b, _| {
                let p = params(DivisorStrategy::ObservedYears);
                b.iter(|| price_ceiling(black_box(&events), black_box(&p)));
            },
        );
    }

    group.finish();
}

// ── 2. Ranking ───────────────────────────────────────────────────────

fn bench_ranking(c: &mut Criterion) {
    let mut group = c.benchmark_group("ranking");

    for &count in &[16usize, 100, 500] {
        group.bench_with_input(BenchmarkId::new("build_and_sort", count), &count, |b, _| {
            b.iter(|| {
                let mut rows: Vec<PortfolioRow> = (0..count)
                    .map(|i| {
                        let price = 10.0 + (i as f64 * 0.3).sin().abs() * 40.0;
                        let ceiling = 10.0 + (i as f64 * 0.7).cos().abs() * 40.0;
                        PortfolioRow::new(format!("T{i:03}.SA"), price, ceiling)
                    })
                    .collect();
                rows.sort_by(|a, b2| b2.gap.total_cmp(&a.gap));
                black_box(&rows);
            });
        });
    }

    group.finish();
}

criterion_group!(benches, bench_ceiling, bench_ranking);
criterion_main!(benches);
