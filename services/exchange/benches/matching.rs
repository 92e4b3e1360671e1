//! Matching throughput benchmarks

use criterion::{criterion_group, criterion_main, BatchSize, Criterion};

use exchange::Exchange;
use types::fee::FeeSchedule;
use types::ids::{AccountId, Symbol};
use types::numeric::{Price, Quantity};
use types::order::{OrderRequest, Side};

fn seeded_exchange(levels: u64, orders_per_level: u64) -> (Exchange, AccountId) {
    let mut exchange = Exchange::new(Symbol::new("BENCH"), FeeSchedule::free());
    let maker = AccountId::new();

    for level in 0..levels {
        for _ in 0..orders_per_level {
            exchange
                .submit_order(OrderRequest::limit(
                    Symbol::new("BENCH"),
                    Side::SELL,
                    Price::from_u64(1_000 + level),
                    Quantity::from_u64(10),
                    maker,
                ))
                .expect("seed order");
        }
    }

    (exchange, AccountId::new())
}

fn bench_resting_insert(c: &mut Criterion) {
    c.bench_function("insert_resting_limit", |b| {
        b.iter_batched(
            || seeded_exchange(10, 10),
            |(mut exchange, taker)| {
                exchange
                    .submit_order(OrderRequest::limit(
                        Symbol::new("BENCH"),
                        Side::BUY,
                        Price::from_u64(900),
                        Quantity::from_u64(1),
                        taker,
                    ))
                    .expect("submit");
                exchange
            },
            BatchSize::SmallInput,
        )
    });
}

fn bench_single_level_match(c: &mut Criterion) {
    c.bench_function("match_single_level", |b| {
        b.iter_batched(
            || seeded_exchange(10, 10),
            |(mut exchange, taker)| {
                exchange
                    .submit_order(OrderRequest::limit(
                        Symbol::new("BENCH"),
                        Side::BUY,
                        Price::from_u64(1_000),
                        Quantity::from_u64(10),
                        taker,
                    ))
                    .expect("submit");
                exchange
            },
            BatchSize::SmallInput,
        )
    });
}

fn bench_market_sweep(c: &mut Criterion) {
    c.bench_function("market_sweep_levels", |b| {
        b.iter_batched(
            || seeded_exchange(10, 10),
            |(mut exchange, taker)| {
                exchange
                    .submit_order(OrderRequest::market(
                        Symbol::new("BENCH"),
                        Side::BUY,
                        Quantity::from_u64(500),
                        taker,
                    ))
                    .expect("submit");
                exchange
            },
            BatchSize::SmallInput,
        )
    });
}

criterion_group!(
    benches,
    bench_resting_insert,
    bench_single_level_match,
    bench_market_sweep
);
criterion_main!(benches);
