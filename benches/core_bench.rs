use criterion::{black_box, criterion_group, criterion_main, Criterion};
use rug::Integer;

use ecpp_prove::bpsw::{has_small_factor, is_bpsw_prime};
use ecpp_prove::config::Config;
use ecpp_prove::rng::RngContext;
use ecpp_prove::{ecpp, is_provable_prime};

fn bench_has_small_factor_prime(c: &mut Criterion) {
    // 2^127 - 1 (Mersenne prime, no small factors)
    let n = Integer::from(1u32) << 127u32;
    let prime = n - 1u32;
    c.bench_function("has_small_factor(M127)", |b| {
        b.iter(|| has_small_factor(black_box(&prime)));
    });
}

fn bench_has_small_factor_composite(c: &mut Criterion) {
    // Large composite: 2^128 (divisible by 2)
    let composite = Integer::from(1u32) << 128u32;
    c.bench_function("has_small_factor(2^128)", |b| {
        b.iter(|| has_small_factor(black_box(&composite)));
    });
}

fn bench_bpsw_prime(c: &mut Criterion) {
    // 2^127 - 1 (Mersenne prime)
    let n = Integer::from(1u32) << 127u32;
    let prime = n - 1u32;
    c.bench_function("is_bpsw_prime(M127)", |b| {
        b.iter(|| is_bpsw_prime(black_box(&prime)));
    });
}

fn bench_bpsw_carmichael(c: &mut Criterion) {
    // 561 = 3 * 11 * 17, the smallest Carmichael number.
    let composite = Integer::from(561u32);
    c.bench_function("is_bpsw_prime(561)", |b| {
        b.iter(|| is_bpsw_prime(black_box(&composite)));
    });
}

fn bench_ecpp_small_prime_base_case(c: &mut Criterion) {
    // Small enough to resolve via the <=64-bit gate shortcut, no descent.
    let n = Integer::from(2_147_483_647u32); // 2^31 - 1, Mersenne prime
    let cfg = Config::default();
    c.bench_function("ecpp(2^31-1) base case", |b| {
        b.iter(|| {
            let mut rng = RngContext::from_seed(1);
            ecpp(black_box(&n), &cfg, &mut rng)
        });
    });
}

fn bench_is_provable_prime_short_circuit(c: &mut Criterion) {
    let n = Integer::from(104_729u32);
    let cfg = Config::default();
    c.bench_function("is_provable_prime(104729, no cert)", |b| {
        b.iter(|| {
            let mut rng = RngContext::from_seed(1);
            is_provable_prime(black_box(&n), false, &cfg, &mut rng)
        });
    });
}

criterion_group!(
    benches,
    bench_has_small_factor_prime,
    bench_has_small_factor_composite,
    bench_bpsw_prime,
    bench_bpsw_carmichael,
    bench_ecpp_small_prime_base_case,
    bench_is_provable_prime_short_circuit,
);
criterion_main!(benches);
