use criterion::{black_box, criterion_group, criterion_main, Criterion};
use fukubiki::{Distribution, WeightedSampler};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

fn pairs(size: u64) -> impl Iterator<Item = (u64, u64)> {
    (0..size).map(|i| (i % 97 + 1, i))
}

fn bench_build(c: &mut Criterion) {
    let mut group = c.benchmark_group("build");
    let sizes = [1_000, 10_000, 100_000];

    for &size in &sizes {
        group.bench_function(format!("tree_n{}", size), |b| {
            b.iter(|| {
                let sampler = WeightedSampler::from_pairs(pairs(size)).expect("valid");
                black_box(sampler.remaining_weight());
            })
        });
    }
    group.finish();
}

fn bench_shuffle(c: &mut Criterion) {
    let mut group = c.benchmark_group("shuffle");
    let sizes = [1_000, 10_000, 100_000];

    for &size in &sizes {
        let sampler = WeightedSampler::from_pairs(pairs(size)).expect("valid");
        group.bench_function(format!("full_n{}", size), |b| {
            b.iter(|| {
                let mut s = sampler.clone();
                let mut rng = ChaCha8Rng::seed_from_u64(42);
                for v in s.shuffle_with_rng(&mut rng) {
                    black_box(v.expect("no internal errors"));
                }
            })
        });
    }
    group.finish();
}

fn bench_sample_k(c: &mut Criterion) {
    let mut group = c.benchmark_group("sample_without_replacement");
    let sizes = [1_000, 100_000];
    let k = 10;

    for &size in &sizes {
        let sampler = WeightedSampler::from_pairs(pairs(size)).expect("valid");
        group.bench_function(format!("k{}_n{}", k, size), |b| {
            b.iter(|| {
                let mut s = sampler.clone();
                let mut rng = ChaCha8Rng::seed_from_u64(42);
                let drawn = s
                    .sample_without_replacement_with_rng(black_box(k), &mut rng)
                    .expect("valid count");
                black_box(drawn.count());
            })
        });
    }
    group.finish();
}

// Each persistent draw copies the weight array, so this grows as O(n) per draw.
fn bench_remainder_chain(c: &mut Criterion) {
    let mut group = c.benchmark_group("remainders");
    let sizes = [100, 1_000];

    for &size in &sizes {
        let sampler = WeightedSampler::from_pairs(pairs(size)).expect("valid");
        group.bench_function(format!("chain_n{}", size), |b| {
            b.iter(|| {
                let chain = sampler
                    .clone()
                    .remainders_with_rng(ChaCha8Rng::seed_from_u64(42));
                black_box(chain.count());
            })
        });
    }
    group.finish();
}

criterion_group!(
    benches,
    bench_build,
    bench_shuffle,
    bench_sample_k,
    bench_remainder_chain
);
criterion_main!(benches);
