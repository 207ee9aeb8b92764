use criterion::{criterion_group, criterion_main, Criterion};
use ecgroup::Group;

fn bench_scalar_mult(c: &mut Criterion) {
    let mut bench_group = c.benchmark_group("scalar_mult");
    for group in Group::list() {
        let scalar = group.random_scalar();
        let base = group.base();
        bench_group.bench_function(group.to_string(), |b| {
            b.iter(|| {
                let mut point = base.copy();
                point.multiply(&scalar);
                point
            })
        });
    }
    bench_group.finish();
}

fn bench_hash_to_group(c: &mut Criterion) {
    let mut bench_group = c.benchmark_group("hash_to_group");
    for group in Group::list() {
        let dst = group.make_dst("bench", 1).expect("dst");
        bench_group.bench_function(group.to_string(), |b| {
            b.iter(|| group.hash_to_group(b"benchmark input", &dst).expect("hash"))
        });
    }
    bench_group.finish();
}

fn bench_scalar_invert(c: &mut Criterion) {
    let mut bench_group = c.benchmark_group("scalar_invert");
    for group in Group::list() {
        let scalar = group.random_scalar();
        bench_group.bench_function(group.to_string(), |b| {
            b.iter(|| {
                let mut inverse = scalar.copy();
                inverse.invert();
                inverse
            })
        });
    }
    bench_group.finish();
}

criterion_group!(
    benches,
    bench_scalar_mult,
    bench_hash_to_group,
    bench_scalar_invert
);
criterion_main!(benches);
