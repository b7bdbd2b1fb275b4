use ark_bn254::{Bn254, Fr};
use ark_std::UniformRand;
use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use polycommit::{verify, CommitmentParams, PairingContext, PolyCommitter, SetupOptions};
use rand::rngs::StdRng;
use rand::SeedableRng;

fn params(t: usize, window_width: usize) -> CommitmentParams<Bn254> {
    let mut rng = StdRng::seed_from_u64(1);
    let opts = SetupOptions {
        window_width,
        ..SetupOptions::default()
    };
    CommitmentParams::create(PairingContext::new(), t, opts, &mut rng).unwrap()
}

fn random_coeffs(n: usize, rng: &mut StdRng) -> Vec<Fr> {
    (0..n).map(|_| Fr::rand(rng)).collect()
}

fn bench_commit(c: &mut Criterion) {
    let mut group = c.benchmark_group("commit");
    let rng = &mut StdRng::seed_from_u64(2);

    for &t in &[15usize, 63] {
        let p = params(t, 8);
        let coeffs = random_coeffs(t + 1, rng);
        let committer = PolyCommitter::from_coefficients(&p, &coeffs).unwrap();

        group.bench_function(BenchmarkId::new("naive", t), |b| {
            b.iter(|| committer.get_c());
        });
        group.bench_function(BenchmarkId::new("windowed", t), |b| {
            b.iter(|| committer.get_c_fast());
        });
    }
    group.finish();
}

fn bench_verify(c: &mut Criterion) {
    let mut group = c.benchmark_group("verify");
    let rng = &mut StdRng::seed_from_u64(3);
    let p = params(15, 8);
    let i = Fr::from(5u64);

    let committers: Vec<_> = (0..8)
        .map(|_| PolyCommitter::from_coefficients(&p, &random_coeffs(16, rng)).unwrap())
        .collect();
    let coms: Vec<_> = committers.iter().map(|c| c.get_c_fast()).collect();
    let vals: Vec<_> = committers.iter().map(|c| c.evaluate(&i)).collect();
    let wits = PolyCommitter::create_witnesses(&committers, &i);

    group.bench_function("single", |b| {
        b.iter(|| verify::verify_eval(&p, &coms[0], &i, &vals[0], &wits[0]));
    });
    group.bench_function(BenchmarkId::new("batch", coms.len()), |b| {
        let mut brng = StdRng::seed_from_u64(4);
        b.iter(|| verify::verify_eval_batch(&p, &coms, &i, &vals, &wits, &mut brng));
    });
    group.finish();
}

criterion_group!(benches, bench_commit, bench_verify);
criterion_main!(benches);
