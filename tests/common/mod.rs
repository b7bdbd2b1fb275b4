//! Test fixtures shared by the integration tests.

#![allow(dead_code)]

use ark_bn254::{Bn254, Fr};
use polycommit::{CommitmentParams, PairingContext, SetupOptions};
use rand::rngs::StdRng;
use rand::SeedableRng;

pub type Curve = Bn254;

/// Deterministic parameters for degree `t`.
pub fn params_with(t: usize, opts: SetupOptions) -> CommitmentParams<Curve> {
    let mut rng = StdRng::seed_from_u64(0x5eed + t as u64);
    CommitmentParams::create(PairingContext::new(), t, opts, &mut rng)
        .expect("failed to create parameters")
}

/// Deterministic parameters for degree `t` with default options.
pub fn params(t: usize) -> CommitmentParams<Curve> {
    params_with(t, SetupOptions::default())
}

/// Seeded RNG for test randomness.
pub fn rng(seed: u64) -> StdRng {
    StdRng::seed_from_u64(seed)
}

pub fn fr(v: u64) -> Fr {
    Fr::from(v)
}

pub fn frs(vs: &[u64]) -> Vec<Fr> {
    vs.iter().copied().map(Fr::from).collect()
}
