//! Evaluation and opening checks.
//!
//! All checks return `bool`; a `false` means the claim is wrong, never that
//! the inputs were malformed in a way worth an error.

#![forbid(unsafe_code)]

use ark_ff::Zero;
use ark_poly::univariate::DensePolynomial;
use ark_std::rand::{CryptoRng, RngCore};
use tracing::{debug, instrument};

use crate::committer::PolyCommitter;
use crate::group::G1;
use crate::pairing::Curve;
use crate::params::CommitmentParams;
use crate::scalar;
use crate::BATCH_RANDOMNESS_BITS;

/// Check `e(C, ĝ) == e(w, ĝ^α / ĝ^i) · e(g, ĝ)^{f(i)}`.
pub fn verify_eval<E: Curve>(
    params: &CommitmentParams<E>,
    commitment: &G1<E>,
    i: &E::ScalarField,
    fi: &E::ScalarField,
    witness: &G1<E>,
) -> bool {
    let ctx = params.context();
    let lhs = ctx.pair(commitment, params.ghatalphai(0));
    let rhs = ctx.pair(witness, &params.shifted_alpha_b(i)) * params.gt_base().pow(fi);
    lhs == rhs
}

/// Check several openings at the same point `i` with one pairing equation.
///
/// Each triple is weighted by an independent random `t_j` of
/// [`BATCH_RANDOMNESS_BITS`] bits and the weighted products are checked with
/// [`verify_eval`]. Mismatched slice lengths fail; an empty batch passes.
#[instrument(level = "debug", skip_all, fields(batch = commitments.len()))]
pub fn verify_eval_batch<E: Curve, R: RngCore + CryptoRng + ?Sized>(
    params: &CommitmentParams<E>,
    commitments: &[G1<E>],
    i: &E::ScalarField,
    values: &[E::ScalarField],
    witnesses: &[G1<E>],
    rng: &mut R,
) -> bool {
    if commitments.len() != values.len() || commitments.len() != witnesses.len() {
        debug!(
            commitments = commitments.len(),
            values = values.len(),
            witnesses = witnesses.len(),
            "batch shape mismatch"
        );
        return false;
    }
    if commitments.is_empty() {
        return true;
    }

    let ctx = params.context();
    let mut c_acc = ctx.identity_a();
    let mut w_acc = ctx.identity_a();
    let mut f_acc = E::ScalarField::zero();
    for ((c, fi), w) in commitments.iter().zip(values).zip(witnesses) {
        let t: E::ScalarField = scalar::random_bits(rng, BATCH_RANDOMNESS_BITS);
        c_acc *= &c.pow(&t);
        w_acc *= &w.pow(&t);
        f_acc += t * fi;
    }
    verify_eval(params, &c_acc, i, &f_acc, &w_acc)
}

/// Recompute the commitment to `f` and compare.
///
/// A polynomial above the supported degree cannot match and yields `false`.
pub fn verify_poly<E: Curve>(
    params: &CommitmentParams<E>,
    commitment: &G1<E>,
    f: &DensePolynomial<E::ScalarField>,
) -> bool {
    match PolyCommitter::new_poly(params, f.clone()) {
        Ok(c) => c.get_c_fast() == *commitment,
        Err(_) => false,
    }
}

/// Recompute the vector commitment to `values` and compare.
pub fn verify_vec<E: Curve>(
    params: &CommitmentParams<E>,
    commitment: &G1<E>,
    values: &[E::ScalarField],
) -> bool {
    match PolyCommitter::new_vector(params, values) {
        Ok(c) => c.get_c_fast() == *commitment,
        Err(_) => false,
    }
}
