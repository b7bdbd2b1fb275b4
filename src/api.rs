//! One-call facade over the commitment scheme.
//!
//! `setup(n)` prepares parameters for `n` coefficients (degree `n - 1`) with
//! Lagrange tables, so both coefficient and value inputs commit through a
//! table lookup. Verification helpers return `bool` and never error.

#![forbid(unsafe_code)]

use ark_ff::PrimeField;
use ark_poly::univariate::DensePolynomial;
use ark_poly::DenseUVPolynomial;
use tracing::{debug, instrument};

use crate::committer::PolyCommitter;
use crate::error::{Error, Result};
use crate::group::G1;
use crate::pairing::{Curve, PairingContext};
use crate::params::{CommitmentParams, SetupOptions};
use crate::pok::{PokProver, PokVerifier, Proof};
use crate::verify;

/// What is being committed.
#[derive(Clone, Copy, Debug)]
pub enum CommitInput<'a, F> {
    /// Coefficients `f_0 … f_d`, low → high.
    Coefficients(&'a [F]),
    /// Values `f(0) … f(n-1)`.
    Values(&'a [F]),
}

/// Result of [`commit`].
#[derive(Clone, Debug)]
pub struct CommitOutput<E: Curve> {
    /// `C = g^{f(α)}`.
    pub commitment: G1<E>,
    /// `(f(i), w_i)` for every requested point, in order.
    pub openings: Vec<(E::ScalarField, G1<E>)>,
    /// Non-interactive proof of knowledge under the empty nonce.
    pub proof: Option<Vec<u8>>,
}

fn options(lagrange: bool) -> SetupOptions {
    SetupOptions {
        lagrange,
        ..SetupOptions::default()
    }
}

/// Fresh parameters for polynomials with `n` coefficients.
#[instrument(level = "info", skip_all, fields(n = n))]
pub fn setup<E: Curve>(n: usize) -> Result<CommitmentParams<E>> {
    let t = n
        .checked_sub(1)
        .ok_or_else(|| Error::InvalidParameter("at least one coefficient is required".into()))?;
    CommitmentParams::create(PairingContext::new(), t, options(true), &mut rand::thread_rng())
}

/// Deterministic parameters derived from `seed`. Test use only.
#[cfg(feature = "dev-srs")]
pub fn setup_with_seed<E: Curve>(n: usize, seed: u64) -> Result<CommitmentParams<E>> {
    use rand::{rngs::StdRng, SeedableRng};

    let t = n
        .checked_sub(1)
        .ok_or_else(|| Error::InvalidParameter("at least one coefficient is required".into()))?;
    let mut rng = StdRng::seed_from_u64(seed);
    CommitmentParams::create(PairingContext::new(), t, options(true), &mut rng)
}

/// Load serialized parameters, rebuilding Lagrange tables.
pub fn load<E: Curve>(bytes: &[u8]) -> Result<CommitmentParams<E>> {
    CommitmentParams::from_bytes(bytes, options(true))
}

/// Commit, open at `points`, and optionally attach a proof of knowledge.
#[instrument(level = "info", skip_all, fields(points = points.len(), want_proof = want_proof))]
pub fn commit<E: Curve>(
    params: &CommitmentParams<E>,
    input: CommitInput<'_, E::ScalarField>,
    points: &[E::ScalarField],
    want_proof: bool,
) -> Result<CommitOutput<E>> {
    let committer = match input {
        CommitInput::Coefficients(c) => PolyCommitter::from_coefficients(params, c)?,
        CommitInput::Values(v) => PolyCommitter::new_vector(params, v)?,
    };
    let commitment = committer.get_c_fast();
    let openings = points
        .iter()
        .map(|i| (committer.evaluate(i), committer.create_witness(i)))
        .collect();

    let proof = if want_proof {
        let mut prover = PokProver::for_polynomial(&committer, b"");
        Some(prover.fs_proof(&mut rand::thread_rng(), b"")?.to_bytes())
    } else {
        None
    };
    debug!("commitment produced");

    Ok(CommitOutput {
        commitment,
        openings,
        proof,
    })
}

/// Check one opening.
pub fn verify_eval<E: Curve>(
    params: &CommitmentParams<E>,
    commitment: &G1<E>,
    i: &E::ScalarField,
    fi: &E::ScalarField,
    witness: &G1<E>,
) -> bool {
    verify::verify_eval(params, commitment, i, fi, witness)
}

/// Check several openings at one point with fresh batch randomness.
pub fn verify_eval_batch<E: Curve>(
    params: &CommitmentParams<E>,
    commitments: &[G1<E>],
    i: &E::ScalarField,
    values: &[E::ScalarField],
    witnesses: &[G1<E>],
) -> bool {
    verify::verify_eval_batch(params, commitments, i, values, witnesses, &mut rand::thread_rng())
}

/// Check a serialized proof of knowledge under the empty nonce.
///
/// Malformed bytes verify as `false`.
pub fn verify_proof<E: Curve>(params: &CommitmentParams<E>, commitment: &G1<E>, proof: &[u8]) -> bool {
    let proof = match Proof::from_bytes(params.context(), proof) {
        Ok(p) => p,
        Err(e) => {
            debug!(error = %e, "rejecting malformed proof");
            return false;
        }
    };
    PokVerifier::for_polynomial(params, *commitment, b"")
        .fs_verify(&proof, b"")
        .unwrap_or(false)
}

/// `f(i)` for coefficients `coeffs`.
pub fn eval<F: PrimeField>(coeffs: &[F], i: &F) -> F {
    crate::poly::evaluate(&DensePolynomial::from_coefficients_slice(coeffs), i)
}

#[cfg(test)]
mod tests {
    use super::*;
    use ark_bn254::{Bn254, Fr};

    fn fr(v: u64) -> Fr {
        Fr::from(v)
    }

    #[test]
    fn facade_end_to_end() {
        let params = setup::<Bn254>(3).unwrap();
        assert_eq!(params.t(), 2);
        assert!(params.has_lagrange());

        let coeffs = [fr(3), fr(2), fr(1)];
        let out = commit(&params, CommitInput::Coefficients(&coeffs), &[fr(2), fr(5)], true).unwrap();
        assert_eq!(out.openings[0].0, fr(11));
        assert_eq!(out.openings[1].0, eval(&coeffs, &fr(5)));
        for (i, (fi, w)) in [fr(2), fr(5)].iter().zip(&out.openings) {
            assert!(verify_eval(&params, &out.commitment, i, fi, w));
        }
        let proof = out.proof.unwrap();
        assert!(verify_proof(&params, &out.commitment, &proof));
        assert!(!verify_proof(&params, &out.commitment, &proof[..proof.len() - 1]));
    }

    #[test]
    fn facade_values_match_coefficients() {
        let params = setup::<Bn254>(4).unwrap();
        let a = commit(&params, CommitInput::Values(&[fr(1), fr(2), fr(3), fr(4)]), &[], false).unwrap();
        let b = commit(&params, CommitInput::Coefficients(&[fr(1), fr(1)]), &[], false).unwrap();
        assert_eq!(a.commitment, b.commitment);
        assert!(a.proof.is_none());
    }

    #[test]
    fn zero_coefficients_is_rejected() {
        assert!(matches!(setup::<Bn254>(0), Err(Error::InvalidParameter(_))));
    }

    #[cfg(feature = "dev-srs")]
    #[test]
    fn seeded_setup_is_reproducible() {
        let a = setup_with_seed::<Bn254>(4, 7).unwrap();
        let b = setup_with_seed::<Bn254>(4, 7).unwrap();
        let c = setup_with_seed::<Bn254>(4, 8).unwrap();
        assert_eq!(a.t(), 3);
        assert!(a.has_lagrange());
        assert_eq!(a.to_bytes(), b.to_bytes());
        assert_ne!(a.to_bytes(), c.to_bytes());
        assert!(matches!(setup_with_seed::<Bn254>(0, 7), Err(Error::InvalidParameter(_))));

        // same seed, same commitment encoding
        let coeffs = [fr(1), fr(2), fr(3), fr(4)];
        let ca = commit(&a, CommitInput::Coefficients(&coeffs), &[], false).unwrap();
        let cb = commit(&b, CommitInput::Coefficients(&coeffs), &[], false).unwrap();
        assert_eq!(ca.commitment.to_bytes(true), cb.commitment.to_bytes(true));
    }
}
