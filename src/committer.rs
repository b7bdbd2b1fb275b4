//! Commitments and evaluation witnesses.
//!
//! A [`PolyCommitter`] owns one polynomial `f` of degree `≤ t`, given either
//! by its coefficients or by a vector of values `v_0 … v_{n-1}` (`n ≤ t + 1`)
//! that `f` takes on the points `0 … n-1` (and `0` on the remaining points up
//! to `t`). It produces the commitment `C = g^{f(α)}` and witnesses
//! `w_i = g^{ψ_i(α)}` where `ψ_i(X) = (f(X) - f(i)) / (X - i)`.

#![forbid(unsafe_code)]

use ark_ff::{One, Zero};
use ark_poly::univariate::DensePolynomial;
use ark_poly::DenseUVPolynomial;
use tracing::{debug, instrument};

use crate::error::{Error, Result};
use crate::group::G1;
use crate::pairing::Curve;
use crate::params::CommitmentParams;
use crate::poly;

#[derive(Clone, Debug)]
enum Source<F> {
    Polynomial,
    Vector(Vec<F>),
}

/// Committer for one polynomial under fixed parameters.
#[derive(Clone, Debug)]
pub struct PolyCommitter<'p, E: Curve> {
    params: &'p CommitmentParams<E>,
    f: DensePolynomial<E::ScalarField>,
    source: Source<E::ScalarField>,
}

impl<'p, E: Curve> PolyCommitter<'p, E> {
    /// Commit to `f` given in coefficient form.
    pub fn new_poly(params: &'p CommitmentParams<E>, f: DensePolynomial<E::ScalarField>) -> Result<Self> {
        let degree = poly::degree(&f);
        if degree > params.t() {
            return Err(Error::DegreeExceeded {
                degree,
                max: params.t(),
            });
        }
        Ok(Self {
            params,
            f,
            source: Source::Polynomial,
        })
    }

    /// Commit to the polynomial with coefficients `coeffs` (low → high).
    pub fn from_coefficients(params: &'p CommitmentParams<E>, coeffs: &[E::ScalarField]) -> Result<Self> {
        Self::new_poly(params, DensePolynomial::from_coefficients_slice(coeffs))
    }

    /// Commit to the values `v`, interpolated on the points `0 … t`.
    #[instrument(level = "debug", skip_all, fields(len = values.len()))]
    pub fn new_vector(params: &'p CommitmentParams<E>, values: &[E::ScalarField]) -> Result<Self> {
        let max = params.t() + 1;
        if values.len() > max {
            return Err(Error::LengthExceeded {
                len: values.len(),
                max,
            });
        }
        let f = poly::interpolate_on_indices(values, max);
        Ok(Self {
            params,
            f,
            source: Source::Vector(values.to_vec()),
        })
    }

    /// Parameters this committer was built on.
    pub fn params(&self) -> &'p CommitmentParams<E> {
        self.params
    }

    /// The committed polynomial.
    pub fn polynomial(&self) -> &DensePolynomial<E::ScalarField> {
        &self.f
    }

    /// `f(i)`.
    pub fn evaluate(&self, i: &E::ScalarField) -> E::ScalarField {
        poly::evaluate(&self.f, i)
    }

    /// `C` with one exponentiation per term.
    ///
    /// Vector committers use `∏ (g^{λ_i(α)})^{v_i}` when the parameters carry
    /// Lagrange commitments, otherwise `∏ (g^{α^j})^{f_j}`. Reference path
    /// for [`Self::get_c_fast`]; both always agree.
    pub fn get_c(&self) -> G1<E> {
        if let Source::Vector(values) = &self.source {
            if let Some(c) = self.params.commit_values_naive(values) {
                return c;
            }
        }
        self.params.commit_coefficients_naive(&self.f.coeffs)
    }

    /// `C` through the precomputed window tables.
    ///
    /// Vector committers use the Lagrange tables when the parameters carry
    /// them, which skips interpolation in the exponent entirely.
    #[instrument(level = "debug", skip_all, fields(degree = poly::degree(&self.f)))]
    pub fn get_c_fast(&self) -> G1<E> {
        if let Source::Vector(values) = &self.source {
            if let Some(c) = self.params.commit_values(values) {
                debug!("committed through lagrange tables");
                return c;
            }
        }
        self.params.commit_coefficients(&self.f.coeffs)
    }

    /// Unblinded witness for opening at `i`.
    pub fn create_witness(&self, i: &E::ScalarField) -> G1<E> {
        self.create_blinded_witness(i, &E::ScalarField::one())
    }

    /// `w_i^b = g^{b · ψ_i(α)}`.
    ///
    /// # Panics
    ///
    /// Panics if `(X - i)` fails to divide `f(X) - f(i)`, which would mean
    /// the field arithmetic itself is broken.
    pub fn create_blinded_witness(&self, i: &E::ScalarField, blinding: &E::ScalarField) -> G1<E> {
        let fi = self.evaluate(i);
        let mut shifted = self.f.coeffs.clone();
        match shifted.first_mut() {
            Some(c0) => *c0 -= fi,
            None => shifted.push(-fi),
        }
        let (mut psi, rem) = poly::divide_by_linear(&shifted, *i);
        assert!(rem.is_zero(), "(X - i) does not divide f(X) - f(i)");

        if !blinding.is_one() {
            for c in psi.iter_mut() {
                *c *= blinding;
            }
        }
        self.params.commit_coefficients(&psi)
    }

    /// Witnesses for several committers opened at the same point.
    pub fn create_witnesses(committers: &[PolyCommitter<'p, E>], i: &E::ScalarField) -> Vec<G1<E>> {
        committers.iter().map(|c| c.create_witness(i)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pairing::PairingContext;
    use crate::params::SetupOptions;
    use ark_bn254::{Bn254, Fr};
    use ark_poly::Polynomial;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn params(t: usize, lagrange: bool) -> CommitmentParams<Bn254> {
        let mut rng = StdRng::seed_from_u64(41);
        let opts = SetupOptions {
            window_width: 3,
            lagrange,
            ..Default::default()
        };
        CommitmentParams::create(PairingContext::new(), t, opts, &mut rng).unwrap()
    }

    fn fr(v: u64) -> Fr {
        Fr::from(v)
    }

    #[test]
    fn fast_and_naive_commitments_agree() {
        let p = params(9, false);
        let mut rng = StdRng::seed_from_u64(42);
        for deg in [0usize, 1, 4, 9] {
            let f = DensePolynomial::<Fr>::rand(deg, &mut rng);
            let c = PolyCommitter::new_poly(&p, f).unwrap();
            assert_eq!(c.get_c(), c.get_c_fast());
        }
        let zero = PolyCommitter::from_coefficients(&p, &[]).unwrap();
        assert!(zero.get_c_fast().is_identity());
    }

    #[test]
    fn degree_and_length_limits() {
        let p = params(3, false);
        let f = DensePolynomial::from_coefficients_vec(vec![fr(1); 5]);
        assert!(matches!(
            PolyCommitter::new_poly(&p, f),
            Err(Error::DegreeExceeded { degree: 4, max: 3 })
        ));
        assert!(matches!(
            PolyCommitter::new_vector(&p, &[fr(1); 5]),
            Err(Error::LengthExceeded { len: 5, max: 4 })
        ));
    }

    #[test]
    fn vector_commitment_interpolates() {
        let p = params(3, true);
        let values = [fr(1), fr(2), fr(3), fr(4)];
        let vc = PolyCommitter::new_vector(&p, &values).unwrap();
        for (j, v) in values.iter().enumerate() {
            assert_eq!(vc.evaluate(&fr(j as u64)), *v);
        }
        let pc = PolyCommitter::from_coefficients(&p, &[fr(1), fr(1)]).unwrap();
        assert_eq!(vc.get_c_fast(), pc.get_c_fast());
        assert_eq!(vc.get_c(), pc.get_c());
    }

    #[test]
    fn slow_vector_commitment_uses_lagrange_powers() {
        let p = params(3, true);
        let values = [fr(5), fr(9), fr(2), fr(7)];
        let vc = PolyCommitter::new_vector(&p, &values).unwrap();
        let by_hand = values
            .iter()
            .enumerate()
            .fold(p.context().identity_a(), |acc, (i, v)| {
                acc * p.glambdai(i).unwrap().pow(v)
            });
        assert_eq!(vc.get_c(), by_hand);
        assert_eq!(vc.get_c(), vc.get_c_fast());

        // without Lagrange tables both paths go through the monomial powers
        let q = params(3, false);
        let vq = PolyCommitter::new_vector(&q, &values).unwrap();
        assert_eq!(vq.get_c(), vq.get_c_fast());
        assert_eq!(vq.get_c(), q.commit_coefficients_naive(&vq.polynomial().coeffs));
    }

    #[test]
    fn witness_is_commitment_to_quotient() {
        let p = params(5, false);
        let c = PolyCommitter::from_coefficients(&p, &[fr(3), fr(2), fr(1)]).unwrap();
        // (3 + 2X + X^2 - 11) / (X - 2) = X + 4
        let q = PolyCommitter::from_coefficients(&p, &[fr(4), fr(1)]).unwrap();
        assert_eq!(c.create_witness(&fr(2)), q.get_c());
        assert_eq!(c.evaluate(&fr(2)), fr(11));
        assert_eq!(
            c.create_blinded_witness(&fr(2), &fr(7)),
            q.get_c().pow(&fr(7))
        );
        assert_eq!(c.polynomial().evaluate(&fr(2)), fr(11));
    }

    #[test]
    fn witnesses_for_many() {
        let p = params(4, false);
        let a = PolyCommitter::from_coefficients(&p, &[fr(1), fr(2)]).unwrap();
        let b = PolyCommitter::from_coefficients(&p, &[fr(5)]).unwrap();
        let ws = PolyCommitter::create_witnesses(&[a.clone(), b.clone()], &fr(3));
        assert_eq!(ws, vec![a.create_witness(&fr(3)), b.create_witness(&fr(3))]);
        // constant polynomials open with the identity witness
        assert!(ws[1].is_identity());
    }
}
