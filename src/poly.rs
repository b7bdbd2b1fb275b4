//! Polynomial utilities over the scalar field.
//!
//! Storage and evaluation come from `ark_poly::DensePolynomial`; this module
//! adds the few constructions the commitment needs: synthetic division by
//! `(X - z)`, Lagrange interpolation on the points `0, 1, …, n-1` and
//! multiplication by `X^k`.

#![forbid(unsafe_code)]

use ark_ff::{Field, PrimeField, Zero};
use ark_poly::univariate::DensePolynomial;
use ark_poly::{DenseUVPolynomial, Polynomial};

/// Degree of `f`, with the zero polynomial reported as degree 0.
pub fn degree<F: PrimeField>(f: &DensePolynomial<F>) -> usize {
    f.degree()
}

/// Evaluate `f` at `x`.
pub fn evaluate<F: PrimeField>(f: &DensePolynomial<F>, x: &F) -> F {
    f.evaluate(x)
}

/// Divide `coeffs` (low → high) by `(X - z)`.
///
/// Returns the quotient and the remainder, which equals `f(z)`.
pub fn divide_by_linear<F: PrimeField>(coeffs: &[F], z: F) -> (Vec<F>, F) {
    if coeffs.is_empty() {
        return (Vec::new(), F::zero());
    }
    let n = coeffs.len();
    let mut q = vec![F::zero(); n - 1];
    let mut carry = coeffs[n - 1];
    for k in (0..n - 1).rev() {
        q[k] = carry;
        carry = coeffs[k] + z * carry;
    }
    (q, carry)
}

/// Monic polynomial `∏ (X - r)` over `roots`.
pub fn from_roots<F: PrimeField>(roots: &[F]) -> DensePolynomial<F> {
    let mut coeffs = vec![F::one()];
    for r in roots {
        // coeffs ← coeffs · (X - r)
        coeffs.push(F::zero());
        for k in (1..coeffs.len()).rev() {
            coeffs[k] = coeffs[k - 1] - *r * coeffs[k];
        }
        coeffs[0] = -*r * coeffs[0];
    }
    DensePolynomial::from_coefficients_vec(coeffs)
}

/// The Lagrange basis `λ_0, …, λ_{n-1}` for the points `0, …, n-1`.
///
/// `λ_i(j) = 1` if `i == j` and `0` for every other point.
pub fn lagrange_basis<F: PrimeField>(n: usize) -> Vec<DensePolynomial<F>> {
    let points: Vec<F> = (0..n as u64).map(F::from).collect();
    lagrange_basis_on(&points)
}

/// The Lagrange basis for arbitrary `points`.
///
/// # Panics
///
/// Panics if two points coincide.
pub fn lagrange_basis_on<F: PrimeField>(points: &[F]) -> Vec<DensePolynomial<F>> {
    let vanishing = from_roots(points);
    points
        .iter()
        .map(|xi| {
            let (numer, _) = divide_by_linear(&vanishing.coeffs, *xi);
            let denom = numer
                .iter()
                .rev()
                .fold(F::zero(), |acc, c| acc * xi + c);
            let scale = denom
                .inverse()
                .expect("interpolation points must be distinct in the field");
            DensePolynomial::from_coefficients_vec(numer.into_iter().map(|c| c * scale).collect())
        })
        .collect()
}

/// The unique polynomial of degree `< n` with `f(j) = values[j]` for
/// `j < values.len()` and `f(j) = 0` for `values.len() <= j < n`.
pub fn interpolate_on_indices<F: PrimeField>(values: &[F], n: usize) -> DensePolynomial<F> {
    debug_assert!(values.len() <= n);
    let mut acc = vec![F::zero(); n];
    for (lambda, v) in lagrange_basis::<F>(n).iter().zip(values) {
        if v.is_zero() {
            continue;
        }
        for (a, c) in acc.iter_mut().zip(&lambda.coeffs) {
            *a += *c * v;
        }
    }
    DensePolynomial::from_coefficients_vec(acc)
}

/// `f · X^k`.
pub fn shift_up<F: PrimeField>(f: &DensePolynomial<F>, k: usize) -> DensePolynomial<F> {
    if f.coeffs.is_empty() {
        return f.clone();
    }
    let mut coeffs = vec![F::zero(); k];
    coeffs.extend_from_slice(&f.coeffs);
    DensePolynomial::from_coefficients_vec(coeffs)
}
