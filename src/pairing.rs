//! Pairing Context
//!
//! A [`PairingContext`] wraps one set of pairing-curve parameters and is the
//! only way to mint group elements. Every element remembers the context that
//! produced it, so elements from two contexts never mix silently, even when
//! the two contexts were built from the same parameter string.
//!
//! The parameter string names the curve and its scalar-field order:
//!
//! ```text
//! curve bn254
//! r 21888242871839275222246405745257275088548364400416034343698204186575808495617
//! ```
//!
//! Curves are supplied by arkworks; nothing here generates curve parameters.

#![forbid(unsafe_code)]

use std::fmt;
use std::marker::PhantomData;
use std::sync::atomic::{AtomicU64, Ordering};

use ark_ec::pairing::Pairing;
use ark_ec::Group;
use ark_ff::{PrimeField, Zero};
use ark_serialize::{CanonicalSerialize, Compress};
use ark_std::rand::Rng;
use ark_std::UniformRand;
use num_bigint::BigUint;

use crate::error::{Error, Result};
use crate::group::{Element, GroupKind, SourceA, SourceB, Target, G1, G2, Gt};
use crate::scalar;

/// A pairing-friendly curve usable as a commitment backend.
pub trait Curve: Pairing {
    /// Name written into the pairing-parameter string.
    const NAME: &'static str;

    /// Whether source groups A and B coincide.
    const SYMMETRIC: bool = false;

    /// Reinterpret a source-A element as a source-B element (symmetric curves only).
    fn a_as_b(_a: &Self::G1) -> Option<Self::G2> {
        None
    }

    /// Reinterpret a source-B element as a source-A element (symmetric curves only).
    fn b_as_a(_b: &Self::G2) -> Option<Self::G1> {
        None
    }
}

impl Curve for ark_bn254::Bn254 {
    const NAME: &'static str = "bn254";
}

impl Curve for ark_bls12_381::Bls12_381 {
    const NAME: &'static str = "bls12_381";
}

/// Identity of a pairing context. Id `0` marks an unbound element.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct ContextId(pub(crate) u64);

impl ContextId {
    pub(crate) const UNBOUND: ContextId = ContextId(0);

    fn fresh() -> Self {
        static NEXT: AtomicU64 = AtomicU64::new(1);
        ContextId(NEXT.fetch_add(1, Ordering::Relaxed))
    }

    /// Whether this id belongs to a constructed context.
    #[inline]
    pub fn is_bound(self) -> bool {
        self != Self::UNBOUND
    }
}

/// Which algebraic structure an encoding size refers to.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ElementKind {
    /// First source group (commitments, witnesses).
    SourceA,
    /// Second source group (verifier keys).
    SourceB,
    /// Pairing target group.
    Target,
    /// Scalar field.
    Scalar,
}

/// Immutable pairing parameters plus the identity used to bind elements.
pub struct PairingContext<E: Curve> {
    id: ContextId,
    params: String,
    _curve: PhantomData<E>,
}

impl<E: Curve> fmt::Debug for PairingContext<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PairingContext")
            .field("id", &self.id)
            .field("curve", &E::NAME)
            .finish()
    }
}

impl<E: Curve> Default for PairingContext<E> {
    fn default() -> Self {
        Self::new()
    }
}

/// Canonical parameter string for curve `E`.
pub fn default_params<E: Curve>() -> String {
    format!(
        "curve {}\nr {}\n",
        E::NAME,
        scalar::group_order::<E::ScalarField>()
    )
}

impl<E: Curve> PairingContext<E> {
    /// Build a context over the curve's canonical parameters.
    pub fn new() -> Self {
        Self {
            id: ContextId::fresh(),
            params: default_params::<E>(),
            _curve: PhantomData,
        }
    }

    /// Build a context from a parameter string.
    ///
    /// Fails with [`Error::UndefinedPairing`] if the string names another curve
    /// (or none), and with [`Error::CorruptData`] if it is malformed or its
    /// order disagrees with the curve's scalar field.
    pub fn from_params(params: &str) -> Result<Self> {
        let mut name = None;
        let mut order = None;
        for line in params.lines() {
            let mut parts = line.split_whitespace();
            match (parts.next(), parts.next(), parts.next()) {
                (None, _, _) => continue,
                (Some("curve"), Some(v), None) => name = Some(v),
                (Some("r"), Some(v), None) => order = Some(v),
                _ => {
                    return Err(Error::CorruptData(format!(
                        "unrecognised pairing parameter line `{}`",
                        line
                    )))
                }
            }
        }

        match name {
            Some(n) if n == E::NAME => {}
            Some(n) => {
                return Err(Error::UndefinedPairing(format!(
                    "parameters describe `{}`, backend provides `{}`",
                    n,
                    E::NAME
                )))
            }
            None => return Err(Error::UndefinedPairing("no curve named".into())),
        }

        if let Some(r) = order {
            let parsed = BigUint::parse_bytes(r.as_bytes(), 10)
                .ok_or_else(|| Error::CorruptData(format!("bad group order `{}`", r)))?;
            if parsed != scalar::group_order::<E::ScalarField>() {
                return Err(Error::CorruptData(format!(
                    "group order {} does not match curve {}",
                    parsed,
                    E::NAME
                )));
            }
        }

        Ok(Self {
            id: ContextId::fresh(),
            params: params.to_owned(),
            _curve: PhantomData,
        })
    }

    /// Identity binding this context's elements.
    #[inline]
    pub fn id(&self) -> ContextId {
        self.id
    }

    /// The parameter string this context was built from.
    pub fn params(&self) -> &str {
        &self.params
    }

    /// Whether the curve is symmetric (A = B).
    #[inline]
    pub fn is_symmetric(&self) -> bool {
        E::SYMMETRIC
    }

    /// Scalar-field order `r`, recovered as `(0 - 1) + 1`.
    pub fn order(&self) -> BigUint {
        scalar::group_order::<E::ScalarField>()
    }

    /// Encoded size in bytes of one element of `kind`.
    pub fn element_size(&self, kind: ElementKind, compressed: bool) -> usize {
        let mode = if compressed { Compress::Yes } else { Compress::No };
        match kind {
            ElementKind::SourceA => E::G1::default().serialized_size(mode),
            ElementKind::SourceB => E::G2::default().serialized_size(mode),
            ElementKind::Target => <Target as GroupKind<E>>::Inner::default().serialized_size(mode),
            ElementKind::Scalar => E::ScalarField::zero().serialized_size(mode),
        }
    }

    // ------------------------- Element minting -------------------------

    pub(crate) fn wrap<K: GroupKind<E>>(&self, inner: K::Inner) -> Element<E, K> {
        Element::bound(self.id, inner)
    }

    /// Panics unless `el` was minted by this context.
    #[inline]
    pub(crate) fn check<K: GroupKind<E>>(&self, el: &Element<E, K>) {
        if !el.context().is_bound() {
            panic!("{}", Error::UndefinedElement);
        }
        if el.context() != self.id {
            panic!("{}", Error::ContextMismatch);
        }
    }

    /// The group identity.
    pub fn identity<K: GroupKind<E>>(&self) -> Element<E, K> {
        self.wrap(K::Inner::zero())
    }

    /// The curve's fixed generator.
    pub fn generator<K: GroupKind<E>>(&self) -> Element<E, K> {
        self.wrap(K::Inner::generator())
    }

    /// A uniformly random element.
    pub fn random<K: GroupKind<E>, R: Rng + ?Sized>(&self, rng: &mut R) -> Element<E, K> {
        self.wrap(K::Inner::rand(rng))
    }

    /// Deterministic hash of `data` onto the group.
    pub fn hash_to<K: GroupKind<E>>(&self, data: &[u8]) -> Element<E, K> {
        self.wrap(K::hash_to_inner(data))
    }

    /// Decode a fixed-length encoding produced by [`Element::to_bytes`].
    pub fn decode<K: GroupKind<E>>(&self, bytes: &[u8], compressed: bool) -> Result<Element<E, K>> {
        Element::decode_with(self.id, bytes, compressed)
    }

    // ------------------------- Pairing -------------------------

    /// Bilinear map `e: A × B → T`.
    pub fn pair(&self, a: &G1<E>, b: &G2<E>) -> Gt<E> {
        self.check(a);
        self.check(b);
        self.wrap::<Target>(E::pairing(*a.inner(), *b.inner()))
    }

    /// `e(a, b)` for two source-A elements; symmetric curves only.
    pub fn pair_a(&self, a: &G1<E>, b: &G1<E>) -> Result<Gt<E>> {
        if !self.is_symmetric() {
            return Err(Error::NonsymmetricPairing);
        }
        self.check(a);
        self.check(b);
        let b = E::a_as_b(b.inner()).ok_or(Error::NonsymmetricPairing)?;
        Ok(self.wrap::<Target>(E::pairing(*a.inner(), b)))
    }

    /// `e(a, b)` for two source-B elements; symmetric curves only.
    pub fn pair_b(&self, a: &G2<E>, b: &G2<E>) -> Result<Gt<E>> {
        if !self.is_symmetric() {
            return Err(Error::NonsymmetricPairing);
        }
        self.check(a);
        self.check(b);
        let a = E::b_as_a(a.inner()).ok_or(Error::NonsymmetricPairing)?;
        Ok(self.wrap::<Target>(E::pairing(a, *b.inner())))
    }

    /// Fix the first pairing argument for repeated evaluation.
    pub fn prepare<'c>(&'c self, a: &G1<E>) -> PreparedPairing<'c, E> {
        self.check(a);
        PreparedPairing {
            ctx: self,
            first: E::G1Prepared::from(*a.inner()),
        }
    }
}

/// Pairing with a precomputed first argument.
pub struct PreparedPairing<'c, E: Curve> {
    ctx: &'c PairingContext<E>,
    first: E::G1Prepared,
}

impl<'c, E: Curve> PreparedPairing<'c, E> {
    /// `e(first, b)`.
    pub fn apply(&self, b: &G2<E>) -> Gt<E> {
        self.ctx.check(b);
        self.ctx
            .wrap::<Target>(E::pairing(self.first.clone(), *b.inner()))
    }
}

impl<E: Curve> PairingContext<E> {
    /// Convenience: identity of source group A.
    pub fn identity_a(&self) -> G1<E> {
        self.identity::<SourceA>()
    }

    /// Convenience: identity of source group B.
    pub fn identity_b(&self) -> G2<E> {
        self.identity::<SourceB>()
    }

    /// Scalar field order as a field-sized bit count.
    pub fn scalar_bits(&self) -> u32 {
        E::ScalarField::MODULUS_BIT_SIZE
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ark_bn254::Bn254;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn params_roundtrip_and_rejection() {
        let ctx = PairingContext::<Bn254>::new();
        let again = PairingContext::<Bn254>::from_params(ctx.params()).unwrap();
        assert_ne!(ctx.id(), again.id());

        let other = default_params::<ark_bls12_381::Bls12_381>();
        assert!(matches!(
            PairingContext::<Bn254>::from_params(&other),
            Err(Error::UndefinedPairing(_))
        ));
        assert!(matches!(
            PairingContext::<Bn254>::from_params("curve bn254\nr 17\n"),
            Err(Error::CorruptData(_))
        ));
    }

    #[test]
    fn bilinearity() {
        let mut rng = StdRng::seed_from_u64(7);
        let ctx = PairingContext::<Bn254>::new();
        let a: G1<Bn254> = ctx.random(&mut rng);
        let b: G2<Bn254> = ctx.random(&mut rng);
        let x = scalar::random::<ark_bn254::Fr, _>(&mut rng);
        let y = scalar::random::<ark_bn254::Fr, _>(&mut rng);

        let lhs = ctx.pair(&a.pow(&x), &b.pow(&y));
        let rhs = ctx.pair(&a, &b).pow(&(x * y));
        assert_eq!(lhs, rhs);

        let prepared = ctx.prepare(&a);
        assert_eq!(prepared.apply(&b), ctx.pair(&a, &b));
    }

    #[test]
    fn asymmetric_curve_rejects_symmetric_calls() {
        let mut rng = StdRng::seed_from_u64(8);
        let ctx = PairingContext::<Bn254>::new();
        let a: G1<Bn254> = ctx.random(&mut rng);
        let b: G2<Bn254> = ctx.random(&mut rng);
        assert!(matches!(ctx.pair_a(&a, &a), Err(Error::NonsymmetricPairing)));
        assert!(matches!(ctx.pair_b(&b, &b), Err(Error::NonsymmetricPairing)));
    }

    #[test]
    fn element_sizes() {
        let ctx = PairingContext::<Bn254>::new();
        assert_eq!(ctx.element_size(ElementKind::SourceA, true), 32);
        assert_eq!(ctx.element_size(ElementKind::SourceA, false), 64);
        assert_eq!(ctx.element_size(ElementKind::SourceB, true), 64);
        assert_eq!(ctx.element_size(ElementKind::Scalar, true), 32);
    }

    #[test]
    #[should_panic(expected = "different pairing contexts")]
    fn mixing_contexts_is_fatal() {
        let mut rng = StdRng::seed_from_u64(9);
        let c1 = PairingContext::<Bn254>::new();
        let c2 = PairingContext::<Bn254>::new();
        let a: G1<Bn254> = c1.random(&mut rng);
        let b: G2<Bn254> = c2.random(&mut rng);
        let _ = c1.pair(&a, &b);
    }
}
