//! Context-bound group elements
//!
//! [`Element`] wraps an arkworks group value together with the id of the
//! [`PairingContext`](crate::pairing::PairingContext) that minted it. All three
//! groups are written multiplicatively: `a * b` is the group operation and
//! `a.pow(&x)` is exponentiation, matching the notation of the commitment
//! equations.
//!
//! Combining an unbound element, or elements from two contexts, is a
//! programming error and panics.

#![forbid(unsafe_code)]

use std::fmt;
use std::marker::PhantomData;
use std::ops::{Div, Mul, MulAssign};

use ark_ec::pairing::PairingOutput;
use ark_ec::{AffineRepr, Group};
use ark_ff::{BigInteger, PrimeField, Zero};
use ark_serialize::{CanonicalDeserialize, CanonicalSerialize, Compress, Validate};

use crate::error::{Error, Result};
use crate::pairing::{ContextId, Curve, ElementKind};

/// Selects one of the three pairing groups.
pub trait GroupKind<E: Curve>: Copy + fmt::Debug + Send + Sync + 'static {
    /// Underlying arkworks group.
    type Inner: Group<ScalarField = E::ScalarField>;

    /// Size-table key for this group.
    const KIND: ElementKind;

    /// Deterministically map bytes to a group value.
    fn hash_to_inner(data: &[u8]) -> Self::Inner;
}

/// Source group A (`E::G1`).
#[derive(Copy, Clone, Debug)]
pub struct SourceA;

/// Source group B (`E::G2`).
#[derive(Copy, Clone, Debug)]
pub struct SourceB;

/// Pairing target group.
#[derive(Copy, Clone, Debug)]
pub struct Target;

impl<E: Curve> GroupKind<E> for SourceA {
    type Inner = E::G1;
    const KIND: ElementKind = ElementKind::SourceA;

    fn hash_to_inner(data: &[u8]) -> E::G1 {
        hash_to_curve::<E::G1Affine>(b"A", data)
    }
}

impl<E: Curve> GroupKind<E> for SourceB {
    type Inner = E::G2;
    const KIND: ElementKind = ElementKind::SourceB;

    fn hash_to_inner(data: &[u8]) -> E::G2 {
        hash_to_curve::<E::G2Affine>(b"B", data)
    }
}

impl<E: Curve> GroupKind<E> for Target {
    type Inner = PairingOutput<E>;
    const KIND: ElementKind = ElementKind::Target;

    fn hash_to_inner(data: &[u8]) -> PairingOutput<E> {
        let a = hash_to_curve::<E::G1Affine>(b"T", data);
        E::pairing(a, E::G2::generator())
    }
}

/// Try-and-increment over a blake3 XOF, then clear the cofactor.
fn hash_to_curve<A: AffineRepr>(tag: &[u8], data: &[u8]) -> A::Group {
    let mut buf = vec![0u8; A::generator().compressed_size()];
    for ctr in 0u64.. {
        let mut hasher = blake3::Hasher::new();
        hasher.update(b"polycommit.hash_to_group.v1:");
        hasher.update(tag);
        hasher.update(&(data.len() as u64).to_be_bytes());
        hasher.update(data);
        hasher.update(&ctr.to_be_bytes());
        hasher.finalize_xof().fill(&mut buf);
        if let Some(p) = A::from_random_bytes(&buf) {
            let p = p.clear_cofactor();
            if !p.is_zero() {
                return p.into_group();
            }
        }
    }
    unreachable!("hash-to-group counter exhausted")
}

/// An element of group `K`, bound to one pairing context.
pub struct Element<E: Curve, K: GroupKind<E>> {
    ctx: ContextId,
    inner: K::Inner,
    _kind: PhantomData<(E, K)>,
}

/// Element of source group A.
pub type G1<E> = Element<E, SourceA>;
/// Element of source group B.
pub type G2<E> = Element<E, SourceB>;
/// Element of the target group.
pub type Gt<E> = Element<E, Target>;

impl<E: Curve, K: GroupKind<E>> Clone for Element<E, K> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<E: Curve, K: GroupKind<E>> Copy for Element<E, K> {}

/// The default element is unbound; any operation on it panics.
impl<E: Curve, K: GroupKind<E>> Default for Element<E, K> {
    fn default() -> Self {
        Self::bound(ContextId::UNBOUND, K::Inner::zero())
    }
}

impl<E: Curve, K: GroupKind<E>> fmt::Debug for Element<E, K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_present() {
            write!(f, "{:?}#{}({})", K::KIND, self.ctx.0, self.inner)
        } else {
            write!(f, "{:?}(undefined)", K::KIND)
        }
    }
}

impl<E: Curve, K: GroupKind<E>> Element<E, K> {
    #[inline]
    pub(crate) fn bound(ctx: ContextId, inner: K::Inner) -> Self {
        Self {
            ctx,
            inner,
            _kind: PhantomData,
        }
    }

    pub(crate) fn decode_with(ctx: ContextId, bytes: &[u8], compressed: bool) -> Result<Self> {
        let mode = if compressed { Compress::Yes } else { Compress::No };
        let expected = K::Inner::default().serialized_size(mode);
        if bytes.len() != expected {
            return Err(Error::CorruptData(format!(
                "{:?} encoding is {} bytes, expected {}",
                K::KIND,
                bytes.len(),
                expected
            )));
        }
        let inner = K::Inner::deserialize_with_mode(bytes, mode, Validate::Yes)?;
        Ok(Self::bound(ctx, inner))
    }

    /// Context this element is bound to.
    #[inline]
    pub fn context(&self) -> ContextId {
        self.ctx
    }

    /// `false` for a default-constructed (unbound) element.
    #[inline]
    pub fn is_present(&self) -> bool {
        self.ctx.is_bound()
    }

    #[inline]
    pub(crate) fn inner(&self) -> &K::Inner {
        &self.inner
    }

    #[inline]
    fn assert_present(&self) {
        if !self.is_present() {
            panic!("{}", Error::UndefinedElement);
        }
    }

    /// Shared context of two operands.
    #[inline]
    fn join(&self, other: &Self) -> ContextId {
        self.assert_present();
        other.assert_present();
        if self.ctx != other.ctx {
            panic!("{}", Error::ContextMismatch);
        }
        self.ctx
    }

    /// Group operation.
    pub fn op(&self, rhs: &Self) -> Self {
        let ctx = self.join(rhs);
        Self::bound(ctx, self.inner + rhs.inner)
    }

    /// `self * rhs⁻¹`.
    pub fn divide(&self, rhs: &Self) -> Self {
        let ctx = self.join(rhs);
        Self::bound(ctx, self.inner - rhs.inner)
    }

    /// Group inverse.
    pub fn inverse(&self) -> Self {
        self.assert_present();
        Self::bound(self.ctx, -self.inner)
    }

    /// `self * self`.
    pub fn square(&self) -> Self {
        self.assert_present();
        Self::bound(self.ctx, self.inner.double())
    }

    /// `self^e`.
    pub fn pow(&self, e: &E::ScalarField) -> Self {
        self.assert_present();
        Self::bound(self.ctx, self.inner * *e)
    }

    /// Whether this is the group identity.
    pub fn is_identity(&self) -> bool {
        self.assert_present();
        self.inner.is_zero()
    }

    /// `a^x * b^y` with a single shared squaring chain.
    pub fn pow2(a: &Self, x: &E::ScalarField, b: &Self, y: &E::ScalarField) -> Self {
        let ctx = a.join(b);
        Self::bound(ctx, fused_pow(&[a.inner, b.inner], &[*x, *y]))
    }

    /// `a^x * b^y * c^z` with a single shared squaring chain.
    pub fn pow3(
        a: &Self,
        x: &E::ScalarField,
        b: &Self,
        y: &E::ScalarField,
        c: &Self,
        z: &E::ScalarField,
    ) -> Self {
        let ctx = a.join(b);
        c.join(a);
        Self::bound(ctx, fused_pow(&[a.inner, b.inner, c.inner], &[*x, *y, *z]))
    }

    /// Fixed-length canonical encoding.
    pub fn to_bytes(&self, compressed: bool) -> Vec<u8> {
        self.assert_present();
        let mode = if compressed { Compress::Yes } else { Compress::No };
        let mut out = Vec::with_capacity(self.inner.serialized_size(mode));
        // Writing into a Vec cannot fail.
        let _ = self.inner.serialize_with_mode(&mut out, mode);
        out
    }
}

/// Simultaneous multi-exponentiation (Shamir's trick).
///
/// Precomputes the product of every subset of `bases`, then walks the
/// exponent bits from the top once, squaring and multiplying by the subset
/// selected at each bit position.
pub(crate) fn fused_pow<G: Group>(bases: &[G], exps: &[G::ScalarField]) -> G {
    debug_assert_eq!(bases.len(), exps.len());

    let mut subsets = vec![G::zero(); 1 << bases.len()];
    for mask in 1..subsets.len() {
        let low = mask.trailing_zeros() as usize;
        subsets[mask] = subsets[mask & (mask - 1)] + bases[low];
    }

    let exps: Vec<_> = exps.iter().map(|e| e.into_bigint()).collect();
    let bits = exps.iter().map(|e| e.num_bits()).max().unwrap_or(0) as usize;

    let mut acc = G::zero();
    for bit in (0..bits).rev() {
        acc.double_in_place();
        let mut mask = 0usize;
        for (j, e) in exps.iter().enumerate() {
            if e.get_bit(bit) {
                mask |= 1 << j;
            }
        }
        if mask != 0 {
            acc += subsets[mask];
        }
    }
    acc
}

impl<E: Curve, K: GroupKind<E>> PartialEq for Element<E, K> {
    fn eq(&self, other: &Self) -> bool {
        self.join(other);
        self.inner == other.inner
    }
}

impl<E: Curve, K: GroupKind<E>> Eq for Element<E, K> {}

impl<E: Curve, K: GroupKind<E>> Mul for Element<E, K> {
    type Output = Self;

    fn mul(self, rhs: Self) -> Self {
        self.op(&rhs)
    }
}

impl<'a, E: Curve, K: GroupKind<E>> Mul<&'a Element<E, K>> for &'a Element<E, K> {
    type Output = Element<E, K>;

    fn mul(self, rhs: &'a Element<E, K>) -> Element<E, K> {
        self.op(rhs)
    }
}

impl<E: Curve, K: GroupKind<E>> MulAssign<&Element<E, K>> for Element<E, K> {
    fn mul_assign(&mut self, rhs: &Element<E, K>) {
        *self = self.op(rhs);
    }
}

impl<E: Curve, K: GroupKind<E>> Div for Element<E, K> {
    type Output = Self;

    fn div(self, rhs: Self) -> Self {
        self.divide(&rhs)
    }
}
