//! Fiat–Shamir transcript with domain separation
//!
//! A running BLAKE3 state absorbs labelled, length-delimited items. A
//! challenge is drawn by cloning the state, appending a fixed DST plus a
//! monotone counter, and reducing the 32-byte digest modulo the scalar field
//! (little-endian) with `from_le_bytes_mod_order`.
//!
//! Group elements are absorbed in their **compressed** encoding and scalars
//! in their canonical little-endian encoding, so transcripts are stable
//! across processes.

#![forbid(unsafe_code)]

use ark_ff::PrimeField;
use blake3::Hasher;

use crate::group::{Element, GroupKind};
use crate::pairing::Curve;
use crate::scalar;

/// Fiat–Shamir transcript.
pub struct Transcript {
    /// Domain-separation string for this transcript instance.
    label: &'static str,
    /// Running hash state.
    hasher: Hasher,
    /// Draw counter.
    ctr: u64,
}

impl Transcript {
    /// Create a new transcript with a domain-separation `label`.
    pub fn new(label: &'static str) -> Self {
        let mut hasher = Hasher::new();
        hasher.update(b"polycommit.transcript.v1");
        hasher.update(label.as_bytes());
        Self {
            label,
            hasher,
            ctr: 0,
        }
    }

    /// Absorb arbitrary bytes with an item label (length-delimited).
    pub fn absorb_bytes(&mut self, label: &'static str, bytes: &[u8]) {
        self.hasher.update(b"item:");
        self.hasher.update(label.as_bytes());
        self.hasher.update(b":len:");
        self.hasher.update(&(bytes.len() as u64).to_be_bytes());
        self.hasher.update(b":data:");
        self.hasher.update(bytes);
    }

    /// Absorb a group element in compressed form.
    pub fn absorb_element<E: Curve, K: GroupKind<E>>(
        &mut self,
        label: &'static str,
        el: &Element<E, K>,
    ) {
        self.absorb_bytes(label, &el.to_bytes(true));
    }

    /// Absorb a scalar in canonical form.
    pub fn absorb_scalar<F: PrimeField>(&mut self, label: &'static str, x: &F) {
        self.absorb_bytes(label, &scalar::to_bytes(x));
    }

    /// Draw one scalar challenge bound to everything absorbed so far.
    pub fn challenge_scalar<F: PrimeField>(&mut self, label: &'static str) -> F {
        let mut h = self.hasher.clone();
        h.update(b"challenge:");
        h.update(b":tlabel:");
        h.update(self.label.as_bytes());
        h.update(b":label:");
        h.update(label.as_bytes());
        h.update(b":ctr:");
        h.update(&self.ctr.to_be_bytes());
        self.ctr = self.ctr.wrapping_add(1);
        scalar::from_digest(h.finalize().as_bytes())
    }
}
