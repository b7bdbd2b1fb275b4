//! Public surface & core types
//!
//! Pairing-based polynomial commitments in the style of Kate, Zaverucha and
//! Goldberg. A trusted setup publishes `g^{α^i}` for `i ≤ t`; a commitment to
//! `f` is `C = g^{f(α)}` and an opening at `i` is the witness
//! `w_i = g^{ψ_i(α)}` with `ψ_i = (f - f(i)) / (X - i)`, checked by
//!
//! ```text
//!   e(C, ĝ) == e(w_i, ĝ^α / ĝ^i) · e(g, ĝ)^{f(i)}
//! ```
//!
//! On top of the basic scheme the crate provides:
//!
//! - windowed fixed-base tables that make commitments a table walk
//!   ([`precomp`]),
//! - vector commitments through the Lagrange basis on `0 … t`
//!   ([`committer::PolyCommitter::new_vector`]),
//! - batched verification at one point with short random weights
//!   ([`verify::verify_eval_batch`]),
//! - an interactive and Fiat–Shamir proof of knowledge of the committed
//!   polynomial, with a degree-bound sub-proof ([`pok`]),
//! - a one-call facade ([`api`]) used by the `prover` and `verifier` binaries.
//!
//! ## Contexts
//!
//! Every group element is bound to the [`pairing::PairingContext`] that
//! minted it. Mixing elements from two contexts, or using a
//! default-constructed element, panics: both are programming errors, not
//! data errors. Scalars are plain field elements, so their modulus is fixed
//! by the type.
//!
//! ## Errors vs. rejections
//!
//! Construction, decoding and protocol misuse return [`Error`]. A proof
//! that simply does not verify is a `false`, never an error.

#![forbid(unsafe_code)]
#![deny(missing_docs, rust_2018_idioms)]

/// Error taxonomy shared by every module.
pub mod error;
/// Curve selection, pairing contexts and element minting.
pub mod pairing;
/// Context-bound group elements and fused multi-exponentiation.
pub mod group;
/// Scalar sampling, encoding and reduction helpers.
pub mod scalar;
/// Polynomial helpers (synthetic division, Lagrange basis, shifts).
pub mod poly;
/// Windowed fixed-base multi-exponentiation tables.
pub mod precomp;
/// Trusted setup, parameter serialization and accessors.
pub mod params;
/// Commitments and evaluation witnesses.
pub mod committer;
/// Single, batched and recomputation checks.
pub mod verify;
/// Fiat–Shamir transcript (domain-separated hashing, hash→field).
pub mod transcript;
/// Sigma-protocol proof of knowledge and degree bounds.
pub mod pok;
/// One-call facade: setup, commit, verify.
pub mod api;

pub use committer::PolyCommitter;
pub use error::{Error, Result};
pub use group::{G1, G2, Gt};
pub use pairing::{Curve, PairingContext};
pub use params::{CommitmentParams, SetupOptions};
pub use pok::{PokProver, PokVerifier, Proof, Simulator};

/// Default pairing curve.
pub type DefaultCurve = ark_bn254::Bn254;

/// Scalar field of [`DefaultCurve`].
pub type F = ark_bn254::Fr;

/// Requested window width for commitment tables before adjustment.
pub const DEFAULT_WINDOW_WIDTH: usize = 12;

/// Bit length of the random weights used by batched verification.
///
/// A forged batch passes with probability about `2^-20` per check.
pub const BATCH_RANDOMNESS_BITS: u32 = 20;
