//! Proof of knowledge of a committed polynomial
//!
//! A three-move sigma protocol showing that the prover knows the polynomial
//! `f` behind a commitment `C`, without revealing any evaluation.
//!
//! ```text
//! P: γ ≠ 0, s1, s2 ←$ F
//!    w' = w_i^γ                                   (blinded witness at i)
//!    LHS = e(w', ĝ^α/ĝ^i)^{s1} · e(g, ĝ)^{s2}
//!    ──────── (w', LHS) ────────▶
//! V: c ←$ F
//!    ◀──────────── c ────────────
//! P: u1 = s1 - c/γ,  u2 = s2 - c·f(i)
//!    ──────── (u1, u2) ─────────▶
//! V: LHS == e(w', ĝ^α/ĝ^i)^{u1} · e(g, ĝ)^{u2} · e(C, ĝ)^c
//! ```
//!
//! The non-interactive variant derives `i = H(nonce, C)` and
//! `c = H(nonce, C, i, w', LHS)` from a blake3 transcript. A separate
//! degree-bound check shows `deg f ≤ d` by committing to `f · X^{t-d}`.
//!
//! Prover and verifier are small state machines; calling a step out of
//! order returns [`Error::ProtocolSequence`].

#![forbid(unsafe_code)]

use ark_ff::Field;
use ark_std::rand::{CryptoRng, RngCore};
use tracing::{debug, instrument, warn};
use zeroize::Zeroize;

use crate::committer::PolyCommitter;
use crate::error::{Error, Result};
use crate::group::{G1, Gt};
use crate::pairing::{Curve, ElementKind, PairingContext};
use crate::params::CommitmentParams;
use crate::poly;
use crate::scalar;
use crate::transcript::Transcript;

/// First prover message.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Announcement<E: Curve> {
    /// Blinded witness `w'`.
    pub witness: G1<E>,
    /// `e(w', ĝ^α/ĝ^i)^{s1} · e(g, ĝ)^{s2}`.
    pub lhs: Gt<E>,
}

/// Third prover message.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Response<F> {
    /// `s1 - c/γ`.
    pub u1: F,
    /// `s2 - c·f(i)`.
    pub u2: F,
}

/// Non-interactive proof: announcement plus response.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Proof<E: Curve> {
    /// Prover's first message.
    pub announcement: Announcement<E>,
    /// Prover's answer to the derived challenge.
    pub response: Response<E::ScalarField>,
}

impl<E: Curve> Proof<E> {
    /// `w' ‖ LHS ‖ u1 ‖ u2`, group elements compressed.
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut out = self.announcement.witness.to_bytes(true);
        out.extend_from_slice(&self.announcement.lhs.to_bytes(true));
        out.extend_from_slice(&scalar::to_bytes(&self.response.u1));
        out.extend_from_slice(&scalar::to_bytes(&self.response.u2));
        out
    }

    /// Parse [`Self::to_bytes`] output, binding elements to `ctx`.
    pub fn from_bytes(ctx: &PairingContext<E>, bytes: &[u8]) -> Result<Self> {
        let a = ctx.element_size(ElementKind::SourceA, true);
        let t = ctx.element_size(ElementKind::Target, true);
        let s = ctx.element_size(ElementKind::Scalar, true);
        if bytes.len() != a + t + 2 * s {
            return Err(Error::CorruptData(format!(
                "proof is {} bytes, expected {}",
                bytes.len(),
                a + t + 2 * s
            )));
        }
        let (w, rest) = bytes.split_at(a);
        let (lhs, rest) = rest.split_at(t);
        let (u1, u2) = rest.split_at(s);
        Ok(Self {
            announcement: Announcement {
                witness: ctx.decode(w, true)?,
                lhs: ctx.decode(lhs, true)?,
            },
            response: Response {
                u1: scalar::from_bytes(u1)?,
                u2: scalar::from_bytes(u2)?,
            },
        })
    }
}

/// Fiat–Shamir evaluation index `i = H(nonce, C)`.
pub fn fs_index<E: Curve>(commitment: &G1<E>, nonce: &[u8]) -> E::ScalarField {
    let mut tr = Transcript::new("polycommit.pok.index");
    tr.absorb_bytes("nonce", nonce);
    tr.absorb_element("commitment", commitment);
    tr.challenge_scalar("index")
}

/// Fiat–Shamir challenge `c = H(nonce, C, i, w', LHS)`.
pub fn fs_challenge<E: Curve>(
    nonce: &[u8],
    commitment: &G1<E>,
    index: &E::ScalarField,
    announcement: &Announcement<E>,
) -> E::ScalarField {
    let mut tr = Transcript::new("polycommit.pok.challenge");
    tr.absorb_bytes("nonce", nonce);
    tr.absorb_element("commitment", commitment);
    tr.absorb_scalar("index", index);
    tr.absorb_element("witness", &announcement.witness);
    tr.absorb_element("lhs", &announcement.lhs);
    tr.challenge_scalar("challenge")
}

/// `e(w', ĝ^α/ĝ^i)`, `e(g, ĝ)`, `e(C, ĝ)`.
fn bases<E: Curve>(
    params: &CommitmentParams<E>,
    commitment: &G1<E>,
    index: &E::ScalarField,
    witness: &G1<E>,
) -> (Gt<E>, Gt<E>, Gt<E>) {
    let ctx = params.context();
    (
        ctx.pair(witness, &params.shifted_alpha_b(index)),
        *params.gt_base(),
        ctx.pair(commitment, params.ghatalphai(0)),
    )
}

// ------------------------- Prover -------------------------

struct Secrets<F: Field> {
    gamma_inv: F,
    s1: F,
    s2: F,
}

impl<F: Field> Drop for Secrets<F> {
    fn drop(&mut self) {
        self.gamma_inv.zeroize();
        self.s1.zeroize();
        self.s2.zeroize();
    }
}

enum ProverState<E: Curve> {
    Init,
    Announced {
        secrets: Secrets<E::ScalarField>,
        announcement: Announcement<E>,
    },
    Responded {
        announcement: Announcement<E>,
    },
}

/// Prover side of the proof of knowledge.
pub struct PokProver<'c, 'p, E: Curve> {
    committer: &'c PolyCommitter<'p, E>,
    commitment: G1<E>,
    index: E::ScalarField,
    state: ProverState<E>,
}

impl<'c, 'p, E: Curve> PokProver<'c, 'p, E> {
    /// Prove knowledge through an opening at a caller-chosen `index`.
    pub fn for_point(committer: &'c PolyCommitter<'p, E>, index: E::ScalarField) -> Self {
        Self {
            committer,
            commitment: committer.get_c_fast(),
            index,
            state: ProverState::Init,
        }
    }

    /// Prove knowledge through an opening at `H(nonce, C)`.
    pub fn for_polynomial(committer: &'c PolyCommitter<'p, E>, nonce: &[u8]) -> Self {
        let commitment = committer.get_c_fast();
        let index = fs_index(&commitment, nonce);
        Self {
            committer,
            commitment,
            index,
            state: ProverState::Init,
        }
    }

    /// Commitment being proven.
    pub fn commitment(&self) -> &G1<E> {
        &self.commitment
    }

    /// Evaluation index used for the blinded witness.
    pub fn index(&self) -> &E::ScalarField {
        &self.index
    }

    /// First move: sample `γ, s1, s2` and publish `(w', LHS)`.
    pub fn announce<R: RngCore + CryptoRng + ?Sized>(&mut self, rng: &mut R) -> Result<Announcement<E>> {
        if !matches!(self.state, ProverState::Init) {
            return Err(Error::ProtocolSequence("announce() called twice"));
        }
        let params = self.committer.params();

        let (gamma, gamma_inv) = loop {
            let gamma: E::ScalarField = scalar::random(rng);
            match gamma.inverse() {
                Some(inv) => break (gamma, inv),
                None => warn!("sampled a zero blinding factor; resampling"),
            }
        };
        let s1 = scalar::random(rng);
        let s2 = scalar::random(rng);

        let witness = self.committer.create_blinded_witness(&self.index, &gamma);
        let (b1, b2, _) = bases(params, &self.commitment, &self.index, &witness);
        let announcement = Announcement {
            witness,
            lhs: Gt::pow2(&b1, &s1, &b2, &s2),
        };

        self.state = ProverState::Announced {
            secrets: Secrets { gamma_inv, s1, s2 },
            announcement,
        };
        Ok(announcement)
    }

    /// Third move: answer challenge `c`.
    pub fn respond(&mut self, challenge: &E::ScalarField) -> Result<Response<E::ScalarField>> {
        match std::mem::replace(&mut self.state, ProverState::Init) {
            ProverState::Init => Err(Error::ProtocolSequence("respond() called before announce()")),
            ProverState::Responded { announcement } => {
                self.state = ProverState::Responded { announcement };
                Err(Error::ProtocolSequence("respond() called twice"))
            }
            ProverState::Announced {
                secrets,
                announcement,
            } => {
                let fi = self.committer.evaluate(&self.index);
                let response = Response {
                    u1: secrets.s1 - *challenge * secrets.gamma_inv,
                    u2: secrets.s2 - *challenge * fi,
                };
                self.state = ProverState::Responded { announcement };
                Ok(response)
            }
        }
    }

    /// Challenge `H(nonce, C, i, w', LHS)` for the current announcement.
    pub fn fs_challenge(&self, nonce: &[u8]) -> Result<E::ScalarField> {
        match &self.state {
            ProverState::Init => Err(Error::ProtocolSequence(
                "fs_challenge() called before announce()",
            )),
            ProverState::Announced { announcement, .. } | ProverState::Responded { announcement } => {
                Ok(fs_challenge(nonce, &self.commitment, &self.index, announcement))
            }
        }
    }

    /// Run all three moves non-interactively.
    #[instrument(level = "debug", skip_all, fields(nonce_len = nonce.len()))]
    pub fn fs_proof<R: RngCore + CryptoRng + ?Sized>(&mut self, rng: &mut R, nonce: &[u8]) -> Result<Proof<E>> {
        let announcement = self.announce(rng)?;
        let challenge = self.fs_challenge(nonce)?;
        let response = self.respond(&challenge)?;
        debug!("non-interactive proof assembled");
        Ok(Proof {
            announcement,
            response,
        })
    }

    /// Commit to `f · X^{t-d}`, attesting `deg f ≤ d`.
    pub fn assert_degree(&self, d: usize) -> Result<G1<E>> {
        let params = self.committer.params();
        let f = self.committer.polynomial();
        if d > params.t() {
            return Err(Error::DegreeExceeded {
                degree: d,
                max: params.t(),
            });
        }
        let degree = poly::degree(f);
        if degree > d {
            return Err(Error::DegreeExceeded { degree, max: d });
        }
        let shifted = poly::shift_up(f, params.t() - d);
        Ok(PolyCommitter::new_poly(params, shifted)?.get_c_fast())
    }
}

// ------------------------- Verifier -------------------------

enum VerifierState<E: Curve> {
    Init,
    Challenged {
        announcement: Announcement<E>,
        challenge: E::ScalarField,
    },
    Verified,
}

/// Verifier side of the proof of knowledge.
pub struct PokVerifier<'p, E: Curve> {
    params: &'p CommitmentParams<E>,
    commitment: G1<E>,
    index: E::ScalarField,
    state: VerifierState<E>,
}

impl<'p, E: Curve> PokVerifier<'p, E> {
    /// Verify an opening-based proof at a caller-chosen `index`.
    pub fn for_point(params: &'p CommitmentParams<E>, commitment: G1<E>, index: E::ScalarField) -> Self {
        Self {
            params,
            commitment,
            index,
            state: VerifierState::Init,
        }
    }

    /// Verify a proof whose index is `H(nonce, C)`.
    pub fn for_polynomial(params: &'p CommitmentParams<E>, commitment: G1<E>, nonce: &[u8]) -> Self {
        let index = fs_index(&commitment, nonce);
        Self::for_point(params, commitment, index)
    }

    /// Evaluation index the prover must open at.
    pub fn index(&self) -> &E::ScalarField {
        &self.index
    }

    fn accept(&mut self, announcement: &Announcement<E>, challenge: E::ScalarField) -> Result<()> {
        if !matches!(self.state, VerifierState::Init) {
            return Err(Error::ProtocolSequence("challenge() called twice"));
        }
        self.state = VerifierState::Challenged {
            announcement: *announcement,
            challenge,
        };
        Ok(())
    }

    /// Second move: a uniformly random challenge.
    pub fn challenge<R: RngCore + CryptoRng + ?Sized>(
        &mut self,
        announcement: &Announcement<E>,
        rng: &mut R,
    ) -> Result<E::ScalarField> {
        let c = scalar::random(rng);
        self.accept(announcement, c)?;
        Ok(c)
    }

    /// Second move, derived as `H(nonce, C, i, w', LHS)`.
    pub fn fs_challenge(&mut self, announcement: &Announcement<E>, nonce: &[u8]) -> Result<E::ScalarField> {
        let c = fs_challenge(nonce, &self.commitment, &self.index, announcement);
        self.accept(announcement, c)?;
        Ok(c)
    }

    /// Final check of the prover's response.
    pub fn verify(&mut self, response: &Response<E::ScalarField>) -> Result<bool> {
        match std::mem::replace(&mut self.state, VerifierState::Verified) {
            VerifierState::Init => {
                self.state = VerifierState::Init;
                Err(Error::ProtocolSequence("verify() called before challenge()"))
            }
            VerifierState::Verified => Err(Error::ProtocolSequence("verify() called twice")),
            VerifierState::Challenged {
                announcement,
                challenge,
            } => Ok(self.check_transcript(&announcement, &challenge, response)),
        }
    }

    /// Check a non-interactive proof produced under `nonce`.
    #[instrument(level = "debug", skip_all, fields(nonce_len = nonce.len()))]
    pub fn fs_verify(&mut self, proof: &Proof<E>, nonce: &[u8]) -> Result<bool> {
        self.fs_challenge(&proof.announcement, nonce)?;
        self.verify(&proof.response)
    }

    /// Stateless verification equation for a full transcript.
    pub fn check_transcript(
        &self,
        announcement: &Announcement<E>,
        challenge: &E::ScalarField,
        response: &Response<E::ScalarField>,
    ) -> bool {
        let (b1, b2, b3) = bases(self.params, &self.commitment, &self.index, &announcement.witness);
        let rhs = Gt::pow3(&b1, &response.u1, &b2, &response.u2, &b3, challenge);
        rhs == announcement.lhs
    }

    /// Check `e(C_d, ĝ) == e(C, ĝ^{α^{t-d}})`.
    ///
    /// Needs `t - d ≤ t̂`; otherwise [`Error::DegreeExceeded`] reports the
    /// missing power of `α` against `t̂`.
    pub fn verify_assert_degree(&self, shifted: &G1<E>, d: usize) -> Result<bool> {
        let params = self.params;
        if d > params.t() {
            return Err(Error::DegreeExceeded {
                degree: d,
                max: params.t(),
            });
        }
        let shift = params.t() - d;
        if shift > params.t_hat() {
            return Err(Error::DegreeExceeded {
                degree: shift,
                max: params.t_hat(),
            });
        }
        let ctx = params.context();
        Ok(ctx.pair(shifted, params.ghatalphai(0)) == ctx.pair(&self.commitment, params.ghatalphai(shift)))
    }
}

// ------------------------- Simulator -------------------------

/// Produces accepting transcripts without knowing `f`.
///
/// Used to argue zero knowledge; the transcripts are distributed like honest
/// ones for a challenge chosen in advance.
pub struct Simulator<'p, E: Curve> {
    params: &'p CommitmentParams<E>,
    commitment: G1<E>,
    index: E::ScalarField,
}

impl<'p, E: Curve> Simulator<'p, E> {
    /// Simulator for `(C, i)`.
    pub fn new(params: &'p CommitmentParams<E>, commitment: G1<E>, index: E::ScalarField) -> Self {
        Self {
            params,
            commitment,
            index,
        }
    }

    /// Transcript for a fresh random challenge.
    pub fn fake<R: RngCore + CryptoRng + ?Sized>(
        &self,
        rng: &mut R,
    ) -> (Announcement<E>, E::ScalarField, Response<E::ScalarField>) {
        let c = scalar::random(rng);
        let (a, r) = self.fake_with_challenge(&c, rng);
        (a, c, r)
    }

    /// Transcript that verifies under the given `challenge`.
    pub fn fake_with_challenge<R: RngCore + CryptoRng + ?Sized>(
        &self,
        challenge: &E::ScalarField,
        rng: &mut R,
    ) -> (Announcement<E>, Response<E::ScalarField>) {
        let witness = self.params.context().identity_a();
        let response = Response {
            u1: scalar::random(rng),
            u2: scalar::random(rng),
        };
        let (b1, b2, b3) = bases(self.params, &self.commitment, &self.index, &witness);
        let lhs = Gt::pow3(&b1, &response.u1, &b2, &response.u2, &b3, challenge);
        (Announcement { witness, lhs }, response)
    }
}
