//! Commitment parameters (the structured reference string)
//!
//! `CommitmentParams` holds the powers `g^{α^i}` (`0 ≤ i ≤ t`) in source
//! group A, the powers `ĝ^{α^j}` (`0 ≤ j ≤ t̂`) in source group B, the pair
//! `(h, h^α)`, and the derived window tables. The trapdoor `α` only exists
//! inside [`CommitmentParams::create`] and is zeroized before it returns.
//!
//! ## Wire format
//!
//! All integers are big-endian; group elements are uncompressed and
//! fixed-length for the curve.
//!
//! ```text
//! u16 len ‖ pairing parameter string (len bytes)
//! u32 t   ‖ g^{α^0} … g^{α^t} ‖ h ‖ h^α
//! u32 t̂   ‖ ĝ^{α^0} … ĝ^{α^t̂}
//! ```
//!
//! Precomputation tables are never serialized; they are rebuilt on load
//! according to the caller's [`SetupOptions`].

#![forbid(unsafe_code)]

use std::io::{Read, Write};

use ark_std::rand::{CryptoRng, Rng, RngCore};
use num_bigint::BigUint;
use tracing::{debug, info, instrument};
use zeroize::Zeroize;

use crate::error::{Error, Result};
use crate::group::{Element, GroupKind, SourceA, SourceB, G1, G2, Gt};
use crate::pairing::{Curve, ElementKind, PairingContext};
use crate::poly;
use crate::precomp::{effective_window_width, WindowTable};
use crate::scalar;
use crate::DEFAULT_WINDOW_WIDTH;

/// Largest accepted window width; each window table holds `2^width` elements.
pub const MAX_WINDOW_WIDTH: usize = 20;

/// Knobs for building or loading parameters.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SetupOptions {
    /// Requested window width for the commitment tables (before adjustment),
    /// at most [`MAX_WINDOW_WIDTH`].
    pub window_width: usize,
    /// Also build the Lagrange-basis commitments `g^{λ_i(α)}`.
    pub lagrange: bool,
    /// Number `t̂` of non-trivial powers of `α` published in group B.
    ///
    /// Evaluation proofs need `t̂ ≥ 1`; a degree-bound proof for degree `d`
    /// needs `t̂ ≥ t - d`.
    pub g2_powers: usize,
}

impl Default for SetupOptions {
    fn default() -> Self {
        Self {
            window_width: DEFAULT_WINDOW_WIDTH,
            lagrange: false,
            g2_powers: 1,
        }
    }
}

impl SetupOptions {
    fn validate(&self) -> Result<()> {
        if self.window_width == 0 || self.window_width > MAX_WINDOW_WIDTH {
            return Err(Error::InvalidParameter(format!(
                "window width {} is outside 1..={}",
                self.window_width, MAX_WINDOW_WIDTH
            )));
        }
        if self.g2_powers == 0 {
            return Err(Error::InvalidParameter(
                "at least one power of alpha is needed in group B".into(),
            ));
        }
        Ok(())
    }
}

/// Public parameters for committing to polynomials of degree `≤ t`.
pub struct CommitmentParams<E: Curve> {
    ctx: PairingContext<E>,
    t: usize,
    galphai: Vec<G1<E>>,
    ghatalphai: Vec<G2<E>>,
    glambdai: Vec<G1<E>>,
    h: G1<E>,
    halpha: G1<E>,
    /// `e(g, ĝ)`, reused by every evaluation check.
    gt_base: Gt<E>,
    order: BigUint,
    window_width: usize,
    precomp: WindowTable<E::G1>,
    lambda_precomp: Option<WindowTable<E::G1>>,
}

impl<E: Curve> std::fmt::Debug for CommitmentParams<E> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CommitmentParams")
            .field("curve", &E::NAME)
            .field("t", &self.t)
            .field("t_hat", &self.t_hat())
            .field("window_width", &self.window_width)
            .field("lagrange", &self.has_lagrange())
            .finish()
    }
}

fn random_non_identity<E: Curve, K, R>(ctx: &PairingContext<E>, rng: &mut R) -> Element<E, K>
where
    K: GroupKind<E>,
    R: Rng + ?Sized,
{
    loop {
        let el = ctx.random::<K, R>(rng);
        if !el.is_identity() {
            return el;
        }
    }
}

impl<E: Curve> CommitmentParams<E> {
    /// Run a fresh trusted setup for degree `t`.
    #[instrument(level = "info", skip_all, fields(t = t, curve = E::NAME))]
    pub fn create<R: RngCore + CryptoRng + ?Sized>(
        ctx: PairingContext<E>,
        t: usize,
        opts: SetupOptions,
        rng: &mut R,
    ) -> Result<Self> {
        opts.validate()?;

        let g: G1<E> = random_non_identity(&ctx, rng);
        let h: G1<E> = random_non_identity(&ctx, rng);
        let ghat: G2<E> = random_non_identity(&ctx, rng);
        let mut alpha: E::ScalarField = scalar::random_nonzero(rng);

        let galphai = powers_of(&g, &alpha, t);
        let ghatalphai = powers_of(&ghat, &alpha, opts.g2_powers);
        let halpha = h.pow(&alpha);
        alpha.zeroize();

        info!(t, t_hat = opts.g2_powers, "trusted setup finished");
        Self::assemble(ctx, galphai, h, halpha, ghatalphai, opts)
    }

    fn assemble(
        ctx: PairingContext<E>,
        galphai: Vec<G1<E>>,
        h: G1<E>,
        halpha: G1<E>,
        ghatalphai: Vec<G2<E>>,
        opts: SetupOptions,
    ) -> Result<Self> {
        opts.validate()?;
        let t = galphai.len() - 1;
        let order = ctx.order();
        let window_width = effective_window_width(t, opts.window_width);

        let bases: Vec<E::G1> = galphai.iter().map(|p| *p.inner()).collect();
        let precomp = WindowTable::build(&bases, window_width);
        let gt_base = ctx.pair(&galphai[0], &ghatalphai[0]);

        let mut params = Self {
            ctx,
            t,
            galphai,
            ghatalphai,
            glambdai: Vec::new(),
            h,
            halpha,
            gt_base,
            order,
            window_width,
            precomp,
            lambda_precomp: None,
        };

        if opts.lagrange {
            let glambdai: Vec<G1<E>> = poly::lagrange_basis::<E::ScalarField>(t + 1)
                .iter()
                .map(|lambda| params.commit_coefficients(&lambda.coeffs))
                .collect();
            let bases: Vec<E::G1> = glambdai.iter().map(|p| *p.inner()).collect();
            params.lambda_precomp = Some(WindowTable::build(&bases, window_width));
            params.glambdai = glambdai;
            debug!(t, "lagrange basis committed");
        }
        Ok(params)
    }

    // ------------------------- Serialization -------------------------

    /// Write the parameters in the wire format.
    pub fn write<W: Write>(&self, mut w: W) -> Result<()> {
        write_srs(
            &mut w,
            self.ctx.params(),
            &self.galphai,
            &self.h,
            &self.halpha,
            &self.ghatalphai,
        )
    }

    /// Encode the parameters to a byte vector.
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut out = Vec::new();
        // Writing into a Vec cannot fail.
        let _ = self.write(&mut out);
        out
    }

    /// Read parameters from a stream; see [`Self::from_bytes`].
    pub fn read<Rd: Read>(mut r: Rd, opts: SetupOptions) -> Result<Self> {
        let mut buf = Vec::new();
        r.read_to_end(&mut buf)?;
        Self::from_bytes(&buf, opts)
    }

    /// Decode parameters, binding them to a fresh pairing context.
    ///
    /// `opts.g2_powers` is ignored; `t̂` comes from the data. Any length
    /// mismatch, including trailing bytes, is [`Error::CorruptData`].
    #[instrument(level = "info", skip_all, fields(len = bytes.len()))]
    pub fn from_bytes(bytes: &[u8], opts: SetupOptions) -> Result<Self> {
        let mut cur = Cursor::new(bytes);

        let len = u16::from_be_bytes(cur.array()?) as usize;
        let params = std::str::from_utf8(cur.take(len)?)
            .map_err(|_| Error::CorruptData("pairing parameters are not UTF-8".into()))?;
        let ctx = PairingContext::<E>::from_params(params)?;

        let a_size = ctx.element_size(ElementKind::SourceA, false);
        let b_size = ctx.element_size(ElementKind::SourceB, false);

        let t = u32::from_be_bytes(cur.array()?) as usize;
        let need = t
            .checked_add(3)
            .and_then(|n| n.checked_mul(a_size))
            .ok_or_else(|| Error::CorruptData(format!("degree {} is out of range", t)))?;
        if cur.remaining() < need {
            return Err(Error::CorruptData(format!(
                "degree {} needs {} bytes of A elements, {} remain",
                t,
                need,
                cur.remaining()
            )));
        }
        let mut galphai = Vec::with_capacity(t + 1);
        for _ in 0..=t {
            galphai.push(ctx.decode::<SourceA>(cur.take(a_size)?, false)?);
        }
        let h = ctx.decode::<SourceA>(cur.take(a_size)?, false)?;
        let halpha = ctx.decode::<SourceA>(cur.take(a_size)?, false)?;

        let t_hat = u32::from_be_bytes(cur.array()?) as usize;
        if t_hat == 0 {
            return Err(Error::CorruptData("no powers of alpha in group B".into()));
        }
        let expected = t_hat
            .checked_add(1)
            .and_then(|n| n.checked_mul(b_size))
            .ok_or_else(|| Error::CorruptData(format!("t_hat {} is out of range", t_hat)))?;
        if cur.remaining() != expected {
            return Err(Error::CorruptData(format!(
                "expected {} bytes of B elements, found {}",
                expected,
                cur.remaining()
            )));
        }
        let mut ghatalphai = Vec::with_capacity(t_hat + 1);
        for _ in 0..=t_hat {
            ghatalphai.push(ctx.decode::<SourceB>(cur.take(b_size)?, false)?);
        }

        debug!(t, t_hat, "parameters decoded");
        Self::assemble(
            ctx,
            galphai,
            h,
            halpha,
            ghatalphai,
            SetupOptions {
                g2_powers: t_hat,
                ..opts
            },
        )
    }

    // ------------------------- Accessors -------------------------

    /// Pairing context every element of these parameters is bound to.
    pub fn context(&self) -> &PairingContext<E> {
        &self.ctx
    }

    /// Maximum committed degree.
    pub fn t(&self) -> usize {
        self.t
    }

    /// Number of non-trivial powers of `α` in group B.
    pub fn t_hat(&self) -> usize {
        self.ghatalphai.len() - 1
    }

    /// `g^{α^i}`.
    pub fn galphai(&self, i: usize) -> &G1<E> {
        &self.galphai[i]
    }

    /// All powers `g^{α^0} … g^{α^t}`.
    pub fn powers_a(&self) -> &[G1<E>] {
        &self.galphai
    }

    /// `ĝ^{α^i}`.
    pub fn ghatalphai(&self, i: usize) -> &G2<E> {
        &self.ghatalphai[i]
    }

    /// `g^{λ_i(α)}`, present only when built with Lagrange support.
    pub fn glambdai(&self, i: usize) -> Option<&G1<E>> {
        self.glambdai.get(i)
    }

    /// `h`.
    pub fn h(&self) -> &G1<E> {
        &self.h
    }

    /// `h^α`.
    pub fn halpha(&self) -> &G1<E> {
        &self.halpha
    }

    /// `e(g, ĝ)`.
    pub fn gt_base(&self) -> &Gt<E> {
        &self.gt_base
    }

    /// Group order `r`.
    pub fn order(&self) -> &BigUint {
        &self.order
    }

    /// Window width after adjustment.
    pub fn window_width(&self) -> usize {
        self.window_width
    }

    /// Whether Lagrange commitments were built.
    pub fn has_lagrange(&self) -> bool {
        self.lambda_precomp.is_some()
    }

    /// Window tables over the monomial powers.
    pub fn precomp(&self) -> &WindowTable<E::G1> {
        &self.precomp
    }

    /// `ĝ^α / ĝ^i`, the B-side key for opening at `i`.
    pub fn shifted_alpha_b(&self, i: &E::ScalarField) -> G2<E> {
        self.ghatalphai[1].divide(&self.ghatalphai[0].pow(i))
    }

    // ------------------------- Commit kernels -------------------------

    /// `∏ (g^{α^i})^{c_i}` via the window tables.
    pub(crate) fn commit_coefficients(&self, coeffs: &[E::ScalarField]) -> G1<E> {
        self.ctx.wrap(self.precomp.multi_exp(coeffs))
    }

    /// `∏ (g^{α^i})^{c_i}` one exponentiation at a time.
    pub(crate) fn commit_coefficients_naive(&self, coeffs: &[E::ScalarField]) -> G1<E> {
        coeffs
            .iter()
            .zip(&self.galphai)
            .fold(self.ctx.identity::<SourceA>(), |acc, (c, p)| acc * p.pow(c))
    }

    /// `∏ (g^{λ_i(α)})^{v_i}` one exponentiation at a time, if built.
    pub(crate) fn commit_values_naive(&self, values: &[E::ScalarField]) -> Option<G1<E>> {
        if !self.has_lagrange() {
            return None;
        }
        Some(
            values
                .iter()
                .zip(&self.glambdai)
                .fold(self.ctx.identity::<SourceA>(), |acc, (v, p)| acc * p.pow(v)),
        )
    }

    /// `∏ (g^{λ_i(α)})^{v_i}` via the Lagrange tables, if built.
    pub(crate) fn commit_values(&self, values: &[E::ScalarField]) -> Option<G1<E>> {
        self.lambda_precomp
            .as_ref()
            .map(|table| self.ctx.wrap(table.multi_exp(values)))
    }
}

fn powers_of<E: Curve, K: GroupKind<E>>(
    base: &Element<E, K>,
    alpha: &E::ScalarField,
    n: usize,
) -> Vec<Element<E, K>> {
    let mut out = Vec::with_capacity(n + 1);
    let mut acc = *base;
    out.push(acc);
    for _ in 0..n {
        acc = acc.pow(alpha);
        out.push(acc);
    }
    out
}

fn write_srs<E: Curve, W: Write>(
    w: &mut W,
    params: &str,
    galphai: &[G1<E>],
    h: &G1<E>,
    halpha: &G1<E>,
    ghatalphai: &[G2<E>],
) -> Result<()> {
    let len = u16::try_from(params.len())
        .map_err(|_| Error::InvalidParameter("pairing parameter string too long".into()))?;
    w.write_all(&len.to_be_bytes())?;
    w.write_all(params.as_bytes())?;
    w.write_all(&count_u32(galphai.len() - 1)?.to_be_bytes())?;
    for p in galphai {
        w.write_all(&p.to_bytes(false))?;
    }
    w.write_all(&h.to_bytes(false))?;
    w.write_all(&halpha.to_bytes(false))?;
    w.write_all(&count_u32(ghatalphai.len() - 1)?.to_be_bytes())?;
    for p in ghatalphai {
        w.write_all(&p.to_bytes(false))?;
    }
    Ok(())
}

fn count_u32(n: usize) -> Result<u32> {
    u32::try_from(n).map_err(|_| Error::InvalidParameter(format!("count {} exceeds u32", n)))
}

/// Generate a fresh SRS for degree `t` straight to `w`, without building
/// precomputation tables.
#[instrument(level = "info", skip_all, fields(t = t, g2_powers = g2_powers, curve = E::NAME))]
pub fn write_fresh_srs<E: Curve, W: Write, R: RngCore + CryptoRng + ?Sized>(
    w: &mut W,
    t: usize,
    g2_powers: usize,
    rng: &mut R,
) -> Result<()> {
    if g2_powers == 0 {
        return Err(Error::InvalidParameter(
            "at least one power of alpha is needed in group B".into(),
        ));
    }
    let ctx = PairingContext::<E>::new();
    let g: G1<E> = random_non_identity(&ctx, rng);
    let h: G1<E> = random_non_identity(&ctx, rng);
    let ghat: G2<E> = random_non_identity(&ctx, rng);
    let mut alpha: E::ScalarField = scalar::random_nonzero(rng);

    let galphai = powers_of(&g, &alpha, t);
    let ghatalphai = powers_of(&ghat, &alpha, g2_powers);
    let halpha = h.pow(&alpha);
    alpha.zeroize();

    write_srs(w, ctx.params(), &galphai, &h, &halpha, &ghatalphai)
}

/// Bounds-checked reader over a byte slice.
struct Cursor<'a> {
    buf: &'a [u8],
    pos: usize,
}

impl<'a> Cursor<'a> {
    fn new(buf: &'a [u8]) -> Self {
        Self { buf, pos: 0 }
    }

    fn remaining(&self) -> usize {
        self.buf.len() - self.pos
    }

    fn take(&mut self, n: usize) -> Result<&'a [u8]> {
        if self.remaining() < n {
            return Err(Error::CorruptData(format!(
                "unexpected end of data: wanted {} bytes at offset {}, {} remain",
                n,
                self.pos,
                self.remaining()
            )));
        }
        let out = &self.buf[self.pos..self.pos + n];
        self.pos += n;
        Ok(out)
    }

    fn array<const N: usize>(&mut self) -> Result<[u8; N]> {
        let mut out = [0u8; N];
        out.copy_from_slice(self.take(N)?);
        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ark_bn254::{Bn254, Fr};
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn params(t: usize, opts: SetupOptions) -> CommitmentParams<Bn254> {
        let mut rng = StdRng::seed_from_u64(31);
        CommitmentParams::create(PairingContext::new(), t, opts, &mut rng).unwrap()
    }

    #[test]
    fn powers_are_consistent() {
        let p = params(4, SetupOptions::default());
        let ctx = p.context();
        assert_eq!(p.t(), 4);
        assert_eq!(p.t_hat(), 1);
        // e(g^{α^{i+1}}, ĝ) == e(g^{α^i}, ĝ^α)
        for i in 0..4 {
            assert_eq!(
                ctx.pair(p.galphai(i + 1), p.ghatalphai(0)),
                ctx.pair(p.galphai(i), p.ghatalphai(1))
            );
        }
        assert_eq!(
            ctx.pair(p.halpha(), p.ghatalphai(0)),
            ctx.pair(p.h(), p.ghatalphai(1))
        );
        assert_eq!(p.order(), &scalar::group_order::<Fr>());
    }

    #[test]
    fn window_width_is_adjusted() {
        let p = params(
            11,
            SetupOptions {
                window_width: 12,
                ..Default::default()
            },
        );
        assert_eq!(p.window_width(), 11);
        assert_eq!(p.precomp().num_windows(), 2);
    }

    #[test]
    fn lagrange_commitments_match_interpolation() {
        let p = params(
            3,
            SetupOptions {
                lagrange: true,
                ..Default::default()
            },
        );
        for i in 0..4 {
            let mut v = vec![Fr::from(0u64); 4];
            v[i] = Fr::from(1u64);
            let lambda = poly::interpolate_on_indices(&v, 4);
            assert_eq!(
                p.glambdai(i).copied(),
                Some(p.commit_coefficients_naive(&lambda.coeffs))
            );
        }
    }

    #[test]
    fn serialization_roundtrip() {
        let p = params(
            5,
            SetupOptions {
                g2_powers: 3,
                ..Default::default()
            },
        );
        let bytes = p.to_bytes();
        let q = CommitmentParams::<Bn254>::from_bytes(&bytes, SetupOptions::default()).unwrap();
        assert_eq!(q.t(), 5);
        assert_eq!(q.t_hat(), 3);
        assert_eq!(q.to_bytes(), bytes);
        assert_ne!(q.context().id(), p.context().id());
    }

    #[test]
    fn truncated_or_padded_data_is_corrupt() {
        let bytes = params(2, SetupOptions::default()).to_bytes();
        for cut in [1, 10, bytes.len() / 2, bytes.len() - 1] {
            assert!(matches!(
                CommitmentParams::<Bn254>::from_bytes(&bytes[..cut], SetupOptions::default()),
                Err(Error::CorruptData(_))
            ));
        }
        let mut padded = bytes.clone();
        padded.push(0);
        assert!(matches!(
            CommitmentParams::<Bn254>::from_bytes(&padded, SetupOptions::default()),
            Err(Error::CorruptData(_))
        ));
    }

    #[test]
    fn wrong_curve_is_undefined_pairing() {
        let bytes = params(2, SetupOptions::default()).to_bytes();
        assert!(matches!(
            CommitmentParams::<ark_bls12_381::Bls12_381>::from_bytes(&bytes, SetupOptions::default()),
            Err(Error::UndefinedPairing(_))
        ));
    }

    #[test]
    fn fresh_srs_loads() {
        let mut rng = StdRng::seed_from_u64(32);
        let mut out = Vec::new();
        write_fresh_srs::<Bn254, _, _>(&mut out, 6, 2, &mut rng).unwrap();
        let p = CommitmentParams::<Bn254>::from_bytes(&out, SetupOptions::default()).unwrap();
        assert_eq!((p.t(), p.t_hat()), (6, 2));
    }

    #[test]
    fn setup_runs_on_os_randomness() {
        // create() and write_fresh_srs() only accept CryptoRng sources
        let p = CommitmentParams::<Bn254>::create(
            PairingContext::new(),
            2,
            SetupOptions::default(),
            &mut rand::rngs::OsRng,
        )
        .unwrap();
        assert_eq!(
            p.context().pair(p.galphai(1), p.ghatalphai(0)),
            p.context().pair(p.galphai(0), p.ghatalphai(1))
        );
        let mut out = Vec::new();
        write_fresh_srs::<Bn254, _, _>(&mut out, 2, 1, &mut rand::rngs::OsRng).unwrap();
        assert_eq!(out.len(), p.to_bytes().len());
    }

    #[test]
    fn out_of_range_width_is_rejected() {
        let mut rng = StdRng::seed_from_u64(33);
        for window_width in [0, MAX_WINDOW_WIDTH + 1, 64] {
            let res = CommitmentParams::<Bn254>::create(
                PairingContext::new(),
                70,
                SetupOptions {
                    window_width,
                    ..Default::default()
                },
                &mut rng,
            );
            assert!(matches!(res, Err(Error::InvalidParameter(_))), "width {}", window_width);
        }

        // loading applies the same bound
        let bytes = params(2, SetupOptions::default()).to_bytes();
        let res = CommitmentParams::<Bn254>::from_bytes(
            &bytes,
            SetupOptions {
                window_width: 64,
                ..Default::default()
            },
        );
        assert!(matches!(res, Err(Error::InvalidParameter(_))));
    }
}
