//! Windowed fixed-base multi-exponentiation
//!
//! The powers `g^{α^0}, …, g^{α^t}` are split into windows of `w` consecutive
//! powers. Window `k` stores the product of every subset of its powers,
//! indexed by the bitmask of the subset:
//!
//! ```text
//! table[k][0]           = 1
//! table[k][2^i + j]     = table[k][j] · g^{α^{k·w + i}}     (0 ≤ j < 2^i)
//! ```
//!
//! A commitment `∏ (g^{α^i})^{c_i}` then costs one squaring per coefficient
//! bit plus one table lookup per window per bit: walking bits from the most
//! significant down, the `w` coefficients of window `k` contribute the bucket
//! whose index has bit `i` set iff bit `b` of `c_{k·w + i}` is set.

#![forbid(unsafe_code)]

use ark_ec::Group;
use ark_ff::{BigInteger, PrimeField};
use tracing::debug;

/// Window width actually used for `t + 1` powers.
///
/// Shrinks `width` by one when the last window would hold exactly
/// `width - 1` powers, so the trailing table is not nearly empty.
pub fn effective_window_width(t: usize, width: usize) -> usize {
    if width > 1 && t % width == width - 1 {
        width - 1
    } else {
        width
    }
}

/// Per-window subset-product tables over a fixed list of bases.
#[derive(Clone, Debug)]
pub struct WindowTable<G> {
    width: usize,
    windows: Vec<Vec<G>>,
}

impl<G: Group> WindowTable<G> {
    /// Build tables over `bases` (`bases.len() = t + 1`) with window `width`.
    pub fn build(bases: &[G], width: usize) -> Self {
        assert!(width >= 1, "window width must be positive");
        assert!(!bases.is_empty(), "window table needs at least one base");

        let windows: Vec<Vec<G>> = bases
            .chunks(width)
            .map(|chunk| {
                let mut table = Vec::with_capacity(1 << chunk.len());
                table.push(G::zero());
                for base in chunk {
                    let filled = table.len();
                    for j in 0..filled {
                        let next = table[j] + base;
                        table.push(next);
                    }
                }
                table
            })
            .collect();

        debug!(
            bases = bases.len(),
            width,
            windows = windows.len(),
            "window tables built"
        );
        Self { width, windows }
    }

    /// Window width.
    #[inline]
    pub fn width(&self) -> usize {
        self.width
    }

    /// Number of windows.
    #[inline]
    pub fn num_windows(&self) -> usize {
        self.windows.len()
    }

    /// Number of bases covered.
    pub fn len(&self) -> usize {
        self.windows
            .iter()
            .map(|w| w.len().trailing_zeros() as usize)
            .sum()
    }

    /// `true` if the table covers no bases.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Subset product at `bucket` of window `k`.
    #[inline]
    pub fn bucket(&self, k: usize, bucket: usize) -> &G {
        &self.windows[k][bucket]
    }

    /// `∏ base_i^{exps_i}` for `exps.len() <= self.len()`.
    pub fn multi_exp(&self, exps: &[G::ScalarField]) -> G {
        assert!(
            exps.len() <= self.len(),
            "{} exponents exceed the {} precomputed bases",
            exps.len(),
            self.len()
        );

        let exps: Vec<_> = exps.iter().map(|e| e.into_bigint()).collect();
        let bits = exps.iter().map(|e| e.num_bits()).max().unwrap_or(0) as usize;

        let mut acc = G::zero();
        for bit in (0..bits).rev() {
            acc.double_in_place();
            for (k, chunk) in exps.chunks(self.width).enumerate() {
                let mut idx = 0usize;
                for (i, e) in chunk.iter().enumerate() {
                    if e.get_bit(bit) {
                        idx |= 1 << i;
                    }
                }
                if idx != 0 {
                    acc += self.windows[k][idx];
                }
            }
        }
        acc
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ark_bn254::{Fr, G1Projective};
    use ark_std::UniformRand;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn width_adjustment() {
        assert_eq!(effective_window_width(10, 12), 12);
        assert_eq!(effective_window_width(11, 12), 11);
        assert_eq!(effective_window_width(23, 12), 11);
        assert_eq!(effective_window_width(24, 12), 12);
        assert_eq!(effective_window_width(5, 1), 1);
    }

    #[test]
    fn table_shape() {
        let mut rng = StdRng::seed_from_u64(21);
        let bases: Vec<G1Projective> = (0..6).map(|_| G1Projective::rand(&mut rng)).collect();
        let t = WindowTable::build(&bases, 4);
        assert_eq!(t.num_windows(), 2);
        assert_eq!(t.len(), 6);
        assert_eq!(*t.bucket(0, 0), G1Projective::default());
        assert_eq!(*t.bucket(0, 0b1010), bases[1] + bases[3]);
        assert_eq!(*t.bucket(1, 0b11), bases[4] + bases[5]);
    }

    #[test]
    fn multi_exp_matches_naive() {
        let mut rng = StdRng::seed_from_u64(22);
        let bases: Vec<G1Projective> = (0..13).map(|_| G1Projective::rand(&mut rng)).collect();
        let exps: Vec<Fr> = (0..13).map(|_| Fr::rand(&mut rng)).collect();
        let naive: G1Projective = bases.iter().zip(&exps).map(|(b, e)| *b * *e).sum();
        for width in [1, 3, 5, 12] {
            let table = WindowTable::build(&bases, width);
            assert_eq!(table.multi_exp(&exps), naive);
            // fewer exponents than bases
            let short: G1Projective = bases.iter().zip(&exps[..4]).map(|(b, e)| *b * *e).sum();
            assert_eq!(table.multi_exp(&exps[..4]), short);
        }
        let table = WindowTable::build(&bases, 4);
        assert_eq!(table.multi_exp(&[]), G1Projective::default());
    }
}
