//! Scalar helpers
//!
//! Scalars are plain arkworks prime-field elements, so arithmetic is always
//! reduced modulo the group order and there is no "order not set" state.

#![forbid(unsafe_code)]

use ark_ff::{BigInteger, PrimeField, Zero};
use ark_serialize::{CanonicalDeserialize, CanonicalSerialize};
use ark_std::rand::Rng;
use ark_std::UniformRand;
use num_bigint::BigUint;

use crate::error::{Error, Result};

/// Group order `r`, derived as `(0 - 1) + 1` over the integers.
pub fn group_order<F: PrimeField>() -> BigUint {
    let minus_one = -F::one();
    BigUint::from_bytes_le(&minus_one.into_bigint().to_bytes_le()) + 1u32
}

/// Uniform scalar.
pub fn random<F: PrimeField, R: Rng + ?Sized>(rng: &mut R) -> F {
    F::rand(rng)
}

/// Uniform non-zero scalar.
pub fn random_nonzero<F: PrimeField, R: Rng + ?Sized>(rng: &mut R) -> F {
    loop {
        let x = F::rand(rng);
        if !x.is_zero() {
            return x;
        }
    }
}

/// Uniform scalar below `2^bits` (`bits <= 64`).
pub fn random_bits<F: PrimeField, R: Rng + ?Sized>(rng: &mut R, bits: u32) -> F {
    assert!(bits <= 64, "random_bits supports at most 64 bits");
    let mask = if bits == 64 { u64::MAX } else { (1u64 << bits) - 1 };
    F::from(rng.gen::<u64>() & mask)
}

/// Canonical little-endian encoding, fixed length.
pub fn to_bytes<F: PrimeField>(x: &F) -> Vec<u8> {
    let mut out = Vec::with_capacity(x.compressed_size());
    // Writing into a Vec cannot fail.
    let _ = x.serialize_compressed(&mut out);
    out
}

/// Inverse of [`to_bytes`]; rejects wrong lengths and non-canonical values.
pub fn from_bytes<F: PrimeField>(bytes: &[u8]) -> Result<F> {
    let expected = F::zero().compressed_size();
    if bytes.len() != expected {
        return Err(Error::CorruptData(format!(
            "scalar encoding is {} bytes, expected {}",
            bytes.len(),
            expected
        )));
    }
    Ok(F::deserialize_compressed(bytes)?)
}

/// Interpret a big-endian byte string as an integer and reduce it.
pub fn from_be_bytes_mod_order<F: PrimeField>(bytes: &[u8]) -> F {
    F::from_be_bytes_mod_order(bytes)
}

/// Reduce a hash digest into the field.
pub fn from_digest<F: PrimeField>(digest: &[u8; 32]) -> F {
    F::from_le_bytes_mod_order(digest)
}

/// Integer value of `x` in `[0, r)`.
pub fn to_biguint<F: PrimeField>(x: &F) -> BigUint {
    BigUint::from_bytes_le(&x.into_bigint().to_bytes_le())
}

#[cfg(test)]
mod tests {
    use super::*;
    use ark_bn254::Fr;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn derived_order_matches_modulus() {
        let r = group_order::<Fr>();
        let modulus = BigUint::from_bytes_le(&Fr::MODULUS.to_bytes_le());
        assert_eq!(r, modulus);
        assert_eq!(to_biguint(&(-Fr::from(1u64))) + 1u32, r);
    }

    #[test]
    fn encoding_is_canonical() {
        let mut rng = StdRng::seed_from_u64(11);
        let x: Fr = random(&mut rng);
        let bytes = to_bytes(&x);
        assert_eq!(bytes.len(), 32);
        assert_eq!(from_bytes::<Fr>(&bytes).unwrap(), x);

        // r itself is not a canonical encoding
        let r = Fr::MODULUS.to_bytes_le();
        assert!(from_bytes::<Fr>(&r).is_err());
        assert!(from_bytes::<Fr>(&bytes[..31]).is_err());
    }

    #[test]
    fn short_randomness_is_bounded() {
        let mut rng = StdRng::seed_from_u64(12);
        let bound = BigUint::from(1u64 << 20);
        for _ in 0..64 {
            let x: Fr = random_bits(&mut rng, 20);
            assert!(to_biguint(&x) < bound);
        }
    }

    #[test]
    fn big_endian_reduction() {
        assert_eq!(from_be_bytes_mod_order::<Fr>(&[1, 0]), Fr::from(256u64));
    }
}
