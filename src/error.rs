//! Error taxonomy
//!
//! Construction and misuse failures surface as [`Error`]. A failed
//! cryptographic check is *not* an error: verification routines return a
//! plain `bool` and callers branch on it.

#![forbid(unsafe_code)]

use thiserror::Error;

/// Errors raised by parameter construction, (de)serialization and protocol misuse.
#[derive(Debug, Error)]
pub enum Error {
    /// An element was used before being bound to a pairing context.
    #[error("element is not defined")]
    UndefinedElement,
    /// The pairing parameters do not describe a curve this backend provides.
    #[error("pairing is not defined: {0}")]
    UndefinedPairing(String),
    /// A serialized buffer had the wrong length or an invalid encoding.
    #[error("corrupt data: {0}")]
    CorruptData(String),
    /// A symmetric-only pairing was requested on an asymmetric curve.
    #[error("pairing is not symmetric")]
    NonsymmetricPairing,
    /// Two elements bound to different pairing contexts were combined.
    #[error("elements belong to different pairing contexts")]
    ContextMismatch,
    /// Polynomial degree exceeds what the parameters support.
    #[error("degree {degree} exceeds the supported maximum {max}")]
    DegreeExceeded {
        /// Offending degree.
        degree: usize,
        /// Largest supported degree.
        max: usize,
    },
    /// Value vector is longer than the parameters support.
    #[error("vector length {len} exceeds the supported maximum {max}")]
    LengthExceeded {
        /// Offending length.
        len: usize,
        /// Largest supported length.
        max: usize,
    },
    /// Setup options are out of range (zero window width, no `B` powers, …).
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),
    /// A proof-of-knowledge call was made out of its defined order.
    #[error("protocol sequence violation: {0}")]
    ProtocolSequence(&'static str),
    /// Underlying byte stream failure.
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Crate-wide result alias.
pub type Result<T> = std::result::Result<T, Error>;

impl From<ark_serialize::SerializationError> for Error {
    fn from(err: ark_serialize::SerializationError) -> Self {
        Error::CorruptData(err.to_string())
    }
}
