//! Implementations of the JSON Web Algorithms (JWA) standard
//!
//! The specifications for these algorithms can be found in [RFC7518][].
//! Only the elliptic curve signing algorithms needed to mint tokens are
//! provided.
//!
//! [RFC7518]: https://tools.ietf.org/html/rfc7518

use std::fmt;

use serde::{Deserialize, Serialize};

pub mod ec;

#[doc(inline)]
pub use ec::EllipticCurve;

/// JSON Web Signature signing algorithms
///
/// This list may be expanded in the future.
#[derive(Debug, Clone, Copy, Eq, Hash, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
#[non_exhaustive]
pub enum Algorithm {
    /// Elliptic curve cryptography
    EllipticCurve(ec::SigningAlgorithm),
}

impl Algorithm {
    /// The ES256 signing algorithm
    pub const ES256: Algorithm = Self::EllipticCurve(ec::SigningAlgorithm::ES256);

    /// The expected output size of the algorithm's signature in bytes
    pub fn signature_size(self) -> usize {
        match self {
            Self::EllipticCurve(alg) => alg.signature_size(),
        }
    }

    /// The usage required of a key used with this algorithm
    pub fn to_usage(self) -> Usage {
        match self {
            Self::EllipticCurve(_) => Usage::Signing,
        }
    }
}

impl fmt::Display for Algorithm {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Self::EllipticCurve(a) => fmt::Display::fmt(a, f),
        }
    }
}

/// The intended use for a JWK
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[must_use]
pub enum Usage {
    /// The key is intended signing and verification
    #[serde(rename = "sig")]
    Signing,

    /// The key is intended for encryption
    #[serde(rename = "enc")]
    Encryption,
}
