//! The subset of the Javascript/JSON Object Signing and Encryption (JOSE)
//! standards needed to mint signed tokens:
//!
//! * JSON Web Signature (JWS) compact serialization: [RFC7515][]
//! * JSON Web Key (JWK) parsing of elliptic curve keys: [RFC7517][]
//! * JSON Web Algorithms (JWA), limited to `ES256`: [RFC7518][]
//! * JWK thumbprints: [RFC7638][]
//!
//! Token verification is not provided. The cryptographic primitives
//! themselves (ECDSA over P-256, SHA-256, and randomness) come from [`ring`].
//!
//! [RFC7515]: https://tools.ietf.org/html/rfc7515
//! [RFC7517]: https://tools.ietf.org/html/rfc7517
//! [RFC7518]: https://tools.ietf.org/html/rfc7518
//! [RFC7638]: https://tools.ietf.org/html/rfc7638
//!
//! # Example
//!
//! ```
//! use streem_jose::{jwa, jws::JwsSigner, Jwk};
//!
//! let key: Jwk = serde_json::from_str(r#"{
//!     "kty": "EC",
//!     "crv": "P-256",
//!     "d": "5q2BLNBLo0GkBv2alvciOUB8v3KBAfTaM6UWxL9e7yA",
//!     "x": "nZDTsYVZJTklNpiS_RiV1vEFhFKUX-TzMYL_V8nIzRw",
//!     "y": "EytKImJxKdBW-TzVf0a6hqLJIWDzpw_NpdLvawUM9PQ"
//! }"#).unwrap();
//!
//! let key = key.with_thumbprint_key_id().unwrap();
//! assert_eq!(
//!     key.key_id().unwrap().as_str(),
//!     "yy_Mkoz_yRZ23cfJK8ul7ahqeQvAyWJNvaBrKFr0hTk",
//! );
//!
//! let signer = JwsSigner::new(key, jwa::Algorithm::ES256).unwrap();
//! let token = signer.sign(br#"{"sub":"someone"}"#).unwrap();
//!
//! assert_eq!(token.as_str().split('.').count(), 3);
//! ```

#![cfg_attr(docsrs, feature(doc_cfg))]
#![warn(
    missing_docs,
    unused_import_braces,
    unused_imports,
    unused_qualifications
)]
#![deny(
    missing_debug_implementations,
    missing_copy_implementations,
    trivial_casts,
    trivial_numeric_casts,
    unsafe_code,
    unused_must_use
)]

pub mod error;
pub mod jwa;
pub mod jwk;
pub mod jws;

#[cfg(test)]
pub(crate) mod test;

#[doc(inline)]
pub use jwk::Jwk;
#[doc(inline)]
pub use jws::{Jws, JwsRef, JwsSigner};
