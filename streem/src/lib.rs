//! Streem single sign-on tokens
//!
//! This crate mints the signed tokens that let an application sign its users
//! in to Streem. A token is an ES256 compact JSON Web Signature whose payload
//! asserts who the user is (ID, name, email, avatar), when the token and the
//! session it starts expire, and, optionally, which reservation it belongs to.
//!
//! Tokens are signed with the elliptic curve key carried in the API key
//! secret. The token header references that key by its SHA-256 thumbprint;
//! the key itself is never embedded.
//!
//! # Example
//!
//! ```
//! use std::{sync::Arc, time::Duration};
//!
//! use streem::{Config, TokenBuilder};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let secret = concat!(
//!     "eyJrdHkiOiJFQyIsImQiOiI1cTJCTE5CTG8wR2tCdjJhbHZjaU9VQjh2M0tCQWZUYU02VVd4TDllN3lBIiwidXNlIjoic2lnIiwi",
//!     "Y3J2IjoiUC0yNTYiLCJ4IjoiblpEVHNZVlpKVGtsTnBpU19SaVYxdkVGaEZLVVgtVHpNWUxfVjhuSXpSdyIsInkiOiJFeXRLSW1K",
//!     "eEtkQlctVHpWZjBhNmhxTEpJV0R6cHdfTnBkTHZhd1VNOVBRIiwiYWxnIjoiRVMyNTYifQ",
//! );
//! let config = Arc::new(Config::new("api_1mY3yMnSp4DUa97vnSgrOW", secret, "prod-us")?);
//!
//! let mut builder = TokenBuilder::new().with_config(config);
//! let future = builder.future_timestamp();
//!
//! builder
//!     .set_user_id("someId")
//!     .set_name("T Rex")
//!     .set_token_expiration_ms(future.after(Duration::from_secs(30 * 60)));
//!
//! let token = builder.build()?;
//!
//! // Tokens are redacted unless the alternate flag is used
//! assert_eq!(format!("{}", token), "***JWS***");
//! assert_eq!(format!("{:#}", token).split('.').count(), 3);
//! # Ok(())
//! # }
//! ```
//!
//! Applications with a single API key can instead install it once with
//! [`init`] and obtain builders from [`new_token_builder`].

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

pub mod claims;
pub mod config;
mod error;
pub mod signer;
pub mod token_builder;

#[doc(inline)]
pub use claims::Claims;
#[doc(inline)]
pub use config::{init, Config};
#[doc(inline)]
pub use error::Error;
#[doc(inline)]
pub use streem_clock::{FutureTimestamp, UnixTimeMillis};
#[doc(inline)]
pub use streem_jose::{Jws, JwsRef};
#[doc(inline)]
pub use token_builder::{TokenBuilder, TokenFields};

/// Constructs a token builder backed by the process-wide configuration
#[must_use]
pub fn new_token_builder() -> TokenBuilder {
    TokenBuilder::new()
}
