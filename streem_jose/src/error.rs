//! Common errors

#![allow(missing_copy_implementations)]

use std::error::Error as StdError;

use thiserror::Error;

/// The JWK cannot be used with the requested algorithm
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Error)]
#[error("key incompatible with algorithm '{alg}'")]
pub struct IncompatibleAlgorithm {
    alg: crate::jwa::Algorithm,
}

#[inline]
pub(crate) fn incompatible_algorithm(
    alg: impl Into<crate::jwa::Algorithm>,
) -> IncompatibleAlgorithm {
    IncompatibleAlgorithm { alg: alg.into() }
}

/// The JWK has a specific usage that disallows this use
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Error)]
#[error("JWK cannot be used in this way")]
pub struct JwkUsageMismatch {
    _p: (),
}

pub(crate) const fn jwk_usage_mismatch() -> JwkUsageMismatch {
    JwkUsageMismatch { _p: () }
}

/// Missing private key
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Error)]
#[error("cannot sign without a private key")]
pub struct MissingPrivateKey {
    _p: (),
}

pub(crate) const fn missing_private_key() -> MissingPrivateKey {
    MissingPrivateKey { _p: () }
}

/// The key was rejected
#[derive(Debug, Error)]
#[error("key rejected")]
pub struct KeyRejected {
    #[from]
    source: Box<dyn StdError + Send + Sync + 'static>,
}

pub(crate) fn key_rejected(
    source: impl Into<Box<dyn StdError + Send + Sync + 'static>>,
) -> KeyRejected {
    KeyRejected {
        source: source.into(),
    }
}

/// The JWS header could not be serialized
#[derive(Debug, Error)]
#[error("malformed JWS header")]
pub struct MalformedJwsHeader {
    #[from]
    source: Box<dyn StdError + Send + Sync + 'static>,
}

pub(crate) fn malformed_jws_header(
    source: impl Into<Box<dyn StdError + Send + Sync + 'static>>,
) -> MalformedJwsHeader {
    MalformedJwsHeader {
        source: source.into(),
    }
}

/// Unexpected error (possibly a bug)
#[derive(Debug, Error)]
#[error("unexpected error")]
pub struct Unexpected {
    #[from]
    source: Box<dyn StdError + Send + Sync + 'static>,
}

pub(crate) fn unexpected(
    source: impl Into<Box<dyn StdError + Send + Sync + 'static>>,
) -> Unexpected {
    Unexpected {
        source: source.into(),
    }
}

/// A key could not be bound to a signing algorithm
#[derive(Debug, Error)]
pub enum SignerRejected {
    /// The key has no private component
    #[error(transparent)]
    MissingPrivateKey(#[from] MissingPrivateKey),

    /// The key is restricted to a usage other than signing
    #[error(transparent)]
    JwkUsageMismatch(#[from] JwkUsageMismatch),

    /// The key cannot be used with the requested algorithm
    #[error(transparent)]
    IncompatibleAlgorithm(#[from] IncompatibleAlgorithm),
}

impl SignerRejected {
    /// Whether the error is due to a missing private key
    #[must_use]
    pub fn is_missing_private_key(&self) -> bool {
        matches!(self, Self::MissingPrivateKey(_))
    }

    /// Whether the error is due to a usage mismatch
    #[must_use]
    pub fn is_usage_mismatch(&self) -> bool {
        matches!(self, Self::JwkUsageMismatch(_))
    }

    /// Whether the error is due to an incompatible algorithm
    #[must_use]
    pub fn is_incompatible_alg(&self) -> bool {
        matches!(self, Self::IncompatibleAlgorithm(_))
    }
}

/// An error occurring while creating a signature
#[derive(Debug, Error)]
pub enum SigningError {
    /// The key cannot be used for signing operations
    #[error(transparent)]
    MissingPrivateKey(#[from] MissingPrivateKey),

    /// JWK cannot be used for signature creation
    #[error(transparent)]
    JwkUsageMismatch(#[from] JwkUsageMismatch),

    /// Algorithm be used with this algorithm
    #[error(transparent)]
    IncompatibleAlgorithm(#[from] IncompatibleAlgorithm),

    /// An unexpected error
    #[error(transparent)]
    Unexpected(#[from] Unexpected),
}

impl From<SignerRejected> for SigningError {
    fn from(err: SignerRejected) -> Self {
        match err {
            SignerRejected::MissingPrivateKey(e) => Self::MissingPrivateKey(e),
            SignerRejected::JwkUsageMismatch(e) => Self::JwkUsageMismatch(e),
            SignerRejected::IncompatibleAlgorithm(e) => Self::IncompatibleAlgorithm(e),
        }
    }
}

/// An error occurring while producing a compact JWS
#[derive(Debug, Error)]
pub enum JwsSigningError {
    /// The signature could not be produced
    #[error(transparent)]
    SigningError(#[from] SigningError),

    /// The JWS header was malformed and could not be serialized
    #[error(transparent)]
    MalformedJwsHeader(#[from] MalformedJwsHeader),
}
