//! Errors produced while configuring the SDK or building a token

use std::error::Error as StdError;

use streem_jose::error::{JwsSigningError, MalformedJwsHeader, SigningError};
use thiserror::Error;

/// An error produced by the Streem SDK
///
/// No partial token is ever returned alongside an error.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum Error {
    /// The SDK was initialized without an API key ID
    #[error("cannot initialize Streem without an API key ID")]
    MissingApiKeyId,

    /// A token was built before any configuration was supplied
    #[error("Streem has not been initialized")]
    NotInitialized,

    /// A token was built without a user ID
    #[error("a user ID is required to build a token")]
    EmptyUserId,

    /// The API key secret is not unpadded standard base64
    #[error("unable to decode API key secret")]
    SecretDecode(#[source] base64::DecodeError),

    /// The decoded API key secret is not a usable JSON Web Key
    #[error("unable to parse key from API key secret")]
    KeyParse(#[source] Box<dyn StdError + Send + Sync + 'static>),

    /// The key cannot be bound to the signing algorithm
    #[error("unable to create signer")]
    SignerConstruction(#[source] Box<dyn StdError + Send + Sync + 'static>),

    /// The claims could not be encoded as JSON
    #[error("unable to serialize claims")]
    Serialization(#[source] serde_json::Error),

    /// The signature could not be produced
    #[error("unable to sign token")]
    Signing(#[source] SigningError),

    /// The compact serialization could not be produced
    #[error("unable to serialize signed token")]
    CompactSerialization(#[source] MalformedJwsHeader),
}

impl Error {
    /// Whether the error is due to a missing API key ID
    #[must_use]
    pub fn is_missing_api_key_id(&self) -> bool {
        matches!(self, Self::MissingApiKeyId)
    }

    /// Whether the error is due to the SDK not being initialized
    #[must_use]
    pub fn is_not_initialized(&self) -> bool {
        matches!(self, Self::NotInitialized)
    }

    /// Whether the error is due to a missing user ID
    #[must_use]
    pub fn is_empty_user_id(&self) -> bool {
        matches!(self, Self::EmptyUserId)
    }

    /// Whether the error is due to a malformed API key secret
    ///
    /// This covers both secrets that are not valid base64 and secrets that
    /// do not contain a valid key.
    #[must_use]
    pub fn is_invalid_secret(&self) -> bool {
        matches!(self, Self::SecretDecode(_) | Self::KeyParse(_))
    }

    /// Whether the error is due to a key that cannot sign tokens
    #[must_use]
    pub fn is_signer_construction(&self) -> bool {
        matches!(self, Self::SignerConstruction(_))
    }
}

impl From<JwsSigningError> for Error {
    fn from(err: JwsSigningError) -> Self {
        match err {
            JwsSigningError::SigningError(e) => Self::Signing(e),
            JwsSigningError::MalformedJwsHeader(e) => Self::CompactSerialization(e),
        }
    }
}
