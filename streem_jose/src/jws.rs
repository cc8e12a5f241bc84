//! Implementations of the JSON Web Signature (JWS) standard
//!
//! The specifications for this standard can be found in [RFC7515][].
//! Only the compact serialization is produced:
//!
//! ```text
//! BASE64URL(header) '.' BASE64URL(payload) '.' BASE64URL(signature)
//! ```
//!
//! The header names the signing algorithm and, when the key has one, the
//! key ID. The public key itself is never embedded in the header.
//!
//! [RFC7515]: https://tools.ietf.org/html/rfc7515

use std::{fmt, fmt::Write};

use aliri_base64::Base64Url;
use aliri_braid::braid;
use serde::{Deserialize, Serialize};

use crate::{error, jwa, jwk, Jwk};

/// A JWS signer
pub trait Signer {
    /// The usable signature algorithms
    type Algorithm;

    /// The error returned on failure to sign
    type Error: fmt::Debug + fmt::Display + Sync + Send + 'static;

    /// Whether the specific algorithm provided is compatible
    /// with this signer
    fn can_sign(&self, alg: Self::Algorithm) -> bool;

    /// Attempts to sign the data provided using the specified algorithm
    fn sign(&self, alg: Self::Algorithm, data: &[u8]) -> Result<Vec<u8>, Self::Error>;
}

/// The protected header of a compact JWS
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
#[must_use]
pub struct Header {
    alg: jwa::Algorithm,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    kid: Option<jwk::KeyId>,
}

impl Header {
    /// Constructs a header, to be signed by the specified algorithm
    pub const fn new(alg: jwa::Algorithm) -> Self {
        Self { alg, kid: None }
    }

    /// Constructs a header, with a specific signing algorithm and key ID
    pub fn with_key_id(alg: jwa::Algorithm, kid: impl Into<jwk::KeyId>) -> Self {
        Self {
            alg,
            kid: Some(kid.into()),
        }
    }

    /// The signing algorithm
    #[must_use]
    pub fn alg(&self) -> jwa::Algorithm {
        self.alg
    }

    /// The ID of the key used to sign
    #[must_use]
    pub fn kid(&self) -> Option<&jwk::KeyIdRef> {
        self.kid.as_deref()
    }
}

/// A compact-serialized JSON Web Signature
///
/// This type provides custom implementations of [`Display`][JwsRef#impl-Display] and
/// [`Debug`][JwsRef#impl-Debug] to prevent unintentional disclosures of the token.
/// See the documentation on those trait implementations on the [`JwsRef`] type for more
/// information.
#[braid(
    serde,
    debug = "owned",
    display = "owned",
    ord = "omit",
    ref_doc = "\
    A borrowed reference to a compact JSON Web Signature ([`Jws`])\n\
    \n\
    This type provides custom implementations of [`Display`][Self#impl-Display] and \
    [`Debug`][Self#impl-Debug] to prevent unintentional disclosures of the token. \
    See the documentation on those trait implementations for more information.
    "
)]
#[must_use]
pub struct Jws;

impl Jws {
    /// Signs `payload` and produces the compact serialization
    ///
    /// The header is serialized as a JSON blob; the payload bytes are
    /// used verbatim.
    ///
    /// # Errors
    ///
    /// * If serialization of the header fails
    /// * If the key cannot produce a signature with the header's algorithm
    pub fn try_from_parts_with_signature<S>(
        header: &Header,
        payload: &[u8],
        key: &S,
    ) -> Result<Self, error::JwsSigningError>
    where
        S: Signer<Algorithm = jwa::Algorithm>,
        error::SigningError: From<S::Error>,
    {
        let h_raw =
            Base64Url::from_raw(serde_json::to_vec(header).map_err(error::malformed_jws_header)?);
        let p_raw = Base64Url::from_raw(payload);

        let expected_len = h_raw.encoded_len()
            + p_raw.encoded_len()
            + Base64Url::calc_encoded_len(header.alg().signature_size())
            + 2;

        let mut message = String::with_capacity(expected_len);
        write!(message, "{}.{}", h_raw, p_raw).map_err(error::malformed_jws_header)?;

        let signature = key
            .sign(header.alg(), message.as_bytes())
            .map_err(error::SigningError::from)?;
        let s = Base64Url::from_raw(signature);

        write!(message, ".{}", s).map_err(error::malformed_jws_header)?;

        debug_assert_eq!(message.len(), expected_len);

        Ok(Self::new(message))
    }
}

impl JwsRef {
    /// Splits the token into its header, payload, and signature segments
    ///
    /// The segments are returned still base64url encoded. Returns `None` if
    /// the token does not have exactly three segments.
    #[must_use]
    pub fn segments(&self) -> Option<(&str, &str, &str)> {
        let mut parts = self.0.split('.');
        match (parts.next(), parts.next(), parts.next(), parts.next()) {
            (Some(h), Some(p), Some(s), None) => Some((h, p, s)),
            _ => None,
        }
    }
}

/// By default, this type holds potentially sensitive information. To prevent
/// unintentional disclosure of this value, this type will not print out its
/// contents without explicitly specifying the alternate debug format,
/// i.e. `{:#?}`. When specified in this form, it will print out the entire header
/// and payload, but will omit the token's signature. To change the number of
/// characters in the signature that should be printed, specify the amount as a
/// width in the format string, i.e. `{:#25?}`.
///
/// # Example
///
/// ```
/// # use streem_jose::jws::JwsRef;
/// #
/// let token = JwsRef::from_str("eyJhbGciOiJFUzI1NiJ9.e30.c2lnbmF0dXJl");
///
/// assert_eq!(format!("{:?}", token), "***JWS***");
/// assert_eq!(format!("{:#?}", token), "\"eyJhbGciOiJFUzI1NiJ9.e30.…\"");
/// assert_eq!(format!("{:#5?}", token), "\"eyJhbGciOiJFUzI1NiJ9.e30.c2ln…\"");
/// ```
impl fmt::Debug for JwsRef {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        if f.alternate() {
            f.write_str("\"")?;
            if let Some(last_period) = self.0.rfind('.') {
                f.write_str(&self.0[..=last_period])?;
                limited_reveal(&self.0[last_period + 1..], &mut *f, 0)?;
            } else {
                limited_reveal(&self.0, &mut *f, 0)?;
            }
            f.write_str("\"")
        } else {
            f.write_str(concat!("***", "JWS", "***"))
        }
    }
}

/// By default, this type holds potentially sensitive information. To prevent
/// unintentional disclosure of this value, this type will not print out its
/// contents without explicitly specifying the alternate format,
/// i.e. `{:#}`. When specified in this form, it will print out the entire token by default.
/// To elide some of the characters in the signature, specify the quantity as a width
/// in the format string, i.e. `{:#10}`.
///
/// # Example
///
/// ```
/// # use streem_jose::jws::JwsRef;
/// #
/// let token = JwsRef::from_str("eyJhbGciOiJFUzI1NiJ9.e30.c2lnbmF0dXJl");
///
/// assert_eq!(format!("{}", token), "***JWS***");
/// assert_eq!(format!("{:#}", token), "eyJhbGciOiJFUzI1NiJ9.e30.c2lnbmF0dXJl");
/// assert_eq!(format!("{:#5}", token), "eyJhbGciOiJFUzI1NiJ9.e30.c2ln…");
/// ```
impl fmt::Display for JwsRef {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        if f.alternate() {
            if let Some(last_period) = self.0.rfind('.') {
                f.write_str(&self.0[..=last_period])?;
                limited_reveal(&self.0[last_period + 1..], &mut *f, usize::MAX)
            } else {
                limited_reveal(&self.0, &mut *f, usize::MAX)
            }
        } else {
            f.write_str(concat!("***", "JWS", "***"))
        }
    }
}

fn limited_reveal(unprotected: &str, f: &mut fmt::Formatter, default_len: usize) -> fmt::Result {
    let max_len = f.width().unwrap_or(default_len);
    if max_len <= 1 {
        f.write_str("…")
    } else if max_len > unprotected.len() {
        f.write_str(unprotected)
    } else {
        match unprotected.char_indices().nth(max_len - 2) {
            Some((idx, c)) if idx + c.len_utf8() < unprotected.len() => {
                f.write_str(&unprotected[0..idx + c.len_utf8()])?;
                f.write_str("…")
            }
            _ => f.write_str(unprotected),
        }
    }
}

/// A key bound to the algorithm it will sign with
///
/// Construction checks up front that the key can actually sign with the
/// algorithm, so that a mismatch is reported before any payload is
/// prepared. The header carries the key's ID, if it has one, and never
/// embeds the key itself.
#[derive(Clone, Debug)]
pub struct JwsSigner {
    header: Header,
    key: Jwk,
}

impl JwsSigner {
    /// Binds `key` to `alg`
    ///
    /// # Errors
    ///
    /// Returns an error if the key has no private component, is restricted
    /// to another usage or algorithm, or is not compatible with `alg`.
    pub fn new(key: Jwk, alg: jwa::Algorithm) -> Result<Self, error::SignerRejected> {
        key.check_signing(alg)?;

        let header = match key.key_id() {
            Some(kid) => Header::with_key_id(alg, kid.to_owned()),
            None => Header::new(alg),
        };

        Ok(Self { header, key })
    }

    /// The header that will be attached to every signature
    pub fn header(&self) -> &Header {
        &self.header
    }

    /// The signing key
    pub fn key(&self) -> &Jwk {
        &self.key
    }

    /// Signs `payload`, producing a compact JWS
    ///
    /// # Errors
    ///
    /// Returns an error if the header cannot be serialized or the signature
    /// cannot be produced.
    pub fn sign(&self, payload: &[u8]) -> Result<Jws, error::JwsSigningError> {
        let jws = Jws::try_from_parts_with_signature(&self.header, payload, &self.key)?;

        #[cfg(feature = "tracing")]
        tracing::debug!(
            alg = %self.header.alg(),
            kid = ?self.header.kid(),
            payload_len = payload.len(),
            "signed compact JWS"
        );

        Ok(jws)
    }
}
