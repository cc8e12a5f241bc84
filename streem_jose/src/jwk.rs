//! Implementations of the JSON Web Keys (JWK) standard
//!
//! The specifications for JSON Web Keys can be found in [RFC7517][], and
//! for JWK thumbprints in [RFC7638][].
//!
//! [RFC7517]: https://tools.ietf.org/html/rfc7517
//! [RFC7638]: https://tools.ietf.org/html/rfc7638

use std::convert::{TryFrom, TryInto};

use aliri_base64::Base64Url;
use aliri_braid::braid;
use serde::{Deserialize, Serialize};

use crate::{error, jwa, jws::Signer};

/// An identifier for a JWK
#[braid(serde, ref_doc = "A borrowed reference to JWK identifier ([`KeyId`])")]
pub struct KeyId;

/// An identified JSON Web Key
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(try_from = "JwkDto")]
#[must_use]
pub struct Jwk {
    key_id: Option<KeyId>,
    usage: Option<jwa::Usage>,
    algorithm: Option<jwa::Algorithm>,
    key: Key,
}

impl Jwk {
    /// The key ID
    #[must_use]
    pub fn key_id(&self) -> Option<&KeyIdRef> {
        self.key_id.as_deref()
    }

    /// The intended usage of the key
    #[must_use]
    pub fn usage(&self) -> Option<jwa::Usage> {
        self.usage
    }

    /// The algorithm to be used with this JWK
    #[must_use]
    pub fn algorithm(&self) -> Option<jwa::Algorithm> {
        self.algorithm
    }

    /// Whether the key is compatible with the given algorithm
    #[must_use]
    pub fn is_compatible(&self, alg: jwa::Algorithm) -> bool {
        self.key.is_compatible(alg)
    }

    /// The public key parameters
    pub fn public_key(&self) -> &jwa::ec::PublicKey {
        match &self.key {
            Key::EllipticCurve(k) => k.public_key(),
        }
    }

    /// The private key parameters, if present
    #[must_use]
    pub fn private_key(&self) -> Option<&jwa::ec::PrivateKey> {
        match &self.key {
            Key::EllipticCurve(k) => k.private_key(),
        }
    }

    /// Sets the key ID
    pub fn with_key_id(self, kid: KeyId) -> Self {
        Self {
            key_id: Some(kid),
            ..self
        }
    }

    /// Computes the SHA-256 thumbprint of the key
    ///
    /// Only the required public members of the key take part, serialized as
    /// JSON with members in lexicographic order and no whitespace. The key
    /// ID, usage, algorithm, and any private components never affect the
    /// thumbprint.
    ///
    /// # Errors
    ///
    /// Returns an error if the canonical form cannot be serialized.
    pub fn thumbprint(&self) -> Result<Base64Url, error::Unexpected> {
        let canonical = match &self.key {
            Key::EllipticCurve(k) => {
                let public = k.public_key();
                serde_json::to_vec(&EcThumbprintInput {
                    crv: public.curve(),
                    kty: "EC",
                    x: public.x(),
                    y: public.y(),
                })
                .map_err(error::unexpected)?
            }
        };

        let digest = ring::digest::digest(&ring::digest::SHA256, &canonical);

        Ok(Base64Url::from_raw(digest.as_ref()))
    }

    /// Uses the key's thumbprint as its key ID
    ///
    /// # Errors
    ///
    /// Returns an error if the thumbprint cannot be computed.
    pub fn with_thumbprint_key_id(self) -> Result<Self, error::Unexpected> {
        let kid = KeyId::new(self.thumbprint()?.to_string());
        Ok(self.with_key_id(kid))
    }

    /// Checks that this key may be used to sign with the given algorithm
    ///
    /// # Errors
    ///
    /// Returns an error if the key is restricted to another usage or
    /// algorithm, lies on a curve that the algorithm does not use, or has
    /// no private component.
    pub fn check_signing(&self, alg: jwa::Algorithm) -> Result<(), error::SignerRejected> {
        if alg.to_usage() != jwa::Usage::Signing {
            return Err(error::jwk_usage_mismatch().into());
        }

        if let Some(u) = self.usage {
            if u != jwa::Usage::Signing {
                return Err(error::jwk_usage_mismatch().into());
            }
        }

        match self.algorithm {
            Some(key_alg) if key_alg == alg => {}
            Some(_) => {
                return Err(error::incompatible_algorithm(alg).into());
            }
            None => {}
        }

        if !self.key.is_compatible(alg) {
            return Err(error::incompatible_algorithm(alg).into());
        }

        if !self.key.can_sign(alg) {
            return Err(error::missing_private_key().into());
        }

        Ok(())
    }
}

impl Signer for Jwk {
    type Algorithm = jwa::Algorithm;
    type Error = error::SigningError;

    fn can_sign(&self, alg: Self::Algorithm) -> bool {
        self.check_signing(alg).is_ok()
    }

    fn sign(&self, alg: Self::Algorithm, data: &[u8]) -> Result<Vec<u8>, Self::Error> {
        self.check_signing(alg)?;

        self.key.sign(alg, data)
    }
}

#[derive(Serialize)]
struct EcThumbprintInput<'a> {
    crv: jwa::ec::Curve,
    kty: &'static str,
    x: &'a Base64Url,
    y: &'a Base64Url,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
struct JwkDto {
    #[serde(rename = "kid", default)]
    key_id: Option<KeyId>,

    #[serde(rename = "use", default)]
    usage: Option<jwa::Usage>,

    #[serde(rename = "alg", default)]
    algorithm: Option<jwa::Algorithm>,

    #[serde(flatten)]
    key: Key,
}

impl TryFrom<JwkDto> for Jwk {
    type Error = error::IncompatibleAlgorithm;

    fn try_from(dto: JwkDto) -> Result<Self, Self::Error> {
        if let Some(alg) = &dto.algorithm {
            if !dto.key.is_compatible(*alg) {
                return Err(error::incompatible_algorithm(*alg));
            }
        }

        Ok(Self {
            key_id: dto.key_id,
            usage: dto.usage,
            algorithm: dto.algorithm,
            key: dto.key,
        })
    }
}

/// A JSON Web Key
#[derive(Debug, Clone, Eq, PartialEq, Deserialize)]
#[serde(tag = "kty")]
enum Key {
    /// Elliptic curve cryptography
    #[serde(rename = "EC")]
    EllipticCurve(jwa::EllipticCurve),
}

impl Key {
    fn is_compatible(&self, alg: jwa::Algorithm) -> bool {
        match self {
            Self::EllipticCurve(k) => match jwa::ec::SigningAlgorithm::try_from(alg) {
                Ok(alg) => k.public_key().curve() == jwa::ec::Curve::from(alg),
                Err(_) => false,
            },
        }
    }
}

impl Signer for Key {
    type Algorithm = jwa::Algorithm;
    type Error = error::SigningError;

    fn can_sign(&self, alg: Self::Algorithm) -> bool {
        match self {
            Self::EllipticCurve(p) => {
                if let Ok(alg) = alg.try_into() {
                    p.can_sign(alg)
                } else {
                    false
                }
            }
        }
    }

    fn sign(&self, alg: Self::Algorithm, data: &[u8]) -> Result<Vec<u8>, Self::Error> {
        let signature = match self {
            Self::EllipticCurve(p) => p.sign(alg.try_into()?, data)?,
        };

        #[cfg(feature = "tracing")]
        tracing::trace!(%alg, len = signature.len(), "produced signature");

        Ok(signature)
    }
}
