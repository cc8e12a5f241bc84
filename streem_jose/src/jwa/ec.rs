//! ECC JSON Web Algorithm implementations

use std::{convert::TryFrom, fmt, sync::Arc};

use aliri_base64::Base64Url;
use ring::signature::{EcdsaKeyPair, EcdsaSigningAlgorithm};
use serde::{Deserialize, Serialize};

use crate::{error, jwa, jws};

/// A named ECC curve
#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[non_exhaustive]
pub enum Curve {
    /// The P-256 curve (prime256v1/secp256r1)
    #[serde(rename = "P-256")]
    P256,
}

impl Curve {
    /// Size in bytes of a coordinate or private scalar on this curve
    pub const fn field_size(self) -> usize {
        match self {
            Self::P256 => 32,
        }
    }
}

/// Elliptic curve cryptography signing algorithms
///
/// This list may be expanded in the future.
#[derive(Clone, Copy, Debug, Hash, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
#[non_exhaustive]
pub enum SigningAlgorithm {
    /// Elliptic curve cryptography using the P-256 curve and SHA-256
    ES256,
}

impl SigningAlgorithm {
    fn signing_algorithm(self) -> &'static EcdsaSigningAlgorithm {
        match self {
            Self::ES256 => &ring::signature::ECDSA_P256_SHA256_FIXED_SIGNING,
        }
    }

    /// Size in bytes of an ECDSA signature
    pub fn signature_size(self) -> usize {
        match self {
            Self::ES256 => 64,
        }
    }
}

impl From<SigningAlgorithm> for jwa::Algorithm {
    fn from(alg: SigningAlgorithm) -> Self {
        Self::EllipticCurve(alg)
    }
}

impl TryFrom<jwa::Algorithm> for SigningAlgorithm {
    type Error = error::IncompatibleAlgorithm;

    fn try_from(alg: jwa::Algorithm) -> Result<Self, Self::Error> {
        match alg {
            jwa::Algorithm::EllipticCurve(alg) => Ok(alg),

            #[allow(unreachable_patterns)]
            _ => Err(error::incompatible_algorithm(alg)),
        }
    }
}

impl From<SigningAlgorithm> for Curve {
    fn from(alg: SigningAlgorithm) -> Self {
        match alg {
            SigningAlgorithm::ES256 => Self::P256,
        }
    }
}

impl From<Curve> for SigningAlgorithm {
    fn from(crv: Curve) -> Self {
        match crv {
            Curve::P256 => Self::ES256,
        }
    }
}

impl fmt::Display for SigningAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let s = match self {
            Self::ES256 => "ES256",
        };

        f.write_str(s)
    }
}

/// ECC public key parameters
#[derive(Debug, Clone, Eq, PartialEq)]
#[must_use]
pub struct PublicKey {
    curve: Curve,
    x: Base64Url,
    y: Base64Url,
}

impl PublicKey {
    /// The curve the key lies on
    pub fn curve(&self) -> Curve {
        self.curve
    }

    /// The x coordinate of the public point
    pub fn x(&self) -> &Base64Url {
        &self.x
    }

    /// The y coordinate of the public point
    pub fn y(&self) -> &Base64Url {
        &self.y
    }

    /// The public point in uncompressed SEC1 form (`0x04 || x || y`)
    #[must_use]
    pub fn to_uncompressed_point(&self) -> Vec<u8> {
        let mut point = Vec::with_capacity(1 + self.x.as_slice().len() + self.y.as_slice().len());
        point.push(0x04);
        point.extend_from_slice(self.x.as_slice());
        point.extend_from_slice(self.y.as_slice());
        point
    }

    fn from_parts(curve: Curve, x: Base64Url, y: Base64Url) -> Result<Self, error::KeyRejected> {
        let size = curve.field_size();
        if x.as_slice().len() != size || y.as_slice().len() != size {
            return Err(error::key_rejected(format!(
                "coordinates for {:?} must be {} bytes",
                curve, size
            )));
        }

        Ok(Self { curve, x, y })
    }
}

/// ECC private key parameters
///
/// The key pair is validated when it is constructed: the private scalar
/// must correspond to the public point.
#[derive(Clone)]
#[must_use]
pub struct PrivateKey {
    public_key: PublicKey,
    d: Base64Url,
    ring_cache: Arc<EcdsaKeyPair>,
}

impl PartialEq for PrivateKey {
    fn eq(&self, other: &Self) -> bool {
        self.public_key == other.public_key && self.d == other.d
    }
}

impl Eq for PrivateKey {}

impl PrivateKey {
    fn from_parts(public_key: PublicKey, d: Base64Url) -> Result<Self, error::KeyRejected> {
        if d.as_slice().len() != public_key.curve.field_size() {
            return Err(error::key_rejected(format!(
                "private scalar for {:?} must be {} bytes",
                public_key.curve,
                public_key.curve.field_size()
            )));
        }

        let ring_cache = Arc::new(
            EcdsaKeyPair::from_private_key_and_public_key(
                SigningAlgorithm::from(public_key.curve).signing_algorithm(),
                d.as_slice(),
                &public_key.to_uncompressed_point(),
                &ring::rand::SystemRandom::new(),
            )
            .map_err(|e| error::key_rejected(e.to_string()))?,
        );

        Ok(Self {
            public_key,
            d,
            ring_cache,
        })
    }

    /// Provides access to the public key parameters
    pub fn public_key(&self) -> &PublicKey {
        &self.public_key
    }
}

impl jws::Signer for PrivateKey {
    type Algorithm = SigningAlgorithm;
    type Error = error::SigningError;

    fn can_sign(&self, alg: Self::Algorithm) -> bool {
        self.public_key.curve == Curve::from(alg)
    }

    fn sign(&self, alg: Self::Algorithm, data: &[u8]) -> Result<Vec<u8>, Self::Error> {
        if !self.can_sign(alg) {
            return Err(error::incompatible_algorithm(alg).into());
        }

        let signature = self
            .ring_cache
            .sign(&ring::rand::SystemRandom::new(), data)
            .map_err(|e| error::unexpected(e.to_string()))?;

        Ok(signature.as_ref().to_owned())
    }
}

impl fmt::Debug for PrivateKey {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("PrivateKey")
            .field("public_key", &self.public_key)
            .field("private_key", &"<redacted>")
            .finish()
    }
}

/// Elliptic curve cryptography key
#[derive(Debug, Clone, Eq, PartialEq, Deserialize)]
#[serde(try_from = "EllipticCurveDto")]
pub struct EllipticCurve {
    key: MaybePrivate,
}

#[derive(Debug, Clone, Eq, PartialEq)]
enum MaybePrivate {
    PublicAndPrivate(PrivateKey),
    PublicOnly(PublicKey),
}

impl EllipticCurve {
    /// The private key, if present
    pub fn private_key(&self) -> Option<&PrivateKey> {
        match &self.key {
            MaybePrivate::PublicAndPrivate(p) => Some(p),
            MaybePrivate::PublicOnly(_) => None,
        }
    }

    /// The public key parameters
    pub fn public_key(&self) -> &PublicKey {
        match &self.key {
            MaybePrivate::PublicAndPrivate(p) => p.public_key(),
            MaybePrivate::PublicOnly(p) => p,
        }
    }
}

impl jws::Signer for EllipticCurve {
    type Algorithm = SigningAlgorithm;
    type Error = error::SigningError;

    fn can_sign(&self, alg: Self::Algorithm) -> bool {
        if let Some(p) = self.private_key() {
            p.can_sign(alg)
        } else {
            false
        }
    }

    fn sign(&self, alg: Self::Algorithm, data: &[u8]) -> Result<Vec<u8>, Self::Error> {
        if let Some(p) = self.private_key() {
            Ok(p.sign(alg, data)?)
        } else {
            Err(error::missing_private_key().into())
        }
    }
}

impl From<PublicKey> for EllipticCurve {
    fn from(key: PublicKey) -> Self {
        Self {
            key: MaybePrivate::PublicOnly(key),
        }
    }
}

impl From<PrivateKey> for EllipticCurve {
    fn from(key: PrivateKey) -> Self {
        Self {
            key: MaybePrivate::PublicAndPrivate(key),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
struct EllipticCurveDto {
    #[serde(rename = "crv")]
    curve: Curve,
    x: Base64Url,
    y: Base64Url,
    #[serde(default)]
    d: Option<Base64Url>,
}

impl TryFrom<EllipticCurveDto> for EllipticCurve {
    type Error = error::KeyRejected;

    fn try_from(dto: EllipticCurveDto) -> Result<Self, Self::Error> {
        let public_key = PublicKey::from_parts(dto.curve, dto.x, dto.y)?;

        match dto.d {
            Some(d) => Ok(Self::from(PrivateKey::from_parts(public_key, d)?)),
            None => Ok(Self::from(public_key)),
        }
    }
}
