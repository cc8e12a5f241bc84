//! Signing keys derived from the API key secret

use base64::{engine::general_purpose::STANDARD_NO_PAD, Engine as _};
use streem_jose::{jwa, Jwk, JwsSigner};

use crate::{config::ApiKeySecretRef, Config, Error};

/// Derives the signing key held in an API key secret
///
/// The secret is decoded from standard base64 without padding and parsed as
/// a JSON Web Key. Line breaks in the secret are ignored. The key ID is
/// replaced with the key's SHA-256 thumbprint, so the same secret always
/// yields the same key ID.
///
/// A key that names an algorithm other than `ES256`, or a usage other than
/// `sig`, is refused.
///
/// # Errors
///
/// * [`Error::SecretDecode`] if the secret is not valid base64
/// * [`Error::KeyParse`] if the decoded secret is not a valid P-256 key
pub fn derive_signing_key(secret: &ApiKeySecretRef) -> Result<Jwk, Error> {
    let encoded: Vec<u8> = secret
        .as_str()
        .bytes()
        .filter(|&b| !matches!(b, b'\r' | b'\n'))
        .collect();

    let raw = STANDARD_NO_PAD
        .decode(&encoded)
        .map_err(Error::SecretDecode)?;

    let key: Jwk = serde_json::from_slice(&raw).map_err(|e| Error::KeyParse(e.into()))?;
    let key = key
        .with_thumbprint_key_id()
        .map_err(|e| Error::KeyParse(e.into()))?;

    #[cfg(feature = "tracing")]
    tracing::trace!(kid = ?key.key_id(), "derived signing key");

    Ok(key)
}

/// Builds an ES256 signer from the configured API key secret
///
/// The key is derived anew on every call.
///
/// # Errors
///
/// Returns any error from [`derive_signing_key`], or
/// [`Error::SignerConstruction`] if the key cannot sign with ES256.
pub fn new_signer(config: &Config) -> Result<JwsSigner, Error> {
    let key = derive_signing_key(config.api_key_secret())?;
    JwsSigner::new(key, jwa::Algorithm::ES256).map_err(|e| Error::SignerConstruction(e.into()))
}

#[cfg(test)]
mod tests {
    use base64::engine::general_purpose::STANDARD;
    use color_eyre::Result;

    use super::*;
    use crate::config::ApiKeySecret;

    const SECRET: &str =
        "eyJrdHkiOiJFQyIsImQiOiI1cTJCTE5CTG8wR2tCdjJhbHZjaU9VQjh2M0tCQWZUYU02VVd4TDllN3lBIiwidXNlIjoic2lnIiwiY3J2IjoiUC0yNTYiLCJ4IjoiblpEVHNZVlpKVGtsTnBpU19SaVYxdkVGaEZLVVgtVHpNWUxfVjhuSXpSdyIsInkiOiJFeXRLSW1KeEtkQlctVHpWZjBhNmhxTEpJV0R6cHdfTnBkTHZhd1VNOVBRIiwiYWxnIjoiRVMyNTYifQ";

    const THUMBPRINT: &str = "yy_Mkoz_yRZ23cfJK8ul7ahqeQvAyWJNvaBrKFr0hTk";

    fn secret_from_json(json: &str) -> ApiKeySecret {
        ApiKeySecret::new(STANDARD_NO_PAD.encode(json))
    }

    #[test]
    fn key_id_is_the_thumbprint() -> Result<()> {
        let key = derive_signing_key(ApiKeySecretRef::from_str(SECRET))?;
        assert_eq!(key.key_id().map(|k| k.as_str()), Some(THUMBPRINT));
        Ok(())
    }

    #[test]
    fn existing_key_id_is_replaced() -> Result<()> {
        let secret = secret_from_json(
            r#"{"kty":"EC","kid":"previous","crv":"P-256","d":"5q2BLNBLo0GkBv2alvciOUB8v3KBAfTaM6UWxL9e7yA","x":"nZDTsYVZJTklNpiS_RiV1vEFhFKUX-TzMYL_V8nIzRw","y":"EytKImJxKdBW-TzVf0a6hqLJIWDzpw_NpdLvawUM9PQ"}"#,
        );

        let key = derive_signing_key(&secret)?;
        assert_eq!(key.key_id().map(|k| k.as_str()), Some(THUMBPRINT));
        Ok(())
    }

    #[test]
    fn padded_secret_is_rejected() {
        let padded = ApiKeySecret::new(STANDARD.encode(r#"{"kty":"EC","a":1}x"#));
        assert!(padded.as_str().ends_with("=="));

        let err = derive_signing_key(&padded).unwrap_err();
        assert!(matches!(err, Error::SecretDecode(_)));
    }

    #[test]
    fn line_breaks_in_secret_are_ignored() -> Result<()> {
        let (head, tail) = SECRET.split_at(64);

        for secret in [
            format!("{}\n", SECRET),
            format!("{}\r\n", SECRET),
            format!("{}\n{}", head, tail),
        ] {
            let key = derive_signing_key(&ApiKeySecret::new(secret))?;
            assert_eq!(key.key_id().map(|k| k.as_str()), Some(THUMBPRINT));
        }
        Ok(())
    }

    #[test]
    fn other_whitespace_in_secret_is_rejected() {
        let secret = ApiKeySecret::new(format!("{} ", SECRET));
        let err = derive_signing_key(&secret).unwrap_err();
        assert!(matches!(err, Error::SecretDecode(_)));
    }

    #[test]
    fn key_pinned_to_another_algorithm_is_refused() {
        let secret = secret_from_json(
            r#"{"kty":"EC","alg":"ES384","crv":"P-256","d":"5q2BLNBLo0GkBv2alvciOUB8v3KBAfTaM6UWxL9e7yA","x":"nZDTsYVZJTklNpiS_RiV1vEFhFKUX-TzMYL_V8nIzRw","y":"EytKImJxKdBW-TzVf0a6hqLJIWDzpw_NpdLvawUM9PQ"}"#,
        );
        let err = derive_signing_key(&secret).unwrap_err();
        assert!(matches!(err, Error::KeyParse(_)));
    }

    #[test]
    fn encryption_key_cannot_construct_signer() -> Result<()> {
        let secret = STANDARD_NO_PAD.encode(
            r#"{"kty":"EC","use":"enc","crv":"P-256","d":"5q2BLNBLo0GkBv2alvciOUB8v3KBAfTaM6UWxL9e7yA","x":"nZDTsYVZJTklNpiS_RiV1vEFhFKUX-TzMYL_V8nIzRw","y":"EytKImJxKdBW-TzVf0a6hqLJIWDzpw_NpdLvawUM9PQ"}"#,
        );
        let config = Config::new("api_1", secret, "prod-us")?;

        let err = new_signer(&config).unwrap_err();
        assert!(err.is_signer_construction());
        Ok(())
    }

    #[test]
    fn non_base64_secret_is_rejected() {
        let err = derive_signing_key(ApiKeySecretRef::from_str("not base64!")).unwrap_err();
        assert!(matches!(err, Error::SecretDecode(_)));
    }

    #[test]
    fn non_key_secret_is_rejected() {
        let err = derive_signing_key(&secret_from_json(r#"{"hello":"world"}"#)).unwrap_err();
        assert!(matches!(err, Error::KeyParse(_)));
    }

    #[test]
    fn other_curves_are_rejected() {
        let secret = secret_from_json(r#"{"kty":"EC","crv":"P-384","x":"AAAA","y":"AAAA"}"#);
        let err = derive_signing_key(&secret).unwrap_err();
        assert!(matches!(err, Error::KeyParse(_)));
    }

    #[test]
    fn public_key_cannot_construct_signer() -> Result<()> {
        let secret = STANDARD_NO_PAD.encode(
            r#"{"kty":"EC","crv":"P-256","x":"nZDTsYVZJTklNpiS_RiV1vEFhFKUX-TzMYL_V8nIzRw","y":"EytKImJxKdBW-TzVf0a6hqLJIWDzpw_NpdLvawUM9PQ"}"#,
        );
        let config = Config::new("api_1", secret, "prod-us")?;

        let err = new_signer(&config).unwrap_err();
        assert!(err.is_signer_construction());
        Ok(())
    }

    #[test]
    fn signer_references_key_by_id() -> Result<()> {
        let config = Config::new("api_1", SECRET, "prod-us")?;

        let signer = new_signer(&config)?;
        assert_eq!(signer.header().alg(), jwa::Algorithm::ES256);
        assert_eq!(signer.header().kid().map(|k| k.as_str()), Some(THUMBPRINT));
        Ok(())
    }
}
