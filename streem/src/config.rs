//! SDK configuration
//!
//! A [`Config`] carries the API key ID, the API key secret, and the name of
//! the API environment tokens are minted for. It can be handed directly to a
//! [`TokenBuilder`](crate::TokenBuilder), or installed once as the
//! process-wide configuration with [`init`].

use std::{
    fmt,
    sync::{Arc, PoisonError, RwLock},
};

use aliri_braid::braid;

use crate::{
    claims::{Audience, Issuer},
    Error,
};

macro_rules! limited_reveal {
    ($ty:ty: $hidden:literal, $default:literal) => {
        impl fmt::Debug for $ty {
            fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
                if f.alternate() {
                    f.write_str("\"")?;
                    limited_reveal(&self.0, &mut *f, $default)?;
                    f.write_str("\"")
                } else {
                    f.write_str(concat!("***", $hidden, "***"))
                }
            }
        }

        impl fmt::Display for $ty {
            fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
                if f.alternate() {
                    limited_reveal(&self.0, &mut *f, usize::MAX)
                } else {
                    f.write_str(concat!("***", $hidden, "***"))
                }
            }
        }
    };
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

/// The ID of a Streem API key
#[braid(serde, ref_doc = "A borrowed reference to an [`ApiKeyId`]")]
pub struct ApiKeyId;

/// The secret of a Streem API key
///
/// The secret is a JSON Web Key, encoded with the standard base64 alphabet
/// and no padding.
#[braid(
    serde,
    debug = "owned",
    display = "owned",
    ref_doc = "A borrowed reference to an [`ApiKeySecret`]"
)]
pub struct ApiKeySecret;

limited_reveal!(ApiKeySecretRef: "API KEY SECRET", 5);

/// The name of a Streem API environment, such as `prod-us`
#[braid(serde, ref_doc = "A borrowed reference to an [`ApiEnvironment`]")]
pub struct ApiEnvironment;

/// The configuration used to sign tokens
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Config {
    api_key_id: ApiKeyId,
    api_key_secret: ApiKeySecret,
    api_environment: ApiEnvironment,
}

impl Config {
    /// Constructs a new configuration
    ///
    /// The secret is not decoded here; a malformed secret is reported when
    /// a token is built.
    ///
    /// # Errors
    ///
    /// Returns [`Error::MissingApiKeyId`] if the API key ID is empty.
    pub fn new(
        api_key_id: impl Into<ApiKeyId>,
        api_key_secret: impl Into<ApiKeySecret>,
        api_environment: impl Into<ApiEnvironment>,
    ) -> Result<Self, Error> {
        let api_key_id = api_key_id.into();
        if api_key_id.as_str().is_empty() {
            return Err(Error::MissingApiKeyId);
        }

        Ok(Self {
            api_key_id,
            api_key_secret: api_key_secret.into(),
            api_environment: api_environment.into(),
        })
    }

    /// The API key ID
    pub fn api_key_id(&self) -> &ApiKeyIdRef {
        &self.api_key_id
    }

    /// The API key secret
    pub fn api_key_secret(&self) -> &ApiKeySecretRef {
        &self.api_key_secret
    }

    /// The API environment
    pub fn api_environment(&self) -> &ApiEnvironmentRef {
        &self.api_environment
    }

    /// The audience of tokens minted for this environment
    pub fn audience(&self) -> Audience {
        Audience::new(format!(
            "https://api.{}.streem.cloud/",
            self.api_environment.as_str()
        ))
    }

    /// The issuer of tokens signed with this API key
    pub fn issuer(&self) -> Issuer {
        Issuer::new(format!("streem:api:{}", self.api_key_id.as_str()))
    }
}

static CONFIG: RwLock<Option<Arc<Config>>> = RwLock::new(None);

/// Installs the process-wide configuration
///
/// A successful call replaces any configuration installed earlier. A failed
/// call leaves the current configuration in place.
///
/// # Errors
///
/// Returns [`Error::MissingApiKeyId`] if the API key ID is empty.
pub fn init(
    api_key_id: impl Into<ApiKeyId>,
    api_key_secret: impl Into<ApiKeySecret>,
    api_environment: impl Into<ApiEnvironment>,
) -> Result<(), Error> {
    let config = Config::new(api_key_id, api_key_secret, api_environment)?;

    #[cfg(feature = "tracing")]
    tracing::debug!(
        api_key_id = %config.api_key_id(),
        api_environment = %config.api_environment(),
        "installed Streem configuration"
    );

    *CONFIG.write().unwrap_or_else(PoisonError::into_inner) = Some(Arc::new(config));
    Ok(())
}

/// The process-wide configuration, if one has been installed
#[must_use]
pub fn get() -> Option<Arc<Config>> {
    CONFIG
        .read()
        .unwrap_or_else(PoisonError::into_inner)
        .clone()
}
