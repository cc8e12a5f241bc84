//! Staged construction of signed Streem tokens
//!
//! Fields can be set in any order and any number of times; nothing is
//! validated until [`TokenBuilder::build`] is called.
//!
//! ```no_run
//! use std::time::Duration;
//!
//! # fn main() -> Result<(), streem::Error> {
//! streem::init("api_id", "api_key_secret", "prod-us")?;
//!
//! let mut builder = streem::new_token_builder();
//! let future = builder.future_timestamp();
//!
//! builder
//!     .set_user_id("someId")
//!     .set_name("T Rex")
//!     .set_email("some@email.com")
//!     .set_avatar_url("some.avatar.url")
//!     .set_token_expiration_ms(future.after(Duration::from_secs(30 * 60)))
//!     .set_session_expiration_ms(future.after(Duration::from_secs(12 * 60 * 60)));
//!
//! let token = builder.build()?;
//! println!("Got token {:#}", token);
//! # Ok(())
//! # }
//! ```

use std::{sync::Arc, time::Duration};

use streem_clock::{Clock, FutureTimestamp, System, UnixTimeMillis};
use streem_jose::Jws;

use crate::{claims::Claims, config, signer, Config, Error};

/// Lifetime of a token whose expiration was not set
pub const DEFAULT_TOKEN_LIFETIME: Duration = Duration::from_secs(5 * 60);

/// Lifetime of a session whose expiration was not set
pub const DEFAULT_SESSION_LIFETIME: Duration = Duration::from_secs(4 * 60 * 60);

/// The values accumulated by a [`TokenBuilder`]
///
/// An expiration of `0` means the expiration has not been set.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TokenFields {
    /// The user the token is issued for; required
    pub user_id: String,
    /// The user's display name
    pub name: String,
    /// The user's email address
    pub email: String,
    /// A URL to the user's avatar
    pub avatar_url: String,
    /// When the token expires
    pub token_expiration: UnixTimeMillis,
    /// When the session started with the token expires
    pub session_expiration: UnixTimeMillis,
    /// The reservation the token is bound to
    pub reservation_sid: String,
}

impl TokenFields {
    /// Fills in unset expirations relative to `now`
    #[must_use]
    pub fn with_default_expirations(mut self, now: FutureTimestamp) -> Self {
        if self.token_expiration == UnixTimeMillis(0) {
            self.token_expiration = now.after(DEFAULT_TOKEN_LIFETIME);
        }

        if self.session_expiration == UnixTimeMillis(0) {
            self.session_expiration = now.after(DEFAULT_SESSION_LIFETIME);
        }

        self
    }
}

/// A builder for signed Streem tokens
///
/// Unless a configuration is attached with [`with_config`][Self::with_config],
/// the process-wide configuration installed by [`init`][crate::init] is used,
/// resolved each time the token is built.
#[derive(Clone, Debug, Default)]
pub struct TokenBuilder<C = System> {
    fields: TokenFields,
    config: Option<Arc<Config>>,
    clock: C,
}

impl TokenBuilder {
    /// Constructs a builder with every field empty
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl<C: Clock> TokenBuilder<C> {
    /// Uses `config` instead of the process-wide configuration
    #[must_use]
    pub fn with_config(self, config: Arc<Config>) -> Self {
        Self {
            config: Some(config),
            ..self
        }
    }

    /// Uses `clock` to determine the current time
    #[must_use]
    pub fn with_clock<C2: Clock>(self, clock: C2) -> TokenBuilder<C2> {
        TokenBuilder {
            fields: self.fields,
            config: self.config,
            clock,
        }
    }

    /// Sets the user ID; required
    pub fn set_user_id(&mut self, user_id: impl Into<String>) -> &mut Self {
        self.fields.user_id = user_id.into();
        self
    }

    /// Sets the user's display name; recommended
    pub fn set_name(&mut self, name: impl Into<String>) -> &mut Self {
        self.fields.name = name.into();
        self
    }

    /// Sets the user's email address; recommended
    pub fn set_email(&mut self, email: impl Into<String>) -> &mut Self {
        self.fields.email = email.into();
        self
    }

    /// Sets a URL to the user's avatar; recommended
    pub fn set_avatar_url(&mut self, avatar_url: impl Into<String>) -> &mut Self {
        self.fields.avatar_url = avatar_url.into();
        self
    }

    /// Sets when the token expires
    ///
    /// If left unset, the token expires five minutes after it is built.
    pub fn set_token_expiration_ms(&mut self, expiration: UnixTimeMillis) -> &mut Self {
        self.fields.token_expiration = expiration;
        self
    }

    /// Sets when the session expires
    ///
    /// If left unset, the session expires four hours after the token is built.
    pub fn set_session_expiration_ms(&mut self, expiration: UnixTimeMillis) -> &mut Self {
        self.fields.session_expiration = expiration;
        self
    }

    /// Sets the reservation the token is bound to
    pub fn set_reservation_sid(&mut self, reservation_sid: impl Into<String>) -> &mut Self {
        self.fields.reservation_sid = reservation_sid.into();
        self
    }

    /// The user ID
    #[must_use]
    pub fn user_id(&self) -> &str {
        &self.fields.user_id
    }

    /// The user's display name
    #[must_use]
    pub fn name(&self) -> &str {
        &self.fields.name
    }

    /// The user's email address
    #[must_use]
    pub fn email(&self) -> &str {
        &self.fields.email
    }

    /// The avatar URL
    #[must_use]
    pub fn avatar_url(&self) -> &str {
        &self.fields.avatar_url
    }

    /// The token expiration, or zero if unset
    #[must_use]
    pub fn token_expiration_ms(&self) -> UnixTimeMillis {
        self.fields.token_expiration
    }

    /// The session expiration, or zero if unset
    #[must_use]
    pub fn session_expiration_ms(&self) -> UnixTimeMillis {
        self.fields.session_expiration
    }

    /// The reservation SID
    #[must_use]
    pub fn reservation_sid(&self) -> &str {
        &self.fields.reservation_sid
    }

    /// All accumulated fields
    #[must_use]
    pub fn fields(&self) -> &TokenFields {
        &self.fields
    }

    /// Captures the current time so that several expirations can be
    /// computed from the same instant
    pub fn future_timestamp(&self) -> FutureTimestamp {
        FutureTimestamp::from_clock(&self.clock)
    }

    /// Signs the accumulated claims
    ///
    /// The builder is left untouched, so it can be built again; each build
    /// reads the clock anew. Unset expirations and `iat` are all computed
    /// from the same instant.
    ///
    /// # Errors
    ///
    /// * [`Error::EmptyUserId`] if no user ID has been set
    /// * [`Error::NotInitialized`] if no configuration is available
    /// * Any error deriving the key or signing the token
    pub fn build(&self) -> Result<Jws, Error> {
        if self.fields.user_id.is_empty() {
            return Err(Error::EmptyUserId);
        }

        let config = match &self.config {
            Some(config) => Arc::clone(config),
            None => config::get().ok_or(Error::NotInitialized)?,
        };

        let now = self.future_timestamp();
        let fields = self.fields.clone().with_default_expirations(now);

        let signer = signer::new_signer(&config)?;
        let claims = Claims::assemble(&fields, &config, now.reference());
        let token = signer.sign(&claims.to_vec()?)?;

        #[cfg(feature = "tracing")]
        tracing::debug!(
            kid = ?signer.header().kid(),
            sub = %claims.sub(),
            iat = claims.iat().0,
            exp = claims.exp().0,
            session_exp = claims.session_exp().0,
            "built Streem token"
        );

        Ok(token)
    }
}

#[cfg(test)]
mod tests {
    #[cfg(feature = "tracing")]
    use tracing_test::traced_test;

    use super::*;

    const API_KEY_SECRET: &str = "eyJrdHkiOiJFQyIsImQiOiI1cTJCTE5CTG8wR2tCdjJhbHZjaU9VQjh2M0tCQWZUYU02VVd4TDllN3lBIiwidXNlIjoic2lnIiwiY3J2IjoiUC0yNTYiLCJ4IjoiblpEVHNZVlpKVGtsTnBpU19SaVYxdkVGaEZLVVgtVHpNWUxfVjhuSXpSdyIsInkiOiJFeXRLSW1KeEtkQlctVHpWZjBhNmhxTEpJV0R6cHdfTnBkTHZhd1VNOVBRIiwiYWxnIjoiRVMyNTYifQ";

    #[test]
    fn new_builder_is_empty() {
        let builder = TokenBuilder::new();
        assert_eq!(builder.fields(), &TokenFields::default());
        assert_eq!(builder.token_expiration_ms(), UnixTimeMillis(0));
        assert_eq!(builder.session_expiration_ms(), UnixTimeMillis(0));
    }

    #[test]
    fn user_id_is_stored_verbatim() {
        for expected in ["123abc", "!*@&$!()++", "ユーザー", ""] {
            let mut builder = TokenBuilder::new();
            builder.set_user_id(expected);
            assert_eq!(builder.user_id(), expected);
        }
    }

    #[test]
    fn name_is_stored_verbatim() {
        for expected in [
            "Alex",
            "A Name With A Lot of Spaces And $p3C14L Characters",
            "",
        ] {
            let mut builder = TokenBuilder::new();
            builder.set_name(expected);
            assert_eq!(builder.name(), expected);
        }
    }

    #[test]
    fn email_is_not_validated() {
        for expected in ["some@email.com", "some@email", ""] {
            let mut builder = TokenBuilder::new();
            builder.set_email(expected);
            assert_eq!(builder.email(), expected);
        }
    }

    #[test]
    fn avatar_url_is_not_validated() {
        for expected in ["some/avatar/url", "https://some.avatar.url", ""] {
            let mut builder = TokenBuilder::new();
            builder.set_avatar_url(expected);
            assert_eq!(builder.avatar_url(), expected);
        }
    }

    #[test]
    fn token_expiration_accepts_any_value() {
        for expected in [1, 1_000_000, -10, 0] {
            let mut builder = TokenBuilder::new();
            builder.set_token_expiration_ms(UnixTimeMillis(expected));
            assert_eq!(builder.token_expiration_ms(), UnixTimeMillis(expected));
        }
    }

    #[test]
    fn session_expiration_accepts_any_value() {
        for expected in [1, 1_000_000, -1010, 0] {
            let mut builder = TokenBuilder::new();
            builder.set_session_expiration_ms(UnixTimeMillis(expected));
            assert_eq!(builder.session_expiration_ms(), UnixTimeMillis(expected));
        }
    }

    #[test]
    fn reservation_sid_is_stored_verbatim() {
        for expected in ["wfam_1mY3yMnSp4DUa97vnSgrOW", ""] {
            let mut builder = TokenBuilder::new();
            builder.set_reservation_sid(expected);
            assert_eq!(builder.reservation_sid(), expected);
        }
    }

    #[test]
    fn last_write_wins() {
        let mut builder = TokenBuilder::new();
        builder.set_user_id("first").set_user_id("second");
        assert_eq!(builder.user_id(), "second");
    }

    #[test]
    fn empty_user_id_fails_before_anything_else() {
        let mut builder = TokenBuilder::new();
        builder.set_name("Alex");

        let err = builder.build().unwrap_err();
        assert!(err.is_empty_user_id());
    }

    #[test]
    fn defaults_share_one_instant() {
        let now = FutureTimestamp::from_reference(UnixTimeMillis(1_000_000));
        let fields = TokenFields::default().with_default_expirations(now);

        assert_eq!(fields.token_expiration, UnixTimeMillis(1_300_000));
        assert_eq!(fields.session_expiration, UnixTimeMillis(15_400_000));
    }

    #[test]
    fn explicit_expirations_are_kept() {
        let now = FutureTimestamp::from_reference(UnixTimeMillis(1_000_000));
        let fields = TokenFields {
            token_expiration: UnixTimeMillis(-10),
            session_expiration: UnixTimeMillis(1),
            ..TokenFields::default()
        }
        .with_default_expirations(now);

        assert_eq!(fields.token_expiration, UnixTimeMillis(-10));
        assert_eq!(fields.session_expiration, UnixTimeMillis(1));
    }

    #[test]
    fn only_unset_expiration_is_defaulted() {
        let now = FutureTimestamp::from_reference(UnixTimeMillis(1_000_000));
        let fields = TokenFields {
            token_expiration: UnixTimeMillis(5),
            ..TokenFields::default()
        }
        .with_default_expirations(now);

        assert_eq!(fields.token_expiration, UnixTimeMillis(5));
        assert_eq!(fields.session_expiration, UnixTimeMillis(15_400_000));
    }

    #[test]
    #[cfg(feature = "tracing")]
    #[traced_test]
    fn build_is_traced_without_secrets() {
        let config = Config::new("api_1", API_KEY_SECRET, "prod-us").unwrap();
        let mut builder = TokenBuilder::new().with_config(Arc::new(config));
        builder.set_user_id("123ID");

        let token = builder.build().unwrap();

        assert!(logs_contain("built Streem token"));
        assert!(logs_contain("yy_Mkoz_yRZ23cfJK8ul7ahqeQvAyWJNvaBrKFr0hTk"));
        assert!(!logs_contain(API_KEY_SECRET));
        assert!(!logs_contain(token.as_str()));
    }
}
