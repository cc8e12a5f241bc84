//! The claims carried by a Streem token

use aliri_braid::braid;
use serde::{Deserialize, Serialize};
use streem_clock::{UnixTime, UnixTimeMillis};

use crate::{Config, Error, TokenFields};

/// The intended audience of a token
#[braid(serde, ref_doc = "A borrowed reference to an [`Audience`]")]
pub struct Audience;

/// The issuer of a token
#[braid(serde, ref_doc = "A borrowed reference to an [`Issuer`]")]
pub struct Issuer;

/// The subject of a token
#[braid(serde, ref_doc = "A borrowed reference to a [`Subject`]")]
pub struct Subject;

/// The claims asserted by a Streem token
///
/// Every field is always serialized, including empty strings, in the
/// following order:
///
/// `aud`, `email`, `exp`, `session_exp`, `iat`, `iss`, `name`, `picture`,
/// `sub`, `streem:reservation_sid`
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[must_use]
pub struct Claims {
    aud: Audience,
    email: String,
    exp: UnixTime,
    session_exp: UnixTime,
    iat: UnixTime,
    iss: Issuer,
    name: String,
    picture: String,
    sub: Subject,
    #[serde(rename = "streem:reservation_sid")]
    reservation_sid: String,
}

impl Claims {
    /// Assembles the claims for a token issued at `now`
    ///
    /// Expirations are taken from `fields` as given and truncated to whole
    /// seconds. Defaults must already have been applied.
    pub fn assemble(fields: &TokenFields, config: &Config, now: UnixTimeMillis) -> Self {
        Self {
            aud: config.audience(),
            email: fields.email.clone(),
            exp: fields.token_expiration.into(),
            session_exp: fields.session_expiration.into(),
            iat: now.into(),
            iss: config.issuer(),
            name: fields.name.clone(),
            picture: fields.avatar_url.clone(),
            sub: Subject::new(fields.user_id.clone()),
            reservation_sid: fields.reservation_sid.clone(),
        }
    }

    /// Serializes the claims to a JSON payload
    ///
    /// # Errors
    ///
    /// Returns [`Error::Serialization`] if the claims cannot be encoded.
    pub fn to_vec(&self) -> Result<Vec<u8>, Error> {
        serde_json::to_vec(self).map_err(Error::Serialization)
    }

    /// Audience (`aud`)
    pub fn aud(&self) -> &AudienceRef {
        &self.aud
    }

    /// Email address (`email`)
    #[must_use]
    pub fn email(&self) -> &str {
        &self.email
    }

    /// Token expiration (`exp`)
    #[must_use]
    pub fn exp(&self) -> UnixTime {
        self.exp
    }

    /// Session expiration (`session_exp`)
    #[must_use]
    pub fn session_exp(&self) -> UnixTime {
        self.session_exp
    }

    /// Issued at (`iat`)
    #[must_use]
    pub fn iat(&self) -> UnixTime {
        self.iat
    }

    /// Issuer (`iss`)
    pub fn iss(&self) -> &IssuerRef {
        &self.iss
    }

    /// Display name (`name`)
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Avatar URL (`picture`)
    #[must_use]
    pub fn picture(&self) -> &str {
        &self.picture
    }

    /// Subject (`sub`)
    pub fn sub(&self) -> &SubjectRef {
        &self.sub
    }

    /// Reservation SID (`streem:reservation_sid`)
    #[must_use]
    pub fn reservation_sid(&self) -> &str {
        &self.reservation_sid
    }
}

#[cfg(test)]
mod tests {
    use color_eyre::Result;

    use super::*;

    fn config() -> Result<Config> {
        Ok(Config::new("api_1", "c2VjcmV0", "prod-us")?)
    }

    #[test]
    fn serializes_all_fields_in_order() -> Result<()> {
        let fields = TokenFields {
            user_id: "123ID".into(),
            name: "T Rex".into(),
            email: "some@email.com".into(),
            avatar_url: "some.avatar.url".into(),
            token_expiration: UnixTimeMillis(1_600_000_300_999),
            session_expiration: UnixTimeMillis(1_600_014_400_000),
            reservation_sid: "rsv_1".into(),
        };

        let claims = Claims::assemble(&fields, &config()?, UnixTimeMillis(1_600_000_000_500));
        let payload = String::from_utf8(claims.to_vec()?)?;

        assert_eq!(
            payload,
            concat!(
                r#"{"aud":"https://api.prod-us.streem.cloud/","#,
                r#""email":"some@email.com","#,
                r#""exp":1600000300,"#,
                r#""session_exp":1600014400,"#,
                r#""iat":1600000000,"#,
                r#""iss":"streem:api:api_1","#,
                r#""name":"T Rex","#,
                r#""picture":"some.avatar.url","#,
                r#""sub":"123ID","#,
                r#""streem:reservation_sid":"rsv_1"}"#,
            )
        );
        Ok(())
    }

    #[test]
    fn empty_fields_are_still_present() -> Result<()> {
        let fields = TokenFields {
            user_id: "someone".into(),
            ..TokenFields::default()
        };

        let claims = Claims::assemble(&fields, &config()?, UnixTimeMillis(0));
        let value: serde_json::Value = serde_json::from_slice(&claims.to_vec()?)?;

        assert_eq!(value["email"], "");
        assert_eq!(value["name"], "");
        assert_eq!(value["picture"], "");
        assert_eq!(value["streem:reservation_sid"], "");
        assert_eq!(value["exp"], 0);
        Ok(())
    }

    #[test]
    fn expirations_truncate_to_seconds() -> Result<()> {
        let fields = TokenFields {
            user_id: "someone".into(),
            token_expiration: UnixTimeMillis(1_999),
            session_expiration: UnixTimeMillis(-10),
            ..TokenFields::default()
        };

        let claims = Claims::assemble(&fields, &config()?, UnixTimeMillis(2_001));

        assert_eq!(claims.exp(), UnixTime(1));
        assert_eq!(claims.session_exp(), UnixTime(0));
        assert_eq!(claims.iat(), UnixTime(2));
        Ok(())
    }

    #[test]
    fn claims_round_trip_through_json() -> Result<()> {
        let fields = TokenFields {
            user_id: "ünïcødé".into(),
            ..TokenFields::default()
        };

        let claims = Claims::assemble(&fields, &config()?, UnixTimeMillis(42_000));
        let parsed: Claims = serde_json::from_slice(&claims.to_vec()?)?;

        assert_eq!(parsed, claims);
        assert_eq!(parsed.sub().as_str(), "ünïcødé");
        Ok(())
    }
}
