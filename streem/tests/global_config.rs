use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine as _};
use color_eyre::{eyre::eyre, Result};

const API_KEY_SECRET: &str = "eyJrdHkiOiJFQyIsImQiOiI1cTJCTE5CTG8wR2tCdjJhbHZjaU9VQjh2M0tCQWZUYU02VVd4TDllN3lBIiwidXNlIjoic2lnIiwiY3J2IjoiUC0yNTYiLCJ4IjoiblpEVHNZVlpKVGtsTnBpU19SaVYxdkVGaEZLVVgtVHpNWUxfVjhuSXpSdyIsInkiOiJFeXRLSW1KeEtkQlctVHpWZjBhNmhxTEpJV0R6cHdfTnBkTHZhd1VNOVBRIiwiYWxnIjoiRVMyNTYifQ";

// The process-wide configuration is shared by every test in this binary, so
// the whole lifecycle is exercised in order within a single test.
#[test]
fn initialization_lifecycle() -> Result<()> {
    assert!(streem::config::get().is_none());

    let err = streem::init("", API_KEY_SECRET, "prod-us").unwrap_err();
    assert!(err.is_missing_api_key_id());
    assert!(streem::config::get().is_none());

    streem::init("api_first", API_KEY_SECRET, "prod-us")?;
    let first = streem::config::get().ok_or_else(|| eyre!("not initialized"))?;
    assert_eq!(first.api_key_id().as_str(), "api_first");

    let err = streem::init("", API_KEY_SECRET, "prod-eu").unwrap_err();
    assert!(err.is_missing_api_key_id());
    let current = streem::config::get().ok_or_else(|| eyre!("not initialized"))?;
    assert_eq!(current, first);

    streem::init("api_second", API_KEY_SECRET, "prod-eu")?;
    let second = streem::config::get().ok_or_else(|| eyre!("not initialized"))?;
    assert_eq!(second.api_key_id().as_str(), "api_second");
    assert_eq!(second.api_environment().as_str(), "prod-eu");

    let mut builder = streem::new_token_builder();
    builder.set_user_id("123ID");
    let token = builder.build()?;

    let (_, payload, _) = token.segments().ok_or_else(|| eyre!("not a compact JWS"))?;
    let claims: serde_json::Value = serde_json::from_slice(&URL_SAFE_NO_PAD.decode(payload)?)?;

    assert_eq!(claims["iss"], "streem:api:api_second");
    assert_eq!(claims["aud"], "https://api.prod-eu.streem.cloud/");
    Ok(())
}
