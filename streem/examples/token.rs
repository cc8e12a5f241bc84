use std::time::Duration;

use clap::Parser;
use streem::config::{ApiEnvironment, ApiKeyId, ApiKeySecret};

#[derive(Debug, Parser)]
struct Opts {
    /// The ID of the Streem API key
    #[arg(long, env = "STREEM_API_KEY_ID")]
    api_key_id: ApiKeyId,

    /// The secret of the Streem API key
    #[arg(long, env = "STREEM_API_KEY_SECRET", hide_env_values = true)]
    api_key_secret: ApiKeySecret,

    /// The Streem API environment, such as `prod-us`
    #[arg(long, env = "STREEM_API_ENVIRONMENT")]
    api_environment: ApiEnvironment,

    /// The user the token is issued for
    #[arg(long, default_value = "someId")]
    user_id: String,
}

fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::filter::EnvFilter::from_default_env())
        .init();

    let opts = Opts::parse();

    streem::init(opts.api_key_id, opts.api_key_secret, opts.api_environment)?;

    let mut builder = streem::new_token_builder();
    let future = builder.future_timestamp();

    builder
        // required
        .set_user_id(opts.user_id)
        // recommended
        .set_name("T Rex")
        .set_email("some@email.com")
        .set_avatar_url("some.avatar.url")
        // optional
        .set_token_expiration_ms(future.after(Duration::from_secs(30 * 60)))
        .set_session_expiration_ms(future.after(Duration::from_secs(12 * 60 * 60)));

    let token = builder.build()?;

    println!("Got token {:#}", token);
    Ok(())
}
