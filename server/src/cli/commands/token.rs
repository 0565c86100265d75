use crate::cli::TokenArgs;
use crate::config::Config;
use crate::CliError;
use prefpanel_core::auth::encode_token;

pub fn handle_token(config: &Config, args: TokenArgs) -> Result<(), CliError> {
    let token = encode_token(
        &config.auth,
        &args.user_id,
        &args.org,
        chrono::Duration::hours(args.ttl_hours),
    )?;

    println!("{token}");

    Ok(())
}
