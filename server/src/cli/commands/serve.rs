use crate::cli::ServeArgs;
use crate::config::Config;
use crate::http::ApiServer;
use crate::CliError;
use prefpanel_core::metadata::pool::DbPool;

pub async fn handle_serve(
    db_pool: DbPool,
    config: Config,
    serve_args: ServeArgs,
) -> Result<(), CliError> {
    let config = config.apply_cli_overrides(&serve_args);

    let api_server = ApiServer::new(config, db_pool);
    let server_handle = api_server.start()?;

    server_handle.await?;

    Ok(())
}
