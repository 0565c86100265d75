use clap::Parser;
use config::{Config, ConfigError};
use prefpanel_core::auth::AuthError;
use prefpanel_core::metadata::error::DatabaseError;
use prefpanel_core::metadata::pool::DbPool;
use thiserror::Error;

mod cli;
mod config;
mod http;
mod middleware;
mod seed;
#[cfg(test)]
mod test_utils;
mod tracing;

#[derive(Error, Debug)]
pub enum CliError {
    #[error(transparent)]
    IoError(#[from] std::io::Error),
    #[error(transparent)]
    YamlError(#[from] serde_yaml::Error),
    #[error(transparent)]
    ServerError(#[from] http::ServerError),
    #[error(transparent)]
    ConfigError(#[from] ConfigError),
    #[error(transparent)]
    DatabaseError(#[from] DatabaseError),
    #[error(transparent)]
    AuthError(#[from] AuthError),
    #[error("Failed to initialize logging: {0}")]
    TracingError(#[from] tracing_subscriber::util::TryInitError),
    #[error("Failed to run migrations: {0}")]
    MigrationError(String),
}

#[actix_web::main]
async fn main() -> Result<(), CliError> {
    dotenv::dotenv().ok();

    let cli = cli::Cli::parse();
    tracing::init_tracing()?;

    let config = Config::load(&cli.config)?;
    let db_pool = get_db_pool(&config)?;

    // Roles and permissions the guards check must exist before any request
    seed::seed_roles(&db_pool)?;

    match cli.command {
        Some(cli::Commands::Token(args)) => cli::commands::token::handle_token(&config, args),
        Some(cli::Commands::Seed { file }) => cli::commands::seed::handle_seed(db_pool, file),
        Some(cli::Commands::Serve(serve_args)) => {
            cli::commands::serve::handle_serve(db_pool, config, serve_args).await
        }
        None => cli::commands::serve::handle_serve(db_pool, config, cli.serve_args).await,
    }
}

fn get_db_pool(config: &Config) -> Result<DbPool, CliError> {
    let db_pool = prefpanel_core::metadata::pool::establish_connection(
        config.database.url.clone(),
        config.database.max_connections,
    )
    .map_err(DatabaseError::from)?;

    prefpanel_core::metadata::utils::init_db(&db_pool)
        .map_err(|e| CliError::MigrationError(e.to_string()))?;

    Ok(db_pool)
}
