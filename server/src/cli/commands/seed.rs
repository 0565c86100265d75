use crate::seed::{apply_seed_file, SeedFile};
use crate::CliError;
use prefpanel_core::metadata::pool::DbPool;
use tracing::info;

pub fn handle_seed(db_pool: DbPool, file: String) -> Result<(), CliError> {
    let content = std::fs::read_to_string(&file)?;
    let seed_file: SeedFile = serde_yaml::from_str(&content)?;

    let summary = apply_seed_file(&db_pool, seed_file)?;
    info!(
        "Seeded {} orgs, {} users, {} memberships and {} plans from {}",
        summary.orgs, summary.users, summary.memberships, summary.plans, file
    );

    Ok(())
}
