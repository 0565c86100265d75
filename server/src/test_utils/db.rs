use crate::seed::seed_roles;
use prefpanel_core::metadata::pool::DbPool;

/// In-memory database with migrations applied and the default roles seeded.
/// One connection, since each `:memory:` connection is a separate database.
pub fn setup_test_database() -> DbPool {
    let db_pool = prefpanel_core::metadata::pool::establish_connection(":memory:".to_string(), 1)
        .expect("Failed to create test pool");

    prefpanel_core::metadata::utils::init_db(&db_pool).expect("Failed to run migrations");
    seed_roles(&db_pool).expect("Failed to seed roles");

    db_pool
}
