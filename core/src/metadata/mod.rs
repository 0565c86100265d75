pub mod error;
pub mod models;
pub mod pool;
pub mod schema;
pub mod services;
#[cfg(test)]
pub mod test_utils;
pub mod utils;

pub type DB = diesel::sqlite::Sqlite;
