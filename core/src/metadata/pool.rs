use diesel::r2d2::ConnectionManager;
use diesel::sqlite::SqliteConnection as Connection;
use r2d2::Pool;

pub type DbPool = Pool<ConnectionManager<Connection>>;

pub fn establish_connection(database_url: String, max_size: u32) -> Result<DbPool, r2d2::Error> {
    let manager = ConnectionManager::new(database_url);
    r2d2::Pool::builder().max_size(max_size).build(manager)
}
