use crate::metadata::pool::DbPool;
use crate::metadata::services::org::OrgServiceImpl;
use crate::metadata::services::org_user::OrgUserServiceImpl;
use crate::types::metadata::org::{NewOrgDTO, Org};
use crate::types::metadata::org_user::OrgUser;
use crate::types::metadata::services::org::OrgService;
use crate::types::metadata::services::org_user::OrgUserService;

/// Creates a fresh in-memory database with all migrations applied.
///
/// Every SQLite `:memory:` connection is its own database, so the pool holds one.
pub fn setup_test_database() -> DbPool {
    let db_pool = crate::metadata::pool::establish_connection(":memory:".to_string(), 1)
        .expect("Failed to create test pool");

    crate::metadata::utils::init_db(&db_pool).expect("Failed to run migrations");

    db_pool
}

pub fn seed_org(db_pool: &DbPool, slug: &str) -> Org {
    OrgServiceImpl::new(db_pool.clone())
        .create(NewOrgDTO {
            name: format!("{slug} org"),
            slug: slug.to_string(),
            r#type: "client".to_string(),
        })
        .expect("Failed to create test org")
}

/// Creates a user, a role granting `permissions` and the membership binding them to `org`.
pub fn seed_org_user(
    db_pool: &DbPool,
    org: &Org,
    email: &str,
    role_slug: &str,
    permissions: &[&str],
) -> OrgUser {
    let service = OrgUserServiceImpl::new(db_pool.clone());

    service
        .ensure_role(role_slug, role_slug, 1, permissions)
        .expect("Failed to create test role");
    let user = service
        .create_user(email)
        .expect("Failed to create test user");
    service
        .add_org_user(&user.id, &org.id, role_slug)
        .expect("Failed to create test org user");

    service
        .get_org_user(&user.id, &org.slug)
        .expect("Failed to load test org user")
        .expect("Test org user missing")
}
