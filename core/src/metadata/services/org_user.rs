use crate::metadata::error::DatabaseError;
use crate::metadata::models::org::DbOrg;
use crate::metadata::models::org_user::{
    DbNewOrgUser, DbNewRole, DbNewRolePermission, DbNewUser, DbOrgUser, DbPermission, DbRole,
    DbUser,
};
use crate::metadata::pool::DbPool;
use crate::metadata::schema::{org_users, orgs, permissions, role_permissions, roles, users};
use crate::metadata::utils::now_timestamp;
use crate::types::metadata::org_user::{OrgUser, Role, User};
use crate::types::metadata::services::org_user::OrgUserService;
use diesel::prelude::*;
use diesel::OptionalExtension;
use std::collections::BTreeSet;
use uuid::Uuid;

pub struct OrgUserServiceImpl {
    db_pool: DbPool,
}

impl OrgUserServiceImpl {
    pub fn new(db_pool: DbPool) -> Self {
        Self { db_pool }
    }

    fn permission_slugs(
        conn: &mut SqliteConnection,
        role_id: &str,
    ) -> Result<BTreeSet<String>, DatabaseError> {
        let slugs = role_permissions::table
            .inner_join(permissions::table)
            .filter(role_permissions::role_id.eq(role_id))
            .select(permissions::slug)
            .load::<String>(conn)?;

        Ok(slugs.into_iter().collect())
    }

    fn ensure_permission(
        conn: &mut SqliteConnection,
        slug: &str,
    ) -> Result<DbPermission, DatabaseError> {
        let existing = permissions::table
            .filter(permissions::slug.eq(slug))
            .select(DbPermission::as_select())
            .first::<DbPermission>(conn)
            .optional()?;

        if let Some(permission) = existing {
            return Ok(permission);
        }

        let permission = DbPermission {
            id: Uuid::new_v4().to_string(),
            slug: slug.to_string(),
            name: slug.replace('_', " "),
        };

        diesel::insert_into(permissions::table)
            .values(&permission)
            .execute(conn)
            .map_err(DatabaseError::from_insert)?;

        Ok(permission)
    }
}

impl OrgUserService for OrgUserServiceImpl {
    fn get_org_user(&self, user_id: &str, org_slug: &str) -> Result<Option<OrgUser>, DatabaseError> {
        let mut conn = self.db_pool.get()?;

        let row = org_users::table
            .inner_join(orgs::table)
            .inner_join(users::table)
            .inner_join(roles::table)
            .filter(org_users::user_id.eq(user_id))
            .filter(orgs::slug.eq(org_slug))
            .select((
                DbOrgUser::as_select(),
                DbOrg::as_select(),
                DbUser::as_select(),
                DbRole::as_select(),
            ))
            .first::<(DbOrgUser, DbOrg, DbUser, DbRole)>(&mut conn)
            .optional()?;

        let Some((org_user, org, user, role)) = row else {
            return Ok(None);
        };

        let permissions = Self::permission_slugs(&mut conn, &role.id)?;

        Ok(Some(OrgUser {
            id: org_user.id,
            user: user.into(),
            org: org.into(),
            role: role.into(),
            permissions,
        }))
    }

    fn get_user_by_org_user_id(&self, org_user_id: &str) -> Result<Option<User>, DatabaseError> {
        let mut conn = self.db_pool.get()?;

        let user = org_users::table
            .inner_join(users::table)
            .filter(org_users::id.eq(org_user_id))
            .select(DbUser::as_select())
            .first::<DbUser>(&mut conn)
            .optional()?;

        Ok(user.map(User::from))
    }

    fn get_user_by_email(&self, email: &str) -> Result<Option<User>, DatabaseError> {
        let mut conn = self.db_pool.get()?;

        let user = users::table
            .filter(users::email.eq(email))
            .select(DbUser::as_select())
            .first::<DbUser>(&mut conn)
            .optional()?;

        Ok(user.map(User::from))
    }

    fn create_user(&self, email: &str) -> Result<User, DatabaseError> {
        let mut conn = self.db_pool.get()?;
        let user = DbNewUser {
            id: Uuid::new_v4().to_string(),
            email: email.to_string(),
            created_at: now_timestamp(),
        };

        diesel::insert_into(users::table)
            .values(&user)
            .execute(&mut conn)
            .map_err(DatabaseError::from_insert)?;

        Ok(User {
            id: user.id,
            email: user.email,
        })
    }

    fn ensure_role(
        &self,
        slug: &str,
        name: &str,
        level: i32,
        permissions: &[&str],
    ) -> Result<Role, DatabaseError> {
        let mut conn = self.db_pool.get()?;

        conn.transaction::<Role, DatabaseError, _>(|conn| {
            let existing = roles::table
                .filter(roles::slug.eq(slug))
                .select(DbRole::as_select())
                .first::<DbRole>(conn)
                .optional()?;

            let role = match existing {
                Some(role) => role,
                None => {
                    let new_role = DbNewRole {
                        id: Uuid::new_v4().to_string(),
                        slug: slug.to_string(),
                        name: name.to_string(),
                        level,
                    };
                    diesel::insert_into(roles::table)
                        .values(&new_role)
                        .execute(conn)
                        .map_err(DatabaseError::from_insert)?;

                    DbRole {
                        id: new_role.id,
                        slug: new_role.slug,
                        name: new_role.name,
                        level: new_role.level,
                    }
                }
            };

            let granted = Self::permission_slugs(conn, &role.id)?;
            for permission_slug in permissions {
                if granted.contains(*permission_slug) {
                    continue;
                }

                let permission = Self::ensure_permission(conn, permission_slug)?;
                diesel::insert_into(role_permissions::table)
                    .values(&DbNewRolePermission {
                        id: Uuid::new_v4().to_string(),
                        role_id: role.id.clone(),
                        permission_id: permission.id,
                    })
                    .execute(conn)
                    .map_err(DatabaseError::from_insert)?;
            }

            Ok(role.into())
        })
    }

    fn add_org_user(
        &self,
        user_id: &str,
        org_id: &str,
        role_slug: &str,
    ) -> Result<String, DatabaseError> {
        let mut conn = self.db_pool.get()?;

        let role = roles::table
            .filter(roles::slug.eq(role_slug))
            .select(DbRole::as_select())
            .first::<DbRole>(&mut conn)
            .optional()?
            .ok_or_else(|| DatabaseError::InvalidArgument(format!("Unknown role {role_slug}")))?;

        let org_user = DbNewOrgUser {
            id: Uuid::new_v4().to_string(),
            user_id: user_id.to_string(),
            org_id: org_id.to_string(),
            role_id: role.id,
            created_at: now_timestamp(),
        };

        diesel::insert_into(org_users::table)
            .values(&org_user)
            .execute(&mut conn)
            .map_err(DatabaseError::from_insert)?;

        Ok(org_user.id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metadata::test_utils::{seed_org, seed_org_user, setup_test_database};

    #[test]
    fn test_get_org_user_loads_permissions() {
        let db_pool = setup_test_database();
        let org = seed_org(&db_pool, "acme");
        let actor = seed_org_user(
            &db_pool,
            &org,
            "admin@acme.org",
            "account-manager",
            &["can_edit_llm_settings", "can_view_pipelines"],
        );

        assert_eq!(actor.org.slug, "acme");
        assert_eq!(actor.user.email, "admin@acme.org");
        assert_eq!(actor.role.slug, "account-manager");
        assert!(actor.has_permission("can_edit_llm_settings"));
        assert!(actor.has_permissions(&["can_edit_llm_settings", "can_view_pipelines"]));
        assert!(!actor.has_permission("can_edit_discord_notifications_settings"));
    }

    #[test]
    fn test_get_org_user_wrong_org() {
        let db_pool = setup_test_database();
        let org = seed_org(&db_pool, "acme");
        seed_org(&db_pool, "other");
        let actor = seed_org_user(&db_pool, &org, "a@acme.org", "analyst", &[]);

        let service = OrgUserServiceImpl::new(db_pool);
        assert!(service
            .get_org_user(&actor.user.id, "other")
            .unwrap()
            .is_none());
        assert!(service
            .get_org_user(&actor.user.id, "acme")
            .unwrap()
            .is_some());
    }

    #[test]
    fn test_ensure_role_is_idempotent() {
        let db_pool = setup_test_database();
        let service = OrgUserServiceImpl::new(db_pool);

        let first = service
            .ensure_role("analyst", "Analyst", 2, &["can_view_dashboards"])
            .unwrap();
        let second = service
            .ensure_role(
                "analyst",
                "Analyst",
                2,
                &["can_view_dashboards", "can_edit_llm_settings"],
            )
            .unwrap();

        assert_eq!(first.id, second.id);
    }

    #[test]
    fn test_user_by_org_user_id() {
        let db_pool = setup_test_database();
        let org = seed_org(&db_pool, "acme");
        let actor = seed_org_user(&db_pool, &org, "approver@acme.org", "analyst", &[]);

        let service = OrgUserServiceImpl::new(db_pool);
        let user = service.get_user_by_org_user_id(&actor.id).unwrap().unwrap();
        assert_eq!(user.email, "approver@acme.org");
        assert!(service.get_user_by_org_user_id("nope").unwrap().is_none());
    }

    #[test]
    fn test_add_org_user_unknown_role() {
        let db_pool = setup_test_database();
        let org = seed_org(&db_pool, "acme");
        let service = OrgUserServiceImpl::new(db_pool);
        let user = service.create_user("x@acme.org").unwrap();

        let result = service.add_org_user(&user.id, &org.id, "missing-role");
        assert!(matches!(result, Err(DatabaseError::InvalidArgument(_))));
    }
}
