use crate::metadata::error::DatabaseError;
use crate::types::metadata::org_user::{OrgUser, Role, User};

pub trait OrgUserService {
    /// Resolves the membership of `user_id` in the org identified by `org_slug`,
    /// together with the permission slugs granted by its role.
    fn get_org_user(&self, user_id: &str, org_slug: &str) -> Result<Option<OrgUser>, DatabaseError>;
    fn get_user_by_org_user_id(&self, org_user_id: &str) -> Result<Option<User>, DatabaseError>;
    fn get_user_by_email(&self, email: &str) -> Result<Option<User>, DatabaseError>;
    fn create_user(&self, email: &str) -> Result<User, DatabaseError>;
    /// Creates the role if missing and grants it `permissions`, creating unknown permissions.
    fn ensure_role(
        &self,
        slug: &str,
        name: &str,
        level: i32,
        permissions: &[&str],
    ) -> Result<Role, DatabaseError>;
    fn add_org_user(
        &self,
        user_id: &str,
        org_id: &str,
        role_slug: &str,
    ) -> Result<String, DatabaseError>;
}
