use crate::metadata::schema::{org_users, permissions, role_permissions, roles, users};
use crate::types::metadata::org_user::{Role, User};
use diesel::{Identifiable, Insertable, Queryable, Selectable};
use serde::{Deserialize, Serialize};

#[derive(
    Selectable, Queryable, PartialEq, Eq, Debug, Clone, Serialize, Deserialize, Identifiable,
)]
#[serde(crate = "serde")]
#[diesel(table_name = users)]
pub struct DbUser {
    pub id: String,
    pub email: String,
    pub created_at: String,
}

impl From<DbUser> for User {
    fn from(val: DbUser) -> Self {
        User {
            id: val.id,
            email: val.email,
        }
    }
}

#[derive(Insertable, PartialEq, Debug)]
#[diesel(table_name = users)]
pub struct DbNewUser {
    pub id: String,
    pub email: String,
    pub created_at: String,
}

#[derive(
    Selectable, Queryable, PartialEq, Eq, Debug, Clone, Serialize, Deserialize, Identifiable,
)]
#[serde(crate = "serde")]
#[diesel(table_name = roles)]
pub struct DbRole {
    pub id: String,
    pub slug: String,
    pub name: String,
    pub level: i32,
}

impl From<DbRole> for Role {
    fn from(val: DbRole) -> Self {
        Role {
            id: val.id,
            slug: val.slug,
            name: val.name,
            level: val.level,
        }
    }
}

#[derive(Insertable, PartialEq, Debug)]
#[diesel(table_name = roles)]
pub struct DbNewRole {
    pub id: String,
    pub slug: String,
    pub name: String,
    pub level: i32,
}

#[derive(Selectable, Queryable, PartialEq, Eq, Debug, Clone, Identifiable, Insertable)]
#[diesel(table_name = permissions)]
pub struct DbPermission {
    pub id: String,
    pub slug: String,
    pub name: String,
}

#[derive(Insertable, PartialEq, Debug)]
#[diesel(table_name = role_permissions)]
pub struct DbNewRolePermission {
    pub id: String,
    pub role_id: String,
    pub permission_id: String,
}

#[derive(
    Selectable, Queryable, PartialEq, Eq, Debug, Clone, Serialize, Deserialize, Identifiable,
)]
#[serde(crate = "serde")]
#[diesel(table_name = org_users)]
pub struct DbOrgUser {
    pub id: String,
    pub user_id: String,
    pub org_id: String,
    pub role_id: String,
    pub created_at: String,
}

#[derive(Insertable, PartialEq, Debug)]
#[diesel(table_name = org_users)]
pub struct DbNewOrgUser {
    pub id: String,
    pub user_id: String,
    pub org_id: String,
    pub role_id: String,
    pub created_at: String,
}
