use crate::types::metadata::org::Org;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct User {
    pub id: String,
    pub email: String,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct Role {
    pub id: String,
    pub slug: String,
    pub name: String,
    pub level: i32,
}

/// The authenticated actor: one user acting inside exactly one org.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct OrgUser {
    pub id: String,
    pub user: User,
    pub org: Org,
    pub role: Role,
    pub permissions: BTreeSet<String>,
}

impl OrgUser {
    pub fn has_permission(&self, permission: &str) -> bool {
        self.permissions.contains(permission)
    }

    pub fn has_permissions(&self, required: &[&str]) -> bool {
        required.iter().all(|p| self.has_permission(p))
    }
}
