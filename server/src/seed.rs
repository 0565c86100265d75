use prefpanel_core::handler::middleware::permission::{
    CAN_EDIT_DISCORD_NOTIFICATIONS_SETTINGS, CAN_EDIT_LLM_SETTINGS,
};
use prefpanel_core::metadata::error::DatabaseError;
use prefpanel_core::metadata::pool::DbPool;
use prefpanel_core::metadata::services::org::OrgServiceImpl;
use prefpanel_core::metadata::services::org_plan::OrgPlanServiceImpl;
use prefpanel_core::metadata::services::org_user::OrgUserServiceImpl;
use prefpanel_core::types::metadata::org::NewOrgDTO;
use prefpanel_core::types::metadata::org_plan::NewOrgPlanDTO;
use prefpanel_core::types::metadata::services::org::OrgService;
use prefpanel_core::types::metadata::services::org_plan::OrgPlanService;
use prefpanel_core::types::metadata::services::org_user::OrgUserService;
use serde::Deserialize;
use tracing::info;

/// Built-in roles: (slug, name, level, permissions).
const DEFAULT_ROLES: &[(&str, &str, i32, &[&str])] = &[
    (
        "super-admin",
        "Super Admin",
        5,
        &[CAN_EDIT_LLM_SETTINGS, CAN_EDIT_DISCORD_NOTIFICATIONS_SETTINGS],
    ),
    (
        "account-manager",
        "Account Manager",
        4,
        &[CAN_EDIT_LLM_SETTINGS, CAN_EDIT_DISCORD_NOTIFICATIONS_SETTINGS],
    ),
    (
        "pipeline-manager",
        "Pipeline Manager",
        3,
        &[CAN_EDIT_DISCORD_NOTIFICATIONS_SETTINGS],
    ),
    ("analyst", "Analyst", 2, &[]),
    ("guest", "Guest", 1, &[]),
];

/// Ensures the built-in roles exist with their permissions.
pub fn seed_roles(db_pool: &DbPool) -> Result<(), DatabaseError> {
    let org_user_service = OrgUserServiceImpl::new(db_pool.clone());

    for (slug, name, level, permissions) in DEFAULT_ROLES {
        org_user_service.ensure_role(slug, name, *level, permissions)?;
    }

    info!("Ensured {} default roles", DEFAULT_ROLES.len());
    Ok(())
}

#[derive(Debug, Deserialize, Default)]
pub struct SeedFile {
    #[serde(default)]
    pub orgs: Vec<SeedOrg>,
    #[serde(default)]
    pub users: Vec<SeedUser>,
}

#[derive(Debug, Deserialize)]
pub struct SeedOrg {
    #[serde(flatten)]
    pub org: NewOrgDTO,
    pub plan: Option<NewOrgPlanDTO>,
}

#[derive(Debug, Deserialize)]
pub struct SeedUser {
    pub email: String,
    #[serde(default)]
    pub memberships: Vec<SeedMembership>,
}

#[derive(Debug, Deserialize)]
pub struct SeedMembership {
    pub org: String,
    pub role: String,
}

#[derive(Debug, Default, PartialEq)]
pub struct SeedSummary {
    pub orgs: usize,
    pub users: usize,
    pub memberships: usize,
    pub plans: usize,
}

/// Applies a seed file. Records that already exist are left untouched.
pub fn apply_seed_file(db_pool: &DbPool, seed: SeedFile) -> Result<SeedSummary, DatabaseError> {
    let org_service = OrgServiceImpl::new(db_pool.clone());
    let plan_service = OrgPlanServiceImpl::new(db_pool.clone());
    let org_user_service = OrgUserServiceImpl::new(db_pool.clone());
    let mut summary = SeedSummary::default();

    for seed_org in seed.orgs {
        let org = match org_service.get_by_slug(&seed_org.org.slug)? {
            Some(org) => org,
            None => {
                summary.orgs += 1;
                org_service.create(seed_org.org)?
            }
        };

        if let Some(plan) = seed_org.plan {
            if plan_service.get_by_org(&org.id)?.is_none() {
                plan_service.create(&org.id, plan)?;
                summary.plans += 1;
            }
        }
    }

    for seed_user in seed.users {
        let user = match org_user_service.get_user_by_email(&seed_user.email)? {
            Some(user) => user,
            None => {
                summary.users += 1;
                org_user_service.create_user(&seed_user.email)?
            }
        };

        for membership in seed_user.memberships {
            let org = org_service.get_by_slug(&membership.org)?.ok_or_else(|| {
                DatabaseError::InvalidArgument(format!("Unknown org {}", membership.org))
            })?;

            match org_user_service.add_org_user(&user.id, &org.id, &membership.role) {
                Ok(org_user_id) => {
                    info!(
                        "Added {} to {} as {} (org user {})",
                        user.email, org.slug, membership.role, org_user_id
                    );
                    summary.memberships += 1;
                }
                Err(DatabaseError::UniqueViolation(_)) => {}
                Err(e) => return Err(e),
            }
        }
    }

    Ok(summary)
}
