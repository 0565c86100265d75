pub mod types;

use crate::metadata::error::DatabaseError;
use crate::metadata::pool::DbPool;
use crate::metadata::services::org_plan::OrgPlanServiceImpl;
use crate::metadata::services::org_preferences::OrgPreferencesServiceImpl;
use crate::metadata::services::org_superset::OrgSupersetServiceImpl;
use crate::metadata::services::org_user::OrgUserServiceImpl;
use crate::preferences::types::{
    ApprovedBy, CreateOrgPreferencesRequest, DiscordNotificationsResponse,
    OrgPlanResponse, OrgPreferencesCreated, OrgPreferencesResponse, OrgSupersetResponse,
    OrgSupersetUpserted, UpdateDiscordNotificationsRequest, UpdateLlmOptinRequest,
    UpsertOrgSupersetRequest,
};
use crate::tools::{ToolVersionCollector, ToolVersionEntry};
use crate::types::metadata::org::OrgInfo;
use crate::types::metadata::org_preferences::{
    NewOrgPreferencesDTO, OrgPreferences, OrgPreferencesUpdate,
};
use crate::types::metadata::org_user::OrgUser;
use crate::types::metadata::services::org_plan::OrgPlanService;
use crate::types::metadata::services::org_preferences::OrgPreferencesService;
use crate::types::metadata::services::org_superset::OrgSupersetService;
use crate::types::metadata::services::org_user::OrgUserService;
use crate::{PreferencesApiError, PreferencesResult};
use chrono::Utc;
use tracing::info;

pub const PREFERENCES_EXIST: &str = "Organization preferences already exist";
pub const PREFERENCES_NOT_FOUND: &str = "Organization preferences not found";
pub const PREFERENCES_FOR_ORG_NOT_FOUND: &str = "Preferences for this organization not found";
pub const WEBHOOK_REQUIRED: &str = "Discord webhook is required to enable notifications.";
pub const SUPERSET_NOT_FOUND: &str = "Organizations superset details not found";
pub const PLAN_NOT_FOUND: &str = "Org's Plan not found";

/// Org-scoped preference operations. Every call acts on the actor's own org.
///
/// Permission checks live in front of the handlers, not here.
pub struct PreferencesApi {
    preferences: Box<dyn OrgPreferencesService + Send + Sync>,
    supersets: Box<dyn OrgSupersetService + Send + Sync>,
    plans: Box<dyn OrgPlanService + Send + Sync>,
    org_users: Box<dyn OrgUserService + Send + Sync>,
}

impl PreferencesApi {
    pub fn new(db_pool: DbPool) -> Self {
        Self {
            preferences: Box::new(OrgPreferencesServiceImpl::new(db_pool.clone())),
            supersets: Box::new(OrgSupersetServiceImpl::new(db_pool.clone())),
            plans: Box::new(OrgPlanServiceImpl::new(db_pool.clone())),
            org_users: Box::new(OrgUserServiceImpl::new(db_pool)),
        }
    }

    pub fn create_preferences(
        &self,
        actor: &OrgUser,
        request: CreateOrgPreferencesRequest,
    ) -> PreferencesResult<OrgPreferencesCreated> {
        let org = &actor.org;
        if self.preferences.get_by_org(&org.id)?.is_some() {
            return Err(PreferencesApiError::AlreadyExists(
                PREFERENCES_EXIST.to_string(),
            ));
        }

        if request.enable_discord_notifications && request.discord_webhook.is_none() {
            return Err(PreferencesApiError::ValidationError(
                WEBHOOK_REQUIRED.to_string(),
            ));
        }

        let (approved_by, optin_date) = if request.llm_optin {
            (Some(actor.id.clone()), Some(Utc::now()))
        } else {
            (None, None)
        };

        let created = self
            .preferences
            .create(
                &org.id,
                NewOrgPreferencesDTO {
                    llm_optin: request.llm_optin,
                    llm_optin_approved_by: approved_by,
                    llm_optin_date: optin_date,
                    enable_discord_notifications: request.enable_discord_notifications,
                    discord_webhook: request.discord_webhook,
                },
            )
            .map_err(|e| match e {
                // Lost a race with a concurrent create
                DatabaseError::UniqueViolation(_) => {
                    PreferencesApiError::AlreadyExists(PREFERENCES_EXIST.to_string())
                }
                e => e.into(),
            })?;

        info!("Created preferences for org {}", org.slug);

        Ok(OrgPreferencesCreated {
            llm_optin: created.llm_optin,
            llm_optin_approved_by: created.llm_optin_approved_by,
            llm_optin_date: created.llm_optin_date,
            enable_discord_notifications: created.enable_discord_notifications,
            discord_webhook: created.discord_webhook,
        })
    }

    fn existing_preferences(&self, actor: &OrgUser) -> PreferencesResult<OrgPreferences> {
        self.preferences
            .get_by_org(&actor.org.id)?
            .ok_or_else(|| {
                PreferencesApiError::ValidationError(PREFERENCES_FOR_ORG_NOT_FOUND.to_string())
            })
    }

    fn apply_update(
        &self,
        actor: &OrgUser,
        update: OrgPreferencesUpdate,
    ) -> PreferencesResult<OrgPreferences> {
        self.preferences
            .update(&actor.org.id, update)
            .map_err(|e| match e {
                e if e.is_not_found() => PreferencesApiError::ValidationError(
                    PREFERENCES_FOR_ORG_NOT_FOUND.to_string(),
                ),
                e => e.into(),
            })
    }

    pub fn update_llm_optin(
        &self,
        actor: &OrgUser,
        request: UpdateLlmOptinRequest,
    ) -> PreferencesResult<i32> {
        self.existing_preferences(actor)?;

        let update = if request.llm_optin {
            OrgPreferencesUpdate::LlmOptin {
                llm_optin: true,
                approved_by: Some(actor.id.clone()),
                optin_date: Some(Utc::now()),
            }
        } else {
            OrgPreferencesUpdate::LlmOptin {
                llm_optin: false,
                approved_by: None,
                optin_date: None,
            }
        };

        self.apply_update(actor, update)?;
        info!(
            "LLM opt-in set to {} for org {} by {}",
            request.llm_optin, actor.org.slug, actor.user.email
        );

        Ok(1)
    }

    pub fn update_discord_notifications(
        &self,
        actor: &OrgUser,
        request: UpdateDiscordNotificationsRequest,
    ) -> PreferencesResult<DiscordNotificationsResponse> {
        let existing = self.existing_preferences(actor)?;

        let webhook = if request.enable_discord_notifications {
            let resolved = request.discord_webhook.or(existing.discord_webhook);
            if resolved.is_none() {
                return Err(PreferencesApiError::ValidationError(
                    WEBHOOK_REQUIRED.to_string(),
                ));
            }
            resolved
        } else {
            None
        };

        let updated = self.apply_update(
            actor,
            OrgPreferencesUpdate::DiscordNotifications {
                enabled: request.enable_discord_notifications,
                webhook,
            },
        )?;
        info!(
            "Discord notifications set to {} for org {}",
            updated.enable_discord_notifications, actor.org.slug
        );

        Ok(DiscordNotificationsResponse {
            enable_discord_notifications: updated.enable_discord_notifications,
            discord_webhook: updated.discord_webhook,
        })
    }

    pub fn get_preferences(&self, actor: &OrgUser) -> PreferencesResult<OrgPreferencesResponse> {
        let prefs = self
            .preferences
            .get_by_org(&actor.org.id)?
            .ok_or_else(|| PreferencesApiError::NotFound(PREFERENCES_NOT_FOUND.to_string()))?;

        let approved_by = match prefs.llm_optin_approved_by.as_deref() {
            Some(org_user_id) => self
                .org_users
                .get_user_by_org_user_id(org_user_id)?
                .map(|user| ApprovedBy {
                    user_id: user.id,
                    email: user.email,
                }),
            None => None,
        };

        Ok(OrgPreferencesResponse {
            org: OrgInfo::from(&actor.org),
            llm_optin: prefs.llm_optin,
            llm_optin_approved_by: approved_by,
            llm_optin_date: prefs.llm_optin_date,
            enable_discord_notifications: prefs.enable_discord_notifications,
            discord_webhook: prefs.discord_webhook,
        })
    }

    pub fn get_superset_details(&self, actor: &OrgUser) -> PreferencesResult<OrgSupersetResponse> {
        let superset = self
            .supersets
            .get_by_org(&actor.org.id)?
            .ok_or_else(|| PreferencesApiError::ValidationError(SUPERSET_NOT_FOUND.to_string()))?;

        Ok(OrgSupersetResponse {
            org: OrgInfo::from(&actor.org),
            superset_version: superset.superset_version,
        })
    }

    pub fn upsert_superset_details(
        &self,
        actor: &OrgUser,
        request: UpsertOrgSupersetRequest,
    ) -> PreferencesResult<OrgSupersetUpserted> {
        let (superset, created) = self
            .supersets
            .upsert(&actor.org.id, &request.superset_version)?;
        info!(
            "Superset version {} recorded for org {}",
            superset.superset_version, actor.org.slug
        );

        Ok(OrgSupersetUpserted {
            org: OrgInfo::from(&actor.org),
            superset_version: superset.superset_version,
            created,
        })
    }

    pub async fn get_tool_versions(
        &self,
        actor: &OrgUser,
        collector: &ToolVersionCollector,
    ) -> PreferencesResult<Vec<ToolVersionEntry>> {
        let superset_version = self
            .supersets
            .get_by_org(&actor.org.id)?
            .map(|s| s.superset_version);

        Ok(collector.collect(superset_version).await?)
    }

    pub fn get_org_plan(&self, actor: &OrgUser) -> PreferencesResult<OrgPlanResponse> {
        let plan = self
            .plans
            .get_by_org(&actor.org.id)?
            .ok_or_else(|| PreferencesApiError::ValidationError(PLAN_NOT_FOUND.to_string()))?;

        Ok(OrgPlanResponse {
            org: OrgInfo::from(&actor.org),
            base_plan: plan.base_plan,
            superset_included: plan.superset_included,
            subscription_duration: plan.subscription_duration,
            features: plan.features,
            start_date: plan.start_date,
            end_date: plan.end_date,
            can_upgrade_plan: plan.can_upgrade_plan,
        })
    }
}
