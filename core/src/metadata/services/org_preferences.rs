use crate::metadata::error::DatabaseError;
use crate::metadata::models::org_preferences::{
    DbNewOrgPreferences, DbOrgPreferences, DbOrgPreferencesChangeset,
};
use crate::metadata::pool::DbPool;
use crate::metadata::schema::org_preferences;
use crate::metadata::utils::{format_timestamp, now_timestamp};
use crate::types::metadata::org_preferences::{
    NewOrgPreferencesDTO, OrgPreferences, OrgPreferencesUpdate,
};
use crate::types::metadata::services::org_preferences::OrgPreferencesService;
use diesel::ExpressionMethods;
use diesel::OptionalExtension;
use diesel::RunQueryDsl;
use uuid::Uuid;

pub struct OrgPreferencesServiceImpl {
    db_pool: DbPool,
}

impl OrgPreferencesServiceImpl {
    pub fn new(db_pool: DbPool) -> Self {
        Self { db_pool }
    }
}

impl OrgPreferencesService for OrgPreferencesServiceImpl {
    fn get_by_org(&self, org_id: &str) -> Result<Option<OrgPreferences>, DatabaseError> {
        let mut conn = self.db_pool.get()?;
        let prefs = DbOrgPreferences::by_org(org_id)
            .first::<DbOrgPreferences>(&mut conn)
            .optional()?;

        Ok(prefs.map(OrgPreferences::from))
    }

    fn create(
        &self,
        org_id: &str,
        prefs: NewOrgPreferencesDTO,
    ) -> Result<OrgPreferences, DatabaseError> {
        let mut conn = self.db_pool.get()?;
        let now = now_timestamp();

        let db_new = DbNewOrgPreferences {
            id: Uuid::new_v4().to_string(),
            org_id: org_id.to_string(),
            llm_optin: prefs.llm_optin as i32,
            llm_optin_approved_by_id: prefs.llm_optin_approved_by,
            llm_optin_date: prefs.llm_optin_date.as_ref().map(format_timestamp),
            enable_discord_notifications: prefs.enable_discord_notifications as i32,
            discord_webhook: prefs.discord_webhook,
            created_at: now.clone(),
            updated_at: now,
        };

        diesel::insert_into(org_preferences::table)
            .values(&db_new)
            .execute(&mut conn)
            .map_err(DatabaseError::from_insert)?;

        let inserted = DbOrgPreferences::by_org(org_id).first::<DbOrgPreferences>(&mut conn)?;

        Ok(inserted.into())
    }

    fn update(
        &self,
        org_id: &str,
        update: OrgPreferencesUpdate,
    ) -> Result<OrgPreferences, DatabaseError> {
        let mut conn = self.db_pool.get()?;
        let target = diesel::update(org_preferences::table)
            .filter(org_preferences::org_id.eq(org_id));

        let updated_rows = match DbOrgPreferencesChangeset::new(update, now_timestamp()) {
            DbOrgPreferencesChangeset::LlmOptin(changeset) => {
                target.set(&changeset).execute(&mut conn)?
            }
            DbOrgPreferencesChangeset::DiscordNotifications(changeset) => {
                target.set(&changeset).execute(&mut conn)?
            }
        };

        if updated_rows == 0 {
            return Err(DatabaseError::QueryError(diesel::result::Error::NotFound));
        }

        let updated = DbOrgPreferences::by_org(org_id).first::<DbOrgPreferences>(&mut conn)?;

        Ok(updated.into())
    }
}
