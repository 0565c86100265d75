use crate::metadata::error::DatabaseError;
use crate::metadata::models::org_plan::{DbNewOrgPlan, DbOrgPlan};
use crate::metadata::pool::DbPool;
use crate::metadata::schema::org_plans;
use crate::metadata::utils::{format_timestamp, now_timestamp};
use crate::types::metadata::org_plan::{NewOrgPlanDTO, OrgPlan};
use crate::types::metadata::services::org_plan::OrgPlanService;
use diesel::OptionalExtension;
use diesel::RunQueryDsl;
use uuid::Uuid;

pub struct OrgPlanServiceImpl {
    db_pool: DbPool,
}

impl OrgPlanServiceImpl {
    pub fn new(db_pool: DbPool) -> Self {
        Self { db_pool }
    }
}

impl OrgPlanService for OrgPlanServiceImpl {
    fn get_by_org(&self, org_id: &str) -> Result<Option<OrgPlan>, DatabaseError> {
        let mut conn = self.db_pool.get()?;
        let plan = DbOrgPlan::by_org(org_id)
            .first::<DbOrgPlan>(&mut conn)
            .optional()?;

        Ok(plan.map(OrgPlan::from))
    }

    fn create(&self, org_id: &str, plan: NewOrgPlanDTO) -> Result<OrgPlan, DatabaseError> {
        let mut conn = self.db_pool.get()?;

        let features = plan
            .features
            .as_ref()
            .map(serde_json::to_string)
            .transpose()?;
        let now = now_timestamp();

        let db_new = DbNewOrgPlan {
            id: Uuid::new_v4().to_string(),
            org_id: org_id.to_string(),
            base_plan: plan.base_plan,
            superset_included: plan.superset_included.map(|v| v as i32),
            subscription_duration: plan.subscription_duration,
            features,
            start_date: plan.start_date.as_ref().map(format_timestamp),
            end_date: plan.end_date.as_ref().map(format_timestamp),
            can_upgrade_plan: plan.can_upgrade_plan as i32,
            created_at: now.clone(),
            updated_at: now,
        };

        diesel::insert_into(org_plans::table)
            .values(&db_new)
            .execute(&mut conn)
            .map_err(DatabaseError::from_insert)?;

        let inserted = DbOrgPlan::by_org(org_id).first::<DbOrgPlan>(&mut conn)?;

        Ok(inserted.into())
    }
}
