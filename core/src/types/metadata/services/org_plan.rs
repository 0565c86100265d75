use crate::metadata::error::DatabaseError;
use crate::types::metadata::org_plan::{NewOrgPlanDTO, OrgPlan};

pub trait OrgPlanService {
    fn get_by_org(&self, org_id: &str) -> Result<Option<OrgPlan>, DatabaseError>;
    fn create(&self, org_id: &str, plan: NewOrgPlanDTO) -> Result<OrgPlan, DatabaseError>;
}
