use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct OrgPlan {
    pub id: String,
    pub org_id: String,
    pub base_plan: String,
    pub superset_included: Option<bool>,
    pub subscription_duration: String,
    pub features: Option<Value>,
    pub start_date: Option<DateTime<Utc>>,
    pub end_date: Option<DateTime<Utc>>,
    pub can_upgrade_plan: bool,
}

#[derive(PartialEq, Debug, Serialize, Deserialize, Clone)]
pub struct NewOrgPlanDTO {
    pub base_plan: String,
    #[serde(default)]
    pub superset_included: Option<bool>,
    pub subscription_duration: String,
    #[serde(default)]
    pub features: Option<Value>,
    #[serde(default)]
    pub start_date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub end_date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub can_upgrade_plan: bool,
}
