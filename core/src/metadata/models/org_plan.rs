use crate::metadata::schema::org_plans;
use crate::metadata::utils::parse_timestamp;
use crate::types::metadata::org_plan::OrgPlan;
use diesel::dsl;
use diesel::helper_types::AsSelect;
use diesel::helper_types::Select;
use diesel::sqlite::Sqlite;
use diesel::ExpressionMethods;
use diesel::QueryDsl;
use diesel::SelectableHelper;
use diesel::{Identifiable, Insertable, Queryable, Selectable};
use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(
    Selectable, Queryable, PartialEq, Eq, Debug, Clone, Serialize, Deserialize, Identifiable,
)]
#[serde(crate = "serde")]
#[diesel(table_name = org_plans)]
pub struct DbOrgPlan {
    pub id: String,
    pub org_id: String,
    pub base_plan: String,
    pub superset_included: Option<i32>,
    pub subscription_duration: String,
    pub features: Option<String>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    pub can_upgrade_plan: i32,
    pub created_at: String,
    pub updated_at: String,
}

type All = Select<org_plans::table, AsSelect<DbOrgPlan, Sqlite>>;

impl DbOrgPlan {
    pub fn all() -> All {
        org_plans::table.select(DbOrgPlan::as_select())
    }

    pub fn by_org(org_id: &str) -> dsl::Filter<All, dsl::Eq<org_plans::org_id, &str>> {
        DbOrgPlan::all().filter(org_plans::org_id.eq(org_id))
    }

    pub fn parse_features(&self) -> Option<Value> {
        self.features
            .as_deref()
            .and_then(|s| serde_json::from_str::<Value>(s).ok())
    }
}

impl From<DbOrgPlan> for OrgPlan {
    fn from(val: DbOrgPlan) -> Self {
        let features = val.parse_features();
        OrgPlan {
            id: val.id,
            org_id: val.org_id,
            base_plan: val.base_plan,
            superset_included: val.superset_included.map(|v| v != 0),
            subscription_duration: val.subscription_duration,
            features,
            start_date: val.start_date.as_deref().and_then(parse_timestamp),
            end_date: val.end_date.as_deref().and_then(parse_timestamp),
            can_upgrade_plan: val.can_upgrade_plan != 0,
        }
    }
}

#[derive(Insertable, PartialEq, Debug)]
#[diesel(table_name = org_plans)]
pub struct DbNewOrgPlan {
    pub id: String,
    pub org_id: String,
    pub base_plan: String,
    pub superset_included: Option<i32>,
    pub subscription_duration: String,
    pub features: Option<String>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    pub can_upgrade_plan: i32,
    pub created_at: String,
    pub updated_at: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_plan() -> DbOrgPlan {
        DbOrgPlan {
            id: "plan-1".to_string(),
            org_id: "org-1".to_string(),
            base_plan: "Dalgo".to_string(),
            superset_included: Some(1),
            subscription_duration: "monthly".to_string(),
            features: Some(r#"{"pipeline": ["Ingest", "Transform"]}"#.to_string()),
            start_date: Some("2024-01-01T00:00:00Z".to_string()),
            end_date: None,
            can_upgrade_plan: 0,
            created_at: "2024-01-01T00:00:00Z".to_string(),
            updated_at: "2024-01-01T00:00:00Z".to_string(),
        }
    }

    #[test]
    fn test_features_parse_as_json() {
        let plan: OrgPlan = test_plan().into();
        assert_eq!(
            plan.features,
            Some(serde_json::json!({"pipeline": ["Ingest", "Transform"]}))
        );
        assert_eq!(plan.superset_included, Some(true));
        assert!(!plan.can_upgrade_plan);
        assert!(plan.end_date.is_none());
    }

    #[test]
    fn test_malformed_features_are_dropped() {
        let mut row = test_plan();
        row.features = Some("{not json".to_string());
        assert!(row.parse_features().is_none());
    }
}
