use crate::metadata::schema::org_supersets;
use crate::metadata::utils::parse_timestamp;
use crate::types::metadata::org_superset::OrgSuperset;
use diesel::dsl;
use diesel::helper_types::AsSelect;
use diesel::helper_types::Select;
use diesel::sqlite::Sqlite;
use diesel::ExpressionMethods;
use diesel::QueryDsl;
use diesel::SelectableHelper;
use diesel::{Identifiable, Insertable, Queryable, Selectable};
use serde::{Deserialize, Serialize};

#[derive(
    Selectable, Queryable, PartialEq, Eq, Debug, Clone, Serialize, Deserialize, Identifiable,
)]
#[serde(crate = "serde")]
#[diesel(table_name = org_supersets)]
pub struct DbOrgSuperset {
    pub id: String,
    pub org_id: String,
    pub superset_version: String,
    pub created_at: String,
    pub updated_at: String,
}

type All = Select<org_supersets::table, AsSelect<DbOrgSuperset, Sqlite>>;

impl DbOrgSuperset {
    pub fn all() -> All {
        org_supersets::table.select(DbOrgSuperset::as_select())
    }

    pub fn by_org(org_id: &str) -> dsl::Filter<All, dsl::Eq<org_supersets::org_id, &str>> {
        DbOrgSuperset::all().filter(org_supersets::org_id.eq(org_id))
    }
}

impl From<DbOrgSuperset> for OrgSuperset {
    fn from(val: DbOrgSuperset) -> Self {
        OrgSuperset {
            id: val.id,
            org_id: val.org_id,
            superset_version: val.superset_version,
            created_at: parse_timestamp(&val.created_at).unwrap_or_default(),
            updated_at: parse_timestamp(&val.updated_at).unwrap_or_default(),
        }
    }
}

#[derive(Insertable, PartialEq, Debug)]
#[diesel(table_name = org_supersets)]
pub struct DbNewOrgSuperset {
    pub id: String,
    pub org_id: String,
    pub superset_version: String,
    pub created_at: String,
    pub updated_at: String,
}
