use crate::metadata::schema::orgs;
use crate::metadata::utils::parse_timestamp;
use crate::types::metadata::org::Org;
use diesel::helper_types::AsSelect;
use diesel::helper_types::Select;
use diesel::sqlite::Sqlite;
use diesel::QueryDsl;
use diesel::SelectableHelper;
use diesel::{Identifiable, Insertable, Queryable, Selectable};
use serde::{Deserialize, Serialize};

#[derive(
    Selectable, Queryable, PartialEq, Eq, Debug, Clone, Serialize, Deserialize, Identifiable,
)]
#[serde(crate = "serde")]
#[diesel(table_name = orgs)]
pub struct DbOrg {
    pub id: String,
    pub name: String,
    pub slug: String,
    pub r#type: String,
    pub created_at: String,
}

type All = Select<orgs::table, AsSelect<DbOrg, Sqlite>>;

impl DbOrg {
    pub fn all() -> All {
        orgs::table.select(DbOrg::as_select())
    }
}

impl From<DbOrg> for Org {
    fn from(val: DbOrg) -> Self {
        Org {
            created_at: parse_timestamp(&val.created_at).unwrap_or_default(),
            id: val.id,
            name: val.name,
            slug: val.slug,
            r#type: val.r#type,
        }
    }
}

#[derive(Insertable, PartialEq, Debug, Serialize, Deserialize)]
#[serde(crate = "serde")]
#[diesel(table_name = orgs)]
pub struct DbNewOrg {
    pub id: String,
    pub name: String,
    pub slug: String,
    pub r#type: String,
    pub created_at: String,
}
