use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct Org {
    pub id: String,
    pub name: String,
    pub slug: String,
    pub r#type: String,
    pub created_at: DateTime<Utc>,
}

/// Identity fields of an org, as embedded in response payloads.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct OrgInfo {
    pub name: String,
    pub slug: String,
    pub r#type: String,
}

impl From<&Org> for OrgInfo {
    fn from(org: &Org) -> Self {
        Self {
            name: org.name.clone(),
            slug: org.slug.clone(),
            r#type: org.r#type.clone(),
        }
    }
}

#[derive(PartialEq, Debug, Serialize, Deserialize, Clone)]
pub struct NewOrgDTO {
    pub name: String,
    pub slug: String,
    #[serde(default = "default_org_type")]
    pub r#type: String,
}

fn default_org_type() -> String {
    "client".to_string()
}
