use crate::metadata::schema::org_preferences;
use crate::metadata::utils::{format_timestamp, parse_timestamp};
use crate::types::metadata::org_preferences::{OrgPreferences, OrgPreferencesUpdate};
use diesel::dsl;
use diesel::helper_types::AsSelect;
use diesel::helper_types::Select;
use diesel::sqlite::Sqlite;
use diesel::ExpressionMethods;
use diesel::QueryDsl;
use diesel::SelectableHelper;
use diesel::{AsChangeset, Identifiable, Insertable, Queryable, Selectable};
use serde::{Deserialize, Serialize};

#[derive(
    Selectable, Queryable, PartialEq, Eq, Debug, Clone, Serialize, Deserialize, Identifiable,
)]
#[serde(crate = "serde")]
#[diesel(table_name = org_preferences)]
pub struct DbOrgPreferences {
    pub id: String,
    pub org_id: String,
    pub llm_optin: i32,
    pub llm_optin_approved_by_id: Option<String>,
    pub llm_optin_date: Option<String>,
    pub enable_discord_notifications: i32,
    pub discord_webhook: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

type All = Select<org_preferences::table, AsSelect<DbOrgPreferences, Sqlite>>;

impl DbOrgPreferences {
    pub fn all() -> All {
        org_preferences::table.select(DbOrgPreferences::as_select())
    }

    pub fn by_org(org_id: &str) -> dsl::Filter<All, dsl::Eq<org_preferences::org_id, &str>> {
        DbOrgPreferences::all().filter(org_preferences::org_id.eq(org_id))
    }
}

impl From<DbOrgPreferences> for OrgPreferences {
    fn from(val: DbOrgPreferences) -> Self {
        OrgPreferences {
            id: val.id,
            org_id: val.org_id,
            llm_optin: val.llm_optin != 0,
            llm_optin_approved_by: val.llm_optin_approved_by_id,
            llm_optin_date: val.llm_optin_date.as_deref().and_then(parse_timestamp),
            enable_discord_notifications: val.enable_discord_notifications != 0,
            discord_webhook: val.discord_webhook,
            created_at: parse_timestamp(&val.created_at).unwrap_or_default(),
            updated_at: parse_timestamp(&val.updated_at).unwrap_or_default(),
        }
    }
}

#[derive(Insertable, PartialEq, Debug, Serialize, Deserialize)]
#[serde(crate = "serde")]
#[diesel(table_name = org_preferences)]
pub struct DbNewOrgPreferences {
    pub id: String,
    pub org_id: String,
    pub llm_optin: i32,
    pub llm_optin_approved_by_id: Option<String>,
    pub llm_optin_date: Option<String>,
    pub enable_discord_notifications: i32,
    pub discord_webhook: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

#[derive(AsChangeset, PartialEq, Debug)]
#[diesel(table_name = org_preferences, treat_none_as_null = true)]
pub struct DbUpdateLlmOptin {
    pub llm_optin: i32,
    pub llm_optin_approved_by_id: Option<String>,
    pub llm_optin_date: Option<String>,
    pub updated_at: String,
}

#[derive(AsChangeset, PartialEq, Debug)]
#[diesel(table_name = org_preferences, treat_none_as_null = true)]
pub struct DbUpdateDiscordNotifications {
    pub enable_discord_notifications: i32,
    pub discord_webhook: Option<String>,
    pub updated_at: String,
}

pub enum DbOrgPreferencesChangeset {
    LlmOptin(DbUpdateLlmOptin),
    DiscordNotifications(DbUpdateDiscordNotifications),
}

impl DbOrgPreferencesChangeset {
    pub fn new(update: OrgPreferencesUpdate, updated_at: String) -> Self {
        match update {
            OrgPreferencesUpdate::LlmOptin {
                llm_optin,
                approved_by,
                optin_date,
            } => DbOrgPreferencesChangeset::LlmOptin(DbUpdateLlmOptin {
                llm_optin: llm_optin as i32,
                llm_optin_approved_by_id: approved_by,
                llm_optin_date: optin_date.as_ref().map(format_timestamp),
                updated_at,
            }),
            OrgPreferencesUpdate::DiscordNotifications { enabled, webhook } => {
                DbOrgPreferencesChangeset::DiscordNotifications(DbUpdateDiscordNotifications {
                    enable_discord_notifications: enabled as i32,
                    discord_webhook: webhook,
                    updated_at,
                })
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    #[test]
    fn test_llm_optin_changeset_clears_approval() {
        let changeset = DbOrgPreferencesChangeset::new(
            OrgPreferencesUpdate::LlmOptin {
                llm_optin: false,
                approved_by: None,
                optin_date: None,
            },
            "2024-09-18T12:25:00.000000Z".to_string(),
        );

        match changeset {
            DbOrgPreferencesChangeset::LlmOptin(c) => {
                assert_eq!(c.llm_optin, 0);
                assert!(c.llm_optin_approved_by_id.is_none());
                assert!(c.llm_optin_date.is_none());
            }
            _ => panic!("Expected an llm opt-in changeset"),
        }
    }

    #[test]
    fn test_llm_optin_changeset_formats_date() {
        let now = Utc::now();
        let changeset = DbOrgPreferencesChangeset::new(
            OrgPreferencesUpdate::LlmOptin {
                llm_optin: true,
                approved_by: Some("org-user-1".to_string()),
                optin_date: Some(now),
            },
            format_timestamp(&now),
        );

        match changeset {
            DbOrgPreferencesChangeset::LlmOptin(c) => {
                assert_eq!(c.llm_optin, 1);
                assert_eq!(c.llm_optin_approved_by_id.as_deref(), Some("org-user-1"));
                assert_eq!(c.llm_optin_date, Some(format_timestamp(&now)));
            }
            _ => panic!("Expected an llm opt-in changeset"),
        }
    }

    #[test]
    fn test_db_row_into_domain() {
        let row = DbOrgPreferences {
            id: "p1".to_string(),
            org_id: "o1".to_string(),
            llm_optin: 1,
            llm_optin_approved_by_id: Some("ou1".to_string()),
            llm_optin_date: Some("2024-09-18T12:25:00.000000Z".to_string()),
            enable_discord_notifications: 0,
            discord_webhook: None,
            created_at: "2024-09-18T12:25:00.000000Z".to_string(),
            updated_at: "2024-09-18T12:25:00.000000Z".to_string(),
        };

        let prefs: OrgPreferences = row.into();
        assert!(prefs.llm_optin);
        assert!(!prefs.enable_discord_notifications);
        assert_eq!(prefs.llm_optin_approved_by.as_deref(), Some("ou1"));
        assert_eq!(
            prefs.llm_optin_date.map(|d| d.to_rfc3339()),
            Some("2024-09-18T12:25:00+00:00".to_string())
        );
    }
}
