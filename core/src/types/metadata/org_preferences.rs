use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct OrgPreferences {
    pub id: String,
    pub org_id: String,
    pub llm_optin: bool,
    /// Org user that approved the opt-in.
    pub llm_optin_approved_by: Option<String>,
    pub llm_optin_date: Option<DateTime<Utc>>,
    pub enable_discord_notifications: bool,
    pub discord_webhook: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(PartialEq, Debug, Serialize, Deserialize, Default, Clone)]
pub struct NewOrgPreferencesDTO {
    pub llm_optin: bool,
    pub llm_optin_approved_by: Option<String>,
    pub llm_optin_date: Option<DateTime<Utc>>,
    pub enable_discord_notifications: bool,
    pub discord_webhook: Option<String>,
}

/// A full overwrite of one group of preference columns.
/// `None` values are written as NULL.
#[derive(PartialEq, Debug, Clone)]
pub enum OrgPreferencesUpdate {
    LlmOptin {
        llm_optin: bool,
        approved_by: Option<String>,
        optin_date: Option<DateTime<Utc>>,
    },
    DiscordNotifications {
        enabled: bool,
        webhook: Option<String>,
    },
}
