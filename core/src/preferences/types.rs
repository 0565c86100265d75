use crate::types::metadata::org::OrgInfo;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use validator::Validate;

fn empty_string_as_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<String>::deserialize(deserializer)?;
    Ok(value.filter(|s| !s.trim().is_empty()))
}

#[derive(Debug, Clone, Deserialize, Validate, Default)]
pub struct CreateOrgPreferencesRequest {
    #[serde(default)]
    pub llm_optin: bool,
    #[serde(default)]
    pub enable_discord_notifications: bool,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    #[validate(url)]
    pub discord_webhook: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct UpdateLlmOptinRequest {
    pub llm_optin: bool,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct UpdateDiscordNotificationsRequest {
    pub enable_discord_notifications: bool,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    #[validate(url)]
    pub discord_webhook: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct UpsertOrgSupersetRequest {
    #[validate(length(min = 1, message = "superset_version must not be empty"))]
    pub superset_version: String,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct OrgPreferencesCreated {
    pub llm_optin: bool,
    /// Id of the approving org user.
    pub llm_optin_approved_by: Option<String>,
    pub llm_optin_date: Option<DateTime<Utc>>,
    pub enable_discord_notifications: bool,
    pub discord_webhook: Option<String>,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct DiscordNotificationsResponse {
    pub enable_discord_notifications: bool,
    pub discord_webhook: Option<String>,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ApprovedBy {
    pub user_id: String,
    pub email: String,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct OrgPreferencesResponse {
    pub org: OrgInfo,
    pub llm_optin: bool,
    pub llm_optin_approved_by: Option<ApprovedBy>,
    pub llm_optin_date: Option<DateTime<Utc>>,
    pub enable_discord_notifications: bool,
    pub discord_webhook: Option<String>,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct OrgSupersetResponse {
    pub org: OrgInfo,
    pub superset_version: String,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct OrgSupersetUpserted {
    pub org: OrgInfo,
    pub superset_version: String,
    pub created: bool,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct OrgPlanResponse {
    pub org: OrgInfo,
    pub base_plan: String,
    pub superset_included: Option<bool>,
    pub subscription_duration: String,
    pub features: Option<Value>,
    pub start_date: Option<DateTime<Utc>>,
    pub end_date: Option<DateTime<Utc>>,
    pub can_upgrade_plan: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_create_request_defaults() {
        let request: CreateOrgPreferencesRequest = serde_json::from_value(json!({})).unwrap();
        assert!(!request.llm_optin);
        assert!(!request.enable_discord_notifications);
        assert!(request.discord_webhook.is_none());
        assert!(request.validate().is_ok());
    }

    #[test]
    fn test_empty_webhook_is_absent() {
        let request: UpdateDiscordNotificationsRequest = serde_json::from_value(json!({
            "enable_discord_notifications": true,
            "discord_webhook": ""
        }))
        .unwrap();
        assert!(request.discord_webhook.is_none());
        assert!(request.validate().is_ok());
    }

    #[test]
    fn test_invalid_webhook_fails_validation() {
        let request: UpdateDiscordNotificationsRequest = serde_json::from_value(json!({
            "enable_discord_notifications": true,
            "discord_webhook": "not-a-url"
        }))
        .unwrap();
        assert!(request.validate().is_err());
    }

    #[test]
    fn test_empty_superset_version_fails_validation() {
        let request = UpsertOrgSupersetRequest {
            superset_version: String::new(),
        };
        assert!(request.validate().is_err());
    }

    #[test]
    fn test_llm_optin_flag_is_required() {
        let parsed: Result<UpdateLlmOptinRequest, _> = serde_json::from_value(json!({}));
        assert!(parsed.is_err());

        let request: UpdateLlmOptinRequest =
            serde_json::from_value(json!({"llm_optin": true})).unwrap();
        assert!(request.llm_optin);
    }
}
