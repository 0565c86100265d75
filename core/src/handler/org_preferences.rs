use crate::ok_envelope;
use crate::preferences::types::{
    CreateOrgPreferencesRequest, UpdateDiscordNotificationsRequest, UpdateLlmOptinRequest,
    UpsertOrgSupersetRequest,
};
use crate::preferences::PreferencesApi;
use crate::tools::ToolVersionCollector;
use crate::types::metadata::org_user::OrgUser;
use crate::PreferencesApiError;
use actix_web::{web, HttpResponse};
use validator::Validate;

pub async fn create_org_preferences(
    actor: web::ReqData<OrgUser>,
    payload: web::Json<CreateOrgPreferencesRequest>,
    api: web::Data<PreferencesApi>,
) -> Result<HttpResponse, PreferencesApiError> {
    let payload = payload.into_inner();
    payload.validate()?;

    ok_envelope!(api.create_preferences(&actor, payload))
}

pub async fn update_llm_optin(
    actor: web::ReqData<OrgUser>,
    payload: web::Json<UpdateLlmOptinRequest>,
    api: web::Data<PreferencesApi>,
) -> Result<HttpResponse, PreferencesApiError> {
    ok_envelope!(api.update_llm_optin(&actor, payload.into_inner()))
}

pub async fn update_discord_notifications(
    actor: web::ReqData<OrgUser>,
    payload: web::Json<UpdateDiscordNotificationsRequest>,
    api: web::Data<PreferencesApi>,
) -> Result<HttpResponse, PreferencesApiError> {
    let payload = payload.into_inner();
    payload.validate()?;

    ok_envelope!(api.update_discord_notifications(&actor, payload))
}

pub async fn get_org_preferences(
    actor: web::ReqData<OrgUser>,
    api: web::Data<PreferencesApi>,
) -> Result<HttpResponse, PreferencesApiError> {
    ok_envelope!(api.get_preferences(&actor))
}

pub async fn get_org_superset_details(
    actor: web::ReqData<OrgUser>,
    api: web::Data<PreferencesApi>,
) -> Result<HttpResponse, PreferencesApiError> {
    ok_envelope!(api.get_superset_details(&actor))
}

pub async fn upsert_org_superset_details(
    actor: web::ReqData<OrgUser>,
    payload: web::Json<UpsertOrgSupersetRequest>,
    api: web::Data<PreferencesApi>,
) -> Result<HttpResponse, PreferencesApiError> {
    let payload = payload.into_inner();
    payload.validate()?;

    ok_envelope!(api.upsert_superset_details(&actor, payload))
}

pub async fn get_tool_versions(
    actor: web::ReqData<OrgUser>,
    api: web::Data<PreferencesApi>,
    collector: web::Data<ToolVersionCollector>,
) -> Result<HttpResponse, PreferencesApiError> {
    ok_envelope!(api.get_tool_versions(&actor, &collector).await)
}

pub async fn get_org_plan(
    actor: web::ReqData<OrgUser>,
    api: web::Data<PreferencesApi>,
) -> Result<HttpResponse, PreferencesApiError> {
    ok_envelope!(api.get_org_plan(&actor))
}
