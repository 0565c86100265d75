use crate::config::Config;
use crate::middleware::trace_logger::TraceLogger;
use actix_cors::Cors;
use actix_web::error::InternalError;
use actix_web::web::JsonConfig;
use actix_web::Scope as ActixScope;
use actix_web::{
    body::MessageBody,
    dev::{ServiceFactory, ServiceRequest, ServiceResponse},
    web::{self, Data},
    App, HttpResponse, HttpServer,
};
use futures::{Future, TryFutureExt};
use prefpanel_core::auth::AuthConfig;
use prefpanel_core::handler::middleware::org_user::OrgUserMiddleware;
use prefpanel_core::handler::middleware::permission::{
    PermissionGuard, CAN_EDIT_DISCORD_NOTIFICATIONS_SETTINGS, CAN_EDIT_LLM_SETTINGS,
};
use prefpanel_core::handler::org_preferences;
use prefpanel_core::metadata::pool::DbPool;
use prefpanel_core::preferences::PreferencesApi;
use prefpanel_core::tools::{ToolVersionCollector, ToolVersionError};
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::sync::Arc;
use thiserror::Error;
use tracing::info;

#[derive(Debug, Serialize, Deserialize, Eq, PartialEq, Clone)]
pub enum CorsOptions {
    Permissive,
    Custom(Vec<String>, usize),
}

impl CorsOptions {
    pub fn from_origins(origins: &[String]) -> Self {
        if origins.is_empty() || origins.iter().any(|o| o == "*") {
            CorsOptions::Permissive
        } else {
            CorsOptions::Custom(origins.to_vec(), 3600)
        }
    }
}

#[derive(Error, Debug)]
pub enum ServerError {
    #[error(transparent)]
    Actix(#[from] std::io::Error),
    #[error(transparent)]
    ToolVersion(#[from] ToolVersionError),
}

#[derive(Clone)]
pub struct ApiServer {
    config: Config,
    db_pool: DbPool,
}

impl ApiServer {
    pub fn new(config: Config, db_pool: DbPool) -> Self {
        Self { config, db_pool }
    }

    pub fn start(self) -> Result<impl Future<Output = Result<(), ServerError>>, ServerError> {
        let collector = ToolVersionCollector::from_config(&self.config.tools)?;
        let auth = Arc::new(self.config.auth.clone());
        let cors_options = CorsOptions::from_origins(&self.config.http.cors_allowed_origins);
        let db_pool = self.db_pool.clone();

        let server = HttpServer::new(move || {
            Self::create_app_entry(
                Self::get_cors(cors_options.clone()),
                db_pool.clone(),
                auth.clone(),
                collector.clone(),
            )
        })
        .bind((self.config.http.host.as_str(), self.config.http.port))?
        .run()
        .map_err(ServerError::Actix);

        info!(
            "Preferences API listening on http://{}:{}",
            self.config.http.host, self.config.http.port
        );

        Ok(server)
    }

    fn create_app_entry(
        cors: Cors,
        db_pool: DbPool,
        auth: Arc<AuthConfig>,
        collector: ToolVersionCollector,
    ) -> App<
        impl ServiceFactory<
            ServiceRequest,
            Response = ServiceResponse<impl MessageBody>,
            Config = (),
            InitError = (),
            Error = actix_web::Error,
        >,
    > {
        let json_config = JsonConfig::default()
            .limit(1024 * 1024)
            .error_handler(|err, _req| {
                let detail = err.to_string();
                InternalError::from_response(
                    err,
                    HttpResponse::BadRequest().json(json!({ "detail": detail })),
                )
                .into()
            });

        App::new()
            .wrap(TraceLogger)
            .wrap(cors)
            .app_data(json_config)
            .app_data(Data::new(db_pool.clone()))
            .app_data(Data::new(PreferencesApi::new(db_pool)))
            .app_data(Data::new(collector))
            .route("/health", web::get().to(health))
            .service(Self::attach_preferences_routes(
                web::scope("/api/orgpreferences"),
                auth,
            ))
    }

    fn get_cors(cors: CorsOptions) -> Cors {
        match cors {
            CorsOptions::Permissive => Cors::permissive(),
            CorsOptions::Custom(origins, max_age) => origins
                .into_iter()
                .fold(Cors::default(), |cors, origin| cors.allowed_origin(&origin))
                .allow_any_method()
                .allow_any_header()
                .max_age(max_age),
        }
    }

    fn attach_preferences_routes(
        scope: ActixScope,
        auth: Arc<AuthConfig>,
    ) -> ActixScope<
        impl ServiceFactory<
                ServiceRequest,
                Config = (),
                Response = ServiceResponse<impl MessageBody + 'static>,
                Error = actix_web::Error,
                InitError = (),
            > + 'static,
    > {
        scope
            .wrap(OrgUserMiddleware::new(auth))
            .service(
                web::resource(["", "/"])
                    .route(web::post().to(org_preferences::create_org_preferences))
                    .route(web::get().to(org_preferences::get_org_preferences)),
            )
            .service(
                web::resource("/llm_approval")
                    .wrap(PermissionGuard::new(&[CAN_EDIT_LLM_SETTINGS]))
                    .route(web::put().to(org_preferences::update_llm_optin)),
            )
            .service(
                web::resource("/enable-discord-notifications")
                    .wrap(PermissionGuard::new(&[
                        CAN_EDIT_DISCORD_NOTIFICATIONS_SETTINGS,
                    ]))
                    .route(web::put().to(org_preferences::update_discord_notifications)),
            )
            .service(
                web::resource("/org-superset")
                    .route(web::get().to(org_preferences::get_org_superset_details))
                    .route(web::post().to(org_preferences::upsert_org_superset_details)),
            )
            .route(
                "/toolinfo",
                web::get().to(org_preferences::get_tool_versions),
            )
            .route("/org-plan", web::get().to(org_preferences::get_org_plan))
    }
}

async fn health() -> HttpResponse {
    HttpResponse::Ok().json(json!({ "status": "ok" }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::db::setup_test_database;
    use actix_web::http::header::AUTHORIZATION;
    use actix_web::test;
    use prefpanel_core::auth::encode_token;
    use prefpanel_core::metadata::services::org::OrgServiceImpl;
    use prefpanel_core::metadata::services::org_user::OrgUserServiceImpl;
    use prefpanel_core::tools::ToolsConfig;
    use prefpanel_core::types::metadata::org::NewOrgDTO;
    use prefpanel_core::types::metadata::services::org::OrgService;
    use prefpanel_core::types::metadata::services::org_user::OrgUserService;
    use serde_json::Value;

    fn auth() -> Arc<AuthConfig> {
        Arc::new(AuthConfig {
            jwt_secret: "http-test-secret".to_string(),
        })
    }

    /// Seeds an org with one member per role slug and returns a bearer header for each.
    fn seed_members(db_pool: &DbPool, roles: &[&str]) -> Vec<String> {
        let org = OrgServiceImpl::new(db_pool.clone())
            .create(NewOrgDTO {
                name: "Acme".to_string(),
                slug: "acme".to_string(),
                r#type: "client".to_string(),
            })
            .unwrap();
        let org_users = OrgUserServiceImpl::new(db_pool.clone());

        roles
            .iter()
            .map(|role| {
                let user = org_users.create_user(&format!("{role}@acme.org")).unwrap();
                org_users.add_org_user(&user.id, &org.id, role).unwrap();
                let token =
                    encode_token(&auth(), &user.id, "acme", chrono::Duration::hours(1)).unwrap();
                format!("Bearer {token}")
            })
            .collect()
    }

    macro_rules! test_app {
        ($db_pool:expr) => {
            test::init_service(ApiServer::create_app_entry(
                ApiServer::get_cors(CorsOptions::Permissive),
                $db_pool.clone(),
                auth(),
                ToolVersionCollector::from_config(&ToolsConfig::default()).unwrap(),
            ))
            .await
        };
    }

    #[actix_web::test]
    async fn test_health_is_public() {
        let db_pool = setup_test_database();
        let app = test_app!(db_pool);

        let req = test::TestRequest::get().uri("/health").to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), 200);
    }

    #[actix_web::test]
    async fn test_routes_require_token() {
        let db_pool = setup_test_database();
        let app = test_app!(db_pool);

        let req = test::TestRequest::get()
            .uri("/api/orgpreferences/")
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), 401);
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body, json!({"detail": "Unauthorized"}));
    }

    #[actix_web::test]
    async fn test_llm_approval_is_guarded() {
        let db_pool = setup_test_database();
        let tokens = seed_members(&db_pool, &["account-manager", "analyst"]);
        let (manager, analyst) = (&tokens[0], &tokens[1]);
        let app = test_app!(db_pool);

        let req = test::TestRequest::post()
            .uri("/api/orgpreferences/")
            .insert_header((AUTHORIZATION, analyst.as_str()))
            .set_json(json!({}))
            .to_request();
        assert_eq!(test::call_service(&app, req).await.status(), 200);

        let req = test::TestRequest::put()
            .uri("/api/orgpreferences/llm_approval")
            .insert_header((AUTHORIZATION, analyst.as_str()))
            .set_json(json!({"llm_optin": true}))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), 403);
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body, json!({"detail": "unauthorized"}));

        let req = test::TestRequest::put()
            .uri("/api/orgpreferences/llm_approval")
            .insert_header((AUTHORIZATION, manager.as_str()))
            .set_json(json!({"llm_optin": true}))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), 200);
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body, json!({"success": true, "res": 1}));

        let req = test::TestRequest::get()
            .uri("/api/orgpreferences/")
            .insert_header((AUTHORIZATION, analyst.as_str()))
            .to_request();
        let body: Value = test::read_body_json(test::call_service(&app, req).await).await;
        assert_eq!(body["res"]["llm_optin"], json!(true));
        assert_eq!(
            body["res"]["llm_optin_approved_by"]["email"],
            json!("account-manager@acme.org")
        );
    }

    #[actix_web::test]
    async fn test_discord_guard_and_validation() {
        let db_pool = setup_test_database();
        let tokens = seed_members(&db_pool, &["pipeline-manager", "guest"]);
        let (pipeline_manager, guest) = (&tokens[0], &tokens[1]);
        let app = test_app!(db_pool);

        let req = test::TestRequest::post()
            .uri("/api/orgpreferences")
            .insert_header((AUTHORIZATION, guest.as_str()))
            .set_json(json!({}))
            .to_request();
        assert_eq!(test::call_service(&app, req).await.status(), 200);

        let req = test::TestRequest::put()
            .uri("/api/orgpreferences/enable-discord-notifications")
            .insert_header((AUTHORIZATION, guest.as_str()))
            .set_json(json!({"enable_discord_notifications": true}))
            .to_request();
        assert_eq!(test::call_service(&app, req).await.status(), 403);

        let req = test::TestRequest::put()
            .uri("/api/orgpreferences/enable-discord-notifications")
            .insert_header((AUTHORIZATION, pipeline_manager.as_str()))
            .set_json(json!({"enable_discord_notifications": true}))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), 400);
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(
            body,
            json!({"detail": "Discord webhook is required to enable notifications."})
        );

        let req = test::TestRequest::put()
            .uri("/api/orgpreferences/enable-discord-notifications")
            .insert_header((AUTHORIZATION, pipeline_manager.as_str()))
            .set_json(json!({
                "enable_discord_notifications": true,
                "discord_webhook": "https://discord.example/hook"
            }))
            .to_request();
        let body: Value = test::read_body_json(test::call_service(&app, req).await).await;
        assert_eq!(
            body,
            json!({"success": true, "res": {
                "enable_discord_notifications": true,
                "discord_webhook": "https://discord.example/hook"
            }})
        );
    }

    #[actix_web::test]
    async fn test_malformed_json_is_bad_request() {
        let db_pool = setup_test_database();
        let tokens = seed_members(&db_pool, &["guest"]);
        let app = test_app!(db_pool);

        let req = test::TestRequest::post()
            .uri("/api/orgpreferences/org-superset")
            .insert_header((AUTHORIZATION, tokens[0].as_str()))
            .insert_header(("content-type", "application/json"))
            .set_payload("{not json")
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), 400);
        let body: Value = test::read_body_json(resp).await;
        assert!(body["detail"].is_string());
    }

    #[actix_web::test]
    async fn test_superset_details_statuses() {
        let db_pool = setup_test_database();
        let tokens = seed_members(&db_pool, &["analyst"]);
        let app = test_app!(db_pool);

        let req = test::TestRequest::get()
            .uri("/api/orgpreferences/org-superset")
            .insert_header((AUTHORIZATION, tokens[0].as_str()))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), 400);
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(
            body,
            json!({"detail": "Organizations superset details not found"})
        );

        let req = test::TestRequest::post()
            .uri("/api/orgpreferences/org-superset")
            .insert_header((AUTHORIZATION, tokens[0].as_str()))
            .set_json(json!({"superset_version": "3.1.0"}))
            .to_request();
        let body: Value = test::read_body_json(test::call_service(&app, req).await).await;
        assert_eq!(
            body,
            json!({"success": true, "res": {
                "org": {"name": "Acme", "slug": "acme", "type": "client"},
                "superset_version": "3.1.0",
                "created": true
            }})
        );
    }

    #[::core::prelude::v1::test]
    fn test_cors_options_from_origins() {
        assert_eq!(
            CorsOptions::from_origins(&["*".to_string()]),
            CorsOptions::Permissive
        );
        assert_eq!(
            CorsOptions::from_origins(&["http://a.org".to_string()]),
            CorsOptions::Custom(vec!["http://a.org".to_string()], 3600)
        );
    }
}
