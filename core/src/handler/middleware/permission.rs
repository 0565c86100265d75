use crate::handler::middleware::{permission_denied, unauthenticated};
use crate::types::metadata::org_user::OrgUser;
use actix_web::body::EitherBody;
use actix_web::dev::{forward_ready, Service, ServiceRequest, ServiceResponse, Transform};
use actix_web::{Error, HttpMessage, ResponseError};
use std::future::{ready, Future, Ready};
use std::pin::Pin;
use std::rc::Rc;
use tracing::warn;

pub const CAN_EDIT_LLM_SETTINGS: &str = "can_edit_llm_settings";
pub const CAN_EDIT_DISCORD_NOTIFICATIONS_SETTINGS: &str =
    "can_edit_discord_notifications_settings";

/// Lets a request through only when the actor holds every listed permission.
/// Must run inside [`OrgUserMiddleware`](super::org_user::OrgUserMiddleware).
pub struct PermissionGuard {
    required: Rc<Vec<&'static str>>,
}

impl PermissionGuard {
    pub fn new(required: &[&'static str]) -> Self {
        Self {
            required: Rc::new(required.to_vec()),
        }
    }
}

impl<S, B> Transform<S, ServiceRequest> for PermissionGuard
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Transform = PermissionGuardService<S>;
    type InitError = ();
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(PermissionGuardService {
            service: service.into(),
            required: self.required.clone(),
        }))
    }
}

pub struct PermissionGuardService<S> {
    service: Rc<S>,
    required: Rc<Vec<&'static str>>,
}

type LocalBoxFuture<T> = Pin<Box<dyn Future<Output = T> + 'static>>;

impl<S, B> Service<ServiceRequest> for PermissionGuardService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Future = LocalBoxFuture<Result<Self::Response, Self::Error>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let srv = self.service.clone();
        let required = self.required.clone();

        Box::pin(async move {
            // None when no actor was resolved upstream
            let allowed = {
                let extensions = req.extensions();
                let decision = match extensions.get::<OrgUser>() {
                    Some(actor) if actor.has_permissions(&required) => Some(true),
                    Some(actor) => {
                        warn!(
                            "{} in {} lacks {:?} for {}",
                            actor.user.email,
                            actor.org.slug,
                            required,
                            req.path()
                        );
                        Some(false)
                    }
                    None => None,
                };
                decision
            };

            let rejection = match allowed {
                Some(true) => None,
                Some(false) => Some(permission_denied()),
                None => Some(unauthenticated()),
            };
            if let Some(err) = rejection {
                return Ok(req.into_response(err.error_response().map_into_right_body()));
            }

            let fut = srv.call(req);
            Ok(fut.await?.map_into_left_body())
        })
    }
}
