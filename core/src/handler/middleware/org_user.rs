use crate::auth::{bearer_token, decode_token, AuthConfig};
use crate::handler::middleware::unauthenticated;
use crate::metadata::pool::DbPool;
use crate::metadata::services::org_user::OrgUserServiceImpl;
use crate::types::metadata::services::org_user::OrgUserService;
use crate::PreferencesApiError;
use actix_web::body::EitherBody;
use actix_web::dev::{forward_ready, Service, ServiceRequest, ServiceResponse, Transform};
use actix_web::http::header::AUTHORIZATION;
use actix_web::{web, Error, HttpMessage, HttpResponse, ResponseError};
use std::future::{ready, Future, Ready};
use std::pin::Pin;
use std::rc::Rc;
use std::sync::Arc;
use tracing::{error, warn};

/// Resolves the bearer token into the acting [`OrgUser`](crate::types::metadata::org_user::OrgUser)
/// and stores it in the request extensions.
pub struct OrgUserMiddleware {
    auth: Arc<AuthConfig>,
}

impl OrgUserMiddleware {
    pub fn new(auth: Arc<AuthConfig>) -> Self {
        Self { auth }
    }
}

impl<S, B> Transform<S, ServiceRequest> for OrgUserMiddleware
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Transform = OrgUserMiddlewareService<S>;
    type InitError = ();
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(OrgUserMiddlewareService {
            service: service.into(),
            auth: self.auth.clone(),
        }))
    }
}

pub struct OrgUserMiddlewareService<S> {
    service: Rc<S>,
    auth: Arc<AuthConfig>,
}

type LocalBoxFuture<T> = Pin<Box<dyn Future<Output = T> + 'static>>;

impl<S, B> Service<ServiceRequest> for OrgUserMiddlewareService<S>
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
        let auth = self.auth.clone();

        Box::pin(async move {
            let claims = req
                .headers()
                .get(AUTHORIZATION)
                .and_then(|h| h.to_str().ok())
                .ok_or(crate::auth::AuthError::MissingToken)
                .and_then(bearer_token)
                .and_then(|token| decode_token(&auth, token));

            let claims = match claims {
                Ok(claims) => claims,
                Err(e) => {
                    warn!("Rejected request to {}: {}", req.path(), e);
                    let response = unauthenticated().error_response();
                    return Ok(req.into_response(response.map_into_right_body()));
                }
            };

            let Some(db_pool) = req.app_data::<web::Data<DbPool>>() else {
                error!("Database pool is not found");
                return Ok(req.into_response(
                    HttpResponse::InternalServerError()
                        .finish()
                        .map_into_right_body(),
                ));
            };

            let org_user_service = OrgUserServiceImpl::new(db_pool.get_ref().clone());

            match org_user_service.get_org_user(&claims.sub, &claims.org) {
                Ok(Some(org_user)) => {
                    tracing::debug!(
                        "Org user resolved: {} in {}",
                        org_user.user.email,
                        org_user.org.slug
                    );
                    req.extensions_mut().insert(org_user);
                }
                Ok(None) => {
                    warn!("No org user for {} in org {}", claims.sub, claims.org);
                    let response = unauthenticated().error_response();
                    return Ok(req.into_response(response.map_into_right_body()));
                }
                Err(e) => {
                    error!("Error loading org user {}: {:?}", claims.sub, e);
                    let response = PreferencesApiError::DatabaseError(e).error_response();
                    return Ok(req.into_response(response.map_into_right_body()));
                }
            }

            let fut = srv.call(req);
            Ok(fut.await?.map_into_left_body())
        })
    }
}
