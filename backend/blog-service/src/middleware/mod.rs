/// HTTP middleware and request extractors for blog-service
///
/// Identity comes from the `token` cookie, falling back to an
/// `Authorization: Bearer` header. [`AuthUser`] rejects anonymous requests;
/// [`MaybeUser`] lets them through as `None`.
pub mod permissions;

pub use permissions::*;

use actix_web::dev::{forward_ready, Payload, Service, ServiceRequest, ServiceResponse, Transform};
use actix_web::http::header::AUTHORIZATION;
use actix_web::{web, Error, FromRequest, HttpRequest};
use crypto_core::JwtKeys;
use futures::future::LocalBoxFuture;
use sqlx::PgPool;
use std::future::{ready, Ready};
use std::rc::Rc;
use std::time::Instant;
use uuid::Uuid;

use crate::db::user_repo;
use crate::error::AppError;
use crate::metrics::http::observe_request;
use crate::models::User;

/// Cookie carrying the access token
pub const ACCESS_TOKEN_COOKIE: &str = "token";
/// Cookie carrying the refresh token
pub const REFRESH_TOKEN_COOKIE: &str = "refreshToken";

// =====================================================================
// Authentication extractors
// =====================================================================

/// The authenticated caller
#[derive(Debug, Clone)]
pub struct AuthUser(pub User);

impl AuthUser {
    pub fn id(&self) -> Uuid {
        self.0.id
    }
}

/// The caller when a valid token is present
#[derive(Debug, Clone)]
pub struct MaybeUser(pub Option<User>);

impl MaybeUser {
    pub fn id(&self) -> Option<Uuid> {
        self.0.as_ref().map(|u| u.id)
    }
}

fn access_token_from_request(req: &HttpRequest) -> Option<String> {
    if let Some(cookie) = req.cookie(ACCESS_TOKEN_COOKIE) {
        if !cookie.value().is_empty() {
            return Some(cookie.value().to_string());
        }
    }

    req.headers()
        .get(AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .map(|t| t.trim().to_string())
        .filter(|t| !t.is_empty())
}

async fn authenticate(req: HttpRequest) -> Result<User, AppError> {
    let token = access_token_from_request(&req)
        .ok_or_else(|| AppError::Unauthorized("You are not logged in".to_string()))?;

    let keys = req
        .app_data::<web::Data<JwtKeys>>()
        .cloned()
        .ok_or_else(|| AppError::Internal("JWT keys not configured".to_string()))?;
    let pool = req
        .app_data::<web::Data<PgPool>>()
        .cloned()
        .ok_or_else(|| AppError::Internal("Database pool not configured".to_string()))?;

    let claims = keys.validate_access_token(&token)?;
    let user_id = claims.user_id()?;

    let user = user_repo::find_by_id(pool.get_ref(), user_id)
        .await?
        .ok_or_else(|| {
            AppError::Unauthorized("The user belonging to this token no longer exists".to_string())
        })?;

    if user.token_revoked(claims.ver) {
        return Err(AppError::Unauthorized(
            "User recently changed password, please log in again".to_string(),
        ));
    }

    Ok(user)
}

impl FromRequest for AuthUser {
    type Error = AppError;
    type Future = LocalBoxFuture<'static, Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut Payload) -> Self::Future {
        let req = req.clone();
        Box::pin(async move { authenticate(req).await.map(AuthUser) })
    }
}

impl FromRequest for MaybeUser {
    type Error = AppError;
    type Future = LocalBoxFuture<'static, Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut Payload) -> Self::Future {
        let req = req.clone();
        Box::pin(async move {
            match authenticate(req).await {
                Ok(user) => Ok(MaybeUser(Some(user))),
                Err(err) => {
                    tracing::debug!(error = %err, "continuing as anonymous");
                    Ok(MaybeUser(None))
                }
            }
        })
    }
}

// =====================================================================
// Metrics middleware
// =====================================================================

pub struct MetricsMiddleware;

impl<S, B> Transform<S, ServiceRequest> for MetricsMiddleware
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type InitError = ();
    type Transform = MetricsMiddlewareService<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(MetricsMiddlewareService {
            service: Rc::new(service),
        }))
    }
}

pub struct MetricsMiddlewareService<S> {
    service: Rc<S>,
}

impl<S, B> Service<ServiceRequest> for MetricsMiddlewareService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let service = self.service.clone();
        let method = req.method().to_string();
        // Route patterns keep label cardinality bounded
        let route = req
            .match_pattern()
            .unwrap_or_else(|| "unmatched".to_string());
        let start = Instant::now();

        Box::pin(async move {
            let res = service.call(req).await;
            let elapsed = start.elapsed();
            let status = match &res {
                Ok(resp) => resp.status().as_u16(),
                Err(err) => err.as_response_error().status_code().as_u16(),
            };

            observe_request(&method, &route, status, elapsed.as_secs_f64());
            tracing::debug!(%method, %route, status, elapsed_ms = elapsed.as_millis() as u64, "request completed");
            res
        })
    }
}
