use actix_web::{
    dev::{forward_ready, Service, ServiceRequest, ServiceResponse, Transform},
    http::{header, Method},
    web, Error, HttpMessage,
};
use futures::future::{ready, LocalBoxFuture, Ready};
use sqlx::PgPool;
use std::rc::Rc;

use crate::auth::extractors::AuthSession;
use crate::auth::token::TokenService;
use crate::error::AppError;
use crate::store::accounts;

/// Per-request authorization guard.
///
/// Resolves an authenticated identity from the bearer credential in two steps:
/// the token signature must verify, and the exact token string must still be
/// on the account's active-token list. The second check is what makes logout
/// and logout-all take effect immediately, even though a revoked token's
/// signature remains cryptographically valid.
///
/// On success the resolved account and the raw token string are attached to
/// the request extensions as an [`AuthSession`]; logout needs the raw token to
/// remove exactly the presenting one.
pub struct AuthMiddleware;

impl<S, B> Transform<S, ServiceRequest> for AuthMiddleware
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Transform = AuthMiddlewareService<S>;
    type InitError = ();
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(AuthMiddlewareService {
            service: Rc::new(service),
        }))
    }
}

pub struct AuthMiddlewareService<S> {
    service: Rc<S>,
}

/// Endpoints reachable without a session: registration, login, liveness, and
/// public avatar reads.
fn is_public(req: &ServiceRequest) -> bool {
    match (req.method(), req.path()) {
        (&Method::GET, "/health") => true,
        (&Method::POST, "/accounts") => true,
        (&Method::POST, "/accounts/login") => true,
        (&Method::GET, path) => path.starts_with("/accounts/") && path.ends_with("/avatar"),
        _ => false,
    }
}

impl<S, B> Service<ServiceRequest> for AuthMiddlewareService<S>
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
        let service = Rc::clone(&self.service);

        Box::pin(async move {
            if is_public(&req) {
                return service.call(req).await;
            }

            let token = req
                .headers()
                .get(header::AUTHORIZATION)
                .and_then(|value| value.to_str().ok())
                .and_then(|value| value.strip_prefix("Bearer "))
                .map(str::to_owned)
                .ok_or(AppError::Authentication)?;

            let token_service = req
                .app_data::<web::Data<TokenService>>()
                .ok_or_else(|| AppError::Internal("TokenService not configured".into()))?;
            let account_id = token_service.verify(&token)?;

            let pool = req
                .app_data::<web::Data<PgPool>>()
                .ok_or_else(|| AppError::Internal("Database pool not configured".into()))?;

            // Allow-list membership: a revoked token or a deleted account both
            // come back as no row, and both fail identically.
            let account = accounts::find_by_id_and_token(pool, account_id, &token)
                .await?
                .ok_or(AppError::Authentication)?;

            req.extensions_mut().insert(AuthSession { account, token });

            service.call(req).await
        })
    }
}
