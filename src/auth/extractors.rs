use actix_web::dev::Payload;
use actix_web::{Error as ActixError, FromRequest, HttpMessage, HttpRequest};
use std::future::{ready, Ready};

use crate::error::AppError;
use crate::models::Account;

/// The identity resolved by `AuthMiddleware` for the current request.
///
/// Carries the full account record plus the raw token string the request
/// presented, so logout can revoke exactly that token. Handlers receive it as
/// a regular extractor argument.
///
/// If no session is present in the request extensions (the middleware did not
/// run, or the route was wrongly left unguarded), extraction fails with an
/// authentication error rather than exposing the handler.
#[derive(Debug, Clone)]
pub struct AuthSession {
    pub account: Account,
    pub token: String,
}

impl FromRequest for AuthSession {
    type Error = ActixError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        match req.extensions().get::<AuthSession>().cloned() {
            Some(session) => ready(Ok(session)),
            None => ready(Err(AppError::Authentication.into())),
        }
    }
}
