use crate::{
    auth::{AuthResponse, AuthSession, LoginRequest, TokenService},
    avatar::AvatarProcessor,
    error::AppError,
    models::{RegisterRequest, UpdateAccount},
    store::accounts,
};
use actix_web::{
    delete, get, http::header, patch, post, web, HttpRequest, HttpResponse, Responder,
};
use lazy_static::lazy_static;
use regex::Regex;
use sqlx::PgPool;
use uuid::Uuid;
use validator::Validate;

const MAX_AVATAR_BYTES: usize = 1_000_000;

lazy_static! {
    static ref AVATAR_CONTENT_TYPE: Regex = Regex::new(r"^image/(jpg|jpeg|png)$").unwrap();
}

/// Register a new account.
///
/// Validates the payload, hashes the password, inserts the account, and
/// issues a first session token. Returns 201 with the account (sans secrets)
/// and the token; a duplicate email is a 400 conflict decided by the store's
/// unique index, not by a pre-check.
#[post("")]
pub async fn register(
    pool: web::Data<PgPool>,
    token_service: web::Data<TokenService>,
    payload: web::Json<RegisterRequest>,
) -> Result<impl Responder, AppError> {
    payload.validate()?;

    let account = accounts::create(pool.get_ref(), &payload).await?;

    let token = token_service.issue(account.id)?;
    accounts::append_token(pool.get_ref(), account.id, &token).await?;

    Ok(HttpResponse::Created().json(AuthResponse { account, token }))
}

/// Login with email and password.
///
/// A fresh token is issued and appended to the account's active list; any
/// previously issued tokens stay valid until revoked.
#[post("/login")]
pub async fn login(
    pool: web::Data<PgPool>,
    token_service: web::Data<TokenService>,
    payload: web::Json<LoginRequest>,
) -> Result<impl Responder, AppError> {
    payload.validate()?;

    let account =
        accounts::find_by_credentials(pool.get_ref(), &payload.email, &payload.password).await?;

    let token = token_service.issue(account.id)?;
    accounts::append_token(pool.get_ref(), account.id, &token).await?;

    Ok(HttpResponse::Ok().json(AuthResponse { account, token }))
}

/// Revokes exactly the token this request presented.
#[post("/logout")]
pub async fn logout(
    pool: web::Data<PgPool>,
    session: AuthSession,
) -> Result<impl Responder, AppError> {
    accounts::remove_token(pool.get_ref(), session.account.id, &session.token).await?;
    Ok(HttpResponse::Ok().finish())
}

/// Revokes every token issued for the calling account.
#[post("/logoutAll")]
pub async fn logout_all(
    pool: web::Data<PgPool>,
    session: AuthSession,
) -> Result<impl Responder, AppError> {
    accounts::clear_tokens(pool.get_ref(), session.account.id).await?;
    Ok(HttpResponse::Ok().finish())
}

/// Lists all accounts. Authenticated but not ownership-scoped.
#[get("")]
pub async fn list_accounts(
    pool: web::Data<PgPool>,
    _session: AuthSession,
) -> Result<impl Responder, AppError> {
    let accounts = accounts::list(pool.get_ref()).await?;
    Ok(HttpResponse::Ok().json(accounts))
}

/// The caller's own account.
#[get("/me")]
pub async fn me(session: AuthSession) -> Result<impl Responder, AppError> {
    Ok(HttpResponse::Ok().json(session.account))
}

/// Partial update of the caller's account.
///
/// The allow-set {name, age, email, password} is enforced at deserialization;
/// a payload with any other key is rejected before anything is written.
#[patch("/me")]
pub async fn update_me(
    pool: web::Data<PgPool>,
    session: AuthSession,
    payload: web::Json<UpdateAccount>,
) -> Result<impl Responder, AppError> {
    payload.validate()?;

    let account = accounts::update(pool.get_ref(), session.account.id, &payload).await?;
    Ok(HttpResponse::Ok().json(account))
}

/// Deletes the caller's account and, in the same transaction, every task it
/// owns. Returns the deleted account.
#[delete("/me")]
pub async fn delete_me(
    pool: web::Data<PgPool>,
    session: AuthSession,
) -> Result<impl Responder, AppError> {
    let account = accounts::delete_with_tasks(pool.get_ref(), session.account.id).await?;
    Ok(HttpResponse::Ok().json(account))
}

/// Stores an avatar for the caller.
///
/// Accepts raw image bytes up to 1MB with a jpg/jpeg/png content type, hands
/// them to the configured [`AvatarProcessor`], and stores the processed bytes.
#[post("/me/avatar")]
pub async fn upload_avatar(
    pool: web::Data<PgPool>,
    processor: web::Data<dyn AvatarProcessor>,
    session: AuthSession,
    request: HttpRequest,
    body: web::Bytes,
) -> Result<impl Responder, AppError> {
    let content_type = request
        .headers()
        .get(header::CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .unwrap_or("");

    if !AVATAR_CONTENT_TYPE.is_match(content_type) {
        return Err(AppError::Validation(
            "Avatar must be a jpg, jpeg or png image".into(),
        ));
    }
    if body.is_empty() {
        return Err(AppError::Validation("Avatar image is empty".into()));
    }
    if body.len() > MAX_AVATAR_BYTES {
        return Err(AppError::Validation(
            "Avatar must be at most 1MB".into(),
        ));
    }

    let stored = processor.process(&body)?;
    accounts::set_avatar(pool.get_ref(), session.account.id, &stored).await?;

    Ok(HttpResponse::Ok().finish())
}

/// Clears the caller's stored avatar.
#[delete("/me/avatar")]
pub async fn delete_avatar(
    pool: web::Data<PgPool>,
    session: AuthSession,
) -> Result<impl Responder, AppError> {
    accounts::clear_avatar(pool.get_ref(), session.account.id).await?;
    Ok(HttpResponse::Ok().finish())
}

/// Serves an account's avatar bytes. Public: no session required.
#[get("/{id}/avatar")]
pub async fn get_avatar(
    pool: web::Data<PgPool>,
    account_id: web::Path<Uuid>,
) -> Result<impl Responder, AppError> {
    let bytes = accounts::avatar_by_id(pool.get_ref(), account_id.into_inner())
        .await?
        .ok_or(AppError::NotFound)?;

    Ok(HttpResponse::Ok().content_type("image/png").body(bytes))
}
