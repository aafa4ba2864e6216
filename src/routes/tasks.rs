use crate::{
    auth::AuthSession,
    error::AppError,
    models::{NewTask, TaskQuery, UpdateTask},
    store::tasks,
};
use actix_web::{delete, get, patch, post, web, HttpResponse, Responder};
use sqlx::PgPool;
use uuid::Uuid;
use validator::Validate;

/// Creates a new task owned by the caller.
///
/// ## Request Body:
/// - `description`: the task text (required, non-blank).
/// - `isCompleted` (optional): completion flag, defaults to false.
///
/// ## Responses:
/// - `201 Created`: the new `Task`, with `ownerId` set to the caller.
/// - `400 Bad Request`: invalid payload.
/// - `401 Unauthorized`: missing or revoked token.
#[post("")]
pub async fn create_task(
    pool: web::Data<PgPool>,
    session: AuthSession,
    payload: web::Json<NewTask>,
) -> Result<impl Responder, AppError> {
    payload.validate()?;

    let task = tasks::create(pool.get_ref(), session.account.id, &payload).await?;
    Ok(HttpResponse::Created().json(task))
}

/// Lists the caller's tasks.
///
/// ## Query Parameters:
/// - `isCompleted` (optional): equality filter on the completion flag.
/// - `sort` (optional): `field:asc|desc`, e.g. `createdAt:desc`.
/// - `limit` / `skip` (optional): pagination; unbounded when omitted.
///
/// Listing is always scoped to the caller; there is no way to reach another
/// account's tasks here. An empty result is a normal `200` with `[]`.
#[get("")]
pub async fn list_tasks(
    pool: web::Data<PgPool>,
    session: AuthSession,
    query: web::Query<TaskQuery>,
) -> Result<impl Responder, AppError> {
    query.validate()?;

    let tasks = tasks::list(pool.get_ref(), session.account.id, &query).await?;
    Ok(HttpResponse::Ok().json(tasks))
}

/// Fetches one of the caller's tasks by id.
///
/// A task owned by another account responds `404`, exactly like a task that
/// does not exist.
#[get("/{id}")]
pub async fn get_task(
    pool: web::Data<PgPool>,
    session: AuthSession,
    task_id: web::Path<Uuid>,
) -> Result<impl Responder, AppError> {
    let task = tasks::get(pool.get_ref(), session.account.id, task_id.into_inner()).await?;
    Ok(HttpResponse::Ok().json(task))
}

/// Partial update of one of the caller's tasks.
///
/// The allow-set {description, isCompleted} is enforced at deserialization;
/// any other key fails with `400` before anything is written.
#[patch("/{id}")]
pub async fn update_task(
    pool: web::Data<PgPool>,
    session: AuthSession,
    task_id: web::Path<Uuid>,
    payload: web::Json<UpdateTask>,
) -> Result<impl Responder, AppError> {
    payload.validate()?;

    let task = tasks::update(
        pool.get_ref(),
        session.account.id,
        task_id.into_inner(),
        &payload,
    )
    .await?;
    Ok(HttpResponse::Ok().json(task))
}

/// Deletes one of the caller's tasks and returns it.
#[delete("/{id}")]
pub async fn delete_task(
    pool: web::Data<PgPool>,
    session: AuthSession,
    task_id: web::Path<Uuid>,
) -> Result<impl Responder, AppError> {
    let task = tasks::delete(pool.get_ref(), session.account.id, task_id.into_inner()).await?;
    Ok(HttpResponse::Ok().json(task))
}
