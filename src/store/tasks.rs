use sqlx::PgPool;
use uuid::Uuid;

use crate::error::AppError;
use crate::models::{NewTask, Task, TaskQuery, UpdateTask};

/// Maps an external sort directive (`field:asc|desc`) to a column and order.
///
/// Fields are checked against the sortable allow-list; anything else is a
/// validation failure. The returned strings are static, so the dynamic ORDER
/// BY below never interpolates caller input.
fn parse_sort(raw: &str) -> Result<(&'static str, &'static str), AppError> {
    let (field, direction) = raw
        .split_once(':')
        .ok_or_else(|| AppError::Validation(format!("Invalid sort parameter: {}", raw)))?;

    let column = match field {
        "description" => "description",
        "isCompleted" => "is_completed",
        "createdAt" => "created_at",
        "updatedAt" => "updated_at",
        _ => return Err(AppError::Validation(format!("Cannot sort by: {}", field))),
    };

    let order = match direction {
        "asc" => "ASC",
        "desc" => "DESC",
        _ => {
            return Err(AppError::Validation(format!(
                "Invalid sort direction: {}",
                direction
            )))
        }
    };

    Ok((column, order))
}

pub async fn create(pool: &PgPool, owner_id: Uuid, input: &NewTask) -> Result<Task, AppError> {
    let task = sqlx::query_as::<_, Task>(
        "INSERT INTO tasks (id, description, is_completed, owner_id) \
         VALUES ($1, $2, $3, $4) \
         RETURNING id, description, is_completed, owner_id, created_at, updated_at",
    )
    .bind(Uuid::new_v4())
    .bind(input.description.trim())
    .bind(input.is_completed)
    .bind(owner_id)
    .fetch_one(pool)
    .await?;

    Ok(task)
}

/// Lists tasks for one owner with optional completion filter, sort, and
/// limit/skip pagination. Always pre-scoped to `owner_id`; an empty result is
/// a successful empty vector.
pub async fn list(pool: &PgPool, owner_id: Uuid, query: &TaskQuery) -> Result<Vec<Task>, AppError> {
    // Conditions and pagination are appended positionally, the way the binds
    // are chained below.
    let mut sql = String::from(
        "SELECT id, description, is_completed, owner_id, created_at, updated_at \
         FROM tasks WHERE owner_id = $1",
    );
    let mut param = 2;

    if query.is_completed.is_some() {
        sql.push_str(&format!(" AND is_completed = ${}", param));
        param += 1;
    }

    match &query.sort {
        Some(raw) => {
            let (column, order) = parse_sort(raw)?;
            sql.push_str(&format!(" ORDER BY {} {}", column, order));
        }
        None => sql.push_str(" ORDER BY created_at"),
    }

    if query.limit.is_some() {
        sql.push_str(&format!(" LIMIT ${}", param));
        param += 1;
    }
    if query.skip.is_some() {
        sql.push_str(&format!(" OFFSET ${}", param));
    }

    let mut query_builder = sqlx::query_as::<_, Task>(&sql).bind(owner_id);

    if let Some(is_completed) = query.is_completed {
        query_builder = query_builder.bind(is_completed);
    }
    if let Some(limit) = query.limit {
        query_builder = query_builder.bind(limit);
    }
    if let Some(skip) = query.skip {
        query_builder = query_builder.bind(skip);
    }

    let tasks = query_builder.fetch_all(pool).await?;
    Ok(tasks)
}

/// Fetches one task within the owner's scope. A task owned by someone else and
/// a task that does not exist both come back as `NotFound`.
pub async fn get(pool: &PgPool, owner_id: Uuid, task_id: Uuid) -> Result<Task, AppError> {
    let task = sqlx::query_as::<_, Task>(
        "SELECT id, description, is_completed, owner_id, created_at, updated_at \
         FROM tasks WHERE id = $1 AND owner_id = $2",
    )
    .bind(task_id)
    .bind(owner_id)
    .fetch_optional(pool)
    .await?;

    task.ok_or(AppError::NotFound)
}

/// Applies a partial update scoped to the owner, as one UPDATE statement.
pub async fn update(
    pool: &PgPool,
    owner_id: Uuid,
    task_id: Uuid,
    input: &UpdateTask,
) -> Result<Task, AppError> {
    let mut assignments = vec!["updated_at = now()".to_string()];
    let mut param = 3;

    if input.description.is_some() {
        assignments.push(format!("description = ${}", param));
        param += 1;
    }
    if input.is_completed.is_some() {
        assignments.push(format!("is_completed = ${}", param));
    }

    let sql = format!(
        "UPDATE tasks SET {} WHERE id = $1 AND owner_id = $2 \
         RETURNING id, description, is_completed, owner_id, created_at, updated_at",
        assignments.join(", ")
    );

    let mut query = sqlx::query_as::<_, Task>(&sql).bind(task_id).bind(owner_id);
    if let Some(description) = &input.description {
        query = query.bind(description.trim());
    }
    if let Some(is_completed) = input.is_completed {
        query = query.bind(is_completed);
    }

    let task = query.fetch_optional(pool).await?;
    task.ok_or(AppError::NotFound)
}

/// Deletes one task within the owner's scope and returns it.
pub async fn delete(pool: &PgPool, owner_id: Uuid, task_id: Uuid) -> Result<Task, AppError> {
    let task = sqlx::query_as::<_, Task>(
        "DELETE FROM tasks WHERE id = $1 AND owner_id = $2 \
         RETURNING id, description, is_completed, owner_id, created_at, updated_at",
    )
    .bind(task_id)
    .bind(owner_id)
    .fetch_optional(pool)
    .await?;

    task.ok_or(AppError::NotFound)
}

/// Removes every task owned by the account. Takes any executor so the account
/// cascade can run it inside its transaction.
pub async fn delete_all_for_owner<'e, E>(executor: E, owner_id: Uuid) -> Result<u64, AppError>
where
    E: sqlx::PgExecutor<'e>,
{
    let result = sqlx::query("DELETE FROM tasks WHERE owner_id = $1")
        .bind(owner_id)
        .execute(executor)
        .await?;

    Ok(result.rows_affected())
}
