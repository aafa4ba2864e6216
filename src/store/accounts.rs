use sqlx::PgPool;
use uuid::Uuid;

use crate::auth::password::{hash_password, verify_password};
use crate::error::AppError;
use crate::models::{Account, RegisterRequest, UpdateAccount};
use crate::store::tasks;

const ACCOUNT_COLUMNS: &str =
    "id, name, age, email, password_hash, active_tokens, avatar, created_at, updated_at";

/// Inserts a new account. The caller validates the payload first; the password
/// arrives here as plaintext and is hashed before it touches the store.
///
/// Email uniqueness is enforced by the unique index at commit time, not by a
/// check-then-insert sequence: of two concurrent registrations with the same
/// email, exactly one row lands and the other surfaces as `Conflict` through
/// the 23505 mapping in `AppError`.
pub async fn create(pool: &PgPool, input: &RegisterRequest) -> Result<Account, AppError> {
    let password_hash = hash_password(&input.password)?;

    let account = sqlx::query_as::<_, Account>(&format!(
        "INSERT INTO accounts (id, name, age, email, password_hash) \
         VALUES ($1, $2, $3, $4, $5) \
         RETURNING {}",
        ACCOUNT_COLUMNS
    ))
    .bind(Uuid::new_v4())
    .bind(input.name.trim())
    .bind(input.age)
    .bind(input.email.trim().to_lowercase())
    .bind(password_hash)
    .fetch_one(pool)
    .await?;

    Ok(account)
}

/// Looks up an account by email and verifies the password.
///
/// An unknown email and a wrong password produce the same generic
/// authentication failure, so callers cannot probe which emails exist.
pub async fn find_by_credentials(
    pool: &PgPool,
    email: &str,
    password: &str,
) -> Result<Account, AppError> {
    let account = sqlx::query_as::<_, Account>(&format!(
        "SELECT {} FROM accounts WHERE email = $1",
        ACCOUNT_COLUMNS
    ))
    .bind(email.trim().to_lowercase())
    .fetch_optional(pool)
    .await?
    .ok_or(AppError::Authentication)?;

    if !verify_password(password, &account.password_hash)? {
        return Err(AppError::Authentication);
    }

    Ok(account)
}

/// The guard's allow-list query: the account must match the id bound in the
/// token AND still list this exact token string as active.
pub async fn find_by_id_and_token(
    pool: &PgPool,
    id: Uuid,
    token: &str,
) -> Result<Option<Account>, AppError> {
    let account = sqlx::query_as::<_, Account>(&format!(
        "SELECT {} FROM accounts WHERE id = $1 AND $2 = ANY(active_tokens)",
        ACCOUNT_COLUMNS
    ))
    .bind(id)
    .bind(token)
    .fetch_optional(pool)
    .await?;

    Ok(account)
}

pub async fn list(pool: &PgPool) -> Result<Vec<Account>, AppError> {
    let accounts = sqlx::query_as::<_, Account>(&format!(
        "SELECT {} FROM accounts ORDER BY created_at",
        ACCOUNT_COLUMNS
    ))
    .fetch_all(pool)
    .await?;

    Ok(accounts)
}

/// Applies a partial update as a single UPDATE statement, so the allowed field
/// set either fully applies or nothing is mutated. A provided password is
/// re-hashed here. An email collision surfaces as `Conflict`.
pub async fn update(pool: &PgPool, id: Uuid, input: &UpdateAccount) -> Result<Account, AppError> {
    let mut assignments = vec!["updated_at = now()".to_string()];
    let mut param = 2;

    if input.name.is_some() {
        assignments.push(format!("name = ${}", param));
        param += 1;
    }
    if input.age.is_some() {
        assignments.push(format!("age = ${}", param));
        param += 1;
    }
    if input.email.is_some() {
        assignments.push(format!("email = ${}", param));
        param += 1;
    }
    let password_hash = match &input.password {
        Some(password) => {
            assignments.push(format!("password_hash = ${}", param));
            Some(hash_password(password)?)
        }
        None => None,
    };

    let sql = format!(
        "UPDATE accounts SET {} WHERE id = $1 RETURNING {}",
        assignments.join(", "),
        ACCOUNT_COLUMNS
    );

    let mut query = sqlx::query_as::<_, Account>(&sql).bind(id);
    if let Some(name) = &input.name {
        query = query.bind(name.trim());
    }
    if let Some(age) = input.age {
        query = query.bind(age);
    }
    if let Some(email) = &input.email {
        query = query.bind(email.trim().to_lowercase());
    }
    if let Some(hash) = password_hash {
        query = query.bind(hash);
    }

    let account = query.fetch_one(pool).await?;
    Ok(account)
}

/// Adds a token to the account's active list.
///
/// This and the two revocation operations below are single-statement array
/// updates keyed by account id. A read-modify-write of the whole record would
/// let two concurrent logins, or a login racing a logout, clobber each other's
/// change.
pub async fn append_token(pool: &PgPool, id: Uuid, token: &str) -> Result<(), AppError> {
    sqlx::query(
        "UPDATE accounts SET active_tokens = array_append(active_tokens, $2), \
         updated_at = now() WHERE id = $1",
    )
    .bind(id)
    .bind(token)
    .execute(pool)
    .await?;

    Ok(())
}

/// Removes one token from the active list; the others stay valid.
pub async fn remove_token(pool: &PgPool, id: Uuid, token: &str) -> Result<(), AppError> {
    sqlx::query(
        "UPDATE accounts SET active_tokens = array_remove(active_tokens, $2), \
         updated_at = now() WHERE id = $1",
    )
    .bind(id)
    .bind(token)
    .execute(pool)
    .await?;

    Ok(())
}

/// Revokes every token issued for the account.
pub async fn clear_tokens(pool: &PgPool, id: Uuid) -> Result<(), AppError> {
    sqlx::query("UPDATE accounts SET active_tokens = '{}', updated_at = now() WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await?;

    Ok(())
}

pub async fn set_avatar(pool: &PgPool, id: Uuid, bytes: &[u8]) -> Result<(), AppError> {
    sqlx::query("UPDATE accounts SET avatar = $2, updated_at = now() WHERE id = $1")
        .bind(id)
        .bind(bytes)
        .execute(pool)
        .await?;

    Ok(())
}

pub async fn clear_avatar(pool: &PgPool, id: Uuid) -> Result<(), AppError> {
    sqlx::query("UPDATE accounts SET avatar = NULL, updated_at = now() WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await?;

    Ok(())
}

/// Fetches the stored avatar bytes for an account, `None` when the account is
/// missing or has no avatar.
pub async fn avatar_by_id(pool: &PgPool, id: Uuid) -> Result<Option<Vec<u8>>, AppError> {
    let row: Option<(Option<Vec<u8>>,)> =
        sqlx::query_as("SELECT avatar FROM accounts WHERE id = $1")
            .bind(id)
            .fetch_optional(pool)
            .await?;

    Ok(row.and_then(|(avatar,)| avatar))
}

/// Deletes the account together with every task it owns, as one transaction.
///
/// Tasks go first: if the account delete fails mid-way the rollback restores
/// both, and even without transactional support the worst outcome of this
/// ordering would be ownerless tasks, never a live owner with invisible ones.
/// Returns the deleted account so the handler can echo it back.
pub async fn delete_with_tasks(pool: &PgPool, id: Uuid) -> Result<Account, AppError> {
    let mut tx = pool.begin().await?;

    tasks::delete_all_for_owner(&mut *tx, id).await?;

    let account = sqlx::query_as::<_, Account>(&format!(
        "DELETE FROM accounts WHERE id = $1 RETURNING {}",
        ACCOUNT_COLUMNS
    ))
    .bind(id)
    .fetch_one(&mut *tx)
    .await?;

    tx.commit().await?;

    Ok(account)
}
