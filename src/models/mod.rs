pub mod account;
pub mod task;

pub use account::{Account, RegisterRequest, UpdateAccount};
pub use task::{NewTask, Task, TaskQuery, UpdateTask};

use validator::ValidationError;

/// Rejects values that are empty after trimming.
pub fn not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        let mut error = ValidationError::new("blank");
        error.message = Some("must not be blank".into());
        return Err(error);
    }
    Ok(())
}
