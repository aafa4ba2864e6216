pub mod extractors;
pub mod middleware;
pub mod password;
pub mod token;

use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::models::Account;

// Re-export necessary items
pub use extractors::AuthSession;
pub use middleware::AuthMiddleware;
pub use password::{hash_password, verify_password};
pub use token::{Claims, TokenService};

/// Represents the payload for an account login request.
#[derive(Debug, Deserialize, Validate)]
pub struct LoginRequest {
    /// Account email address.
    #[validate(email)]
    pub email: String,
    /// Account password.
    /// Must be at least 6 characters long.
    #[validate(length(min = 6))]
    pub password: String,
}

/// Response structure after successful authentication (login or registration).
/// The account serialization never includes the password hash, active tokens,
/// or the avatar blob.
#[derive(Debug, Serialize)]
pub struct AuthResponse {
    pub account: Account,
    /// The freshly issued session token.
    pub token: String,
}
