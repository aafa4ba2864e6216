use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;
use validator::Validate;

/// Represents an account as stored in the database.
///
/// The serialized form is the public representation: the password hash, the
/// active-token list, and the avatar blob are skipped and never leave the
/// server in an account body.
#[derive(Debug, Clone, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Account {
    /// Unique identifier for the account (UUID v4, store-assigned).
    pub id: Uuid,
    /// Display name, non-empty after trimming.
    pub name: String,
    /// Optional age, never negative.
    pub age: Option<i32>,
    /// Email address, stored lowercase and unique across all accounts.
    pub email: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    /// Session tokens currently accepted for this account.
    #[serde(skip_serializing)]
    pub active_tokens: Vec<String>,
    #[serde(skip_serializing)]
    pub avatar: Option<Vec<u8>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Payload for registering a new account.
#[derive(Debug, Deserialize, Validate)]
pub struct RegisterRequest {
    #[validate(custom = "crate::models::not_blank")]
    pub name: String,
    #[validate(range(min = 0))]
    pub age: Option<i32>,
    #[validate(email)]
    pub email: String,
    /// Must be at least 6 characters and must not contain "password" in any
    /// casing. Checked here, before hashing.
    #[validate(
        length(min = 6),
        custom = "crate::auth::password::forbid_password_substring"
    )]
    pub password: String,
}

/// Partial update for an account.
///
/// `deny_unknown_fields` enforces the update allow-set at deserialization:
/// a payload carrying any key outside {name, age, email, password} is rejected
/// before anything is touched.
#[derive(Debug, Deserialize, Validate)]
#[serde(deny_unknown_fields)]
pub struct UpdateAccount {
    #[validate(custom = "crate::models::not_blank")]
    pub name: Option<String>,
    #[validate(range(min = 0))]
    pub age: Option<i32>,
    #[validate(email)]
    pub email: Option<String>,
    #[validate(
        length(min = 6),
        custom = "crate::auth::password::forbid_password_substring"
    )]
    pub password: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn account() -> Account {
        Account {
            id: Uuid::new_v4(),
            name: "A".to_string(),
            age: Some(30),
            email: "a@x.com".to_string(),
            password_hash: "$2b$12$abcdefghijklmnopqrstuv".to_string(),
            active_tokens: vec!["tok-1".to_string()],
            avatar: Some(vec![1, 2, 3]),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_account_serialization_omits_secrets() {
        let value = serde_json::to_value(account()).unwrap();
        let object = value.as_object().unwrap();

        assert!(object.contains_key("id"));
        assert!(object.contains_key("name"));
        assert!(object.contains_key("email"));
        assert!(object.contains_key("createdAt"));
        assert!(!object.contains_key("passwordHash"));
        assert!(!object.contains_key("activeTokens"));
        assert!(!object.contains_key("avatar"));
    }

    #[test]
    fn test_register_request_validation() {
        let valid = RegisterRequest {
            name: "A".to_string(),
            age: Some(30),
            email: "a@x.com".to_string(),
            password: "secret1".to_string(),
        };
        assert!(valid.validate().is_ok());

        let blank_name = RegisterRequest {
            name: "   ".to_string(),
            age: None,
            email: "a@x.com".to_string(),
            password: "secret1".to_string(),
        };
        assert!(blank_name.validate().is_err());

        let negative_age = RegisterRequest {
            name: "A".to_string(),
            age: Some(-1),
            email: "a@x.com".to_string(),
            password: "secret1".to_string(),
        };
        assert!(negative_age.validate().is_err());

        let bad_email = RegisterRequest {
            name: "A".to_string(),
            age: None,
            email: "not-an-email".to_string(),
            password: "secret1".to_string(),
        };
        assert!(bad_email.validate().is_err());

        let short_password = RegisterRequest {
            name: "A".to_string(),
            age: None,
            email: "a@x.com".to_string(),
            password: "12345".to_string(),
        };
        assert!(short_password.validate().is_err());

        let forbidden_password = RegisterRequest {
            name: "A".to_string(),
            age: None,
            email: "a@x.com".to_string(),
            password: "password123".to_string(),
        };
        assert!(forbidden_password.validate().is_err());
    }

    #[test]
    fn test_update_account_rejects_unknown_fields() {
        let result: Result<UpdateAccount, _> =
            serde_json::from_value(json!({ "name": "B", "location": "nowhere" }));
        assert!(result.is_err());

        let result: Result<UpdateAccount, _> = serde_json::from_value(json!({ "name": "B" }));
        assert!(result.is_ok());
    }

    #[test]
    fn test_update_account_validates_provided_fields() {
        let update: UpdateAccount =
            serde_json::from_value(json!({ "password": "Password1" })).unwrap();
        assert!(update.validate().is_err());

        let update: UpdateAccount = serde_json::from_value(json!({ "age": -5 })).unwrap();
        assert!(update.validate().is_err());

        let update: UpdateAccount =
            serde_json::from_value(json!({ "email": "new@x.com", "age": 0 })).unwrap();
        assert!(update.validate().is_ok());
    }
}
