use crate::error::AppError;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Claims encoded within a session token.
///
/// Current scope has no expiry claim; revocation happens through the account's
/// active-token list instead. An `exp` field can be added here and enforced in
/// [`TokenService::verify`] without changing either method's signature.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    /// Subject of the token: the account's unique identifier.
    pub sub: Uuid,
    /// Issue timestamp (seconds since epoch).
    pub iat: i64,
}

/// Issues and verifies HMAC-signed session tokens.
///
/// The encoding and decoding keys are derived from the configured secret once
/// at startup and shared across requests via `web::Data`, so no key derivation
/// happens per request.
pub struct TokenService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
}

impl TokenService {
    pub fn new(secret: &str) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        // Tokens carry no expiry claim in current scope.
        validation.validate_exp = false;
        validation.required_spec_claims = Default::default();

        Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            validation,
        }
    }

    /// Produces a signed token binding the given account id.
    pub fn issue(&self, account_id: Uuid) -> Result<String, AppError> {
        let claims = Claims {
            sub: account_id,
            iat: chrono::Utc::now().timestamp(),
        };

        encode(&Header::default(), &claims, &self.encoding_key)
            .map_err(|e| AppError::Internal(format!("Failed to generate token: {}", e)))
    }

    /// Validates the signature and returns the bound account id.
    ///
    /// Any tampering or unknown signing key fails closed with
    /// `AppError::Authentication`. A valid signature alone does not authorize
    /// a request: the guard additionally checks the account's active-token
    /// list, which is how logout revokes a still-well-signed token.
    pub fn verify(&self, token: &str) -> Result<Uuid, AppError> {
        let data = decode::<Claims>(token, &self.decoding_key, &self.validation)?;
        Ok(data.claims.sub)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_token_issue_and_verify() {
        let service = TokenService::new("test-secret-for-issue-verify");
        let account_id = Uuid::new_v4();

        let token = service.issue(account_id).unwrap();
        let resolved = service.verify(&token).unwrap();

        assert_eq!(resolved, account_id);
    }

    #[test]
    fn test_tampered_token_is_rejected() {
        let service = TokenService::new("test-secret-for-tampering");
        let token = service.issue(Uuid::new_v4()).unwrap();

        // Flip a character in the signature segment.
        let mut tampered = token.clone();
        let last = tampered.pop().unwrap();
        tampered.push(if last == 'a' { 'b' } else { 'a' });

        match service.verify(&tampered) {
            Err(AppError::Authentication) => {}
            other => panic!("Expected authentication failure, got {:?}", other),
        }
    }

    #[test]
    fn test_token_from_other_secret_is_rejected() {
        let issuer = TokenService::new("secret-one");
        let verifier = TokenService::new("secret-two");

        let token = issuer.issue(Uuid::new_v4()).unwrap();

        match verifier.verify(&token) {
            Err(AppError::Authentication) => {}
            other => panic!("Expected authentication failure, got {:?}", other),
        }
    }

    #[test]
    fn test_garbage_token_is_rejected() {
        let service = TokenService::new("test-secret-for-garbage");
        assert!(matches!(
            service.verify("not-a-token"),
            Err(AppError::Authentication)
        ));
    }
}
