use chrono::Utc;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

use crate::config::{JwtSettings, TOKEN_LIFETIME_SECONDS};
use crate::types::db::{role, user};

/// Claims embedded in every bearer token.
///
/// Materialized once during verification; downstream code reads typed
/// fields instead of looking claims up by name.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Subject (user id, stringified)
    pub sub: String,

    /// Display name
    pub name: String,

    /// Login name
    pub username: String,

    /// HIS linkage code
    pub his_code: String,

    /// One entry per assigned role, holding the role's machine code
    pub roles: Vec<String>,

    /// Issuer
    pub iss: String,

    /// Audience
    pub aud: String,

    /// Issued-at (Unix timestamp)
    pub iat: i64,

    /// Expiration (Unix timestamp)
    pub exp: i64,
}

impl Claims {
    /// Numeric subject id, if the token carries a well-formed one
    pub fn user_id(&self) -> Option<i64> {
        self.sub.parse().ok()
    }

    /// Set-membership check against a required role code
    pub fn has_role(&self, code: &str) -> bool {
        self.roles.iter().any(|r| r == code)
    }
}

/// Token issuance and verification failures
#[derive(Debug, thiserror::Error)]
pub enum TokenError {
    #[error("Token has expired")]
    Expired,

    #[error("Invalid or malformed token")]
    Invalid,

    #[error("Failed to sign token: {0}")]
    Signing(String),
}

/// Issues and verifies signed bearer tokens.
///
/// Holds the immutable signing policy loaded at startup; verification is
/// synchronous and never touches the database.
pub struct TokenService {
    settings: JwtSettings,
}

impl TokenService {
    pub fn new(settings: JwtSettings) -> Self {
        Self { settings }
    }

    /// Issue a signed token for an authenticated user and their resolved
    /// roles. Lifetime is fixed at 24 hours from issuance.
    pub fn issue(&self, user: &user::Model, roles: &[role::Model]) -> Result<String, TokenError> {
        let now = Utc::now().timestamp();

        let claims = Claims {
            sub: user.id.to_string(),
            name: user.full_name.clone(),
            username: user.user_name.clone(),
            his_code: user.his_code_acc.clone(),
            roles: roles.iter().map(|r| r.code.clone()).collect(),
            iss: self.settings.issuer.clone(),
            aud: self.settings.audience.clone(),
            iat: now,
            exp: now + TOKEN_LIFETIME_SECONDS,
        };

        encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &EncodingKey::from_secret(self.settings.secret.as_bytes()),
        )
        .map_err(|e| TokenError::Signing(e.to_string()))
    }

    /// Verify signature and expiry, returning the typed claims.
    ///
    /// Expired tokens and tampered tokens are distinguished internally for
    /// logging but both map to an authentication-required outcome at the
    /// HTTP boundary.
    pub fn verify(&self, token: &str) -> Result<Claims, TokenError> {
        let mut validation = Validation::new(Algorithm::HS256);

        if self.settings.validate_issuer {
            validation.set_issuer(&[&self.settings.issuer]);
        }
        if self.settings.validate_audience {
            validation.set_audience(&[&self.settings.audience]);
        } else {
            validation.validate_aud = false;
        }

        let data = decode::<Claims>(
            token,
            &DecodingKey::from_secret(self.settings.secret.as_bytes()),
            &validation,
        )
        .map_err(|e| match e.kind() {
            jsonwebtoken::errors::ErrorKind::ExpiredSignature => TokenError::Expired,
            _ => TokenError::Invalid,
        })?;

        Ok(data.claims)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    fn test_user() -> user::Model {
        user::Model {
            id: 42,
            full_name: "Quản Trị Viên Hệ Thống".to_string(),
            user_name: "admin".to_string(),
            his_code_acc: "ADMIN001".to_string(),
            password_hash: "$argon2id$irrelevant".to_string(),
            phone_number: "0999999999".to_string(),
            job_title: "IT Manager".to_string(),
            department_code: Some("CNTT".to_string()),
            created_by_user_id: None,
            created_at: 0,
        }
    }

    fn test_role(id: i32, code: &str) -> role::Model {
        role::Model {
            id,
            name: format!("role {}", code),
            code: code.to_string(),
            description: None,
            is_active: true,
            created_at: 0,
        }
    }

    fn test_service() -> TokenService {
        TokenService::new(JwtSettings::new("test-secret-key-minimum-32-characters-long"))
    }

    #[test]
    fn test_issued_token_round_trips_subject_and_roles() {
        let service = test_service();
        let roles = vec![test_role(1, "ADMIN"), test_role(2, "QLTB")];

        let token = service.issue(&test_user(), &roles).expect("issue failed");
        let claims = service.verify(&token).expect("verify failed");

        assert_eq!(claims.user_id(), Some(42));
        assert_eq!(claims.his_code, "ADMIN001");
        assert_eq!(claims.username, "admin");

        // Role-claim set equals exactly the assigned codes, order-independent
        let got: HashSet<&str> = claims.roles.iter().map(String::as_str).collect();
        let want: HashSet<&str> = ["ADMIN", "QLTB"].into_iter().collect();
        assert_eq!(got, want);
    }

    #[test]
    fn test_token_lifetime_is_24_hours() {
        let service = test_service();
        let token = service.issue(&test_user(), &[]).expect("issue failed");
        let claims = service.verify(&token).expect("verify failed");

        assert_eq!(claims.exp - claims.iat, TOKEN_LIFETIME_SECONDS);
    }

    #[test]
    fn test_no_roles_yields_empty_role_set() {
        let service = test_service();
        let token = service.issue(&test_user(), &[]).expect("issue failed");
        let claims = service.verify(&token).expect("verify failed");

        assert!(claims.roles.is_empty());
        assert!(!claims.has_role("ADMIN"));
    }

    #[test]
    fn test_verify_fails_with_wrong_secret() {
        let service = test_service();
        let other = TokenService::new(JwtSettings::new("wrong-secret-key-minimum-32-chars!!"));

        let token = service.issue(&test_user(), &[]).expect("issue failed");
        let result = other.verify(&token);

        assert!(matches!(result, Err(TokenError::Invalid)));
    }

    #[test]
    fn test_expired_token_is_rejected_despite_valid_signature() {
        let settings = JwtSettings::new("test-secret-key-minimum-32-characters-long");
        let now = Utc::now().timestamp();

        let expired = Claims {
            sub: "42".to_string(),
            name: "x".to_string(),
            username: "x".to_string(),
            his_code: "x".to_string(),
            roles: vec![],
            iss: settings.issuer.clone(),
            aud: settings.audience.clone(),
            iat: now - 7200,
            exp: now - 3600,
        };

        let token = encode(
            &Header::new(Algorithm::HS256),
            &expired,
            &EncodingKey::from_secret(settings.secret.as_bytes()),
        )
        .expect("encode failed");

        let result = TokenService::new(settings).verify(&token);
        assert!(matches!(result, Err(TokenError::Expired)));
    }

    #[test]
    fn test_garbage_token_is_invalid() {
        let service = test_service();
        assert!(matches!(
            service.verify("not.a.token"),
            Err(TokenError::Invalid)
        ));
    }
}
