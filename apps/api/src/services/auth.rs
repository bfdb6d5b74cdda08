//! Access token verification
//!
//! Users sign in with the auth provider; the API only verifies the HS256
//! access tokens it issues.

use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};

use crate::error::{ApiError, ApiResult};
use crate::models::user::{Claims, AUTHENTICATED_AUDIENCE};

/// Authentication service configuration
#[derive(Debug, Clone)]
pub struct AuthConfig {
    /// JWT signing secret shared with the auth provider
    pub jwt_secret: String,
    /// Expected JWT audience
    pub audience: String,
}

impl AuthConfig {
    pub fn new(jwt_secret: String) -> Self {
        Self {
            jwt_secret,
            audience: AUTHENTICATED_AUDIENCE.to_string(),
        }
    }
}

/// Verifies bearer tokens
#[derive(Clone)]
pub struct AuthService {
    config: AuthConfig,
    decoding_key: DecodingKey,
}

impl AuthService {
    pub fn new(config: AuthConfig) -> Self {
        let decoding_key = DecodingKey::from_secret(config.jwt_secret.as_bytes());
        Self {
            config,
            decoding_key,
        }
    }

    /// Verify an access token and return its claims
    pub fn verify_access_token(&self, token: &str) -> ApiResult<Claims> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_audience(&[&self.config.audience]);

        let token_data = decode::<Claims>(token, &self.decoding_key, &validation).map_err(|e| {
            tracing::debug!(error = %e, "Access token verification failed");
            ApiError::InvalidToken(e.to_string())
        })?;

        if token_data.claims.sub.is_empty() {
            return Err(ApiError::InvalidToken("token has no subject".to_string()));
        }

        Ok(token_data.claims)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use jsonwebtoken::{encode, EncodingKey, Header};

    const SECRET: &str = "test-secret-that-is-at-least-32-characters";

    fn token(sub: &str, aud: &str, exp_offset: i64, secret: &str) -> String {
        let claims = Claims {
            sub: sub.to_string(),
            email: Some("mood@example.com".to_string()),
            exp: chrono::Utc::now().timestamp() + exp_offset,
            aud: aud.to_string(),
            role: Some("authenticated".to_string()),
        };
        encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(secret.as_bytes()),
        )
        .unwrap()
    }

    fn service() -> AuthService {
        AuthService::new(AuthConfig::new(SECRET.to_string()))
    }

    #[test]
    fn test_valid_token() {
        let claims = service()
            .verify_access_token(&token("user-1", "authenticated", 3600, SECRET))
            .unwrap();
        assert_eq!(claims.sub, "user-1");
        assert_eq!(claims.email.as_deref(), Some("mood@example.com"));
    }

    #[test]
    fn test_wrong_audience_rejected() {
        let result = service().verify_access_token(&token("user-1", "anon", 3600, SECRET));
        assert!(matches!(result, Err(ApiError::InvalidToken(_))));
    }

    #[test]
    fn test_expired_token_rejected() {
        let result =
            service().verify_access_token(&token("user-1", "authenticated", -3600, SECRET));
        assert!(matches!(result, Err(ApiError::InvalidToken(_))));
    }

    #[test]
    fn test_wrong_secret_rejected() {
        let result = service().verify_access_token(&token(
            "user-1",
            "authenticated",
            3600,
            "some-other-secret-of-sufficient-length",
        ));
        assert!(matches!(result, Err(ApiError::InvalidToken(_))));
    }

    #[test]
    fn test_empty_subject_rejected() {
        let result = service().verify_access_token(&token("", "authenticated", 3600, SECRET));
        assert!(matches!(result, Err(ApiError::InvalidToken(_))));
    }
}
