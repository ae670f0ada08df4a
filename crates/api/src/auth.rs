//! Caller identity read from an optional JWT Bearer token.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use jsonwebtoken::{decode, DecodingKey, Validation};
use serde::{Deserialize, Serialize};

use crate::error::ApiError;
use crate::state::AppState;

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    /// Username of the caller.
    pub sub: String,
    /// Expiration time (UTC Unix timestamp).
    pub exp: i64,
}

/// Decode and verify an HS256 token.
pub fn validate_token(token: &str, secret: &str) -> Result<Claims, jsonwebtoken::errors::Error> {
    let data = decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &Validation::default(),
    )?;
    Ok(data.claims)
}

/// Identity from the `Authorization: Bearer <token>` header, or anonymous when
/// the header is absent. A present but unusable token is rejected.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CurrentUser(pub Option<String>);

impl CurrentUser {
    pub fn name(&self) -> Option<&str> {
        self.0.as_deref()
    }

    fn from_header(header: Option<&str>, secret: &str) -> Result<Self, ApiError> {
        let Some(header) = header else {
            return Ok(Self(None));
        };
        let token = header.strip_prefix("Bearer ").ok_or_else(|| {
            ApiError::Unauthorized("Invalid Authorization format. Expected: Bearer <token>".into())
        })?;
        let claims = validate_token(token, secret)
            .map_err(|_| ApiError::Unauthorized("Invalid or expired token".into()))?;
        Ok(Self(Some(claims.sub)))
    }
}

impl FromRequestParts<AppState> for CurrentUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let header = parts
            .headers
            .get("authorization")
            .and_then(|v| v.to_str().ok());
        Self::from_header(header, &state.config().jwt_secret)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use jsonwebtoken::{encode, EncodingKey, Header};

    const SECRET: &str = "test-secret-that-is-long-enough-for-hmac";

    fn token(sub: &str, exp_offset: i64, secret: &str) -> String {
        let claims = Claims {
            sub: sub.to_string(),
            exp: chrono::Utc::now().timestamp() + exp_offset,
        };
        encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(secret.as_bytes()),
        )
        .expect("encoding should succeed")
    }

    #[test]
    fn missing_header_is_anonymous() {
        assert_eq!(CurrentUser::from_header(None, SECRET).unwrap(), CurrentUser(None));
    }

    #[test]
    fn valid_token_names_the_caller() {
        let header = format!("Bearer {}", token("ana", 600, SECRET));
        let user = CurrentUser::from_header(Some(&header), SECRET).unwrap();
        assert_eq!(user.name(), Some("ana"));
    }

    #[test]
    fn bad_tokens_are_rejected() {
        let expired = format!("Bearer {}", token("ana", -300, SECRET));
        let foreign = format!("Bearer {}", token("ana", 600, "another-secret"));
        for header in [expired.as_str(), foreign.as_str(), "Basic abc"] {
            assert!(matches!(
                CurrentUser::from_header(Some(header), SECRET),
                Err(ApiError::Unauthorized(_))
            ));
        }
    }
}
