//! Session tokens (HS256 JWT) and the extractors that guard protected routes.

use async_trait::async_trait;
use axum::{
    extract::FromRequestParts,
    http::{header::AUTHORIZATION, request::Parts},
};
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use tracing::warn;
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::user::{Role, User};
use crate::state::AppState;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,
    pub role: Role,
    pub iat: usize,
    pub exp: usize,
}

/// Signing and verification keys plus token lifetime.
#[derive(Clone)]
pub struct TokenKeys {
    encoding: EncodingKey,
    decoding: DecodingKey,
    ttl: Duration,
}

impl TokenKeys {
    pub fn new(secret: &str, ttl_hours: i64) -> Self {
        Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
            ttl: Duration::hours(ttl_hours),
        }
    }

    pub fn issue(&self, user: &User) -> Result<String, AppError> {
        let now = Utc::now();
        let claims = Claims {
            sub: user.id.to_string(),
            role: user.role,
            iat: now.timestamp() as usize,
            exp: (now + self.ttl).timestamp() as usize,
        };
        encode(&Header::default(), &claims, &self.encoding)
            .map_err(|e| AppError::Internal(anyhow::anyhow!("token signing failed: {e}")))
    }

    /// Rejects bad signatures and expired tokens with `Unauthorized`.
    pub fn verify(&self, token: &str) -> Result<Claims, AppError> {
        decode::<Claims>(token, &self.decoding, &Validation::default())
            .map(|data| data.claims)
            .map_err(|e| {
                warn!("Rejected session token: {e}");
                AppError::Unauthorized
            })
    }
}

/// Caller identity taken from `Authorization: Bearer <token>`.
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub id: Uuid,
    pub role: Role,
}

#[async_trait]
impl FromRequestParts<AppState> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let token = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .and_then(|value| value.strip_prefix("Bearer "))
            .ok_or(AppError::Unauthorized)?;

        let claims = state.tokens.verify(token.trim())?;
        let id = Uuid::parse_str(&claims.sub).map_err(|_| AppError::Unauthorized)?;

        Ok(AuthUser {
            id,
            role: claims.role,
        })
    }
}

/// An `AuthUser` whose token carries the admin role. Other roles get 403.
#[derive(Debug, Clone)]
pub struct AdminUser(pub AuthUser);

#[async_trait]
impl FromRequestParts<AppState> for AdminUser {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let user = AuthUser::from_request_parts(parts, state).await?;
        if user.role != Role::Admin {
            warn!("User {} ({}) attempted an admin action", user.id, user.role);
            return Err(AppError::Forbidden(
                "Unauthorized: Only admins can manage internships".to_string(),
            ));
        }
        Ok(AdminUser(user))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user(role: Role) -> User {
        User {
            id: Uuid::new_v4(),
            name: "Meera".to_string(),
            email: "meera@example.com".to_string(),
            password_hash: String::new(),
            role,
            skills: vec![],
            interests: vec![],
            education: None,
            description: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_issued_token_verifies_with_role() {
        let keys = TokenKeys::new("test-secret", 1);
        let admin = user(Role::Admin);
        let token = keys.issue(&admin).unwrap();

        let claims = keys.verify(&token).unwrap();
        assert_eq!(claims.sub, admin.id.to_string());
        assert_eq!(claims.role, Role::Admin);
    }

    #[test]
    fn test_token_signed_with_other_secret_is_rejected() {
        let token = TokenKeys::new("one", 1).issue(&user(Role::Admin)).unwrap();
        let result = TokenKeys::new("two", 1).verify(&token);
        assert!(matches!(result, Err(AppError::Unauthorized)));
    }

    #[test]
    fn test_expired_token_is_rejected() {
        // Well past the default 60s leeway.
        let keys = TokenKeys::new("test-secret", -1);
        let token = keys.issue(&user(Role::Student)).unwrap();
        assert!(matches!(keys.verify(&token), Err(AppError::Unauthorized)));
    }
}
