use std::sync::Arc;

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::{IntoResponse, Response},
};
use chrono::{Duration, Utc};
use imgpress_core::models::User;
use imgpress_core::AppError;
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};

use crate::auth::models::{JwtClaims, UserContext};
use crate::error::HttpAppError;

/// State the auth middleware needs; shared across requests.
#[derive(Clone)]
pub struct AuthState {
    pub jwt_secret: String,
    pub jwt_expiry_hours: i64,
}

/// Issue a signed token for a freshly authenticated user.
pub fn issue_token(auth: &AuthState, user: &User) -> Result<String, AppError> {
    let now = Utc::now();
    let claims = JwtClaims {
        sub: user.id,
        username: user.username.clone(),
        role: user.role.clone(),
        iat: now.timestamp(),
        exp: (now + Duration::hours(auth.jwt_expiry_hours)).timestamp(),
    };
    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(auth.jwt_secret.as_bytes()),
    )
    .map_err(|e| AppError::Internal(format!("failed to sign token: {e}")))
}

/// Validate a token and return its claims. Expiry is checked here.
pub fn decode_token(auth: &AuthState, token: &str) -> Result<JwtClaims, AppError> {
    decode::<JwtClaims>(
        token,
        &DecodingKey::from_secret(auth.jwt_secret.as_bytes()),
        &Validation::default(),
    )
    .map(|data| data.claims)
    .map_err(|_| AppError::Unauthorized("invalid or expired token".to_string()))
}

/// Gate for the image and history routes: requires `Authorization: Bearer`
/// and inserts the resulting [`UserContext`] into request extensions.
pub async fn auth_middleware(
    State(auth): State<Arc<AuthState>>,
    mut request: Request,
    next: Next,
) -> Response {
    let token = request
        .headers()
        .get("Authorization")
        .and_then(|h| h.to_str().ok())
        .and_then(|h| h.strip_prefix("Bearer "));

    let Some(token) = token else {
        return HttpAppError(AppError::Unauthorized(
            "missing Authorization header".to_string(),
        ))
        .into_response();
    };

    match decode_token(&auth, token) {
        Ok(claims) => {
            request.extensions_mut().insert(UserContext::from(claims));
            next.run(request).await
        }
        Err(err) => HttpAppError(err).into_response(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    fn test_user() -> User {
        User {
            id: Uuid::new_v4(),
            username: "alice".to_string(),
            password_hash: "hash".to_string(),
            role: "user".to_string(),
            created_at: Utc::now(),
        }
    }

    fn auth_state() -> AuthState {
        AuthState {
            jwt_secret: "test-secret".to_string(),
            jwt_expiry_hours: 24,
        }
    }

    #[test]
    fn test_token_round_trip() {
        let auth = auth_state();
        let user = test_user();
        let token = issue_token(&auth, &user).expect("issue");
        let claims = decode_token(&auth, &token).expect("decode");
        assert_eq!(claims.sub, user.id);
        assert_eq!(claims.username, "alice");
        assert_eq!(claims.role, "user");
        assert!(claims.exp > claims.iat);
    }

    #[test]
    fn test_wrong_secret_is_rejected() {
        let auth = auth_state();
        let token = issue_token(&auth, &test_user()).expect("issue");
        let other = AuthState {
            jwt_secret: "other-secret".to_string(),
            jwt_expiry_hours: 24,
        };
        assert!(matches!(
            decode_token(&other, &token),
            Err(AppError::Unauthorized(_))
        ));
    }

    #[test]
    fn test_garbage_token_is_rejected() {
        assert!(decode_token(&auth_state(), "not.a.token").is_err());
    }
}
