use axum::extract::FromRequestParts;
use axum::http::{request::Parts, StatusCode};
use axum::Json;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::ErrorResponse;

/// JWT claims structure
#[derive(Debug, Serialize, Deserialize)]
pub struct JwtClaims {
    pub sub: Uuid,
    pub username: String,
    pub role: String,
    pub iat: i64,
    pub exp: i64,
}

/// Caller identity extracted from the bearer token and stored in request
/// extensions by the auth middleware.
#[derive(Debug, Clone)]
pub struct UserContext {
    pub user_id: Uuid,
    pub username: String,
    pub role: String,
}

impl From<JwtClaims> for UserContext {
    fn from(claims: JwtClaims) -> Self {
        UserContext {
            user_id: claims.sub,
            username: claims.username,
            role: claims.role,
        }
    }
}

// FromRequestParts rather than Extension so handlers can combine the context
// with Multipart in any argument order.
impl<S> FromRequestParts<S> for UserContext
where
    S: Send + Sync,
{
    type Rejection = (StatusCode, Json<ErrorResponse>);

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<UserContext>()
            .cloned()
            .ok_or_else(|| {
                (
                    StatusCode::UNAUTHORIZED,
                    Json(ErrorResponse {
                        error: "Missing user context".to_string(),
                        code: "UNAUTHORIZED".to_string(),
                    }),
                )
            })
    }
}
