use {
    axum::{
        Json,
        extract::FromRequestParts,
        http::{StatusCode, header::AUTHORIZATION, request::Parts},
        response::{IntoResponse, Response},
    },
    jsonwebtoken::{Algorithm, DecodingKey, Validation, decode},
    serde::Deserialize,
    serde_json::json,
    thiserror::Error,
};

use crate::state::AppState;

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("missing bearer token")]
    MissingToken,
    #[error("invalid bearer token")]
    InvalidToken,
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        (
            StatusCode::UNAUTHORIZED,
            Json(json!({ "message": self.to_string() })),
        )
            .into_response()
    }
}

#[derive(Debug, Deserialize)]
struct Claims {
    sub: String,
}

/// Identity resolved from a verified `Authorization: Bearer <jwt>` header.
/// The user id is the token's `sub` claim.
pub struct AuthedUser(pub String);

impl FromRequestParts<AppState> for AuthedUser {
    type Rejection = AuthError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, AuthError> {
        let header = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .ok_or(AuthError::MissingToken)?;
        let token = header.strip_prefix("Bearer ").ok_or(AuthError::MissingToken)?;
        let user_id = verify_token(token, &state.resources.config.jwt_secret)?;
        Ok(AuthedUser(user_id))
    }
}

/// Verify an HS256 token and extract the subject. Audience validation is
/// off: identity-provider tokens carry provider-specific audiences.
pub fn verify_token(token: &str, secret: &str) -> Result<String, AuthError> {
    let mut validation = Validation::new(Algorithm::HS256);
    validation.validate_aud = false;
    let data = decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &validation,
    )
    .map_err(|_| AuthError::InvalidToken)?;
    if data.claims.sub.is_empty() {
        return Err(AuthError::InvalidToken);
    }
    Ok(data.claims.sub)
}

#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
mod tests {
    use jsonwebtoken::{EncodingKey, Header, encode};
    use serde::Serialize;

    use super::*;

    #[derive(Serialize)]
    struct TestClaims {
        sub: String,
        exp: u64,
    }

    fn token(sub: &str, secret: &str) -> String {
        let claims = TestClaims {
            sub: sub.into(),
            exp: 4_102_444_800, // 2100-01-01
        };
        encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(secret.as_bytes()),
        )
        .unwrap()
    }

    #[test]
    fn valid_token_yields_subject() {
        let t = token("user-42", "secret");
        assert_eq!(verify_token(&t, "secret").unwrap(), "user-42");
    }

    #[test]
    fn wrong_secret_is_rejected() {
        let t = token("user-42", "secret");
        assert!(verify_token(&t, "other").is_err());
    }

    #[test]
    fn garbage_is_rejected() {
        assert!(verify_token("not-a-jwt", "secret").is_err());
    }

    #[test]
    fn empty_subject_is_rejected() {
        let t = token("", "secret");
        assert!(verify_token(&t, "secret").is_err());
    }
}
