//! Authentication middleware.
//!
//! Tokens are issued elsewhere; this layer only verifies the HS256
//! signature and expiry and hands the login on as a [`CallerContext`].

use axum::{
    body::Body,
    extract::State,
    http::{header::AUTHORIZATION, Request},
    middleware::Next,
    response::Response,
};
use jsonwebtoken::{decode, DecodingKey, Validation};
use serde::{Deserialize, Serialize};

use common::{AppError, AppResult, JwtConfig};
use domain::{CallerContext, BEARER_TOKEN_PREFIX};

use crate::state::AppState;

/// JWT claims payload. `sub` carries the login identifier (email).
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,
    pub exp: i64,
    #[serde(default)]
    pub iat: i64,
}

/// Verify a bearer token and return its claims.
pub fn decode_token(token: &str, config: &JwtConfig) -> AppResult<Claims> {
    let token_data = decode::<Claims>(
        token,
        &DecodingKey::from_secret(config.secret_bytes()),
        &Validation::default(),
    )?;

    Ok(token_data.claims)
}

/// Authentication middleware that validates JWT tokens.
pub async fn auth_middleware(
    State(state): State<AppState>,
    mut request: Request<Body>,
    next: Next,
) -> Result<Response, AppError> {
    let token = extract_token(&request)?;
    let claims = decode_token(token, &state.config.jwt)?;

    request
        .extensions_mut()
        .insert(CallerContext::authenticated(claims.sub));

    Ok(next.run(request).await)
}

/// Extract bearer token from Authorization header.
fn extract_token(request: &Request<Body>) -> AppResult<&str> {
    request
        .headers()
        .get(AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .and_then(|h| h.strip_prefix(BEARER_TOKEN_PREFIX))
        .filter(|token| !token.is_empty())
        .ok_or(AppError::Unauthorized)
}

#[cfg(test)]
mod tests {
    use chrono::Utc;
    use jsonwebtoken::{encode, EncodingKey, Header};

    use super::*;

    fn config() -> JwtConfig {
        JwtConfig {
            secret: "test-secret-key-for-testing-only-32chars".to_string(),
        }
    }

    fn token(sub: &str, exp: i64, secret: &str) -> String {
        let claims = Claims {
            sub: sub.to_string(),
            exp,
            iat: Utc::now().timestamp(),
        };
        encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(secret.as_bytes()),
        )
        .unwrap()
    }

    #[test]
    fn test_decode_valid_token() {
        let exp = Utc::now().timestamp() + 3600;
        let claims = decode_token(&token("maria@gmail.com", exp, &config().secret), &config())
            .unwrap();
        assert_eq!(claims.sub, "maria@gmail.com");
    }

    #[test]
    fn test_decode_rejects_wrong_signature() {
        let exp = Utc::now().timestamp() + 3600;
        let forged = token("maria@gmail.com", exp, "another-secret-key-that-is-32-chars!!");
        assert!(matches!(
            decode_token(&forged, &config()),
            Err(AppError::Jwt(_))
        ));
    }

    #[test]
    fn test_decode_rejects_expired_token() {
        let exp = Utc::now().timestamp() - 3600;
        let expired = token("maria@gmail.com", exp, &config().secret);
        assert!(decode_token(&expired, &config()).is_err());
    }

    #[test]
    fn test_extract_token_requires_bearer_scheme() {
        let request = Request::builder()
            .header(AUTHORIZATION, "Basic abc")
            .body(Body::empty())
            .unwrap();
        assert!(matches!(extract_token(&request), Err(AppError::Unauthorized)));

        let request = Request::builder()
            .header(AUTHORIZATION, "Bearer abc")
            .body(Body::empty())
            .unwrap();
        assert_eq!(extract_token(&request).unwrap(), "abc");
    }
}
