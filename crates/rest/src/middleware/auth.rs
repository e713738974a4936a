//! Session token middleware.
//!
//! Data routes require an HS256 JSON Web Token, read from the `token`
//! cookie or an `Authorization: Bearer` header. Verified claims are stored
//! in the request extensions for downstream handlers.

use axum::{
    extract::{Request, State},
    http::{HeaderMap, header},
    middleware::Next,
    response::Response,
};
use chrono::{Duration, Utc};
use cookie::Cookie;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation};
use leadboard_persistence::core::RowStore;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

use crate::error::RestError;
use crate::state::AppState;

/// Name of the cookie carrying the session token.
pub const TOKEN_COOKIE: &str = "token";

/// Lifetime of tokens issued by [`issue_token`].
pub const DEFAULT_TOKEN_TTL_DAYS: i64 = 7;

/// Claims carried by a session token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Claims {
    /// Id of the signed-in user.
    pub user_id: i64,
    /// Email of the signed-in user.
    pub email: String,
    /// Expiry as seconds since the Unix epoch.
    pub exp: i64,
}

/// Token failures.
#[derive(Debug, Error)]
pub enum AuthError {
    /// No token in the cookie or the `Authorization` header.
    #[error("Authentication required")]
    MissingToken,

    /// The token failed verification or has expired.
    #[error("Invalid or expired token")]
    InvalidToken(#[source] jsonwebtoken::errors::Error),

    /// Signing a new token failed.
    #[error("Failed to sign token: {0}")]
    Signing(#[source] jsonwebtoken::errors::Error),
}

impl From<AuthError> for RestError {
    fn from(err: AuthError) -> Self {
        RestError::Unauthorized {
            message: err.to_string(),
        }
    }
}

/// Issues a token valid for [`DEFAULT_TOKEN_TTL_DAYS`].
pub fn issue_token(secret: &[u8], user_id: i64, email: &str) -> Result<String, AuthError> {
    issue_token_with_ttl(secret, user_id, email, Duration::days(DEFAULT_TOKEN_TTL_DAYS))
}

/// Issues a token expiring `ttl` from now.
pub fn issue_token_with_ttl(
    secret: &[u8],
    user_id: i64,
    email: &str,
    ttl: Duration,
) -> Result<String, AuthError> {
    let claims = Claims {
        user_id,
        email: email.to_string(),
        exp: (Utc::now() + ttl).timestamp(),
    };
    jsonwebtoken::encode(
        &Header::new(Algorithm::HS256),
        &claims,
        &EncodingKey::from_secret(secret),
    )
    .map_err(AuthError::Signing)
}

/// Verifies `token` and returns its claims.
pub fn verify_token(secret: &[u8], token: &str) -> Result<Claims, AuthError> {
    let validation = Validation::new(Algorithm::HS256);
    jsonwebtoken::decode::<Claims>(token, &DecodingKey::from_secret(secret), &validation)
        .map(|data| data.claims)
        .map_err(AuthError::InvalidToken)
}

/// Finds the session token, preferring the cookie over the header.
///
/// Cookie values wrapped in double quotes are unquoted.
pub fn extract_token(headers: &HeaderMap) -> Option<String> {
    let from_cookie = headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(Cookie::split_parse)
        .filter_map(Result::ok)
        .find(|cookie| cookie.name() == TOKEN_COOKIE && !cookie.value_trimmed().is_empty())
        .map(|cookie| cookie.value_trimmed().to_string());

    from_cookie.or_else(|| {
        headers
            .get(header::AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .and_then(|value| value.strip_prefix("Bearer "))
            .map(str::trim)
            .filter(|token| !token.is_empty())
            .map(String::from)
    })
}

/// Rejects requests without a valid session token.
///
/// A no-op when authentication is disabled in the configuration.
/// Use with `axum::middleware::from_fn_with_state`.
pub async fn auth_middleware<S>(
    State(state): State<AppState<S>>,
    mut request: Request,
    next: Next,
) -> Result<Response, RestError>
where
    S: RowStore + 'static,
{
    if !state.auth_enabled() {
        return Ok(next.run(request).await);
    }

    let Some(token) = extract_token(request.headers()) else {
        warn!(path = %request.uri().path(), "Missing session token");
        return Err(AuthError::MissingToken.into());
    };

    let claims = verify_token(state.jwt_secret(), &token).inspect_err(|e| {
        warn!(error = ?e, "Rejected session token");
    })?;
    debug!(user_id = claims.user_id, "Authenticated request");

    request.extensions_mut().insert(claims);
    Ok(next.run(request).await)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    const SECRET: &[u8] = b"test-secret";

    #[test]
    fn test_issue_and_verify() {
        let token = issue_token(SECRET, 42, "ada@example.com").unwrap();
        let claims = verify_token(SECRET, &token).unwrap();
        assert_eq!(claims.user_id, 42);
        assert_eq!(claims.email, "ada@example.com");

        let ttl = claims.exp - Utc::now().timestamp();
        assert!(ttl > Duration::days(6).num_seconds());
        assert!(ttl <= Duration::days(7).num_seconds());
    }

    #[test]
    fn test_wrong_secret_is_rejected() {
        let token = issue_token(SECRET, 1, "a@example.com").unwrap();
        assert!(matches!(
            verify_token(b"other-secret", &token),
            Err(AuthError::InvalidToken(_))
        ));
    }

    #[test]
    fn test_expired_token_is_rejected() {
        let token = issue_token_with_ttl(SECRET, 1, "a@example.com", Duration::hours(-2)).unwrap();
        assert!(matches!(
            verify_token(SECRET, &token),
            Err(AuthError::InvalidToken(_))
        ));
    }

    #[test]
    fn test_claims_use_camel_case() {
        let claims = Claims {
            user_id: 7,
            email: "a@example.com".to_string(),
            exp: 0,
        };
        let json = serde_json::to_value(&claims).unwrap();
        assert_eq!(json["userId"], 7);
    }

    #[test]
    fn test_extract_token_from_cookie() {
        let mut headers = HeaderMap::new();
        headers.insert(
            header::COOKIE,
            HeaderValue::from_static("theme=dark; token=abc.def.ghi"),
        );
        headers.insert(header::AUTHORIZATION, HeaderValue::from_static("Bearer other"));
        assert_eq!(extract_token(&headers).as_deref(), Some("abc.def.ghi"));
    }

    #[test]
    fn test_extract_token_from_bearer() {
        let mut headers = HeaderMap::new();
        headers.insert(header::COOKIE, HeaderValue::from_static("token="));
        headers.insert(header::AUTHORIZATION, HeaderValue::from_static("Bearer xyz"));
        assert_eq!(extract_token(&headers).as_deref(), Some("xyz"));
    }

    #[test]
    fn test_extract_token_unquotes_cookie_value() {
        let mut headers = HeaderMap::new();
        headers.insert(
            header::COOKIE,
            HeaderValue::from_static("token=\"abc.def.ghi\"; theme=dark"),
        );
        assert_eq!(extract_token(&headers).as_deref(), Some("abc.def.ghi"));
    }

    #[test]
    fn test_extract_token_missing() {
        let mut headers = HeaderMap::new();
        headers.insert(header::AUTHORIZATION, HeaderValue::from_static("Basic dXNlcg=="));
        assert_eq!(extract_token(&headers), None);
    }
}
