use axum::async_trait;
use axum::extract::FromRequestParts;
use axum::http::{header, request::Parts, HeaderMap};
use axum_extra::extract::CookieJar;
use chrono::{Duration, Utc};
use eyre::{eyre, Result};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

use crate::{app_state::SharedState, http_error::ApiError};

pub const SESSION_COOKIE: &str = "mivora_session";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionClaims {
    /// owner email, the identity every record is scoped to
    pub sub: String,
    pub exp: usize,
}

pub fn create_session_token(email: &str, secret: &str, max_age_hours: i64) -> Result<String> {
    let exp = (Utc::now() + Duration::hours(max_age_hours)).timestamp() as usize;
    let claims = SessionClaims {
        sub: email.to_owned(),
        exp,
    };
    jsonwebtoken::encode(
        &Header::new(Algorithm::HS256),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .map_err(|err| eyre!("error creating session token: {}", err))
}

pub fn verify_session_token(token: &str, secret: &str) -> Option<SessionClaims> {
    let mut validation = Validation::new(Algorithm::HS256);
    validation.validate_exp = true;
    jsonwebtoken::decode::<SessionClaims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &validation,
    )
    .map(|data| data.claims)
    .ok()
}

/// Session token from the session cookie or an Authorization bearer header.
pub fn token_from_headers(headers: &HeaderMap) -> Option<String> {
    let jar = CookieJar::from_headers(headers);
    if let Some(cookie) = jar.get(SESSION_COOKIE) {
        return Some(cookie.value().to_owned());
    }
    headers
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .map(|token| token.to_owned())
}

/// Extractor for handlers that require a valid session. Rejects with 401,
/// the handler never runs for anonymous requests.
#[derive(Debug, Clone)]
pub struct SessionUser {
    pub email: String,
}

#[async_trait]
impl FromRequestParts<SharedState> for SessionUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &SharedState,
    ) -> Result<Self, Self::Rejection> {
        let token = token_from_headers(&parts.headers).ok_or(ApiError::Unauthorized)?;
        let claims = verify_session_token(&token, &state.config.auth.session_secret)
            .ok_or(ApiError::Unauthorized)?;
        Ok(SessionUser { email: claims.sub })
    }
}

#[cfg(test)]
mod test {
    use claims::{assert_none, assert_ok, assert_some};

    use super::{create_session_token, verify_session_token};

    #[test]
    fn token_roundtrip() {
        let token = assert_ok!(create_session_token("alice@example.com", "secret", 1));
        let claims = assert_some!(verify_session_token(&token, "secret"));
        assert_eq!(claims.sub, "alice@example.com");
    }

    #[test]
    fn wrong_secret_is_rejected() {
        let token = assert_ok!(create_session_token("alice@example.com", "secret", 1));
        assert_none!(verify_session_token(&token, "other secret"));
    }

    #[test]
    fn expired_token_is_rejected() {
        let token = assert_ok!(create_session_token("alice@example.com", "secret", -1));
        assert_none!(verify_session_token(&token, "secret"));
    }
}
