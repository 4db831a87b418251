use axum::{
    async_trait,
    extract::{FromRef, FromRequestParts},
    http::{header, request::Parts},
};
use axum_extra::extract::cookie::CookieJar;
use tracing::warn;

use crate::auth::jwt::JwtKeys;
use crate::auth::repo::User;
use crate::error::ApiError;
use crate::state::AppState;

/// Cookie carrying the session token.
pub const ACCESS_TOKEN_COOKIE: &str = "access_token";

/// Required authentication: rejects with 401 (and a `WWW-Authenticate`
/// challenge) when the request carries no resolvable user.
pub struct AuthUser(pub User);

/// Optional authentication: an absent or invalid token yields `None`,
/// never an error.
pub struct MaybeUser(pub Option<User>);

/// Locate the session token: cookie first, then `Authorization: Bearer`.
fn token_from_parts(parts: &Parts) -> Option<String> {
    let jar = CookieJar::from_headers(&parts.headers);
    if let Some(cookie) = jar.get(ACCESS_TOKEN_COOKIE) {
        return Some(cookie.value().to_string());
    }

    parts
        .headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .map(str::to_string)
}

/// Resolve the request's user. `Ok(None)` covers every "unauthenticated"
/// case (no token, bad token, non-integer subject, user gone); `Err` is
/// reserved for storage failures.
async fn resolve_user(state: &AppState, parts: &Parts) -> Result<Option<User>, ApiError> {
    let Some(token) = token_from_parts(parts) else {
        return Ok(None);
    };

    let keys = JwtKeys::from_ref(state);
    let claims = match keys.verify(&token) {
        Ok(c) => c,
        Err(_) => {
            warn!("invalid or expired token");
            return Ok(None);
        }
    };

    let Some(user_id) = claims.subject_id() else {
        warn!(sub = %claims.sub, "token subject is not an integer id");
        return Ok(None);
    };

    let user = User::find_by_id(&state.db, user_id)
        .await
        .map_err(ApiError::Internal)?;
    Ok(user)
}

#[async_trait]
impl FromRequestParts<AppState> for AuthUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        match resolve_user(state, parts).await? {
            Some(user) => Ok(AuthUser(user)),
            None => Err(ApiError::unauthorized("Could not validate credentials")),
        }
    }
}

#[async_trait]
impl FromRequestParts<AppState> for MaybeUser {
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        // Optional mode degrades to anonymous on any failure.
        Ok(MaybeUser(resolve_user(state, parts).await.unwrap_or(None)))
    }
}
