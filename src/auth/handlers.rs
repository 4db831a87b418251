use axum::{
    extract::{FromRef, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use time::Duration as TimeDuration;
use tracing::{info, instrument, warn};

use crate::auth::dto::{AuthResponse, LoginRequest, RegisterRequest, UserResponse};
use crate::auth::extractors::{AuthUser, ACCESS_TOKEN_COOKIE};
use crate::auth::jwt::JwtKeys;
use crate::auth::services;
use crate::common::SuccessResponse;
use crate::error::ApiError;
use crate::state::AppState;

pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/auth/register", post(register))
        .route("/auth/login", post(login))
        .route("/auth/me", get(me))
        .route("/auth/logout", post(logout))
}

/// Session cookie: httpOnly, SameSite=Lax, whole-site path, Max-Age = token
/// TTL. The secure flag stays off for plain-HTTP development deployments.
fn session_cookie(token: String, ttl_minutes: i64) -> Cookie<'static> {
    Cookie::build((ACCESS_TOKEN_COOKIE, token))
        .http_only(true)
        .same_site(SameSite::Lax)
        .path("/")
        .max_age(TimeDuration::minutes(ttl_minutes))
        .build()
}

#[instrument(skip(state, jar, payload))]
async fn register(
    State(state): State<AppState>,
    jar: CookieJar,
    Json(mut payload): Json<RegisterRequest>,
) -> Result<(StatusCode, CookieJar, Json<AuthResponse>), ApiError> {
    payload.email = payload.email.trim().to_string();
    payload.validate()?;

    let user = services::register_user(&state.db, &payload).await?;

    let keys = JwtKeys::from_ref(&state);
    let token = services::create_user_token(&keys, &user)?;
    let jar = jar.add(session_cookie(token.clone(), keys.ttl_minutes()));

    Ok((
        StatusCode::CREATED,
        jar,
        Json(AuthResponse {
            user: UserResponse::from(user),
            message: Some("User registered successfully".into()),
            access_token: Some(token.clone()),
            token: Some(token),
        }),
    ))
}

#[instrument(skip(state, jar, payload))]
async fn login(
    State(state): State<AppState>,
    jar: CookieJar,
    Json(mut payload): Json<LoginRequest>,
) -> Result<(CookieJar, Json<AuthResponse>), ApiError> {
    payload.email = payload.email.trim().to_string();
    payload.validate()?;

    let Some(user) = services::authenticate_user(&state.db, &payload.email, &payload.password)
        .await?
    else {
        warn!(email = %payload.email, "login failed");
        return Err(ApiError::unauthorized("Incorrect email or password"));
    };

    let keys = JwtKeys::from_ref(&state);
    let token = services::create_user_token(&keys, &user)?;
    let jar = jar.add(session_cookie(token.clone(), keys.ttl_minutes()));

    info!(user_id = user.id, "user logged in");
    Ok((
        jar,
        Json(AuthResponse {
            user: UserResponse::from(user),
            message: Some("Login successful".into()),
            access_token: Some(token.clone()),
            token: Some(token),
        }),
    ))
}

#[instrument(skip_all)]
async fn me(AuthUser(user): AuthUser) -> Json<UserResponse> {
    Json(UserResponse::from(user))
}

#[instrument(skip(jar))]
async fn logout(jar: CookieJar) -> (CookieJar, Json<SuccessResponse>) {
    let mut cookie = Cookie::from(ACCESS_TOKEN_COOKIE);
    cookie.set_path("/");
    let jar = jar.remove(cookie);

    (jar, Json(SuccessResponse::new("Logout successful")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn session_cookie_attributes() {
        let cookie = session_cookie("tok".into(), 30);
        assert_eq!(cookie.name(), ACCESS_TOKEN_COOKIE);
        assert_eq!(cookie.value(), "tok");
        assert_eq!(cookie.http_only(), Some(true));
        assert_eq!(cookie.same_site(), Some(SameSite::Lax));
        assert_eq!(cookie.path(), Some("/"));
        assert_eq!(cookie.max_age(), Some(TimeDuration::minutes(30)));
    }
}
