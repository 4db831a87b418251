use sqlx::PgPool;
use tracing::{info, warn};

use crate::auth::dto::RegisterRequest;
use crate::auth::jwt::JwtKeys;
use crate::auth::password::{hash_password, verify_password};
use crate::auth::repo::User;
use crate::error::{is_unique_violation, ApiError};

const EMAIL_TAKEN: &str = "Email already registered";

/// Register a new user. The email uniqueness check runs twice: a proactive
/// lookup for the common case, and the unique index as the final arbiter
/// when two registrations race — both paths yield the same conflict.
pub async fn register_user(db: &PgPool, payload: &RegisterRequest) -> Result<User, ApiError> {
    match User::find_by_email(db, &payload.email).await {
        Ok(Some(_)) => {
            warn!(email = %payload.email, "email already registered");
            return Err(ApiError::conflict(EMAIL_TAKEN));
        }
        Ok(None) => {}
        Err(e) => return Err(ApiError::Internal(e)),
    }

    let hash = hash_password(&payload.password).map_err(ApiError::Internal)?;

    match User::create(db, &payload.email, &payload.username, &hash).await {
        Ok(user) => {
            info!(user_id = user.id, email = %user.email, "user registered");
            Ok(user)
        }
        Err(e) => {
            let unique = e
                .downcast_ref::<sqlx::Error>()
                .map(is_unique_violation)
                .unwrap_or(false);
            if unique {
                warn!(email = %payload.email, "registration lost uniqueness race");
                Err(ApiError::conflict(EMAIL_TAKEN))
            } else {
                Err(ApiError::Internal(e))
            }
        }
    }
}

/// Look up a user by email and verify the password. Unknown email and wrong
/// password both come back as `None`; neither is an error.
pub async fn authenticate_user(
    db: &PgPool,
    email: &str,
    password: &str,
) -> Result<Option<User>, ApiError> {
    let Some(user) = User::find_by_email(db, email)
        .await
        .map_err(ApiError::Internal)?
    else {
        return Ok(None);
    };

    let ok = verify_password(password, &user.password_hash).map_err(ApiError::Internal)?;
    Ok(ok.then_some(user))
}

/// Issue a session token carrying the user's id and email.
pub fn create_user_token(keys: &JwtKeys, user: &User) -> Result<String, ApiError> {
    keys.sign(user.id, &user.email).map_err(ApiError::Internal)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::AppState;
    use axum::extract::FromRef;

    #[tokio::test]
    async fn token_subject_is_the_user_id() {
        let state = AppState::fake();
        let keys = JwtKeys::from_ref(&state);
        let user = User {
            id: 17,
            email: "test@mail.uc.edu".into(),
            username: "test_user".into(),
            password_hash: "x".into(),
            created_at: time::OffsetDateTime::now_utc(),
        };
        let token = create_user_token(&keys, &user).expect("token");
        let claims = keys.verify(&token).expect("claims");
        assert_eq!(claims.subject_id(), Some(17));
        assert_eq!(claims.email, "test@mail.uc.edu");
    }
}
