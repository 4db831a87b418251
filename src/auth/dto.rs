use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use crate::auth::repo::User;
use crate::error::ApiError;

lazy_static! {
    static ref EMAIL_RE: Regex = Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").unwrap();
}

pub(crate) fn is_valid_email(email: &str) -> bool {
    EMAIL_RE.is_match(email)
}

/// Request body for user registration.
#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub email: String,
    pub username: String,
    pub password: String,
}

impl RegisterRequest {
    pub fn validate(&self) -> Result<(), ApiError> {
        if !is_valid_email(&self.email) {
            return Err(ApiError::validation("Invalid email"));
        }
        if self.username.chars().count() < 3 || self.username.chars().count() > 50 {
            return Err(ApiError::validation("Username must be 3-50 characters"));
        }
        if self.password.chars().count() < 6 || self.password.chars().count() > 100 {
            return Err(ApiError::validation("Password must be 6-100 characters"));
        }
        Ok(())
    }
}

/// Request body for login.
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

impl LoginRequest {
    pub fn validate(&self) -> Result<(), ApiError> {
        if !is_valid_email(&self.email) {
            return Err(ApiError::validation("Invalid email"));
        }
        Ok(())
    }
}

/// Public part of the user returned to clients.
#[derive(Debug, Serialize)]
pub struct UserResponse {
    pub id: i32,
    pub email: String,
    pub username: String,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            email: user.email,
            username: user.username,
            created_at: user.created_at,
        }
    }
}

/// Minimal author info embedded in recipe responses.
#[derive(Debug, Serialize)]
pub struct AuthorResponse {
    pub id: i32,
    pub username: String,
}

/// Response returned after register or login. The token is also set as an
/// httpOnly cookie; the body echoes it for non-cookie clients, under both
/// field names the frontend has historically used.
#[derive(Debug, Serialize)]
pub struct AuthResponse {
    pub user: UserResponse,
    pub message: Option<String>,
    pub access_token: Option<String>,
    pub token: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::datetime;

    fn register(email: &str, username: &str, password: &str) -> RegisterRequest {
        RegisterRequest {
            email: email.into(),
            username: username.into(),
            password: password.into(),
        }
    }

    #[test]
    fn accepts_reasonable_registration() {
        assert!(register("demo@mail.uc.edu", "demo_user", "demo123").validate().is_ok());
    }

    #[test]
    fn rejects_bad_email() {
        assert!(register("not-an-email", "demo_user", "demo123").validate().is_err());
        assert!(register("a@b", "demo_user", "demo123").validate().is_err());
    }

    #[test]
    fn rejects_short_username_and_password() {
        assert!(register("demo@mail.uc.edu", "ab", "demo123").validate().is_err());
        assert!(register("demo@mail.uc.edu", "demo_user", "12345").validate().is_err());
    }

    #[test]
    fn user_response_hides_password_hash() {
        let user = User {
            id: 1,
            email: "test@mail.uc.edu".into(),
            username: "test_user".into(),
            password_hash: "secret-hash".into(),
            created_at: datetime!(2024-02-22 12:00 UTC),
        };
        let json = serde_json::to_string(&UserResponse::from(user)).unwrap();
        assert!(json.contains("test@mail.uc.edu"));
        assert!(!json.contains("secret-hash"));
    }
}
