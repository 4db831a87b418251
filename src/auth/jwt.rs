use std::time::Duration;

use axum::extract::FromRef;
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use time::{Duration as TimeDuration, OffsetDateTime};
use tracing::debug;

use crate::auth::claims::Claims;
use crate::config::JwtConfig;
use crate::state::AppState;

/// Holds JWT signing and verification keys plus the session TTL.
#[derive(Clone)]
pub struct JwtKeys {
    pub encoding: EncodingKey,
    pub decoding: DecodingKey,
    pub ttl: Duration,
}

impl FromRef<AppState> for JwtKeys {
    fn from_ref(state: &AppState) -> Self {
        let JwtConfig { secret, ttl_minutes } = state.config.jwt.clone();
        Self::new(&secret, ttl_minutes)
    }
}

impl JwtKeys {
    pub fn new(secret: &str, ttl_minutes: i64) -> Self {
        Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
            ttl: Duration::from_secs((ttl_minutes.max(0) as u64) * 60),
        }
    }

    /// Sign a session token for a user. The subject claim is the
    /// stringified user id.
    pub fn sign(&self, user_id: i32, email: &str) -> anyhow::Result<String> {
        let now = OffsetDateTime::now_utc();
        let exp = now + TimeDuration::seconds(self.ttl.as_secs() as i64);
        let claims = Claims {
            sub: user_id.to_string(),
            email: email.to_string(),
            iat: now.unix_timestamp() as usize,
            exp: exp.unix_timestamp() as usize,
        };
        let token = encode(&Header::default(), &claims, &self.encoding)?;
        debug!(user_id, "jwt signed");
        Ok(token)
    }

    /// Verify signature and expiry. Any failure (expired, malformed, wrong
    /// signature) comes back as an error; callers treat all of them as
    /// "unauthenticated".
    pub fn verify(&self, token: &str) -> anyhow::Result<Claims> {
        let data = decode::<Claims>(token, &self.decoding, &Validation::default())?;
        debug!(sub = %data.claims.sub, "jwt verified");
        Ok(data.claims)
    }

    pub fn ttl_minutes(&self) -> i64 {
        (self.ttl.as_secs() / 60) as i64
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sign_and_verify_roundtrip() {
        let keys = JwtKeys::new("dev-secret", 5);
        let token = keys.sign(7, "test@mail.uc.edu").expect("sign");
        let claims = keys.verify(&token).expect("verify");
        assert_eq!(claims.sub, "7");
        assert_eq!(claims.subject_id(), Some(7));
        assert_eq!(claims.email, "test@mail.uc.edu");
        assert!(claims.exp > claims.iat);
    }

    #[test]
    fn verify_rejects_wrong_secret() {
        let keys = JwtKeys::new("secret-one", 5);
        let other = JwtKeys::new("secret-two", 5);
        let token = keys.sign(7, "test@mail.uc.edu").expect("sign");
        assert!(other.verify(&token).is_err());
    }

    #[test]
    fn verify_rejects_expired_token() {
        // TTL far enough in the past to clear the default 60s leeway.
        let keys = JwtKeys::new("dev-secret", 0);
        let now = OffsetDateTime::now_utc() - TimeDuration::minutes(10);
        let claims = Claims {
            sub: "7".into(),
            email: "test@mail.uc.edu".into(),
            iat: (now - TimeDuration::minutes(5)).unix_timestamp() as usize,
            exp: now.unix_timestamp() as usize,
        };
        let token = encode(&Header::default(), &claims, &keys.encoding).expect("encode");
        assert!(keys.verify(&token).is_err());
    }

    #[test]
    fn verify_rejects_garbage() {
        let keys = JwtKeys::new("dev-secret", 5);
        assert!(keys.verify("not-a-jwt").is_err());
    }

    #[test]
    fn ttl_minutes_roundtrip() {
        let keys = JwtKeys::new("dev-secret", 90);
        assert_eq!(keys.ttl_minutes(), 90);
    }
}
