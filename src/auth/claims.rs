use serde::{Deserialize, Serialize};

/// JWT payload used for authentication.
///
/// The subject is the user id stringified on encode (RFC 7519 wants a
/// string `sub`); [`Claims::subject_id`] re-parses it on the way back.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,   // stringified user ID
    pub email: String, // user email
    pub iat: usize,    // issued at (unix timestamp)
    pub exp: usize,    // expires at (unix timestamp)
}

impl Claims {
    /// The integer user id behind the subject. A subject that does not
    /// parse as an integer is treated like any other invalid token.
    pub fn subject_id(&self) -> Option<i32> {
        self.sub.parse::<i32>().ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn subject_parses_back_to_integer_id() {
        let claims = Claims {
            sub: "42".into(),
            email: "a@b.c".into(),
            iat: 0,
            exp: 0,
        };
        assert_eq!(claims.subject_id(), Some(42));
    }

    #[test]
    fn non_integer_subject_is_none() {
        let claims = Claims {
            sub: "not-a-number".into(),
            email: "a@b.c".into(),
            iat: 0,
            exp: 0,
        };
        assert_eq!(claims.subject_id(), None);
    }
}
