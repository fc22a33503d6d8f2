use argon2::{self, Config as ArgonConfig};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use rand::Rng;

use crate::error::AppError;
use crate::models::Claims;

/// Signs and checks HS256 bearer tokens whose `sub` is the user id.
pub struct TokenKeys {
    encoding: EncodingKey,
    decoding: DecodingKey,
    ttl: chrono::Duration,
}

impl TokenKeys {
    pub fn new(secret: &str, ttl_hours: i64) -> Self {
        TokenKeys {
            encoding: EncodingKey::from_secret(secret.as_ref()),
            decoding: DecodingKey::from_secret(secret.as_ref()),
            ttl: chrono::Duration::hours(ttl_hours),
        }
    }

    pub fn issue(&self, user_id: &str) -> Result<String, AppError> {
        let expiration = chrono::Utc::now()
            .checked_add_signed(self.ttl)
            .ok_or_else(|| AppError::Internal("token expiry out of range".into()))?
            .timestamp() as usize;

        let claims = Claims {
            sub: user_id.to_string(),
            exp: expiration,
        };
        encode(&Header::default(), &claims, &self.encoding)
            .map_err(|e| AppError::Internal(format!("failed to encode token: {e}")))
    }

    /// Returns the user id carried by a valid, unexpired token.
    pub fn verify(&self, token: &str) -> Option<String> {
        decode::<Claims>(token, &self.decoding, &Validation::new(Algorithm::HS256))
            .map(|data| data.claims.sub)
            .ok()
    }
}

pub fn hash_password(password: &str) -> Result<String, AppError> {
    let salt: [u8; 16] = rand::thread_rng().gen();
    let config = ArgonConfig::default();
    argon2::hash_encoded(password.as_bytes(), &salt, &config)
        .map_err(|e| AppError::Internal(format!("password hashing failed: {e}")))
}

pub fn verify_password(hash: &str, password: &str) -> bool {
    argon2::verify_encoded(hash, password.as_bytes()).unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn token_round_trips_subject() {
        let keys = TokenKeys::new("secret", 1);
        let token = keys.issue("user-7").unwrap();
        assert_eq!(keys.verify(&token).as_deref(), Some("user-7"));
    }

    #[test]
    fn foreign_or_garbage_tokens_fail() {
        let ours = TokenKeys::new("secret", 1);
        let theirs = TokenKeys::new("other", 1);
        let token = theirs.issue("user-7").unwrap();
        assert!(ours.verify(&token).is_none());
        assert!(ours.verify("not-a-jwt").is_none());
    }

    #[test]
    fn password_hash_verifies() {
        let hash = hash_password("hunter22").unwrap();
        assert_ne!(hash, "hunter22");
        assert!(verify_password(&hash, "hunter22"));
        assert!(!verify_password(&hash, "hunter23"));
        assert!(!verify_password("garbage", "hunter22"));
    }
}
