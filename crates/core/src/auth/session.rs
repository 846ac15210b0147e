//! Signed admin session credentials (HS256 JWT).

use std::fmt;

use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use rand::RngCore;
use rand::rngs::OsRng;
use serde::{Deserialize, Serialize};

use super::AdminIdentity;
use crate::Error;

/// Claims carried by an admin session token.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionClaims {
    pub sub: String,
    pub iat: i64,
    pub exp: i64,
}

/// Keys and lifetime used to sign and verify admin sessions.
#[derive(Clone)]
pub struct SessionKeys {
    encoding: EncodingKey,
    decoding: DecodingKey,
    ttl: Duration,
}

impl fmt::Debug for SessionKeys {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SessionKeys").field("ttl", &self.ttl).finish_non_exhaustive()
    }
}

impl SessionKeys {
    pub fn new(secret: &[u8], ttl: Duration) -> Self {
        Self { encoding: EncodingKey::from_secret(secret), decoding: DecodingKey::from_secret(secret), ttl }
    }

    /// Keys from a freshly generated secret.
    ///
    /// Sessions signed with these keys stop verifying after a restart.
    pub fn random(ttl: Duration) -> Self {
        let mut secret = [0u8; 32];
        OsRng.fill_bytes(&mut secret);
        Self::new(&secret, ttl)
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Sign a session for `email` starting now.
    pub fn issue(&self, email: &str) -> Result<String, Error> {
        self.issue_at(email, Utc::now())
    }

    /// Sign a session for `email` starting at `issued_at`.
    pub fn issue_at(&self, email: &str, issued_at: DateTime<Utc>) -> Result<String, Error> {
        let claims = SessionClaims {
            sub: email.to_string(),
            iat: issued_at.timestamp(),
            exp: (issued_at + self.ttl).timestamp(),
        };
        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding)
            .map_err(|e| Error::Session(format!("failed to sign session: {e}")))
    }

    /// Verify a session token and return the admin it names.
    ///
    /// Invalid, tampered or expired tokens yield `None`.
    pub fn verify(&self, token: &str) -> Option<AdminIdentity> {
        let validation = Validation::new(Algorithm::HS256);
        match decode::<SessionClaims>(token, &self.decoding, &validation) {
            Ok(data) => Some(AdminIdentity { email: data.claims.sub }),
            Err(e) => {
                tracing::debug!(error = %e, "rejected admin session");
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn keys() -> SessionKeys {
        SessionKeys::new(b"test-secret", Duration::hours(1))
    }

    #[test]
    fn test_issue_and_verify() {
        let keys = keys();
        let token = keys.issue("root@example.com").unwrap();
        let identity = keys.verify(&token).unwrap();
        assert_eq!(identity.email, "root@example.com");
    }

    #[test]
    fn test_wrong_secret_rejected() {
        let token = keys().issue("root@example.com").unwrap();
        let other = SessionKeys::new(b"other-secret", Duration::hours(1));
        assert!(other.verify(&token).is_none());
    }

    #[test]
    fn test_expired_rejected() {
        let keys = keys();
        let token = keys
            .issue_at("root@example.com", Utc::now() - Duration::hours(3))
            .unwrap();
        assert!(keys.verify(&token).is_none());
    }

    #[test]
    fn test_garbage_rejected() {
        assert!(keys().verify("not.a.jwt").is_none());
        assert!(keys().verify("").is_none());
    }

    #[test]
    fn test_random_keys_differ() {
        let a = SessionKeys::random(Duration::hours(1));
        let b = SessionKeys::random(Duration::hours(1));
        let token = a.issue("root@example.com").unwrap();
        assert!(a.verify(&token).is_some());
        assert!(b.verify(&token).is_none());
    }
}
