//! Admin accounts: password hashing, bootstrap and login checks.

use argon2::Argon2;
use argon2::password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use rand::rngs::OsRng;

use crate::Error;
use crate::store::BoardDb;

/// Hash a password into a PHC string.
pub fn hash_password(password: &str) -> Result<String, Error> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| Error::Session(format!("failed to hash password: {e}")))
}

/// Check a password against a stored PHC string.
pub fn verify_password(password: &str, password_hash: &str) -> Result<bool, Error> {
    let parsed =
        PasswordHash::new(password_hash).map_err(|e| Error::Session(format!("invalid password hash: {e}")))?;
    Ok(Argon2::default()
        .verify_password(password.as_bytes(), &parsed)
        .is_ok())
}

/// Create the first admin if none exist yet.
///
/// Returns `true` if an admin was created.
pub async fn bootstrap_admin(db: &BoardDb, email: &str, password: &str) -> Result<bool, Error> {
    if email.trim().is_empty() {
        return Err(Error::InvalidInput("admin email is required".into()));
    }
    if password.is_empty() {
        return Err(Error::InvalidInput("admin password is required".into()));
    }

    let password_hash = hash_password(password)?;
    if !db.insert_first_admin(email, &password_hash).await? {
        tracing::debug!("admin account already exists, skipping bootstrap");
        return Ok(false);
    }
    tracing::info!(email, "created initial admin account");
    Ok(true)
}

/// Whether `email`/`password` match a stored admin.
pub async fn verify_admin_password(db: &BoardDb, email: &str, password: &str) -> Result<bool, Error> {
    let Some(admin) = db.get_admin(email).await? else {
        return Ok(false);
    };
    verify_password(password, &admin.password_hash)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_and_verify() {
        let hash = hash_password("hunter2").unwrap();
        assert!(hash.starts_with("$argon2"));
        assert!(verify_password("hunter2", &hash).unwrap());
        assert!(!verify_password("hunter3", &hash).unwrap());
    }

    #[test]
    fn test_verify_rejects_malformed_hash() {
        assert!(matches!(verify_password("x", "not-a-hash"), Err(Error::Session(_))));
    }

    #[tokio::test]
    async fn test_bootstrap_only_once() {
        let db = BoardDb::open_in_memory().await.unwrap();
        assert!(bootstrap_admin(&db, "root@example.com", "secret").await.unwrap());
        assert!(!bootstrap_admin(&db, "other@example.com", "secret").await.unwrap());
        assert_eq!(db.count_admins().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_concurrent_bootstrap_creates_one_admin() {
        let db = BoardDb::open_in_memory().await.unwrap();
        let (a, b) = tokio::join!(
            bootstrap_admin(&db, "first@example.com", "secret"),
            bootstrap_admin(&db, "second@example.com", "secret"),
        );

        assert_ne!(a.unwrap(), b.unwrap());
        assert_eq!(db.count_admins().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_bootstrap_requires_credentials() {
        let db = BoardDb::open_in_memory().await.unwrap();
        assert!(matches!(bootstrap_admin(&db, " ", "secret").await, Err(Error::InvalidInput(_))));
        assert!(matches!(bootstrap_admin(&db, "root@example.com", "").await, Err(Error::InvalidInput(_))));
    }

    #[tokio::test]
    async fn test_verify_admin_password() {
        let db = BoardDb::open_in_memory().await.unwrap();
        bootstrap_admin(&db, "root@example.com", "secret").await.unwrap();

        assert!(verify_admin_password(&db, "root@example.com", "secret").await.unwrap());
        assert!(!verify_admin_password(&db, "root@example.com", "wrong").await.unwrap());
        assert!(!verify_admin_password(&db, "nobody@example.com", "secret").await.unwrap());
    }
}
