//! Admin account rows.

use chrono::Utc;
use serde::Serialize;
use tokio_rusqlite::params;
use tokio_rusqlite::rusqlite::{self, TransactionBehavior};

use super::connection::BoardDb;
use super::posts::encode_timestamp;
use crate::Error;

/// A stored admin account.
#[derive(Debug, Clone, Serialize)]
pub struct Admin {
    pub id: i64,
    pub email: String,
    #[serde(skip)]
    pub password_hash: String,
}

impl BoardDb {
    /// Number of admin accounts.
    pub async fn count_admins(&self) -> Result<u64, Error> {
        self.conn
            .call(|conn| -> Result<u64, Error> {
                let count: i64 = conn.query_row("SELECT COUNT(*) FROM admins", [], |row| row.get(0))?;
                Ok(count as u64)
            })
            .await
            .map_err(Error::from)
    }

    /// Look up an admin by email.
    pub async fn get_admin(&self, email: &str) -> Result<Option<Admin>, Error> {
        let email = email.to_string();
        self.conn
            .call(move |conn| -> Result<Option<Admin>, Error> {
                let result = conn.query_row(
                    "SELECT id, email, password_hash FROM admins WHERE email = ?1",
                    params![email],
                    |row| Ok(Admin { id: row.get(0)?, email: row.get(1)?, password_hash: row.get(2)? }),
                );
                match result {
                    Ok(admin) => Ok(Some(admin)),
                    Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
                    Err(e) => Err(e.into()),
                }
            })
            .await
            .map_err(Error::from)
    }

    /// Insert an admin with an already-hashed password.
    pub async fn insert_admin(&self, email: &str, password_hash: &str) -> Result<Admin, Error> {
        let email = email.to_string();
        let password_hash = password_hash.to_string();
        self.conn
            .call(move |conn| -> Result<Admin, Error> {
                conn.execute(
                    "INSERT INTO admins (email, password_hash, created_at) VALUES (?1, ?2, ?3)",
                    params![&email, &password_hash, encode_timestamp(&Utc::now())],
                )?;
                Ok(Admin { id: conn.last_insert_rowid(), email, password_hash })
            })
            .await
            .map_err(Error::from)
    }

    /// Insert an admin only when the table is empty.
    ///
    /// The emptiness check and the insert share one immediate transaction.
    /// Returns `false` without writing if any admin already exists.
    pub async fn insert_first_admin(&self, email: &str, password_hash: &str) -> Result<bool, Error> {
        let email = email.to_string();
        let password_hash = password_hash.to_string();
        self.conn
            .call(move |conn| -> Result<bool, Error> {
                let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;
                let existing: i64 = tx.query_row("SELECT COUNT(*) FROM admins", [], |row| row.get(0))?;
                if existing > 0 {
                    return Ok(false);
                }
                tx.execute(
                    "INSERT INTO admins (email, password_hash, created_at) VALUES (?1, ?2, ?3)",
                    params![email, password_hash, encode_timestamp(&Utc::now())],
                )?;
                tx.commit()?;
                Ok(true)
            })
            .await
            .map_err(Error::from)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_insert_and_get_admin() {
        let db = BoardDb::open_in_memory().await.unwrap();
        assert_eq!(db.count_admins().await.unwrap(), 0);

        db.insert_admin("root@example.com", "$argon2id$fake").await.unwrap();

        assert_eq!(db.count_admins().await.unwrap(), 1);
        let admin = db.get_admin("root@example.com").await.unwrap().unwrap();
        assert_eq!(admin.password_hash, "$argon2id$fake");
        assert!(db.get_admin("other@example.com").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_duplicate_email_rejected() {
        let db = BoardDb::open_in_memory().await.unwrap();
        db.insert_admin("root@example.com", "a").await.unwrap();
        let result = db.insert_admin("root@example.com", "b").await;
        assert!(matches!(result, Err(Error::Database(_))));
    }

    #[tokio::test]
    async fn test_insert_first_admin_only_when_empty() {
        let db = BoardDb::open_in_memory().await.unwrap();
        assert!(db.insert_first_admin("root@example.com", "a").await.unwrap());
        assert!(!db.insert_first_admin("other@example.com", "b").await.unwrap());

        assert_eq!(db.count_admins().await.unwrap(), 1);
        assert!(db.get_admin("other@example.com").await.unwrap().is_none());
    }
}
