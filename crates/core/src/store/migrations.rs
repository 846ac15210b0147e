//! Schema migrations.
//!
//! Each [`Migration`] is applied inside its own transaction together with
//! the `_migrations` row that records it, so the schema and the recorded
//! version cannot drift apart.

use chrono::Utc;
use tokio_rusqlite::{Connection, params, rusqlite};

use super::posts::encode_timestamp;
use crate::Error;

/// A numbered SQL batch.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Migration {
    pub version: i64,
    pub name: &'static str,
    pub sql: &'static str,
}

pub(crate) const MIGRATIONS: &[Migration] = &[
    Migration { version: 1, name: "posts", sql: include_str!("../../migrations/001_posts.sql") },
    Migration { version: 2, name: "admins", sql: include_str!("../../migrations/002_admins.sql") },
];

const CREATE_VERSION_TABLE: &str = "CREATE TABLE IF NOT EXISTS _migrations (
    version INTEGER PRIMARY KEY,
    name TEXT NOT NULL,
    applied_at TEXT NOT NULL
)";

/// Bring the board schema up to date.
pub async fn run(conn: &Connection) -> Result<(), Error> {
    apply(conn, MIGRATIONS).await
}

/// Apply every migration newer than the recorded version, in order.
///
/// Stops at the first failing batch; earlier batches stay committed.
pub(crate) async fn apply(conn: &Connection, migrations: &'static [Migration]) -> Result<(), Error> {
    conn.call(move |conn| -> Result<(), Error> {
        conn.execute(CREATE_VERSION_TABLE, [])?;
        let current: i64 =
            conn.query_row("SELECT COALESCE(MAX(version), 0) FROM _migrations", [], |row| row.get(0))?;

        for migration in migrations.iter().filter(|m| m.version > current) {
            apply_one(conn, migration)?;
            tracing::debug!(version = migration.version, name = migration.name, "applied migration");
        }
        Ok(())
    })
    .await
    .map_err(Error::from)
}

fn apply_one(conn: &mut rusqlite::Connection, migration: &Migration) -> Result<(), Error> {
    let failed = |e: rusqlite::Error| {
        Error::MigrationFailed(format!("{} ({}): {e}", migration.version, migration.name))
    };

    let tx = conn.transaction()?;
    tx.execute_batch(migration.sql).map_err(failed)?;
    tx.execute(
        "INSERT INTO _migrations (version, name, applied_at) VALUES (?1, ?2, ?3)",
        params![migration.version, migration.name, encode_timestamp(&Utc::now())],
    )?;
    tx.commit()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn table_exists(conn: &Connection, name: &'static str) -> bool {
        conn.call(move |conn| {
            conn.query_row(
                "SELECT EXISTS(SELECT 1 FROM sqlite_master WHERE type='table' AND name=?1)",
                params![name],
                |row| row.get(0),
            )
        })
        .await
        .unwrap()
    }

    async fn recorded_versions(conn: &Connection) -> Vec<i64> {
        conn.call(|conn| {
            let mut stmt = conn.prepare("SELECT version FROM _migrations ORDER BY version")?;
            let rows = stmt.query_map([], |row| row.get(0))?;
            rows.collect::<Result<Vec<i64>, _>>()
        })
        .await
        .unwrap()
    }

    #[tokio::test]
    async fn test_run_twice_is_noop() {
        let conn = Connection::open_in_memory().await.unwrap();
        run(&conn).await.unwrap();
        run(&conn).await.unwrap();

        assert!(table_exists(&conn, "posts").await);
        assert!(table_exists(&conn, "admins").await);
        assert_eq!(recorded_versions(&conn).await, vec![1, 2]);
    }

    #[tokio::test]
    async fn test_failed_batch_rolls_back_and_stops() {
        static BROKEN: &[Migration] = &[
            Migration { version: 1, name: "posts", sql: include_str!("../../migrations/001_posts.sql") },
            Migration {
                version: 2,
                name: "half_done",
                sql: "CREATE TABLE widgets (id INTEGER PRIMARY KEY); CREATE TABLE oops (",
            },
            Migration { version: 3, name: "never", sql: "CREATE TABLE later (id INTEGER)" },
        ];

        let conn = Connection::open_in_memory().await.unwrap();
        let err = apply(&conn, BROKEN).await.unwrap_err();
        assert!(matches!(err, Error::MigrationFailed(ref msg) if msg.contains("half_done")));

        assert!(table_exists(&conn, "posts").await);
        assert!(!table_exists(&conn, "widgets").await);
        assert!(!table_exists(&conn, "later").await);
        assert_eq!(recorded_versions(&conn).await, vec![1]);
    }

    #[tokio::test]
    async fn test_resumes_after_recorded_version() {
        static FIRST: &[Migration] = &[MIGRATIONS[0]];

        let conn = Connection::open_in_memory().await.unwrap();
        apply(&conn, FIRST).await.unwrap();
        assert!(!table_exists(&conn, "admins").await);

        run(&conn).await.unwrap();
        assert!(table_exists(&conn, "admins").await);
        assert_eq!(recorded_versions(&conn).await, vec![1, 2]);
    }
}
