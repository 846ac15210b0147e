//! Post CRUD operations.
//!
//! Timestamps are stored as fixed-width RFC 3339 strings in UTC with
//! microsecond precision, so `ORDER BY created_at` and `created_at < ?`
//! compare chronologically.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, SecondsFormat, SubsecRound, Utc};
use serde::{Deserialize, Serialize};
use tokio_rusqlite::params;
use tokio_rusqlite::rusqlite::{self, Row, types::Type};

use super::connection::BoardDb;
use crate::Error;

/// Store-assigned post identifier.
pub type PostId = i64;

/// Category tag attached to every post.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PostType {
    Meme,
    Question,
    Confession,
    Rant,
    Announcement,
}

impl PostType {
    pub const ALL: [PostType; 5] =
        [PostType::Meme, PostType::Question, PostType::Confession, PostType::Rant, PostType::Announcement];

    pub fn as_str(self) -> &'static str {
        match self {
            PostType::Meme => "MEME",
            PostType::Question => "QUESTION",
            PostType::Confession => "CONFESSION",
            PostType::Rant => "RANT",
            PostType::Announcement => "ANNOUNCEMENT",
        }
    }
}

impl fmt::Display for PostType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, thiserror::Error)]
#[error("unknown post type: {0}")]
pub struct UnknownPostType(pub String);

impl FromStr for PostType {
    type Err = UnknownPostType;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        PostType::ALL
            .into_iter()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| UnknownPostType(s.to_string()))
    }
}

/// A single board entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Post {
    pub id: PostId,
    pub text: String,
    pub post_type: PostType,
    pub created_at: DateTime<Utc>,
}

pub(crate) fn encode_timestamp(ts: &DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Micros, true)
}

fn decode_timestamp(idx: usize, raw: &str) -> rusqlite::Result<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(raw)
        .map(|ts| ts.with_timezone(&Utc))
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, Box::new(e)))
}

fn post_from_row(row: &Row<'_>) -> rusqlite::Result<Post> {
    let post_type: String = row.get(2)?;
    let created_at: String = row.get(3)?;
    Ok(Post {
        id: row.get(0)?,
        text: row.get(1)?,
        post_type: post_type
            .parse()
            .map_err(|e| rusqlite::Error::FromSqlConversionFailure(2, Type::Text, Box::new(e)))?,
        created_at: decode_timestamp(3, &created_at)?,
    })
}

const SELECT_POST: &str = "SELECT id, text, post_type, created_at FROM posts";

impl BoardDb {
    /// Insert a post stamped with the current time.
    pub async fn create_post(&self, text: &str, post_type: PostType) -> Result<Post, Error> {
        self.create_post_at(text, post_type, Utc::now()).await
    }

    /// Insert a post with an explicit creation time.
    ///
    /// The timestamp is truncated to microseconds, matching what is stored.
    pub async fn create_post_at(
        &self, text: &str, post_type: PostType, created_at: DateTime<Utc>,
    ) -> Result<Post, Error> {
        let text = text.to_string();
        let created_at = created_at.trunc_subsecs(6);
        self.conn
            .call(move |conn| -> Result<Post, Error> {
                conn.execute(
                    "INSERT INTO posts (text, post_type, created_at) VALUES (?1, ?2, ?3)",
                    params![&text, post_type.as_str(), encode_timestamp(&created_at)],
                )?;
                Ok(Post { id: conn.last_insert_rowid(), text, post_type, created_at })
            })
            .await
            .map_err(Error::from)
    }

    /// Get a post by id.
    ///
    /// Returns None if the post doesn't exist.
    pub async fn get_post(&self, id: PostId) -> Result<Option<Post>, Error> {
        self.conn
            .call(move |conn| -> Result<Option<Post>, Error> {
                let mut stmt = conn.prepare(&format!("{SELECT_POST} WHERE id = ?1"))?;
                match stmt.query_row(params![id], post_from_row) {
                    Ok(post) => Ok(Some(post)),
                    Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
                    Err(e) => Err(e.into()),
                }
            })
            .await
            .map_err(Error::from)
    }

    /// All posts, newest first.
    pub async fn list_posts(&self) -> Result<Vec<Post>, Error> {
        self.conn
            .call(|conn| -> Result<Vec<Post>, Error> {
                let mut stmt = conn.prepare(&format!("{SELECT_POST} ORDER BY created_at DESC, id DESC"))?;
                let posts = stmt
                    .query_map([], post_from_row)?
                    .collect::<Result<Vec<_>, _>>()?;
                Ok(posts)
            })
            .await
            .map_err(Error::from)
    }

    /// Replace the text and type of an existing post.
    ///
    /// # Errors
    ///
    /// Returns `Error::PostNotFound` if no row has this id.
    pub async fn update_post(&self, id: PostId, text: &str, post_type: PostType) -> Result<Post, Error> {
        let text = text.to_string();
        self.conn
            .call(move |conn| -> Result<Post, Error> {
                let changed = conn.execute(
                    "UPDATE posts SET text = ?1, post_type = ?2 WHERE id = ?3",
                    params![&text, post_type.as_str(), id],
                )?;
                if changed == 0 {
                    return Err(Error::PostNotFound(id));
                }
                let post = conn.query_row(&format!("{SELECT_POST} WHERE id = ?1"), params![id], post_from_row)?;
                Ok(post)
            })
            .await
            .map_err(Error::from)
    }

    /// Delete a post by id.
    ///
    /// Returns the number of deleted rows (0 or 1).
    pub async fn delete_post(&self, id: PostId) -> Result<u64, Error> {
        self.conn
            .call(move |conn| -> Result<u64, Error> {
                let count = conn.execute("DELETE FROM posts WHERE id = ?1", params![id])?;
                Ok(count as u64)
            })
            .await
            .map_err(Error::from)
    }

    /// Delete posts created strictly before `cutoff`.
    ///
    /// Returns the number of deleted rows.
    pub async fn purge_posts_before(&self, cutoff: DateTime<Utc>) -> Result<u64, Error> {
        let cutoff = encode_timestamp(&cutoff);
        self.conn
            .call(move |conn| -> Result<u64, Error> {
                let count = conn.execute("DELETE FROM posts WHERE created_at < ?1", params![cutoff])?;
                Ok(count as u64)
            })
            .await
            .map_err(Error::from)
    }
}
