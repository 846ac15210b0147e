//! SQLite-backed storage for posts and admin accounts.
//!
//! Access goes through tokio-rusqlite so every query runs on the
//! connection's background thread. The board core only depends on the
//! [`PostStore`] trait; [`BoardDb`] is the production implementation.

pub mod admins;
pub mod connection;
pub mod migrations;
pub mod posts;

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::Error;

pub use admins::Admin;
pub use connection::BoardDb;
pub use posts::{Post, PostId, PostType, UnknownPostType};

/// Backing store for the post collection.
///
/// `create` assigns the id and the creation timestamp.
#[async_trait]
pub trait PostStore: Send + Sync {
    /// All posts ordered by creation time, newest first.
    async fn find_all_ordered_by_created_desc(&self) -> Result<Vec<Post>, Error>;

    /// Remove posts created strictly before `cutoff`, returning the count.
    async fn delete_created_before(&self, cutoff: DateTime<Utc>) -> Result<u64, Error>;

    async fn create(&self, text: &str, post_type: PostType) -> Result<Post, Error>;

    async fn update(&self, id: PostId, text: &str, post_type: PostType) -> Result<Post, Error>;

    async fn delete_by_id(&self, id: PostId) -> Result<u64, Error>;
}

#[async_trait]
impl PostStore for BoardDb {
    async fn find_all_ordered_by_created_desc(&self) -> Result<Vec<Post>, Error> {
        self.list_posts().await
    }

    async fn delete_created_before(&self, cutoff: DateTime<Utc>) -> Result<u64, Error> {
        self.purge_posts_before(cutoff).await
    }

    async fn create(&self, text: &str, post_type: PostType) -> Result<Post, Error> {
        self.create_post(text, post_type).await
    }

    async fn update(&self, id: PostId, text: &str, post_type: PostType) -> Result<Post, Error> {
        self.update_post(id, text, post_type).await
    }

    async fn delete_by_id(&self, id: PostId) -> Result<u64, Error> {
        self.delete_post(id).await
    }
}
