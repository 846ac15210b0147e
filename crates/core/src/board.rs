//! The board service.
//!
//! [`Board`] wires the backing store to the capability registry and the
//! post cache. It is constructed once at startup and shared by every
//! request handler.

use std::sync::Arc;

use chrono::{DateTime, Utc};

use crate::Error;
use crate::auth::{self, AdminIdentity};
use crate::cache::PostCache;
use crate::registry::CapabilityRegistry;
use crate::retention;
use crate::store::{Post, PostId, PostStore, PostType};
use crate::token::EditToken;

pub struct Board {
    store: Arc<dyn PostStore>,
    registry: CapabilityRegistry,
    cache: PostCache,
}

impl Board {
    pub fn new(store: Arc<dyn PostStore>) -> Self {
        Self { store, registry: CapabilityRegistry::new(), cache: PostCache::new() }
    }

    pub fn registry(&self) -> &CapabilityRegistry {
        &self.registry
    }

    pub fn cache(&self) -> &PostCache {
        &self.cache
    }

    /// Create a post and issue the edit token for it.
    ///
    /// Nothing is registered or invalidated if the store rejects the insert.
    pub async fn create_post(&self, text: &str, post_type: PostType) -> Result<(Post, EditToken), Error> {
        let post = self.store.create(text, post_type).await?;
        let token = self.registry.issue(post.id);
        self.cache.invalidate();
        tracing::info!(post_id = post.id, %post_type, "created post");
        Ok((post, token))
    }

    /// Replace a post's text and type.
    ///
    /// # Errors
    ///
    /// `Error::Unauthorized` unless `admin` is present or `token` is the
    /// edit token for `post_id`; store errors are passed through.
    pub async fn edit_post(
        &self, admin: Option<&AdminIdentity>, token: Option<&str>, post_id: PostId, text: &str, post_type: PostType,
    ) -> Result<Post, Error> {
        self.authorize(admin, token, post_id)?;
        let post = self.store.update(post_id, text, post_type).await?;
        self.cache.invalidate();
        tracing::info!(post_id, admin = admin.map(|a| a.email.as_str()), "edited post");
        Ok(post)
    }

    /// Delete a post, returning how many rows were removed.
    pub async fn delete_post(
        &self, admin: Option<&AdminIdentity>, token: Option<&str>, post_id: PostId,
    ) -> Result<u64, Error> {
        self.authorize(admin, token, post_id)?;
        let deleted = self.store.delete_by_id(post_id).await?;
        if deleted > 0 {
            self.cache.invalidate();
            tracing::info!(post_id, admin = admin.map(|a| a.email.as_str()), "deleted post");
        }
        Ok(deleted)
    }

    /// Posts inside the retention window, newest first.
    pub async fn list_posts(&self) -> Result<Arc<Vec<Post>>, Error> {
        self.cache.get_posts(self.store.as_ref()).await
    }

    /// Purge posts that fell out of the retention window.
    pub async fn sweep(&self) -> Result<u64, Error> {
        self.sweep_at(Utc::now()).await
    }

    /// Purge relative to `now`; invalidates the cache if anything went.
    pub async fn sweep_at(&self, now: DateTime<Utc>) -> Result<u64, Error> {
        let window_start = retention::start_of_last_week(now);
        let deleted = self.store.delete_created_before(window_start).await?;
        if deleted > 0 {
            self.cache.invalidate();
            tracing::info!(deleted, %window_start, "deleted old posts");
        }
        Ok(deleted)
    }

    fn authorize(&self, admin: Option<&AdminIdentity>, token: Option<&str>, post_id: PostId) -> Result<(), Error> {
        if auth::can_edit(&self.registry, admin, token, post_id) {
            return Ok(());
        }
        tracing::warn!(post_id, has_token = token.is_some(), "rejected post modification");
        Err(Error::Unauthorized)
    }
}
