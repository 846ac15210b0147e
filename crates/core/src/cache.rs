//! Read-through cache of the post collection.
//!
//! The snapshot is rebuilt lazily: the first read after an invalidation
//! (or after the retention window moves on) purges expired posts from the
//! store and fetches the rest, newest first. Every successful mutation must
//! call [`PostCache::invalidate`] before reporting success.
//!
//! A generation counter guards against a rebuild that overlaps an
//! invalidation: the rebuild still returns its result to its own caller,
//! but only stores it if no invalidation happened in the meantime.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use parking_lot::Mutex;

use crate::Error;
use crate::retention;
use crate::store::{Post, PostStore};

#[derive(Debug)]
struct Snapshot {
    posts: Arc<Vec<Post>>,
    window_start: DateTime<Utc>,
}

#[derive(Debug)]
struct CacheState {
    snapshot: Option<Snapshot>,
    generation: u64,
    last_invalidated: DateTime<Utc>,
}

/// Cached, ordered view of the post collection.
#[derive(Debug)]
pub struct PostCache {
    state: Mutex<CacheState>,
}

impl Default for PostCache {
    fn default() -> Self {
        Self::new()
    }
}

impl PostCache {
    /// Create an empty cache; the first read builds the snapshot.
    pub fn new() -> Self {
        Self { state: Mutex::new(CacheState { snapshot: None, generation: 0, last_invalidated: Utc::now() }) }
    }

    /// Drop the snapshot so the next read goes to the store.
    pub fn invalidate(&self) {
        let mut state = self.state.lock();
        state.snapshot = None;
        state.generation = state.generation.wrapping_add(1);
        state.last_invalidated = Utc::now();
    }

    /// When the snapshot was last invalidated.
    pub fn last_invalidated(&self) -> DateTime<Utc> {
        self.state.lock().last_invalidated
    }

    /// Whether a snapshot is currently held.
    pub fn is_built(&self) -> bool {
        self.state.lock().snapshot.is_some()
    }

    /// Current posts, newest first.
    pub async fn get_posts(&self, store: &dyn PostStore) -> Result<Arc<Vec<Post>>, Error> {
        self.get_posts_at(store, Utc::now()).await
    }

    /// Current posts as seen at `now`.
    ///
    /// A held snapshot whose retention window differs from the one computed
    /// for `now` is treated as stale and rebuilt.
    pub async fn get_posts_at(&self, store: &dyn PostStore, now: DateTime<Utc>) -> Result<Arc<Vec<Post>>, Error> {
        let window_start = retention::start_of_last_week(now);

        let generation = {
            let state = self.state.lock();
            if let Some(snapshot) = &state.snapshot
                && snapshot.window_start == window_start
            {
                return Ok(Arc::clone(&snapshot.posts));
            }
            state.generation
        };

        match store.delete_created_before(window_start).await {
            Ok(0) => {}
            Ok(deleted) => tracing::info!(deleted, %window_start, "deleted old posts"),
            Err(e) => tracing::warn!(error = %e, %window_start, "failed to purge old posts"),
        }

        let posts = Arc::new(store.find_all_ordered_by_created_desc().await?);

        let mut state = self.state.lock();
        if state.generation == generation {
            tracing::debug!(count = posts.len(), "rebuilt post cache");
            state.snapshot = Some(Snapshot { posts: Arc::clone(&posts), window_start });
        } else {
            tracing::debug!("post cache invalidated during rebuild; discarding result");
        }

        Ok(posts)
    }
}
