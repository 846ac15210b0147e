//! In-memory registry of edit capabilities.
//!
//! Each capability pairs an [`EditToken`] with the post it unlocks. The
//! registry lives as long as the [`Board`](crate::Board) that owns it;
//! nothing is persisted and capabilities are never revoked.

use std::collections::HashMap;

use parking_lot::Mutex;
use rand::rngs::OsRng;

use crate::store::PostId;
use crate::token::{self, EditToken};

#[derive(Debug, Default)]
struct Capabilities {
    by_token: HashMap<EditToken, PostId>,
    by_post: HashMap<PostId, EditToken>,
}

/// Token -> post map guarded by a single mutex.
///
/// Issuing draws and inserts under the same lock, so concurrent issues
/// can never hand out the same token.
#[derive(Debug, Default)]
pub struct CapabilityRegistry {
    inner: Mutex<Capabilities>,
}

impl CapabilityRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Issue a fresh token for `post_id`.
    ///
    /// A post holds at most one capability; issuing again for the same
    /// post replaces the previous token.
    pub fn issue(&self, post_id: PostId) -> EditToken {
        let mut caps = self.inner.lock();
        let token = token::generate_unique(&mut OsRng, |candidate| caps.by_token.contains_key(candidate));

        if let Some(previous) = caps.by_post.insert(post_id, token.clone()) {
            tracing::warn!(post_id, "post already had an edit token; replacing it");
            caps.by_token.remove(&previous);
        }
        caps.by_token.insert(token.clone(), post_id);
        token
    }

    /// Whether any live capability references `post_id`.
    pub fn has_capability(&self, post_id: PostId) -> bool {
        self.inner.lock().by_post.contains_key(&post_id)
    }

    /// Whether `token` is the live capability for `post_id`.
    pub fn is_valid(&self, token: &str, post_id: PostId) -> bool {
        self.inner
            .lock()
            .by_post
            .get(&post_id)
            .is_some_and(|t| t.as_str() == token)
    }

    /// Number of live capabilities.
    pub fn len(&self) -> usize {
        self.inner.lock().by_token.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;
    use std::sync::Arc;

    #[test]
    fn test_issued_tokens_are_distinct() {
        let registry = CapabilityRegistry::new();
        let tokens: HashSet<_> = (0..500).map(|id| registry.issue(id)).collect();
        assert_eq!(tokens.len(), 500);
        assert_eq!(registry.len(), 500);
    }

    #[test]
    fn test_is_valid_exact_pair() {
        let registry = CapabilityRegistry::new();
        let token = registry.issue(1);
        let other = registry.issue(2);

        assert!(registry.is_valid(token.as_str(), 1));
        assert!(!registry.is_valid(token.as_str(), 2));
        assert!(!registry.is_valid(other.as_str(), 1));
        assert!(!registry.is_valid("", 1));
        assert!(!registry.is_valid(token.as_str(), 3));
    }

    #[test]
    fn test_has_capability() {
        let registry = CapabilityRegistry::new();
        assert!(!registry.has_capability(7));
        registry.issue(7);
        assert!(registry.has_capability(7));
        assert!(!registry.has_capability(8));
    }

    #[test]
    fn test_reissue_keeps_one_token_per_post() {
        let registry = CapabilityRegistry::new();
        let first = registry.issue(1);
        let second = registry.issue(1);

        assert_ne!(first, second);
        assert!(!registry.is_valid(first.as_str(), 1));
        assert!(registry.is_valid(second.as_str(), 1));
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_concurrent_issue() {
        let registry = Arc::new(CapabilityRegistry::new());
        let handles: Vec<_> = (0..8)
            .map(|thread| {
                let registry = Arc::clone(&registry);
                std::thread::spawn(move || {
                    (0..100)
                        .map(|i| registry.issue(thread * 1000 + i))
                        .collect::<Vec<_>>()
                })
            })
            .collect();

        let tokens: HashSet<_> = handles
            .into_iter()
            .flat_map(|h| h.join().unwrap())
            .collect();
        assert_eq!(tokens.len(), 800);
        assert_eq!(registry.len(), 800);
    }
}
