//! Edit authorization and admin identity.
//!
//! An edit is allowed for a verified admin, or for whoever presents the
//! edit token issued when the post was created.

pub mod admin;
pub mod session;

use serde::{Deserialize, Serialize};

use crate::registry::CapabilityRegistry;
use crate::store::PostId;

pub use session::{SessionClaims, SessionKeys};

/// A verified admin, derived from a signed session credential.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdminIdentity {
    pub email: String,
}

/// Decide whether an edit of `post_id` may proceed.
///
/// Any admin may edit any post. Without an admin identity the token must
/// be the live capability for exactly this post.
pub fn can_edit(
    registry: &CapabilityRegistry, admin: Option<&AdminIdentity>, token: Option<&str>, post_id: PostId,
) -> bool {
    if admin.is_some() {
        return true;
    }
    token.is_some_and(|token| registry.is_valid(token, post_id))
}
