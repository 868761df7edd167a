//! Authorization decisions for owned resources.
//!
//! Ownership is recorded once at creation and never transferred, so every
//! decision is a comparison of identity ids. Callers turn `false` into a
//! forbidden outcome, distinct from not-found.

use crate::domain::identity::models::IdentityId;

/// Whether `caller` may edit or delete a resource owned by `resource_owner`.
pub fn can_mutate(resource_owner: IdentityId, caller: IdentityId) -> bool {
    resource_owner == caller
}

/// Whether `caller` may delete a comment.
///
/// Wider than [`can_mutate`]: the author of the hosting post may remove
/// comments left under it.
pub fn can_delete_comment(
    comment_author: IdentityId,
    hosting_post_author: IdentityId,
    caller: IdentityId,
) -> bool {
    can_mutate(comment_author, caller) || can_mutate(hosting_post_author, caller)
}
