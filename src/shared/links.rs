//! Link Bookkeeping Types
//!
//! Responses shared by every base/rel resource (applications and note
//! templates): linking a user to a shared entry and removing that link.

use serde::{Deserialize, Serialize};

/// Result of linking an entry to a user
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LinkResponse<T> {
    /// `false` when the user was already linked
    pub created: bool,
    pub item: T,
}

/// Result of removing a user's link
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct RemovalResponse {
    pub removed: bool,
    /// `true` when the base entry had no remaining links and was deleted
    pub base_deleted: bool,
}
