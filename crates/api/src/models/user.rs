//! User domain types.
//!
//! These types represent validated domain objects separate from database row types.

use chrono::{DateTime, Utc};

use restore_core::{Email, UserId};

/// Role given to every account created through registration.
pub const MEMBER_ROLE: &str = "Member";

/// A registered account (domain type).
#[derive(Debug, Clone)]
pub struct User {
    /// Unique user ID.
    pub id: UserId,
    /// Login name; also the buyer id of the user's basket.
    pub user_name: String,
    /// User's email address.
    pub email: Email,
    /// Role names, sorted.
    pub roles: Vec<String>,
    /// When the user was created.
    pub created_at: DateTime<Utc>,
}

impl User {
    /// Whether the user holds `role` (exact match).
    #[must_use]
    pub fn has_role(&self, role: &str) -> bool {
        self.roles.iter().any(|r| r == role)
    }
}
