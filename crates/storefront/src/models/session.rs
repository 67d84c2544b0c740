//! Session-scoped state.
//!
//! The session holds everything that is per-shopper and ephemeral: the
//! signed-in identity, the cart, and the wishlist. Cart and wishlist are
//! deliberately unpersisted - they are lost when the session ends.

use cartwheel_core::{User, UserRole};
use serde::{Deserialize, Serialize};
use tower_sessions::Session;

use crate::error::AppError;

/// Session keys for shopper state.
pub mod keys {
    /// Key for the signed-in user.
    pub const CURRENT_USER: &str = "current_user";

    /// Key for the session cart (a product multiset).
    pub const CART: &str = "cart";

    /// Key for the session wishlist (a product set keyed by id).
    pub const WISHLIST: &str = "wishlist";
}

/// Session-stored user identity.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionUser {
    pub id: String,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub role: UserRole,
}

impl From<User> for SessionUser {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            email: user.email,
            first_name: user.first_name,
            last_name: user.last_name,
            role: user.role,
        }
    }
}

impl From<SessionUser> for User {
    fn from(user: SessionUser) -> Self {
        Self {
            id: user.id,
            email: user.email,
            first_name: user.first_name,
            last_name: user.last_name,
            role: user.role,
        }
    }
}

/// Get the signed-in user, if any.
pub async fn current_user(session: &Session) -> Option<SessionUser> {
    session
        .get::<SessionUser>(keys::CURRENT_USER)
        .await
        .ok()
        .flatten()
}

/// Get the signed-in user or fail with `401 Unauthorized`.
///
/// # Errors
///
/// Returns `AppError::Unauthorized` when no user is signed in.
pub async fn require_user(session: &Session) -> Result<SessionUser, AppError> {
    current_user(session)
        .await
        .ok_or_else(|| AppError::Unauthorized("Please sign in to continue".to_string()))
}
