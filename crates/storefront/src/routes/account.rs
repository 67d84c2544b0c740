//! Account route handlers.

use axum::Json;
use cartwheel_core::User;
use tower_sessions::Session;
use tracing::instrument;

use crate::error::Result;
use crate::models::session::require_user;

/// Current user profile.
#[instrument(skip(session))]
pub async fn me(session: Session) -> Result<Json<User>> {
    let user = require_user(&session).await?;
    Ok(Json(user.into()))
}
