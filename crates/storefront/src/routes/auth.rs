//! Authentication route handlers.

use axum::{Json, extract::State};
use cartwheel_core::{User, UserRole};
use serde::{Deserialize, Serialize};
use tower_sessions::Session;
use tracing::instrument;

use crate::error::{Result, clear_sentry_user, set_sentry_user};
use crate::models::session::{SessionUser, keys};
use crate::state::AppState;

/// Signup request.
#[derive(Debug, Deserialize)]
pub struct SignupRequest {
    pub email: String,
    pub password: String,
    pub first_name: String,
    pub last_name: String,
    #[serde(default)]
    pub role: UserRole,
}

/// Login request.
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Authenticated response.
#[derive(Debug, Serialize)]
pub struct AuthResponse {
    pub user: User,
}

/// Simple success envelope.
#[derive(Debug, Serialize)]
pub struct OkResponse {
    pub success: bool,
}

async fn start_session(session: &Session, user: &User) -> Result<()> {
    // Rotate the session id on privilege change
    session.cycle_id().await?;
    session
        .insert(keys::CURRENT_USER, SessionUser::from(user.clone()))
        .await?;
    set_sentry_user(&user.id, Some(&user.email));
    Ok(())
}

/// Create an account and sign in.
#[instrument(skip(state, session, request), fields(email = %request.email))]
pub async fn signup(
    State(state): State<AppState>,
    session: Session,
    Json(request): Json<SignupRequest>,
) -> Result<Json<AuthResponse>> {
    let user = state
        .auth()
        .signup(
            &request.email,
            &request.password,
            &request.first_name,
            &request.last_name,
            request.role,
        )
        .await?;

    start_session(&session, &user).await?;

    Ok(Json(AuthResponse { user }))
}

/// Sign in with email and password.
#[instrument(skip(state, session, request), fields(email = %request.email))]
pub async fn login(
    State(state): State<AppState>,
    session: Session,
    Json(request): Json<LoginRequest>,
) -> Result<Json<AuthResponse>> {
    let user = state.auth().login(&request.email, &request.password).await?;

    start_session(&session, &user).await?;

    Ok(Json(AuthResponse { user }))
}

/// Sign out.
#[instrument(skip(session))]
pub async fn logout(session: Session) -> Result<Json<OkResponse>> {
    session.flush().await?;
    clear_sentry_user();
    Ok(Json(OkResponse { success: true }))
}
