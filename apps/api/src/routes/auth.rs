use axum::{extract::State, http::StatusCode, Json};
use serde::{Deserialize, Serialize};

use crate::errors::AppError;
use crate::models::user::{local_part, UserAccount};
use crate::routes::resumes::RecoverResponse;
use crate::routes::blocking;
use crate::routes::extract::CurrentUser;
use crate::state::AppState;

#[derive(Deserialize)]
pub struct SignupRequest {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

#[derive(Deserialize)]
pub struct LoginRequest {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct SessionResponse {
    pub email: String,
    pub name: String,
    pub welcome: String,
}

impl From<&UserAccount> for SessionResponse {
    fn from(account: &UserAccount) -> Self {
        SessionResponse {
            email: account.email.clone(),
            name: account.name.clone(),
            welcome: format!("Welcome back, {}!", account.display_name()),
        }
    }
}

/// POST /api/v1/auth/signup
pub async fn handle_signup(
    State(state): State<AppState>,
    Json(req): Json<SignupRequest>,
) -> Result<(StatusCode, Json<SessionResponse>), AppError> {
    let account = blocking(move || {
        let account = state.accounts.signup(&req.name, &req.email, &req.password)?;
        state.session.set(&account.email)?;
        Ok(account)
    })
    .await?;
    Ok((StatusCode::CREATED, Json(SessionResponse::from(&account))))
}

/// POST /api/v1/auth/login
pub async fn handle_login(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> Result<Json<SessionResponse>, AppError> {
    let account = blocking(move || {
        let account = state.accounts.login(&req.email, &req.password)?;
        state.session.set(&account.email)?;
        Ok(account)
    })
    .await?;
    Ok(Json(SessionResponse::from(&account)))
}

/// POST /api/v1/auth/logout
pub async fn handle_logout(State(state): State<AppState>) -> Result<StatusCode, AppError> {
    state.preview.clear();
    blocking(move || Ok(state.session.clear()?)).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// POST /api/v1/auth/recover
/// Moves an unreadable account map aside. Needs no session, since a
/// corrupt account map makes signing in impossible.
pub async fn handle_recover(State(state): State<AppState>) -> Result<Json<RecoverResponse>, AppError> {
    let quarantined_to = blocking(move || Ok(state.accounts.recover()?)).await?;
    Ok(Json(RecoverResponse { quarantined_to }))
}

/// GET /api/v1/session
pub async fn handle_session(
    State(state): State<AppState>,
    user: CurrentUser,
) -> Result<Json<SessionResponse>, AppError> {
    let email = user.email.clone();
    let account = blocking(move || Ok(state.accounts.find(&email)?)).await?;
    let response = match account {
        Some(account) => SessionResponse::from(&account),
        None => SessionResponse {
            welcome: format!("Welcome back, {}!", local_part(&user.email)),
            email: user.email,
            name: String::new(),
        },
    };
    Ok(Json(response))
}
