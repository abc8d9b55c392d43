use axum::{async_trait, extract::FromRequestParts, http::request::Parts};

use crate::errors::AppError;
use crate::routes::blocking;
use crate::state::AppState;

/// The signed-in user. Rejects with 401 when there is no session.
#[derive(Debug, Clone)]
pub struct CurrentUser {
    pub email: String,
}

#[async_trait]
impl FromRequestParts<AppState> for CurrentUser {
    type Rejection = AppError;

    async fn from_request_parts(_parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let session = state.session.clone();
        match blocking(move || Ok(session.current()?)).await? {
            Some(email) => Ok(CurrentUser { email }),
            None => Err(AppError::Unauthorized),
        }
    }
}
