use axum::extract::FromRequestParts;
use axum::http::request::Parts;

use super::{ApiError, AppState};
use crate::auth::Caller;

/// Header carrying the caller's token.
pub const AUTH_HEADER: &str = "x-auth-token";

impl FromRequestParts<AppState> for Caller {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let token = parts.headers.get(AUTH_HEADER).and_then(|value| value.to_str().ok());
        Ok(state.gate.authenticate(token)?)
    }
}

/// A caller whose stored user record has an admin role.
#[derive(Debug, Clone, Copy)]
pub struct AdminCaller(pub Caller);

impl FromRequestParts<AppState> for AdminCaller {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let caller = Caller::from_request_parts(parts, state).await?;
        state.gate.require_admin(&caller).await?;
        Ok(AdminCaller(caller))
    }
}
