use std::ops::Deref;

use axum::{async_trait, extract::FromRequestParts, http::request::Parts};

use crate::{app_state::AppState, domain::User, routes::ApiError};

/// Header carrying the authenticated user id, set by the SSO gateway in
/// front of this service. The identity itself is trusted as given; this
/// extractor only resolves it to a user row for role and scoping decisions.
pub const USER_ID_HEADER: &str = "x-user-id";

/// A custom Axum extractor that resolves the authenticated [`User`] directly
/// from the request. Returns 401 Unauthorized when the gateway header is
/// missing or names an unknown user.
#[derive(Debug, Clone)]
pub struct AuthUser {
    user: User,
}

impl Deref for AuthUser {
    type Target = User;

    fn deref(&self) -> &Self::Target {
        &self.user
    }
}

#[async_trait]
impl FromRequestParts<AppState> for AuthUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let user_id = parts
            .headers
            .get(USER_ID_HEADER)
            .and_then(|value| value.to_str().ok())
            .filter(|value| !value.is_empty())
            .ok_or_else(|| ApiError::unauthorized("not authenticated"))?;

        let user = state
            .users
            .get_user(user_id)
            .await
            .map_err(ApiError::from)?
            .ok_or_else(|| ApiError::unauthorized("not authenticated"))?;

        Ok(AuthUser { user })
    }
}
