use axum::Json;
use tracing::instrument;

use crate::{
    auth::AuthUser,
    domain::{permissions_for, RolePermissions},
};

/// The caller's permission matrix, recomputed from their current role.
#[instrument(name = "get_permissions", skip(user))]
pub async fn get_permissions(user: AuthUser) -> Json<RolePermissions> {
    Json(permissions_for(user.role))
}
