//! User handlers.

use axum::{
    extract::{Extension, State},
    response::Json,
    routing::get,
    Router,
};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use common::AppResult;
use domain::{CallerContext, User};

use crate::state::AppState;

/// User profile as returned to its owner
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct UserResponse {
    pub id: i64,
    #[schema(example = "Maria Brown")]
    pub name: String,
    #[schema(example = "maria@gmail.com")]
    pub email: String,
    pub phone: String,
    pub birth_date: Option<NaiveDate>,
    /// Granted authorities, e.g. `ROLE_CLIENT`
    pub roles: Vec<String>,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            name: user.name,
            email: user.email,
            phone: user.phone,
            birth_date: user.birth_date,
            roles: user.roles.into_iter().map(|role| role.authority).collect(),
        }
    }
}

/// Create user routes
pub fn user_routes() -> Router<AppState> {
    Router::new().route("/me", get(get_me))
}

/// Get current authenticated user
#[utoipa::path(
    get,
    path = "/users/me",
    tag = "Users",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Current user profile", body = UserResponse),
        (status = 401, description = "Unauthorized")
    )
)]
pub async fn get_me(
    Extension(ctx): Extension<CallerContext>,
    State(state): State<AppState>,
) -> AppResult<Json<UserResponse>> {
    let user = state.services.users().get_me(&ctx).await?;
    Ok(Json(UserResponse::from(user)))
}
