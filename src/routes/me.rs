use axum::{Extension, Json};
use tracing::instrument;

use crate::auth::{dto::UserSummary, middleware::CurrentUser};

#[instrument(skip(current), fields(user_id = %current.0.id))]
pub async fn me_route(Extension(current): Extension<CurrentUser>) -> Json<UserSummary> {
    Json(UserSummary::from(&current.0))
}
