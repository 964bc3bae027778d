use axum::{extract::State, Json};
use tracing::{info, instrument};

use crate::{
    auth::{dto::UserSummary, store::CredentialStore},
    error::AppError,
};

#[instrument(skip(users))]
pub async fn list_users(
    State(users): State<CredentialStore>,
) -> Result<Json<Vec<UserSummary>>, AppError> {
    let all = users.list_all().await?;
    info!(count = all.len(), "listed users");
    Ok(Json(all.iter().map(UserSummary::from).collect()))
}
