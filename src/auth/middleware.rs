use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use tracing::warn;

use crate::{
    auth::{
        jwt::TokenError,
        repo_types::{Role, User},
    },
    error::AppError,
    state::AppState,
};

/// The authenticated user, attached to request extensions by [`authenticate`].
#[derive(Debug, Clone)]
pub struct CurrentUser(pub User);

fn bearer_token(req: &Request) -> Option<&str> {
    req.headers()
        .get(axum::http::header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|h| h.strip_prefix("Bearer ").or_else(|| h.strip_prefix("bearer ")))
        .map(str::trim)
        .filter(|t| !t.is_empty())
}

/// Resolves the bearer token into a stored user, or rejects with 401.
pub async fn authenticate(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, AppError> {
    let token = bearer_token(&req).ok_or(AppError::Unauthorized("Not authorized, no token"))?;

    let claims = state.keys.verify(token).map_err(|e| {
        match e {
            TokenError::Expired => warn!("expired token"),
            TokenError::Invalid => warn!("invalid token"),
        }
        AppError::Unauthorized("Not authorized, token failed")
    })?;

    let user = state
        .users
        .find_by_id(claims.sub)
        .await?
        .ok_or_else(|| {
            warn!(user_id = %claims.sub, "token subject no longer exists");
            AppError::Unauthorized("Not authorized, token failed")
        })?;

    req.extensions_mut().insert(CurrentUser(user));
    Ok(next.run(req).await)
}

/// Must run after [`authenticate`].
pub async fn require_admin(req: Request, next: Next) -> Result<Response, AppError> {
    let current = req
        .extensions()
        .get::<CurrentUser>()
        .ok_or(AppError::Unauthorized("Not authorized, no token"))?;

    if current.0.role != Role::Admin {
        warn!(user_id = %current.0.id, "admin route denied");
        return Err(AppError::Forbidden);
    }
    Ok(next.run(req).await)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;

    fn request_with(header: Option<&str>) -> Request {
        let mut builder = axum::http::Request::builder().uri("/me");
        if let Some(h) = header {
            builder = builder.header(axum::http::header::AUTHORIZATION, h);
        }
        builder.body(Body::empty()).unwrap()
    }

    #[test]
    fn bearer_token_parsing() {
        assert_eq!(bearer_token(&request_with(Some("Bearer abc"))), Some("abc"));
        assert_eq!(bearer_token(&request_with(Some("bearer abc"))), Some("abc"));
        assert_eq!(bearer_token(&request_with(Some("Basic abc"))), None);
        assert_eq!(bearer_token(&request_with(Some("Bearer "))), None);
        assert_eq!(bearer_token(&request_with(None)), None);
    }
}
