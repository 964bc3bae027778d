use axum::{middleware, routing::get, Router};

use crate::{
    auth::middleware::{authenticate, require_admin},
    state::AppState,
};

pub mod admin;
pub mod me;

/// Routes behind the bearer token. Later layers run first, so
/// `authenticate` always precedes `require_admin`.
pub fn protected_routes(state: AppState) -> Router<AppState> {
    let me = Router::new()
        .route("/me", get(me::me_route))
        .route_layer(middleware::from_fn_with_state(state.clone(), authenticate));

    let admin = Router::new()
        .route("/admin/users", get(admin::list_users))
        .route_layer(middleware::from_fn(require_admin))
        .route_layer(middleware::from_fn_with_state(state, authenticate));

    me.merge(admin)
}
