//! HTTP route handlers.

pub mod admin;
pub mod api;
pub mod front;
pub mod health;
pub mod helpers;
pub mod static_files;

use axum::Router;
use tower_http::trace::TraceLayer;

use crate::state::AppState;

/// Build the full application router.
///
/// Specific routes (`/health`, `/api/...`, `/static/...`, `/admin/api/...`)
/// take precedence over the `/{slug}` page catch.
pub fn app(state: AppState) -> Router {
    Router::new()
        .merge(front::router())
        .merge(api::router())
        .merge(admin::router(&state))
        .merge(health::router())
        .merge(static_files::router())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
