//! Route table for the drug pages.

use axum::routing::get;
use axum::Router;

use crate::handlers;
use crate::state::AppState;

/// Build the drug management router.
///
/// NOTE: Path params use `:param` syntax (matchit 0.7 / axum 0.7).
pub fn drug_router(state: AppState) -> Router {
    Router::new()
        .route(
            "/drugs/new",
            get(handlers::init_creation_form).post(handlers::process_creation_form),
        )
        .route("/drugs", get(handlers::show_drug_list))
        .route(
            "/drugs/:drug_id/edit",
            get(handlers::init_update_form).post(handlers::process_update_form),
        )
        .route("/drugs/:drug_id/delete", get(handlers::delete_drug))
        .with_state(state)
}
