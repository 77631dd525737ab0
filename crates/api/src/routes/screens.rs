//! Route definitions for screen management, mounted at `/screens`.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::screens;
use crate::state::AppState;

/// ```text
/// GET    /             -> list_screens
/// POST   /             -> create_screen
/// POST   /initialize   -> initialize_screens
/// GET    /{id}         -> get_screen
/// PATCH  /{id}         -> update_screen
/// DELETE /{id}         -> deactivate_screen
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(screens::list_screens).post(screens::create_screen))
        .route("/initialize", post(screens::initialize_screens))
        .route(
            "/{id}",
            get(screens::get_screen)
                .patch(screens::update_screen)
                .delete(screens::deactivate_screen),
        )
}
