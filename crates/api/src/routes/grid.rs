//! Route definitions for grid-feature management, mounted at `/grid`.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::grid;
use crate::state::AppState;

/// ```text
/// GET    /                -> list_features
/// POST   /                -> create_feature
/// POST   /with-carousel   -> create_feature_with_carousel
/// POST   /reorder         -> reorder_features
/// POST   /save-layout     -> save_layout
/// GET    /{id}            -> get_feature
/// PATCH  /{id}            -> update_feature
/// DELETE /{id}            -> delete_feature
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(grid::list_features).post(grid::create_feature))
        .route("/with-carousel", post(grid::create_feature_with_carousel))
        .route("/reorder", post(grid::reorder_features))
        .route("/save-layout", post(grid::save_layout))
        .route(
            "/{id}",
            get(grid::get_feature)
                .patch(grid::update_feature)
                .delete(grid::delete_feature),
        )
}
