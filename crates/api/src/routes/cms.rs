//! Route definitions for the rendered CMS endpoints, mounted at `/cms`.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::cms;
use crate::state::AppState;

/// ```text
/// GET  /dashboard       -> get_dashboard
/// GET  /screen/{slug}   -> get_screen
/// POST /seed            -> seed_demo_data
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/dashboard", get(cms::get_dashboard))
        .route("/screen/{slug}", get(cms::get_screen))
        .route("/seed", post(cms::seed_demo_data))
}
