pub mod carousel;
pub mod cms;
pub mod grid;
pub mod health;
pub mod screens;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// ```text
/// /cms/dashboard                      rendered dashboard (GET)
/// /cms/screen/{slug}                  rendered screen (GET)
/// /cms/seed                           seed demo content (POST)
///
/// /grid                               list, create
/// /grid/with-carousel                 create feature + carousel (POST)
/// /grid/reorder                       batch reorder (POST)
/// /grid/save-layout                   full-snapshot save (POST)
/// /grid/{id}                          get, update, delete
///
/// /carousel                           list, create
/// /carousel/{id}                      get, update, delete
/// /carousel/{id}/cards                add card (POST)
/// /carousel/{id}/cards/reorder        batch card reorder (POST)
/// /carousel/cards/{id}                update, delete card
///
/// /screens                            list, create
/// /screens/initialize                 provision defaults (POST)
/// /screens/{id}                       get, update, deactivate
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/cms", cms::router())
        .nest("/grid", grid::router())
        .nest("/carousel", carousel::router())
        .nest("/screens", screens::router())
}
