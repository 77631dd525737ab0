//! Route definitions for carousel and card management, mounted at
//! `/carousel`.

use axum::routing::{get, patch, post};
use axum::Router;

use crate::handlers::carousel;
use crate::state::AppState;

/// ```text
/// GET    /                      -> list_carousels
/// POST   /                      -> create_carousel
/// GET    /{id}                  -> get_carousel
/// PATCH  /{id}                  -> update_carousel
/// DELETE /{id}                  -> delete_carousel
/// POST   /{id}/cards            -> add_card
/// POST   /{id}/cards/reorder    -> reorder_cards
/// PATCH  /cards/{id}            -> update_card
/// DELETE /cards/{id}            -> delete_card
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(carousel::list_carousels).post(carousel::create_carousel))
        .route(
            "/{id}",
            get(carousel::get_carousel)
                .patch(carousel::update_carousel)
                .delete(carousel::delete_carousel),
        )
        .route("/{id}/cards", post(carousel::add_card))
        .route("/{id}/cards/reorder", post(carousel::reorder_cards))
        .route(
            "/cards/{id}",
            patch(carousel::update_card).delete(carousel::delete_card),
        )
}
