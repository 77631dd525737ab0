//! Handlers for admin carousel and card management.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;

use mast_core::error::CoreError;
use mast_core::segment::Segment;
use mast_core::types::DbId;
use mast_db::models::carousel::{CreateCard, CreateCarousel, UpdateCard, UpdateCarousel};
use mast_db::models::feature::ReorderItem;
use mast_db::repositories::CarouselRepo;

use crate::error::{AppError, AppResult};
use crate::query::SegmentParams;
use crate::response::DataResponse;
use crate::state::AppState;

/// GET /api/v1/carousel?userType=
///
/// Active carousels with active cards; segment filter optional.
pub async fn list_carousels(
    State(state): State<AppState>,
    Query(params): Query<SegmentParams>,
) -> AppResult<impl IntoResponse> {
    let segment = Segment::filter_from_query(params.user_type.as_deref())?;
    let carousels = CarouselRepo::list(&state.pool, segment).await?;

    Ok(Json(DataResponse { data: carousels }))
}

/// POST /api/v1/carousel
pub async fn create_carousel(
    State(state): State<AppState>,
    Json(input): Json<CreateCarousel>,
) -> AppResult<impl IntoResponse> {
    let detail = CarouselRepo::create(&state.pool, &input).await?;

    tracing::info!(
        carousel_id = detail.carousel.id,
        cards = detail.cards.len(),
        "Carousel created",
    );

    Ok((StatusCode::CREATED, Json(DataResponse { data: detail })))
}

/// GET /api/v1/carousel/{id}
pub async fn get_carousel(
    State(state): State<AppState>,
    Path(carousel_id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let detail = CarouselRepo::find_with_cards(&state.pool, carousel_id)
        .await?
        .ok_or_else(|| carousel_not_found(carousel_id))?;

    Ok(Json(DataResponse { data: detail }))
}

/// PATCH /api/v1/carousel/{id}
pub async fn update_carousel(
    State(state): State<AppState>,
    Path(carousel_id): Path<DbId>,
    Json(input): Json<UpdateCarousel>,
) -> AppResult<impl IntoResponse> {
    let carousel = CarouselRepo::update(&state.pool, carousel_id, &input)
        .await?
        .ok_or_else(|| carousel_not_found(carousel_id))?;

    Ok(Json(DataResponse { data: carousel }))
}

/// DELETE /api/v1/carousel/{id}
///
/// Hard delete; cards cascade.
pub async fn delete_carousel(
    State(state): State<AppState>,
    Path(carousel_id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let deleted = CarouselRepo::delete(&state.pool, carousel_id).await?;
    if !deleted {
        return Err(carousel_not_found(carousel_id));
    }

    tracing::info!(carousel_id, "Carousel deleted");

    Ok(StatusCode::NO_CONTENT)
}

/// POST /api/v1/carousel/{id}/cards
pub async fn add_card(
    State(state): State<AppState>,
    Path(carousel_id): Path<DbId>,
    Json(input): Json<CreateCard>,
) -> AppResult<impl IntoResponse> {
    // Explicit existence check so a bad id is a 404, not an FK error.
    CarouselRepo::find_with_cards(&state.pool, carousel_id)
        .await?
        .ok_or_else(|| carousel_not_found(carousel_id))?;

    let card = CarouselRepo::add_card(&state.pool, carousel_id, &input).await?;

    Ok((StatusCode::CREATED, Json(DataResponse { data: card })))
}

/// PATCH /api/v1/carousel/cards/{id}
pub async fn update_card(
    State(state): State<AppState>,
    Path(card_id): Path<DbId>,
    Json(input): Json<UpdateCard>,
) -> AppResult<impl IntoResponse> {
    let card = CarouselRepo::update_card(&state.pool, card_id, &input)
        .await?
        .ok_or_else(|| card_not_found(card_id))?;

    Ok(Json(DataResponse { data: card }))
}

/// DELETE /api/v1/carousel/cards/{id}
pub async fn delete_card(
    State(state): State<AppState>,
    Path(card_id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let deleted = CarouselRepo::delete_card(&state.pool, card_id).await?;
    if !deleted {
        return Err(card_not_found(card_id));
    }

    Ok(StatusCode::NO_CONTENT)
}

/// POST /api/v1/carousel/{id}/cards/reorder
///
/// Batch card order updates, all-or-nothing. Ids outside the addressed
/// carousel reject the whole batch.
pub async fn reorder_cards(
    State(state): State<AppState>,
    Path(carousel_id): Path<DbId>,
    Json(items): Json<Vec<ReorderItem>>,
) -> AppResult<impl IntoResponse> {
    CarouselRepo::reorder_cards(&state.pool, carousel_id, &items).await?;

    Ok(Json(DataResponse {
        data: serde_json::json!({ "updated": items.len() }),
    }))
}

fn carousel_not_found(carousel_id: DbId) -> AppError {
    AppError::Core(CoreError::NotFound {
        entity: "carousel",
        key: carousel_id.to_string(),
    })
}

fn card_not_found(card_id: DbId) -> AppError {
    AppError::Core(CoreError::NotFound {
        entity: "carousel card",
        key: card_id.to_string(),
    })
}
