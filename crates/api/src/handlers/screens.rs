//! Handlers for screen management. Deletion is a soft deactivate.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;

use mast_core::error::CoreError;
use mast_core::types::DbId;
use mast_db::models::screen::{CreateScreen, UpdateScreen};
use mast_db::repositories::ScreenRepo;

use crate::error::{AppError, AppResult};
use crate::query::IncludeInactiveParams;
use crate::response::DataResponse;
use crate::state::AppState;

/// GET /api/v1/screens?includeInactive=
pub async fn list_screens(
    State(state): State<AppState>,
    Query(params): Query<IncludeInactiveParams>,
) -> AppResult<impl IntoResponse> {
    let screens = ScreenRepo::list(&state.pool, params.include_inactive).await?;

    Ok(Json(DataResponse { data: screens }))
}

/// POST /api/v1/screens
pub async fn create_screen(
    State(state): State<AppState>,
    Json(input): Json<CreateScreen>,
) -> AppResult<impl IntoResponse> {
    let screen = ScreenRepo::create(&state.pool, &input).await?;

    tracing::info!(screen_id = screen.id, slug = %screen.slug, "Screen created");

    Ok((StatusCode::CREATED, Json(DataResponse { data: screen })))
}

/// GET /api/v1/screens/{id}
pub async fn get_screen(
    State(state): State<AppState>,
    Path(screen_id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let screen = ScreenRepo::find_by_id(&state.pool, screen_id)
        .await?
        .ok_or_else(|| screen_not_found(screen_id))?;

    Ok(Json(DataResponse { data: screen }))
}

/// PATCH /api/v1/screens/{id}
pub async fn update_screen(
    State(state): State<AppState>,
    Path(screen_id): Path<DbId>,
    Json(input): Json<UpdateScreen>,
) -> AppResult<impl IntoResponse> {
    let screen = ScreenRepo::update(&state.pool, screen_id, &input)
        .await?
        .ok_or_else(|| screen_not_found(screen_id))?;

    Ok(Json(DataResponse { data: screen }))
}

/// DELETE /api/v1/screens/{id}
///
/// Soft deactivate; the row and its features stay.
pub async fn deactivate_screen(
    State(state): State<AppState>,
    Path(screen_id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let deactivated = ScreenRepo::deactivate(&state.pool, screen_id).await?;
    if !deactivated {
        return Err(screen_not_found(screen_id));
    }

    tracing::info!(screen_id, "Screen deactivated");

    Ok(StatusCode::NO_CONTENT)
}

/// POST /api/v1/screens/initialize
///
/// Idempotently provision the default screen set.
pub async fn initialize_screens(State(state): State<AppState>) -> AppResult<impl IntoResponse> {
    let screens = ScreenRepo::initialize_defaults(&state.pool).await?;

    Ok(Json(DataResponse { data: screens }))
}

fn screen_not_found(screen_id: DbId) -> AppError {
    AppError::Core(CoreError::NotFound {
        entity: "screen",
        key: screen_id.to_string(),
    })
}
