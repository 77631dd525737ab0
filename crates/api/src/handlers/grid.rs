//! Handlers for admin grid-feature management, including the full-layout
//! save endpoint.

use std::collections::HashMap;

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;

use mast_core::component::{validate_config, ComponentType};
use mast_core::error::CoreError;
use mast_core::segment::Segment;
use mast_core::types::DbId;
use mast_db::models::carousel::CarouselDetail;
use mast_db::models::feature::{
    CreateFeatureWithCarousel, CreateGridFeature, FeatureFilter, GridFeature, GridFeatureDetail,
    ReorderItem, UpdateGridFeature,
};
use mast_db::models::layout::LayoutSnapshot;
use mast_db::repositories::{CarouselRepo, FeatureRepo, LayoutRepo};

use crate::error::{AppError, AppResult};
use crate::query::FeatureListParams;
use crate::response::DataResponse;
use crate::state::AppState;

/// GET /api/v1/grid?userType=&screenId=&includeInactive=
///
/// Raw feature list for the admin app, carousels and cards attached.
pub async fn list_features(
    State(state): State<AppState>,
    Query(params): Query<FeatureListParams>,
) -> AppResult<impl IntoResponse> {
    let filter = FeatureFilter {
        user_type: Segment::filter_from_query(params.user_type.as_deref())?,
        screen_id: params.screen_id,
        include_inactive: params.include_inactive,
    };
    let features = FeatureRepo::find_all(&state.pool, filter).await?;
    let details = attach_carousels(&state, features).await?;

    Ok(Json(DataResponse { data: details }))
}

/// POST /api/v1/grid
///
/// Create one feature. The component type must be known and the config
/// blob must match its payload shape.
pub async fn create_feature(
    State(state): State<AppState>,
    Json(input): Json<CreateGridFeature>,
) -> AppResult<impl IntoResponse> {
    let ty = known_type(&input.component_type)?;
    if let Some(config) = &input.config {
        validate_config(&ty, config)?;
    }
    let feature = FeatureRepo::create(&state.pool, &input).await?;

    tracing::info!(feature_id = feature.id, ty = %ty, "Grid feature created");

    Ok((StatusCode::CREATED, Json(DataResponse { data: feature })))
}

/// POST /api/v1/grid/with-carousel
///
/// Create a carousel feature together with its carousel and cards in one
/// transaction.
pub async fn create_feature_with_carousel(
    State(state): State<AppState>,
    Json(input): Json<CreateFeatureWithCarousel>,
) -> AppResult<impl IntoResponse> {
    if let Some(config) = &input.config {
        validate_config(&ComponentType::Carousel, config)?;
    }
    let feature = FeatureRepo::create_with_carousel(&state.pool, &input).await?;
    let carousel = match feature.carousel_id {
        Some(id) => CarouselRepo::find_with_cards(&state.pool, id).await?,
        None => None,
    };

    tracing::info!(feature_id = feature.id, "Carousel feature created");

    Ok((
        StatusCode::CREATED,
        Json(DataResponse {
            data: GridFeatureDetail { feature, carousel },
        }),
    ))
}

/// GET /api/v1/grid/{id}
pub async fn get_feature(
    State(state): State<AppState>,
    Path(feature_id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let feature = FeatureRepo::find_by_id(&state.pool, feature_id)
        .await?
        .ok_or_else(|| feature_not_found(feature_id))?;
    let carousel = match feature.carousel_id {
        Some(id) => CarouselRepo::find_with_cards(&state.pool, id).await?,
        None => None,
    };

    Ok(Json(DataResponse {
        data: GridFeatureDetail { feature, carousel },
    }))
}

/// PATCH /api/v1/grid/{id}
///
/// Partial update. A config change is validated against the feature's
/// effective component type (the incoming type when supplied, the stored
/// one otherwise).
pub async fn update_feature(
    State(state): State<AppState>,
    Path(feature_id): Path<DbId>,
    Json(input): Json<UpdateGridFeature>,
) -> AppResult<impl IntoResponse> {
    let existing = FeatureRepo::find_by_id(&state.pool, feature_id)
        .await?
        .ok_or_else(|| feature_not_found(feature_id))?;

    let ty = match &input.component_type {
        Some(raw) => known_type(raw)?,
        None => existing.ty(),
    };
    if let Some(config) = &input.config {
        validate_config(&ty, config)?;
    }

    let feature = FeatureRepo::update(&state.pool, feature_id, &input)
        .await?
        .ok_or_else(|| feature_not_found(feature_id))?;

    Ok(Json(DataResponse { data: feature }))
}

/// DELETE /api/v1/grid/{id}
///
/// Deletes only the feature row; an owned carousel stays behind for the
/// caller to clean up (or for the layout save path to reconcile away).
pub async fn delete_feature(
    State(state): State<AppState>,
    Path(feature_id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let deleted = FeatureRepo::delete(&state.pool, feature_id).await?;
    if !deleted {
        return Err(feature_not_found(feature_id));
    }

    tracing::info!(feature_id, "Grid feature deleted");

    Ok(StatusCode::NO_CONTENT)
}

/// POST /api/v1/grid/reorder
///
/// Batch `{id, order}` updates, all-or-nothing.
pub async fn reorder_features(
    State(state): State<AppState>,
    Json(items): Json<Vec<ReorderItem>>,
) -> AppResult<impl IntoResponse> {
    FeatureRepo::reorder(&state.pool, &items).await?;

    Ok(Json(DataResponse {
        data: serde_json::json!({ "updated": items.len() }),
    }))
}

/// POST /api/v1/grid/save-layout
///
/// Apply a full layout snapshot in one transaction. A stale
/// `expectedVersion` is a 409 with nothing written.
pub async fn save_layout(
    State(state): State<AppState>,
    Json(snapshot): Json<LayoutSnapshot>,
) -> AppResult<impl IntoResponse> {
    let result = LayoutRepo::save(&state.pool, &snapshot).await?;

    tracing::info!(
        created = result.created,
        updated = result.updated,
        deleted = result.deleted,
        layout_version = result.layout_version,
        "Layout saved",
    );

    Ok(Json(DataResponse { data: result }))
}

/// Attach carousel details (all cards, admin view) to a feature list.
async fn attach_carousels(
    state: &AppState,
    features: Vec<GridFeature>,
) -> AppResult<Vec<GridFeatureDetail>> {
    let carousel_ids: Vec<DbId> = features.iter().filter_map(|f| f.carousel_id).collect();
    let carousels: HashMap<DbId, CarouselDetail> =
        CarouselRepo::find_many_with_cards(&state.pool, &carousel_ids, false).await?;

    Ok(features
        .into_iter()
        .map(|feature| {
            let carousel = feature.carousel_id.and_then(|id| carousels.get(&id).cloned());
            GridFeatureDetail { feature, carousel }
        })
        .collect())
}

fn known_type(raw: &str) -> Result<ComponentType, AppError> {
    let ty = ComponentType::parse(raw);
    if !ty.is_known() {
        return Err(AppError::Core(CoreError::Validation(format!(
            "unknown component type '{raw}'"
        ))));
    }
    Ok(ty)
}

fn feature_not_found(feature_id: DbId) -> AppError {
    AppError::Core(CoreError::NotFound {
        entity: "grid feature",
        key: feature_id.to_string(),
    })
}
