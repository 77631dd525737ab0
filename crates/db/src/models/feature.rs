//! Grid feature models and DTOs.
//!
//! A grid feature is one positioned component on a screen for one
//! segment. Its `config` blob is validated against the typed union in
//! `mast_core::component` at the write boundary; carousel-type features
//! additionally hold the ownership edge to their carousel.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use sqlx::FromRow;

use mast_core::component::ComponentType;
use mast_core::segment::Segment;
use mast_core::types::{DbId, Timestamp};

use crate::models::carousel::CarouselDetail;

/// A row from the `grid_features` table.
#[derive(Debug, Clone, FromRow, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GridFeature {
    pub id: DbId,
    pub screen_id: Option<DbId>,
    pub title: String,
    #[serde(rename = "type")]
    pub component_type: String,
    #[serde(rename = "order")]
    pub sort_order: i32,
    pub user_type: Segment,
    pub is_active: bool,
    pub config: Value,
    pub carousel_id: Option<DbId>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl GridFeature {
    /// Parsed component type. Tolerates unknown strings so rows written
    /// by newer admin versions still render as the base envelope.
    pub fn ty(&self) -> ComponentType {
        ComponentType::parse(&self.component_type)
    }
}

/// A feature with its carousel (and cards) eagerly attached, as returned
/// to the admin app.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GridFeatureDetail {
    #[serde(flatten)]
    pub feature: GridFeature,
    pub carousel: Option<CarouselDetail>,
}

/// DTO for creating a single feature.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateGridFeature {
    pub title: String,
    #[serde(rename = "type")]
    pub component_type: String,
    #[serde(default, rename = "order")]
    pub sort_order: Option<i32>,
    #[serde(default)]
    pub config: Option<Value>,
    #[serde(default)]
    pub user_type: Option<Segment>,
    #[serde(default)]
    pub screen_id: Option<DbId>,
    #[serde(default)]
    pub carousel_id: Option<DbId>,
}

/// DTO for partially updating a feature.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateGridFeature {
    pub title: Option<String>,
    #[serde(rename = "type")]
    pub component_type: Option<String>,
    #[serde(rename = "order")]
    pub sort_order: Option<i32>,
    pub config: Option<Value>,
    pub user_type: Option<Segment>,
    pub screen_id: Option<DbId>,
    pub carousel_id: Option<DbId>,
    pub is_active: Option<bool>,
}

/// DTO for creating a carousel-type feature together with its carousel
/// and cards in one transaction.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateFeatureWithCarousel {
    pub title: String,
    #[serde(default, rename = "order")]
    pub sort_order: Option<i32>,
    #[serde(default)]
    pub screen_id: Option<DbId>,
    #[serde(default)]
    pub user_type: Option<Segment>,
    #[serde(default)]
    pub config: Option<Value>,
    pub carousel: crate::models::carousel::CreateCarousel,
}

/// One entry of a batch reorder request.
#[derive(Debug, Clone, Deserialize)]
pub struct ReorderItem {
    pub id: DbId,
    pub order: i32,
}

/// Filters accepted by the admin feature listing.
#[derive(Debug, Clone, Copy, Default)]
pub struct FeatureFilter {
    pub user_type: Option<Segment>,
    pub screen_id: Option<DbId>,
    pub include_inactive: bool,
}
