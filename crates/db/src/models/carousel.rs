//! Carousel and carousel card models and DTOs.
//!
//! A carousel is exclusively owned by one carousel-type grid feature and
//! owns an ordered set of cards. Card order is unique within a carousel
//! by convention; the reconciler rewrites it densely on every save.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use sqlx::FromRow;

use mast_core::segment::Segment;
use mast_core::types::{DbId, Timestamp};

/// A row from the `carousels` table.
#[derive(Debug, Clone, FromRow, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Carousel {
    pub id: DbId,
    pub name: String,
    pub description: Option<String>,
    pub user_type: Segment,
    pub auto_play: bool,
    #[serde(rename = "interval")]
    pub interval_ms: i32,
    pub is_active: bool,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// A row from the `carousel_cards` table.
#[derive(Debug, Clone, FromRow, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CarouselCard {
    pub id: DbId,
    pub carousel_id: DbId,
    #[serde(rename = "order")]
    pub sort_order: i32,
    pub image_url: Option<String>,
    pub title: Option<String>,
    pub subtitle: Option<String>,
    pub description: Option<String>,
    pub price: Option<f64>,
    pub currency: Option<String>,
    pub cta_text: Option<String>,
    pub cta_action: Option<String>,
    pub cta_url: Option<String>,
    pub background_color: Option<String>,
    pub text_color: Option<String>,
    pub user_type: Segment,
    pub metadata: Option<Value>,
    pub is_active: bool,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// A carousel with its cards eagerly attached.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CarouselDetail {
    #[serde(flatten)]
    pub carousel: Carousel,
    pub cards: Vec<CarouselCard>,
}

/// DTO for creating a carousel, optionally with its initial cards.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateCarousel {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub user_type: Option<Segment>,
    #[serde(default)]
    pub auto_play: Option<bool>,
    #[serde(default, rename = "interval")]
    pub interval_ms: Option<i32>,
    #[serde(default)]
    pub cards: Vec<CreateCard>,
}

/// DTO for partially updating a carousel.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateCarousel {
    pub name: Option<String>,
    pub description: Option<String>,
    pub user_type: Option<Segment>,
    pub auto_play: Option<bool>,
    #[serde(rename = "interval")]
    pub interval_ms: Option<i32>,
    pub is_active: Option<bool>,
}

/// DTO for creating a card.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CreateCard {
    #[serde(rename = "order")]
    pub sort_order: Option<i32>,
    pub image_url: Option<String>,
    pub title: Option<String>,
    pub subtitle: Option<String>,
    pub description: Option<String>,
    pub price: Option<f64>,
    pub currency: Option<String>,
    pub cta_text: Option<String>,
    pub cta_action: Option<String>,
    pub cta_url: Option<String>,
    pub background_color: Option<String>,
    pub text_color: Option<String>,
    pub metadata: Option<Value>,
    pub user_type: Option<Segment>,
}

/// DTO for partially updating a card.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct UpdateCard {
    #[serde(rename = "order")]
    pub sort_order: Option<i32>,
    pub image_url: Option<String>,
    pub title: Option<String>,
    pub subtitle: Option<String>,
    pub description: Option<String>,
    pub price: Option<f64>,
    pub currency: Option<String>,
    pub cta_text: Option<String>,
    pub cta_action: Option<String>,
    pub cta_url: Option<String>,
    pub background_color: Option<String>,
    pub text_color: Option<String>,
    pub metadata: Option<Value>,
    pub user_type: Option<Segment>,
    pub is_active: Option<bool>,
}
