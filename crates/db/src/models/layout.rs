//! Layout snapshot DTOs for the save-layout reconciler.
//!
//! The admin app submits the full desired state of a screen as two
//! segment-partitioned ordered lists. Items and cards reference rows via
//! [`ComponentRef`]: persisted database ids stay numbers, rows the client
//! invented locally arrive as pending string tokens.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use mast_core::component::ComponentRef;
use mast_core::segment::Segment;
use mast_core::types::DbId;

/// Full desired-state snapshot of one screen's layout.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LayoutSnapshot {
    #[serde(default)]
    pub pre_paid_items: Vec<LayoutItem>,
    #[serde(default)]
    pub post_paid_items: Vec<LayoutItem>,
    /// Target screen; absent means the auto-provisioned dashboard.
    #[serde(default)]
    pub screen_id: Option<DbId>,
    /// Optimistic-concurrency stamp. When present, a mismatch against the
    /// screen's stored `layout_version` rejects the save with a conflict.
    #[serde(default)]
    pub expected_version: Option<i64>,
}

/// One component in a snapshot list. Array position is authoritative for
/// render order; the list partition is authoritative for segment.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LayoutItem {
    pub id: ComponentRef,
    #[serde(default)]
    pub is_new: bool,
    pub title: String,
    #[serde(rename = "type")]
    pub component_type: String,
    /// Carried by legacy clients; overridden by the list partition.
    #[serde(default)]
    pub user_type: Option<Segment>,
    /// Maps to `is_active`.
    #[serde(default = "default_show")]
    pub show: bool,
    #[serde(default)]
    pub config: Value,
    /// Ownership edge for existing carousel-type items.
    #[serde(default)]
    pub carousel_id: Option<DbId>,
    #[serde(default)]
    pub auto_play: Option<bool>,
    #[serde(default, rename = "interval")]
    pub interval_ms: Option<i32>,
    #[serde(default)]
    pub carousel_cards: Vec<LayoutCard>,
    /// Card ids captured when the layout was loaded; used purely to
    /// compute card deletions.
    #[serde(default)]
    pub original_card_ids: Vec<DbId>,
}

fn default_show() -> bool {
    true
}

/// One card inside a carousel-type snapshot item.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LayoutCard {
    pub id: Option<ComponentRef>,
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
}

impl LayoutCard {
    /// Persisted id, if this card references an existing row.
    pub fn persisted_id(&self) -> Option<DbId> {
        self.id.as_ref().and_then(ComponentRef::persisted_id)
    }
}

/// Outcome of a layout save.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SaveLayoutResult {
    pub created: u32,
    pub updated: u32,
    pub deleted: u32,
    pub cards_created: u32,
    pub cards_updated: u32,
    pub cards_deleted: u32,
    pub layout_version: i64,
}
