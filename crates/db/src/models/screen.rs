//! Screen models and DTOs.
//!
//! A screen is an addressable surface in the mobile app (`dashboard`,
//! `home`, ...). Screens are soft-deactivated rather than deleted and
//! carry the `layout_version` stamp used for optimistic concurrency on
//! layout saves.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use mast_core::types::{DbId, Timestamp};

/// A row from the `screens` table.
#[derive(Debug, Clone, FromRow, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Screen {
    pub id: DbId,
    pub slug: String,
    pub name: String,
    pub description: Option<String>,
    pub is_active: bool,
    pub layout_version: i64,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for creating a screen.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateScreen {
    pub slug: String,
    pub name: String,
    pub description: Option<String>,
}

/// DTO for partially updating a screen.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateScreen {
    pub slug: Option<String>,
    pub name: Option<String>,
    pub description: Option<String>,
    pub is_active: Option<bool>,
}
