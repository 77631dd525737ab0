//! Shared query parameter types for API handlers.
//!
//! Segment selection arrives as a raw `?userType=` string and is parsed
//! through `mast_core::segment`, so legacy values and casing are handled
//! in exactly one place.

use serde::Deserialize;

use mast_core::types::DbId;

/// `?userType=` on rendered CMS endpoints. Missing or blank defaults to
/// PRE_PAID; unknown values are a 400.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SegmentParams {
    pub user_type: Option<String>,
}

/// Filters for the admin feature listing
/// (`?userType=&screenId=&includeInactive=`).
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeatureListParams {
    pub user_type: Option<String>,
    pub screen_id: Option<DbId>,
    #[serde(default)]
    pub include_inactive: bool,
}

/// Query parameters for list endpoints that support an `includeInactive`
/// flag over soft-deactivated rows.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IncludeInactiveParams {
    #[serde(default)]
    pub include_inactive: bool,
}
