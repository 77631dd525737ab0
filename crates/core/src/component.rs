//! Component taxonomy and per-type config payloads.
//!
//! The persisted `config` column is an opaque JSON blob to the database
//! but a closed tagged union at the write boundary: every component type
//! has exactly one payload shape, checked before anything is stored.
//! Reads stay permissive -- historical blobs with missing or oddly-typed
//! fields still render with defaults instead of failing.

use std::fmt;

use serde::de::Deserializer;
use serde::ser::Serializer;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::CoreError;
use crate::types::DbId;

// ---------------------------------------------------------------------------
// Component type
// ---------------------------------------------------------------------------

/// The closed set of layout component types, plus a fallback for rows
/// written by newer admin versions. Unknown types render as the base
/// envelope and are rejected at the write boundary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ComponentType {
    Banner,
    Grid,
    List,
    Html,
    Carousel,
    Section,
    Other(String),
}

impl ComponentType {
    pub fn parse(raw: &str) -> ComponentType {
        match raw {
            "banner" => ComponentType::Banner,
            "grid" => ComponentType::Grid,
            "list" => ComponentType::List,
            "html" => ComponentType::Html,
            "carousel" => ComponentType::Carousel,
            "section" => ComponentType::Section,
            other => ComponentType::Other(other.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            ComponentType::Banner => "banner",
            ComponentType::Grid => "grid",
            ComponentType::List => "list",
            ComponentType::Html => "html",
            ComponentType::Carousel => "carousel",
            ComponentType::Section => "section",
            ComponentType::Other(s) => s,
        }
    }

    pub fn is_known(&self) -> bool {
        !matches!(self, ComponentType::Other(_))
    }

    pub fn is_carousel(&self) -> bool {
        matches!(self, ComponentType::Carousel)
    }
}

impl fmt::Display for ComponentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for ComponentType {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for ComponentType {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Ok(ComponentType::parse(&raw))
    }
}

// ---------------------------------------------------------------------------
// Component references
// ---------------------------------------------------------------------------

/// Reference to a component row: either a persisted database id or a
/// client-generated token for a row that does not exist yet (the admin UI
/// invents string tokens like `temp-1712…` for unsaved rows).
///
/// Untagged on the wire: a JSON number is a persisted id, a JSON string
/// is a pending token. The reconciler dispatches on this instead of
/// sniffing string prefixes.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ComponentRef {
    Persisted(DbId),
    Pending(String),
}

impl ComponentRef {
    pub fn persisted_id(&self) -> Option<DbId> {
        match self {
            ComponentRef::Persisted(id) => Some(*id),
            ComponentRef::Pending(_) => None,
        }
    }

    pub fn is_pending(&self) -> bool {
        matches!(self, ComponentRef::Pending(_))
    }
}

// ---------------------------------------------------------------------------
// Typed config payloads
// ---------------------------------------------------------------------------

/// One entry of a grid/list/section item collection.
///
/// `id` stays an opaque JSON value: admin tooling writes string ids,
/// seeded data writes numbers, and the renderer passes them through.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct GridItemConfig {
    pub id: Option<Value>,
    pub icon_url: Option<String>,
    pub title: Option<String>,
    pub subtitle: Option<String>,
    pub show_new_tag: bool,
    pub cta_url: Option<String>,
}

/// One banner inside a section's banner strip.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SectionBannerConfig {
    pub id: Option<Value>,
    pub order: Option<i64>,
    pub image_url: Option<String>,
    pub label: Option<String>,
    pub title: Option<String>,
    pub subtitle: Option<String>,
    pub tag: Option<String>,
    pub cta_text: Option<String>,
    pub cta_action: Option<String>,
    pub cta_url: Option<String>,
}

/// Payload for `banner` components.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct BannerConfig {
    pub images: Vec<String>,
    pub subtitle: Option<String>,
    pub show_new_tag: bool,
    pub cta_text: Option<String>,
    pub cta_action: Option<String>,
    pub cta_url: Option<String>,
}

/// Payload for `grid` and `list` components.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct GridConfig {
    pub columns: Option<i64>,
    pub display_mode: Option<String>,
    pub show_new_tag: bool,
    pub grid_items: Vec<GridItemConfig>,
}

/// Payload for `section` components: grid items plus an optional banner
/// strip that renders as a single banner or a nested carousel.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SectionConfig {
    pub columns: Option<i64>,
    pub display_mode: Option<String>,
    pub show_new_tag: bool,
    pub background_color: Option<String>,
    pub text_color: Option<String>,
    pub banner_auto_play: Option<bool>,
    pub banner_interval: Option<i64>,
    pub grid_items: Vec<GridItemConfig>,
    pub section_banners: Vec<SectionBannerConfig>,
}

/// Payload for `html` components.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct HtmlConfig {
    pub html_content: Option<String>,
    pub show_new_tag: bool,
}

/// Check a config blob against the payload shape for `ty`.
///
/// `null` is accepted as "no config". Carousel components carry
/// relational data rather than config, so only a shallow object check
/// applies. Unknown component types are rejected here -- they only exist
/// on the read side as a forward-compatibility fallback.
pub fn validate_config(ty: &ComponentType, config: &Value) -> Result<(), CoreError> {
    if config.is_null() {
        return Ok(());
    }
    if !config.is_object() {
        return Err(CoreError::Validation(format!(
            "{ty} config must be a JSON object"
        )));
    }

    let shape_check = match ty {
        ComponentType::Banner => {
            serde_json::from_value::<BannerConfig>(config.clone()).map(|_| ())
        }
        ComponentType::Grid | ComponentType::List => {
            serde_json::from_value::<GridConfig>(config.clone()).map(|_| ())
        }
        ComponentType::Section => {
            serde_json::from_value::<SectionConfig>(config.clone()).map(|_| ())
        }
        ComponentType::Html => serde_json::from_value::<HtmlConfig>(config.clone()).map(|_| ()),
        ComponentType::Carousel => Ok(()),
        ComponentType::Other(name) => {
            return Err(CoreError::Validation(format!(
                "unknown component type '{name}'"
            )));
        }
    };

    shape_check.map_err(|e| CoreError::Validation(format!("invalid {ty} config: {e}")))
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;
    use serde_json::json;

    use super::*;

    #[test]
    fn component_type_round_trips_known_values() {
        for raw in ["banner", "grid", "list", "html", "carousel", "section"] {
            let ty = ComponentType::parse(raw);
            assert!(ty.is_known());
            assert_eq!(ty.as_str(), raw);
        }
    }

    #[test]
    fn component_type_falls_back_on_unknown() {
        let ty = ComponentType::parse("hologram");
        assert!(!ty.is_known());
        assert_eq!(ty.as_str(), "hologram");
    }

    #[test]
    fn component_ref_distinguishes_numbers_from_tokens() {
        let persisted: ComponentRef = serde_json::from_value(json!(42)).unwrap();
        assert_eq!(persisted, ComponentRef::Persisted(42));
        assert_eq!(persisted.persisted_id(), Some(42));

        let pending: ComponentRef = serde_json::from_value(json!("temp-1712")).unwrap();
        assert!(pending.is_pending());
        assert_eq!(pending.persisted_id(), None);
    }

    #[test]
    fn validate_accepts_well_formed_configs() {
        let grid = json!({
            "columns": 3,
            "gridItems": [
                { "id": "1", "title": "PKR 100", "ctaUrl": "/recharge/100" }
            ]
        });
        validate_config(&ComponentType::Grid, &grid).unwrap();

        let section = json!({
            "backgroundColor": "#1a1a2e",
            "sectionBanners": [{ "imageUrl": "/uploads/a.png" }]
        });
        validate_config(&ComponentType::Section, &section).unwrap();

        validate_config(&ComponentType::Html, &json!({ "htmlContent": "<p>hi</p>" })).unwrap();
        validate_config(&ComponentType::Banner, &Value::Null).unwrap();
    }

    #[test]
    fn validate_tolerates_unknown_keys() {
        // Admin payloads carry extra presentation keys; they pass through.
        let cfg = json!({ "columns": 2, "displayMode": "compact", "legacyFlag": true });
        validate_config(&ComponentType::Grid, &cfg).unwrap();
    }

    #[test]
    fn validate_rejects_wrong_shapes() {
        assert_matches!(
            validate_config(&ComponentType::Grid, &json!([1, 2, 3])),
            Err(CoreError::Validation(_))
        );
        assert_matches!(
            validate_config(&ComponentType::Grid, &json!({ "gridItems": "nope" })),
            Err(CoreError::Validation(_))
        );
        assert_matches!(
            validate_config(&ComponentType::Other("hologram".into()), &json!({})),
            Err(CoreError::Validation(_))
        );
    }
}
