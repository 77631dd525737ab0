//! Feature rendering for the mobile client.
//!
//! Turns persisted features (with eagerly loaded carousels) into the JSON
//! the app consumes. Rendering is deliberately forgiving: config blobs are
//! deserialized with defaults, so a missing or oddly-typed key yields a
//! null or a default value, never an error. The strictness lives at the
//! write boundary.

use serde_json::{json, Value};

use mast_core::component::{
    BannerConfig, ComponentType, GridConfig, GridItemConfig, HtmlConfig, SectionBannerConfig,
    SectionConfig,
};
use mast_core::upload::resolve_image_url;
use mast_db::models::carousel::{CarouselCard, CarouselDetail};
use mast_db::models::feature::GridFeature;

/// Render one feature to its client JSON representation.
///
/// `carousel` is the feature's eagerly loaded carousel with active cards,
/// present only for carousel-type features. Every branch shares the base
/// envelope `{id, type, title, order}`; a carousel feature whose carousel
/// row is missing renders as the base envelope alone.
pub fn render_feature(
    base_url: &str,
    feature: &GridFeature,
    carousel: Option<&CarouselDetail>,
) -> Value {
    let mut out = json!({
        "id": feature.id,
        "type": feature.component_type,
        "title": feature.title,
        "order": feature.sort_order,
    });
    let body = out.as_object_mut().unwrap();

    match feature.ty() {
        ComponentType::Carousel => {
            if let Some(detail) = carousel {
                body.insert("autoPlay".into(), json!(detail.carousel.auto_play));
                body.insert("interval".into(), json!(detail.carousel.interval_ms));
                let items: Vec<Value> = detail
                    .cards
                    .iter()
                    .map(|card| render_card(base_url, card))
                    .collect();
                body.insert("items".into(), json!(items));
            }
        }
        ComponentType::Grid | ComponentType::List => {
            let config: GridConfig =
                serde_json::from_value(feature.config.clone()).unwrap_or_default();
            body.insert("columns".into(), json!(config.columns.unwrap_or(4)));
            let items: Vec<Value> = config
                .grid_items
                .iter()
                .map(|item| render_grid_item(base_url, item))
                .collect();
            body.insert("items".into(), json!(items));
        }
        ComponentType::Banner => {
            let config: BannerConfig =
                serde_json::from_value(feature.config.clone()).unwrap_or_default();
            let image_url = config
                .images
                .first()
                .and_then(|path| resolve_image_url(base_url, Some(path)));
            body.insert("imageUrl".into(), json!(image_url));
            body.insert("subtitle".into(), json!(config.subtitle));
            body.insert("showNewTag".into(), json!(config.show_new_tag));
            body.insert(
                "cta".into(),
                render_cta(config.cta_text.as_deref(), config.cta_action.as_deref(), config.cta_url.as_deref()),
            );
        }
        ComponentType::Section => {
            let config: SectionConfig =
                serde_json::from_value(feature.config.clone()).unwrap_or_default();
            body.insert(
                "style".into(),
                json!({
                    "backgroundColor": config.background_color.as_deref().unwrap_or("#1a1a2e"),
                    "textColor": config.text_color.as_deref().unwrap_or("#ffffff"),
                }),
            );
            body.insert("columns".into(), json!(config.columns.unwrap_or(4)));
            let items: Vec<Value> = config
                .grid_items
                .iter()
                .map(|item| render_grid_item(base_url, item))
                .collect();
            body.insert("items".into(), json!(items));

            if !config.section_banners.is_empty() {
                let banners: Vec<Value> = config
                    .section_banners
                    .iter()
                    .map(|banner| render_section_banner(base_url, banner))
                    .collect();
                // A single banner renders statically; two or more become a
                // nested carousel with play settings.
                let mut section = json!({
                    "type": if banners.len() > 1 { "carousel" } else { "banner" },
                    "items": banners,
                });
                if config.section_banners.len() > 1 {
                    let obj = section.as_object_mut().unwrap();
                    obj.insert(
                        "autoPlay".into(),
                        json!(config.banner_auto_play.unwrap_or(true)),
                    );
                    obj.insert(
                        "interval".into(),
                        json!(config.banner_interval.unwrap_or(4000)),
                    );
                }
                body.insert("bannerSection".into(), section);
            }
        }
        ComponentType::Html => {
            let config: HtmlConfig =
                serde_json::from_value(feature.config.clone()).unwrap_or_default();
            body.insert(
                "content".into(),
                json!(config.html_content.unwrap_or_default()),
            );
            body.insert("showNewTag".into(), json!(config.show_new_tag));
        }
        ComponentType::Other(_) => {}
    }

    out
}

fn render_card(base_url: &str, card: &CarouselCard) -> Value {
    json!({
        "id": card.id,
        "order": card.sort_order,
        "imageUrl": resolve_image_url(base_url, card.image_url.as_deref()),
        "title": card.title,
        "subtitle": card.subtitle,
        "description": card.description,
        "price": card.price,
        "currency": card.currency,
        "style": {
            "backgroundColor": card.background_color,
            "textColor": card.text_color,
        },
        "cta": render_cta(card.cta_text.as_deref(), card.cta_action.as_deref(), card.cta_url.as_deref()),
        "metadata": card.metadata,
    })
}

fn render_grid_item(base_url: &str, item: &GridItemConfig) -> Value {
    json!({
        "id": item.id,
        "iconUrl": resolve_image_url(base_url, item.icon_url.as_deref()),
        "title": item.title,
        "subtitle": item.subtitle,
        "showNewTag": item.show_new_tag,
        // Grid items carry no cta text; a url alone makes the action.
        "cta": item.cta_url.as_deref().map(|url| json!({
            "action": "navigate",
            "url": url,
        })),
    })
}

fn render_section_banner(base_url: &str, banner: &SectionBannerConfig) -> Value {
    json!({
        "id": banner.id,
        "order": banner.order.unwrap_or(0),
        "imageUrl": resolve_image_url(base_url, banner.image_url.as_deref()),
        "label": banner.label,
        "title": banner.title,
        "subtitle": banner.subtitle,
        "tag": banner.tag,
        "cta": render_cta(banner.cta_text.as_deref(), banner.cta_action.as_deref(), banner.cta_url.as_deref()),
    })
}

/// A call-to-action exists only when its text does; the action defaults
/// to `navigate`.
fn render_cta(text: Option<&str>, action: Option<&str>, url: Option<&str>) -> Value {
    match text {
        Some(text) => json!({
            "text": text,
            "action": action.unwrap_or("navigate"),
            "url": url,
        }),
        None => Value::Null,
    }
}
