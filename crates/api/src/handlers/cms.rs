//! Handlers for the rendered CMS endpoints consumed by the mobile app.
//!
//! These return the client JSON contract directly (no `data` envelope)
//! with a short public cache header. Content is strictly scoped to one
//! segment per request.

use axum::extract::{Path, Query, State};
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::Json;
use chrono::Utc;
use serde_json::{json, Value};

use mast_core::error::CoreError;
use mast_core::segment::Segment;
use mast_core::types::DbId;
use mast_db::models::carousel::{CreateCard, CreateCarousel};
use mast_db::models::feature::CreateGridFeature;
use mast_db::repositories::{CarouselRepo, FeatureRepo, ScreenRepo};

use crate::error::{AppError, AppResult};
use crate::query::SegmentParams;
use crate::render::render_feature;
use crate::state::AppState;

const CACHE_CONTROL_VALUE: &str = "public, max-age=60";

/// GET /api/v1/cms/dashboard?userType=
///
/// Rendered dashboard JSON. Auto-provisions the dashboard screen on first
/// access so a fresh database serves an empty layout instead of a 404.
pub async fn get_dashboard(
    State(state): State<AppState>,
    Query(params): Query<SegmentParams>,
) -> AppResult<impl IntoResponse> {
    let segment = Segment::from_query(params.user_type.as_deref())?;
    let screen = ScreenRepo::ensure(
        &state.pool,
        "dashboard",
        "Dashboard",
        Some("Main dashboard screen"),
    )
    .await?;

    let components = render_components(&state, screen.id, segment).await?;
    let payload = json!({
        "screen": "dashboard",
        "userType": segment,
        "timestamp": Utc::now(),
        "components": components,
    });

    Ok(([(header::CACHE_CONTROL, CACHE_CONTROL_VALUE)], Json(payload)))
}

/// GET /api/v1/cms/screen/{slug}?userType=
///
/// Rendered JSON for any screen; unknown slugs are a 404.
pub async fn get_screen(
    State(state): State<AppState>,
    Path(slug): Path<String>,
    Query(params): Query<SegmentParams>,
) -> AppResult<impl IntoResponse> {
    let segment = Segment::from_query(params.user_type.as_deref())?;
    let screen = ScreenRepo::find_by_slug(&state.pool, &slug)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "screen",
            key: slug.clone(),
        }))?;

    let components = render_components(&state, screen.id, segment).await?;
    let payload = json!({
        "screen": slug,
        "name": screen.name,
        "userType": segment,
        "timestamp": Utc::now(),
        "components": components,
    });

    Ok(([(header::CACHE_CONTROL, CACHE_CONTROL_VALUE)], Json(payload)))
}

/// Render the active features of one screen for one segment, with
/// carousels eagerly attached.
async fn render_components(
    state: &AppState,
    screen_id: DbId,
    segment: Segment,
) -> AppResult<Vec<Value>> {
    let features = FeatureRepo::find_for_screen(&state.pool, screen_id, segment).await?;
    let carousel_ids: Vec<DbId> = features.iter().filter_map(|f| f.carousel_id).collect();
    let carousels = CarouselRepo::find_many_with_cards(&state.pool, &carousel_ids, true).await?;

    Ok(features
        .iter()
        .map(|feature| {
            let detail = feature.carousel_id.and_then(|id| carousels.get(&id));
            render_feature(&state.config.public_base_url, feature, detail)
        })
        .collect())
}

/// POST /api/v1/cms/seed
///
/// Seed demo content: one carousel plus one grid per segment on the
/// dashboard, with separate items for PRE_PAID and POST_PAID.
pub async fn seed_demo_data(State(state): State<AppState>) -> AppResult<impl IntoResponse> {
    let screen = ScreenRepo::ensure(
        &state.pool,
        "dashboard",
        "Dashboard",
        Some("Main dashboard screen"),
    )
    .await?;

    let pre_paid_carousel = CarouselRepo::create(
        &state.pool,
        &CreateCarousel {
            name: "Pre-Paid Offers".to_string(),
            description: Some("Special offers for pre-paid customers".to_string()),
            user_type: Some(Segment::PrePaid),
            auto_play: Some(true),
            interval_ms: Some(4000),
            cards: vec![
                demo_card(
                    "Top Up & Save!",
                    "Get 20% bonus on recharge",
                    "Recharge PKR 500 or more and get 20% extra balance",
                    Some(500.0),
                    "Recharge Now",
                    "/recharge",
                    "#1a365d",
                    "https://picsum.photos/800/400?random=1",
                ),
                demo_card(
                    "Data Bundle",
                    "10GB for 30 days",
                    "Unlimited streaming with our data bundle",
                    Some(999.0),
                    "Subscribe",
                    "/bundles/data",
                    "#2d3748",
                    "https://picsum.photos/800/400?random=2",
                ),
            ],
        },
    )
    .await?;

    let post_paid_carousel = CarouselRepo::create(
        &state.pool,
        &CreateCarousel {
            name: "Post-Paid Offers".to_string(),
            description: Some("Exclusive offers for post-paid customers".to_string()),
            user_type: Some(Segment::PostPaid),
            auto_play: Some(true),
            interval_ms: Some(5000),
            cards: vec![
                demo_card(
                    "Upgrade Your Plan",
                    "Get unlimited calls",
                    "Switch to our Premium plan and enjoy unlimited calls",
                    Some(2999.0),
                    "Upgrade",
                    "/plans/upgrade",
                    "#744210",
                    "https://picsum.photos/800/400?random=3",
                ),
                demo_card(
                    "Pay Your Bill",
                    "Easy online payment",
                    "Pay your bill online and get 5% cashback",
                    None,
                    "Pay Now",
                    "/bill/pay",
                    "#22543d",
                    "https://picsum.photos/800/400?random=4",
                ),
            ],
        },
    )
    .await?;

    let features = [
        CreateGridFeature {
            title: "Pre-Paid Special Offers".to_string(),
            component_type: "carousel".to_string(),
            sort_order: Some(0),
            config: Some(json!({})),
            user_type: Some(Segment::PrePaid),
            screen_id: Some(screen.id),
            carousel_id: Some(pre_paid_carousel.carousel.id),
        },
        CreateGridFeature {
            title: "Quick Recharge".to_string(),
            component_type: "grid".to_string(),
            sort_order: Some(1),
            config: Some(json!({
                "columns": 3,
                "gridItems": [
                    { "id": "1", "title": "PKR 100", "subtitle": "Basic", "ctaUrl": "/recharge/100" },
                    { "id": "2", "title": "PKR 500", "subtitle": "Popular", "ctaUrl": "/recharge/500" },
                    { "id": "3", "title": "PKR 1000", "subtitle": "Value", "ctaUrl": "/recharge/1000" },
                ],
            })),
            user_type: Some(Segment::PrePaid),
            screen_id: Some(screen.id),
            carousel_id: None,
        },
        CreateGridFeature {
            title: "Post-Paid Exclusive".to_string(),
            component_type: "carousel".to_string(),
            sort_order: Some(0),
            config: Some(json!({})),
            user_type: Some(Segment::PostPaid),
            screen_id: Some(screen.id),
            carousel_id: Some(post_paid_carousel.carousel.id),
        },
        CreateGridFeature {
            title: "Bill & Plans".to_string(),
            component_type: "grid".to_string(),
            sort_order: Some(1),
            config: Some(json!({
                "columns": 2,
                "gridItems": [
                    { "id": "1", "title": "View Bill", "subtitle": "Due: PKR 2,500", "ctaUrl": "/bill" },
                    { "id": "2", "title": "My Plan", "subtitle": "Unlimited Plus", "ctaUrl": "/plan" },
                ],
            })),
            user_type: Some(Segment::PostPaid),
            screen_id: Some(screen.id),
            carousel_id: None,
        },
    ];
    for dto in &features {
        FeatureRepo::create(&state.pool, dto).await?;
    }

    tracing::info!("Demo content seeded");

    Ok((
        StatusCode::CREATED,
        Json(json!({
            "message": "Demo data seeded successfully",
            "screens": 1,
            "carousels": 2,
            "gridFeatures": 4,
        })),
    ))
}

#[allow(clippy::too_many_arguments)]
fn demo_card(
    title: &str,
    subtitle: &str,
    description: &str,
    price: Option<f64>,
    cta_text: &str,
    cta_url: &str,
    background_color: &str,
    image_url: &str,
) -> CreateCard {
    CreateCard {
        sort_order: None,
        image_url: Some(image_url.to_string()),
        title: Some(title.to_string()),
        subtitle: Some(subtitle.to_string()),
        description: Some(description.to_string()),
        price,
        currency: price.map(|_| "PKR".to_string()),
        cta_text: Some(cta_text.to_string()),
        cta_action: Some("navigate".to_string()),
        cta_url: Some(cta_url.to_string()),
        background_color: Some(background_color.to_string()),
        text_color: Some("#ffffff".to_string()),
        metadata: None,
        user_type: None,
    }
}
