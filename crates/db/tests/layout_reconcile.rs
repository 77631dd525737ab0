//! Full-snapshot layout save scenarios.

use assert_matches::assert_matches;
use serde_json::json;
use sqlx::PgPool;

use mast_core::component::ComponentRef;
use mast_core::error::CoreError;
use mast_core::segment::Segment;
use mast_core::types::DbId;
use mast_db::models::feature::FeatureFilter;
use mast_db::models::layout::{LayoutCard, LayoutItem, LayoutSnapshot};
use mast_db::repositories::{CarouselRepo, FeatureRepo, LayoutRepo, ScreenRepo};

fn new_item(title: &str, ty: &str) -> LayoutItem {
    LayoutItem {
        id: ComponentRef::Pending(format!("temp-{title}")),
        is_new: true,
        title: title.to_string(),
        component_type: ty.to_string(),
        user_type: None,
        show: true,
        config: json!({}),
        carousel_id: None,
        auto_play: None,
        interval_ms: None,
        carousel_cards: vec![],
        original_card_ids: vec![],
    }
}

fn persisted_item(id: DbId, title: &str, ty: &str) -> LayoutItem {
    LayoutItem {
        id: ComponentRef::Persisted(id),
        is_new: false,
        ..new_item(title, ty)
    }
}

fn snapshot(pre: Vec<LayoutItem>, post: Vec<LayoutItem>) -> LayoutSnapshot {
    LayoutSnapshot {
        pre_paid_items: pre,
        post_paid_items: post,
        screen_id: None,
        expected_version: None,
    }
}

async fn dashboard_id(pool: &PgPool) -> DbId {
    ScreenRepo::find_by_slug(pool, "dashboard").await.unwrap().unwrap().id
}

#[sqlx::test]
async fn save_provisions_dashboard_and_creates_features(pool: PgPool) {
    let result = LayoutRepo::save(
        &pool,
        &snapshot(
            vec![new_item("Recharge", "grid"), new_item("News", "html")],
            vec![new_item("Bills", "list")],
        ),
    )
    .await
    .unwrap();
    assert_eq!(result.created, 3);
    assert_eq!(result.deleted, 0);
    assert_eq!(result.layout_version, 1);

    let screen_id = dashboard_id(&pool).await;
    let pre = FeatureRepo::find_for_screen(&pool, screen_id, Segment::PrePaid).await.unwrap();
    assert_eq!(pre.len(), 2);
    assert_eq!(pre[0].title, "Recharge");
    assert_eq!(pre[0].sort_order, 0);
    assert_eq!(pre[1].sort_order, 1);

    let post = FeatureRepo::find_for_screen(&pool, screen_id, Segment::PostPaid).await.unwrap();
    assert_eq!(post.len(), 1);
    assert_eq!(post[0].title, "Bills");
}

#[sqlx::test]
async fn resubmitting_loaded_state_updates_instead_of_duplicating(pool: PgPool) {
    LayoutRepo::save(&pool, &snapshot(vec![new_item("Recharge", "grid")], vec![]))
        .await
        .unwrap();
    let screen_id = dashboard_id(&pool).await;
    let stored = FeatureRepo::find_for_screen(&pool, screen_id, Segment::PrePaid).await.unwrap();
    let id = stored[0].id;

    let result = LayoutRepo::save(
        &pool,
        &snapshot(vec![persisted_item(id, "Recharge Plus", "grid")], vec![]),
    )
    .await
    .unwrap();
    assert_eq!(result.created, 0);
    assert_eq!(result.updated, 1);
    assert_eq!(result.deleted, 0);
    assert_eq!(result.layout_version, 2);

    let after = FeatureRepo::find_for_screen(&pool, screen_id, Segment::PrePaid).await.unwrap();
    assert_eq!(after.len(), 1);
    assert_eq!(after[0].id, id);
    assert_eq!(after[0].title, "Recharge Plus");
}

#[sqlx::test]
async fn list_partition_overrides_carried_segment(pool: PgPool) {
    let mut item = new_item("Bills", "list");
    item.user_type = Some(Segment::PrePaid);
    LayoutRepo::save(&pool, &snapshot(vec![], vec![item])).await.unwrap();

    let screen_id = dashboard_id(&pool).await;
    let post = FeatureRepo::find_for_screen(&pool, screen_id, Segment::PostPaid).await.unwrap();
    assert_eq!(post.len(), 1);
    assert!(FeatureRepo::find_for_screen(&pool, screen_id, Segment::PrePaid)
        .await
        .unwrap()
        .is_empty());
}

#[sqlx::test]
async fn omitted_features_are_deleted_with_their_carousels(pool: PgPool) {
    let mut carousel_item = new_item("Offers", "carousel");
    carousel_item.carousel_cards = vec![LayoutCard {
        title: Some("Pack".to_string()),
        ..Default::default()
    }];
    LayoutRepo::save(
        &pool,
        &snapshot(vec![new_item("Recharge", "grid"), carousel_item], vec![]),
    )
    .await
    .unwrap();

    let screen_id = dashboard_id(&pool).await;
    let stored = FeatureRepo::find_for_screen(&pool, screen_id, Segment::PrePaid).await.unwrap();
    let keep = stored.iter().find(|f| f.title == "Recharge").unwrap();
    let dropped = stored.iter().find(|f| f.title == "Offers").unwrap();
    let carousel_id = dropped.carousel_id.unwrap();

    let result = LayoutRepo::save(
        &pool,
        &snapshot(vec![persisted_item(keep.id, "Recharge", "grid")], vec![]),
    )
    .await
    .unwrap();
    assert_eq!(result.deleted, 1);

    assert!(CarouselRepo::find_with_cards(&pool, carousel_id).await.unwrap().is_none());
    let orphans: i64 =
        sqlx::query_scalar("SELECT count(*) FROM carousel_cards WHERE carousel_id = $1")
            .bind(carousel_id)
            .fetch_one(&pool)
            .await
            .unwrap();
    assert_eq!(orphans, 0);
}

#[sqlx::test]
async fn card_reconciliation_adds_updates_and_removes(pool: PgPool) {
    let mut item = new_item("Offers", "carousel");
    item.carousel_cards = vec![
        LayoutCard { title: Some("Keep".to_string()), ..Default::default() },
        LayoutCard { title: Some("Drop".to_string()), ..Default::default() },
    ];
    let first = LayoutRepo::save(&pool, &snapshot(vec![item], vec![])).await.unwrap();
    assert_eq!(first.cards_created, 2);

    let screen_id = dashboard_id(&pool).await;
    let feature = &FeatureRepo::find_for_screen(&pool, screen_id, Segment::PrePaid).await.unwrap()[0];
    let carousel_id = feature.carousel_id.unwrap();
    let cards = CarouselRepo::cards_for(&pool, carousel_id, false).await.unwrap();
    let keep_id = cards.iter().find(|c| c.title.as_deref() == Some("Keep")).unwrap().id;
    let drop_id = cards.iter().find(|c| c.title.as_deref() == Some("Drop")).unwrap().id;

    let mut item = persisted_item(feature.id, "Offers", "carousel");
    item.carousel_id = Some(carousel_id);
    item.original_card_ids = vec![keep_id, drop_id];
    item.carousel_cards = vec![
        LayoutCard {
            id: Some(ComponentRef::Persisted(keep_id)),
            title: Some("Keep Renamed".to_string()),
            ..Default::default()
        },
        LayoutCard {
            id: Some(ComponentRef::Pending("temp-new".to_string())),
            title: Some("Fresh".to_string()),
            ..Default::default()
        },
    ];
    let second = LayoutRepo::save(&pool, &snapshot(vec![item], vec![])).await.unwrap();
    assert_eq!(second.cards_updated, 1);
    assert_eq!(second.cards_created, 1);
    assert_eq!(second.cards_deleted, 1);

    let after = CarouselRepo::cards_for(&pool, carousel_id, false).await.unwrap();
    assert_eq!(after.len(), 2);
    assert_eq!(after[0].id, keep_id);
    assert_eq!(after[0].title.as_deref(), Some("Keep Renamed"));
    assert_eq!(after[0].sort_order, 0);
    assert_eq!(after[1].title.as_deref(), Some("Fresh"));
    assert_eq!(after[1].sort_order, 1);
}

#[sqlx::test]
async fn stale_expected_version_conflicts_before_writing(pool: PgPool) {
    LayoutRepo::save(&pool, &snapshot(vec![new_item("Recharge", "grid")], vec![]))
        .await
        .unwrap();

    let mut stale = snapshot(vec![], vec![]);
    stale.expected_version = Some(0);
    let err = LayoutRepo::save(&pool, &stale).await.unwrap_err();
    assert_matches!(err, CoreError::Conflict(_));

    // The conflicting save must not have deleted anything.
    let screen_id = dashboard_id(&pool).await;
    let features = FeatureRepo::find_for_screen(&pool, screen_id, Segment::PrePaid).await.unwrap();
    assert_eq!(features.len(), 1);

    let mut current = snapshot(vec![], vec![]);
    current.expected_version = Some(1);
    let result = LayoutRepo::save(&pool, &current).await.unwrap();
    assert_eq!(result.deleted, 1);
    assert_eq!(result.layout_version, 2);
}

#[sqlx::test]
async fn unknown_component_type_rejects_whole_save(pool: PgPool) {
    let err = LayoutRepo::save(
        &pool,
        &snapshot(vec![new_item("Recharge", "grid"), new_item("Weird", "hologram")], vec![]),
    )
    .await
    .unwrap_err();
    assert_matches!(err, CoreError::Validation(_));

    // Nothing from the failed save is visible.
    let screen = ScreenRepo::find_by_slug(&pool, "dashboard").await.unwrap();
    assert!(screen.is_none());
}

#[sqlx::test]
async fn snapshot_referencing_deleted_feature_is_skipped(pool: PgPool) {
    LayoutRepo::save(&pool, &snapshot(vec![new_item("Recharge", "grid")], vec![]))
        .await
        .unwrap();
    let screen_id = dashboard_id(&pool).await;
    let stored = FeatureRepo::find_for_screen(&pool, screen_id, Segment::PrePaid).await.unwrap();

    // Another session removes the feature out from under the client.
    FeatureRepo::delete(&pool, stored[0].id).await.unwrap();

    let result = LayoutRepo::save(
        &pool,
        &snapshot(vec![persisted_item(stored[0].id, "Recharge", "grid")], vec![]),
    )
    .await
    .unwrap();
    assert_eq!(result.created, 0);
    assert_eq!(result.updated, 0);
    let after = FeatureRepo::find_all(&pool, FeatureFilter::default()).await.unwrap();
    assert!(after.is_empty());
}

#[sqlx::test]
async fn new_flag_wins_over_a_carried_persisted_id(pool: PgPool) {
    LayoutRepo::save(&pool, &snapshot(vec![new_item("Recharge", "grid")], vec![]))
        .await
        .unwrap();
    let screen_id = dashboard_id(&pool).await;
    let old_id = FeatureRepo::find_for_screen(&pool, screen_id, Segment::PrePaid)
        .await
        .unwrap()[0]
        .id;

    // A client bug can flag an item new while still carrying its old id.
    // The old row must be replaced, not kept alongside a duplicate.
    let mut item = persisted_item(old_id, "Recharge", "grid");
    item.is_new = true;
    let result = LayoutRepo::save(&pool, &snapshot(vec![item], vec![])).await.unwrap();
    assert_eq!(result.deleted, 1);
    assert_eq!(result.created, 1);
    assert_eq!(result.updated, 0);

    let after = FeatureRepo::find_for_screen(&pool, screen_id, Segment::PrePaid).await.unwrap();
    assert_eq!(after.len(), 1);
    assert_ne!(after[0].id, old_id);
}

#[sqlx::test]
async fn changing_type_away_from_carousel_drops_the_carousel(pool: PgPool) {
    let mut item = new_item("Offers", "carousel");
    item.carousel_cards = vec![LayoutCard {
        title: Some("Pack".to_string()),
        ..Default::default()
    }];
    LayoutRepo::save(&pool, &snapshot(vec![item], vec![])).await.unwrap();

    let screen_id = dashboard_id(&pool).await;
    let feature = &FeatureRepo::find_for_screen(&pool, screen_id, Segment::PrePaid).await.unwrap()[0];
    let carousel_id = feature.carousel_id.unwrap();

    LayoutRepo::save(
        &pool,
        &snapshot(vec![persisted_item(feature.id, "Offers", "html")], vec![]),
    )
    .await
    .unwrap();

    let after = &FeatureRepo::find_for_screen(&pool, screen_id, Segment::PrePaid).await.unwrap()[0];
    assert_eq!(after.component_type, "html");
    assert_eq!(after.carousel_id, None);
    assert!(CarouselRepo::find_with_cards(&pool, carousel_id).await.unwrap().is_none());
    let orphans: i64 =
        sqlx::query_scalar("SELECT count(*) FROM carousel_cards WHERE carousel_id = $1")
            .bind(carousel_id)
            .fetch_one(&pool)
            .await
            .unwrap();
    assert_eq!(orphans, 0);
}

#[sqlx::test]
async fn save_targets_explicit_screen(pool: PgPool) {
    let screens = ScreenRepo::initialize_defaults(&pool).await.unwrap();
    let offers = screens.iter().find(|s| s.slug == "offers").unwrap();

    let mut snap = snapshot(vec![new_item("Offer Wall", "grid")], vec![]);
    snap.screen_id = Some(offers.id);
    LayoutRepo::save(&pool, &snap).await.unwrap();

    let placed = FeatureRepo::find_for_screen(&pool, offers.id, Segment::PrePaid).await.unwrap();
    assert_eq!(placed.len(), 1);

    let mut missing = snapshot(vec![], vec![]);
    missing.screen_id = Some(999_999);
    let err = LayoutRepo::save(&pool, &missing).await.unwrap_err();
    assert_matches!(err, CoreError::NotFound { entity: "screen", .. });
}
