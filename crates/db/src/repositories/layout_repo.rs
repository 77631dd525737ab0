//! Transactional apply of a full layout snapshot.
//!
//! The admin app submits the desired end state of one screen as two
//! segment-partitioned ordered lists. The whole reconciliation runs in a
//! single transaction holding a row lock on the screen, so concurrent
//! saves against the same screen serialize instead of interleaving.
//!
//! Pipeline: lock screen, check the optimistic version stamp, delete
//! features (and their carousels) the snapshot no longer contains, then
//! walk each list writing dense orders from array position, and finally
//! bump the screen's `layout_version`.

use std::collections::{HashMap, HashSet};

use sqlx::{FromRow, PgPool, Postgres, Transaction};

use mast_core::component::{validate_config, ComponentType};
use mast_core::error::CoreError;
use mast_core::reconcile::{stale_card_ids, stale_ids};
use mast_core::segment::Segment;
use mast_core::types::DbId;

use crate::models::carousel::CreateCard;
use crate::models::layout::{LayoutCard, LayoutItem, LayoutSnapshot, SaveLayoutResult};
use crate::repositories::feature_repo::insert_card;

/// The minimal persisted view of a feature the reconciler needs.
#[derive(Debug, FromRow)]
struct ExistingFeature {
    id: DbId,
    component_type: String,
    carousel_id: Option<DbId>,
}

/// Applies layout snapshots.
pub struct LayoutRepo;

impl LayoutRepo {
    /// Apply `snapshot` as the new layout of its target screen.
    ///
    /// Absent `screenId` targets the auto-provisioned dashboard screen.
    /// A present `expectedVersion` that does not match the stored
    /// `layout_version` rejects the save with [`CoreError::Conflict`]
    /// before anything is written.
    pub async fn save(
        pool: &PgPool,
        snapshot: &LayoutSnapshot,
    ) -> Result<SaveLayoutResult, CoreError> {
        let mut tx = pool.begin().await.map_err(CoreError::Database)?;
        let mut result = SaveLayoutResult::default();

        let (screen_id, stored_version) = lock_screen(&mut tx, snapshot.screen_id).await?;
        if let Some(expected) = snapshot.expected_version {
            if expected != stored_version {
                return Err(CoreError::Conflict(format!(
                    "layout version mismatch for screen {screen_id}: \
                     expected {expected}, found {stored_version}"
                )));
            }
        }

        let existing = load_existing(&mut tx, screen_id).await?;

        // Persisted ids carried by non-new items survive; the rest of the
        // screen's features are deleted, carousels included. An item
        // flagged new keeps none: its old row goes and it is re-inserted.
        let keep: HashSet<DbId> = snapshot
            .pre_paid_items
            .iter()
            .chain(&snapshot.post_paid_items)
            .filter(|item| !item.is_new)
            .filter_map(|item| item.id.persisted_id())
            .collect();
        let stale = stale_ids(existing.keys().copied(), &keep);
        for id in stale {
            delete_feature(&mut tx, &existing[&id]).await?;
            result.deleted += 1;
        }

        apply_items(
            &mut tx,
            screen_id,
            Segment::PrePaid,
            &snapshot.pre_paid_items,
            &existing,
            &mut result,
        )
        .await?;
        apply_items(
            &mut tx,
            screen_id,
            Segment::PostPaid,
            &snapshot.post_paid_items,
            &existing,
            &mut result,
        )
        .await?;

        result.layout_version = sqlx::query_scalar(
            "UPDATE screens SET layout_version = layout_version + 1, updated_at = now() \
             WHERE id = $1 RETURNING layout_version",
        )
        .bind(screen_id)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await.map_err(CoreError::Database)?;
        Ok(result)
    }
}

/// Lock the target screen row and return its id and stored version.
///
/// With no explicit target the dashboard screen is upserted; the
/// conflict-path no-op update still takes the row lock.
async fn lock_screen(
    tx: &mut Transaction<'_, Postgres>,
    screen_id: Option<DbId>,
) -> Result<(DbId, i64), CoreError> {
    match screen_id {
        Some(id) => sqlx::query_as::<_, (DbId, i64)>(
            "SELECT id, layout_version FROM screens WHERE id = $1 FOR UPDATE",
        )
        .bind(id)
        .fetch_optional(&mut **tx)
        .await?
        .ok_or_else(|| CoreError::NotFound {
            entity: "screen",
            key: id.to_string(),
        }),
        None => sqlx::query_as::<_, (DbId, i64)>(
            "INSERT INTO screens (slug, name, description) \
             VALUES ('dashboard', 'Dashboard', 'Main dashboard screen') \
             ON CONFLICT (slug) DO UPDATE SET slug = EXCLUDED.slug \
             RETURNING id, layout_version",
        )
        .fetch_one(&mut **tx)
        .await
        .map_err(CoreError::Database),
    }
}

/// Load the screen's current features, keyed by id.
async fn load_existing(
    tx: &mut Transaction<'_, Postgres>,
    screen_id: DbId,
) -> Result<HashMap<DbId, ExistingFeature>, CoreError> {
    let rows = sqlx::query_as::<_, ExistingFeature>(
        "SELECT id, component_type, carousel_id FROM grid_features \
         WHERE screen_id = $1 FOR UPDATE",
    )
    .bind(screen_id)
    .fetch_all(&mut **tx)
    .await?;
    Ok(rows.into_iter().map(|row| (row.id, row)).collect())
}

/// Delete one stale feature, then its carousel if it owned one.
///
/// The carousel delete tolerates zero rows: the carousel may already be
/// gone, and its cards cascade either way.
async fn delete_feature(
    tx: &mut Transaction<'_, Postgres>,
    feature: &ExistingFeature,
) -> Result<(), CoreError> {
    sqlx::query("DELETE FROM grid_features WHERE id = $1")
        .bind(feature.id)
        .execute(&mut **tx)
        .await?;

    if ComponentType::parse(&feature.component_type).is_carousel() {
        if let Some(carousel_id) = feature.carousel_id {
            let deleted = sqlx::query("DELETE FROM carousels WHERE id = $1")
                .bind(carousel_id)
                .execute(&mut **tx)
                .await?
                .rows_affected();
            if deleted == 0 {
                tracing::debug!(carousel_id, "carousel already removed");
            }
        }
    }
    Ok(())
}

/// Walk one segment's item list, creating or updating each feature with
/// its array index as the persisted order. The list partition decides the
/// segment; any `userType` carried on an item is ignored.
async fn apply_items(
    tx: &mut Transaction<'_, Postgres>,
    screen_id: DbId,
    segment: Segment,
    items: &[LayoutItem],
    existing: &HashMap<DbId, ExistingFeature>,
    result: &mut SaveLayoutResult,
) -> Result<(), CoreError> {
    for (index, item) in items.iter().enumerate() {
        let order = index as i32;
        let ty = ComponentType::parse(&item.component_type);
        if !ty.is_known() {
            return Err(CoreError::Validation(format!(
                "unknown component type '{}' for item '{}'",
                item.component_type, item.title
            )));
        }
        validate_config(&ty, &item.config)?;

        match item.id.persisted_id().filter(|_| !item.is_new) {
            None => {
                create_item(tx, screen_id, segment, order, &ty, item, result).await?;
            }
            Some(id) => {
                let Some(current) = existing.get(&id) else {
                    // Stale client state referencing a row another save
                    // already deleted. Skip rather than resurrect it.
                    tracing::warn!(feature_id = id, "snapshot references missing feature");
                    continue;
                };
                update_item(tx, segment, order, &ty, id, current, item, result).await?;
            }
        }
    }
    Ok(())
}

/// Insert a brand-new feature, creating its carousel and cards first when
/// the item is carousel-typed.
async fn create_item(
    tx: &mut Transaction<'_, Postgres>,
    screen_id: DbId,
    segment: Segment,
    order: i32,
    ty: &ComponentType,
    item: &LayoutItem,
    result: &mut SaveLayoutResult,
) -> Result<(), CoreError> {
    let carousel_id = if ty.is_carousel() {
        let carousel_id: DbId = sqlx::query_scalar(
            "INSERT INTO carousels (name, user_type, auto_play, interval_ms) \
             VALUES ($1, $2, COALESCE($3, TRUE), COALESCE($4, 5000)) \
             RETURNING id",
        )
        .bind(&item.title)
        .bind(segment)
        .bind(item.auto_play)
        .bind(item.interval_ms)
        .fetch_one(&mut **tx)
        .await?;

        for (card_index, card) in item.carousel_cards.iter().enumerate() {
            let dto = to_create_card(card);
            insert_card(tx, carousel_id, card_index as i32, segment, &dto).await?;
            result.cards_created += 1;
        }
        Some(carousel_id)
    } else {
        None
    };

    sqlx::query(
        "INSERT INTO grid_features \
             (screen_id, title, component_type, sort_order, user_type, is_active, config, \
              carousel_id) \
         VALUES ($1, $2, $3, $4, $5, $6, $7, $8)",
    )
    .bind(screen_id)
    .bind(&item.title)
    .bind(ty.as_str())
    .bind(order)
    .bind(segment)
    .bind(item.show)
    .bind(&item.config)
    .bind(carousel_id)
    .execute(&mut **tx)
    .await?;

    result.created += 1;
    Ok(())
}

/// Rewrite one persisted feature to match its snapshot item, then
/// reconcile its cards when it is carousel-typed.
async fn update_item(
    tx: &mut Transaction<'_, Postgres>,
    segment: Segment,
    order: i32,
    ty: &ComponentType,
    id: DbId,
    current: &ExistingFeature,
    item: &LayoutItem,
    result: &mut SaveLayoutResult,
) -> Result<(), CoreError> {
    let carousel_id = if ty.is_carousel() {
        item.carousel_id.or(current.carousel_id)
    } else {
        None
    };

    sqlx::query(
        "UPDATE grid_features SET \
             title = $2, component_type = $3, sort_order = $4, user_type = $5, \
             is_active = $6, config = $7, carousel_id = $8, updated_at = now() \
         WHERE id = $1",
    )
    .bind(id)
    .bind(&item.title)
    .bind(ty.as_str())
    .bind(order)
    .bind(segment)
    .bind(item.show)
    .bind(&item.config)
    .bind(carousel_id)
    .execute(&mut **tx)
    .await?;
    result.updated += 1;

    if ty.is_carousel() {
        if let Some(carousel_id) = carousel_id {
            reconcile_cards(tx, carousel_id, segment, item, result).await?;
        } else {
            tracing::warn!(feature_id = id, "carousel item without a carousel");
        }
    } else if ComponentType::parse(&current.component_type).is_carousel() {
        // The feature stopped being a carousel; drop the carousel it
        // owned (cards cascade) instead of leaving it orphaned.
        if let Some(old_carousel_id) = current.carousel_id {
            sqlx::query("DELETE FROM carousels WHERE id = $1")
                .bind(old_carousel_id)
                .execute(&mut **tx)
                .await?;
        }
    }
    Ok(())
}

/// Bring one carousel and its cards in line with the snapshot item.
async fn reconcile_cards(
    tx: &mut Transaction<'_, Postgres>,
    carousel_id: DbId,
    segment: Segment,
    item: &LayoutItem,
    result: &mut SaveLayoutResult,
) -> Result<(), CoreError> {
    sqlx::query(
        "UPDATE carousels SET \
             name = $2, user_type = $3, \
             auto_play = COALESCE($4, auto_play), \
             interval_ms = COALESCE($5, interval_ms), \
             updated_at = now() \
         WHERE id = $1",
    )
    .bind(carousel_id)
    .bind(&item.title)
    .bind(segment)
    .bind(item.auto_play)
    .bind(item.interval_ms)
    .execute(&mut **tx)
    .await?;

    let current_ids: Vec<DbId> = item
        .carousel_cards
        .iter()
        .filter_map(LayoutCard::persisted_id)
        .collect();
    for card_id in stale_card_ids(&item.original_card_ids, &current_ids) {
        let deleted = sqlx::query("DELETE FROM carousel_cards WHERE id = $1")
            .bind(card_id)
            .execute(&mut **tx)
            .await?
            .rows_affected();
        if deleted > 0 {
            result.cards_deleted += 1;
        } else {
            tracing::debug!(card_id, "card already removed");
        }
    }

    for (index, card) in item.carousel_cards.iter().enumerate() {
        let order = index as i32;
        match card.persisted_id() {
            Some(card_id) => {
                let updated = sqlx::query(
                    "UPDATE carousel_cards SET \
                         sort_order = $2, image_url = $3, title = $4, subtitle = $5, \
                         description = $6, price = $7, currency = $8, cta_text = $9, \
                         cta_action = $10, cta_url = $11, background_color = $12, \
                         text_color = $13, user_type = $14, metadata = COALESCE($15, metadata), \
                         updated_at = now() \
                     WHERE id = $1",
                )
                .bind(card_id)
                .bind(order)
                .bind(&card.image_url)
                .bind(&card.title)
                .bind(&card.subtitle)
                .bind(&card.description)
                .bind(card.price)
                .bind(&card.currency)
                .bind(&card.cta_text)
                .bind(&card.cta_action)
                .bind(&card.cta_url)
                .bind(&card.background_color)
                .bind(&card.text_color)
                .bind(segment)
                .bind(&card.metadata)
                .execute(&mut **tx)
                .await?
                .rows_affected();
                if updated > 0 {
                    result.cards_updated += 1;
                } else {
                    tracing::warn!(card_id, "snapshot references missing card");
                }
            }
            None => {
                let dto = to_create_card(card);
                insert_card(tx, carousel_id, order, segment, &dto).await?;
                result.cards_created += 1;
            }
        }
    }
    Ok(())
}

fn to_create_card(card: &LayoutCard) -> CreateCard {
    CreateCard {
        sort_order: None,
        image_url: card.image_url.clone(),
        title: card.title.clone(),
        subtitle: card.subtitle.clone(),
        description: card.description.clone(),
        price: card.price,
        currency: card.currency.clone(),
        cta_text: card.cta_text.clone(),
        cta_action: card.cta_action.clone(),
        cta_url: card.cta_url.clone(),
        background_color: card.background_color.clone(),
        text_color: card.text_color.clone(),
        metadata: card.metadata.clone(),
        user_type: None,
    }
}
