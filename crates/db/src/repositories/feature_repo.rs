//! Repository for the `grid_features` table.
//!
//! Deleting a feature does NOT remove its carousel -- the feature holds
//! the foreign key, so callers that own the cascade (the reconciler, the
//! layout save path) delete the feature first and the carousel second,
//! inside their own transaction.

use sqlx::{PgPool, Postgres, Transaction};

use mast_core::segment::Segment;
use mast_core::types::DbId;

use crate::models::carousel::CreateCard;
use crate::models::feature::{
    CreateFeatureWithCarousel, CreateGridFeature, FeatureFilter, GridFeature, ReorderItem,
    UpdateGridFeature,
};

/// Column list for `grid_features` queries.
pub(crate) const FEATURE_COLUMNS: &str = "\
    id, screen_id, title, component_type, sort_order, user_type, \
    is_active, config, carousel_id, created_at, updated_at";

/// Provides data access for grid features.
pub struct FeatureRepo;

impl FeatureRepo {
    /// Create a single feature.
    ///
    /// Absent `userType` defaults to PRE_PAID (there is no ALL option);
    /// absent `order` defaults to 0; absent `config` defaults to `{}`.
    pub async fn create(pool: &PgPool, dto: &CreateGridFeature) -> Result<GridFeature, sqlx::Error> {
        let query = format!(
            "INSERT INTO grid_features \
                 (screen_id, title, component_type, sort_order, user_type, config, carousel_id) \
             VALUES ($1, $2, $3, COALESCE($4, 0), COALESCE($5, 'PRE_PAID'::user_type), \
                     COALESCE($6, '{{}}'::jsonb), $7) \
             RETURNING {FEATURE_COLUMNS}"
        );
        sqlx::query_as::<_, GridFeature>(&query)
            .bind(dto.screen_id)
            .bind(&dto.title)
            .bind(&dto.component_type)
            .bind(dto.sort_order)
            .bind(dto.user_type)
            .bind(&dto.config)
            .bind(dto.carousel_id)
            .fetch_one(pool)
            .await
    }

    /// Create a carousel-type feature plus its carousel and cards as one
    /// transaction: either the whole aggregate exists afterwards or none
    /// of it does.
    pub async fn create_with_carousel(
        pool: &PgPool,
        dto: &CreateFeatureWithCarousel,
    ) -> Result<GridFeature, sqlx::Error> {
        let segment = dto.user_type.unwrap_or(Segment::DEFAULT);
        let mut tx = pool.begin().await?;

        let carousel_id: DbId = sqlx::query_scalar(
            "INSERT INTO carousels (name, description, user_type, auto_play, interval_ms) \
             VALUES ($1, $2, $3, COALESCE($4, TRUE), COALESCE($5, 5000)) \
             RETURNING id",
        )
        .bind(&dto.carousel.name)
        .bind(&dto.carousel.description)
        .bind(segment)
        .bind(dto.carousel.auto_play)
        .bind(dto.carousel.interval_ms)
        .fetch_one(&mut *tx)
        .await?;

        for (index, card) in dto.carousel.cards.iter().enumerate() {
            // Cards inherit the parent segment unless they carry their own.
            let card_segment = card.user_type.unwrap_or(segment);
            insert_card(&mut tx, carousel_id, index as i32, card_segment, card).await?;
        }

        let query = format!(
            "INSERT INTO grid_features \
                 (screen_id, title, component_type, sort_order, user_type, config, carousel_id) \
             VALUES ($1, $2, 'carousel', COALESCE($3, 0), $4, COALESCE($5, '{{}}'::jsonb), $6) \
             RETURNING {FEATURE_COLUMNS}"
        );
        let feature = sqlx::query_as::<_, GridFeature>(&query)
            .bind(dto.screen_id)
            .bind(&dto.title)
            .bind(dto.sort_order)
            .bind(segment)
            .bind(&dto.config)
            .bind(carousel_id)
            .fetch_one(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(feature)
    }

    /// Find a single feature by its ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<GridFeature>, sqlx::Error> {
        let query = format!("SELECT {FEATURE_COLUMNS} FROM grid_features WHERE id = $1");
        sqlx::query_as::<_, GridFeature>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List features with optional segment/screen filters, ordered by
    /// `sort_order`. Inactive rows appear only when requested (admin
    /// mode).
    pub async fn find_all(
        pool: &PgPool,
        filter: FeatureFilter,
    ) -> Result<Vec<GridFeature>, sqlx::Error> {
        let query = format!(
            "SELECT {FEATURE_COLUMNS} FROM grid_features \
             WHERE ($1::user_type IS NULL OR user_type = $1) \
               AND ($2::bigint IS NULL OR screen_id = $2) \
               AND ($3 OR is_active) \
             ORDER BY sort_order ASC, id ASC"
        );
        sqlx::query_as::<_, GridFeature>(&query)
            .bind(filter.user_type)
            .bind(filter.screen_id)
            .bind(filter.include_inactive)
            .fetch_all(pool)
            .await
    }

    /// Active features for one screen and one segment, in render order.
    /// Exact segment match only -- segments never mix.
    pub async fn find_for_screen(
        pool: &PgPool,
        screen_id: DbId,
        segment: Segment,
    ) -> Result<Vec<GridFeature>, sqlx::Error> {
        let query = format!(
            "SELECT {FEATURE_COLUMNS} FROM grid_features \
             WHERE screen_id = $1 AND user_type = $2 AND is_active \
             ORDER BY sort_order ASC, id ASC"
        );
        sqlx::query_as::<_, GridFeature>(&query)
            .bind(screen_id)
            .bind(segment)
            .fetch_all(pool)
            .await
    }

    /// Partially update a feature.
    ///
    /// Uses `COALESCE` so only provided fields are changed.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        dto: &UpdateGridFeature,
    ) -> Result<Option<GridFeature>, sqlx::Error> {
        let query = format!(
            "UPDATE grid_features SET \
                 title          = COALESCE($2, title), \
                 component_type = COALESCE($3, component_type), \
                 sort_order     = COALESCE($4, sort_order), \
                 user_type      = COALESCE($5, user_type), \
                 config         = COALESCE($6, config), \
                 screen_id      = COALESCE($7, screen_id), \
                 carousel_id    = COALESCE($8, carousel_id), \
                 is_active      = COALESCE($9, is_active), \
                 updated_at     = now() \
             WHERE id = $1 \
             RETURNING {FEATURE_COLUMNS}"
        );
        sqlx::query_as::<_, GridFeature>(&query)
            .bind(id)
            .bind(&dto.title)
            .bind(&dto.component_type)
            .bind(dto.sort_order)
            .bind(dto.user_type)
            .bind(&dto.config)
            .bind(dto.screen_id)
            .bind(dto.carousel_id)
            .bind(dto.is_active)
            .fetch_optional(pool)
            .await
    }

    /// Delete a feature row.
    ///
    /// Returns `true` if a row was deleted. Does not touch the feature's
    /// carousel; the caller owns that cleanup.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM grid_features WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Apply a batch of order updates as a single transaction.
    ///
    /// All-or-nothing: a missing id fails the whole batch and no orders
    /// change.
    pub async fn reorder(pool: &PgPool, items: &[ReorderItem]) -> Result<(), sqlx::Error> {
        let mut tx = pool.begin().await?;
        for item in items {
            let result =
                sqlx::query("UPDATE grid_features SET sort_order = $2, updated_at = now() WHERE id = $1")
                    .bind(item.id)
                    .bind(item.order)
                    .execute(&mut *tx)
                    .await?;
            if result.rows_affected() == 0 {
                return Err(sqlx::Error::RowNotFound);
            }
        }
        tx.commit().await
    }
}

/// Insert one card at a fixed position. Shared with the layout save path.
pub(crate) async fn insert_card(
    tx: &mut Transaction<'_, Postgres>,
    carousel_id: DbId,
    sort_order: i32,
    segment: Segment,
    card: &CreateCard,
) -> Result<DbId, sqlx::Error> {
    sqlx::query_scalar(
        "INSERT INTO carousel_cards \
             (carousel_id, sort_order, image_url, title, subtitle, description, price, \
              currency, cta_text, cta_action, cta_url, background_color, text_color, \
              user_type, metadata) \
         VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15) \
         RETURNING id",
    )
    .bind(carousel_id)
    .bind(sort_order)
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
    .fetch_one(&mut **tx)
    .await
}
