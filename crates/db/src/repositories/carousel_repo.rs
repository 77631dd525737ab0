//! Repository for the `carousels` and `carousel_cards` tables.
//!
//! Cards are fully owned by their carousel: the schema cascades card
//! deletion, and card-level operations are always carousel-scoped.

use std::collections::HashMap;

use sqlx::PgPool;

use mast_core::segment::Segment;
use mast_core::types::DbId;

use crate::models::carousel::{
    Carousel, CarouselCard, CarouselDetail, CreateCard, CreateCarousel, UpdateCard, UpdateCarousel,
};
use crate::models::feature::ReorderItem;
use crate::repositories::feature_repo::insert_card;

/// Column list for `carousels` queries.
pub(crate) const CAROUSEL_COLUMNS: &str = "\
    id, name, description, user_type, auto_play, interval_ms, is_active, \
    created_at, updated_at";

/// Column list for `carousel_cards` queries.
pub(crate) const CARD_COLUMNS: &str = "\
    id, carousel_id, sort_order, image_url, title, subtitle, description, \
    price, currency, cta_text, cta_action, cta_url, background_color, \
    text_color, user_type, metadata, is_active, created_at, updated_at";

/// Provides data access for carousels and their cards.
pub struct CarouselRepo;

impl CarouselRepo {
    /// Create a carousel, optionally with its initial cards, as one
    /// transaction. Card order is assigned densely from array position;
    /// cards inherit the carousel segment unless they carry their own.
    pub async fn create(pool: &PgPool, dto: &CreateCarousel) -> Result<CarouselDetail, sqlx::Error> {
        let segment = dto.user_type.unwrap_or(Segment::DEFAULT);
        let mut tx = pool.begin().await?;

        let query = format!(
            "INSERT INTO carousels (name, description, user_type, auto_play, interval_ms) \
             VALUES ($1, $2, $3, COALESCE($4, TRUE), COALESCE($5, 5000)) \
             RETURNING {CAROUSEL_COLUMNS}"
        );
        let carousel = sqlx::query_as::<_, Carousel>(&query)
            .bind(&dto.name)
            .bind(&dto.description)
            .bind(segment)
            .bind(dto.auto_play)
            .bind(dto.interval_ms)
            .fetch_one(&mut *tx)
            .await?;

        for (index, card) in dto.cards.iter().enumerate() {
            let card_segment = card.user_type.unwrap_or(segment);
            insert_card(&mut tx, carousel.id, index as i32, card_segment, card).await?;
        }

        tx.commit().await?;

        let cards = Self::cards_for(pool, carousel.id, false).await?;
        Ok(CarouselDetail { carousel, cards })
    }

    /// List active carousels (optionally segment-filtered) with their
    /// active cards attached.
    pub async fn list(
        pool: &PgPool,
        segment: Option<Segment>,
    ) -> Result<Vec<CarouselDetail>, sqlx::Error> {
        let query = format!(
            "SELECT {CAROUSEL_COLUMNS} FROM carousels \
             WHERE is_active AND ($1::user_type IS NULL OR user_type = $1) \
             ORDER BY id"
        );
        let carousels = sqlx::query_as::<_, Carousel>(&query)
            .bind(segment)
            .fetch_all(pool)
            .await?;

        let ids: Vec<DbId> = carousels.iter().map(|c| c.id).collect();
        let mut cards_by_carousel = Self::cards_for_many(pool, &ids, true).await?;

        Ok(carousels
            .into_iter()
            .map(|carousel| {
                let cards = cards_by_carousel.remove(&carousel.id).unwrap_or_default();
                CarouselDetail { carousel, cards }
            })
            .collect())
    }

    /// Find a carousel with all of its cards (inactive included, admin
    /// view), cards in ascending order.
    pub async fn find_with_cards(
        pool: &PgPool,
        id: DbId,
    ) -> Result<Option<CarouselDetail>, sqlx::Error> {
        let query = format!("SELECT {CAROUSEL_COLUMNS} FROM carousels WHERE id = $1");
        let Some(carousel) = sqlx::query_as::<_, Carousel>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await?
        else {
            return Ok(None);
        };
        let cards = Self::cards_for(pool, id, false).await?;
        Ok(Some(CarouselDetail { carousel, cards }))
    }

    /// Fetch cards for many carousels at once, grouped by carousel id.
    /// Used to eagerly attach carousels when rendering or listing
    /// features.
    pub async fn cards_for_many(
        pool: &PgPool,
        carousel_ids: &[DbId],
        active_only: bool,
    ) -> Result<HashMap<DbId, Vec<CarouselCard>>, sqlx::Error> {
        if carousel_ids.is_empty() {
            return Ok(HashMap::new());
        }
        let query = format!(
            "SELECT {CARD_COLUMNS} FROM carousel_cards \
             WHERE carousel_id = ANY($1) AND ($2 = FALSE OR is_active) \
             ORDER BY carousel_id, sort_order ASC, id ASC"
        );
        let cards = sqlx::query_as::<_, CarouselCard>(&query)
            .bind(carousel_ids)
            .bind(active_only)
            .fetch_all(pool)
            .await?;

        let mut grouped: HashMap<DbId, Vec<CarouselCard>> = HashMap::new();
        for card in cards {
            grouped.entry(card.carousel_id).or_default().push(card);
        }
        Ok(grouped)
    }

    /// Fetch carousels with cards for the given ids, keyed by carousel id.
    pub async fn find_many_with_cards(
        pool: &PgPool,
        carousel_ids: &[DbId],
        active_cards_only: bool,
    ) -> Result<HashMap<DbId, CarouselDetail>, sqlx::Error> {
        if carousel_ids.is_empty() {
            return Ok(HashMap::new());
        }
        let query = format!("SELECT {CAROUSEL_COLUMNS} FROM carousels WHERE id = ANY($1)");
        let carousels = sqlx::query_as::<_, Carousel>(&query)
            .bind(carousel_ids)
            .fetch_all(pool)
            .await?;

        let mut cards_by_carousel =
            Self::cards_for_many(pool, carousel_ids, active_cards_only).await?;

        Ok(carousels
            .into_iter()
            .map(|carousel| {
                let cards = cards_by_carousel.remove(&carousel.id).unwrap_or_default();
                (carousel.id, CarouselDetail { carousel, cards })
            })
            .collect())
    }

    /// Cards of one carousel in ascending order.
    pub async fn cards_for(
        pool: &PgPool,
        carousel_id: DbId,
        active_only: bool,
    ) -> Result<Vec<CarouselCard>, sqlx::Error> {
        let query = format!(
            "SELECT {CARD_COLUMNS} FROM carousel_cards \
             WHERE carousel_id = $1 AND ($2 = FALSE OR is_active) \
             ORDER BY sort_order ASC, id ASC"
        );
        sqlx::query_as::<_, CarouselCard>(&query)
            .bind(carousel_id)
            .bind(active_only)
            .fetch_all(pool)
            .await
    }

    /// Partially update a carousel.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        dto: &UpdateCarousel,
    ) -> Result<Option<Carousel>, sqlx::Error> {
        let query = format!(
            "UPDATE carousels SET \
                 name        = COALESCE($2, name), \
                 description = COALESCE($3, description), \
                 user_type   = COALESCE($4, user_type), \
                 auto_play   = COALESCE($5, auto_play), \
                 interval_ms = COALESCE($6, interval_ms), \
                 is_active   = COALESCE($7, is_active), \
                 updated_at  = now() \
             WHERE id = $1 \
             RETURNING {CAROUSEL_COLUMNS}"
        );
        sqlx::query_as::<_, Carousel>(&query)
            .bind(id)
            .bind(&dto.name)
            .bind(&dto.description)
            .bind(dto.user_type)
            .bind(dto.auto_play)
            .bind(dto.interval_ms)
            .bind(dto.is_active)
            .fetch_optional(pool)
            .await
    }

    /// Delete a carousel (cards cascade).
    ///
    /// Returns `true` if a row was deleted.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM carousels WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Append a card to a carousel.
    pub async fn add_card(
        pool: &PgPool,
        carousel_id: DbId,
        dto: &CreateCard,
    ) -> Result<CarouselCard, sqlx::Error> {
        let query = format!(
            "INSERT INTO carousel_cards \
                 (carousel_id, sort_order, image_url, title, subtitle, description, price, \
                  currency, cta_text, cta_action, cta_url, background_color, text_color, \
                  user_type, metadata) \
             VALUES ($1, COALESCE($2, 0), $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, \
                     COALESCE($14, 'PRE_PAID'::user_type), $15) \
             RETURNING {CARD_COLUMNS}"
        );
        sqlx::query_as::<_, CarouselCard>(&query)
            .bind(carousel_id)
            .bind(dto.sort_order)
            .bind(&dto.image_url)
            .bind(&dto.title)
            .bind(&dto.subtitle)
            .bind(&dto.description)
            .bind(dto.price)
            .bind(&dto.currency)
            .bind(&dto.cta_text)
            .bind(&dto.cta_action)
            .bind(&dto.cta_url)
            .bind(&dto.background_color)
            .bind(&dto.text_color)
            .bind(dto.user_type)
            .bind(&dto.metadata)
            .fetch_one(pool)
            .await
    }

    /// Partially update a card.
    pub async fn update_card(
        pool: &PgPool,
        card_id: DbId,
        dto: &UpdateCard,
    ) -> Result<Option<CarouselCard>, sqlx::Error> {
        let query = format!(
            "UPDATE carousel_cards SET \
                 sort_order       = COALESCE($2, sort_order), \
                 image_url        = COALESCE($3, image_url), \
                 title            = COALESCE($4, title), \
                 subtitle         = COALESCE($5, subtitle), \
                 description      = COALESCE($6, description), \
                 price            = COALESCE($7, price), \
                 currency         = COALESCE($8, currency), \
                 cta_text         = COALESCE($9, cta_text), \
                 cta_action       = COALESCE($10, cta_action), \
                 cta_url          = COALESCE($11, cta_url), \
                 background_color = COALESCE($12, background_color), \
                 text_color       = COALESCE($13, text_color), \
                 user_type        = COALESCE($14, user_type), \
                 metadata         = COALESCE($15, metadata), \
                 is_active        = COALESCE($16, is_active), \
                 updated_at       = now() \
             WHERE id = $1 \
             RETURNING {CARD_COLUMNS}"
        );
        sqlx::query_as::<_, CarouselCard>(&query)
            .bind(card_id)
            .bind(dto.sort_order)
            .bind(&dto.image_url)
            .bind(&dto.title)
            .bind(&dto.subtitle)
            .bind(&dto.description)
            .bind(dto.price)
            .bind(&dto.currency)
            .bind(&dto.cta_text)
            .bind(&dto.cta_action)
            .bind(&dto.cta_url)
            .bind(&dto.background_color)
            .bind(&dto.text_color)
            .bind(dto.user_type)
            .bind(&dto.metadata)
            .bind(dto.is_active)
            .fetch_optional(pool)
            .await
    }

    /// Delete a card.
    ///
    /// Returns `true` if a row was deleted.
    pub async fn delete_card(pool: &PgPool, card_id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM carousel_cards WHERE id = $1")
            .bind(card_id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Apply a batch of card order updates as a single transaction.
    ///
    /// All-or-nothing, like feature reordering. Updates are scoped to the
    /// given carousel, so an id belonging to another carousel rolls the
    /// batch back.
    pub async fn reorder_cards(
        pool: &PgPool,
        carousel_id: DbId,
        items: &[ReorderItem],
    ) -> Result<(), sqlx::Error> {
        let mut tx = pool.begin().await?;
        for item in items {
            let result = sqlx::query(
                "UPDATE carousel_cards SET sort_order = $2, updated_at = now() \
                 WHERE id = $1 AND carousel_id = $3",
            )
            .bind(item.id)
            .bind(item.order)
            .bind(carousel_id)
            .execute(&mut *tx)
            .await?;
            if result.rows_affected() == 0 {
                return Err(sqlx::Error::RowNotFound);
            }
        }
        tx.commit().await
    }
}
