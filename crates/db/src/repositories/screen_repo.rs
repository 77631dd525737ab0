//! Repository for the `screens` table.
//!
//! Screens are soft-deactivated, never hard-deleted in normal operation.
//! `ensure` upserts by slug so the dashboard screen can be provisioned on
//! first access.

use sqlx::PgPool;

use mast_core::types::DbId;

use crate::models::screen::{CreateScreen, Screen, UpdateScreen};

/// Column list for `screens` queries.
pub(crate) const SCREEN_COLUMNS: &str = "\
    id, slug, name, description, is_active, layout_version, \
    created_at, updated_at";

/// Default screens provisioned by `initialize_defaults`.
const DEFAULT_SCREENS: [(&str, &str, &str); 3] = [
    ("dashboard", "Dashboard", "Main dashboard screen"),
    ("home", "Home", "Home screen"),
    ("offers", "Offers", "Offers and promotions"),
];

/// Provides data access for app screens.
pub struct ScreenRepo;

impl ScreenRepo {
    /// Create a new screen.
    pub async fn create(pool: &PgPool, dto: &CreateScreen) -> Result<Screen, sqlx::Error> {
        let query = format!(
            "INSERT INTO screens (slug, name, description) \
             VALUES ($1, $2, $3) \
             RETURNING {SCREEN_COLUMNS}"
        );
        sqlx::query_as::<_, Screen>(&query)
            .bind(&dto.slug)
            .bind(&dto.name)
            .bind(&dto.description)
            .fetch_one(pool)
            .await
    }

    /// List screens, active only unless `include_inactive`.
    pub async fn list(pool: &PgPool, include_inactive: bool) -> Result<Vec<Screen>, sqlx::Error> {
        let query = format!(
            "SELECT {SCREEN_COLUMNS} FROM screens \
             WHERE ($1 OR is_active) ORDER BY slug"
        );
        sqlx::query_as::<_, Screen>(&query)
            .bind(include_inactive)
            .fetch_all(pool)
            .await
    }

    /// Find a screen by its ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Screen>, sqlx::Error> {
        let query = format!("SELECT {SCREEN_COLUMNS} FROM screens WHERE id = $1");
        sqlx::query_as::<_, Screen>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Find a screen by its unique slug.
    pub async fn find_by_slug(pool: &PgPool, slug: &str) -> Result<Option<Screen>, sqlx::Error> {
        let query = format!("SELECT {SCREEN_COLUMNS} FROM screens WHERE slug = $1");
        sqlx::query_as::<_, Screen>(&query)
            .bind(slug)
            .fetch_optional(pool)
            .await
    }

    /// Upsert a screen by slug, returning the existing row when present.
    pub async fn ensure(
        pool: &PgPool,
        slug: &str,
        name: &str,
        description: Option<&str>,
    ) -> Result<Screen, sqlx::Error> {
        // The no-op DO UPDATE makes RETURNING yield the existing row.
        let query = format!(
            "INSERT INTO screens (slug, name, description) \
             VALUES ($1, $2, $3) \
             ON CONFLICT (slug) DO UPDATE SET slug = EXCLUDED.slug \
             RETURNING {SCREEN_COLUMNS}"
        );
        sqlx::query_as::<_, Screen>(&query)
            .bind(slug)
            .bind(name)
            .bind(description)
            .fetch_one(pool)
            .await
    }

    /// Partially update a screen.
    ///
    /// Uses `COALESCE` so only provided fields are changed.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        dto: &UpdateScreen,
    ) -> Result<Option<Screen>, sqlx::Error> {
        let query = format!(
            "UPDATE screens SET \
                 slug        = COALESCE($2, slug), \
                 name        = COALESCE($3, name), \
                 description = COALESCE($4, description), \
                 is_active   = COALESCE($5, is_active), \
                 updated_at  = now() \
             WHERE id = $1 \
             RETURNING {SCREEN_COLUMNS}"
        );
        sqlx::query_as::<_, Screen>(&query)
            .bind(id)
            .bind(&dto.slug)
            .bind(&dto.name)
            .bind(&dto.description)
            .bind(dto.is_active)
            .fetch_optional(pool)
            .await
    }

    /// Soft-deactivate a screen.
    ///
    /// Returns `true` if a row was affected.
    pub async fn deactivate(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result =
            sqlx::query("UPDATE screens SET is_active = FALSE, updated_at = now() WHERE id = $1")
                .bind(id)
                .execute(pool)
                .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Provision the default screen set (idempotent), then list.
    pub async fn initialize_defaults(pool: &PgPool) -> Result<Vec<Screen>, sqlx::Error> {
        for (slug, name, description) in DEFAULT_SCREENS {
            Self::ensure(pool, slug, name, Some(description)).await?;
        }
        Self::list(pool, false).await
    }
}
