//! Repository for the `service_catalog` table.
//!
//! The bulk mutations isolate failures per input item: each call runs in one
//! transaction, invalid items are reported by input index, and the valid
//! subset commits. Only transaction-level failures roll everything back.

use sqlx::{PgPool, Postgres, Transaction};

use seekr_core::bulk::{BulkError, BulkOutcome, DeleteOutcome};
use seekr_core::types::DbId;

use crate::models::service_catalog::{
    CreateServiceCatalogEntry, ServiceCatalogEntry, UpdateServiceCatalogEntry,
};

const CATALOG_COLUMNS: &str = "\
    id, name, slug, category, provider, description, default_config, \
    is_active, created_at, updated_at";

/// Provides catalog CRUD for admins and lookups for resolution.
pub struct ServiceCatalogRepo;

impl ServiceCatalogRepo {
    pub async fn list(pool: &PgPool) -> Result<Vec<ServiceCatalogEntry>, sqlx::Error> {
        let query = format!("SELECT {CATALOG_COLUMNS} FROM service_catalog ORDER BY id");
        sqlx::query_as::<_, ServiceCatalogEntry>(&query)
            .fetch_all(pool)
            .await
    }

    pub async fn find_by_id(
        pool: &PgPool,
        id: DbId,
    ) -> Result<Option<ServiceCatalogEntry>, sqlx::Error> {
        let query = format!("SELECT {CATALOG_COLUMNS} FROM service_catalog WHERE id = $1");
        sqlx::query_as::<_, ServiceCatalogEntry>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Entries by id, for enriching api-key detail responses.
    pub async fn find_by_ids(
        pool: &PgPool,
        ids: &[DbId],
    ) -> Result<Vec<ServiceCatalogEntry>, sqlx::Error> {
        let query = format!(
            "SELECT {CATALOG_COLUMNS} FROM service_catalog WHERE id = ANY($1) ORDER BY id"
        );
        sqlx::query_as::<_, ServiceCatalogEntry>(&query)
            .bind(ids)
            .fetch_all(pool)
            .await
    }

    /// Create many entries. Duplicate slugs (against the table or earlier
    /// items in the same batch) are collected as indexed errors.
    pub async fn bulk_create(
        pool: &PgPool,
        items: &[CreateServiceCatalogEntry],
    ) -> Result<BulkOutcome<ServiceCatalogEntry>, sqlx::Error> {
        let mut outcome = BulkOutcome::default();
        let mut tx = pool.begin().await?;

        for (index, item) in items.iter().enumerate() {
            if Self::slug_taken(&mut tx, &item.slug, None).await? {
                outcome.errors.push(BulkError::new(
                    index,
                    format!("slug '{}' already exists", item.slug),
                ));
                continue;
            }

            let query = format!(
                "INSERT INTO service_catalog \
                     (name, slug, category, provider, description, default_config, is_active) \
                 VALUES ($1, $2, $3, $4, $5, COALESCE($6, '{{}}'::JSONB), COALESCE($7, TRUE)) \
                 RETURNING {CATALOG_COLUMNS}"
            );
            let entry = sqlx::query_as::<_, ServiceCatalogEntry>(&query)
                .bind(&item.name)
                .bind(&item.slug)
                .bind(&item.category)
                .bind(&item.provider)
                .bind(&item.description)
                .bind(&item.default_config)
                .bind(item.is_active)
                .fetch_one(&mut *tx)
                .await?;
            outcome.items.push(entry);
        }

        tx.commit().await?;
        Ok(outcome)
    }

    /// Update many entries by id. Missing ids and duplicate slugs are
    /// collected as indexed errors.
    pub async fn bulk_update(
        pool: &PgPool,
        items: &[UpdateServiceCatalogEntry],
    ) -> Result<BulkOutcome<ServiceCatalogEntry>, sqlx::Error> {
        let mut outcome = BulkOutcome::default();
        let mut tx = pool.begin().await?;

        for (index, item) in items.iter().enumerate() {
            if let Some(slug) = &item.slug {
                if Self::slug_taken(&mut tx, slug, Some(item.id)).await? {
                    outcome.errors.push(BulkError::new(
                        index,
                        format!("slug '{slug}' already exists"),
                    ));
                    continue;
                }
            }

            let query = format!(
                "UPDATE service_catalog SET \
                     name = COALESCE($2, name), \
                     slug = COALESCE($3, slug), \
                     category = COALESCE($4, category), \
                     provider = COALESCE($5, provider), \
                     description = COALESCE($6, description), \
                     default_config = COALESCE($7, default_config), \
                     is_active = COALESCE($8, is_active) \
                 WHERE id = $1 \
                 RETURNING {CATALOG_COLUMNS}"
            );
            let updated = sqlx::query_as::<_, ServiceCatalogEntry>(&query)
                .bind(item.id)
                .bind(&item.name)
                .bind(&item.slug)
                .bind(&item.category)
                .bind(&item.provider)
                .bind(&item.description)
                .bind(&item.default_config)
                .bind(item.is_active)
                .fetch_optional(&mut *tx)
                .await?;

            match updated {
                Some(entry) => outcome.items.push(entry),
                None => outcome.errors.push(BulkError::new(
                    index,
                    format!("service {} not found", item.id),
                )),
            }
        }

        tx.commit().await?;
        Ok(outcome)
    }

    /// Delete entries by id. Missing ids are reported, not errors; user
    /// credentials referencing deleted entries go via FK cascade.
    pub async fn delete_many(
        pool: &PgPool,
        ids: &[DbId],
    ) -> Result<DeleteOutcome, sqlx::Error> {
        let found: Vec<DbId> =
            sqlx::query_scalar("SELECT id FROM service_catalog WHERE id = ANY($1)")
                .bind(ids)
                .fetch_all(pool)
                .await?;

        let result = sqlx::query("DELETE FROM service_catalog WHERE id = ANY($1)")
            .bind(&found)
            .execute(pool)
            .await?;

        Ok(DeleteOutcome::from_requested(
            ids,
            &found,
            result.rows_affected(),
        ))
    }

    // ---- private helpers ----

    /// True when `slug` is already used by a row other than `exclude_id`.
    async fn slug_taken(
        tx: &mut Transaction<'_, Postgres>,
        slug: &str,
        exclude_id: Option<DbId>,
    ) -> Result<bool, sqlx::Error> {
        sqlx::query_scalar(
            "SELECT EXISTS( \
                 SELECT 1 FROM service_catalog \
                 WHERE slug = $1 AND ($2::BIGINT IS NULL OR id <> $2))",
        )
        .bind(slug)
        .bind(exclude_id)
        .fetch_one(&mut **tx)
        .await
    }
}
