//! Service catalog model and DTOs.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use seekr_core::types::{DbId, Timestamp};

/// A row from the `service_catalog` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct ServiceCatalogEntry {
    pub id: DbId,
    pub name: String,
    pub slug: String,
    pub category: String,
    pub provider: String,
    pub description: Option<String>,
    pub default_config: serde_json::Value,
    pub is_active: bool,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for creating a catalog entry.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateServiceCatalogEntry {
    pub name: String,
    pub slug: String,
    pub category: String,
    pub provider: String,
    pub description: Option<String>,
    pub default_config: Option<serde_json::Value>,
    pub is_active: Option<bool>,
}

/// DTO for a bulk catalog update. `id` selects the row; `None` fields are
/// left unchanged.
#[derive(Debug, Clone, Deserialize)]
pub struct UpdateServiceCatalogEntry {
    pub id: DbId,
    pub name: Option<String>,
    pub slug: Option<String>,
    pub category: Option<String>,
    pub provider: Option<String>,
    pub description: Option<String>,
    pub default_config: Option<serde_json::Value>,
    pub is_active: Option<bool>,
}
