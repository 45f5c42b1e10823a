//! Collaborator records referenced by the catalog and read by analytics,
//! plus the row shapes of the aggregation queries.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Taxonomy node owned by the category-management service. The catalog
/// only reads these; products must reference an existing one.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct Subcategory {
    pub id: Uuid,
    pub name: String,
    /// Parent category display name, denormalized onto the record.
    pub category: Option<String>,
}

/// Platform user, read for analytics counts only.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: Uuid,
    pub name: String,
    pub role: String,
    pub is_active: bool,
}

/// Placed order, read for analytics aggregates only.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    pub id: Uuid,
    pub total_amount: Decimal,
    pub created_at: DateTime<Utc>,
}

/// Row of the per-subcategory product count aggregation. `subcategory`
/// is None when the referenced subcategory no longer exists.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SubcategoryProductCount {
    pub subcategory: Option<String>,
    pub product_count: u64,
}

/// Row of the users-per-role histogram.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RoleCount {
    pub role: String,
    pub count: u64,
}

/// Order collection totals.
#[derive(Debug, Clone, PartialEq)]
pub struct OrderVolume {
    pub count: u64,
    pub revenue: Decimal,
}
