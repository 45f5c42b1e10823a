//! Abstract store interface for the catalog and its collaborator
//! collections. The core talks to these traits only; `memory` and
//! `postgres` provide the two backends.

pub mod memory;
pub mod models;
pub mod postgres;

use async_trait::async_trait;
use thiserror::Error;
use uuid::Uuid;

use crate::catalog::product::{Product, ProductDraft};
use crate::catalog::query::{ProductFilter, Slice};

use models::{OrderVolume, RoleCount, Subcategory, SubcategoryProductCount};

/// Errors from the persistence layer. These are opaque to API clients;
/// the HTTP layer logs the detail and answers with a generic 500.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Query error: {0}")]
    Query(String),

    #[error(transparent)]
    Sqlx(#[from] sqlx::Error),

    #[error(transparent)]
    Serialization(#[from] serde_json::Error),
}

/// Product and taxonomy reads/writes.
#[async_trait]
pub trait CatalogStore: Send + Sync {
    async fn ping(&self) -> Result<(), StoreError>;

    /// Persists a draft, generating the id and timestamps.
    async fn insert_product(&self, draft: ProductDraft) -> Result<Product, StoreError>;

    async fn product_by_id(&self, id: Uuid) -> Result<Option<Product>, StoreError>;

    /// Replaces the stored record and refreshes `updated_at`.
    async fn save_product(&self, product: Product) -> Result<Product, StoreError>;

    /// Returns false when the id did not resolve.
    async fn delete_product(&self, id: Uuid) -> Result<bool, StoreError>;

    /// Filtered window over the collection, newest first with ties
    /// broken by descending id.
    async fn select_products(
        &self,
        filter: &ProductFilter,
        slice: Slice,
    ) -> Result<Vec<Product>, StoreError>;

    async fn count_products(&self, filter: &ProductFilter) -> Result<u64, StoreError>;

    async fn subcategory_by_id(&self, id: Uuid) -> Result<Option<Subcategory>, StoreError>;

    async fn subcategories_by_ids(&self, ids: &[Uuid]) -> Result<Vec<Subcategory>, StoreError>;

    async fn count_categories(&self) -> Result<u64, StoreError>;

    /// Product counts grouped by subcategory with the display name
    /// resolved by left join: a product whose subcategory is gone keeps
    /// its row with a null name. Ordered by count descending, then name.
    async fn products_per_subcategory(&self) -> Result<Vec<SubcategoryProductCount>, StoreError>;
}

/// User collection reads for analytics.
#[async_trait]
pub trait UserStore: Send + Sync {
    async fn count_users(&self) -> Result<u64, StoreError>;

    async fn count_active_users(&self) -> Result<u64, StoreError>;

    async fn count_users_with_role(&self, role: &str) -> Result<u64, StoreError>;

    /// `{role, count}` histogram, ordered by count descending, then role.
    async fn users_per_role(&self) -> Result<Vec<RoleCount>, StoreError>;
}

/// Order collection reads for analytics.
#[async_trait]
pub trait OrderStore: Send + Sync {
    async fn count_orders(&self) -> Result<u64, StoreError>;

    /// Count plus revenue sum; averaging stays in the aggregator so the
    /// empty-collection case is handled in one place.
    async fn order_volume(&self) -> Result<OrderVolume, StoreError>;
}
