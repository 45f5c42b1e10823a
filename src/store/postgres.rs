//! Postgres-backed store. Products live in a `products` table with
//! `jsonb` image and variation columns; subcategories, categories,
//! users and orders are the platform's existing tables.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::postgres::{PgPool, PgPoolOptions, PgRow};
use sqlx::types::Json;
use sqlx::{FromRow, QueryBuilder, Row};
use uuid::Uuid;

use crate::catalog::product::{Product, ProductDraft, Variation};
use crate::catalog::query::{ProductFilter, Slice};
use crate::config::CONFIG;

use super::models::{OrderVolume, RoleCount, Subcategory, SubcategoryProductCount};
use super::{CatalogStore, OrderStore, StoreError, UserStore};

pub struct PostgresStore {
    pool: PgPool,
}

impl PostgresStore {
    /// Connects with the configured pool limits.
    pub async fn connect(database_url: &str) -> Result<Self, StoreError> {
        let pool = PgPoolOptions::new()
            .max_connections(CONFIG.database.max_connections)
            .acquire_timeout(std::time::Duration::from_secs(
                CONFIG.database.acquire_timeout_secs,
            ))
            .connect(database_url)
            .await?;
        tracing::info!("created database pool");
        Ok(Self { pool })
    }

    pub fn with_pool(pool: PgPool) -> Self {
        Self { pool }
    }
}

const PRODUCT_COLUMNS: &str =
    "id, name, description, subcategory_id, images, variations, brand, is_active, created_at, updated_at";

#[derive(FromRow)]
struct ProductRow {
    id: Uuid,
    name: String,
    description: Option<String>,
    subcategory_id: Uuid,
    images: Json<Vec<String>>,
    variations: Json<Vec<Variation>>,
    brand: Option<String>,
    is_active: bool,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<ProductRow> for Product {
    fn from(row: ProductRow) -> Self {
        Product {
            id: row.id,
            name: row.name,
            description: row.description,
            subcategory: row.subcategory_id,
            images: row.images.0,
            variations: row.variations.0,
            brand: row.brand,
            is_active: row.is_active,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

/// Appends the filter's conditions to a query ending in `WHERE TRUE`.
/// Prices live inside the `variations` jsonb array; the range clause is
/// a single `EXISTS` so both bounds apply to the same variation.
fn push_filter(qb: &mut QueryBuilder<'_, sqlx::Postgres>, filter: &ProductFilter) {
    if filter.active_only {
        qb.push(" AND is_active = TRUE");
    }
    if let Some(subcategory) = filter.subcategory {
        qb.push(" AND subcategory_id = ").push_bind(subcategory);
    }
    if filter.min_price.is_some() || filter.max_price.is_some() {
        qb.push(" AND EXISTS (SELECT 1 FROM jsonb_array_elements(variations) AS v WHERE TRUE");
        if let Some(min) = filter.min_price {
            qb.push(" AND (v->>'price')::numeric >= ").push_bind(min);
        }
        if let Some(max) = filter.max_price {
            qb.push(" AND (v->>'price')::numeric <= ").push_bind(max);
        }
        qb.push(")");
    }
    if let Some(size) = filter.size {
        qb.push(" AND EXISTS (SELECT 1 FROM jsonb_array_elements(variations) AS v WHERE v->>'size' = ")
            .push_bind(size.as_str())
            .push(")");
    }
}

#[async_trait]
impl CatalogStore for PostgresStore {
    async fn ping(&self) -> Result<(), StoreError> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }

    async fn insert_product(&self, draft: ProductDraft) -> Result<Product, StoreError> {
        let row: ProductRow = sqlx::query_as(
            "INSERT INTO products \
             (id, name, description, subcategory_id, images, variations, brand, is_active, created_at, updated_at) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, NOW(), NOW()) \
             RETURNING id, name, description, subcategory_id, images, variations, brand, is_active, created_at, updated_at",
        )
        .bind(Uuid::new_v4())
        .bind(&draft.name)
        .bind(&draft.description)
        .bind(draft.subcategory)
        .bind(Json(&draft.images))
        .bind(Json(&draft.variations))
        .bind(&draft.brand)
        .bind(draft.is_active)
        .fetch_one(&self.pool)
        .await?;
        Ok(row.into())
    }

    async fn product_by_id(&self, id: Uuid) -> Result<Option<Product>, StoreError> {
        let row: Option<ProductRow> = sqlx::query_as(
            "SELECT id, name, description, subcategory_id, images, variations, brand, is_active, created_at, updated_at \
             FROM products WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row.map(Product::from))
    }

    async fn save_product(&self, product: Product) -> Result<Product, StoreError> {
        let row: ProductRow = sqlx::query_as(
            "UPDATE products SET \
             name = $2, description = $3, subcategory_id = $4, images = $5, variations = $6, \
             brand = $7, is_active = $8, updated_at = NOW() \
             WHERE id = $1 \
             RETURNING id, name, description, subcategory_id, images, variations, brand, is_active, created_at, updated_at",
        )
        .bind(product.id)
        .bind(&product.name)
        .bind(&product.description)
        .bind(product.subcategory)
        .bind(Json(&product.images))
        .bind(Json(&product.variations))
        .bind(&product.brand)
        .bind(product.is_active)
        .fetch_one(&self.pool)
        .await?;
        Ok(row.into())
    }

    async fn delete_product(&self, id: Uuid) -> Result<bool, StoreError> {
        let result = sqlx::query("DELETE FROM products WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn select_products(
        &self,
        filter: &ProductFilter,
        slice: Slice,
    ) -> Result<Vec<Product>, StoreError> {
        let mut qb = QueryBuilder::new(format!(
            "SELECT {PRODUCT_COLUMNS} FROM products WHERE TRUE"
        ));
        push_filter(&mut qb, filter);
        qb.push(" ORDER BY created_at DESC, id DESC");
        if let Some(limit) = slice.limit {
            qb.push(" LIMIT ").push_bind(limit as i64);
        }
        if slice.offset > 0 {
            qb.push(" OFFSET ").push_bind(slice.offset as i64);
        }
        if CONFIG.database.enable_query_logging {
            tracing::debug!(sql = qb.sql(), "selecting products");
        }

        let rows: Vec<ProductRow> = qb.build_query_as().fetch_all(&self.pool).await?;
        Ok(rows.into_iter().map(Product::from).collect())
    }

    async fn count_products(&self, filter: &ProductFilter) -> Result<u64, StoreError> {
        let mut qb = QueryBuilder::new("SELECT COUNT(*) FROM products WHERE TRUE");
        push_filter(&mut qb, filter);
        let count: i64 = qb.build_query_scalar().fetch_one(&self.pool).await?;
        Ok(count as u64)
    }

    async fn subcategory_by_id(&self, id: Uuid) -> Result<Option<Subcategory>, StoreError> {
        let subcategory: Option<Subcategory> =
            sqlx::query_as("SELECT id, name, category FROM subcategories WHERE id = $1")
                .bind(id)
                .fetch_optional(&self.pool)
                .await?;
        Ok(subcategory)
    }

    async fn subcategories_by_ids(&self, ids: &[Uuid]) -> Result<Vec<Subcategory>, StoreError> {
        if ids.is_empty() {
            return Ok(vec![]);
        }
        let subcategories: Vec<Subcategory> =
            sqlx::query_as("SELECT id, name, category FROM subcategories WHERE id = ANY($1)")
                .bind(ids)
                .fetch_all(&self.pool)
                .await?;
        Ok(subcategories)
    }

    async fn count_categories(&self) -> Result<u64, StoreError> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM categories")
            .fetch_one(&self.pool)
            .await?;
        Ok(count as u64)
    }

    async fn products_per_subcategory(&self) -> Result<Vec<SubcategoryProductCount>, StoreError> {
        let rows: Vec<PgRow> = sqlx::query(
            "SELECT s.name AS subcategory, COUNT(*) AS product_count \
             FROM products p \
             LEFT JOIN subcategories s ON s.id = p.subcategory_id \
             GROUP BY p.subcategory_id, s.name \
             ORDER BY COUNT(*) DESC, s.name ASC NULLS LAST",
        )
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter()
            .map(|row| {
                Ok(SubcategoryProductCount {
                    subcategory: row.try_get("subcategory")?,
                    product_count: row.try_get::<i64, _>("product_count")? as u64,
                })
            })
            .collect()
    }
}

#[async_trait]
impl UserStore for PostgresStore {
    async fn count_users(&self) -> Result<u64, StoreError> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM users")
            .fetch_one(&self.pool)
            .await?;
        Ok(count as u64)
    }

    async fn count_active_users(&self) -> Result<u64, StoreError> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM users WHERE is_active = TRUE")
            .fetch_one(&self.pool)
            .await?;
        Ok(count as u64)
    }

    async fn count_users_with_role(&self, role: &str) -> Result<u64, StoreError> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM users WHERE role = $1")
            .bind(role)
            .fetch_one(&self.pool)
            .await?;
        Ok(count as u64)
    }

    async fn users_per_role(&self) -> Result<Vec<RoleCount>, StoreError> {
        let rows: Vec<PgRow> = sqlx::query(
            "SELECT role, COUNT(*) AS count FROM users \
             GROUP BY role ORDER BY COUNT(*) DESC, role ASC",
        )
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter()
            .map(|row| {
                Ok(RoleCount {
                    role: row.try_get("role")?,
                    count: row.try_get::<i64, _>("count")? as u64,
                })
            })
            .collect()
    }
}

#[async_trait]
impl OrderStore for PostgresStore {
    async fn count_orders(&self) -> Result<u64, StoreError> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM orders")
            .fetch_one(&self.pool)
            .await?;
        Ok(count as u64)
    }

    async fn order_volume(&self) -> Result<OrderVolume, StoreError> {
        let row = sqlx::query(
            "SELECT COUNT(*) AS count, COALESCE(SUM(total_amount), 0) AS revenue FROM orders",
        )
        .fetch_one(&self.pool)
        .await?;
        Ok(OrderVolume {
            count: row.try_get::<i64, _>("count")? as u64,
            revenue: row.try_get::<Decimal, _>("revenue")?,
        })
    }
}
