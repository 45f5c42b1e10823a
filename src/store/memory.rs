//! In-memory store: the reference backend for tests and local
//! development. Filtering delegates to the core's reference predicate so
//! both backends share one semantics definition.

use std::collections::{HashMap, HashSet};

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use rust_decimal::Decimal;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::catalog::product::{Product, ProductDraft};
use crate::catalog::query::{ProductFilter, Slice};

use super::models::{Order, OrderVolume, RoleCount, Subcategory, SubcategoryProductCount, User};
use super::{CatalogStore, OrderStore, StoreError, UserStore};

#[derive(Default)]
pub struct MemoryStore {
    products: RwLock<HashMap<Uuid, Product>>,
    subcategories: RwLock<HashMap<Uuid, Subcategory>>,
    categories: RwLock<HashSet<String>>,
    users: RwLock<HashMap<Uuid, User>>,
    orders: RwLock<HashMap<Uuid, Order>>,
    last_created_at: RwLock<Option<DateTime<Utc>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Strictly increasing creation timestamps: two inserts in the same
    /// clock tick still order deterministically.
    async fn next_created_at(&self) -> DateTime<Utc> {
        let mut last = self.last_created_at.write().await;
        let mut now = Utc::now();
        if let Some(previous) = *last {
            if now <= previous {
                now = previous + Duration::microseconds(1);
            }
        }
        *last = Some(now);
        now
    }

    pub async fn seed_subcategory(&self, name: &str, category: Option<&str>) -> Subcategory {
        let subcategory = Subcategory {
            id: Uuid::new_v4(),
            name: name.to_string(),
            category: category.map(str::to_string),
        };
        if let Some(category) = &subcategory.category {
            self.categories.write().await.insert(category.clone());
        }
        self.subcategories
            .write()
            .await
            .insert(subcategory.id, subcategory.clone());
        subcategory
    }

    /// Drops a subcategory while leaving referencing products in place,
    /// mirroring a taxonomy deletion by the category-management service.
    pub async fn remove_subcategory(&self, id: Uuid) {
        self.subcategories.write().await.remove(&id);
    }

    pub async fn seed_user(&self, name: &str, role: &str, is_active: bool) -> User {
        let user = User {
            id: Uuid::new_v4(),
            name: name.to_string(),
            role: role.to_string(),
            is_active,
        };
        self.users.write().await.insert(user.id, user.clone());
        user
    }

    pub async fn seed_order(&self, total_amount: Decimal) -> Order {
        let order = Order {
            id: Uuid::new_v4(),
            total_amount,
            created_at: Utc::now(),
        };
        self.orders.write().await.insert(order.id, order.clone());
        order
    }
}

#[async_trait]
impl CatalogStore for MemoryStore {
    async fn ping(&self) -> Result<(), StoreError> {
        Ok(())
    }

    async fn insert_product(&self, draft: ProductDraft) -> Result<Product, StoreError> {
        let created_at = self.next_created_at().await;
        let product = Product {
            id: Uuid::new_v4(),
            name: draft.name,
            description: draft.description,
            subcategory: draft.subcategory,
            images: draft.images,
            variations: draft.variations,
            brand: draft.brand,
            is_active: draft.is_active,
            created_at,
            updated_at: created_at,
        };
        self.products
            .write()
            .await
            .insert(product.id, product.clone());
        Ok(product)
    }

    async fn product_by_id(&self, id: Uuid) -> Result<Option<Product>, StoreError> {
        Ok(self.products.read().await.get(&id).cloned())
    }

    async fn save_product(&self, mut product: Product) -> Result<Product, StoreError> {
        product.updated_at = Utc::now();
        self.products
            .write()
            .await
            .insert(product.id, product.clone());
        Ok(product)
    }

    async fn delete_product(&self, id: Uuid) -> Result<bool, StoreError> {
        Ok(self.products.write().await.remove(&id).is_some())
    }

    async fn select_products(
        &self,
        filter: &ProductFilter,
        slice: Slice,
    ) -> Result<Vec<Product>, StoreError> {
        let mut matches: Vec<Product> = self
            .products
            .read()
            .await
            .values()
            .filter(|p| filter.matches(p))
            .cloned()
            .collect();
        matches.sort_by(|a, b| {
            b.created_at
                .cmp(&a.created_at)
                .then_with(|| b.id.cmp(&a.id))
        });

        let offset = slice.offset.min(matches.len() as u64) as usize;
        let mut window = matches.split_off(offset);
        if let Some(limit) = slice.limit {
            window.truncate(limit as usize);
        }
        Ok(window)
    }

    async fn count_products(&self, filter: &ProductFilter) -> Result<u64, StoreError> {
        let count = self
            .products
            .read()
            .await
            .values()
            .filter(|p| filter.matches(p))
            .count();
        Ok(count as u64)
    }

    async fn subcategory_by_id(&self, id: Uuid) -> Result<Option<Subcategory>, StoreError> {
        Ok(self.subcategories.read().await.get(&id).cloned())
    }

    async fn subcategories_by_ids(&self, ids: &[Uuid]) -> Result<Vec<Subcategory>, StoreError> {
        let subcategories = self.subcategories.read().await;
        Ok(ids
            .iter()
            .filter_map(|id| subcategories.get(id).cloned())
            .collect())
    }

    async fn count_categories(&self) -> Result<u64, StoreError> {
        Ok(self.categories.read().await.len() as u64)
    }

    async fn products_per_subcategory(&self) -> Result<Vec<SubcategoryProductCount>, StoreError> {
        let mut per_subcategory: HashMap<Uuid, u64> = HashMap::new();
        for product in self.products.read().await.values() {
            *per_subcategory.entry(product.subcategory).or_default() += 1;
        }

        let subcategories = self.subcategories.read().await;
        let mut rows: Vec<SubcategoryProductCount> = per_subcategory
            .into_iter()
            .map(|(id, product_count)| SubcategoryProductCount {
                subcategory: subcategories.get(&id).map(|s| s.name.clone()),
                product_count,
            })
            .collect();
        rows.sort_by(|a, b| {
            b.product_count
                .cmp(&a.product_count)
                .then_with(|| match (&a.subcategory, &b.subcategory) {
                    (Some(left), Some(right)) => left.cmp(right),
                    (Some(_), None) => std::cmp::Ordering::Less,
                    (None, Some(_)) => std::cmp::Ordering::Greater,
                    (None, None) => std::cmp::Ordering::Equal,
                })
        });
        Ok(rows)
    }
}

#[async_trait]
impl UserStore for MemoryStore {
    async fn count_users(&self) -> Result<u64, StoreError> {
        Ok(self.users.read().await.len() as u64)
    }

    async fn count_active_users(&self) -> Result<u64, StoreError> {
        let count = self
            .users
            .read()
            .await
            .values()
            .filter(|u| u.is_active)
            .count();
        Ok(count as u64)
    }

    async fn count_users_with_role(&self, role: &str) -> Result<u64, StoreError> {
        let count = self
            .users
            .read()
            .await
            .values()
            .filter(|u| u.role == role)
            .count();
        Ok(count as u64)
    }

    async fn users_per_role(&self) -> Result<Vec<RoleCount>, StoreError> {
        let mut per_role: HashMap<String, u64> = HashMap::new();
        for user in self.users.read().await.values() {
            *per_role.entry(user.role.clone()).or_default() += 1;
        }
        let mut rows: Vec<RoleCount> = per_role
            .into_iter()
            .map(|(role, count)| RoleCount { role, count })
            .collect();
        rows.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.role.cmp(&b.role)));
        Ok(rows)
    }
}

#[async_trait]
impl OrderStore for MemoryStore {
    async fn count_orders(&self) -> Result<u64, StoreError> {
        Ok(self.orders.read().await.len() as u64)
    }

    async fn order_volume(&self) -> Result<OrderVolume, StoreError> {
        let orders = self.orders.read().await;
        let revenue = orders.values().map(|o| o.total_amount).sum();
        Ok(OrderVolume {
            count: orders.len() as u64,
            revenue,
        })
    }
}
