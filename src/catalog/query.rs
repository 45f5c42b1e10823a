//! Read side of the catalog: filter composition, pagination, and the
//! denormalized subcategory join.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use rust_decimal::Decimal;
use serde::Serialize;
use uuid::Uuid;

use crate::config::CONFIG;
use crate::store::models::Subcategory;
use crate::store::CatalogStore;

use super::product::{Product, Size};
use super::CatalogError;

/// Conjunctive filter over the product collection. Backend-neutral: the
/// in-memory store evaluates [`ProductFilter::matches`] directly and the
/// Postgres store compiles the same conditions to SQL.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProductFilter {
    pub subcategory: Option<Uuid>,
    pub min_price: Option<Decimal>,
    pub max_price: Option<Decimal>,
    pub size: Option<Size>,
    pub active_only: bool,
}

impl ProductFilter {
    /// Reference predicate defining the filter semantics. A price range
    /// matches only when one and the same variation satisfies both
    /// bounds.
    pub fn matches(&self, product: &Product) -> bool {
        if self.active_only && !product.is_active {
            return false;
        }
        if let Some(subcategory) = self.subcategory {
            if product.subcategory != subcategory {
                return false;
            }
        }
        if self.min_price.is_some() || self.max_price.is_some() {
            let in_range = product.variations.iter().any(|v| {
                self.min_price.map_or(true, |min| v.price >= min)
                    && self.max_price.map_or(true, |max| v.price <= max)
            });
            if !in_range {
                return false;
            }
        }
        if let Some(size) = self.size {
            if !product.variations.iter().any(|v| v.size == size) {
                return false;
            }
        }
        true
    }
}

/// Caller-facing filters for the public listing; `active_only` is
/// implied there and never exposed.
#[derive(Debug, Clone, Default)]
pub struct ListFilters {
    pub subcategory: Option<Uuid>,
    pub min_price: Option<Decimal>,
    pub max_price: Option<Decimal>,
    pub size: Option<Size>,
}

impl ListFilters {
    fn into_filter(self) -> ProductFilter {
        ProductFilter {
            subcategory: self.subcategory,
            min_price: self.min_price,
            max_price: self.max_price,
            size: self.size,
            active_only: true,
        }
    }
}

/// 1-based page request.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Page {
    pub number: u32,
    pub size: u32,
}

impl Default for Page {
    fn default() -> Self {
        Self {
            number: 1,
            size: CONFIG.pagination.default_page_size,
        }
    }
}

impl Page {
    /// Clamps the page number to 1 and caps the size at the configured
    /// maximum.
    pub fn new(number: u32, size: u32) -> Self {
        let max = CONFIG.pagination.max_page_size;
        let size = if size > max {
            tracing::warn!("page size {} exceeds max {}, capping to max", size, max);
            max
        } else {
            size.max(1)
        };
        Self {
            number: number.max(1),
            size,
        }
    }

    pub fn slice(&self) -> Slice {
        Slice {
            offset: (self.number as u64 - 1) * self.size as u64,
            limit: Some(self.size as u64),
        }
    }

    pub fn total_pages(&self, total: u64) -> u64 {
        total.div_ceil(self.size as u64)
    }
}

/// Offset/limit window applied after filtering and ordering.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Slice {
    pub offset: u64,
    pub limit: Option<u64>,
}

impl Slice {
    pub const ALL: Slice = Slice {
        offset: 0,
        limit: None,
    };
}

/// A product with its subcategory join resolved.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductListing {
    #[serde(flatten)]
    pub product: Product,
    /// Subcategory display name; null when the subcategory was deleted
    /// after the product referenced it.
    pub subcategory_name: Option<String>,
    /// Parent category display name, when the subcategory resolves.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
}

/// One page of listing results plus the totals the client needs for
/// paging controls.
#[derive(Debug, Clone)]
pub struct ProductPage {
    pub items: Vec<ProductListing>,
    pub total: u64,
    pub total_pages: u64,
    pub current_page: u32,
}

/// Read operations over the product collection.
#[derive(Clone)]
pub struct CatalogQueries {
    store: Arc<dyn CatalogStore>,
}

impl CatalogQueries {
    pub fn new(store: Arc<dyn CatalogStore>) -> Self {
        Self { store }
    }

    /// Public listing: active products only, newest first. Pages past
    /// the end of the result set come back empty, not as an error.
    pub async fn list(&self, filters: ListFilters, page: Page) -> Result<ProductPage, CatalogError> {
        let filter = filters.into_filter();
        let products = self.store.select_products(&filter, page.slice()).await?;
        let total = self.store.count_products(&filter).await?;
        let items = self.join_subcategories(products).await?;
        Ok(ProductPage {
            items,
            total,
            total_pages: page.total_pages(total),
            current_page: page.number,
        })
    }

    /// All active products under one subcategory, newest first.
    pub async fn by_subcategory(
        &self,
        subcategory: Uuid,
    ) -> Result<Vec<ProductListing>, CatalogError> {
        let filter = ProductFilter {
            subcategory: Some(subcategory),
            active_only: true,
            ..ProductFilter::default()
        };
        let products = self.store.select_products(&filter, Slice::ALL).await?;
        self.join_subcategories(products).await
    }

    /// Direct lookup. No active-flag filter: admin and direct-link
    /// fetches may see inactive products.
    pub async fn by_id(&self, id: Uuid) -> Result<ProductListing, CatalogError> {
        let product = self
            .store
            .product_by_id(id)
            .await?
            .ok_or(CatalogError::NotFound)?;
        let mut listings = self.join_subcategories(vec![product]).await?;
        Ok(listings.remove(0))
    }

    async fn join_subcategories(
        &self,
        products: Vec<Product>,
    ) -> Result<Vec<ProductListing>, CatalogError> {
        let ids: Vec<Uuid> = products
            .iter()
            .map(|p| p.subcategory)
            .collect::<HashSet<_>>()
            .into_iter()
            .collect();
        let resolved: HashMap<Uuid, Subcategory> = self
            .store
            .subcategories_by_ids(&ids)
            .await?
            .into_iter()
            .map(|s| (s.id, s))
            .collect();

        Ok(products
            .into_iter()
            .map(|product| {
                let joined = resolved.get(&product.subcategory);
                ProductListing {
                    subcategory_name: joined.map(|s| s.name.clone()),
                    category: joined.and_then(|s| s.category.clone()),
                    product,
                }
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::product::Variation;
    use chrono::Utc;

    fn product_with_variations(variations: Vec<Variation>, is_active: bool) -> Product {
        let now = Utc::now();
        Product {
            id: Uuid::new_v4(),
            name: "tee".to_string(),
            description: None,
            subcategory: Uuid::new_v4(),
            images: vec![],
            variations,
            brand: None,
            is_active,
            created_at: now,
            updated_at: now,
        }
    }

    fn variation(size: Size, price: &str) -> Variation {
        Variation {
            size,
            price: price.parse().unwrap(),
            stock: 1,
        }
    }

    #[test]
    fn price_range_must_hold_on_a_single_variation() {
        // One variation below the range, one above: neither is inside,
        // even though the bounds are individually satisfiable.
        let product =
            product_with_variations(vec![variation(Size::S, "5"), variation(Size::M, "50")], true);
        let filter = ProductFilter {
            min_price: Some("10".parse().unwrap()),
            max_price: Some("20".parse().unwrap()),
            ..ProductFilter::default()
        };
        assert!(!filter.matches(&product));

        let product = product_with_variations(
            vec![variation(Size::S, "5"), variation(Size::M, "15")],
            true,
        );
        assert!(filter.matches(&product));
    }

    #[test]
    fn open_ended_price_bounds_apply_independently() {
        let product = product_with_variations(vec![variation(Size::L, "30")], true);

        let min_only = ProductFilter {
            min_price: Some("25".parse().unwrap()),
            ..ProductFilter::default()
        };
        assert!(min_only.matches(&product));

        let max_only = ProductFilter {
            max_price: Some("25".parse().unwrap()),
            ..ProductFilter::default()
        };
        assert!(!max_only.matches(&product));
    }

    #[test]
    fn active_only_excludes_inactive_products() {
        let product = product_with_variations(vec![variation(Size::M, "10")], false);
        let filter = ProductFilter {
            active_only: true,
            ..ProductFilter::default()
        };
        assert!(!filter.matches(&product));
        assert!(ProductFilter::default().matches(&product));
    }

    #[test]
    fn size_filter_matches_any_variation() {
        let product =
            product_with_variations(vec![variation(Size::S, "5"), variation(Size::Xl, "9")], true);
        let filter = ProductFilter {
            size: Some(Size::Xl),
            ..ProductFilter::default()
        };
        assert!(filter.matches(&product));

        let filter = ProductFilter {
            size: Some(Size::Xxl),
            ..ProductFilter::default()
        };
        assert!(!filter.matches(&product));
    }

    #[test]
    fn page_math() {
        let page = Page::new(2, 5);
        assert_eq!(page.slice().offset, 5);
        assert_eq!(page.slice().limit, Some(5));
        assert_eq!(page.total_pages(12), 3);
        assert_eq!(page.total_pages(0), 0);
        assert_eq!(page.total_pages(10), 2);
    }

    #[test]
    fn page_clamps_number_and_size() {
        let page = Page::new(0, 0);
        assert_eq!(page.number, 1);
        assert_eq!(page.size, 1);

        let capped = Page::new(1, u32::MAX);
        assert_eq!(capped.size, CONFIG.pagination.max_page_size);
    }
}
