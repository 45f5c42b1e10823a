//! Platform analytics: read-only aggregates computed on demand from the
//! catalog, user and order collections. No caching, no snapshots; every
//! call scans current data and tolerates empty collections.

use std::sync::Arc;

use rust_decimal::Decimal;
use serde::Serialize;

use crate::catalog::query::ProductFilter;
use crate::store::models::{RoleCount, SubcategoryProductCount};
use crate::store::{CatalogStore, OrderStore, StoreError, UserStore};

/// Role whose user count stands in for "approved vendors" until vendors
/// carry their own approval flag. Do not read long-term meaning into it.
const VENDOR_STAND_IN_ROLE: &str = "admin";

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TotalOverview {
    pub total_users: u64,
    pub total_orders: u64,
    pub total_products: u64,
    pub total_categories: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlatformOverview {
    pub active_users: u64,
    pub approved_vendors: u64,
    pub pending_vendor_requests: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlatformDistribution {
    pub users: u64,
    pub products: u64,
    pub categories: u64,
    pub orders: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlatformAnalytics {
    pub total_overview: TotalOverview,
    pub platform_overview: PlatformOverview,
    pub platform_distribution: PlatformDistribution,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyticsSummary {
    pub total_users: u64,
    pub active_users: u64,
    pub inactive_users: u64,
    pub total_orders: u64,
    pub total_products: u64,
    pub total_categories: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderMetrics {
    pub total_orders: u64,
    pub total_revenue: Decimal,
    pub avg_order_value: Decimal,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DetailedAnalytics {
    pub summary: AnalyticsSummary,
    pub order_metrics: OrderMetrics,
    pub products_by_category: Vec<SubcategoryProductCount>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserStats {
    pub total_users: u64,
    pub active_users: u64,
    pub inactive_users: u64,
    pub users_by_role: Vec<RoleCount>,
}

#[derive(Clone)]
pub struct Analytics {
    catalog: Arc<dyn CatalogStore>,
    users: Arc<dyn UserStore>,
    orders: Arc<dyn OrderStore>,
}

impl Analytics {
    pub fn new(
        catalog: Arc<dyn CatalogStore>,
        users: Arc<dyn UserStore>,
        orders: Arc<dyn OrderStore>,
    ) -> Self {
        Self {
            catalog,
            users,
            orders,
        }
    }

    pub async fn platform_overview(&self) -> Result<PlatformAnalytics, StoreError> {
        let all_products_filter = ProductFilter::default();
        let (total_users, total_orders, total_products, total_categories, active_users, approved_vendors) =
            tokio::try_join!(
                self.users.count_users(),
                self.orders.count_orders(),
                self.catalog.count_products(&all_products_filter),
                self.catalog.count_categories(),
                self.users.count_active_users(),
                self.users.count_users_with_role(VENDOR_STAND_IN_ROLE),
            )?;

        Ok(PlatformAnalytics {
            total_overview: TotalOverview {
                total_users,
                total_orders,
                total_products,
                total_categories,
            },
            platform_overview: PlatformOverview {
                active_users,
                approved_vendors,
                // Constant until a vendor request pipeline exists.
                pending_vendor_requests: 0,
            },
            platform_distribution: PlatformDistribution {
                users: total_users,
                products: total_products,
                categories: total_categories,
                orders: total_orders,
            },
        })
    }

    pub async fn detailed(&self) -> Result<DetailedAnalytics, StoreError> {
        let all_products_filter = ProductFilter::default();
        let (total_users, active_users, total_products, total_categories, volume, products_by_category) =
            tokio::try_join!(
                self.users.count_users(),
                self.users.count_active_users(),
                self.catalog.count_products(&all_products_filter),
                self.catalog.count_categories(),
                self.orders.order_volume(),
                self.catalog.products_per_subcategory(),
            )?;

        // The average is derived here, not in the stores, so an empty
        // order collection yields zeros rather than a division error.
        let avg_order_value = if volume.count == 0 {
            Decimal::ZERO
        } else {
            (volume.revenue / Decimal::from(volume.count)).round_dp(2)
        };

        Ok(DetailedAnalytics {
            summary: AnalyticsSummary {
                total_users,
                active_users,
                inactive_users: total_users - active_users,
                total_orders: volume.count,
                total_products,
                total_categories,
            },
            order_metrics: OrderMetrics {
                total_orders: volume.count,
                total_revenue: volume.revenue,
                avg_order_value,
            },
            products_by_category,
        })
    }

    pub async fn user_stats(&self) -> Result<UserStats, StoreError> {
        let (total_users, active_users, users_by_role) = tokio::try_join!(
            self.users.count_users(),
            self.users.count_active_users(),
            self.users.users_per_role(),
        )?;

        Ok(UserStats {
            total_users,
            active_users,
            inactive_users: total_users - active_users,
            users_by_role,
        })
    }
}
