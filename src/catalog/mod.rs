pub mod product;
pub mod query;
pub mod service;
pub mod validate;

use thiserror::Error;

use crate::store::StoreError;

/// Failures surfaced by catalog mutations and reads.
///
/// Everything except `Storage` is deterministic and detected before any
/// write happens; `Storage` wraps unexpected persistence-layer faults.
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("Product not found")]
    NotFound,

    #[error("Subcategory not found")]
    SubcategoryNotFound,

    #[error("At least one variation is required")]
    EmptyVariations,

    #[error("Duplicate sizes are not allowed in variations")]
    DuplicateSize,

    #[error("{0}")]
    Validation(String),

    #[error(transparent)]
    Storage(#[from] StoreError),
}

impl CatalogError {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }
}
