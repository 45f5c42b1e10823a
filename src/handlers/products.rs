use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::api::response::{ok_message, Envelope};
use crate::catalog::product::{NewProduct, ProductPatch, Size};
use crate::catalog::query::{ListFilters, Page, ProductListing};
use crate::config::CONFIG;
use crate::error::ApiError;

use super::AppState;

/// Query-string filters for the public listing, parsed into the typed
/// inputs the query engine consumes.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListParams {
    pub page: Option<u32>,
    pub limit: Option<u32>,
    pub subcategory: Option<Uuid>,
    pub min_price: Option<Decimal>,
    pub max_price: Option<Decimal>,
    pub size: Option<Size>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ListBody {
    pub count: usize,
    pub total: u64,
    pub total_pages: u64,
    pub current_page: u32,
    pub products: Vec<ProductListing>,
}

#[derive(Debug, Serialize)]
pub struct ProductBody<T: Serialize> {
    pub product: T,
}

#[derive(Debug, Serialize)]
pub struct SubcategoryListBody {
    pub count: usize,
    pub products: Vec<ProductListing>,
}

/// POST /api/products body: the product fields plus the uploaded-image
/// URLs already resolved by the upload collaborator.
#[derive(Debug, Deserialize)]
pub struct CreateProductRequest {
    #[serde(flatten)]
    pub product: NewProduct,
    #[serde(default)]
    pub images: Vec<String>,
}

/// PUT /api/products/:id body: partial fields; `images`, when present,
/// replaces the stored list.
#[derive(Debug, Deserialize)]
pub struct UpdateProductRequest {
    #[serde(flatten)]
    pub patch: ProductPatch,
    pub images: Option<Vec<String>>,
}

/// GET /api/products - public browse with filters and pagination
pub async fn list_products(
    State(state): State<AppState>,
    Query(params): Query<ListParams>,
) -> Result<impl IntoResponse, ApiError> {
    let page = Page::new(
        params.page.unwrap_or(1),
        params.limit.unwrap_or(CONFIG.pagination.default_page_size),
    );
    let filters = ListFilters {
        subcategory: params.subcategory,
        min_price: params.min_price,
        max_price: params.max_price,
        size: params.size,
    };

    let result = state.queries.list(filters, page).await?;
    Ok(Envelope::ok(
        "Products retrieved successfully",
        ListBody {
            count: result.items.len(),
            total: result.total,
            total_pages: result.total_pages,
            current_page: result.current_page,
            products: result.items,
        },
    ))
}

/// GET /api/products/subcategory/:subcategory_id - public
pub async fn products_by_subcategory(
    State(state): State<AppState>,
    Path(subcategory_id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let products = state.queries.by_subcategory(subcategory_id).await?;
    Ok(Envelope::ok(
        "Products retrieved successfully",
        SubcategoryListBody {
            count: products.len(),
            products,
        },
    ))
}

/// GET /api/products/:id - public, returns inactive products too
pub async fn get_product(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let product = state.queries.by_id(id).await?;
    Ok(Envelope::ok(
        "Product retrieved successfully",
        ProductBody { product },
    ))
}

/// POST /api/products - admin
pub async fn create_product(
    State(state): State<AppState>,
    Json(request): Json<CreateProductRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let product = state.catalog.create(request.product, request.images).await?;
    Ok((
        StatusCode::CREATED,
        Envelope::ok("Product created successfully", ProductBody { product }),
    ))
}

/// PUT /api/products/:id - admin
pub async fn update_product(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(request): Json<UpdateProductRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let product = state
        .catalog
        .update(id, request.patch, request.images)
        .await?;
    Ok(Envelope::ok(
        "Product updated successfully",
        ProductBody { product },
    ))
}

/// DELETE /api/products/:id - admin
pub async fn delete_product(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    state.catalog.delete(id).await?;
    Ok(ok_message("Product deleted successfully"))
}
