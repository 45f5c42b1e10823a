// HTTP API Error Types
use axum::{http::StatusCode, response::IntoResponse, Json};
use serde_json::{json, Value};

use crate::catalog::CatalogError;
use crate::store::StoreError;

/// HTTP API error: status code plus a stable client code for branching.
/// Storage detail is logged server-side and never leaks into responses.
#[derive(Debug)]
pub enum ApiError {
    // 404 Not Found
    NotFound(String),

    // 400 Bad Request
    SubcategoryNotFound,
    EmptyVariations,
    DuplicateSize,
    Validation(String),

    // 500 Internal Server Error
    StorageFault,
}

impl ApiError {
    /// Get HTTP status code
    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::SubcategoryNotFound
            | ApiError::EmptyVariations
            | ApiError::DuplicateSize
            | ApiError::Validation(_) => StatusCode::BAD_REQUEST,
            ApiError::StorageFault => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Get client-safe error message
    pub fn message(&self) -> String {
        match self {
            ApiError::NotFound(msg) => msg.clone(),
            ApiError::SubcategoryNotFound => "Subcategory not found".to_string(),
            ApiError::EmptyVariations => "At least one variation is required".to_string(),
            ApiError::DuplicateSize => {
                "Duplicate sizes are not allowed in variations".to_string()
            }
            ApiError::Validation(msg) => msg.clone(),
            ApiError::StorageFault => {
                "An error occurred while processing your request".to_string()
            }
        }
    }

    /// Get error code for client handling
    pub fn error_code(&self) -> &'static str {
        match self {
            ApiError::NotFound(_) => "NOT_FOUND",
            ApiError::SubcategoryNotFound => "SUBCATEGORY_NOT_FOUND",
            ApiError::EmptyVariations => "EMPTY_VARIATIONS",
            ApiError::DuplicateSize => "DUPLICATE_SIZE",
            ApiError::Validation(_) => "VALIDATION_FAILED",
            ApiError::StorageFault => "STORAGE_FAULT",
        }
    }

    /// Convert to JSON response body
    pub fn to_json(&self) -> Value {
        json!({
            "success": false,
            "message": self.message(),
            "code": self.error_code(),
        })
    }
}

impl From<CatalogError> for ApiError {
    fn from(err: CatalogError) -> Self {
        match err {
            CatalogError::NotFound => ApiError::NotFound("Product not found".to_string()),
            CatalogError::SubcategoryNotFound => ApiError::SubcategoryNotFound,
            CatalogError::EmptyVariations => ApiError::EmptyVariations,
            CatalogError::DuplicateSize => ApiError::DuplicateSize,
            CatalogError::Validation(msg) => ApiError::Validation(msg),
            CatalogError::Storage(err) => err.into(),
        }
    }
}

impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        // Log the real error but return a generic message
        tracing::error!("storage fault: {}", err);
        ApiError::StorageFault
    }
}

// Standard error trait implementations
impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message())
    }
}

impl std::error::Error for ApiError {}

// Automatic HTTP response conversion for Axum
impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        (self.status_code(), Json(self.to_json())).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn catalog_kinds_map_to_http_statuses() {
        let err: ApiError = CatalogError::NotFound.into();
        assert_eq!(err.status_code(), StatusCode::NOT_FOUND);
        assert_eq!(err.error_code(), "NOT_FOUND");

        let err: ApiError = CatalogError::SubcategoryNotFound.into();
        assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(err.error_code(), "SUBCATEGORY_NOT_FOUND");

        let err: ApiError = CatalogError::DuplicateSize.into();
        assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(err.error_code(), "DUPLICATE_SIZE");

        let err: ApiError = CatalogError::EmptyVariations.into();
        assert_eq!(err.error_code(), "EMPTY_VARIATIONS");
    }

    #[test]
    fn storage_faults_are_opaque() {
        let err: ApiError = StoreError::Query("relation does not exist".to_string()).into();
        assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
        assert!(!err.message().contains("relation"));
    }

    #[test]
    fn body_carries_success_flag_and_code() {
        let body = ApiError::DuplicateSize.to_json();
        assert_eq!(body["success"], false);
        assert_eq!(body["code"], "DUPLICATE_SIZE");
        assert!(body["message"].is_string());
    }
}
