//! Pure validation of catalog input. No side effects; invoked from both
//! the create and update paths before anything is written.

use std::collections::HashSet;

use rust_decimal::Decimal;
use url::Url;

use super::product::Variation;
use super::CatalogError;

pub const MAX_NAME_LEN: usize = 100;
pub const MAX_DESCRIPTION_LEN: usize = 1000;
pub const MAX_BRAND_LEN: usize = 50;

/// Checks a candidate variation sequence: it must be non-empty, every
/// entry must satisfy the numeric minimums, and no two entries may share
/// a size (set cardinality against sequence length).
pub fn validate_variations(variations: &[Variation]) -> Result<(), CatalogError> {
    if variations.is_empty() {
        return Err(CatalogError::EmptyVariations);
    }

    for variation in variations {
        if variation.price < Decimal::ZERO {
            return Err(CatalogError::validation("Price cannot be negative"));
        }
        if variation.stock < 0 {
            return Err(CatalogError::validation("Stock cannot be negative"));
        }
    }

    let sizes: HashSet<_> = variations.iter().map(|v| v.size).collect();
    if sizes.len() != variations.len() {
        return Err(CatalogError::DuplicateSize);
    }

    Ok(())
}

/// Field constraints shared by create and update: name presence/length,
/// description and brand lengths, and image URL shape.
pub fn validate_product_fields(
    name: &str,
    description: Option<&str>,
    brand: Option<&str>,
    images: &[String],
) -> Result<(), CatalogError> {
    let name = name.trim();
    if name.is_empty() {
        return Err(CatalogError::validation("Please provide a product name"));
    }
    if name.chars().count() > MAX_NAME_LEN {
        return Err(CatalogError::validation(
            "Product name cannot be more than 100 characters",
        ));
    }

    if let Some(description) = description {
        if description.chars().count() > MAX_DESCRIPTION_LEN {
            return Err(CatalogError::validation(
                "Description cannot be more than 1000 characters",
            ));
        }
    }

    if let Some(brand) = brand {
        if brand.chars().count() > MAX_BRAND_LEN {
            return Err(CatalogError::validation(
                "Brand name cannot be more than 50 characters",
            ));
        }
    }

    for image in images {
        validate_image_url(image)?;
    }

    Ok(())
}

/// Images are absolute http(s) URLs minted by the upload collaborator.
fn validate_image_url(raw: &str) -> Result<(), CatalogError> {
    let parsed = Url::parse(raw)
        .map_err(|_| CatalogError::validation(format!("Image must be a valid URL: {raw}")))?;
    match parsed.scheme() {
        "http" | "https" => Ok(()),
        other => Err(CatalogError::validation(format!(
            "Image URL must use http or https, got {other}: {raw}"
        ))),
    }
}
