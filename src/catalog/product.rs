use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize};
use uuid::Uuid;

/// The fixed garment size ladder. Variations are keyed by size, so a
/// product can carry at most one entry per value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Size {
    Xs,
    S,
    M,
    L,
    Xl,
    Xxl,
    Xxxl,
}

impl Size {
    pub fn as_str(&self) -> &'static str {
        match self {
            Size::Xs => "XS",
            Size::S => "S",
            Size::M => "M",
            Size::L => "L",
            Size::Xl => "XL",
            Size::Xxl => "XXL",
            Size::Xxxl => "XXXL",
        }
    }
}

impl std::fmt::Display for Size {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One purchasable size/price/stock combination of a product.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Variation {
    pub size: Size,
    pub price: Decimal,
    #[serde(default)]
    pub stock: i32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: Uuid,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub subcategory: Uuid,
    pub images: Vec<String>,
    pub variations: Vec<Variation>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub brand: Option<String>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Validated input handed to the store; id and timestamps are generated
/// on insert.
#[derive(Debug, Clone)]
pub struct ProductDraft {
    pub name: String,
    pub description: Option<String>,
    pub subcategory: Uuid,
    pub images: Vec<String>,
    pub variations: Vec<Variation>,
    pub brand: Option<String>,
    pub is_active: bool,
}

/// Create payload. A missing `variations` field deserializes to an empty
/// sequence so the validator can reject it with the right error kind
/// instead of a parse failure.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewProduct {
    pub name: String,
    pub description: Option<String>,
    pub subcategory: Uuid,
    #[serde(default)]
    pub variations: Vec<Variation>,
    pub brand: Option<String>,
}

/// Partial update payload with presence-aware fields.
///
/// `name`, `subcategory` and `variations` retain the stored value when
/// absent. `description` and `brand` are double-optional: the outer
/// `None` means "not supplied", `Some(None)` is an explicit null that
/// clears the field. `isActive: false` overwrites because presence, not
/// truthiness, decides.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductPatch {
    pub name: Option<String>,
    #[serde(default, deserialize_with = "nullable_field")]
    pub description: Option<Option<String>>,
    pub subcategory: Option<Uuid>,
    pub variations: Option<Vec<Variation>>,
    #[serde(default, deserialize_with = "nullable_field")]
    pub brand: Option<Option<String>>,
    pub is_active: Option<bool>,
}

/// Maps a present-but-null JSON value to `Some(None)`; an absent field
/// stays `None` via the `default` attribute on the field.
fn nullable_field<'de, T, D>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    Deserialize::deserialize(deserializer).map(Some)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn patch_distinguishes_absent_from_null_from_value() {
        let patch: ProductPatch = serde_json::from_value(json!({})).unwrap();
        assert_eq!(patch.description, None);
        assert_eq!(patch.brand, None);

        let patch: ProductPatch = serde_json::from_value(json!({ "description": null })).unwrap();
        assert_eq!(patch.description, Some(None));

        let patch: ProductPatch =
            serde_json::from_value(json!({ "description": "updated copy" })).unwrap();
        assert_eq!(patch.description, Some(Some("updated copy".to_string())));
    }

    #[test]
    fn patch_is_active_false_is_present() {
        let patch: ProductPatch = serde_json::from_value(json!({ "isActive": false })).unwrap();
        assert_eq!(patch.is_active, Some(false));

        let patch: ProductPatch = serde_json::from_value(json!({})).unwrap();
        assert_eq!(patch.is_active, None);
    }

    #[test]
    fn variation_stock_defaults_to_zero() {
        let variation: Variation =
            serde_json::from_value(json!({ "size": "XL", "price": "19.99" })).unwrap();
        assert_eq!(variation.size, Size::Xl);
        assert_eq!(variation.stock, 0);
    }

    #[test]
    fn size_rejects_values_outside_the_ladder() {
        assert!(serde_json::from_value::<Size>(json!("XXXXL")).is_err());
        assert!(serde_json::from_value::<Size>(json!("m")).is_err());
    }
}
