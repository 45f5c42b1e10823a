//! Write side of the catalog. The only component that mutates product
//! state; every check runs before the first write so a rejected request
//! leaves the store untouched.

use std::sync::Arc;

use uuid::Uuid;

use crate::store::CatalogStore;

use super::product::{NewProduct, Product, ProductDraft, ProductPatch};
use super::validate::{validate_product_fields, validate_variations};
use super::CatalogError;

#[derive(Clone)]
pub struct CatalogService {
    store: Arc<dyn CatalogStore>,
}

impl CatalogService {
    pub fn new(store: Arc<dyn CatalogStore>) -> Self {
        Self { store }
    }

    /// Creates a product. `images` is the uploaded-file URL list
    /// resolved by the upload collaborator; it may be empty. New
    /// products start active.
    pub async fn create(
        &self,
        input: NewProduct,
        images: Vec<String>,
    ) -> Result<Product, CatalogError> {
        if self
            .store
            .subcategory_by_id(input.subcategory)
            .await?
            .is_none()
        {
            return Err(CatalogError::SubcategoryNotFound);
        }
        validate_variations(&input.variations)?;
        validate_product_fields(
            &input.name,
            input.description.as_deref(),
            input.brand.as_deref(),
            &images,
        )?;

        let product = self
            .store
            .insert_product(ProductDraft {
                name: input.name.trim().to_string(),
                description: input.description,
                subcategory: input.subcategory,
                images,
                variations: input.variations,
                brand: input.brand,
                is_active: true,
            })
            .await?;
        tracing::info!(product_id = %product.id, "product created");
        Ok(product)
    }

    /// Partial update. Absent fields retain their stored value;
    /// `description` and `brand` accept an explicit null to clear;
    /// `isActive: false` overwrites. The stored image list is replaced
    /// only when the request carried a new upload list.
    pub async fn update(
        &self,
        id: Uuid,
        patch: ProductPatch,
        images: Option<Vec<String>>,
    ) -> Result<Product, CatalogError> {
        let mut product = self
            .store
            .product_by_id(id)
            .await?
            .ok_or(CatalogError::NotFound)?;

        if let Some(subcategory) = patch.subcategory {
            if self.store.subcategory_by_id(subcategory).await?.is_none() {
                return Err(CatalogError::SubcategoryNotFound);
            }
        }
        if let Some(variations) = &patch.variations {
            validate_variations(variations)?;
        }

        if let Some(name) = patch.name {
            product.name = name.trim().to_string();
        }
        if let Some(description) = patch.description {
            product.description = description;
        }
        if let Some(subcategory) = patch.subcategory {
            product.subcategory = subcategory;
        }
        if let Some(variations) = patch.variations {
            product.variations = variations;
        }
        if let Some(brand) = patch.brand {
            product.brand = brand;
        }
        if let Some(is_active) = patch.is_active {
            product.is_active = is_active;
        }
        if let Some(images) = images {
            product.images = images;
        }

        validate_product_fields(
            &product.name,
            product.description.as_deref(),
            product.brand.as_deref(),
            &product.images,
        )?;

        let product = self.store.save_product(product).await?;
        tracing::info!(product_id = %product.id, "product updated");
        Ok(product)
    }

    /// Removes a product once its existence is confirmed. No cascading
    /// effects on referencing entities.
    pub async fn delete(&self, id: Uuid) -> Result<(), CatalogError> {
        if !self.store.delete_product(id).await? {
            return Err(CatalogError::NotFound);
        }
        tracing::info!(product_id = %id, "product deleted");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::product::{Size, Variation};
    use crate::catalog::query::ProductFilter;
    use crate::store::memory::MemoryStore;

    fn variation(size: Size, price: &str) -> Variation {
        Variation {
            size,
            price: price.parse().unwrap(),
            stock: 2,
        }
    }

    fn new_product(name: &str, subcategory: Uuid, variations: Vec<Variation>) -> NewProduct {
        NewProduct {
            name: name.to_string(),
            description: None,
            subcategory,
            variations,
            brand: None,
        }
    }

    async fn setup() -> (Arc<MemoryStore>, CatalogService, Uuid) {
        let store = Arc::new(MemoryStore::new());
        let subcategory = store.seed_subcategory("Shirts", Some("Clothing")).await;
        let service = CatalogService::new(store.clone());
        (store, service, subcategory.id)
    }

    #[tokio::test]
    async fn create_persists_all_variations() {
        let (store, service, subcategory) = setup().await;
        let input = new_product(
            "Oxford shirt",
            subcategory,
            vec![variation(Size::S, "29.90"), variation(Size::M, "31.90")],
        );

        let product = service.create(input, vec![]).await.unwrap();
        assert_eq!(product.variations.len(), 2);
        assert!(product.is_active);

        let stored = store.product_by_id(product.id).await.unwrap().unwrap();
        assert_eq!(stored, product);
    }

    #[tokio::test]
    async fn create_rejects_duplicate_sizes_without_writing() {
        let (store, service, subcategory) = setup().await;
        let input = new_product(
            "Oxford shirt",
            subcategory,
            vec![variation(Size::M, "29.90"), variation(Size::M, "31.90")],
        );

        let err = service.create(input, vec![]).await.unwrap_err();
        assert!(matches!(err, CatalogError::DuplicateSize));
        let total = store
            .count_products(&ProductFilter::default())
            .await
            .unwrap();
        assert_eq!(total, 0);
    }

    #[tokio::test]
    async fn create_rejects_unknown_subcategory() {
        let (_, service, _) = setup().await;
        let input = new_product(
            "Oxford shirt",
            Uuid::new_v4(),
            vec![variation(Size::M, "29.90")],
        );

        let err = service.create(input, vec![]).await.unwrap_err();
        assert!(matches!(err, CatalogError::SubcategoryNotFound));
    }

    #[tokio::test]
    async fn create_rejects_empty_variations() {
        let (_, service, subcategory) = setup().await;
        let err = service
            .create(new_product("Oxford shirt", subcategory, vec![]), vec![])
            .await
            .unwrap_err();
        assert!(matches!(err, CatalogError::EmptyVariations));
    }

    #[tokio::test]
    async fn update_merges_only_supplied_fields() {
        let (_, service, subcategory) = setup().await;
        let product = service
            .create(
                NewProduct {
                    name: "Oxford shirt".to_string(),
                    description: Some("classic".to_string()),
                    subcategory,
                    variations: vec![variation(Size::M, "29.90")],
                    brand: Some("Fray".to_string()),
                },
                vec![],
            )
            .await
            .unwrap();

        let updated = service
            .update(
                product.id,
                ProductPatch {
                    name: Some("Oxford shirt II".to_string()),
                    ..ProductPatch::default()
                },
                None,
            )
            .await
            .unwrap();

        assert_eq!(updated.name, "Oxford shirt II");
        assert_eq!(updated.description.as_deref(), Some("classic"));
        assert_eq!(updated.brand.as_deref(), Some("Fray"));
        assert!(updated.is_active);
        assert_eq!(updated.variations, product.variations);
    }

    #[tokio::test]
    async fn update_with_is_active_false_clears_the_flag() {
        let (_, service, subcategory) = setup().await;
        let product = service
            .create(
                new_product("Oxford shirt", subcategory, vec![variation(Size::M, "29.90")]),
                vec![],
            )
            .await
            .unwrap();
        assert!(product.is_active);

        let updated = service
            .update(
                product.id,
                ProductPatch {
                    is_active: Some(false),
                    ..ProductPatch::default()
                },
                None,
            )
            .await
            .unwrap();
        assert!(!updated.is_active);

        // An empty patch must retain the cleared flag.
        let retained = service
            .update(product.id, ProductPatch::default(), None)
            .await
            .unwrap();
        assert!(!retained.is_active);
    }

    #[tokio::test]
    async fn update_clears_description_on_explicit_null() {
        let (_, service, subcategory) = setup().await;
        let product = service
            .create(
                NewProduct {
                    name: "Oxford shirt".to_string(),
                    description: Some("classic".to_string()),
                    subcategory,
                    variations: vec![variation(Size::M, "29.90")],
                    brand: None,
                },
                vec![],
            )
            .await
            .unwrap();

        let updated = service
            .update(
                product.id,
                ProductPatch {
                    description: Some(None),
                    ..ProductPatch::default()
                },
                None,
            )
            .await
            .unwrap();
        assert_eq!(updated.description, None);
    }

    #[tokio::test]
    async fn update_revalidates_replacement_variations() {
        let (_, service, subcategory) = setup().await;
        let product = service
            .create(
                new_product("Oxford shirt", subcategory, vec![variation(Size::M, "29.90")]),
                vec![],
            )
            .await
            .unwrap();

        let err = service
            .update(
                product.id,
                ProductPatch {
                    variations: Some(vec![]),
                    ..ProductPatch::default()
                },
                None,
            )
            .await
            .unwrap_err();
        assert!(matches!(err, CatalogError::EmptyVariations));

        let err = service
            .update(
                product.id,
                ProductPatch {
                    variations: Some(vec![
                        variation(Size::L, "10"),
                        variation(Size::L, "12"),
                    ]),
                    ..ProductPatch::default()
                },
                None,
            )
            .await
            .unwrap_err();
        assert!(matches!(err, CatalogError::DuplicateSize));
    }

    #[tokio::test]
    async fn update_unknown_id_is_not_found() {
        let (_, service, _) = setup().await;
        let err = service
            .update(Uuid::new_v4(), ProductPatch::default(), None)
            .await
            .unwrap_err();
        assert!(matches!(err, CatalogError::NotFound));
    }

    #[tokio::test]
    async fn delete_unknown_id_leaves_store_unchanged() {
        let (store, service, subcategory) = setup().await;
        service
            .create(
                new_product("Oxford shirt", subcategory, vec![variation(Size::M, "29.90")]),
                vec![],
            )
            .await
            .unwrap();

        let err = service.delete(Uuid::new_v4()).await.unwrap_err();
        assert!(matches!(err, CatalogError::NotFound));
        let total = store
            .count_products(&ProductFilter::default())
            .await
            .unwrap();
        assert_eq!(total, 1);
    }

    #[tokio::test]
    async fn delete_removes_the_record() {
        let (store, service, subcategory) = setup().await;
        let product = service
            .create(
                new_product("Oxford shirt", subcategory, vec![variation(Size::M, "29.90")]),
                vec![],
            )
            .await
            .unwrap();

        service.delete(product.id).await.unwrap();
        assert!(store.product_by_id(product.id).await.unwrap().is_none());
    }
}
