use std::sync::Arc;

use crate::error::AppError;
use crate::models::{Product, ProductDraft};
use crate::store::Store;

pub const PRODUCT_MISSING: &str = "Product does not exist on Seller end.";

/// Seller-owned products. Carts and checkout only read from here.
#[derive(Clone)]
pub struct Catalog {
    store: Arc<dyn Store>,
}

impl Catalog {
    pub fn new(store: Arc<dyn Store>) -> Self {
        Catalog { store }
    }

    pub async fn find(&self, id: &str) -> Result<Option<Product>, AppError> {
        Ok(self.store.find_product(id).await?)
    }

    /// Like `find`, but a missing product is a request error.
    pub async fn require(&self, id: &str) -> Result<Product, AppError> {
        self.find(id)
            .await?
            .ok_or_else(|| AppError::not_found(PRODUCT_MISSING))
    }

    pub async fn list(&self) -> Result<Vec<Product>, AppError> {
        Ok(self.store.list_products().await?)
    }

    pub async fn create(&self, owner_id: &str, draft: ProductDraft) -> Result<Product, AppError> {
        let product = Product::new(owner_id, draft);
        self.store.insert_product(&product).await?;
        log::info!("Product {} listed by {}", product.id, owner_id);
        Ok(product)
    }

    pub async fn update(&self, id: &str, requester_id: &str, draft: ProductDraft) -> Result<Product, AppError> {
        let mut product = self.owned(id, requester_id).await?;
        product.title = draft.title;
        product.description = draft.description;
        product.price = draft.price;
        product.quantity = draft.quantity;

        if !self.store.replace_product(&product).await? {
            return Err(AppError::not_found(PRODUCT_MISSING));
        }
        Ok(product)
    }

    pub async fn delete(&self, id: &str, requester_id: &str) -> Result<(), AppError> {
        self.owned(id, requester_id).await?;
        if !self.store.delete_product(id).await? {
            return Err(AppError::not_found(PRODUCT_MISSING));
        }
        log::info!("Product {} removed by {}", id, requester_id);
        Ok(())
    }

    async fn owned(&self, id: &str, requester_id: &str) -> Result<Product, AppError> {
        let product = self.require(id).await?;
        if product.owner_id != requester_id {
            return Err(AppError::unauthorized("User not authorized"));
        }
        Ok(product)
    }
}

/// Rejects `wanted` units when the product cannot cover them.
pub fn ensure_stock(product: &Product, wanted: i64) -> Result<(), AppError> {
    if wanted > product.quantity {
        log::warn!(
            "Stock violation on {}: wanted {}, available {}",
            product.id,
            wanted,
            product.quantity
        );
        return Err(AppError::StockViolation {
            title: product.title.clone(),
            available: product.quantity,
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;

    fn draft(title: &str, quantity: i64) -> ProductDraft {
        ProductDraft {
            title: title.into(),
            description: None,
            price: 5.0,
            quantity,
        }
    }

    #[actix_web::test]
    async fn only_seller_may_change_product() {
        let catalog = Catalog::new(Arc::new(MemoryStore::new()));
        let product = catalog.create("seller", draft("Mug", 4)).await.unwrap();

        let err = catalog
            .update(&product.id, "someone-else", draft("Cup", 1))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Unauthorized(_)));
        assert!(matches!(
            catalog.delete(&product.id, "someone-else").await.unwrap_err(),
            AppError::Unauthorized(_)
        ));

        let updated = catalog.update(&product.id, "seller", draft("Cup", 9)).await.unwrap();
        assert_eq!(updated.title, "Cup");
        assert_eq!(catalog.require(&product.id).await.unwrap().quantity, 9);

        catalog.delete(&product.id, "seller").await.unwrap();
        assert!(catalog.find(&product.id).await.unwrap().is_none());
    }

    #[actix_web::test]
    async fn missing_product_is_not_found() {
        let catalog = Catalog::new(Arc::new(MemoryStore::new()));
        match catalog.require("nope").await.unwrap_err() {
            AppError::NotFound(msg) => assert_eq!(msg, PRODUCT_MISSING),
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn stock_check_is_inclusive() {
        let product = Product::new("s", draft("Mug", 3));
        assert!(ensure_stock(&product, 3).is_ok());
        assert!(matches!(
            ensure_stock(&product, 4),
            Err(AppError::StockViolation { available: 3, .. })
        ));
    }
}
