use std::collections::HashSet;
use std::sync::Arc;

use super::catalog::{ensure_stock, Catalog};
use crate::error::AppError;
use crate::models::{Cart, CartItem};
use crate::store::Store;

pub const CART_MISSING: &str = "Cart does not exist.";
pub const ITEM_MISSING: &str = "Product does not exist in your cart.";
pub const ITEM_DUPLICATE: &str = "Product already exists in your cart.";

/// One cart document per user, holding `(productID, selectedQuantity)` lines.
#[derive(Clone)]
pub struct CartService {
    store: Arc<dyn Store>,
    catalog: Catalog,
}

impl CartService {
    pub fn new(store: Arc<dyn Store>, catalog: Catalog) -> Self {
        CartService { store, catalog }
    }

    pub async fn create(&self, owner_id: &str) -> Result<Cart, AppError> {
        let cart = Cart::new(owner_id);
        self.store.insert_cart(&cart).await?;
        Ok(cart)
    }

    pub async fn get(&self, owner_id: &str) -> Result<Cart, AppError> {
        self.store
            .find_cart_by_owner(owner_id)
            .await?
            .ok_or_else(|| AppError::not_found(CART_MISSING))
    }

    pub async fn find_by_id(&self, cart_id: &str) -> Result<Option<Cart>, AppError> {
        Ok(self.store.find_cart(cart_id).await?)
    }

    pub async fn add_item(&self, owner_id: &str, item: CartItem) -> Result<Cart, AppError> {
        let mut cart = self.get(owner_id).await?;
        let product = self.catalog.require(&item.product_id).await?;
        ensure_stock(&product, item.selected_quantity)?;
        if cart.position(&item.product_id).is_some() {
            return Err(AppError::Conflict(ITEM_DUPLICATE.to_string()));
        }

        cart.products.push(item);
        self.persist(&cart).await
    }

    pub async fn update_item(&self, owner_id: &str, product_id: &str, quantity: i64) -> Result<Cart, AppError> {
        let mut cart = self.get(owner_id).await?;
        let index = cart
            .position(product_id)
            .ok_or_else(|| AppError::not_found(ITEM_MISSING))?;
        let product = self.catalog.require(product_id).await?;
        ensure_stock(&product, quantity)?;

        if let Some(line) = cart.products.get_mut(index) {
            line.selected_quantity = quantity;
        }
        self.persist(&cart).await
    }

    pub async fn remove_item(&self, owner_id: &str, product_id: &str) -> Result<Cart, AppError> {
        let mut cart = self.get(owner_id).await?;
        let index = cart
            .position(product_id)
            .ok_or_else(|| AppError::not_found(ITEM_MISSING))?;

        cart.products.remove(index);
        self.persist(&cart).await
    }

    pub async fn clear(&self, owner_id: &str) -> Result<Cart, AppError> {
        let mut cart = self.get(owner_id).await?;
        cart.products.clear();
        self.persist(&cart).await
    }

    /// Swaps the whole line list of cart `cart_id`. Only its owner may do this.
    pub async fn replace(&self, cart_id: &str, requester_id: &str, items: Vec<CartItem>) -> Result<Cart, AppError> {
        let mut cart = self.owned(cart_id, requester_id).await?;

        let mut seen = HashSet::new();
        for item in &items {
            if !seen.insert(item.product_id.as_str()) {
                return Err(AppError::Conflict(ITEM_DUPLICATE.to_string()));
            }
            let product = self.catalog.require(&item.product_id).await?;
            ensure_stock(&product, item.selected_quantity)?;
        }

        cart.products = items;
        self.persist(&cart).await
    }

    pub async fn delete_cart(&self, cart_id: &str, requester_id: &str) -> Result<(), AppError> {
        self.owned(cart_id, requester_id).await?;
        if !self.store.delete_cart(cart_id).await? {
            return Err(AppError::not_found(CART_MISSING));
        }
        log::info!("Cart {} deleted by its owner", cart_id);
        Ok(())
    }

    async fn owned(&self, cart_id: &str, requester_id: &str) -> Result<Cart, AppError> {
        let cart = self
            .find_by_id(cart_id)
            .await?
            .ok_or_else(|| AppError::not_found(CART_MISSING))?;
        ensure_owner(&cart, requester_id)?;
        Ok(cart)
    }

    async fn persist(&self, cart: &Cart) -> Result<Cart, AppError> {
        self.store
            .set_cart_products(&cart.id, &cart.products)
            .await?
            .ok_or_else(|| AppError::not_found(CART_MISSING))
    }
}

pub fn ensure_owner(cart: &Cart, requester_id: &str) -> Result<(), AppError> {
    if cart.owner_id != requester_id {
        log::warn!("User {} tried to modify cart {}", requester_id, cart.id);
        return Err(AppError::unauthorized("User not authorized"));
    }
    Ok(())
}
