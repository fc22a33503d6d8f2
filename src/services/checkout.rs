//! Turning a cart into stock decrements and order ledger entries.
//!
//! The run is strictly sequential:
//!
//! 1. every line is checked against a fresh product read, and the first
//!    missing product or short stock aborts before anything is written;
//! 2. each line then has its stock taken with a conditional decrement and is
//!    appended to the buyer's ledger;
//! 3. the cart is emptied.
//!
//! Every step is awaited before the caller gets the emptied cart back. There is
//! no transaction around the three phases: if a write in phase 2 fails, lines
//! already processed stay applied.

use std::sync::Arc;

use super::cart::CartService;
use super::catalog::{ensure_stock, Catalog};
use super::order::OrderService;
use crate::error::AppError;
use crate::models::{Cart, OrderItem, Product};
use crate::store::Store;

#[derive(Clone)]
pub struct Checkout {
    store: Arc<dyn Store>,
    carts: CartService,
    catalog: Catalog,
    orders: OrderService,
}

impl Checkout {
    pub fn new(store: Arc<dyn Store>, carts: CartService, catalog: Catalog, orders: OrderService) -> Self {
        Checkout {
            store,
            carts,
            catalog,
            orders,
        }
    }

    pub async fn buy(&self, buyer_id: &str) -> Result<Cart, AppError> {
        let cart = self.carts.get(buyer_id).await?;

        // Check every line before touching stock
        let mut lines: Vec<(Product, i64)> = Vec::with_capacity(cart.products.len());
        for item in &cart.products {
            let product = self.catalog.require(&item.product_id).await?;
            ensure_stock(&product, item.selected_quantity)?;
            lines.push((product, item.selected_quantity));
        }

        log::info!("Checkout for {}: {} line(s)", buyer_id, lines.len());
        // Take stock and record each purchase
        for (product, quantity) in lines {
            self.take_stock(&product, quantity).await?;
            self.orders
                .append_purchase(
                    buyer_id,
                    OrderItem {
                        product_id: product.id,
                        quantity,
                        buyer_id: buyer_id.to_string(),
                        title: product.title,
                        price: product.price,
                    },
                )
                .await?;
        }

        // Empty the cart
        self.carts.clear(buyer_id).await
    }

    async fn take_stock(&self, product: &Product, quantity: i64) -> Result<(), AppError> {
        if self.store.decrement_stock(&product.id, quantity).await?.is_some() {
            return Ok(());
        }

        // Stock moved between validation and now.
        let current = self.catalog.require(&product.id).await?;
        log::warn!(
            "Stock of {} changed during checkout: wanted {}, available {}",
            current.id,
            quantity,
            current.quantity
        );
        Err(AppError::StockViolation {
            title: current.title,
            available: current.quantity,
        })
    }
}
