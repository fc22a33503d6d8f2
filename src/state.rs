use std::sync::Arc;

use crate::auth::TokenKeys;
use crate::services::{Accounts, CartService, Catalog, Checkout, OrderService};
use crate::store::Store;

/// Shared by every handler through `web::Data`. All services hold the same store handle.
pub struct AppState {
    pub accounts: Accounts,
    pub catalog: Catalog,
    pub carts: CartService,
    pub orders: OrderService,
    pub checkout: Checkout,
    pub tokens: Arc<TokenKeys>,
}

impl AppState {
    pub fn new(store: Arc<dyn Store>, tokens: Arc<TokenKeys>) -> Self {
        let catalog = Catalog::new(store.clone());
        let carts = CartService::new(store.clone(), catalog.clone());
        let orders = OrderService::new(store.clone());
        let checkout = Checkout::new(store.clone(), carts.clone(), catalog.clone(), orders.clone());
        let accounts = Accounts::new(store, carts.clone(), tokens.clone());

        AppState {
            accounts,
            catalog,
            carts,
            orders,
            checkout,
            tokens,
        }
    }
}
