//! Document persistence for users, products, carts and orders.
//!
//! Every service receives the store as an `Arc<dyn Store>` built once at startup.
//! Operations map one-to-one onto single-document reads and writes; nothing here
//! spans more than one document.

use async_trait::async_trait;

use crate::error::StoreError;
use crate::models::{Cart, CartItem, Order, OrderItem, Product, User};

pub mod memory;
pub mod mongo;

pub use memory::MemoryStore;
pub use mongo::MongoStore;

pub type StoreResult<T> = Result<T, StoreError>;

#[async_trait]
pub trait Store: Send + Sync {
    async fn insert_user(&self, user: &User) -> StoreResult<()>;
    async fn find_user(&self, id: &str) -> StoreResult<Option<User>>;
    async fn find_user_by_email(&self, email: &str) -> StoreResult<Option<User>>;

    async fn insert_product(&self, product: &Product) -> StoreResult<()>;
    async fn find_product(&self, id: &str) -> StoreResult<Option<Product>>;
    async fn list_products(&self) -> StoreResult<Vec<Product>>;
    /// Replaces the stored product with the same id. Returns false when none matched.
    async fn replace_product(&self, product: &Product) -> StoreResult<bool>;
    async fn delete_product(&self, id: &str) -> StoreResult<bool>;
    /// Takes `amount` units off the product's stock, only if at least that many remain.
    ///
    /// Returns the updated product, or `None` when the product is gone or short.
    async fn decrement_stock(&self, id: &str, amount: i64) -> StoreResult<Option<Product>>;

    async fn insert_cart(&self, cart: &Cart) -> StoreResult<()>;
    async fn find_cart(&self, id: &str) -> StoreResult<Option<Cart>>;
    async fn find_cart_by_owner(&self, owner_id: &str) -> StoreResult<Option<Cart>>;
    /// Overwrites the cart's line items and returns the cart as stored afterwards.
    async fn set_cart_products(&self, cart_id: &str, products: &[CartItem]) -> StoreResult<Option<Cart>>;
    async fn delete_cart(&self, id: &str) -> StoreResult<bool>;

    async fn find_order_by_owner(&self, owner_id: &str) -> StoreResult<Option<Order>>;
    /// Pushes `item` onto the owner's ledger, creating the ledger on first use.
    async fn append_order_item(&self, owner_id: &str, item: &OrderItem) -> StoreResult<Order>;
}
