use std::collections::HashMap;
use std::sync::RwLock;

use async_trait::async_trait;

use super::{Store, StoreResult};
use crate::error::StoreError;
use crate::models::{Cart, CartItem, Order, OrderItem, Product, User};

#[derive(Default)]
struct Collections {
    users: HashMap<String, User>,
    products: HashMap<String, Product>,
    carts: HashMap<String, Cart>,
    orders: HashMap<String, Order>,
}

/// Process-local store. Each call takes the lock once, so every operation is
/// atomic on its own, which matches what a single document write gives on MongoDB.
#[derive(Default)]
pub struct MemoryStore {
    inner: RwLock<Collections>,
}

impl MemoryStore {
    pub fn new() -> Self {
        MemoryStore::default()
    }

    fn read<T>(&self, f: impl FnOnce(&Collections) -> T) -> StoreResult<T> {
        let guard = self
            .inner
            .read()
            .map_err(|_| StoreError::LockPoisoned("read"))?;
        Ok(f(&guard))
    }

    fn write<T>(&self, f: impl FnOnce(&mut Collections) -> T) -> StoreResult<T> {
        let mut guard = self
            .inner
            .write()
            .map_err(|_| StoreError::LockPoisoned("write"))?;
        Ok(f(&mut guard))
    }
}

#[async_trait]
impl Store for MemoryStore {
    async fn insert_user(&self, user: &User) -> StoreResult<()> {
        self.write(|c| {
            c.users.insert(user.id.clone(), user.clone());
        })
    }

    async fn find_user(&self, id: &str) -> StoreResult<Option<User>> {
        self.read(|c| c.users.get(id).cloned())
    }

    async fn find_user_by_email(&self, email: &str) -> StoreResult<Option<User>> {
        self.read(|c| c.users.values().find(|u| u.email == email).cloned())
    }

    async fn insert_product(&self, product: &Product) -> StoreResult<()> {
        self.write(|c| {
            c.products.insert(product.id.clone(), product.clone());
        })
    }

    async fn find_product(&self, id: &str) -> StoreResult<Option<Product>> {
        self.read(|c| c.products.get(id).cloned())
    }

    async fn list_products(&self) -> StoreResult<Vec<Product>> {
        self.read(|c| {
            let mut products: Vec<Product> = c.products.values().cloned().collect();
            products.sort_by(|a, b| b.created_at.cmp(&a.created_at));
            products
        })
    }

    async fn replace_product(&self, product: &Product) -> StoreResult<bool> {
        self.write(|c| match c.products.get_mut(&product.id) {
            Some(stored) => {
                *stored = product.clone();
                true
            }
            None => false,
        })
    }

    async fn delete_product(&self, id: &str) -> StoreResult<bool> {
        self.write(|c| c.products.remove(id).is_some())
    }

    async fn decrement_stock(&self, id: &str, amount: i64) -> StoreResult<Option<Product>> {
        self.write(|c| match c.products.get_mut(id) {
            Some(product) if product.quantity >= amount => {
                product.quantity -= amount;
                Some(product.clone())
            }
            _ => None,
        })
    }

    async fn insert_cart(&self, cart: &Cart) -> StoreResult<()> {
        self.write(|c| {
            c.carts.insert(cart.id.clone(), cart.clone());
        })
    }

    async fn find_cart(&self, id: &str) -> StoreResult<Option<Cart>> {
        self.read(|c| c.carts.get(id).cloned())
    }

    async fn find_cart_by_owner(&self, owner_id: &str) -> StoreResult<Option<Cart>> {
        self.read(|c| c.carts.values().find(|cart| cart.owner_id == owner_id).cloned())
    }

    async fn set_cart_products(&self, cart_id: &str, products: &[CartItem]) -> StoreResult<Option<Cart>> {
        self.write(|c| {
            c.carts.get_mut(cart_id).map(|cart| {
                cart.products = products.to_vec();
                cart.clone()
            })
        })
    }

    async fn delete_cart(&self, id: &str) -> StoreResult<bool> {
        self.write(|c| c.carts.remove(id).is_some())
    }

    async fn find_order_by_owner(&self, owner_id: &str) -> StoreResult<Option<Order>> {
        self.read(|c| c.orders.get(owner_id).cloned())
    }

    async fn append_order_item(&self, owner_id: &str, item: &OrderItem) -> StoreResult<Order> {
        self.write(|c| {
            let order = c
                .orders
                .entry(owner_id.to_string())
                .or_insert_with(|| Order::new(owner_id));
            order.products.push(item.clone());
            order.clone()
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ProductDraft;

    fn lamp(stock: i64) -> Product {
        Product::new(
            "seller",
            ProductDraft {
                title: "Lamp".into(),
                description: None,
                price: 12.0,
                quantity: stock,
            },
        )
    }

    #[actix_web::test]
    async fn decrement_refuses_to_go_negative() {
        let store = MemoryStore::new();
        let product = lamp(3);
        store.insert_product(&product).await.unwrap();

        let after = store.decrement_stock(&product.id, 2).await.unwrap().unwrap();
        assert_eq!(after.quantity, 1);
        assert!(store.decrement_stock(&product.id, 2).await.unwrap().is_none());
        assert_eq!(store.find_product(&product.id).await.unwrap().unwrap().quantity, 1);
        assert!(store.decrement_stock("missing", 1).await.unwrap().is_none());
    }

    #[actix_web::test]
    async fn ledger_created_then_appended() {
        let store = MemoryStore::new();
        let item = OrderItem {
            product_id: "p".into(),
            quantity: 1,
            buyer_id: "u".into(),
            title: "Lamp".into(),
            price: 12.0,
        };
        let first = store.append_order_item("u", &item).await.unwrap();
        let second = store.append_order_item("u", &item).await.unwrap();
        assert_eq!(first.id, second.id);
        assert_eq!(second.products.len(), 2);
    }

    #[actix_web::test]
    async fn set_products_on_missing_cart_is_none() {
        let store = MemoryStore::new();
        assert!(store.set_cart_products("nope", &[]).await.unwrap().is_none());
    }
}
