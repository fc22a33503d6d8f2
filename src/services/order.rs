use std::sync::Arc;

use crate::error::AppError;
use crate::models::{Order, OrderItem};
use crate::store::Store;

/// Append-only purchase ledgers, one document per owner.
#[derive(Clone)]
pub struct OrderService {
    store: Arc<dyn Store>,
}

impl OrderService {
    pub fn new(store: Arc<dyn Store>) -> Self {
        OrderService { store }
    }

    pub async fn get(&self, owner_id: &str) -> Result<Option<Order>, AppError> {
        Ok(self.store.find_order_by_owner(owner_id).await?)
    }

    pub async fn append_purchase(&self, owner_id: &str, item: OrderItem) -> Result<Order, AppError> {
        let order = self.store.append_order_item(owner_id, &item).await?;
        log::debug!(
            "Ledger {} now holds {} purchase(s)",
            order.id,
            order.products.len()
        );
        Ok(order)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;

    fn purchase(product_id: &str, quantity: i64) -> OrderItem {
        OrderItem {
            product_id: product_id.into(),
            quantity,
            buyer_id: "buyer".into(),
            title: "Kettle".into(),
            price: 30.0,
        }
    }

    #[actix_web::test]
    async fn first_purchase_creates_ledger() {
        let orders = OrderService::new(Arc::new(MemoryStore::new()));
        assert!(orders.get("buyer").await.unwrap().is_none());

        let order = orders.append_purchase("buyer", purchase("k", 1)).await.unwrap();
        assert_eq!(order.owner_id, "buyer");
        assert_eq!(order.products, vec![purchase("k", 1)]);
    }

    #[actix_web::test]
    async fn later_purchases_append_in_order() {
        let orders = OrderService::new(Arc::new(MemoryStore::new()));
        orders.append_purchase("buyer", purchase("a", 1)).await.unwrap();
        orders.append_purchase("buyer", purchase("b", 2)).await.unwrap();

        let ledger = orders.get("buyer").await.unwrap().unwrap();
        let ids: Vec<&str> = ledger.products.iter().map(|p| p.product_id.as_str()).collect();
        assert_eq!(ids, ["a", "b"]);
    }
}
