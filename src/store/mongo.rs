use async_trait::async_trait;
use chrono::Utc;
use futures::stream::TryStreamExt;
use mongodb::bson::{doc, to_bson};
use mongodb::options::{ClientOptions, FindOneAndUpdateOptions, FindOptions, ReturnDocument};
use mongodb::{Client, Collection, Database};
use uuid::Uuid;

use super::{Store, StoreResult};
use crate::models::{timestamp, Cart, CartItem, Order, OrderItem, Product, User};

#[derive(Clone)]
pub struct MongoStore {
    users: Collection<User>,
    products: Collection<Product>,
    carts: Collection<Cart>,
    orders: Collection<Order>,
}

impl MongoStore {
    pub async fn connect(database_url: &str, database_name: &str) -> StoreResult<Self> {
        let client_options = ClientOptions::parse(database_url).await?;
        let client = Client::with_options(client_options)?;
        log::info!("Using MongoDB database `{}`", database_name);
        Ok(Self::new(&client.database(database_name)))
    }

    pub fn new(db: &Database) -> Self {
        MongoStore {
            users: db.collection("users"),
            products: db.collection("products"),
            carts: db.collection("carts"),
            orders: db.collection("orders"),
        }
    }

    fn return_updated() -> FindOneAndUpdateOptions {
        FindOneAndUpdateOptions::builder()
            .return_document(ReturnDocument::After)
            .build()
    }
}

#[async_trait]
impl Store for MongoStore {
    async fn insert_user(&self, user: &User) -> StoreResult<()> {
        self.users.insert_one(user, None).await?;
        Ok(())
    }

    async fn find_user(&self, id: &str) -> StoreResult<Option<User>> {
        Ok(self.users.find_one(doc! { "_id": id }, None).await?)
    }

    async fn find_user_by_email(&self, email: &str) -> StoreResult<Option<User>> {
        Ok(self.users.find_one(doc! { "email": email }, None).await?)
    }

    async fn insert_product(&self, product: &Product) -> StoreResult<()> {
        self.products.insert_one(product, None).await?;
        Ok(())
    }

    async fn find_product(&self, id: &str) -> StoreResult<Option<Product>> {
        Ok(self.products.find_one(doc! { "_id": id }, None).await?)
    }

    async fn list_products(&self) -> StoreResult<Vec<Product>> {
        let options = FindOptions::builder().sort(doc! { "createdAt": -1 }).build();
        let cursor = self.products.find(None, options).await?;
        Ok(cursor.try_collect().await?)
    }

    async fn replace_product(&self, product: &Product) -> StoreResult<bool> {
        let result = self
            .products
            .replace_one(doc! { "_id": product.id.as_str() }, product, None)
            .await?;
        Ok(result.matched_count == 1)
    }

    async fn delete_product(&self, id: &str) -> StoreResult<bool> {
        let result = self.products.delete_one(doc! { "_id": id }, None).await?;
        Ok(result.deleted_count == 1)
    }

    async fn decrement_stock(&self, id: &str, amount: i64) -> StoreResult<Option<Product>> {
        let filter = doc! { "_id": id, "quantity": { "$gte": amount } };
        let update = doc! { "$inc": { "quantity": -amount } };
        log::debug!("Decrementing stock of {} by {}", id, amount);
        Ok(self
            .products
            .find_one_and_update(filter, update, Self::return_updated())
            .await?)
    }

    async fn insert_cart(&self, cart: &Cart) -> StoreResult<()> {
        self.carts.insert_one(cart, None).await?;
        Ok(())
    }

    async fn find_cart(&self, id: &str) -> StoreResult<Option<Cart>> {
        Ok(self.carts.find_one(doc! { "_id": id }, None).await?)
    }

    async fn find_cart_by_owner(&self, owner_id: &str) -> StoreResult<Option<Cart>> {
        Ok(self.carts.find_one(doc! { "ownerID": owner_id }, None).await?)
    }

    async fn set_cart_products(&self, cart_id: &str, products: &[CartItem]) -> StoreResult<Option<Cart>> {
        let update = doc! { "$set": { "products": to_bson(products)? } };
        Ok(self
            .carts
            .find_one_and_update(doc! { "_id": cart_id }, update, Self::return_updated())
            .await?)
    }

    async fn delete_cart(&self, id: &str) -> StoreResult<bool> {
        let result = self.carts.delete_one(doc! { "_id": id }, None).await?;
        Ok(result.deleted_count == 1)
    }

    async fn find_order_by_owner(&self, owner_id: &str) -> StoreResult<Option<Order>> {
        Ok(self.orders.find_one(doc! { "ownerID": owner_id }, None).await?)
    }

    async fn append_order_item(&self, owner_id: &str, item: &OrderItem) -> StoreResult<Order> {
        let update = doc! {
            "$push": { "products": to_bson(item)? },
            "$setOnInsert": {
                "_id": Uuid::new_v4().to_string(),
                "createdAt": timestamp::format(&Utc::now()),
            },
        };
        let options = FindOneAndUpdateOptions::builder()
            .upsert(true)
            .return_document(ReturnDocument::After)
            .build();

        let order = self
            .orders
            .find_one_and_update(doc! { "ownerID": owner_id }, update, options)
            .await?;
        // upsert with ReturnDocument::After always yields a document
        order.ok_or_else(|| mongodb::error::Error::custom("order upsert returned no document").into())
    }
}
