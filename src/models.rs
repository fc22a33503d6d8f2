use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

fn new_id() -> String {
    Uuid::new_v4().to_string()
}

/// `createdAt` as RFC 3339 in UTC with all nine fraction digits. Every value has
/// the same width, so the store's string ordering is also time ordering.
pub mod timestamp {
    use chrono::{DateTime, SecondsFormat, Utc};
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn format(at: &DateTime<Utc>) -> String {
        at.to_rfc3339_opts(SecondsFormat::Nanos, true)
    }

    pub fn serialize<S: Serializer>(at: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&format(at))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<DateTime<Utc>, D::Error> {
        let raw = String::deserialize(deserializer)?;
        DateTime::parse_from_rfc3339(&raw)
            .map(|at| at.with_timezone(&Utc))
            .map_err(serde::de::Error::custom)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    #[serde(rename = "_id")]
    pub id: String,
    pub name: String,
    pub email: String,
    pub password: String,
    #[serde(with = "timestamp")]
    pub created_at: DateTime<Utc>,
}

impl User {
    pub fn new(name: String, email: String, password_hash: String) -> Self {
        User {
            id: new_id(),
            name,
            email,
            password: password_hash,
            created_at: Utc::now(),
        }
    }
}

/// What the API exposes about a user. Never carries the password hash.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    #[serde(rename = "_id")]
    pub id: String,
    pub name: String,
    pub email: String,
    #[serde(with = "timestamp")]
    pub created_at: DateTime<Utc>,
}

impl From<User> for UserProfile {
    fn from(user: User) -> Self {
        UserProfile {
            id: user.id,
            name: user.name,
            email: user.email,
            created_at: user.created_at,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct SignUpInput {
    pub name: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct SignInInput {
    pub email: Option<String>,
    pub password: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String, // user id
    pub exp: usize,
}

#[derive(Debug, Serialize)]
pub struct AuthResponse {
    pub token: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    #[serde(rename = "_id")]
    pub id: String,
    #[serde(rename = "ownerID")]
    pub owner_id: String,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub price: f64,
    /// Units available for sale.
    pub quantity: i64,
    #[serde(with = "timestamp")]
    pub created_at: DateTime<Utc>,
}

impl Product {
    pub fn new(owner_id: &str, draft: ProductDraft) -> Self {
        Product {
            id: new_id(),
            owner_id: owner_id.to_string(),
            title: draft.title,
            description: draft.description,
            price: draft.price,
            quantity: draft.quantity,
            created_at: Utc::now(),
        }
    }
}

/// Raw product body; fields are checked by `validation` before use.
#[derive(Debug, Deserialize)]
pub struct ProductInput {
    pub title: Option<String>,
    pub description: Option<String>,
    pub price: Option<Value>,
    pub quantity: Option<Value>,
}

/// A validated product body.
#[derive(Debug, Clone, PartialEq)]
pub struct ProductDraft {
    pub title: String,
    pub description: Option<String>,
    pub price: f64,
    pub quantity: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartItem {
    #[serde(rename = "productID")]
    pub product_id: String,
    pub selected_quantity: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Cart {
    #[serde(rename = "_id")]
    pub id: String,
    #[serde(rename = "ownerID")]
    pub owner_id: String,
    #[serde(default)]
    pub products: Vec<CartItem>,
    #[serde(with = "timestamp")]
    pub created_at: DateTime<Utc>,
}

impl Cart {
    pub fn new(owner_id: &str) -> Self {
        Cart {
            id: new_id(),
            owner_id: owner_id.to_string(),
            products: Vec::new(),
            created_at: Utc::now(),
        }
    }

    pub fn position(&self, product_id: &str) -> Option<usize> {
        self.products
            .iter()
            .position(|item| item.product_id == product_id)
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartItemInput {
    #[serde(rename = "productID")]
    pub product_id: Option<String>,
    pub selected_quantity: Option<Value>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuantityInput {
    pub selected_quantity: Option<Value>,
}

#[derive(Debug, Deserialize)]
pub struct ReplaceCartInput {
    pub products: Option<Vec<CartItemInput>>,
}

/// One purchase event in an order ledger. Title and price are captured at the time of sale.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderItem {
    #[serde(rename = "productID")]
    pub product_id: String,
    pub quantity: i64,
    #[serde(rename = "buyerID")]
    pub buyer_id: String,
    pub title: String,
    pub price: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    #[serde(rename = "_id")]
    pub id: String,
    #[serde(rename = "ownerID")]
    pub owner_id: String,
    #[serde(default)]
    pub products: Vec<OrderItem>,
    #[serde(with = "timestamp")]
    pub created_at: DateTime<Utc>,
}

impl Order {
    pub fn new(owner_id: &str) -> Self {
        Order {
            id: new_id(),
            owner_id: owner_id.to_string(),
            products: Vec::new(),
            created_at: Utc::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};
    use serde_json::json;

    #[test]
    fn cart_uses_wire_field_names() {
        let mut cart = Cart::new("owner-1");
        cart.products.push(CartItem {
            product_id: "p-1".into(),
            selected_quantity: 2,
        });

        let value = serde_json::to_value(&cart).unwrap();
        assert_eq!(value["ownerID"], "owner-1");
        assert_eq!(value["products"][0]["productID"], "p-1");
        assert_eq!(value["products"][0]["selectedQuantity"], 2);
        assert!(value.get("_id").is_some());
        assert!(value.get("createdAt").is_some());
    }

    #[test]
    fn created_at_orders_as_text() {
        let whole = Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap();
        let later = whole + Duration::milliseconds(500);

        let earlier_text = timestamp::format(&whole);
        let later_text = timestamp::format(&later);
        assert_eq!(earlier_text, "2024-05-01T12:00:00.000000000Z");
        assert_eq!(earlier_text.len(), later_text.len());
        assert!(earlier_text < later_text);

        let mut cart = Cart::new("owner-1");
        cart.created_at = later;
        let value = serde_json::to_value(&cart).unwrap();
        assert_eq!(value["createdAt"], "2024-05-01T12:00:00.500000000Z");
        let back: Cart = serde_json::from_value(value).unwrap();
        assert_eq!(back.created_at, later);
    }

    #[test]
    fn profile_drops_password() {
        let user = User::new("Ann".into(), "ann@example.com".into(), "hash".into());
        let value = serde_json::to_value(UserProfile::from(user)).unwrap();
        assert!(value.get("password").is_none());
        assert_eq!(value["email"], "ann@example.com");
    }

    #[test]
    fn item_input_accepts_string_quantity() {
        let input: CartItemInput =
            serde_json::from_value(json!({"productID": "p", "selectedQuantity": "3"})).unwrap();
        assert_eq!(input.product_id.as_deref(), Some("p"));
        assert_eq!(input.selected_quantity, Some(json!("3")));
    }
}
