//! Field checks for request bodies.
//!
//! Handlers collect every failing field before answering, so a client sees all
//! problems with a body at once as `{"errors": [...]}`.

use serde_json::Value;

use crate::error::{AppError, FieldError};
use crate::models::{CartItem, CartItemInput, ProductDraft, ProductInput};

pub const PRODUCT_ID_MSG: &str = "Please enter product ID.";
pub const QUANTITY_MSG: &str = "Please enter valid quantity.";

#[derive(Debug, Default)]
pub struct Checker {
    errors: Vec<FieldError>,
}

impl Checker {
    pub fn new() -> Self {
        Checker::default()
    }

    fn fail(&mut self, param: &str, msg: &str) {
        self.errors.push(FieldError::new(param, msg));
    }

    pub fn required(&mut self, param: &str, value: Option<&str>, msg: &str) -> Option<String> {
        match value.map(str::trim) {
            Some(v) if !v.is_empty() => Some(v.to_string()),
            _ => {
                self.fail(param, msg);
                None
            }
        }
    }

    pub fn email(&mut self, param: &str, value: Option<&str>) -> Option<String> {
        match value.map(str::trim) {
            Some(v) if looks_like_email(v) => Some(v.to_lowercase()),
            _ => {
                self.fail(param, "Please include a valid email");
                None
            }
        }
    }

    pub fn min_len(&mut self, param: &str, value: Option<&str>, min: usize, msg: &str) -> Option<String> {
        match value {
            Some(v) if v.chars().count() >= min => Some(v.to_string()),
            _ => {
                self.fail(param, msg);
                None
            }
        }
    }

    /// Integer no smaller than `min`, given as a JSON number or a numeric string.
    pub fn integer(&mut self, param: &str, value: Option<&Value>, min: i64, msg: &str) -> Option<i64> {
        match value.and_then(as_integer) {
            Some(n) if n >= min => Some(n),
            _ => {
                self.fail(param, msg);
                None
            }
        }
    }

    pub fn amount(&mut self, param: &str, value: Option<&Value>, msg: &str) -> Option<f64> {
        match value.and_then(as_number) {
            Some(n) if n.is_finite() && n >= 0.0 => Some(n),
            _ => {
                self.fail(param, msg);
                None
            }
        }
    }

    /// Ends the check, yielding `value` only when no field failed.
    pub fn finish<T>(self, value: impl FnOnce() -> Option<T>) -> Result<T, AppError> {
        if !self.errors.is_empty() {
            return Err(AppError::Validation(self.errors));
        }
        value().ok_or_else(|| AppError::Internal("validated value missing".into()))
    }
}

fn as_integer(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n.as_i64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

fn as_number(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

fn looks_like_email(value: &str) -> bool {
    match value.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty()
                && !domain.contains('@')
                && domain.contains('.')
                && !domain.starts_with('.')
                && !domain.ends_with('.')
        }
        None => false,
    }
}

pub fn cart_item(input: &CartItemInput) -> Result<CartItem, AppError> {
    let mut check = Checker::new();
    let product_id = check.required("productID", input.product_id.as_deref(), PRODUCT_ID_MSG);
    let quantity = check.integer("selectedQuantity", input.selected_quantity.as_ref(), 1, QUANTITY_MSG);
    check.finish(|| {
        Some(CartItem {
            product_id: product_id?,
            selected_quantity: quantity?,
        })
    })
}

pub fn selected_quantity(value: Option<&Value>) -> Result<i64, AppError> {
    let mut check = Checker::new();
    let quantity = check.integer("selectedQuantity", value, 1, QUANTITY_MSG);
    check.finish(|| quantity)
}

/// Validates a full replacement line list; entries are reported as `products[i].field`.
pub fn cart_items(inputs: Option<&[CartItemInput]>) -> Result<Vec<CartItem>, AppError> {
    let mut check = Checker::new();
    let Some(inputs) = inputs else {
        check.fail("products", "Please enter cart products.");
        return check.finish(|| None);
    };

    let mut items = Vec::with_capacity(inputs.len());
    for (i, input) in inputs.iter().enumerate() {
        let product_id = check.required(
            &format!("products[{i}].productID"),
            input.product_id.as_deref(),
            PRODUCT_ID_MSG,
        );
        let quantity = check.integer(
            &format!("products[{i}].selectedQuantity"),
            input.selected_quantity.as_ref(),
            1,
            QUANTITY_MSG,
        );
        if let (Some(product_id), Some(selected_quantity)) = (product_id, quantity) {
            items.push(CartItem {
                product_id,
                selected_quantity,
            });
        }
    }
    check.finish(|| Some(items))
}

pub fn product(input: &ProductInput) -> Result<ProductDraft, AppError> {
    let mut check = Checker::new();
    let title = check.required("title", input.title.as_deref(), "Please enter product title.");
    let price = check.amount("price", input.price.as_ref(), "Please enter valid price.");
    let quantity = check.integer("quantity", input.quantity.as_ref(), 0, "Please enter valid quantity.");
    let description = input
        .description
        .as_deref()
        .map(str::trim)
        .filter(|d| !d.is_empty())
        .map(str::to_string);
    check.finish(|| {
        Some(ProductDraft {
            title: title?,
            description,
            price: price?,
            quantity: quantity?,
        })
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn errors_of(err: AppError) -> Vec<FieldError> {
        match err {
            AppError::Validation(errors) => errors,
            other => panic!("expected validation error, got {other:?}"),
        }
    }

    #[test]
    fn cart_item_reports_both_fields() {
        let input = CartItemInput {
            product_id: Some("  ".into()),
            selected_quantity: Some(json!("abc")),
        };
        let errors = errors_of(cart_item(&input).unwrap_err());
        assert_eq!(
            errors,
            vec![
                FieldError::new("productID", PRODUCT_ID_MSG),
                FieldError::new("selectedQuantity", QUANTITY_MSG),
            ]
        );
    }

    #[test]
    fn quantity_must_be_positive_integer() {
        assert_eq!(selected_quantity(Some(&json!(4))).unwrap(), 4);
        assert_eq!(selected_quantity(Some(&json!(" 7 "))).unwrap(), 7);
        assert!(selected_quantity(Some(&json!(0))).is_err());
        assert!(selected_quantity(Some(&json!(-2))).is_err());
        assert!(selected_quantity(Some(&json!(1.5))).is_err());
        assert!(selected_quantity(None).is_err());
    }

    #[test]
    fn replacement_list_indexes_errors() {
        let inputs = vec![
            CartItemInput {
                product_id: Some("a".into()),
                selected_quantity: Some(json!(1)),
            },
            CartItemInput {
                product_id: None,
                selected_quantity: Some(json!(2)),
            },
        ];
        let errors = errors_of(cart_items(Some(&inputs)).unwrap_err());
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].param, "products[1].productID");

        assert!(cart_items(None).is_err());
        assert!(cart_items(Some(&[])).unwrap().is_empty());
    }

    #[test]
    fn product_body_allows_zero_stock() {
        let input = ProductInput {
            title: Some("Desk".into()),
            description: Some("".into()),
            price: Some(json!(19.5)),
            quantity: Some(json!(0)),
        };
        let draft = product(&input).unwrap();
        assert_eq!(draft.quantity, 0);
        assert_eq!(draft.price, 19.5);
        assert_eq!(draft.description, None);
    }

    #[test]
    fn email_shape() {
        assert!(looks_like_email("a@b.io"));
        assert!(!looks_like_email("a@b"));
        assert!(!looks_like_email("@b.io"));
        assert!(!looks_like_email("plain"));
        assert!(!looks_like_email("a@b@c.com"));
    }
}
