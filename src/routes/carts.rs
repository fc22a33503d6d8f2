//! `/api/carts`: the requester's own cart, plus owner-only operations on a cart
//! addressed by its id.
//!
//! `PUT /{id}` and `DELETE /{id}` are shared between the two: when `{id}` names an
//! existing cart the cart-level operation runs, otherwise it is taken to be a
//! product id inside the requester's cart.

use actix_web::{web, HttpResponse};
use serde::de::DeserializeOwned;
use serde_json::{json, Value};

use crate::error::{AppError, FieldError};
use crate::middleware::RequesterId;
use crate::models::{Cart, CartItemInput, QuantityInput, ReplaceCartInput};
use crate::services::cart::ensure_owner;
use crate::state::AppState;
use crate::validation;

fn cart_response(cart: Cart) -> HttpResponse {
    HttpResponse::Ok().json(json!({ "cart": cart }))
}

fn parse_body<T: DeserializeOwned>(body: Value) -> Result<T, AppError> {
    serde_json::from_value(body)
        .map_err(|e| AppError::Validation(vec![FieldError::new("body", e.to_string())]))
}

pub async fn get(state: web::Data<AppState>, requester: RequesterId) -> Result<HttpResponse, AppError> {
    let cart = state.carts.get(requester.as_str()).await?;
    Ok(cart_response(cart))
}

pub async fn add_item(
    state: web::Data<AppState>,
    requester: RequesterId,
    body: web::Json<CartItemInput>,
) -> Result<HttpResponse, AppError> {
    let item = validation::cart_item(&body)?;
    // Check cart, product and stock, then append
    let cart = state.carts.add_item(requester.as_str(), item).await?;
    Ok(cart_response(cart))
}

pub async fn update(
    state: web::Data<AppState>,
    requester: RequesterId,
    id: web::Path<String>,
    body: web::Json<Value>,
) -> Result<HttpResponse, AppError> {
    let id = id.into_inner();
    let body = body.into_inner();

    let cart = if let Some(existing) = state.carts.find_by_id(&id).await? {
        // Check ownership before looking at the body
        ensure_owner(&existing, requester.as_str())?;
        let input: ReplaceCartInput = parse_body(body)?;
        let items = validation::cart_items(input.products.as_deref())?;
        state.carts.replace(&id, requester.as_str(), items).await?
    } else {
        // Not a cart id, so it names a product in the requester's cart
        let input: QuantityInput = parse_body(body)?;
        let quantity = validation::selected_quantity(input.selected_quantity.as_ref())?;
        state.carts.update_item(requester.as_str(), &id, quantity).await?
    };
    Ok(cart_response(cart))
}

pub async fn delete(
    state: web::Data<AppState>,
    requester: RequesterId,
    id: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    // Whole-cart delete when the id names a cart
    if state.carts.find_by_id(&id).await?.is_some() {
        state.carts.delete_cart(&id, requester.as_str()).await?;
        return Ok(HttpResponse::Ok().json(json!({ "msg": "Cart removed" })));
    }

    let cart = state.carts.remove_item(requester.as_str(), &id).await?;
    Ok(cart_response(cart))
}

pub async fn buy(state: web::Data<AppState>, requester: RequesterId) -> Result<HttpResponse, AppError> {
    let cart = state.checkout.buy(requester.as_str()).await?;
    Ok(cart_response(cart))
}
