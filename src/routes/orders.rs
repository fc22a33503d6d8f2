use actix_web::{web, HttpResponse};
use serde_json::json;

use crate::error::AppError;
use crate::middleware::RequesterId;
use crate::state::AppState;

pub async fn get(state: web::Data<AppState>, requester: RequesterId) -> Result<HttpResponse, AppError> {
    match state.orders.get(requester.as_str()).await? {
        Some(order) => Ok(HttpResponse::Ok().json(json!({ "order": order }))),
        None => Err(AppError::not_found("No orders found.")),
    }
}
