use actix_web::{web, HttpResponse};
use serde_json::json;

use crate::error::AppError;
use crate::middleware::RequesterId;
use crate::models::ProductInput;
use crate::services::catalog::PRODUCT_MISSING;
use crate::state::AppState;
use crate::validation;

pub async fn list(state: web::Data<AppState>) -> Result<HttpResponse, AppError> {
    let products = state.catalog.list().await?;
    Ok(HttpResponse::Ok().json(json!({ "products": products })))
}

pub async fn get(state: web::Data<AppState>, id: web::Path<String>) -> Result<HttpResponse, AppError> {
    match state.catalog.find(&id).await? {
        Some(product) => Ok(HttpResponse::Ok().json(json!({ "product": product }))),
        None => Err(AppError::not_found(PRODUCT_MISSING)),
    }
}

pub async fn create(
    state: web::Data<AppState>,
    requester: RequesterId,
    body: web::Json<ProductInput>,
) -> Result<HttpResponse, AppError> {
    let draft = validation::product(&body)?;
    let product = state.catalog.create(requester.as_str(), draft).await?;
    Ok(HttpResponse::Ok().json(json!({ "product": product })))
}

pub async fn update(
    state: web::Data<AppState>,
    requester: RequesterId,
    id: web::Path<String>,
    body: web::Json<ProductInput>,
) -> Result<HttpResponse, AppError> {
    let draft = validation::product(&body)?;
    let product = state.catalog.update(&id, requester.as_str(), draft).await?;
    Ok(HttpResponse::Ok().json(json!({ "product": product })))
}

pub async fn delete(
    state: web::Data<AppState>,
    requester: RequesterId,
    id: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    state.catalog.delete(&id, requester.as_str()).await?;
    Ok(HttpResponse::Ok().json(json!({ "msg": "Product removed" })))
}
