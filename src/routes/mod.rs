use actix_web::{web, HttpResponse, Responder};
use serde_json::json;

use crate::error::{AppError, FieldError};

pub mod auth;
pub mod carts;
pub mod orders;
pub mod products;

async fn index() -> impl Responder {
    HttpResponse::Ok().json(json!({ "msg": "This is Axiom Ecommerce Platform." }))
}

/// Registers every route. Shared by `main` and the integration tests.
pub fn configure(cfg: &mut web::ServiceConfig) {
    let json = web::JsonConfig::default().error_handler(|err, _req| {
        AppError::Validation(vec![FieldError::new("body", err.to_string())]).into()
    });

    cfg.app_data(json)
        .route("/", web::get().to(index))
        .service(
            web::scope("/api/users").route("", web::post().to(auth::register)),
        )
        .service(
            web::scope("/api/auth")
                .route("", web::get().to(auth::current_user))
                .route("", web::post().to(auth::login)),
        )
        .service(
            web::scope("/api/products")
                .route("", web::get().to(products::list))
                .route("", web::post().to(products::create))
                .route("/{id}", web::get().to(products::get))
                .route("/{id}", web::put().to(products::update))
                .route("/{id}", web::delete().to(products::delete)),
        )
        .service(
            web::scope("/api/carts")
                .route("", web::get().to(carts::get))
                .route("", web::post().to(carts::add_item))
                // must precede "/{id}"
                .route("/buy", web::delete().to(carts::buy))
                .route("/{id}", web::put().to(carts::update))
                .route("/{id}", web::delete().to(carts::delete)),
        )
        .service(web::scope("/api/orders").route("", web::get().to(orders::get)));
}
