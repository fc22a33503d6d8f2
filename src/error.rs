use actix_web::{http::StatusCode, HttpResponse, ResponseError};
use serde::Serialize;
use serde_json::json;
use thiserror::Error;

/// A single field-level validation failure, reported as `{param, msg}`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FieldError {
    pub param: String,
    pub msg: String,
}

impl FieldError {
    pub fn new(param: impl Into<String>, msg: impl Into<String>) -> Self {
        FieldError {
            param: param.into(),
            msg: msg.into(),
        }
    }
}

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("database error: {0}")]
    Database(#[from] mongodb::error::Error),

    #[error("document serialization failed: {0}")]
    Serialization(#[from] mongodb::bson::ser::Error),

    #[error("store lock poisoned during {0}")]
    LockPoisoned(&'static str),
}

#[derive(Debug, Error)]
pub enum AppError {
    #[error("validation failed")]
    Validation(Vec<FieldError>),

    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    Conflict(String),

    #[error("Product {title} has {available} units available only.")]
    StockViolation { title: String, available: i64 },

    #[error("Invalid Credentials")]
    InvalidCredentials,

    #[error("{0}")]
    Unauthorized(String),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error("internal error: {0}")]
    Internal(String),
}

impl AppError {
    pub fn not_found(msg: &str) -> Self {
        AppError::NotFound(msg.to_string())
    }

    pub fn unauthorized(msg: &str) -> Self {
        AppError::Unauthorized(msg.to_string())
    }
}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::Validation(_)
            | AppError::NotFound(_)
            | AppError::Conflict(_)
            | AppError::StockViolation { .. }
            | AppError::InvalidCredentials => StatusCode::BAD_REQUEST,
            AppError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            AppError::Store(_) | AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let body = match self {
            AppError::Validation(errors) => json!({ "errors": errors }),
            AppError::Store(_) | AppError::Internal(_) => {
                log::error!("Request failed: {}", self);
                json!({ "msg": "Server Error" })
            }
            _ => json!({ "msg": self.to_string() }),
        };
        HttpResponse::build(self.status_code()).json(body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::body::to_bytes;

    async fn body_of(err: AppError) -> serde_json::Value {
        let bytes = to_bytes(err.error_response().into_body()).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[actix_web::test]
    async fn stock_violation_names_product() {
        let err = AppError::StockViolation {
            title: "Lamp".into(),
            available: 3,
        };
        assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(
            body_of(err).await["msg"],
            "Product Lamp has 3 units available only."
        );
    }

    #[actix_web::test]
    async fn store_failures_hide_details() {
        let err = AppError::from(StoreError::LockPoisoned("read"));
        assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body_of(err).await, json!({ "msg": "Server Error" }));
    }

    #[actix_web::test]
    async fn validation_lists_fields() {
        let err = AppError::Validation(vec![FieldError::new("productID", "Please enter product ID.")]);
        let body = body_of(err).await;
        assert_eq!(body["errors"][0]["param"], "productID");
        assert_eq!(body["errors"][0]["msg"], "Please enter product ID.");
    }

    #[test]
    fn ownership_mismatch_is_401() {
        assert_eq!(
            AppError::unauthorized("User not authorized").status_code(),
            StatusCode::UNAUTHORIZED
        );
    }
}
