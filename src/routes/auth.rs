use actix_web::{web, HttpResponse};
use serde_json::json;

use crate::error::AppError;
use crate::middleware::RequesterId;
use crate::models::{AuthResponse, SignInInput, SignUpInput};
use crate::state::AppState;
use crate::validation::Checker;

pub async fn register(state: web::Data<AppState>, body: web::Json<SignUpInput>) -> Result<HttpResponse, AppError> {
    let mut check = Checker::new();
    let name = check.required("name", body.name.as_deref(), "Name is required");
    let email = check.email("email", body.email.as_deref());
    let password = check.min_len(
        "password",
        body.password.as_deref(),
        6,
        "Please enter a password with 6 or more characters",
    );
    let (name, email, password) = check.finish(|| Some((name?, email?, password?)))?;

    let token = state.accounts.register(name, email, &password).await?;
    Ok(HttpResponse::Ok().json(AuthResponse { token }))
}

pub async fn login(state: web::Data<AppState>, body: web::Json<SignInInput>) -> Result<HttpResponse, AppError> {
    let mut check = Checker::new();
    let email = check.email("email", body.email.as_deref());
    let password = check.min_len("password", body.password.as_deref(), 1, "Password is required");
    let (email, password) = check.finish(|| Some((email?, password?)))?;

    let token = state.accounts.login(&email, &password).await?;
    Ok(HttpResponse::Ok().json(AuthResponse { token }))
}

pub async fn current_user(state: web::Data<AppState>, requester: RequesterId) -> Result<HttpResponse, AppError> {
    let user = state.accounts.profile(requester.as_str()).await?;
    Ok(HttpResponse::Ok().json(json!({ "user": user })))
}
