//! Axiom: a small shop backend. Users, a seller-owned product catalog, one cart per
//! user, and checkout into a per-buyer order ledger, served as JSON over actix-web
//! on top of MongoDB.

pub mod auth;
pub mod config;
pub mod error;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;
pub mod state;
pub mod store;
pub mod validation;

pub use config::Config;
pub use error::{AppError, StoreError};
pub use state::AppState;
