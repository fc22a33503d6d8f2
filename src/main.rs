use std::sync::Arc;

use actix_web::middleware::Logger;
use actix_web::{web, App, HttpServer};

use axiom_shop::auth::TokenKeys;
use axiom_shop::config::{Config, StoreBackend};
use axiom_shop::middleware::AuthMiddleware;
use axiom_shop::store::{MemoryStore, MongoStore, Store};
use axiom_shop::{routes, AppState};

async fn open_store(config: &Config) -> std::io::Result<Arc<dyn Store>> {
    match config.backend {
        StoreBackend::Memory => {
            log::warn!("Using in-memory store; data is lost on exit");
            Ok(Arc::new(MemoryStore::new()))
        }
        StoreBackend::Mongo => {
            let url = config.database_url.as_deref().unwrap_or_default();
            let store = MongoStore::connect(url, &config.database_name)
                .await
                .map_err(std::io::Error::other)?;
            Ok(Arc::new(store))
        }
    }
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    dotenv::dotenv().ok();
    env_logger::init();

    let config = Config::from_env().map_err(|e| {
        log::error!("Configuration error: {}", e);
        std::io::Error::other(e)
    })?;

    let store = open_store(&config).await?;
    let tokens = Arc::new(TokenKeys::new(&config.jwt_secret, config.token_ttl_hours));
    let state = web::Data::new(AppState::new(store, tokens.clone()));

    let (host, port) = config.bind_address();
    log::info!("Server listening on http://{}:{}", host, port);

    HttpServer::new(move || {
        App::new()
            .app_data(state.clone())
            .wrap(AuthMiddleware::new(tokens.clone()))
            .wrap(Logger::default())
            .configure(routes::configure)
    })
    .bind((host, port))?
    .run()
    .await
}
