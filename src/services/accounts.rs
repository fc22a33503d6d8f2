use std::sync::Arc;

use super::cart::CartService;
use crate::auth::{hash_password, verify_password, TokenKeys};
use crate::error::AppError;
use crate::models::{User, UserProfile};
use crate::store::Store;

#[derive(Clone)]
pub struct Accounts {
    store: Arc<dyn Store>,
    carts: CartService,
    tokens: Arc<TokenKeys>,
}

impl Accounts {
    pub fn new(store: Arc<dyn Store>, carts: CartService, tokens: Arc<TokenKeys>) -> Self {
        Accounts { store, carts, tokens }
    }

    /// Creates the user together with their empty cart and signs them in.
    pub async fn register(&self, name: String, email: String, password: &str) -> Result<String, AppError> {
        if self.store.find_user_by_email(&email).await?.is_some() {
            return Err(AppError::Conflict("User already exists".into()));
        }

        let user = User::new(name, email, hash_password(password)?);
        self.store.insert_user(&user).await?;
        self.carts.create(&user.id).await?;
        log::info!("Registered user {}", user.id);

        self.tokens.issue(&user.id)
    }

    pub async fn login(&self, email: &str, password: &str) -> Result<String, AppError> {
        let user = self
            .store
            .find_user_by_email(email)
            .await?
            .ok_or(AppError::InvalidCredentials)?;
        if !verify_password(&user.password, password) {
            return Err(AppError::InvalidCredentials);
        }
        self.tokens.issue(&user.id)
    }

    pub async fn profile(&self, user_id: &str) -> Result<UserProfile, AppError> {
        self.store
            .find_user(user_id)
            .await?
            .map(UserProfile::from)
            .ok_or_else(|| AppError::not_found("User does not exist."))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::catalog::Catalog;
    use crate::store::MemoryStore;

    fn accounts() -> (Accounts, CartService, Arc<TokenKeys>) {
        let store: Arc<dyn Store> = Arc::new(MemoryStore::new());
        let carts = CartService::new(store.clone(), Catalog::new(store.clone()));
        let tokens = Arc::new(TokenKeys::new("test-secret", 1));
        (Accounts::new(store, carts.clone(), tokens.clone()), carts, tokens)
    }

    #[actix_web::test]
    async fn register_sets_up_cart_and_signs_in() {
        let (accounts, carts, tokens) = accounts();
        let token = accounts
            .register("Ann".into(), "ann@example.com".into(), "secret1")
            .await
            .unwrap();

        let user_id = tokens.verify(&token).unwrap();
        assert!(carts.get(&user_id).await.unwrap().products.is_empty());
        assert_eq!(accounts.profile(&user_id).await.unwrap().email, "ann@example.com");
    }

    #[actix_web::test]
    async fn duplicate_email_rejected() {
        let (accounts, _, _) = accounts();
        accounts
            .register("Ann".into(), "ann@example.com".into(), "secret1")
            .await
            .unwrap();
        let err = accounts
            .register("Other".into(), "ann@example.com".into(), "secret2")
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Conflict(_)));
    }

    #[actix_web::test]
    async fn login_checks_password() {
        let (accounts, _, tokens) = accounts();
        accounts
            .register("Ann".into(), "ann@example.com".into(), "secret1")
            .await
            .unwrap();

        let token = accounts.login("ann@example.com", "secret1").await.unwrap();
        assert!(tokens.verify(&token).is_some());
        assert!(matches!(
            accounts.login("ann@example.com", "wrong").await.unwrap_err(),
            AppError::InvalidCredentials
        ));
        assert!(matches!(
            accounts.login("bob@example.com", "secret1").await.unwrap_err(),
            AppError::InvalidCredentials
        ));
    }
}
