use std::rc::Rc;
use std::sync::Arc;

use actix_service::{forward_ready, Service};
use actix_web::body::EitherBody;
use actix_web::dev::{Payload, ServiceRequest, ServiceResponse, Transform};
use actix_web::{Error, FromRequest, HttpMessage, HttpRequest, ResponseError};
use futures::future::{ok, ready, LocalBoxFuture, Ready};

use crate::auth::TokenKeys;
use crate::error::AppError;

/// Id of the user a request was authenticated as.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequesterId(pub String);

impl RequesterId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl FromRequest for RequesterId {
    type Error = AppError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        ready(
            req.extensions()
                .get::<RequesterId>()
                .cloned()
                .ok_or_else(|| AppError::unauthorized("No token, authorization denied")),
        )
    }
}

/// Resolves `Authorization: Bearer <token>` into a [`RequesterId`].
///
/// Requests without the header pass through anonymously and are turned away by
/// handlers that extract a `RequesterId`. A header that is present but not a
/// valid bearer token is answered with 401 right here.
pub struct AuthMiddleware {
    keys: Arc<TokenKeys>,
}

impl AuthMiddleware {
    pub fn new(keys: Arc<TokenKeys>) -> Self {
        AuthMiddleware { keys }
    }
}

impl<S, B> Transform<S, ServiceRequest> for AuthMiddleware
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Transform = AuthMiddlewareService<S>;
    type InitError = ();
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ok(AuthMiddlewareService {
            service: Rc::new(service),
            keys: self.keys.clone(),
        })
    }
}

pub struct AuthMiddlewareService<S> {
    service: Rc<S>,
    keys: Arc<TokenKeys>,
}

impl<S, B> Service<ServiceRequest> for AuthMiddlewareService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let keys = self.keys.clone();
        let service = self.service.clone();

        Box::pin(async move {
            let Some(header) = req.headers().get("Authorization") else {
                return service.call(req).await.map(ServiceResponse::map_into_left_body);
            };

            let requester = header
                .to_str()
                .ok()
                .and_then(|value| value.strip_prefix("Bearer "))
                .and_then(|token| keys.verify(token.trim()));

            match requester {
                Some(user_id) => {
                    req.extensions_mut().insert(RequesterId(user_id));
                    service.call(req).await.map(ServiceResponse::map_into_left_body)
                }
                None => {
                    log::debug!("Rejected bearer token on {}", req.path());
                    let response = AppError::unauthorized("Token is not valid").error_response();
                    Ok(req.into_response(response).map_into_right_body())
                }
            }
        })
    }
}
