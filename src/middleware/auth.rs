use std::rc::Rc;

use actix_web::{
    body::EitherBody,
    dev::{forward_ready, Service, ServiceRequest, ServiceResponse, Transform},
    http::header::{HeaderValue, AUTHORIZATION},
    web, Error, HttpMessage,
};
use futures::future::{ready, LocalBoxFuture, Ready};

use crate::{
    error::{ApiError, INVALID_HEADER},
    middleware::auth_context::AuthenticatedUser,
    state::AppState,
};

const KEYWORD: &str = "Bearer";

/// Extract the key from an `Authorization` header.
///
/// `Ok(None)` means no credential was supplied and the request continues
/// anonymously. Anything other than exactly `Bearer <key>` is rejected.
pub fn bearer_key(header: Option<&HeaderValue>) -> Result<Option<String>, ApiError> {
    let header = match header {
        Some(h) if !h.is_empty() => h,
        _ => return Ok(None),
    };
    let invalid = || ApiError::Authentication(INVALID_HEADER.to_string());

    let value = header.to_str().map_err(|_| invalid())?;
    let parts: Vec<&str> = value.split_whitespace().collect();
    match parts.as_slice() {
        [scheme, key] if *scheme == KEYWORD => Ok(Some((*key).to_string())),
        _ => Err(invalid()),
    }
}

/// Resolves a bearer token to an [`AuthenticatedUser`] stored in the request
/// extensions. Requests without a header pass through unauthenticated.
pub struct BearerAuth;

impl<S, B> Transform<S, ServiceRequest> for BearerAuth
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Transform = BearerAuthService<S>;
    type InitError = ();
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(BearerAuthService {
            service: Rc::new(service),
        }))
    }
}

pub struct BearerAuthService<S> {
    service: Rc<S>,
}

impl<S, B> Service<ServiceRequest> for BearerAuthService<S>
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
        let service = Rc::clone(&self.service);

        Box::pin(async move {
            let key = match bearer_key(req.headers().get(AUTHORIZATION)) {
                Ok(Some(key)) => key,
                Ok(None) => return service.call(req).await.map(ServiceResponse::map_into_left_body),
                Err(err) => return Ok(req.error_response(err).map_into_right_body()),
            };

            let state = match req.app_data::<web::Data<AppState>>().cloned() {
                Some(state) => state,
                None => {
                    log::error!("AppState missing from app data");
                    return Ok(req.error_response(ApiError::Internal).map_into_right_body());
                }
            };

            match state.accounts.authenticate(&key).await {
                Ok((user, token)) => {
                    req.extensions_mut()
                        .insert(AuthenticatedUser { user, token });
                    service.call(req).await.map(ServiceResponse::map_into_left_body)
                }
                Err(err) => Ok(req.error_response(err).map_into_right_body()),
            }
        })
    }
}
