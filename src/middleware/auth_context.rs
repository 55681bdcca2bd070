use std::future::{ready, Ready};

use actix_web::{dev::Payload, Error, FromRequest, HttpMessage, HttpRequest};

use crate::{
    error::ApiError,
    models::user::{ApiToken, User},
};

/// Identity resolved by [`crate::middleware::auth::BearerAuth`]. Extracting
/// it from an anonymous request fails with 401.
#[derive(Clone)]
pub struct AuthenticatedUser {
    pub user: User,
    pub token: ApiToken,
}

impl FromRequest for AuthenticatedUser {
    type Error = Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut Payload) -> Self::Future {
        match req.extensions().get::<AuthenticatedUser>() {
            Some(identity) => ready(Ok(identity.clone())),
            None => ready(Err(ApiError::unauthenticated().into())),
        }
    }
}
