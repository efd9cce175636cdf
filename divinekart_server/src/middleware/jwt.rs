//! Access-token middleware.
//!
//! Wraps the authenticated API scope. Every request must carry `Authorization: Bearer <token>`; the decoded
//! [`JwtClaims`] are stored in the request extensions for the claims extractor and the ACL middleware.

use std::{
    future::{ready, Ready},
    rc::Rc,
};

use actix_web::{
    dev::{forward_ready, Service, ServiceRequest, ServiceResponse, Transform},
    Error,
    HttpMessage,
};
use futures::future::LocalBoxFuture;
use log::debug;

use crate::{
    auth::{extract_bearer_token, TokenVerifier},
    errors::{AuthError, ServerError},
};

pub struct JwtAuthMiddlewareFactory {
    verifier: TokenVerifier,
}

impl JwtAuthMiddlewareFactory {
    pub fn new(verifier: TokenVerifier) -> Self {
        Self { verifier }
    }
}

impl<S, B> Transform<S, ServiceRequest> for JwtAuthMiddlewareFactory
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Error = Error;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;
    type InitError = ();
    type Response = ServiceResponse<B>;
    type Transform = JwtAuthMiddlewareService<S>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(JwtAuthMiddlewareService { verifier: self.verifier.clone(), service: Rc::new(service) }))
    }
}

pub struct JwtAuthMiddlewareService<S> {
    verifier: TokenVerifier,
    service: Rc<S>,
}

impl<S, B> Service<ServiceRequest> for JwtAuthMiddlewareService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;
    type Response = ServiceResponse<B>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let service = Rc::clone(&self.service);
        let verifier = self.verifier.clone();
        Box::pin(async move {
            let token = req
                .headers()
                .get("Authorization")
                .and_then(|v| v.to_str().ok())
                .and_then(extract_bearer_token)
                .ok_or(ServerError::AuthenticationError(AuthError::MissingToken))?;
            let claims = verifier.decode(token).map_err(|e| {
                debug!("🔐️ Access token failed validation. {e}");
                ServerError::AuthenticationError(e)
            })?;
            req.extensions_mut().insert(claims);
            service.call(req).await
        })
    }
}
