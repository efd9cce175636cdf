//! HMAC middleware for Actix Web.
//!
//! This module provides a middleware that checks the HMAC signature of incoming gateway webhook requests.
//!
//! Razorpay sends a HMAC-SHA256 signature in the `X-Razorpay-Signature` header, computed with the pre-shared
//! webhook secret over the raw request body bytes. The middleware extracts those exact bytes, verifies the
//! signature, and re-injects the bytes as the request payload — so the handler downstream deserializes precisely
//! what was verified, and no upstream JSON parsing can re-serialize the body out from under the signature.
//!
//! Wrap only the webhook scope with this middleware.

use std::{
    future::{ready, Ready},
    rc::Rc,
};

use actix_http::h1;
use actix_web::{
    dev::{forward_ready, Payload, Service, ServiceRequest, ServiceResponse, Transform},
    error::ErrorBadRequest,
    web,
    Error,
};
use dk_common::Secret;
use divinekart_engine::helpers::verify_signature;
use futures::future::LocalBoxFuture;
use log::{trace, warn};

pub struct HmacMiddlewareFactory {
    hmac_header: String,
    key: Secret<String>,
}

impl HmacMiddlewareFactory {
    pub fn new(hmac_header: &str, key: Secret<String>) -> Self {
        HmacMiddlewareFactory { hmac_header: hmac_header.into(), key }
    }
}

impl<S, B> Transform<S, ServiceRequest> for HmacMiddlewareFactory
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Error = Error;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;
    type InitError = ();
    type Response = ServiceResponse<B>;
    type Transform = HmacMiddlewareService<S>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(HmacMiddlewareService {
            hmac_header: self.hmac_header.clone(),
            key: self.key.clone(),
            service: Rc::new(service),
        }))
    }
}

pub struct HmacMiddlewareService<S> {
    hmac_header: String,
    key: Secret<String>,
    service: Rc<S>,
}

impl<S, B> Service<ServiceRequest> for HmacMiddlewareService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;
    type Response = ServiceResponse<B>;

    forward_ready!(service);

    fn call(&self, mut req: ServiceRequest) -> Self::Future {
        let service = Rc::clone(&self.service);
        let secret = self.key.reveal().clone();
        let hmac_header = self.hmac_header.clone();
        Box::pin(async move {
            trace!("🔐️ Checking HMAC for request");
            if secret.is_empty() {
                warn!("🔐️ Webhook secret is not configured. Rejecting webhook delivery.");
                return Err(ErrorBadRequest("Webhook secret not configured."));
            }
            let data = req.extract::<web::Bytes>().await.map_err(|e| {
                warn!("🔐️ Failed to extract request data: {:?}", e);
                ErrorBadRequest("Failed to extract request data.")
            })?;
            let signature = req.headers().get(&hmac_header).and_then(|v| v.to_str().ok()).ok_or_else(|| {
                warn!("🔐️ No HMAC signature found in request. Denying access.");
                ErrorBadRequest("No HMAC signature found.")
            })?;
            // The check must not reveal whether any order exists; a mismatch is the same terse 400 regardless.
            let validated = verify_signature(&secret, data.as_ref(), signature);
            if validated {
                trace!("🔐️ HMAC check for request ✅️");
                req.set_payload(bytes_to_payload(data));
                service.call(req).await
            } else {
                warn!("🔐️ Invalid HMAC signature found in request. Denying access.");
                Err(ErrorBadRequest("Invalid signature."))
            }
        })
    }
}

fn bytes_to_payload(buf: web::Bytes) -> Payload {
    let (_, mut pl) = h1::Payload::create(true);
    pl.unread_data(buf);
    Payload::from(pl)
}
