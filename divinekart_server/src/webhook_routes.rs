//----------------------------------------------   Webhooks  ----------------------------------------------------
//
// The gateway delivers events asynchronously and retries anything that does not answer with a 2xx. The HMAC
// middleware wrapping this scope has already verified the signature over the raw body bytes and re-injected them,
// so by the time a handler runs the delivery is authenticated. From that point on the response is *always*
// success: reconciliation finding no matching order is an expected race (the gateway may notify before the
// checkout response has returned), and the gateway must not be made to retry forever for an order that will never
// exist.

use actix_web::{web, HttpResponse};
use log::*;
use razorpay_tools::data_objects::WebhookEvent;

use divinekart_engine::{traits::StorefrontDatabase, OrderFlowApi};

use crate::{data_objects::WebhookAck, errors::ServerError, route};

route!(razorpay_webhook => Post "/razorpay" impl StorefrontDatabase);
pub async fn razorpay_webhook<B: StorefrontDatabase>(
    body: web::Bytes,
    api: web::Data<OrderFlowApi<B>>,
) -> Result<HttpResponse, ServerError> {
    let event: WebhookEvent = match serde_json::from_slice(&body) {
        Ok(event) => event,
        Err(e) => {
            // Authenticated but unparseable. Retrying cannot fix a malformed body, so acknowledge and move on.
            warn!("🛒️ Could not parse webhook event: {e}");
            return Ok(HttpResponse::Ok().json(WebhookAck::received()));
        },
    };
    match event.payment_refs() {
        Some(refs) => {
            debug!("🛒️ Webhook event {} for gateway ref {}", event.name(), refs.gateway_order_ref);
            let result = api
                .reconcile_payment(&refs.gateway_order_ref, refs.gateway_payment_ref.as_deref(), None)
                .await
                // A backend failure is the one case the gateway *should* retry, so let it become a 500.
                .map_err(|e| {
                    warn!("🛒️ Webhook reconciliation failed for {}: {e}", refs.gateway_order_ref);
                    ServerError::from(e)
                })?;
            match result {
                Some(order) => {
                    info!("🛒️ Webhook reconciled order {} as {}", order.order_id, order.payment_status);
                },
                None => {
                    info!(
                        "🛒️ Webhook for gateway ref {} matched no order. It may arrive with a later retry.",
                        refs.gateway_order_ref
                    );
                },
            }
        },
        None => {
            trace!("🛒️ Ignoring webhook event type {}", event.name());
        },
    }
    Ok(HttpResponse::Ok().json(WebhookAck::received()))
}
