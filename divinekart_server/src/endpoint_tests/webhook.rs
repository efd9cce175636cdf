use actix_web::{http::StatusCode, test, test::TestRequest, web, App};
use dk_common::Secret;
use divinekart_engine::{helpers::hmac_sha256_hex, OrderFlowApi};
use serde_json::json;

use super::mocks::{paid_order, MockStorefront};
use crate::{
    middleware::HmacMiddlewareFactory,
    server::WEBHOOK_SIGNATURE_HEADER,
    webhook_routes::RazorpayWebhookRoute,
};

const WEBHOOK_SECRET: &str = "whsec_endpoint_tests";

/// Build the webhook scope exactly as the server mounts it: HMAC middleware over the raw body, then the handler.
async fn send_webhook(
    db: MockStorefront,
    secret: &str,
    body: String,
    signature: Option<String>,
) -> (StatusCode, String) {
    let scope = web::scope("/webhook")
        .wrap(HmacMiddlewareFactory::new(WEBHOOK_SIGNATURE_HEADER, Secret::new(secret.to_string())))
        .service(RazorpayWebhookRoute::<MockStorefront>::new());
    let app = App::new().app_data(web::Data::new(OrderFlowApi::new(db))).service(scope);
    let service = test::init_service(app).await;
    let mut req = TestRequest::post().uri("/webhook/razorpay").set_payload(body);
    if let Some(signature) = signature {
        req = req.insert_header((WEBHOOK_SIGNATURE_HEADER, signature));
    }
    match test::try_call_service(&service, req.to_request()).await {
        Ok(res) => {
            let status = res.status();
            let body = String::from_utf8_lossy(&test::read_body(res).await).into_owned();
            (status, body)
        },
        Err(e) => {
            let res = e.as_response_error().error_response();
            (res.status(), String::new())
        },
    }
}

fn payment_captured_body() -> String {
    json!({
        "event": "payment.captured",
        "payload": {
            "payment": {
                "entity": {
                    "id": "pay_29QQoUBi66xm2f",
                    "order_id": "order_9A33XWu170gUtm",
                    "amount": 21400
                }
            }
        }
    })
    .to_string()
}

#[actix_web::test]
async fn webhook_without_signature_is_rejected() {
    let _ = env_logger::try_init().ok();
    let (status, _) = send_webhook(MockStorefront::new(), WEBHOOK_SECRET, payment_captured_body(), None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[actix_web::test]
async fn webhook_with_wrong_signature_is_rejected() {
    let _ = env_logger::try_init().ok();
    let body = payment_captured_body();
    let signature = hmac_sha256_hex("not the webhook secret", body.as_bytes());
    // No mock expectations: a forged delivery must never reach the reconciler.
    let (status, _) = send_webhook(MockStorefront::new(), WEBHOOK_SECRET, body, Some(signature)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[actix_web::test]
async fn webhook_without_configured_secret_is_a_configuration_error() {
    let _ = env_logger::try_init().ok();
    let body = payment_captured_body();
    let signature = hmac_sha256_hex(WEBHOOK_SECRET, body.as_bytes());
    let (status, _) = send_webhook(MockStorefront::new(), "", body, Some(signature)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[actix_web::test]
async fn authentic_payment_captured_event_reconciles_the_order() {
    let _ = env_logger::try_init().ok();
    let mut db = MockStorefront::new();
    db.expect_mark_paid_by_gateway_ref().returning(|gw_ref, payment_ref, signature| {
        assert_eq!(gw_ref, "order_9A33XWu170gUtm");
        assert_eq!(payment_ref.as_deref(), Some("pay_29QQoUBi66xm2f"));
        assert_eq!(signature, None);
        Ok(Some(paid_order(42)))
    });
    let body = payment_captured_body();
    let signature = hmac_sha256_hex(WEBHOOK_SECRET, body.as_bytes());
    let (status, body) = send_webhook(db, WEBHOOK_SECRET, body, Some(signature)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, r#"{"received":true}"#);
}

#[actix_web::test]
async fn authentic_event_for_unknown_order_is_still_acknowledged() {
    let _ = env_logger::try_init().ok();
    let mut db = MockStorefront::new();
    db.expect_mark_paid_by_gateway_ref().returning(|_, _, _| Ok(None));
    let body = payment_captured_body();
    let signature = hmac_sha256_hex(WEBHOOK_SECRET, body.as_bytes());
    let (status, body) = send_webhook(db, WEBHOOK_SECRET, body, Some(signature)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, r#"{"received":true}"#);
}

#[actix_web::test]
async fn unknown_event_types_are_accepted_and_ignored() {
    let _ = env_logger::try_init().ok();
    // No mock expectations: ignoring an event must not touch any order.
    let body = json!({ "event": "refund.processed", "payload": {} }).to_string();
    let signature = hmac_sha256_hex(WEBHOOK_SECRET, body.as_bytes());
    let (status, body) = send_webhook(MockStorefront::new(), WEBHOOK_SECRET, body, Some(signature)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, r#"{"received":true}"#);
}
