use actix_web::{http::StatusCode, test::TestRequest, web, web::ServiceConfig};
use divinekart_engine::{db_types::PaymentStatus, traits::GatewayError, OrderFlowApi};
use serde_json::json;

use super::{
    helpers::{api_request, bearer, customer_token},
    mocks::{paid_order, sample_order, sample_product, FakeGateway, MockStorefront},
};
use crate::routes::CheckoutRoute;

fn checkout_body(payment_method: &str) -> serde_json::Value {
    json!({
        "customer": { "name": "Jane Shopper", "email": "jane@example.com" },
        "payment_method": payment_method,
        "items": [{ "id": "P1", "quantity": 2 }],
        "shipping": 0
    })
}

fn configure_cod(cfg: &mut ServiceConfig) {
    let mut db = MockStorefront::new();
    db.expect_fetch_products_by_ids().returning(|_| Ok(vec![sample_product("P1", 10_000)]));
    db.expect_insert_order().returning(|new_order| {
        let mut order = paid_order(42);
        order.payment_method = new_order.payment_method;
        order.gateway_order_ref = new_order.gateway_order_ref;
        order.gateway_payment_ref = None;
        order.gateway_signature = None;
        Ok(order)
    });
    cfg.service(CheckoutRoute::<MockStorefront, FakeGateway>::new())
        .app_data(web::Data::new(OrderFlowApi::new(db)))
        .app_data(web::Data::new(FakeGateway::ok()));
}

fn configure_online(cfg: &mut ServiceConfig) {
    let mut db = MockStorefront::new();
    db.expect_fetch_products_by_ids().returning(|_| Ok(vec![sample_product("P1", 10_000)]));
    db.expect_insert_order().returning(|new_order| {
        assert_eq!(new_order.payment_status, PaymentStatus::Unpaid);
        assert!(new_order.gateway_order_ref.is_some(), "online order persisted without a gateway reference");
        Ok(sample_order(42))
    });
    cfg.service(CheckoutRoute::<MockStorefront, FakeGateway>::new())
        .app_data(web::Data::new(OrderFlowApi::new(db)))
        .app_data(web::Data::new(FakeGateway::ok()));
}

fn configure_gateway_down(cfg: &mut ServiceConfig) {
    let mut db = MockStorefront::new();
    db.expect_fetch_products_by_ids().returning(|_| Ok(vec![sample_product("P1", 10_000)]));
    // No insert_order expectation: persisting after a gateway failure would panic the test.
    cfg.service(CheckoutRoute::<MockStorefront, FakeGateway>::new())
        .app_data(web::Data::new(OrderFlowApi::new(db)))
        .app_data(web::Data::new(FakeGateway::failing(GatewayError::Unavailable("connection refused".into()))));
}

fn configure_unknown_product(cfg: &mut ServiceConfig) {
    let mut db = MockStorefront::new();
    db.expect_fetch_products_by_ids().returning(|_| Ok(vec![]));
    cfg.service(CheckoutRoute::<MockStorefront, FakeGateway>::new())
        .app_data(web::Data::new(OrderFlowApi::new(db)))
        .app_data(web::Data::new(FakeGateway::ok()));
}

#[actix_web::test]
async fn checkout_requires_a_token() {
    let _ = env_logger::try_init().ok();
    let req = TestRequest::post().uri("/checkout").set_json(checkout_body("COD"));
    let (status, _) = api_request(req, configure_cod).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[actix_web::test]
async fn cod_checkout_returns_the_paid_order() {
    let _ = env_logger::try_init().ok();
    let token = customer_token(42);
    let req = TestRequest::post()
        .uri("/checkout")
        .insert_header(bearer(&token))
        .set_json(checkout_body("COD"));
    let (status, body) = api_request(req, configure_cod).await;
    assert_eq!(status, StatusCode::CREATED, "body: {body}");
    assert!(body.contains(r#""gateway":null"#), "COD must not carry gateway params: {body}");
    assert!(body.contains(r#""payment_status":"Paid""#), "unexpected body: {body}");
}

#[actix_web::test]
async fn online_checkout_returns_gateway_parameters() {
    let _ = env_logger::try_init().ok();
    let token = customer_token(42);
    let req = TestRequest::post()
        .uri("/checkout")
        .insert_header(bearer(&token))
        .set_json(checkout_body("Online"));
    let (status, body) = api_request(req, configure_online).await;
    assert_eq!(status, StatusCode::CREATED, "body: {body}");
    assert!(body.contains(r#""key":"rzp_test_fake""#), "unexpected body: {body}");
    assert!(body.contains(r#""transaction_ref":"order_9A33XWu170gUtm""#), "unexpected body: {body}");
    // 2 × ₹100.00 + 7% tax, in paise
    assert!(body.contains(r#""amount":21400"#), "unexpected body: {body}");
}

#[actix_web::test]
async fn empty_item_list_is_rejected() {
    let _ = env_logger::try_init().ok();
    let token = customer_token(42);
    let body = json!({
        "customer": { "name": "Jane Shopper", "email": "jane@example.com" },
        "payment_method": "COD",
        "items": []
    });
    let req = TestRequest::post().uri("/checkout").insert_header(bearer(&token)).set_json(body);
    let (status, _) = api_request(req, |cfg| {
        let db = MockStorefront::new();
        cfg.service(CheckoutRoute::<MockStorefront, FakeGateway>::new())
            .app_data(web::Data::new(OrderFlowApi::new(db)))
            .app_data(web::Data::new(FakeGateway::ok()));
    })
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[actix_web::test]
async fn unknown_product_is_rejected() {
    let _ = env_logger::try_init().ok();
    let token = customer_token(42);
    let req = TestRequest::post()
        .uri("/checkout")
        .insert_header(bearer(&token))
        .set_json(checkout_body("COD"));
    let (status, body) = api_request(req, configure_unknown_product).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body.contains("products not found"), "unexpected body: {body}");
}

#[actix_web::test]
async fn gateway_outage_aborts_checkout() {
    let _ = env_logger::try_init().ok();
    let token = customer_token(42);
    let req = TestRequest::post()
        .uri("/checkout")
        .insert_header(bearer(&token))
        .set_json(checkout_body("Online"));
    let (status, _) = api_request(req, configure_gateway_down).await;
    assert_eq!(status, StatusCode::BAD_GATEWAY);
}
