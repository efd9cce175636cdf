use actix_web::{http::StatusCode, test::TestRequest, web, web::ServiceConfig};
use divinekart_engine::AccountApi;
use serde_json::json;

use super::{
    helpers::{admin_token, api_request, bearer, customer_token},
    mocks::{sample_order, MockStorefront},
};
use crate::routes::{DeleteOrderRoute, OrderByIdRoute, OrdersRoute, UpdateOrderRoute};

fn register_services(cfg: &mut ServiceConfig, db: MockStorefront) {
    cfg.service(OrdersRoute::<MockStorefront>::new())
        .service(OrderByIdRoute::<MockStorefront>::new())
        .service(UpdateOrderRoute::<MockStorefront>::new())
        .service(DeleteOrderRoute::<MockStorefront>::new())
        .app_data(web::Data::new(AccountApi::new(db)));
}

fn configure_listing_for_user(cfg: &mut ServiceConfig) {
    let mut db = MockStorefront::new();
    db.expect_fetch_orders().returning(|query| {
        // non-admin listings must be scoped to the requesting identity
        assert_eq!(query.user_id, Some(42));
        Ok(vec![sample_order(42)])
    });
    db.expect_count_orders().returning(|_| Ok(1));
    register_services(cfg, db);
}

fn configure_listing_for_admin(cfg: &mut ServiceConfig) {
    let mut db = MockStorefront::new();
    db.expect_fetch_orders().returning(|query| {
        // admins see every order on the system
        assert_eq!(query.user_id, None);
        Ok(vec![sample_order(42), sample_order(7)])
    });
    db.expect_count_orders().returning(|_| Ok(2));
    register_services(cfg, db);
}

fn configure_single_order(cfg: &mut ServiceConfig) {
    let mut db = MockStorefront::new();
    db.expect_fetch_order_by_order_id().returning(|_| Ok(Some(sample_order(42))));
    register_services(cfg, db);
}

fn configure_update(cfg: &mut ServiceConfig) {
    let mut db = MockStorefront::new();
    db.expect_update_order().returning(|_, update| {
        let mut order = sample_order(42);
        order.status = update.new_status.expect("status update missing");
        Ok(Some(order))
    });
    register_services(cfg, db);
}

fn configure_delete(cfg: &mut ServiceConfig) {
    let mut db = MockStorefront::new();
    db.expect_delete_order().returning(|_| Ok(true));
    register_services(cfg, db);
}

#[actix_web::test]
async fn listing_is_scoped_to_the_requesting_user() {
    let _ = env_logger::try_init().ok();
    let token = customer_token(42);
    let req = TestRequest::get().uri("/orders").insert_header(bearer(&token));
    let (status, body) = api_request(req, configure_listing_for_user).await;
    assert_eq!(status, StatusCode::OK, "body: {body}");
    assert!(body.contains(r#""total_pages":1"#), "unexpected body: {body}");
    assert!(body.contains(r#""user_id":42"#), "unexpected body: {body}");
}

#[actix_web::test]
async fn admins_list_all_orders() {
    let _ = env_logger::try_init().ok();
    let token = admin_token(1);
    let req = TestRequest::get().uri("/orders?page=1&limit=50").insert_header(bearer(&token));
    let (status, body) = api_request(req, configure_listing_for_admin).await;
    assert_eq!(status, StatusCode::OK, "body: {body}");
    assert!(body.contains(r#""user_id":7"#), "unexpected body: {body}");
    assert!(body.contains(r#""has_next":false"#), "unexpected body: {body}");
}

#[actix_web::test]
async fn oversized_page_limits_are_rejected() {
    let _ = env_logger::try_init().ok();
    let token = customer_token(42);
    let req = TestRequest::get().uri("/orders?page=1&limit=500").insert_header(bearer(&token));
    let (status, _) = api_request(req, |cfg| register_services(cfg, MockStorefront::new())).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[actix_web::test]
async fn owners_and_admins_can_read_an_order_but_strangers_cannot() {
    let _ = env_logger::try_init().ok();
    let owner = customer_token(42);
    let req = TestRequest::get().uri("/orders/ORD-0000001").insert_header(bearer(&owner));
    let (status, _) = api_request(req, configure_single_order).await;
    assert_eq!(status, StatusCode::OK);

    let admin = admin_token(1);
    let req = TestRequest::get().uri("/orders/ORD-0000001").insert_header(bearer(&admin));
    let (status, _) = api_request(req, configure_single_order).await;
    assert_eq!(status, StatusCode::OK);

    let stranger = customer_token(7);
    let req = TestRequest::get().uri("/orders/ORD-0000001").insert_header(bearer(&stranger));
    let (status, body) = api_request(req, configure_single_order).await;
    assert_eq!(status, StatusCode::FORBIDDEN, "body: {body}");
}

#[actix_web::test]
async fn updates_require_the_admin_role() {
    let _ = env_logger::try_init().ok();
    let token = customer_token(42);
    let req = TestRequest::patch()
        .uri("/orders/ORD-0000001")
        .insert_header(bearer(&token))
        .set_json(json!({ "status": "Shipped" }));
    let (status, _) = api_request(req, |cfg| register_services(cfg, MockStorefront::new())).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[actix_web::test]
async fn admin_update_applies_allow_listed_fields() {
    let _ = env_logger::try_init().ok();
    let token = admin_token(1);
    let req = TestRequest::patch()
        .uri("/orders/ORD-0000001")
        .insert_header(bearer(&token))
        .set_json(json!({ "status": "Shipped" }));
    let (status, body) = api_request(req, configure_update).await;
    assert_eq!(status, StatusCode::OK, "body: {body}");
    assert!(body.contains(r#""status":"Shipped""#), "unexpected body: {body}");
}

#[actix_web::test]
async fn delete_is_admin_only() {
    let _ = env_logger::try_init().ok();
    let token = customer_token(42);
    let req = TestRequest::delete().uri("/orders/ORD-0000001").insert_header(bearer(&token));
    let (status, _) = api_request(req, |cfg| register_services(cfg, MockStorefront::new())).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let token = admin_token(1);
    let req = TestRequest::delete().uri("/orders/ORD-0000001").insert_header(bearer(&token));
    let (status, body) = api_request(req, configure_delete).await;
    assert_eq!(status, StatusCode::OK, "body: {body}");
    assert!(body.contains("Order deleted successfully"), "unexpected body: {body}");
}
