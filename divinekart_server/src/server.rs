use std::time::Duration;

use actix_web::{dev::Server, http::KeepAlive, middleware::Logger, web, App, HttpServer};

use divinekart_engine::{AccountApi, AuthApi, OrderFlowApi, SqliteDatabase};

use crate::{
    auth::{TokenIssuer, TokenVerifier},
    config::ServerConfig,
    errors::ServerError,
    integrations::razorpay::RazorpayGateway,
    middleware::{HmacMiddlewareFactory, JwtAuthMiddlewareFactory},
    routes::{
        health,
        CheckoutRoute,
        ConfirmPaymentRoute,
        DeleteOrderRoute,
        LoginRoute,
        OrderByIdRoute,
        OrdersRoute,
        RegisterRoute,
        UpdateOrderRoute,
    },
    webhook_routes::RazorpayWebhookRoute,
};

/// The header the gateway uses to deliver webhook signatures.
pub const WEBHOOK_SIGNATURE_HEADER: &str = "X-Razorpay-Signature";

pub async fn run_server(config: ServerConfig) -> Result<(), ServerError> {
    let db = SqliteDatabase::new_with_url(&config.database_url, 25)
        .await
        .map_err(|e| ServerError::InitializeError(e.to_string()))?;
    let srv = create_server_instance(config, db)?;
    srv.await.map_err(|e| ServerError::Unspecified(e.to_string()))
}

pub fn create_server_instance(config: ServerConfig, db: SqliteDatabase) -> Result<Server, ServerError> {
    let gateway = RazorpayGateway::new(config.razorpay.clone())?;
    let (host, port) = (config.host.clone(), config.port);
    let srv = HttpServer::new(move || {
        let order_flow_api = OrderFlowApi::new(db.clone());
        let account_api = AccountApi::new(db.clone());
        let auth_api = AuthApi::new(db.clone());
        let jwt_signer = TokenIssuer::new(&config.auth);
        let jwt_verifier = TokenVerifier::new(&config.auth);
        let app = App::new()
            .wrap(Logger::new("%t (%D ms) %s %a %{Host}i %U").log_target("dks::access_log"))
            .app_data(web::Data::new(order_flow_api))
            .app_data(web::Data::new(account_api))
            .app_data(web::Data::new(auth_api))
            .app_data(web::Data::new(jwt_signer))
            .app_data(web::Data::new(gateway.clone()))
            .app_data(web::Data::new(config.razorpay.clone()));
        // Routes that require authentication
        let api_scope = web::scope("/api")
            .wrap(JwtAuthMiddlewareFactory::new(jwt_verifier))
            .service(CheckoutRoute::<SqliteDatabase, RazorpayGateway>::new())
            .service(ConfirmPaymentRoute::<SqliteDatabase>::new())
            .service(OrdersRoute::<SqliteDatabase>::new())
            .service(OrderByIdRoute::<SqliteDatabase>::new())
            .service(UpdateOrderRoute::<SqliteDatabase>::new())
            .service(DeleteOrderRoute::<SqliteDatabase>::new());
        // The HMAC middleware wraps *only* the webhook scope: it consumes the raw body bytes, verifies the
        // gateway signature over exactly those bytes, and re-injects them for the handler.
        let webhook_scope = web::scope("/webhook")
            .wrap(HmacMiddlewareFactory::new(WEBHOOK_SIGNATURE_HEADER, config.webhook_secret.clone()))
            .service(RazorpayWebhookRoute::<SqliteDatabase>::new());
        app.service(health)
            .service(RegisterRoute::<SqliteDatabase>::new())
            .service(LoginRoute::<SqliteDatabase>::new())
            .service(api_scope)
            .service(webhook_scope)
    })
    .keep_alive(KeepAlive::Timeout(Duration::from_secs(600)))
    .bind((host.as_str(), port))?
    .run();
    Ok(srv)
}
