use actix_web::{
    body::MessageBody,
    http::StatusCode,
    test,
    test::TestRequest,
    web::ServiceConfig,
    App,
};
use dk_common::Secret;
use divinekart_engine::db_types::{Role, User};
use log::debug;

use crate::{
    auth::{TokenIssuer, TokenVerifier},
    config::AuthConfig,
    endpoint_tests::mocks::sample_user,
    middleware::JwtAuthMiddlewareFactory,
};

// Creates a test `AuthConfig` for issuing tokens. DO NOT re-use this secret anywhere.
pub fn get_auth_config() -> AuthConfig {
    AuthConfig { jwt_secret: Secret::new("0123456789abcdef0123456789abcdef-endpoint-tests".to_string()) }
}

pub fn issue_token_for(user: &User) -> String {
    TokenIssuer::new(&get_auth_config()).issue_token(user).expect("Failed to sign token")
}

pub fn customer_token(user_id: i64) -> String {
    issue_token_for(&sample_user(user_id, Role::Customer))
}

pub fn admin_token(user_id: i64) -> String {
    issue_token_for(&sample_user(user_id, Role::Admin))
}

/// Run a request against an app wrapping `configure`d routes with the JWT middleware, the way the `/api` scope is
/// mounted in the real server. Errors are rendered to their HTTP responses so tests can assert on status codes.
pub async fn api_request(req: TestRequest, configure: fn(&mut ServiceConfig)) -> (StatusCode, String) {
    let verifier = TokenVerifier::new(&get_auth_config());
    let app = App::new().wrap(JwtAuthMiddlewareFactory::new(verifier)).configure(configure);
    let service = test::init_service(app).await;
    debug!("Making API request");
    render(test::try_call_service(&service, req.to_request()).await).await
}

/// Run a request against an app with no auth middleware, the way the public routes are mounted.
pub async fn public_request(req: TestRequest, configure: fn(&mut ServiceConfig)) -> (StatusCode, String) {
    let app = App::new().configure(configure);
    let service = test::init_service(app).await;
    debug!("Making public request");
    render(test::try_call_service(&service, req.to_request()).await).await
}

async fn render<B>(result: Result<actix_web::dev::ServiceResponse<B>, actix_web::Error>) -> (StatusCode, String)
where
    B: MessageBody,
    B::Error: std::fmt::Debug,
{
    match result {
        Ok(res) => {
            let status = res.status();
            let body = test::read_body(res).await;
            (status, String::from_utf8_lossy(&body).into_owned())
        },
        Err(e) => {
            let res = e.as_response_error().error_response();
            let status = res.status();
            let body = actix_web::body::to_bytes(res.into_body()).await.unwrap_or_default();
            (status, String::from_utf8_lossy(&body).into_owned())
        },
    }
}

pub fn bearer(token: &str) -> (&'static str, String) {
    ("Authorization", format!("Bearer {token}"))
}
