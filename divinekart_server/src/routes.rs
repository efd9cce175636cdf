//! Request handler definitions
//!
//! Define each route and its handler here.
//! Handlers that are more than a line or two MUST go into a separate module. Keep this module neat and tidy 🙏
//!
//! A note about performance:
//! Since each worker thread processes its requests sequentially, handlers which block the current thread will cause
//! the current worker to stop processing new requests. For this reason, any long, non-cpu-bound operation (e.g.
//! I/O, database operations, etc.) should be expressed as futures or asynchronous functions. Async handlers get
//! executed concurrently by worker threads and thus don't block execution.

use actix_web::{get, web, HttpResponse, Responder};
use log::*;
use razorpay_tools::RazorpayConfig;
use serde_json::json;

use divinekart_engine::{
    db_types::{OrderId, Role},
    helpers::{confirmation_payload, verify_signature},
    order_objects::{CheckoutRequest, OrderQueryFilter, Pagination, PaymentConfirmation},
    traits::{PaymentGateway, StorefrontDatabase, UserManagement},
    AccountApi,
    AuthApi,
    LoginRequest,
    OrderFlowApi,
    RegisterRequest,
};

use crate::{
    auth::{JwtClaims, TokenIssuer},
    data_objects::{AuthResponse, JsonResponse, PublicUser, UpdateOrderParams},
    errors::ServerError,
};

// Web-actix cannot handle generics in handlers, so it's implemented manually using the `route!` macro
#[macro_export]
macro_rules! route {
    ($name:ident => $method:ident $path:literal impl $($bounds:ty),+) => {
        paste::paste! { pub struct [<$name:camel Route>]< $( [< T $bounds:camel> ],)+ >( $( core::marker::PhantomData<fn() -> [< T $bounds:camel> ] >,)+ );}
        paste::paste! { impl< $( [< T $bounds:camel> ],)+ > [<$name:camel Route>]< $( [< T $bounds:camel> ],)+ > {
            #[allow(clippy::new_without_default)]
            pub fn new() -> Self {
                Self($( core::marker::PhantomData::<fn() -> [< T $bounds:camel> ] >,)+)
            }
        }}
        paste::paste! { impl<$( [< T $bounds:camel >] , )+> actix_web::dev::HttpServiceFactory for [<$name:camel Route>]<$([<T $bounds:camel>],)+>
        where
            $([<T $bounds:camel>]: $bounds + 'static,)+
        {
            fn register(self, config: &mut actix_web::dev::AppService) {
                let res = actix_web::Resource::new($path)
                    .name(stringify!($name))
                    .guard(actix_web::guard::$method())
                    .to($name::< $( [< T $bounds:camel >], )+>);
                actix_web::dev::HttpServiceFactory::register(res, config);
            }
        }}
    };

    ($name:ident => $method:ident $path:literal impl $($bounds:ty),+ where requires [$($roles:ty),*])  => {
        paste::paste! { pub struct [<$name:camel Route>]<A>(core::marker::PhantomData<fn() -> A>);}
        paste::paste! { impl<A> [<$name:camel Route>]<A> {
            #[allow(clippy::new_without_default)]
            pub fn new() -> Self {
                Self(core::marker::PhantomData::<fn() -> A>)
            }
        }}
        paste::paste! { impl<A> actix_web::dev::HttpServiceFactory for [<$name:camel Route>]<A>
        where
            A: $($bounds)++ 'static,
        {
            fn register(self, config: &mut actix_web::dev::AppService) {
                let res = actix_web::Resource::new($path)
                    .name(stringify!($name))
                    .guard(actix_web::guard::$method())
                    .to($name::<A>)
                    .wrap($crate::middleware::AclMiddlewareFactory::new(&[$($roles),+]));
                actix_web::dev::HttpServiceFactory::register(res, config);
            }
        }}
    };
}

// ----------------------------------------------   Health  ----------------------------------------------------
#[get("/health")]
pub async fn health() -> impl Responder {
    trace!("💻️ Received health check request");
    HttpResponse::Ok().body("👍️\n")
}

//----------------------------------------------   Auth  ----------------------------------------------------

route!(register => Post "/auth/register" impl UserManagement);
/// Route handler for the registration endpoint.
///
/// Validates the submitted name, email and password, stores the new account with a hashed password, and responds
/// with a fresh access token so the client is logged in immediately.
pub async fn register<B: UserManagement>(
    body: web::Json<RegisterRequest>,
    api: web::Data<AuthApi<B>>,
    signer: web::Data<TokenIssuer>,
) -> Result<HttpResponse, ServerError> {
    let user = api.register(body.into_inner()).await?;
    let token = signer.issue_token(&user)?;
    Ok(HttpResponse::Created()
        .json(AuthResponse { success: true, token, user: PublicUser::from(user) }))
}

route!(login => Post "/auth/login" impl UserManagement);
/// Route handler for the login endpoint.
///
/// A failed login does not reveal whether the email exists; unknown email and wrong password produce the same
/// 401 response.
pub async fn login<B: UserManagement>(
    body: web::Json<LoginRequest>,
    api: web::Data<AuthApi<B>>,
    signer: web::Data<TokenIssuer>,
) -> Result<HttpResponse, ServerError> {
    let user = api.login(body.into_inner()).await?;
    let token = signer.issue_token(&user)?;
    Ok(HttpResponse::Ok().json(AuthResponse { success: true, token, user: PublicUser::from(user) }))
}

//----------------------------------------------   Checkout  ----------------------------------------------------

route!(checkout => Post "/checkout" impl StorefrontDatabase, PaymentGateway);
/// Route handler for the checkout endpoint.
///
/// Line items are priced from the catalog — never from the client — and for online payments the gateway
/// transaction is opened before anything is persisted, so a gateway failure leaves no order behind. The response
/// carries the gateway widget parameters for online orders.
pub async fn checkout<BDb, GPay>(
    claims: JwtClaims,
    body: web::Json<CheckoutRequest>,
    api: web::Data<OrderFlowApi<BDb>>,
    gateway: web::Data<GPay>,
) -> Result<HttpResponse, ServerError>
where
    BDb: StorefrontDatabase,
    GPay: PaymentGateway,
{
    let req = body.into_inner();
    debug!("💻️ Checkout request from user #{} with {} items", claims.sub, req.items.len());
    let result = api.place_order(claims.sub, req, gateway.get_ref()).await.map_err(|e| {
        debug!("💻️ Checkout failed. {e}");
        ServerError::from(e)
    })?;
    Ok(HttpResponse::Created().json(json!({
        "success": true,
        "order": result.order,
        "gateway": result.gateway,
    })))
}

//----------------------------------------------   Payment confirmation  -----------------------------------------

route!(confirm_payment => Post "/payment/confirm" impl StorefrontDatabase);
/// Route handler for the client-side payment confirmation endpoint.
///
/// The gateway hands the client a signature over `"{gateway_order_ref}|{gateway_payment_ref}"` when the payment
/// widget completes; the signature is verified here with the gateway key secret before any state is touched. On
/// success the order is reconciled to `Paid` — idempotently, since the webhook may have arrived first.
pub async fn confirm_payment<B: StorefrontDatabase>(
    body: web::Json<PaymentConfirmation>,
    api: web::Data<OrderFlowApi<B>>,
    gateway_config: web::Data<RazorpayConfig>,
) -> Result<HttpResponse, ServerError> {
    let confirmation = body.into_inner();
    if confirmation.gateway_order_ref.is_empty()
        || confirmation.gateway_payment_ref.is_empty()
        || confirmation.signature.is_empty()
    {
        return Err(ServerError::ValidationError("Missing payment verification fields".to_string()));
    }
    let secret = gateway_config.key_secret.reveal();
    if secret.is_empty() {
        return Err(ServerError::PaymentsNotConfigured);
    }
    let payload = confirmation_payload(&confirmation.gateway_order_ref, &confirmation.gateway_payment_ref);
    if !verify_signature(secret, payload.as_bytes(), &confirmation.signature) {
        warn!(
            "🔐️ Payment confirmation signature mismatch for gateway ref {}",
            confirmation.gateway_order_ref
        );
        return Err(ServerError::SignatureMismatch);
    }
    let order = api
        .reconcile_payment(
            &confirmation.gateway_order_ref,
            Some(&confirmation.gateway_payment_ref),
            Some(&confirmation.signature),
        )
        .await
        .map_err(|e| {
            debug!("💻️ Payment reconciliation failed. {e}");
            ServerError::from(e)
        })?
        .ok_or_else(|| ServerError::NoRecordFound("Order not found".to_string()))?;
    Ok(HttpResponse::Ok().json(json!({ "success": true, "order": order })))
}

//----------------------------------------------   Orders  ----------------------------------------------------

route!(orders => Get "/orders" impl StorefrontDatabase);
/// Route handler for the order listing endpoint.
///
/// Authenticated users see their own orders, newest first. Admin users see every order on the system through the
/// same route.
pub async fn orders<B: StorefrontDatabase>(
    claims: JwtClaims,
    pagination: web::Query<Pagination>,
    api: web::Data<AccountApi<B>>,
) -> Result<HttpResponse, ServerError> {
    let pagination = pagination.into_inner();
    if !pagination.is_valid() {
        return Err(ServerError::ValidationError("Invalid pagination parameters".to_string()));
    }
    debug!("💻️ GET orders for user #{} (page {})", claims.sub, pagination.page);
    let filter = if claims.is_admin() {
        OrderQueryFilter::default().with_pagination(pagination)
    } else {
        OrderQueryFilter::for_user(claims.sub).with_pagination(pagination)
    };
    let result = api.search_orders(filter).await.map_err(|e| {
        debug!("💻️ Could not fetch orders. {e}");
        ServerError::from(e)
    })?;
    Ok(HttpResponse::Ok().json(json!({
        "success": true,
        "orders": result.orders,
        "pagination": result.pagination,
    })))
}

route!(order_by_id => Get "/orders/{order_id}" impl StorefrontDatabase);
/// Use `/orders/{order_id}` to fetch a specific order by its public order id.
///
/// Authenticated users can fetch their own orders; any other order yields a 403 whether it exists or not. Admin
/// users can retrieve any order.
pub async fn order_by_id<B: StorefrontDatabase>(
    claims: JwtClaims,
    path: web::Path<OrderId>,
    api: web::Data<AccountApi<B>>,
) -> Result<HttpResponse, ServerError> {
    let order_id = path.into_inner();
    debug!("💻️ GET order_by_id({order_id})");
    let order = api
        .fetch_order(&order_id)
        .await
        .map_err(|e| {
            debug!("💻️ Could not fetch order. {e}");
            ServerError::from(e)
        })?
        .ok_or_else(|| ServerError::NoRecordFound("Order not found".to_string()))?;
    if !claims.is_admin() && order.user_id != claims.sub {
        return Err(ServerError::InsufficientPermissions("Access denied".to_string()));
    }
    Ok(HttpResponse::Ok().json(json!({ "success": true, "order": order })))
}

route!(update_order => Patch "/orders/{order_id}" impl StorefrontDatabase where requires [Role::Admin]);
/// Order updates are restricted to an explicit allow-list of mutable fields (fulfilment status, payment status,
/// delivery date, notes, shipping). Line items and computed prices are immutable once the order exists.
pub async fn update_order<B: StorefrontDatabase>(
    path: web::Path<OrderId>,
    body: web::Json<UpdateOrderParams>,
    api: web::Data<AccountApi<B>>,
) -> Result<HttpResponse, ServerError> {
    let order_id = path.into_inner();
    info!("💻️ Update order request for {order_id}");
    let order = api
        .update_order(&order_id, body.into_inner().into())
        .await
        .map_err(|e| {
            debug!("💻️ Could not update order. {e}");
            ServerError::from(e)
        })?
        .ok_or_else(|| ServerError::NoRecordFound("Order not found".to_string()))?;
    Ok(HttpResponse::Ok().json(json!({ "success": true, "order": order })))
}

route!(delete_order => Delete "/orders/{order_id}" impl StorefrontDatabase where requires [Role::Admin]);
/// Orders are deleted only by an explicit administrative action, independent of payment state.
pub async fn delete_order<B: StorefrontDatabase>(
    path: web::Path<OrderId>,
    api: web::Data<AccountApi<B>>,
) -> Result<HttpResponse, ServerError> {
    let order_id = path.into_inner();
    info!("💻️ Delete order request for {order_id}");
    let deleted = api.delete_order(&order_id).await.map_err(|e| {
        debug!("💻️ Could not delete order. {e}");
        ServerError::from(e)
    })?;
    if !deleted {
        return Err(ServerError::NoRecordFound("Order not found".to_string()));
    }
    Ok(HttpResponse::Ok().json(JsonResponse::success("Order deleted successfully")))
}
