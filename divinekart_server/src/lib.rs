//! # DivineKart server
//! This module hosts the HTTP surface of the DivineKart storefront backend. It is responsible for:
//! * Registration and login, issuing access tokens.
//! * Checkout, including opening payment-gateway transactions for online orders.
//! * Client payment confirmation and inbound gateway webhooks, both of which reconcile order payment state.
//! * Order queries and administrative updates.
//!
//! ## Configuration
//! The server is configured via environment variables. See [config](config/index.html) for more information.
//!
//! ## Routes
//! * `/health`: a health check route that returns a 200 OK response.
//! * `/auth/register`, `/auth/login`: identity endpoints, open to the public.
//! * `/api/*`: authenticated storefront endpoints (checkout, payment confirmation, orders).
//! * `/webhook/razorpay`: the gateway webhook, guarded by HMAC signature verification over the raw body.

pub mod auth;
pub mod cli;
pub mod config;
pub mod data_objects;
pub mod errors;
pub mod integrations;
pub mod middleware;
pub mod routes;
pub mod server;
pub mod webhook_routes;

#[cfg(test)]
mod endpoint_tests;
