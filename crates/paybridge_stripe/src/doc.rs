// --- File: crates/paybridge_stripe/src/doc.rs ---
#![cfg(feature = "openapi")]
use utoipa::OpenApi;

use crate::handlers;
use crate::models::{
    CreateCheckoutSessionRequest, CreateCheckoutSessionResponse, CustomerRequest, WebhookAck,
};

#[derive(OpenApi)]
#[openapi(
    paths(
        handlers::create_checkout_session_handler,
        handlers::get_customer_handler,
        handlers::create_customer_handler,
        handlers::update_customer_handler,
        handlers::get_customer_subscriptions_handler,
        handlers::get_customer_payments_handler,
        handlers::get_payment_handler,
        handlers::list_payments_handler,
        handlers::get_products_handler,
        handlers::get_product_handler,
        handlers::get_subscription_handler,
        handlers::list_subscriptions_handler,
        handlers::stripe_webhook_handler
    ),
    components(
        schemas(
            CreateCheckoutSessionRequest,
            CreateCheckoutSessionResponse,
            CustomerRequest,
            WebhookAck
        )
    ),
    tags(
        (name = "Stripe", description = "Stripe Checkout"),
        (name = "Stripe Customers", description = "Stripe customer records"),
        (name = "Stripe Payments", description = "Stripe payment intents"),
        (name = "Stripe Products", description = "Stripe product catalogue"),
        (name = "Stripe Subscriptions", description = "Stripe subscriptions"),
        (name = "Stripe Webhooks", description = "Stripe Server-to-Server Webhooks")
    )
)]
pub struct StripeApiDoc;
