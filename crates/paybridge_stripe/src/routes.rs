// --- File: crates/paybridge_stripe/src/routes.rs ---

use crate::handlers::{
    create_checkout_session_handler, create_customer_handler, get_customer_handler,
    get_customer_payments_handler, get_customer_subscriptions_handler, get_payment_handler,
    get_product_handler, get_products_handler, get_subscription_handler, list_payments_handler,
    list_subscriptions_handler, stripe_webhook_handler, update_customer_handler, StripeState,
};
use crate::service::StripeApi;
use axum::{
    routing::{get, post},
    Router,
};
use paybridge_config::StripeConfig;
use std::sync::Arc;

/// Creates a router containing all routes for the Stripe feature.
///
/// Paths are relative; the backend nests this under `/api`.
pub fn routes(api: Arc<dyn StripeApi>, config: Arc<StripeConfig>) -> Router {
    let stripe_state = Arc::new(StripeState { api, config });

    Router::new()
        .route("/stripe/checkout", post(create_checkout_session_handler))
        .route(
            "/stripe/customer",
            get(get_customer_handler)
                .post(create_customer_handler)
                .put(update_customer_handler),
        )
        .route(
            "/stripe/customer/subscriptions",
            get(get_customer_subscriptions_handler),
        )
        .route("/stripe/customer/payments", get(get_customer_payments_handler))
        .route("/stripe/payments", get(get_payment_handler))
        .route("/stripe/payments/list", get(list_payments_handler))
        .route("/stripe/products", get(get_products_handler))
        .route("/stripe/products/product", get(get_product_handler))
        .route("/stripe/subscriptions", get(get_subscription_handler))
        .route("/stripe/subscriptions/list", get(list_subscriptions_handler))
        .route("/stripe/webhook", post(stripe_webhook_handler))
        .with_state(stripe_state)
}
