// --- File: crates/paybridge_stripe/src/handlers.rs ---
use axum::{
    body::Bytes,
    extract::State,
    http::HeaderMap,
    response::Json,
};
use paybridge_common::{config_error, log_error, validation_error, AppJson, AppQuery, PaybridgeError};
use paybridge_config::StripeConfig;
use serde_json::Value;
use std::sync::Arc;
use tracing::{debug, error, info, warn};

use crate::logic;
use crate::models::{
    CheckoutSessionParams, CreateCheckoutSessionRequest, CreateCheckoutSessionResponse,
    CustomerIdQuery, CustomerRequest, ListParams, ListQuery, PaymentIdQuery, PaymentListParams,
    PaymentListQuery, ProductIdQuery, SubscriptionIdQuery, SubscriptionListParams,
    SubscriptionListQuery, WebhookAck,
};
use crate::service::StripeApi;
use crate::webhook::{construct_event, process_stripe_webhook, STRIPE_SIGNATURE_HEADER};

pub const WEBHOOK_PROCESSED: &str = "Webhook processed successfully";

// --- State for Stripe Handlers ---
#[derive(Clone)]
pub struct StripeState {
    pub api: Arc<dyn StripeApi>,
    pub config: Arc<StripeConfig>,
}

// --- Checkout ---

/// Creates a subscription Checkout Session and returns its hosted URL.
#[axum::debug_handler]
#[cfg_attr(feature = "openapi", utoipa::path(
    post,
    path = "/stripe/checkout",
    request_body = CreateCheckoutSessionRequest,
    responses(
        (status = 200, description = "Stripe Checkout Session created", body = CreateCheckoutSessionResponse),
        (status = 400, description = "Missing price_id, success_url or cancel_url"),
        (status = 500, description = "Stripe API error")
    ),
    tag = "Stripe"
))]
pub async fn create_checkout_session_handler(
    State(state): State<Arc<StripeState>>,
    AppJson(payload): AppJson<CreateCheckoutSessionRequest>,
) -> Result<Json<CreateCheckoutSessionResponse>, PaybridgeError> {
    let params = CheckoutSessionParams::try_from(payload)?;
    let response = logic::create_checkout_session(state.api.as_ref(), params)
        .await
        .inspect_err(|e| log_error(e, "Failed to create Stripe Checkout Session"))?;
    Ok(Json(response))
}

// --- Customer ---

#[axum::debug_handler]
#[cfg_attr(feature = "openapi", utoipa::path(
    get,
    path = "/stripe/customer",
    params(CustomerIdQuery),
    responses(
        (status = 200, description = "The Stripe customer record"),
        (status = 400, description = "customer_id is required"),
        (status = 500, description = "Stripe API error")
    ),
    tag = "Stripe Customers"
))]
pub async fn get_customer_handler(
    State(state): State<Arc<StripeState>>,
    AppQuery(query): AppQuery<CustomerIdQuery>,
) -> Result<Json<Value>, PaybridgeError> {
    let customer_id = query.require()?;
    let customer = logic::get_customer(state.api.as_ref(), &customer_id)
        .await
        .inspect_err(|e| log_error(e, "Failed to retrieve Stripe customer"))?;
    Ok(Json(customer))
}

#[axum::debug_handler]
#[cfg_attr(feature = "openapi", utoipa::path(
    post,
    path = "/stripe/customer",
    request_body = CustomerRequest,
    responses(
        (status = 200, description = "The created Stripe customer"),
        (status = 500, description = "Stripe API error")
    ),
    tag = "Stripe Customers"
))]
pub async fn create_customer_handler(
    State(state): State<Arc<StripeState>>,
    AppJson(payload): AppJson<CustomerRequest>,
) -> Result<Json<Value>, PaybridgeError> {
    let customer = logic::create_customer(state.api.as_ref(), payload.into())
        .await
        .inspect_err(|e| log_error(e, "Failed to create Stripe customer"))?;
    let customer_id = customer.get("id").and_then(Value::as_str).unwrap_or("<unknown>");
    info!("[Stripe] Created customer {}", customer_id);
    Ok(Json(customer))
}

#[axum::debug_handler]
#[cfg_attr(feature = "openapi", utoipa::path(
    put,
    path = "/stripe/customer",
    params(CustomerIdQuery),
    request_body = CustomerRequest,
    responses(
        (status = 200, description = "The updated Stripe customer"),
        (status = 400, description = "customer_id is required"),
        (status = 500, description = "Stripe API error")
    ),
    tag = "Stripe Customers"
))]
pub async fn update_customer_handler(
    State(state): State<Arc<StripeState>>,
    AppQuery(query): AppQuery<CustomerIdQuery>,
    payload: Result<AppJson<CustomerRequest>, PaybridgeError>,
) -> Result<Json<Value>, PaybridgeError> {
    // The target customer is checked before the body is looked at.
    let customer_id = query.require()?;
    let AppJson(payload) = payload?;
    let customer = logic::update_customer(state.api.as_ref(), &customer_id, payload.into())
        .await
        .inspect_err(|e| log_error(e, "Failed to update Stripe customer"))?;
    Ok(Json(customer))
}

#[axum::debug_handler]
#[cfg_attr(feature = "openapi", utoipa::path(
    get,
    path = "/stripe/customer/subscriptions",
    params(CustomerIdQuery),
    responses(
        (status = 200, description = "Up to 100 subscriptions of the customer"),
        (status = 400, description = "customer_id is required"),
        (status = 500, description = "Stripe API error")
    ),
    tag = "Stripe Customers"
))]
pub async fn get_customer_subscriptions_handler(
    State(state): State<Arc<StripeState>>,
    AppQuery(query): AppQuery<CustomerIdQuery>,
) -> Result<Json<Vec<Value>>, PaybridgeError> {
    let customer_id = query.require()?;
    let subscriptions = logic::get_customer_subscriptions(state.api.as_ref(), &customer_id)
        .await
        .inspect_err(|e| log_error(e, "Failed to list customer subscriptions"))?;
    Ok(Json(subscriptions))
}

#[axum::debug_handler]
#[cfg_attr(feature = "openapi", utoipa::path(
    get,
    path = "/stripe/customer/payments",
    params(CustomerIdQuery),
    responses(
        (status = 200, description = "Up to 100 payment intents of the customer"),
        (status = 400, description = "customer_id is required"),
        (status = 500, description = "Stripe API error")
    ),
    tag = "Stripe Customers"
))]
pub async fn get_customer_payments_handler(
    State(state): State<Arc<StripeState>>,
    AppQuery(query): AppQuery<CustomerIdQuery>,
) -> Result<Json<Vec<Value>>, PaybridgeError> {
    let customer_id = query.require()?;
    let payments = logic::get_customer_payments(state.api.as_ref(), &customer_id)
        .await
        .inspect_err(|e| log_error(e, "Failed to list customer payments"))?;
    Ok(Json(payments))
}

// --- Payments ---

#[axum::debug_handler]
#[cfg_attr(feature = "openapi", utoipa::path(
    get,
    path = "/stripe/payments",
    params(PaymentIdQuery),
    responses(
        (status = 200, description = "The Stripe payment intent"),
        (status = 400, description = "payment_id is required"),
        (status = 500, description = "Stripe API error")
    ),
    tag = "Stripe Payments"
))]
pub async fn get_payment_handler(
    State(state): State<Arc<StripeState>>,
    AppQuery(query): AppQuery<PaymentIdQuery>,
) -> Result<Json<Value>, PaybridgeError> {
    let payment_id = query.require()?;
    let payment = logic::get_payment(state.api.as_ref(), &payment_id)
        .await
        .inspect_err(|e| log_error(e, "Failed to retrieve Stripe payment intent"))?;
    Ok(Json(payment))
}

#[axum::debug_handler]
#[cfg_attr(feature = "openapi", utoipa::path(
    get,
    path = "/stripe/payments/list",
    params(PaymentListQuery),
    responses(
        (status = 200, description = "Payment intents, optionally filtered by customer"),
        (status = 400, description = "Invalid limit"),
        (status = 500, description = "Stripe API error")
    ),
    tag = "Stripe Payments"
))]
pub async fn list_payments_handler(
    State(state): State<Arc<StripeState>>,
    AppQuery(query): AppQuery<PaymentListQuery>,
) -> Result<Json<Vec<Value>>, PaybridgeError> {
    let params = PaymentListParams::try_from(query)?;
    let payments = logic::list_payments(state.api.as_ref(), params)
        .await
        .inspect_err(|e| log_error(e, "Failed to list Stripe payment intents"))?;
    Ok(Json(payments))
}

// --- Products ---

#[axum::debug_handler]
#[cfg_attr(feature = "openapi", utoipa::path(
    get,
    path = "/stripe/products",
    params(ListQuery),
    responses(
        (status = 200, description = "Stripe products"),
        (status = 400, description = "Invalid limit"),
        (status = 500, description = "Stripe API error")
    ),
    tag = "Stripe Products"
))]
pub async fn get_products_handler(
    State(state): State<Arc<StripeState>>,
    AppQuery(query): AppQuery<ListQuery>,
) -> Result<Json<Vec<Value>>, PaybridgeError> {
    let params = ListParams::try_from(query)?;
    let products = logic::get_products(state.api.as_ref(), params)
        .await
        .inspect_err(|e| log_error(e, "Failed to list Stripe products"))?;
    Ok(Json(products))
}

#[axum::debug_handler]
#[cfg_attr(feature = "openapi", utoipa::path(
    get,
    path = "/stripe/products/product",
    params(ProductIdQuery),
    responses(
        (status = 200, description = "The Stripe product"),
        (status = 400, description = "product_id is required"),
        (status = 500, description = "Stripe API error")
    ),
    tag = "Stripe Products"
))]
pub async fn get_product_handler(
    State(state): State<Arc<StripeState>>,
    AppQuery(query): AppQuery<ProductIdQuery>,
) -> Result<Json<Value>, PaybridgeError> {
    let product_id = query.require()?;
    let product = logic::get_product(state.api.as_ref(), &product_id)
        .await
        .inspect_err(|e| log_error(e, "Failed to retrieve Stripe product"))?;
    Ok(Json(product))
}

// --- Subscriptions ---

#[axum::debug_handler]
#[cfg_attr(feature = "openapi", utoipa::path(
    get,
    path = "/stripe/subscriptions",
    params(SubscriptionIdQuery),
    responses(
        (status = 200, description = "The Stripe subscription"),
        (status = 400, description = "subscription_id is required"),
        (status = 500, description = "Stripe API error")
    ),
    tag = "Stripe Subscriptions"
))]
pub async fn get_subscription_handler(
    State(state): State<Arc<StripeState>>,
    AppQuery(query): AppQuery<SubscriptionIdQuery>,
) -> Result<Json<Value>, PaybridgeError> {
    let subscription_id = query.require()?;
    let subscription = logic::get_subscription(state.api.as_ref(), &subscription_id)
        .await
        .inspect_err(|e| log_error(e, "Failed to retrieve Stripe subscription"))?;
    Ok(Json(subscription))
}

#[axum::debug_handler]
#[cfg_attr(feature = "openapi", utoipa::path(
    get,
    path = "/stripe/subscriptions/list",
    params(SubscriptionListQuery),
    responses(
        (status = 200, description = "Subscriptions of the customer"),
        (status = 400, description = "customer_id is required or invalid limit"),
        (status = 500, description = "Stripe API error")
    ),
    tag = "Stripe Subscriptions"
))]
pub async fn list_subscriptions_handler(
    State(state): State<Arc<StripeState>>,
    AppQuery(query): AppQuery<SubscriptionListQuery>,
) -> Result<Json<Vec<Value>>, PaybridgeError> {
    let params = SubscriptionListParams::try_from(query)?;
    let subscriptions = logic::list_subscriptions(state.api.as_ref(), params)
        .await
        .inspect_err(|e| log_error(e, "Failed to list Stripe subscriptions"))?;
    Ok(Json(subscriptions))
}

// --- Webhook ---
// Stripe posts here server-to-server. The body is taken as raw bytes so the
// signature is checked over exactly what was sent.
#[axum::debug_handler]
#[cfg_attr(feature = "openapi", utoipa::path(
    post,
    path = "/stripe/webhook",
    params(("Stripe-Signature" = String, Header, description = "t=<unix>,v1=<hex HMAC-SHA256>")),
    responses(
        (status = 200, description = "Webhook verified and processed", body = WebhookAck),
        (status = 400, description = "Missing or invalid signature"),
        (status = 500, description = "Webhook secret not configured or processing failed")
    ),
    tag = "Stripe Webhooks"
))]
pub async fn stripe_webhook_handler(
    State(state): State<Arc<StripeState>>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Json<WebhookAck>, PaybridgeError> {
    info!("Received Stripe webhook ({} bytes)", body.len());

    let sig_header = headers
        .get(STRIPE_SIGNATURE_HEADER)
        .and_then(|h| h.to_str().ok())
        .ok_or_else(|| {
            warn!("Stripe webhook rejected: missing Stripe-Signature header");
            validation_error("Missing Stripe signature")
        })?;

    let secret = state
        .config
        .webhook_secret
        .as_deref()
        .filter(|s| !s.is_empty())
        .ok_or_else(|| {
            error!("STRIPE_WEBHOOK_SECRET is not configured; cannot verify webhook");
            config_error("Webhook secret not configured")
        })?;

    let event = construct_event(&body, sig_header, secret, state.config.webhook_tolerance_secs)
        .inspect_err(|e| log_error(e, "Stripe webhook verification failed"))?;

    let outcome = process_stripe_webhook(&event)
        .inspect_err(|e| log_error(e, "Stripe webhook processing failed"))?;
    debug!(event_id = %event.id, outcome = ?outcome, "Stripe webhook dispatched");

    Ok(Json(WebhookAck {
        message: WEBHOOK_PROCESSED.to_string(),
    }))
}
