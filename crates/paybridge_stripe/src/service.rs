//! The seam between the route layer and the Stripe REST API.
//!
//! Handlers only ever see `Arc<dyn StripeApi>`. The production implementation
//! is [`crate::client::StripeClient`]; tests use the generated `MockStripeApi`.

use async_trait::async_trait;
use serde_json::Value;

#[cfg(test)]
use mockall::automock;

use crate::error::StripeError;
use crate::models::{CheckoutSessionParams, CustomerFields, ListParams, StripeList};

/// One method per Stripe endpoint the service relays.
///
/// Records are returned as opaque JSON; nothing here inspects them.
#[cfg_attr(test, automock)]
#[async_trait]
pub trait StripeApi: Send + Sync {
    /// `GET /v1/products`
    async fn list_products(&self, params: ListParams) -> Result<StripeList, StripeError>;

    /// `GET /v1/products/{id}`
    async fn retrieve_product(&self, product_id: &str) -> Result<Value, StripeError>;

    /// `GET /v1/customers/{id}`
    async fn retrieve_customer(&self, customer_id: &str) -> Result<Value, StripeError>;

    /// `POST /v1/customers`
    async fn create_customer(&self, fields: CustomerFields) -> Result<Value, StripeError>;

    /// `POST /v1/customers/{id}`
    async fn update_customer(
        &self,
        customer_id: &str,
        fields: CustomerFields,
    ) -> Result<Value, StripeError>;

    /// `GET /v1/subscriptions?customer=...`
    async fn list_subscriptions(
        &self,
        customer_id: &str,
        params: ListParams,
    ) -> Result<StripeList, StripeError>;

    /// `GET /v1/subscriptions/{id}`
    async fn retrieve_subscription(&self, subscription_id: &str) -> Result<Value, StripeError>;

    /// `GET /v1/payment_intents`, optionally filtered by customer.
    async fn list_payment_intents(
        &self,
        customer_id: Option<String>,
        params: ListParams,
    ) -> Result<StripeList, StripeError>;

    /// `GET /v1/payment_intents/{id}`
    async fn retrieve_payment_intent(&self, payment_intent_id: &str) -> Result<Value, StripeError>;

    /// `POST /v1/checkout/sessions`
    async fn create_checkout_session(
        &self,
        params: CheckoutSessionParams,
    ) -> Result<Value, StripeError>;
}
