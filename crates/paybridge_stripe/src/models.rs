// --- File: crates/paybridge_stripe/src/models.rs ---
//! Request shapes and the typed parameters they validate into.
//!
//! Every route first deserializes into a loose `*Request`/`*Query` struct
//! (all fields optional strings) and then converts it with `TryFrom` into
//! the parameters the facade takes. A failed conversion is a 400 and the
//! provider is never called.

use paybridge_common::{validation_error, PaybridgeError};
use serde::{Deserialize, Serialize};

#[cfg(feature = "openapi")]
use utoipa::{IntoParams, ToSchema};

/// Stripe accepts list page sizes between 1 and 100.
pub const MAX_LIST_LIMIT: u8 = 100;

const CHECKOUT_REQUIRED: &str = "price_id, success_url and cancel_url are required";
const INVALID_LIMIT: &str = "limit must be an integer between 1 and 100";

/// Treats absent and empty values the same way.
fn present(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}

fn required(value: Option<String>, field: &str) -> Result<String, PaybridgeError> {
    present(value).ok_or_else(|| validation_error(format!("{} is required", field)))
}

fn parse_limit(limit: Option<String>) -> Result<Option<u8>, PaybridgeError> {
    match present(limit) {
        None => Ok(None),
        Some(raw) => match raw.trim().parse::<u8>() {
            Ok(n) if (1..=MAX_LIST_LIMIT).contains(&n) => Ok(Some(n)),
            _ => Err(validation_error(INVALID_LIMIT)),
        },
    }
}

// --- Provider-facing parameters ---

/// Pagination for Stripe list calls.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListParams {
    pub limit: Option<u8>,
    pub starting_after: Option<String>,
}

/// Customer attributes for create and update. Absent fields are not sent.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CustomerFields {
    pub email: Option<String>,
    pub name: Option<String>,
    pub phone: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckoutSessionParams {
    pub price_id: String,
    pub success_url: String,
    pub cancel_url: String,
    pub customer_id: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaymentListParams {
    pub customer_id: Option<String>,
    pub list: ListParams,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubscriptionListParams {
    pub customer_id: String,
    pub list: ListParams,
}

/// The list object returned by the Stripe API.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
pub struct StripeListObject<T> {
    #[serde(default)]
    pub object: String, // "list"
    pub data: Vec<T>,
    #[serde(default)]
    pub has_more: bool,
    #[serde(default)]
    pub url: String,
}

pub type StripeList = StripeListObject<serde_json::Value>;

// --- Incoming request shapes ---

/// Body of `POST /stripe/checkout`.
#[derive(Deserialize, Debug, Default)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
pub struct CreateCheckoutSessionRequest {
    #[cfg_attr(feature = "openapi", schema(example = "price_123"))]
    pub price_id: Option<String>,
    #[cfg_attr(feature = "openapi", schema(example = "https://example.com/ok"))]
    pub success_url: Option<String>,
    #[cfg_attr(feature = "openapi", schema(example = "https://example.com/cancel"))]
    pub cancel_url: Option<String>,
    #[cfg_attr(feature = "openapi", schema(example = "cus_123"))]
    pub customer_id: Option<String>,
}

impl TryFrom<CreateCheckoutSessionRequest> for CheckoutSessionParams {
    type Error = PaybridgeError;

    fn try_from(req: CreateCheckoutSessionRequest) -> Result<Self, Self::Error> {
        match (present(req.price_id), present(req.success_url), present(req.cancel_url)) {
            (Some(price_id), Some(success_url), Some(cancel_url)) => Ok(CheckoutSessionParams {
                price_id,
                success_url,
                cancel_url,
                customer_id: present(req.customer_id),
            }),
            _ => Err(validation_error(CHECKOUT_REQUIRED)),
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
pub struct CreateCheckoutSessionResponse {
    #[cfg_attr(
        feature = "openapi",
        schema(example = "https://checkout.stripe.com/c/pay/cs_test_a1...")
    )]
    pub checkout_url: String,
}

/// Body of `POST /stripe/customer` and `PUT /stripe/customer`.
#[derive(Deserialize, Debug, Default)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
pub struct CustomerRequest {
    #[cfg_attr(feature = "openapi", schema(example = "jane@example.com"))]
    pub email: Option<String>,
    #[cfg_attr(feature = "openapi", schema(example = "Jane Doe"))]
    pub name: Option<String>,
    #[cfg_attr(feature = "openapi", schema(example = "+41790000000"))]
    pub phone_number: Option<String>,
}

impl From<CustomerRequest> for CustomerFields {
    fn from(req: CustomerRequest) -> Self {
        CustomerFields {
            email: present(req.email),
            name: present(req.name),
            phone: present(req.phone_number),
        }
    }
}

#[derive(Deserialize, Debug, Default)]
#[cfg_attr(feature = "openapi", derive(IntoParams))]
#[cfg_attr(feature = "openapi", into_params(parameter_in = Query))]
pub struct CustomerIdQuery {
    pub customer_id: Option<String>,
}

impl CustomerIdQuery {
    pub fn require(self) -> Result<String, PaybridgeError> {
        required(self.customer_id, "customer_id")
    }
}

#[derive(Deserialize, Debug, Default)]
#[cfg_attr(feature = "openapi", derive(IntoParams))]
#[cfg_attr(feature = "openapi", into_params(parameter_in = Query))]
pub struct PaymentIdQuery {
    pub payment_id: Option<String>,
}

impl PaymentIdQuery {
    pub fn require(self) -> Result<String, PaybridgeError> {
        required(self.payment_id, "payment_id")
    }
}

#[derive(Deserialize, Debug, Default)]
#[cfg_attr(feature = "openapi", derive(IntoParams))]
#[cfg_attr(feature = "openapi", into_params(parameter_in = Query))]
pub struct ProductIdQuery {
    pub product_id: Option<String>,
}

impl ProductIdQuery {
    pub fn require(self) -> Result<String, PaybridgeError> {
        required(self.product_id, "product_id")
    }
}

#[derive(Deserialize, Debug, Default)]
#[cfg_attr(feature = "openapi", derive(IntoParams))]
#[cfg_attr(feature = "openapi", into_params(parameter_in = Query))]
pub struct SubscriptionIdQuery {
    pub subscription_id: Option<String>,
}

impl SubscriptionIdQuery {
    pub fn require(self) -> Result<String, PaybridgeError> {
        required(self.subscription_id, "subscription_id")
    }
}

/// Query of `GET /stripe/products`.
#[derive(Deserialize, Debug, Default)]
#[cfg_attr(feature = "openapi", derive(IntoParams))]
#[cfg_attr(feature = "openapi", into_params(parameter_in = Query))]
pub struct ListQuery {
    #[cfg_attr(feature = "openapi", param(example = "10"))]
    pub limit: Option<String>,
    #[cfg_attr(feature = "openapi", param(example = "prod_123"))]
    pub starting_after: Option<String>,
}

impl TryFrom<ListQuery> for ListParams {
    type Error = PaybridgeError;

    fn try_from(query: ListQuery) -> Result<Self, Self::Error> {
        Ok(ListParams {
            limit: parse_limit(query.limit)?,
            starting_after: present(query.starting_after),
        })
    }
}

/// Query of `GET /stripe/payments/list`.
#[derive(Deserialize, Debug, Default)]
#[cfg_attr(feature = "openapi", derive(IntoParams))]
#[cfg_attr(feature = "openapi", into_params(parameter_in = Query))]
pub struct PaymentListQuery {
    pub customer_id: Option<String>,
    pub limit: Option<String>,
    pub starting_after: Option<String>,
}

impl TryFrom<PaymentListQuery> for PaymentListParams {
    type Error = PaybridgeError;

    fn try_from(query: PaymentListQuery) -> Result<Self, Self::Error> {
        Ok(PaymentListParams {
            customer_id: present(query.customer_id),
            list: ListParams {
                limit: parse_limit(query.limit)?,
                starting_after: present(query.starting_after),
            },
        })
    }
}

/// Query of `GET /stripe/subscriptions/list`.
#[derive(Deserialize, Debug, Default)]
#[cfg_attr(feature = "openapi", derive(IntoParams))]
#[cfg_attr(feature = "openapi", into_params(parameter_in = Query))]
pub struct SubscriptionListQuery {
    pub customer_id: Option<String>,
    pub limit: Option<String>,
    pub starting_after: Option<String>,
}

impl TryFrom<SubscriptionListQuery> for SubscriptionListParams {
    type Error = PaybridgeError;

    fn try_from(query: SubscriptionListQuery) -> Result<Self, Self::Error> {
        let customer_id = required(query.customer_id, "customer_id")?;
        Ok(SubscriptionListParams {
            customer_id,
            list: ListParams {
                limit: parse_limit(query.limit)?,
                starting_after: present(query.starting_after),
            },
        })
    }
}

/// Acknowledgement returned to Stripe once an event has been handled.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
pub struct WebhookAck {
    #[cfg_attr(feature = "openapi", schema(example = "Webhook processed successfully"))]
    pub message: String,
}
